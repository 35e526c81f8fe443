use crate::catalog::Catalog;
use crate::handlers::{self, CreateForm, Navigation, UpdateForm, PLACEHOLDER_IMAGE};
use crate::remote::testing::{MirrorCall, RecordingMirror};
use crate::remote::RemoteProduct;
use crate::storage::{FileStorage, KeyValueStorage, MemoryStorage};

fn listing(items: &[(u64, &str, f64)]) -> Vec<RemoteProduct> {
    items
        .iter()
        .map(|(id, title, price)| RemoteProduct {
            id: Some(*id),
            title: title.to_string(),
            price: *price,
            description: "d".to_string(),
            image: "i".to_string(),
            category: "c".to_string(),
        })
        .collect()
}

#[tokio::test]
async fn full_lifecycle_over_file_storage() {
    let dir = tempfile::tempdir().unwrap();
    let mut catalog = Catalog::new(FileStorage::new(dir.path()));
    let mirror = RecordingMirror::with_listing(listing(&[(1, "Shirt", 9.99), (2, "Hat", 3.0)]));

    // Seed.
    assert!(crate::bootstrap::ensure_seeded(&mut catalog, &mirror, 10, false)
        .await
        .unwrap());
    assert_eq!(catalog.products().unwrap().len(), 2);

    // Create.
    let nav = handlers::create_product(
        &mut catalog,
        &mirror,
        CreateForm {
            name: "Mug".to_string(),
            category: "kitchen".to_string(),
            price: 4.5,
            description: String::new(),
            photo: None,
        },
    )
    .await
    .unwrap();
    assert_eq!(nav, Navigation::Listing);
    assert_eq!(catalog.products().unwrap().len(), 3);

    // Edit + update.
    assert!(handlers::begin_edit(&mut catalog, 2).unwrap().is_some());
    handlers::update_product(
        &mut catalog,
        &mirror,
        UpdateForm {
            price: Some(5.0),
            ..UpdateForm::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(catalog.products().unwrap().len(), 3);
    assert_eq!(catalog.products().unwrap()[2].price, 5.0);

    // Delete.
    handlers::delete_product(&mut catalog, &mirror, 0, 1)
        .await
        .unwrap();
    let names: Vec<_> = catalog
        .products()
        .unwrap()
        .into_iter()
        .map(|p| p.name)
        .collect();
    assert_eq!(names, vec!["Hat", "Mug"]);

    // A fresh handle over the same directory sees the same state.
    let reopened = Catalog::new(FileStorage::new(dir.path()));
    assert_eq!(reopened.products().unwrap().len(), 2);
    assert!(reopened.pending_edit().unwrap().is_none());
}

#[tokio::test]
async fn sequence_length_deltas_match_the_operation() {
    let mut catalog = Catalog::new(MemoryStorage::new());
    let mirror = RecordingMirror::with_listing(listing(&[(1, "Shirt", 9.99)]));

    crate::bootstrap::ensure_seeded(&mut catalog, &mirror, 10, false)
        .await
        .unwrap();
    let after_seed = catalog.products().unwrap().len();
    assert_eq!(after_seed, 1);

    handlers::create_product(
        &mut catalog,
        &mirror,
        CreateForm {
            name: "Mug".to_string(),
            category: "kitchen".to_string(),
            price: 4.5,
            description: String::new(),
            photo: None,
        },
    )
    .await
    .unwrap();
    assert_eq!(catalog.products().unwrap().len(), after_seed + 1);

    handlers::begin_edit(&mut catalog, 0).unwrap();
    handlers::update_product(
        &mut catalog,
        &mirror,
        UpdateForm {
            name: Some("Shirt v2".to_string()),
            ..UpdateForm::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(catalog.products().unwrap().len(), after_seed + 1);

    handlers::delete_product(&mut catalog, &mirror, 0, 1)
        .await
        .unwrap();
    assert_eq!(catalog.products().unwrap().len(), after_seed);
}

#[tokio::test]
async fn bootstrap_stays_a_no_op_after_mutations_empty_the_store() {
    let mut catalog = Catalog::new(MemoryStorage::new());
    let mirror = RecordingMirror::with_listing(listing(&[(1, "Shirt", 9.99)]));

    crate::bootstrap::ensure_seeded(&mut catalog, &mirror, 10, false)
        .await
        .unwrap();
    handlers::delete_product(&mut catalog, &mirror, 0, 1)
        .await
        .unwrap();
    assert!(catalog.products().unwrap().is_empty());

    // The key still exists, so the loader must not refill the catalog.
    assert!(
        !crate::bootstrap::ensure_seeded(&mut catalog, &mirror, 10, false)
            .await
            .unwrap()
    );
    assert!(catalog.products().unwrap().is_empty());
}

#[tokio::test]
async fn repeating_a_delete_position_never_removes_an_unintended_record() {
    let mut catalog = Catalog::new(MemoryStorage::new());
    let mirror =
        RecordingMirror::with_listing(listing(&[(1, "A", 1.0), (2, "B", 2.0), (3, "C", 3.0)]));
    crate::bootstrap::ensure_seeded(&mut catalog, &mirror, 10, false)
        .await
        .unwrap();

    handlers::delete_product(&mut catalog, &mirror, 2, 3)
        .await
        .unwrap();
    // Position 2 no longer exists; deleting it again must change nothing.
    handlers::delete_product(&mut catalog, &mirror, 2, 0)
        .await
        .unwrap();

    let names: Vec<_> = catalog
        .products()
        .unwrap()
        .into_iter()
        .map(|p| p.name)
        .collect();
    assert_eq!(names, vec!["A", "B"]);
}

#[tokio::test]
async fn delete_fires_the_remote_before_touching_the_store() {
    let mut catalog = Catalog::new(MemoryStorage::new());
    let mirror = RecordingMirror::with_listing(listing(&[(5, "Shirt", 9.99)]));
    crate::bootstrap::ensure_seeded(&mut catalog, &mirror, 10, false)
        .await
        .unwrap();

    handlers::delete_product(&mut catalog, &mirror, 0, 5)
        .await
        .unwrap();

    let calls = mirror.calls();
    assert_eq!(calls[0], MirrorCall::Fetch { limit: 10 });
    assert_eq!(calls[1], MirrorCall::Delete { id: 5 });
    assert!(catalog.products().unwrap().is_empty());
}

#[test]
fn a_store_written_by_the_legacy_app_loads_as_is() {
    let dir = tempfile::tempdir().unwrap();
    let mut storage = FileStorage::new(dir.path());
    // Legacy shape: string price, `desc` field, editIndex left behind.
    storage
        .set(
            crate::catalog::PRODUCTS_KEY,
            r#"[{"id":1,"name":"Shirt","category":"c","price":"9.99","desc":"soft","image":"i"},
                {"name":"Anon","category":"c","price":2,"desc":"","image":"i"}]"#,
        )
        .unwrap();
    storage.set(crate::catalog::EDIT_INDEX_KEY, "1").unwrap();

    let catalog = Catalog::new(storage);
    let products = catalog.products().unwrap();
    assert_eq!(products.len(), 2);
    assert_eq!(products[0].price, 9.99);
    assert_eq!(products[0].description, "soft");
    assert_eq!(products[1].id, None);
    assert_eq!(catalog.pending_edit().unwrap(), Some(1));
}

#[tokio::test]
async fn created_records_keep_the_placeholder_while_the_remote_gets_its_own_image() {
    let mut catalog = Catalog::new(MemoryStorage::new());
    let mirror = RecordingMirror::default();

    handlers::create_product(
        &mut catalog,
        &mirror,
        CreateForm {
            name: "Mug".to_string(),
            category: "kitchen".to_string(),
            price: 4.5,
            description: String::new(),
            photo: None,
        },
    )
    .await
    .unwrap();

    assert_eq!(catalog.products().unwrap()[0].image, PLACEHOLDER_IMAGE);
    match &mirror.calls()[0] {
        MirrorCall::Create { payload } => {
            assert_ne!(payload.image, PLACEHOLDER_IMAGE);
        }
        other => panic!("expected create call, got {other:?}"),
    }
}
