use std::time::Duration;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use crate::catalog::{Catalog, CatalogError};
use crate::remote::{RemoteError, RemoteMirror};
use crate::storage::KeyValueStorage;

/// Seeds the local store from the remote listing, at most once.
///
/// The guard is a pure existence check on the products key: any prior write
/// — including an empty sequence — disables seeding for good. Fetch
/// failures are logged and swallowed, leaving the store absent so a later
/// run can try again; only local write failures propagate.
///
/// Returns `true` when the store was seeded by this call.
pub async fn ensure_seeded<S, M>(
    catalog: &mut Catalog<S>,
    mirror: &M,
    limit: usize,
    show_progress: bool,
) -> Result<bool, CatalogError>
where
    S: KeyValueStorage,
    M: RemoteMirror + Sync + ?Sized,
{
    if catalog.is_seeded()? {
        return Ok(false);
    }

    let spinner = if show_progress {
        let pb = ProgressBar::new_spinner();
        pb.set_draw_target(ProgressDrawTarget::stderr());
        pb.enable_steady_tick(Duration::from_millis(120));
        if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
            pb.set_style(style);
        }
        pb.set_message("seeding catalog from remote listing");
        Some(pb)
    } else {
        None
    };

    let fetched = mirror.fetch_listing(limit).await;

    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    match fetched {
        Ok(items) => {
            let products: Vec<_> = items.into_iter().map(|item| item.into_product()).collect();
            catalog.save(&products)?;
            Ok(true)
        }
        Err(RemoteError::Disabled) => Ok(false),
        Err(e) => {
            crate::app::warn_line(&format!("failed to seed catalog: {e} (ignored)"));
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::testing::{MirrorCall, RecordingMirror};
    use crate::remote::RemoteProduct;
    use crate::storage::MemoryStorage;

    fn shirt_listing() -> Vec<RemoteProduct> {
        vec![RemoteProduct {
            id: Some(1),
            title: "Shirt".to_string(),
            price: 9.99,
            description: "d".to_string(),
            image: "i".to_string(),
            category: "c".to_string(),
        }]
    }

    #[tokio::test]
    async fn seeds_an_empty_store_from_the_listing() {
        let mut catalog = Catalog::new(MemoryStorage::new());
        let mirror = RecordingMirror::with_listing(shirt_listing());

        let seeded = ensure_seeded(&mut catalog, &mirror, 10, false).await.unwrap();
        assert!(seeded);
        assert_eq!(mirror.calls(), vec![MirrorCall::Fetch { limit: 10 }]);

        let products = catalog.products().unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].id, Some(1));
        assert_eq!(products[0].name, "Shirt");
        assert_eq!(products[0].price, 9.99);
    }

    #[tokio::test]
    async fn runs_at_most_once_per_store() {
        let mut catalog = Catalog::new(MemoryStorage::new());
        let mirror = RecordingMirror::with_listing(shirt_listing());

        assert!(ensure_seeded(&mut catalog, &mirror, 10, false).await.unwrap());
        assert!(!ensure_seeded(&mut catalog, &mirror, 10, false).await.unwrap());
        // The second call never reached the remote.
        assert_eq!(mirror.calls().len(), 1);
    }

    #[tokio::test]
    async fn an_empty_sequence_written_elsewhere_disables_seeding() {
        let mut catalog = Catalog::new(MemoryStorage::new());
        catalog.save(&[]).unwrap();
        let mirror = RecordingMirror::with_listing(shirt_listing());

        assert!(!ensure_seeded(&mut catalog, &mirror, 10, false).await.unwrap());
        assert!(mirror.calls().is_empty());
        assert!(catalog.products().unwrap().is_empty());
    }

    #[tokio::test]
    async fn fetch_failure_is_swallowed_and_leaves_the_store_absent() {
        let mut catalog = Catalog::new(MemoryStorage::new());
        let mirror = RecordingMirror::failing();

        assert!(!ensure_seeded(&mut catalog, &mirror, 10, false).await.unwrap());
        assert!(!catalog.is_seeded().unwrap());

        // A later run with a healthy remote still gets to seed.
        let healthy = RecordingMirror::with_listing(shirt_listing());
        assert!(ensure_seeded(&mut catalog, &healthy, 10, false).await.unwrap());
    }

    #[tokio::test]
    async fn an_empty_listing_still_marks_the_store_seeded() {
        let mut catalog = Catalog::new(MemoryStorage::new());
        let mirror = RecordingMirror::with_listing(Vec::new());

        assert!(ensure_seeded(&mut catalog, &mirror, 10, false).await.unwrap());
        assert!(catalog.is_seeded().unwrap());
        assert!(!ensure_seeded(&mut catalog, &mirror, 10, false).await.unwrap());
    }
}
