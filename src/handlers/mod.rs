use std::fs;
use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use thiserror::Error;

use crate::catalog::{timestamp_id, Catalog, CatalogError, Product};
use crate::remote::{log_best_effort, RemoteMirror, RemotePayload};
use crate::render::{self, ProductCard};
use crate::storage::KeyValueStorage;

/// Image used for locally created records when no photo is supplied.
pub const PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/150";

/// Fixed image URL sent in create payloads. The remote demo API never
/// receives the embedded photo, only the local record keeps it.
pub const REMOTE_UPLOAD_IMAGE: &str = "https://i.pravatar.cc";

// Embeddings land in the store with no size limit; past this point they get
// a warning instead of silence.
const EMBED_WARN_BYTES: usize = 1024 * 1024;

#[derive(Debug, Error)]
pub enum HandlerError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("failed to read photo '{path}': {source}")]
    Photo {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Terminal outcome of a handler: which view the host should show next.
/// Every handler ends in one of these; there is no in-handler state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Navigation {
    /// Go (back) to the listing view.
    Listing,
    /// Re-render the current view.
    Reload,
}

/// Fields read from the creation view.
#[derive(Clone, Debug)]
pub struct CreateForm {
    pub name: String,
    pub category: String,
    pub price: f64,
    pub description: String,
    pub photo: Option<PathBuf>,
}

/// Fields read from the edit view. Omitted fields keep the existing
/// record's values, same as a pre-filled form submitted untouched.
#[derive(Clone, Debug, Default)]
pub struct UpdateForm {
    pub name: Option<String>,
    pub category: Option<String>,
    pub price: Option<f64>,
    pub description: Option<String>,
    pub photo: Option<PathBuf>,
}

/// The edit view's pre-filled state.
#[derive(Clone, Debug)]
pub struct EditView {
    pub index: usize,
    pub product: Product,
}

/// Listing view: the full sequence rendered as summary cards.
pub fn list_view<S>(catalog: &Catalog<S>) -> Result<Vec<ProductCard>, HandlerError>
where
    S: KeyValueStorage,
{
    Ok(render::build_cards(&catalog.products()?))
}

/// Creation view submit: best-effort POST, then append and persist.
pub async fn create_product<S, M>(
    catalog: &mut Catalog<S>,
    mirror: &M,
    form: CreateForm,
) -> Result<Navigation, HandlerError>
where
    S: KeyValueStorage,
    M: RemoteMirror + Sync + ?Sized,
{
    let payload = RemotePayload {
        title: form.name.clone(),
        price: form.price,
        description: form.description.clone(),
        image: REMOTE_UPLOAD_IMAGE.to_string(),
        category: form.category.clone(),
    };
    log_best_effort("create", mirror.create(&payload).await);

    let image = match form.photo.as_deref() {
        Some(path) => embed_photo(path)?,
        None => PLACEHOLDER_IMAGE.to_string(),
    };

    catalog.append(Product {
        id: Some(timestamp_id()),
        name: form.name,
        category: form.category,
        price: form.price,
        description: form.description,
        image,
    })?;

    Ok(Navigation::Listing)
}

/// Entering the edit view: record the pending position and hand back the
/// pre-filled form. An out-of-range position yields `None` — the host
/// navigates back to the listing without any state written.
pub fn begin_edit<S>(
    catalog: &mut Catalog<S>,
    index: usize,
) -> Result<Option<EditView>, HandlerError>
where
    S: KeyValueStorage,
{
    let products = catalog.products()?;
    let Some(product) = products.get(index).cloned() else {
        return Ok(None);
    };
    catalog.begin_edit(index)?;
    Ok(Some(EditView { index, product }))
}

/// Edit view submit: merge the form over the record at the pending
/// position, best-effort PUT, persist, clear the pending position.
///
/// A missing or stale pending position navigates back to the listing
/// without touching the store. A record with no identifier skips the remote
/// update entirely.
pub async fn update_product<S, M>(
    catalog: &mut Catalog<S>,
    mirror: &M,
    form: UpdateForm,
) -> Result<Navigation, HandlerError>
where
    S: KeyValueStorage,
    M: RemoteMirror + Sync + ?Sized,
{
    let products = catalog.products()?;
    let Some(index) = catalog.pending_edit()?.filter(|i| *i < products.len()) else {
        return Ok(Navigation::Listing);
    };
    let existing = products[index].clone();

    let name = form.name.unwrap_or_else(|| existing.name.clone());
    let category = form.category.unwrap_or_else(|| existing.category.clone());
    let price = form.price.unwrap_or(existing.price);
    let description = form
        .description
        .unwrap_or_else(|| existing.description.clone());

    if let Some(id) = existing.id.filter(|id| *id > 0) {
        // The payload carries the record's current image, never a newly
        // chosen photo; the demo API would not accept a data URI anyway.
        let payload = RemotePayload {
            title: name.clone(),
            price,
            description: description.clone(),
            image: existing.image.clone(),
            category: category.clone(),
        };
        log_best_effort("update", mirror.update(id, &payload).await);
    }

    let image = match form.photo.as_deref() {
        Some(path) => embed_photo(path)?,
        None => existing.image.clone(),
    };

    catalog.replace_at(
        index,
        Product {
            id: existing.id,
            name,
            category,
            price,
            description,
            image,
        },
    )?;
    catalog.clear_pending_edit()?;

    Ok(Navigation::Listing)
}

/// Delete action: best-effort remote DELETE when the identifier is
/// positive, then remove the record at the position unconditionally. An
/// out-of-range position removes nothing and is not an error.
pub async fn delete_product<S, M>(
    catalog: &mut Catalog<S>,
    mirror: &M,
    index: usize,
    id: u64,
) -> Result<Navigation, HandlerError>
where
    S: KeyValueStorage,
    M: RemoteMirror + Sync + ?Sized,
{
    if id > 0 {
        log_best_effort("delete", mirror.delete(id).await);
    }

    catalog.remove_at(index)?;

    Ok(Navigation::Reload)
}

/// Reads a photo file into an embedded `data:` URI.
pub fn embed_photo(path: &Path) -> Result<String, HandlerError> {
    let bytes = fs::read(path).map_err(|e| HandlerError::Photo {
        path: path.display().to_string(),
        source: e,
    })?;
    if bytes.len() > EMBED_WARN_BYTES {
        crate::app::warn_line(&format!(
            "photo '{}' embeds {} bytes into the store; the store enforces no size limit",
            path.display(),
            bytes.len()
        ));
    }
    let mime = match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    };
    Ok(format!("data:{mime};base64,{}", BASE64.encode(&bytes)))
}
