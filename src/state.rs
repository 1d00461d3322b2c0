//! Shared application state handed to every handler.

use crate::{auth::AuthTokens, services::object_storage::ObjectStorageClient, services::upload_store::UploadStore};

/// Explicitly constructed client handles, injected at startup. No global
/// mutable state anywhere in the handler layer.
#[derive(Clone)]
pub struct AppState {
    pub store: UploadStore,
    pub storage: ObjectStorageClient,
    /// `Some` turns bearer authentication on for mutating routes.
    pub auth: Option<AuthTokens>,
    /// Upper bound for an uploaded file's bytes.
    pub max_upload_bytes: usize,
}
