//! Defines routes for the upload-record CRUD API.
//!
//! ## Structure
//! - **Public endpoints**
//!   - `GET    /uploads` — list all records
//!   - `GET    /uploads/{id}` — fetch one record
//!   - `GET    /healthz`, `GET /readyz` — probes
//!
//! - **Mutating endpoints** (bearer auth when tokens are configured)
//!   - `POST   /uploads` — multipart create (field `image`)
//!   - `PATCH  /uploads/{id}` — partial update, blank fields ignored
//!   - `DELETE /uploads/{id}` — remove record

use crate::{
    auth::require_bearer,
    handlers::{
        health_handlers::{healthz, readyz},
        upload_handlers::{
            create_upload, destroy_upload, index_uploads, show_upload, update_upload,
        },
    },
    state::AppState,
};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, patch, post},
};

/// Headroom for multipart framing on top of the configured file limit.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Build and return the router for the full API surface.
///
/// The auth middleware wraps only the mutating routes; reads stay public
/// either way. The precise 413 for oversized files comes from the intake
/// check, so the request body limit sits above the file limit.
pub fn routes(state: AppState) -> Router {
    let mutating = Router::new()
        .route("/uploads", post(create_upload))
        .route("/uploads/{id}", patch(update_upload).delete(destroy_upload))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_bearer,
        ));

    Router::new()
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/uploads", get(index_uploads))
        .route("/uploads/{id}", get(show_upload))
        .merge(mutating)
        .layer(DefaultBodyLimit::max(
            state.max_upload_bytes + MULTIPART_OVERHEAD,
        ))
        .with_state(state)
}
