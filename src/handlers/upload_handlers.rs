//! HTTP handlers for the upload-record CRUD surface.
//!
//! Each handler is an independent sequential chain: authenticate (done by
//! middleware) → intake → storage call → store call → respond. Failures
//! convert into `AppError` and bubble up with `?`.

use crate::{
    auth::{CurrentUser, require_ownership},
    errors::AppError,
    models::upload::{UpdateUploadBody, UploadEnvelope, UploadsEnvelope},
    state::AppState,
};
use axum::{
    Extension, Json,
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use bytes::Bytes;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

/// Multipart form field that carries the file on create.
const FILE_FIELD: &str = "image";

#[derive(Debug, Error)]
pub enum IntakeError {
    #[error("multipart field `image` is required")]
    MissingFile,
    #[error("uploaded file exceeds the limit of {limit} bytes")]
    PayloadTooLarge { limit: usize },
    #[error("malformed multipart body: {0}")]
    Malformed(#[from] axum::extract::multipart::MultipartError),
}

impl From<IntakeError> for AppError {
    fn from(err: IntakeError) -> Self {
        let status = match err {
            IntakeError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            IntakeError::MissingFile | IntakeError::Malformed(_) => StatusCode::BAD_REQUEST,
        };
        AppError::new(status, err.to_string())
    }
}

/// A single uploaded file, buffered in memory until forwarded to storage.
struct IncomingFile {
    filename: String,
    content_type: String,
    bytes: Bytes,
}

/// Pull the `image` field out of the multipart body.
async fn read_file_field(
    multipart: &mut Multipart,
    limit: usize,
) -> Result<IncomingFile, IntakeError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let filename = field.file_name().unwrap_or("file").to_string();
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = field.bytes().await?;

        if bytes.len() > limit {
            return Err(IntakeError::PayloadTooLarge { limit });
        }

        return Ok(IncomingFile {
            filename,
            content_type,
            bytes,
        });
    }

    Err(IntakeError::MissingFile)
}

/// Ids arrive as path strings; anything that is not a UUID cannot name an
/// existing record, so it maps straight to 404.
fn parse_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::not_found(format!("upload `{raw}` not found")))
}

/// POST `/uploads` — intake file → upload to storage → persist record.
pub async fn create_upload(
    State(state): State<AppState>,
    user: Option<Extension<CurrentUser>>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let file = read_file_field(&mut multipart, state.max_upload_bytes).await?;

    let location = state
        .storage
        .upload(&file.filename, &file.content_type, file.bytes)
        .await?;

    let owner = user
        .as_ref()
        .map(|Extension(CurrentUser(principal))| principal.as_str());
    let record = state.store.create(&location, owner).await?;

    info!(id = %record.id, url = %record.url, "created upload record");
    Ok((StatusCode::CREATED, Json(UploadEnvelope { upload: record })))
}

/// GET `/uploads` — all records.
pub async fn index_uploads(
    State(state): State<AppState>,
) -> Result<Json<UploadsEnvelope>, AppError> {
    let uploads = state.store.find_all().await?;
    Ok(Json(UploadsEnvelope { uploads }))
}

/// GET `/uploads/{id}` — single record.
pub async fn show_upload(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<UploadEnvelope>, AppError> {
    let id = parse_id(&id)?;
    let upload = state.store.find_by_id(id).await?;
    Ok(Json(UploadEnvelope { upload }))
}

/// PATCH `/uploads/{id}` — partial update, blank fields ignored.
pub async fn update_upload(
    State(state): State<AppState>,
    user: Option<Extension<CurrentUser>>,
    Path(id): Path<String>,
    Json(body): Json<UpdateUploadBody>,
) -> Result<StatusCode, AppError> {
    let id = parse_id(&id)?;
    let record = state.store.find_by_id(id).await?;
    require_ownership(user.as_ref().map(|Extension(u)| u), &record)?;

    state.store.update(id, body.upload).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE `/uploads/{id}`.
pub async fn destroy_upload(
    State(state): State<AppState>,
    user: Option<Extension<CurrentUser>>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = parse_id(&id)?;
    let record = state.store.find_by_id(id).await?;
    require_ownership(user.as_ref().map(|Extension(u)| u), &record)?;

    state.store.delete(id).await?;
    info!(id = %id, "deleted upload record");
    Ok(StatusCode::NO_CONTENT)
}
