//! Data model for the upload-record API.
//!
//! `UploadRecord` maps to the `uploads` table via `sqlx::FromRow` and
//! serializes naturally as JSON via `serde`.

pub mod upload;
