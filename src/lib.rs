//! Upload-record CRUD API.
//!
//! Receives a multipart file upload, forwards the bytes to an external
//! object store, persists the returned location alongside ownership
//! metadata, and exposes list/get/update/delete on the resulting records.

pub mod auth;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
