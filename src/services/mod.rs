pub mod object_storage;
pub mod upload_store;
