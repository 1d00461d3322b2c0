//! ObjectStorageClient — forwards uploaded bytes to the remote object store.
//!
//! The contract is a single operation: store bytes, get back a location
//! string. One PUT per upload, no retries; retry policy belongs to the
//! operator's reverse proxy or to the store itself.

use bytes::Bytes;
use reqwest::{
    Client, StatusCode,
    header::{CONTENT_TYPE, LOCATION},
};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum ObjectStorageError {
    #[error("object storage unreachable: {0}")]
    Unavailable(#[source] reqwest::Error),
    #[error("object storage rejected the upload with status {status}")]
    Rejected { status: StatusCode },
}

pub type ObjectStorageResult<T> = Result<T, ObjectStorageError>;

/// HTTP client for the external object-storage service.
///
/// Objects land at `{endpoint}/{bucket}/{key}` where the key is a fresh UUID
/// plus the sanitized original filename, so repeated uploads of the same file
/// never collide.
#[derive(Clone)]
pub struct ObjectStorageClient {
    http: Client,
    endpoint: String,
    bucket: String,
}

impl ObjectStorageClient {
    pub fn new(endpoint: &str, bucket: &str) -> anyhow::Result<Self> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            http,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            bucket: bucket.to_string(),
        })
    }

    /// Send a payload to the store and return its location.
    ///
    /// The location is the `Location` header when the store returns one,
    /// otherwise the request URL itself.
    pub async fn upload(
        &self,
        filename: &str,
        content_type: &str,
        bytes: Bytes,
    ) -> ObjectStorageResult<String> {
        let key = object_key(filename);
        let url = format!("{}/{}/{}", self.endpoint, self.bucket, key);

        let response = self
            .http
            .put(&url)
            .header(CONTENT_TYPE, content_type)
            .body(bytes)
            .send()
            .await
            .map_err(ObjectStorageError::Unavailable)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ObjectStorageError::Rejected { status });
        }

        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
            .unwrap_or(url);

        debug!("stored object at {}", location);
        Ok(location)
    }

    /// Best-effort reachability probe for readiness checks. Any HTTP
    /// response, success or not, counts as reachable.
    pub async fn ping(&self) -> ObjectStorageResult<()> {
        self.http
            .get(&self.endpoint)
            .send()
            .await
            .map_err(ObjectStorageError::Unavailable)?;
        Ok(())
    }
}

/// Build a collision-free object key from the original filename.
fn object_key(filename: &str) -> String {
    format!("{}-{}", Uuid::new_v4(), sanitize_filename(filename))
}

/// Keep the key URL- and path-safe: alphanumerics, dot, dash, underscore.
fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '.' | '-' | '_' => c,
            _ => '-',
        })
        .collect();

    if cleaned.trim_matches('-').is_empty() {
        "file".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_keeps_safe_characters() {
        assert_eq!(sanitize_filename("cat.png"), "cat.png");
        assert_eq!(sanitize_filename("my photo (1).jpg"), "my-photo--1-.jpg");
        assert_eq!(sanitize_filename("../../etc/passwd"), "..-..-etc-passwd");
    }

    #[test]
    fn sanitize_falls_back_for_empty_names() {
        assert_eq!(sanitize_filename(""), "file");
        assert_eq!(sanitize_filename("///"), "file");
    }

    #[test]
    fn object_keys_are_unique_per_call() {
        let a = object_key("cat.png");
        let b = object_key("cat.png");
        assert_ne!(a, b);
        assert!(a.ends_with("-cat.png"));
    }
}
