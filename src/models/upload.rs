//! Represents a persisted upload record pointing at an externally stored file.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Metadata for a file that lives in the external object store.
///
/// The record stores the location the object store returned, not the file
/// bytes themselves.
#[derive(Serialize, Deserialize, Clone, FromRow, Debug, PartialEq)]
pub struct UploadRecord {
    /// Unique identifier, assigned by the store on creation.
    pub id: Uuid,

    /// Location of the uploaded object in external storage.
    pub url: String,

    /// Principal that created the record. Absent when the API runs without
    /// authentication, and omitted from JSON in that case.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,

    /// When this record was created.
    pub created_at: DateTime<Utc>,

    /// When this record was last modified.
    pub updated_at: DateTime<Utc>,
}

/// `{"upload": {...}}` response body used by create and show.
#[derive(Serialize, Debug)]
pub struct UploadEnvelope {
    pub upload: UploadRecord,
}

/// `{"uploads": [...]}` response body used by index.
#[derive(Serialize, Debug)]
pub struct UploadsEnvelope {
    pub uploads: Vec<UploadRecord>,
}

/// PATCH request body: `{"upload": {"url": "..."}}`.
#[derive(Deserialize, Debug, Default)]
pub struct UpdateUploadBody {
    #[serde(default)]
    pub upload: UploadChanges,
}

/// Partial update for an upload record. The owner is fixed at creation, so
/// only the url can change.
#[derive(Deserialize, Debug, Default, Clone)]
pub struct UploadChanges {
    pub url: Option<String>,
}

impl UploadChanges {
    /// Drop blank fields so that only explicitly provided values are applied.
    pub fn stripped(self) -> Self {
        Self {
            url: self.url.filter(|value| !value.trim().is_empty()),
        }
    }

    /// True when no field survives stripping.
    pub fn is_empty(&self) -> bool {
        self.url.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    #[test]
    fn stripping_drops_blank_and_absent_fields() {
        let blank = UploadChanges {
            url: Some("   ".into()),
        }
        .stripped();
        assert!(blank.is_empty());

        let absent = UploadChanges { url: None }.stripped();
        assert!(absent.is_empty());

        let kept = UploadChanges {
            url: Some("https://bucket.example/cat.png".into()),
        }
        .stripped();
        assert_eq!(kept.url.as_deref(), Some("https://bucket.example/cat.png"));
    }

    #[test]
    fn owner_is_omitted_from_json_when_absent() {
        let record = UploadRecord {
            id: Uuid::new_v4(),
            url: "https://bucket.example/cat.png".into(),
            owner: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_value(UploadEnvelope { upload: record }).unwrap();
        assert!(json["upload"].get("owner").is_none());
        assert_eq!(json["upload"]["url"], "https://bucket.example/cat.png");
    }

    #[test]
    fn update_body_tolerates_missing_envelope() {
        let body: UpdateUploadBody = serde_json::from_str("{}").unwrap();
        assert!(body.upload.stripped().is_empty());
    }
}
