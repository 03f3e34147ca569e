// file: src/models/summary.rs
// description: mirrored-object summary returned by the listing endpoint

use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectSummary {
    /// Not surfaced by every backend; kept for response-shape compatibility.
    pub storage_class: Option<String>,
    pub uploaded: DateTime<Utc>,
    pub checksums: ObjectChecksums,
    pub size: u64,
    pub key: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ObjectChecksums {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_serializes_camel_case() {
        let summary = ObjectSummary {
            storage_class: None,
            uploaded: DateTime::<Utc>::UNIX_EPOCH,
            checksums: ObjectChecksums {
                etag: Some("abc123".to_string()),
            },
            size: 42,
            key: "release/app-1.0.0.jar".to_string(),
        };

        let json = serde_json::to_value(&summary).unwrap();
        assert!(json.get("storageClass").is_some());
        assert_eq!(json["size"], 42);
        assert_eq!(json["key"], "release/app-1.0.0.jar");
        assert_eq!(json["checksums"]["etag"], "abc123");
    }
}
