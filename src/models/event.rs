// file: src/models/event.rs
// description: typed webhook payload for GitHub release events
// reference: https://docs.github.com/en/webhooks/webhook-events-and-payloads#release

use crate::models::Release;
use serde::Deserialize;

/// Release event payload. Decoding is fail-closed: a body that does not
/// match this shape is rejected before any business logic runs.
#[derive(Debug, Clone, Deserialize)]
pub struct ReleaseEvent {
    pub action: String,
    pub release: Release,
    pub repository: EventRepository,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventRepository {
    pub full_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_deserializes() {
        let json = r#"{
            "action": "published",
            "release": {"tag_name": "v1.0.0", "assets": []},
            "repository": {"full_name": "acme/widget"}
        }"#;

        let event: ReleaseEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.action, "published");
        assert_eq!(event.repository.full_name, "acme/widget");
    }

    #[test]
    fn test_event_rejects_shape_mismatch() {
        // missing the release payload entirely
        let json = r#"{"action": "published", "repository": {"full_name": "acme/widget"}}"#;
        assert!(serde_json::from_str::<ReleaseEvent>(json).is_err());
    }
}
