// file: src/models/release.rs
// description: GitHub release and release-asset wire types
// reference: https://docs.github.com/en/rest/releases

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Release {
    pub tag_name: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub prerelease: bool,
    #[serde(default)]
    pub assets: Vec<ReleaseAsset>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ReleaseAsset {
    pub name: String,
    /// API asset endpoint, required for authenticated downloads.
    pub url: String,
    pub browser_download_url: String,
    #[serde(default)]
    pub size: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_release_deserializes_from_api_shape() {
        let json = r#"{
            "tag_name": "v1.0.0",
            "name": "1.0.0",
            "prerelease": false,
            "assets": [
                {
                    "name": "app-1.0.0.jar",
                    "url": "https://api.github.com/repos/acme/widget/releases/assets/1",
                    "browser_download_url": "https://github.com/acme/widget/releases/download/v1.0.0/app-1.0.0.jar",
                    "size": 1024
                }
            ]
        }"#;

        let release: Release = serde_json::from_str(json).unwrap();
        assert_eq!(release.tag_name, "v1.0.0");
        assert_eq!(release.assets.len(), 1);
        assert_eq!(release.assets[0].name, "app-1.0.0.jar");
        assert_eq!(release.assets[0].size, 1024);
    }

    #[test]
    fn test_release_tolerates_missing_optional_fields() {
        let release: Release = serde_json::from_str(r#"{"tag_name": "v2.0.0"}"#).unwrap();
        assert!(release.assets.is_empty());
        assert!(!release.prerelease);
        assert!(release.name.is_none());
    }
}
