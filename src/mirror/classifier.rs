// file: src/mirror/classifier.rs
// description: asset relevance filtering and storage channel routing

use crate::config::MirrorConfig;

/// Storage namespace an artifact is routed to based on filename markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Release,
    Prerelease,
}

impl Channel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Release => "release",
            Channel::Prerelease => "prerelease",
        }
    }
}

const PRERELEASE_MARKERS: [&str; 3] = ["beta", "alpha", "rc"];
const CHECKSUM_SUFFIX: &str = ".sha256";

#[derive(Debug, Clone)]
pub struct AssetClassifier {
    extension: String,
    excluded_prefixes: Vec<String>,
    mirror_checksums: bool,
}

impl AssetClassifier {
    pub fn new(config: &MirrorConfig) -> Self {
        Self {
            extension: format!(".{}", config.artifact_extension.trim_start_matches('.')),
            excluded_prefixes: config.excluded_prefixes.clone(),
            mirror_checksums: config.mirror_checksums,
        }
    }

    /// Decide whether an asset is relevant and which channel it belongs to.
    /// Pure function. Check order: extension filter, prefix exclusion,
    /// prerelease marker scan. The prefix check must run after the extension
    /// filter since excluded names would otherwise also match the extension.
    pub fn classify(&self, file_name: &str) -> Option<Channel> {
        let base = if let Some(stripped) = file_name.strip_suffix(CHECKSUM_SUFFIX) {
            if !self.mirror_checksums {
                return None;
            }
            stripped
        } else {
            file_name
        };

        if !base.ends_with(&self.extension) {
            return None;
        }

        if self
            .excluded_prefixes
            .iter()
            .any(|prefix| base.starts_with(prefix.as_str()))
        {
            return None;
        }

        if PRERELEASE_MARKERS.iter().any(|marker| base.contains(marker)) {
            Some(Channel::Prerelease)
        } else {
            Some(Channel::Release)
        }
    }

    /// Storage key for a classified asset. Checksum companions keep their
    /// full name so they land next to their base artifact.
    pub fn storage_key(&self, channel: Channel, file_name: &str) -> String {
        format!("{}/{}", channel.as_str(), file_name)
    }

    /// Download-route filter: tracked extension or its checksum variant,
    /// independent of whether checksum companions are mirrored.
    pub fn is_tracked_name(&self, name: &str) -> bool {
        name.ends_with(&self.extension)
            || name
                .strip_suffix(CHECKSUM_SUFFIX)
                .is_some_and(|base| base.ends_with(&self.extension))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn classifier() -> AssetClassifier {
        AssetClassifier::new(&Config::default_config().mirror)
    }

    #[test]
    fn test_plain_artifact_routes_to_release() {
        assert_eq!(classifier().classify("app-1.0.0.jar"), Some(Channel::Release));
    }

    #[test]
    fn test_prerelease_markers_route_to_prerelease() {
        let classifier = classifier();
        assert_eq!(
            classifier.classify("app-1.0.0-beta.1.jar"),
            Some(Channel::Prerelease)
        );
        assert_eq!(
            classifier.classify("app-1.0.0-alpha.2.jar"),
            Some(Channel::Prerelease)
        );
        assert_eq!(
            classifier.classify("app-1.0.0-rc.1.jar"),
            Some(Channel::Prerelease)
        );
    }

    #[test]
    fn test_excluded_prefix_rejected() {
        assert_eq!(classifier().classify("pro-api-1.0.0.jar"), None);
    }

    #[test]
    fn test_wrong_extension_rejected() {
        let classifier = classifier();
        assert_eq!(classifier.classify("app-1.0.0.zip"), None);
        assert_eq!(classifier.classify("app-1.0.0.tar.gz"), None);
    }

    #[test]
    fn test_checksum_companion_follows_base_channel() {
        let classifier = classifier();
        assert_eq!(
            classifier.classify("app-1.0.0.jar.sha256"),
            Some(Channel::Release)
        );
        assert_eq!(
            classifier.classify("app-1.0.0-beta.1.jar.sha256"),
            Some(Channel::Prerelease)
        );
        // a checksum for an irrelevant file stays irrelevant
        assert_eq!(classifier.classify("app-1.0.0.zip.sha256"), None);
        assert_eq!(classifier.classify("pro-api-1.0.0.jar.sha256"), None);
    }

    #[test]
    fn test_checksum_companion_respects_feature_flag() {
        let mut config = Config::default_config().mirror;
        config.mirror_checksums = false;
        let classifier = AssetClassifier::new(&config);

        assert_eq!(classifier.classify("app-1.0.0.jar.sha256"), None);
        assert_eq!(classifier.classify("app-1.0.0.jar"), Some(Channel::Release));
    }

    #[test]
    fn test_classification_is_deterministic() {
        let classifier = classifier();
        for _ in 0..3 {
            assert_eq!(classifier.classify("app-1.0.0.jar"), Some(Channel::Release));
        }
    }

    #[test]
    fn test_storage_key_layout() {
        let classifier = classifier();
        assert_eq!(
            classifier.storage_key(Channel::Release, "app-1.0.0.jar"),
            "release/app-1.0.0.jar"
        );
        assert_eq!(
            classifier.storage_key(Channel::Prerelease, "app-1.0.0-rc.1.jar"),
            "prerelease/app-1.0.0-rc.1.jar"
        );
        assert_eq!(
            classifier.storage_key(Channel::Release, "app-1.0.0.jar.sha256"),
            "release/app-1.0.0.jar.sha256"
        );
    }

    #[test]
    fn test_tracked_name_filter() {
        let classifier = classifier();
        assert!(classifier.is_tracked_name("release/app-1.0.0.jar"));
        assert!(classifier.is_tracked_name("prerelease/app-1.0.0-rc.1.jar.sha256"));
        assert!(!classifier.is_tracked_name("release/app-1.0.0.zip"));
        assert!(!classifier.is_tracked_name("readme.md"));
    }
}
