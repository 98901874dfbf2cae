//! Named boolean feature flags.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Verify downloaded blobs against the checksum declared by the primary.
pub const GEO_FILE_TRANSFER_VALIDATION: &str = "geo_file_transfer_validation";

/// Prefer the single-request tag delete when the registry supports it.
pub const CONTAINER_REGISTRY_FAST_TAG_DELETE: &str = "container_registry_fast_tag_delete";

/// Bound fast tag deletion by the registry service timeout.
pub const CONTAINER_REGISTRY_EXPIRATION_POLICIES_THROTTLING: &str =
    "container_registry_expiration_policies_throttling";

/// Flag lookup table. Absent flags fall back to the caller's default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureFlags(BTreeMap<String, bool>);

impl FeatureFlags {
    pub fn new() -> Self { Self::default() }

    #[must_use]
    pub fn with(mut self, name: impl Into<String>, enabled: bool) -> Self {
        self.set(name, enabled);
        self
    }

    pub fn set(&mut self, name: impl Into<String>, enabled: bool) { self.0.insert(name.into(), enabled); }

    pub fn enabled(&self, name: &str, default: bool) -> bool { self.0.get(name).copied().unwrap_or(default) }
}

impl<S: Into<String>> FromIterator<(S, bool)> for FeatureFlags {
    fn from_iter<I: IntoIterator<Item = (S, bool)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_applies_when_absent() {
        let flags = FeatureFlags::new();
        assert!(flags.enabled(GEO_FILE_TRANSFER_VALIDATION, true));
        assert!(!flags.enabled(CONTAINER_REGISTRY_EXPIRATION_POLICIES_THROTTLING, false));
    }

    #[test]
    fn test_explicit_value_wins() {
        let flags: FeatureFlags = [(GEO_FILE_TRANSFER_VALIDATION, false)].into_iter().collect();
        assert!(!flags.enabled(GEO_FILE_TRANSFER_VALIDATION, true));

        let flags = flags.with(GEO_FILE_TRANSFER_VALIDATION, true);
        assert!(flags.enabled(GEO_FILE_TRANSFER_VALIDATION, false));
    }
}
