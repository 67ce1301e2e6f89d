//! Centralized configuration for the datadoc core.
//!
//! Fixed names of the on-disk document format live in constant tables;
//! the few runtime knobs are read from the environment into
//! [`DatadocSettings`].

use std::env;

/// Names used by the metadata document format.
pub struct DocumentConfig;

impl DocumentConfig {
    /// Appended to the dataset file stem to name its metadata document.
    pub const METADATA_DOCUMENT_SUFFIX: &'static str = "__DOC.json";
    /// Version of the container wrapping the `datadoc` sub-tree.
    pub const CONTAINER_VERSION: &'static str = "0.0.1";
    pub const VERSION_FIELD_NAME: &'static str = "document_version";
    pub const DATADOC_KEY: &'static str = "datadoc";
    pub const PSEUDONYMIZATION_KEY: &'static str = "pseudonymization";
    pub const PERCENTAGE_COMPLETE_KEY: &'static str = "percentage_complete";
}

/// Markers that introduce a bucket name in a dataset path.
pub struct PathConfig;

impl PathConfig {
    pub const GS_PREFIX: &'static str = "gs://";
    /// What `gs://` collapses to after a round trip through a path type.
    pub const GS_PREFIX_SINGLE_SLASH: &'static str = "gs:/";
    /// Directory component that introduces a bucket in a mounted path.
    pub const BUCKETS_SEGMENT: &'static str = "buckets";
    pub const PERIOD_PREFIX: char = 'p';
    pub const VERSION_PREFIX: char = 'v';
}

/// Default values filled into freshly documented datasets.
pub struct DefaultsConfig;

impl DefaultsConfig {
    pub const SPATIAL_COVERAGE: &'static [(&'static str, &'static str)] =
        &[("nb", "Norge"), ("nn", "Noreg"), ("en", "Norway")];
}

/// Environment variable names read by [`DatadocSettings::from_env`].
pub struct EnvConfig;

impl EnvConfig {
    pub const ERRORS_AS_WARNINGS: &'static str = "DATADOC_ERRORS_AS_WARNINGS";
    pub const LOG_LEVEL: &'static str = "DATADOC_LOG_LEVEL";
    pub const LOG_JSON: &'static str = "DATADOC_LOG_JSON";
    pub const USER: &'static str = "DAPLA_USER";
    pub const JUPYTERHUB_USER: &'static str = "JUPYTERHUB_USER";
}

/// Runtime settings for opening and writing metadata documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatadocSettings {
    /// Downgrade dataset inconsistencies to warnings instead of failing.
    pub errors_as_warnings: bool,
    /// Identity stamped into `metadata_created_by` / `metadata_last_updated_by`.
    pub user: Option<String>,
    pub log_level: String,
    pub log_json: bool,
}

impl Default for DatadocSettings {
    fn default() -> Self {
        Self {
            errors_as_warnings: false,
            user: None,
            log_level: "info".to_string(),
            log_json: false,
        }
    }
}

impl DatadocSettings {
    /// Build settings from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build settings from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let user = lookup(EnvConfig::USER)
            .or_else(|| lookup(EnvConfig::JUPYTERHUB_USER))
            .filter(|u| !u.trim().is_empty());

        Self {
            errors_as_warnings: lookup(EnvConfig::ERRORS_AS_WARNINGS)
                .map(|v| parse_flag(&v))
                .unwrap_or(defaults.errors_as_warnings),
            user,
            log_level: lookup(EnvConfig::LOG_LEVEL)
                .map(|v| v.trim().to_lowercase())
                .filter(|v| !v.is_empty())
                .unwrap_or(defaults.log_level),
            log_json: lookup(EnvConfig::LOG_JSON)
                .map(|v| parse_flag(&v))
                .unwrap_or(defaults.log_json),
        }
    }

    pub fn with_errors_as_warnings(mut self, errors_as_warnings: bool) -> Self {
        self.errors_as_warnings = errors_as_warnings;
        self
    }

    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_environment_empty() {
        let settings = DatadocSettings::from_lookup(|_| None);
        assert_eq!(settings, DatadocSettings::default());
    }

    #[test]
    fn test_reads_flags_and_user() {
        let settings = DatadocSettings::from_lookup(lookup_from(&[
            (EnvConfig::ERRORS_AS_WARNINGS, "True"),
            (EnvConfig::LOG_LEVEL, "DEBUG"),
            (EnvConfig::JUPYTERHUB_USER, "abc@ssb.no"),
        ]));
        assert!(settings.errors_as_warnings);
        assert_eq!(settings.log_level, "debug");
        assert_eq!(settings.user.as_deref(), Some("abc@ssb.no"));
        assert!(!settings.log_json);
    }

    #[test]
    fn test_dapla_user_wins_over_jupyterhub_user() {
        let settings = DatadocSettings::from_lookup(lookup_from(&[
            (EnvConfig::USER, "first@ssb.no"),
            (EnvConfig::JUPYTERHUB_USER, "second@ssb.no"),
        ]));
        assert_eq!(settings.user.as_deref(), Some("first@ssb.no"));
    }

    #[test]
    fn test_builder_setters() {
        let settings = DatadocSettings::default()
            .with_errors_as_warnings(true)
            .with_user("me@ssb.no");
        assert!(settings.errors_as_warnings);
        assert_eq!(settings.user.as_deref(), Some("me@ssb.no"));
    }
}
