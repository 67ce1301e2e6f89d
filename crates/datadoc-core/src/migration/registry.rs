//! Ordered registry of schema versions and the upgrade engine.

use semver::Version;
use serde_json::Value;
use std::sync::LazyLock;
use tracing::{debug, info};

use super::is_container;
use super::version::{Handler, SchemaVersion};
use crate::config::DocumentConfig;
use crate::error::{DatadocError, Result};

/// A version identifier paired with the step that produces it.
#[derive(Debug, Clone)]
pub struct BackwardsCompatibleVersion {
    label: String,
    version: Version,
    handler: Handler,
}

impl BackwardsCompatibleVersion {
    pub fn version(&self) -> &str {
        &self.label
    }

    pub fn handler(&self) -> Handler {
        self.handler
    }
}

/// Schema versions in migration order.
///
/// Registration order is migration order; `register` only accepts versions
/// greater than the last one registered.
#[derive(Debug, Clone, Default)]
pub struct VersionRegistry {
    entries: Vec<BackwardsCompatibleVersion>,
}

static BUILTIN: LazyLock<VersionRegistry> = LazyLock::new(VersionRegistry::builtin);

impl VersionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every version this build knows about.
    ///
    /// # Panics
    ///
    /// Panics if [`SchemaVersion::ALL`] is not a strictly ascending list of
    /// semantic versions.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for version in SchemaVersion::ALL {
            registry
                .register(version.as_str(), version.handler())
                .expect("Built-in schema versions must be ascending semantic versions");
        }
        registry
    }

    /// Shared instance of [`VersionRegistry::builtin`].
    pub fn shared() -> &'static VersionRegistry {
        &BUILTIN
    }

    /// Append a version to the end of the chain.
    pub fn register(&mut self, version: &str, handler: Handler) -> Result<()> {
        let parsed = Version::parse(version).map_err(|e| DatadocError::InvalidRegistry {
            message: format!("'{}' is not a semantic version: {}", version, e),
        })?;

        if let Some(last) = self.entries.last() {
            if parsed <= last.version {
                return Err(DatadocError::InvalidRegistry {
                    message: format!(
                        "version {} must be registered after {}, not before",
                        version, last.label
                    ),
                });
            }
        }

        self.entries.push(BackwardsCompatibleVersion {
            label: version.to_string(),
            version: parsed,
            handler,
        });
        Ok(())
    }

    /// Newest registered version.
    pub fn latest(&self) -> Option<&str> {
        self.entries.last().map(|e| e.label.as_str())
    }

    pub fn versions(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.label.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Bring a document tree up to the newest registered version.
    ///
    /// A container whose `datadoc` is null is returned untouched. A document
    /// already at the newest version is returned as is.
    pub fn upgrade(&self, document: Value) -> Result<Value> {
        if is_container(&document) && document[DocumentConfig::DATADOC_KEY].is_null() {
            debug!("Container has no datadoc content, nothing to upgrade");
            return Ok(document);
        }

        let declared = declared_version(&document)?;
        let start = self
            .entries
            .iter()
            .position(|e| e.label == declared)
            .ok_or_else(|| DatadocError::UnknownModelVersion {
                version: declared.clone(),
            })?;

        let pending = &self.entries[start + 1..];
        if pending.is_empty() {
            return Ok(document);
        }

        let mut document = document;
        for entry in pending {
            debug!("Upgrading metadata document to version {}", entry.label);
            document = (entry.handler)(document);
            stamp_version(&mut document, &entry.label);
        }

        info!(
            "Upgraded metadata document from version {} to {}",
            declared,
            self.latest().unwrap_or_default()
        );
        Ok(document)
    }
}

/// Upgrade a document with the built-in registry.
pub fn upgrade_metadata(document: Value) -> Result<Value> {
    BUILTIN.upgrade(document)
}

fn declared_version(document: &Value) -> Result<String> {
    let tagged = if is_container(document) {
        &document[DocumentConfig::DATADOC_KEY]
    } else {
        document
    };
    match tagged.get(DocumentConfig::VERSION_FIELD_NAME) {
        Some(Value::String(version)) => Ok(version.clone()),
        Some(other) => Err(DatadocError::UnknownModelVersion {
            version: other.to_string(),
        }),
        None => Err(DatadocError::UnknownModelVersion {
            version: "null".to_string(),
        }),
    }
}

fn stamp_version(document: &mut Value, version: &str) {
    let container = is_container(document);
    let target = if container {
        document.get_mut(DocumentConfig::DATADOC_KEY)
    } else {
        Some(document)
    };
    if let Some(Value::Object(map)) = target {
        map.insert(
            DocumentConfig::VERSION_FIELD_NAME.to_string(),
            Value::String(version.to_string()),
        );
    }
}
