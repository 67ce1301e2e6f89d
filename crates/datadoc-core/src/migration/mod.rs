//! Schema migration for metadata documents.
//!
//! Documents on disk carry the schema version that wrote them. Opening an
//! older document runs every step registered after that version, in order,
//! until the document matches [`SchemaVersion::CURRENT`].
//!
//! - `version` - the known versions and the step that produces each
//! - `handlers` - the steps themselves, one per version
//! - `registry` - the ordered chain and the upgrade loop

mod handlers;
mod registry;
mod version;

pub use registry::{upgrade_metadata, BackwardsCompatibleVersion, VersionRegistry};
pub use version::{Handler, SchemaVersion};

use crate::config::DocumentConfig;
use serde_json::Value;

/// Whether the document wraps its metadata in a `datadoc` sub-tree.
pub(crate) fn is_container(document: &Value) -> bool {
    document
        .as_object()
        .is_some_and(|root| root.contains_key(DocumentConfig::DATADOC_KEY))
}
