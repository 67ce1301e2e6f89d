//! Metadata document files on disk.
//!
//! Writes are atomic:
//! 1. Write to a temp file with a unique PID+TID suffix
//! 2. Sync to ensure data reaches disk
//! 3. Optionally back up the previous document
//! 4. Rename the temp file over the target

use serde::Serialize;
use serde_json::{Map, Value};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process;
use std::thread;
use tracing::{debug, warn};

use crate::config::DocumentConfig;
use crate::error::{DatadocError, Result};
use crate::migration::SchemaVersion;
use crate::model::DatadocMetadata;

/// Path of the metadata document that belongs to a dataset.
///
/// `/data/person_data_v1.parquet` is documented by
/// `/data/person_data_v1__DOC.json`.
pub fn document_path_for(dataset_path: &Path) -> PathBuf {
    let stem = dataset_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let file_name = format!("{}{}", stem, DocumentConfig::METADATA_DOCUMENT_SUFFIX);
    match dataset_path.parent() {
        Some(parent) => parent.join(file_name),
        None => PathBuf::from(file_name),
    }
}

/// Read a metadata document as an untyped tree.
///
/// Returns `None` if the file doesn't exist, and
/// [`DatadocError::MalformedDocument`] if it is not valid JSON.
pub fn read_document(path: &Path) -> Result<Option<Value>> {
    if !path.exists() {
        return Ok(None);
    }

    let contents = fs::read_to_string(path).map_err(|e| DatadocError::io_with_path(e, path))?;
    let document = serde_json::from_str(&contents).map_err(|e| DatadocError::MalformedDocument {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    debug!("Read metadata document {}", path.display());
    Ok(Some(document))
}

/// Typed metadata from an upgraded document tree.
///
/// Returns `None` for a container whose `datadoc` content has been removed.
pub fn metadata_from_document(document: Value) -> Result<Option<DatadocMetadata>> {
    let datadoc = match document {
        Value::Object(mut root) if root.contains_key(DocumentConfig::DATADOC_KEY) => {
            root.shift_remove(DocumentConfig::DATADOC_KEY).unwrap_or(Value::Null)
        }
        other => other,
    };
    if datadoc.is_null() {
        return Ok(None);
    }
    Ok(Some(serde_json::from_value(datadoc)?))
}

/// The on-disk container for a metadata snapshot at the current version.
pub fn container_document(metadata: &DatadocMetadata, percentage_complete: u32) -> Result<Value> {
    let mut datadoc = match serde_json::to_value(metadata)? {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    datadoc.insert(
        DocumentConfig::PERCENTAGE_COMPLETE_KEY.to_string(),
        Value::from(percentage_complete),
    );
    datadoc.insert(
        DocumentConfig::VERSION_FIELD_NAME.to_string(),
        Value::String(SchemaVersion::CURRENT.as_str().to_string()),
    );

    let mut root = Map::new();
    root.insert(
        DocumentConfig::VERSION_FIELD_NAME.to_string(),
        Value::String(DocumentConfig::CONTAINER_VERSION.to_string()),
    );
    root.insert(DocumentConfig::DATADOC_KEY.to_string(), Value::Object(datadoc));
    Ok(Value::Object(root))
}

/// Write data to a JSON file atomically.
pub fn atomic_write_json<T: Serialize>(path: &Path, data: &T, keep_backup: bool) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| DatadocError::Io {
                message: format!("Failed to create directory {}", parent.display()),
                path: Some(parent.to_path_buf()),
                source: Some(e),
            })?;
        }
    }

    let temp_path = path.with_extension(format!("json.{}.{}.tmp", process::id(), thread_id()));

    let serialized = serde_json::to_string_pretty(data).map_err(|e| DatadocError::Json {
        message: format!("Failed to serialize {}: {}", path.display(), e),
        source: Some(e),
    })?;

    {
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_path)
            .map_err(|e| DatadocError::Io {
                message: format!("Failed to create temp file {}", temp_path.display()),
                path: Some(temp_path.clone()),
                source: Some(e),
            })?;

        file.write_all(serialized.as_bytes())
            .and_then(|_| file.sync_all())
            .map_err(|e| DatadocError::Io {
                message: format!("Failed to write temp file {}", temp_path.display()),
                path: Some(temp_path.clone()),
                source: Some(e),
            })?;
    }

    if keep_backup && path.exists() {
        let backup_path = path.with_extension("json.bak");
        if let Err(e) = fs::copy(path, &backup_path) {
            // Not fatal; the new document is still written.
            warn!("Failed to create backup {}: {}", backup_path.display(), e);
        } else {
            debug!("Created backup: {}", backup_path.display());
        }
    }

    fs::rename(&temp_path, path).map_err(|e| DatadocError::Io {
        message: format!(
            "Failed to rename {} to {}",
            temp_path.display(),
            path.display()
        ),
        path: Some(path.to_path_buf()),
        source: Some(e),
    })?;

    debug!("Atomically wrote {}", path.display());
    Ok(())
}

fn thread_id() -> u64 {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};
    let mut hasher = DefaultHasher::new();
    format!("{:?}", thread::current().id()).hash(&mut hasher);
    hasher.finish()
}
