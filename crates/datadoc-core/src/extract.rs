//! Metadata extracted from a dataset file and its path.
//!
//! Reading the schema of a dataset file is left to a [`DatasetSchemaReader`];
//! everything else is inferred from the path.

use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::{DatadocError, Result};
use crate::model::{DataSetStatus, DataType, DatadocMetadata, Dataset, Variable};
use crate::path::DatasetPathInfo;

/// One column as reported by the storage engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaField {
    pub name: String,
    /// Engine type name, e.g. `int64` or `timestamp[us]`.
    pub type_name: String,
}

impl SchemaField {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
        }
    }
}

/// Reads the column schema of a dataset file.
pub trait DatasetSchemaReader {
    fn read_schema(&self, path: &Path) -> Result<Vec<SchemaField>>;
}

/// Schema reader for callers that already hold the schema in memory.
#[derive(Debug, Clone, Default)]
pub struct StaticSchemaReader {
    fields: Vec<SchemaField>,
    path: Option<PathBuf>,
}

impl StaticSchemaReader {
    pub fn new(fields: Vec<SchemaField>) -> Self {
        Self { fields, path: None }
    }

    /// Only answer for `path`; any other path is a read error.
    pub fn for_path(path: impl Into<PathBuf>, fields: Vec<SchemaField>) -> Self {
        Self {
            fields,
            path: Some(path.into()),
        }
    }
}

impl DatasetSchemaReader for StaticSchemaReader {
    fn read_schema(&self, path: &Path) -> Result<Vec<SchemaField>> {
        match &self.path {
            Some(expected) if expected != path => Err(DatadocError::DatasetRead {
                path: path.to_path_buf(),
                message: format!("no schema known for this path, only {}", expected.display()),
            }),
            _ => Ok(self.fields.clone()),
        }
    }
}

/// Build metadata for a dataset from its path and column schema.
pub fn extract_metadata(dataset_path: &str, fields: &[SchemaField]) -> DatadocMetadata {
    let info = DatasetPathInfo::new(dataset_path);
    let state = info.dataset_state();
    let contains_data_from = info.contains_data_from();
    let contains_data_until = info.contains_data_until();

    if !info.path_complies_with_naming_standard() {
        debug!("Dataset path does not follow the naming standard: {}", dataset_path);
    }

    let dataset = Dataset {
        short_name: info.dataset_short_name(),
        dataset_state: state,
        assessment: state.and_then(|s| s.default_assessment()),
        dataset_status: Some(DataSetStatus::Draft),
        version: info.dataset_version(),
        contains_data_from,
        contains_data_until,
        file_path: Some(dataset_path.to_string()),
        ..Default::default()
    };

    let variables = fields
        .iter()
        .map(|field| {
            let data_type = DataType::from_schema_type(&field.type_name);
            if data_type.is_none() {
                warn!(
                    "Unknown type '{}' for variable '{}'",
                    field.type_name, field.name
                );
            }
            Variable {
                id: Some(Uuid::new_v4()),
                is_personal_data: Some(false),
                contains_data_from,
                contains_data_until,
                ..Variable::new(field.name.clone(), data_type)
            }
        })
        .collect();

    DatadocMetadata::new(dataset, variables)
}

/// Read the schema with `reader` and extract metadata.
pub fn extract_from_dataset(
    dataset_path: &Path,
    reader: &dyn DatasetSchemaReader,
) -> Result<DatadocMetadata> {
    let fields = reader.read_schema(dataset_path)?;
    debug!(
        "Read {} fields from {}",
        fields.len(),
        dataset_path.display()
    );
    Ok(extract_metadata(&dataset_path.to_string_lossy(), &fields))
}
