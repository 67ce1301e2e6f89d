//! Documenting one dataset: open, edit, write.
//!
//! Opening a dataset runs, in order:
//! 1. **Read** the existing metadata document, if any, and upgrade it to
//!    the current schema version
//! 2. **Extract** metadata from the dataset's schema and path
//! 3. **Check** the two for consistency and gate the merge
//! 4. **Merge** them and fill in default values

use chrono::{SubsecRound, Utc};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::completeness::{missing_obligatory_fields, percent_complete};
use crate::config::DatadocSettings;
use crate::consistency::{check_consistency, merge, ready_to_merge, ConsistencyReport};
use crate::document::{
    atomic_write_json, container_document, document_path_for, metadata_from_document,
    read_document,
};
use crate::error::Result;
use crate::extract::{extract_from_dataset, DatasetSchemaReader};
use crate::migration::VersionRegistry;
use crate::model::DatadocMetadata;

/// Metadata for one dataset, bound to the document it is written to.
#[derive(Debug, Clone)]
pub struct Datadoc {
    dataset_path: Option<PathBuf>,
    document_path: PathBuf,
    settings: DatadocSettings,
    metadata: DatadocMetadata,
    report: Option<ConsistencyReport>,
}

impl Datadoc {
    /// Open a dataset for documentation.
    ///
    /// `document_path` defaults to the document next to the dataset. An
    /// existing document with an unknown schema version is an error; one
    /// that is not valid JSON is ignored with a warning.
    pub fn open(
        dataset_path: &Path,
        document_path: Option<&Path>,
        reader: &dyn DatasetSchemaReader,
        settings: DatadocSettings,
    ) -> Result<Self> {
        Self::open_with_registry(
            dataset_path,
            document_path,
            reader,
            settings,
            VersionRegistry::shared(),
        )
    }

    /// Like [`Datadoc::open`], upgrading existing documents with `registry`.
    pub fn open_with_registry(
        dataset_path: &Path,
        document_path: Option<&Path>,
        reader: &dyn DatasetSchemaReader,
        settings: DatadocSettings,
        registry: &VersionRegistry,
    ) -> Result<Self> {
        let document_path = document_path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| document_path_for(dataset_path));

        let existing = load_existing(&document_path, registry)?;
        let extracted = extract_from_dataset(dataset_path, reader)?;

        let report = match &existing {
            Some(existing) => {
                let new_path = dataset_path.to_string_lossy();
                let existing_path = existing.dataset.file_path.as_deref().unwrap_or_default();
                let report = check_consistency(&new_path, existing_path, &extracted, existing);
                ready_to_merge(&report, settings.errors_as_warnings)?;
                Some(report)
            }
            None => None,
        };

        let mut metadata = merge(Some(extracted), existing);
        metadata.set_default_values();

        info!(
            "Opened {} with {} variables",
            dataset_path.display(),
            metadata.variables.len()
        );

        Ok(Self {
            dataset_path: Some(dataset_path.to_path_buf()),
            document_path,
            settings,
            metadata,
            report,
        })
    }

    /// Open a metadata document on its own, without its dataset.
    pub fn from_document(document_path: &Path, settings: DatadocSettings) -> Result<Self> {
        Self::from_document_with_registry(document_path, settings, VersionRegistry::shared())
    }

    pub fn from_document_with_registry(
        document_path: &Path,
        settings: DatadocSettings,
        registry: &VersionRegistry,
    ) -> Result<Self> {
        let mut metadata = load_existing(document_path, registry)?.unwrap_or_default();
        metadata.set_default_values();

        info!("Opened metadata document {}", document_path.display());

        Ok(Self {
            dataset_path: None,
            document_path: document_path.to_path_buf(),
            settings,
            metadata,
            report: None,
        })
    }

    pub fn metadata(&self) -> &DatadocMetadata {
        &self.metadata
    }

    pub fn metadata_mut(&mut self) -> &mut DatadocMetadata {
        &mut self.metadata
    }

    /// Consistency report from opening, when there was an existing document.
    pub fn report(&self) -> Option<&ConsistencyReport> {
        self.report.as_ref()
    }

    pub fn dataset_path(&self) -> Option<&Path> {
        self.dataset_path.as_deref()
    }

    pub fn document_path(&self) -> &Path {
        &self.document_path
    }

    pub fn percent_complete(&self) -> u32 {
        percent_complete(&self.metadata)
    }

    pub fn missing_obligatory_fields(&self) -> Vec<String> {
        missing_obligatory_fields(&self.metadata)
    }

    /// Write the metadata to its document at the current schema version.
    ///
    /// Timestamps are recorded to whole seconds.
    pub fn write_metadata_document(&mut self) -> Result<()> {
        let now = Utc::now().trunc_subsecs(0);
        let dataset = &mut self.metadata.dataset;
        if dataset.metadata_created_date.is_none() {
            dataset.metadata_created_date = Some(now);
        }
        if dataset.metadata_created_by.is_none() {
            dataset.metadata_created_by = self.settings.user.clone();
        }
        dataset.metadata_last_updated_date = Some(now);
        dataset.metadata_last_updated_by = self.settings.user.clone();

        let percentage = self.percent_complete();
        self.metadata.percentage_complete = Some(percentage);
        let container = container_document(&self.metadata, percentage)?;
        atomic_write_json(&self.document_path, &container, false)?;

        info!(
            "Wrote metadata document {} ({}% complete)",
            self.document_path.display(),
            percentage
        );
        Ok(())
    }
}

/// Existing metadata upgraded to the current schema, if the document exists
/// and holds any.
fn load_existing(
    document_path: &Path,
    registry: &VersionRegistry,
) -> Result<Option<DatadocMetadata>> {
    let document = match read_document(document_path) {
        Ok(Some(document)) => document,
        Ok(None) => return Ok(None),
        Err(e) if e.is_recoverable() => {
            warn!("Ignoring existing metadata document: {}", e);
            return Ok(None);
        }
        Err(e) => return Err(e),
    };
    let upgraded = registry.upgrade(document)?;
    metadata_from_document(upgraded)
}
