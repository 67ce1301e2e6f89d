//! Datadoc Core - Headless library for documenting statistical datasets.
//!
//! This crate provides the core of the metadata workflow: inferring facts
//! from dataset paths that follow the naming standard, upgrading metadata
//! documents written by older schema versions, and reconciling a dataset
//! with its existing document. It can be used programmatically without any
//! UI or network layer.
//!
//! # Example
//!
//! ```rust,ignore
//! use datadoc_core::{Datadoc, DatadocSettings, SchemaField, StaticSchemaReader};
//! use std::path::Path;
//!
//! fn main() -> datadoc_core::Result<()> {
//!     let reader = StaticSchemaReader::new(vec![SchemaField::new("fnr", "string")]);
//!     let dataset = Path::new("/buckets/produkt/ifpn/klargjorte_data/person_data_p2021_v1.parquet");
//!
//!     let mut datadoc = Datadoc::open(dataset, None, &reader, DatadocSettings::from_env())?;
//!     println!("{}% documented", datadoc.percent_complete());
//!     datadoc.write_metadata_document()?;
//!     Ok(())
//! }
//! ```

pub mod completeness;
pub mod config;
pub mod consistency;
pub mod document;
pub mod error;
pub mod extract;
pub mod logging;
pub mod migration;
pub mod model;
pub mod path;

mod datadoc;

// Re-export commonly used types
pub use completeness::{missing_obligatory_fields, percent_complete};
pub use config::DatadocSettings;
pub use consistency::{check_consistency, merge, ready_to_merge, ConsistencyReport};
pub use datadoc::Datadoc;
pub use error::{DatadocError, Result};
pub use extract::{extract_metadata, DatasetSchemaReader, SchemaField, StaticSchemaReader};
pub use migration::{upgrade_metadata, SchemaVersion, VersionRegistry};
pub use model::{DatadocMetadata, Dataset, Variable};
pub use path::{categorize_period, DatasetPathInfo, PeriodFormat};
