//! Typed metadata for the current schema version.
//!
//! Documents on disk may be older; they are brought to this shape by
//! [`crate::migration`] before being deserialized into these types.

mod dataset;
mod enums;
mod language;
mod variable;

pub use dataset::{Dataset, UseRestriction};
pub use enums::{
    Assessment, DataSetState, DataSetStatus, DataType, TemporalityType, UseRestrictionType,
    VariableRole,
};
pub use language::{LanguageStringItem, LanguageStrings, SUPPORTED_LANGUAGES};
pub use variable::{Pseudonymization, Variable};

use crate::config::DefaultsConfig;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// A complete metadata snapshot: one dataset and its variables.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatadocMetadata {
    #[serde(default)]
    pub percentage_complete: Option<u32>,
    #[serde(default)]
    pub document_version: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub dataset: Dataset,
    #[serde(default, deserialize_with = "null_as_default")]
    pub variables: Vec<Variable>,
}

impl DatadocMetadata {
    pub fn new(dataset: Dataset, variables: Vec<Variable>) -> Self {
        Self {
            dataset,
            variables,
            ..Default::default()
        }
    }

    /// Index of each variable by short name.
    ///
    /// Short names are not required to be unique; when they collide the
    /// last variable wins. Rebuilt on every call, so it always reflects the
    /// current variable list.
    pub fn variables_lookup(&self) -> HashMap<&str, &Variable> {
        self.variables
            .iter()
            .filter_map(|v| v.short_name.as_deref().map(|name| (name, v)))
            .collect()
    }

    /// Fill identifiers and defaults that every written document must carry.
    pub fn set_default_values(&mut self) {
        if self.dataset.id.is_none() {
            self.dataset.id = Some(Uuid::new_v4());
        }
        if self.dataset.spatial_coverage_description.is_none() {
            self.dataset.spatial_coverage_description = Some(
                DefaultsConfig::SPATIAL_COVERAGE
                    .iter()
                    .copied()
                    .collect(),
            );
        }
        for variable in &mut self.variables {
            if variable.id.is_none() {
                variable.id = Some(Uuid::new_v4());
            }
        }
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
