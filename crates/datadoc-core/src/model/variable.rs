//! Variable-level metadata record.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::{DataType, TemporalityType, VariableRole};
use super::language::LanguageStrings;

/// How a pseudonymized variable was produced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pseudonymization {
    #[serde(default)]
    pub stable_identifier_type: Option<String>,
    #[serde(default)]
    pub stable_identifier_version: Option<String>,
    #[serde(default)]
    pub encryption_algorithm: Option<String>,
    #[serde(default)]
    pub encryption_key_reference: Option<String>,
    #[serde(default)]
    pub encryption_algorithm_parameters: Option<Vec<serde_json::Map<String, serde_json::Value>>>,
}

/// Metadata describing one column of a dataset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    #[serde(default)]
    pub short_name: Option<String>,
    #[serde(default)]
    pub name: Option<LanguageStrings>,
    #[serde(default)]
    pub data_type: Option<DataType>,
    #[serde(default)]
    pub variable_role: Option<VariableRole>,
    #[serde(default)]
    pub definition_uri: Option<String>,
    #[serde(default)]
    pub is_personal_data: Option<bool>,
    #[serde(default)]
    pub data_source: Option<String>,
    #[serde(default)]
    pub population_description: Option<LanguageStrings>,
    #[serde(default)]
    pub comment: Option<LanguageStrings>,
    #[serde(default)]
    pub temporality_type: Option<TemporalityType>,
    #[serde(default)]
    pub measurement_unit: Option<String>,
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub classification_uri: Option<String>,
    #[serde(default)]
    pub special_value: Option<Vec<String>>,
    #[serde(default)]
    pub invalid_value_description: Option<LanguageStrings>,
    #[serde(default)]
    pub custom_type: Option<String>,
    #[serde(default)]
    pub id: Option<Uuid>,
    #[serde(default)]
    pub contains_data_from: Option<NaiveDate>,
    #[serde(default)]
    pub contains_data_until: Option<NaiveDate>,
    #[serde(default)]
    pub pseudonymization: Option<Pseudonymization>,
}

impl Variable {
    /// A variable known only by name and type, as read from a dataset schema.
    pub fn new(short_name: impl Into<String>, data_type: Option<DataType>) -> Self {
        Self {
            short_name: Some(short_name.into()),
            data_type,
            ..Default::default()
        }
    }
}
