//! Dataset-level metadata record.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::{Assessment, DataSetState, DataSetStatus, TemporalityType, UseRestrictionType};
use super::language::LanguageStrings;

/// A restriction on how the dataset may be used, optionally time-bound.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UseRestriction {
    #[serde(default)]
    pub use_restriction_type: Option<UseRestrictionType>,
    #[serde(default)]
    pub use_restriction_date: Option<NaiveDate>,
}

/// Metadata describing a dataset as a whole.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub short_name: Option<String>,
    #[serde(default)]
    pub assessment: Option<Assessment>,
    #[serde(default)]
    pub dataset_status: Option<DataSetStatus>,
    #[serde(default)]
    pub dataset_state: Option<DataSetState>,
    #[serde(default)]
    pub name: Option<LanguageStrings>,
    #[serde(default)]
    pub description: Option<LanguageStrings>,
    #[serde(default)]
    pub data_source: Option<String>,
    #[serde(default)]
    pub population_description: Option<LanguageStrings>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub version_description: Option<LanguageStrings>,
    #[serde(default)]
    pub unit_type: Option<String>,
    #[serde(default)]
    pub temporality_type: Option<TemporalityType>,
    #[serde(default)]
    pub subject_field: Option<String>,
    #[serde(default)]
    pub keyword: Option<Vec<String>>,
    #[serde(default)]
    pub spatial_coverage_description: Option<LanguageStrings>,
    #[serde(default)]
    pub contains_personal_data: Option<bool>,
    #[serde(default)]
    pub use_restrictions: Option<Vec<UseRestriction>>,
    #[serde(default)]
    pub custom_type: Option<String>,
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub file_path: Option<String>,
    #[serde(default)]
    pub metadata_created_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub metadata_created_by: Option<String>,
    #[serde(default)]
    pub metadata_last_updated_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub metadata_last_updated_by: Option<String>,
    #[serde(default)]
    pub contains_data_from: Option<NaiveDate>,
    #[serde(default)]
    pub contains_data_until: Option<NaiveDate>,
    #[serde(default)]
    pub id: Option<Uuid>,
}
