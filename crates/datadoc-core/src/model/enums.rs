//! Enumerated vocabularies of the metadata schema.

use serde::{Deserialize, Serialize};

/// Lifecycle of the metadata itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DataSetStatus {
    Draft,
    Internal,
    External,
    Deprecated,
}

/// Processing state of a dataset in the production pipeline.
///
/// Declaration order is the order in which path directories are matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DataSetState {
    SourceData,
    InputData,
    ProcessedData,
    Statistics,
    OutputData,
}

impl DataSetState {
    pub const ALL: [DataSetState; 5] = [
        DataSetState::SourceData,
        DataSetState::InputData,
        DataSetState::ProcessedData,
        DataSetState::Statistics,
        DataSetState::OutputData,
    ];

    /// Norwegian (bokmål) display name, which is also the folder name.
    pub fn norwegian_name(&self) -> &'static str {
        match self {
            DataSetState::SourceData => "Kildedata",
            DataSetState::InputData => "Inndata",
            DataSetState::ProcessedData => "Klargjorte data",
            DataSetState::Statistics => "Statistikk",
            DataSetState::OutputData => "Utdata",
        }
    }

    /// Accepted folder spellings: lowercase, spaces as hyphen or underscore.
    pub fn folder_names(&self) -> [String; 2] {
        let name = self.norwegian_name().to_lowercase();
        [name.replace(' ', "-"), name.replace(' ', "_")]
    }

    /// Default assessment for data in this state.
    pub fn default_assessment(&self) -> Option<Assessment> {
        match self {
            DataSetState::SourceData => Some(Assessment::Sensitive),
            DataSetState::InputData | DataSetState::ProcessedData | DataSetState::Statistics => {
                Some(Assessment::Protected)
            }
            DataSetState::OutputData => None,
        }
    }
}

/// Access classification of a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Assessment {
    Sensitive,
    Protected,
    Open,
}

/// Simplified data type of a variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DataType {
    String,
    Integer,
    Float,
    Datetime,
    Boolean,
}

const INTEGER_TYPES: &[&str] = &[
    "int", "int_", "int8", "int16", "int32", "int64", "integer", "long", "short", "uint",
    "uint8", "uint16", "uint32", "uint64",
];
const FLOAT_TYPES: &[&str] = &[
    "double", "float", "float_", "float16", "float32", "float64", "decimal", "number", "numeric",
    "num",
];
const STRING_TYPES: &[&str] = &[
    "string", "large_string", "utf8", "large_utf8", "str", "char", "varchar", "text", "txt",
    "bytes", "binary",
];
const DATETIME_TYPES: &[&str] = &[
    "timestamp", "datetime", "datetime64", "date", "date32", "date64", "time",
];
const BOOLEAN_TYPES: &[&str] = &["bool", "bool_", "boolean"];

impl DataType {
    /// Map a storage engine type name onto the simplified data type.
    ///
    /// Case insensitive; parameterised names such as `timestamp[us]`,
    /// `datetime64[ns, UTC]` or `string[pyarrow]` match on their base name.
    pub fn from_schema_type(type_name: &str) -> Option<DataType> {
        let lowered = type_name.trim().to_lowercase();
        let base = lowered
            .split(|c| c == '[' || c == '(')
            .next()
            .unwrap_or_default()
            .trim();

        if INTEGER_TYPES.contains(&base) {
            Some(DataType::Integer)
        } else if FLOAT_TYPES.contains(&base) {
            Some(DataType::Float)
        } else if STRING_TYPES.contains(&base) {
            Some(DataType::String)
        } else if DATETIME_TYPES.contains(&base) {
            Some(DataType::Datetime)
        } else if BOOLEAN_TYPES.contains(&base) {
            Some(DataType::Boolean)
        } else {
            None
        }
    }
}

/// Role a variable plays in the dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VariableRole {
    Identifier,
    Measure,
    StartTime,
    StopTime,
    Attribute,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TemporalityType {
    Fixed,
    Status,
    Accumulated,
    Event,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UseRestrictionType {
    DeletionAnonymization,
    ProcessLimitations,
    SecondaryUseRestrictions,
}
