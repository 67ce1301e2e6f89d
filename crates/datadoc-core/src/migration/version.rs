//! Known schema versions of the metadata document.

use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use super::handlers;
use crate::error::DatadocError;

/// Transformation from the previous version's shape to this version's shape.
pub type Handler = fn(Value) -> Value;

/// Every schema version this build can read, oldest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SchemaVersion {
    V0_1_1,
    V1_0_0,
    V2_1_0,
    V2_2_0,
    V3_1_0,
    V3_2_0,
    V3_3_0,
    V4_0_0,
    V5_0_1,
    V6_0_0,
}

impl SchemaVersion {
    pub const ALL: [SchemaVersion; 10] = [
        SchemaVersion::V0_1_1,
        SchemaVersion::V1_0_0,
        SchemaVersion::V2_1_0,
        SchemaVersion::V2_2_0,
        SchemaVersion::V3_1_0,
        SchemaVersion::V3_2_0,
        SchemaVersion::V3_3_0,
        SchemaVersion::V4_0_0,
        SchemaVersion::V5_0_1,
        SchemaVersion::V6_0_0,
    ];

    /// The version written by this build.
    pub const CURRENT: SchemaVersion = SchemaVersion::V6_0_0;

    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaVersion::V0_1_1 => "0.1.1",
            SchemaVersion::V1_0_0 => "1.0.0",
            SchemaVersion::V2_1_0 => "2.1.0",
            SchemaVersion::V2_2_0 => "2.2.0",
            SchemaVersion::V3_1_0 => "3.1.0",
            SchemaVersion::V3_2_0 => "3.2.0",
            SchemaVersion::V3_3_0 => "3.3.0",
            SchemaVersion::V4_0_0 => "4.0.0",
            SchemaVersion::V5_0_1 => "5.0.1",
            SchemaVersion::V6_0_0 => "6.0.0",
        }
    }

    /// Step that produces this version from its predecessor.
    ///
    /// The oldest version has no predecessor; its handler is the identity.
    pub fn handler(&self) -> Handler {
        match self {
            SchemaVersion::V0_1_1 => handlers::baseline,
            SchemaVersion::V1_0_0 => handlers::upgrade_to_1_0_0,
            SchemaVersion::V2_1_0 => handlers::upgrade_to_2_1_0,
            SchemaVersion::V2_2_0 => handlers::upgrade_to_2_2_0,
            SchemaVersion::V3_1_0 => handlers::upgrade_to_3_1_0,
            SchemaVersion::V3_2_0 => handlers::upgrade_to_3_2_0,
            SchemaVersion::V3_3_0 => handlers::upgrade_to_3_3_0,
            SchemaVersion::V4_0_0 => handlers::upgrade_to_4_0_0,
            SchemaVersion::V5_0_1 => handlers::upgrade_to_5_0_1,
            SchemaVersion::V6_0_0 => handlers::upgrade_to_6_0_0,
        }
    }
}

impl FromStr for SchemaVersion {
    type Err = DatadocError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SchemaVersion::ALL
            .into_iter()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| DatadocError::UnknownModelVersion {
                version: s.to_string(),
            })
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
