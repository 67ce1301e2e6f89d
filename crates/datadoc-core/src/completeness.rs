//! How much of the obligatory documentation has been filled in.

use crate::model::{DatadocMetadata, Dataset, LanguageStrings, Variable};

/// Obligatory dataset fields, in display order.
pub const OBLIGATORY_DATASET_FIELDS: &[&str] = &[
    "assessment",
    "dataset_state",
    "dataset_status",
    "name",
    "description",
    "population_description",
    "version",
    "version_description",
    "unit_type",
    "temporality_type",
    "subject_field",
    "spatial_coverage_description",
    "owner",
    "contains_data_from",
    "contains_data_until",
];

/// Obligatory fields of every variable, in display order.
pub const OBLIGATORY_VARIABLE_FIELDS: &[&str] = &[
    "name",
    "data_type",
    "variable_role",
    "definition_uri",
    "is_personal_data",
    "data_source",
    "population_description",
    "temporality_type",
];

fn text_is_set(value: &Option<LanguageStrings>) -> bool {
    value.as_ref().is_some_and(|v| !v.is_blank())
}

fn string_is_set(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

fn dataset_field_is_set(dataset: &Dataset, field: &str) -> bool {
    match field {
        "assessment" => dataset.assessment.is_some(),
        "dataset_state" => dataset.dataset_state.is_some(),
        "dataset_status" => dataset.dataset_status.is_some(),
        "name" => text_is_set(&dataset.name),
        "description" => text_is_set(&dataset.description),
        "population_description" => text_is_set(&dataset.population_description),
        "version" => string_is_set(&dataset.version),
        "version_description" => text_is_set(&dataset.version_description),
        "unit_type" => string_is_set(&dataset.unit_type),
        "temporality_type" => dataset.temporality_type.is_some(),
        "subject_field" => string_is_set(&dataset.subject_field),
        "spatial_coverage_description" => text_is_set(&dataset.spatial_coverage_description),
        "owner" => string_is_set(&dataset.owner),
        "contains_data_from" => dataset.contains_data_from.is_some(),
        "contains_data_until" => dataset.contains_data_until.is_some(),
        _ => false,
    }
}

fn variable_field_is_set(variable: &Variable, field: &str) -> bool {
    match field {
        "name" => text_is_set(&variable.name),
        "data_type" => variable.data_type.is_some(),
        "variable_role" => variable.variable_role.is_some(),
        "definition_uri" => string_is_set(&variable.definition_uri),
        "is_personal_data" => variable.is_personal_data.is_some(),
        "data_source" => string_is_set(&variable.data_source),
        "population_description" => text_is_set(&variable.population_description),
        "temporality_type" => variable.temporality_type.is_some(),
        _ => false,
    }
}

/// Percentage of obligatory fields that are set, rounded to the nearest integer.
pub fn percent_complete(metadata: &DatadocMetadata) -> u32 {
    let dataset_set = OBLIGATORY_DATASET_FIELDS
        .iter()
        .filter(|f| dataset_field_is_set(&metadata.dataset, f))
        .count();
    let variables_set: usize = metadata
        .variables
        .iter()
        .map(|v| {
            OBLIGATORY_VARIABLE_FIELDS
                .iter()
                .filter(|f| variable_field_is_set(v, f))
                .count()
        })
        .sum();

    let total = OBLIGATORY_DATASET_FIELDS.len()
        + OBLIGATORY_VARIABLE_FIELDS.len() * metadata.variables.len();
    let set = dataset_set + variables_set;
    ((set as f64 / total as f64) * 100.0).round() as u32
}

/// Obligatory fields that are still missing.
///
/// Dataset fields are reported by name, variable fields as
/// `<short_name>.<field>`.
pub fn missing_obligatory_fields(metadata: &DatadocMetadata) -> Vec<String> {
    let mut missing: Vec<String> = OBLIGATORY_DATASET_FIELDS
        .iter()
        .filter(|f| !dataset_field_is_set(&metadata.dataset, f))
        .map(|f| f.to_string())
        .collect();

    for variable in &metadata.variables {
        let short_name = variable.short_name.as_deref().unwrap_or("<unnamed>");
        missing.extend(
            OBLIGATORY_VARIABLE_FIELDS
                .iter()
                .filter(|f| !variable_field_is_set(variable, f))
                .map(|f| format!("{}.{}", short_name, f)),
        );
    }
    missing
}
