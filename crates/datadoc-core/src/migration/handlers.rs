//! One handler per schema version, each turning the previous version's tree
//! into its own.
//!
//! Handlers are total: a key that is missing or has an unexpected shape is
//! left alone rather than rejected. They never stamp `document_version`;
//! the registry does that after each step.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde_json::{json, Map, Value};
use std::collections::HashMap;

use super::is_container;
use crate::config::DocumentConfig;
use crate::model::SUPPORTED_LANGUAGES;

const PSEUDONYMIZATION_FIELDS: &[&str] = &[
    "stable_identifier_type",
    "stable_identifier_version",
    "encryption_algorithm",
    "encryption_key_reference",
    "encryption_algorithm_parameters",
];

const PERSONAL_DATA_VALUES: &[&str] = &[
    "NON_PSEUDONYMISED_ENCRYPTED_PERSONAL_DATA",
    "PSEUDONYMISED_ENCRYPTED_PERSONAL_DATA",
];
const NOT_PERSONAL_DATA: &str = "NOT_PERSONAL_DATA";

// ----------------------------------------------------------------------
// Tree access
// ----------------------------------------------------------------------

fn datadoc_mut(document: &mut Value) -> Option<&mut Map<String, Value>> {
    let container = is_container(document);
    let root = document.as_object_mut()?;
    if container {
        root.get_mut(DocumentConfig::DATADOC_KEY)?.as_object_mut()
    } else {
        Some(root)
    }
}

fn dataset_mut(document: &mut Value) -> Option<&mut Map<String, Value>> {
    datadoc_mut(document)?.get_mut("dataset")?.as_object_mut()
}

fn variables_mut(document: &mut Value) -> Vec<&mut Map<String, Value>> {
    datadoc_mut(document)
        .and_then(|datadoc| datadoc.get_mut("variables"))
        .and_then(Value::as_array_mut)
        .map(|vars| vars.iter_mut().filter_map(Value::as_object_mut).collect())
        .unwrap_or_default()
}

fn is_missing(record: &Map<String, Value>, key: &str) -> bool {
    record.get(key).map_or(true, Value::is_null)
}

fn rename_key(record: &mut Map<String, Value>, old: &str, new: &str) {
    if let Some(value) = record.shift_remove(old) {
        record.insert(new.to_string(), value);
    }
}

fn blank_strings_to_null(value: &mut Value) {
    match value {
        Value::String(s) if s.is_empty() => *value = Value::Null,
        Value::Array(items) => items.iter_mut().for_each(blank_strings_to_null),
        Value::Object(map) => map.values_mut().for_each(blank_strings_to_null),
        _ => {}
    }
}

/// `{"nb": .., "nn": .., "en": ..}` with no other keys.
fn is_language_keyed(value: &Value) -> bool {
    value.as_object().is_some_and(|map| {
        !map.is_empty() && map.keys().all(|k| SUPPORTED_LANGUAGES.contains(&k.as_str()))
    })
}

/// First non-empty text of a language-keyed object, preferring bokmål.
fn first_language_text(value: &Value) -> Value {
    SUPPORTED_LANGUAGES
        .iter()
        .filter_map(|lang| value.get(*lang).and_then(Value::as_str))
        .find(|text| !text.is_empty())
        .map_or(Value::Null, |text| Value::String(text.to_string()))
}

fn collapse_language_keyed(record: &mut Map<String, Value>, key: &str) {
    if let Some(value) = record.get_mut(key) {
        if is_language_keyed(value) {
            *value = first_language_text(value);
        }
    }
}

/// Language-keyed object to a list of `{languageCode, languageText}`.
fn language_keyed_to_list(value: &Value) -> Value {
    let items: Vec<Value> = value
        .as_object()
        .into_iter()
        .flatten()
        .filter_map(|(code, text)| {
            text.as_str()
                .map(|text| json!({"languageCode": code, "languageText": text}))
        })
        .collect();
    Value::Array(items)
}

fn convert_language_strings(record: &mut Map<String, Value>) {
    for value in record.values_mut() {
        if is_language_keyed(value) {
            *value = language_keyed_to_list(value);
        }
    }
}

/// Collapse a `{languageCode, languageText}` list to its first non-empty text.
fn collapse_language_list(record: &mut Map<String, Value>, key: &str) {
    if let Some(Value::Array(items)) = record.get(key) {
        let text = items
            .iter()
            .filter_map(|item| item.get("languageText").and_then(Value::as_str))
            .find(|text| !text.is_empty())
            .map_or(Value::Null, |text| Value::String(text.to_string()));
        record.insert(key.to_string(), text);
    }
}

fn normalize_timestamp(raw: &str) -> Option<String> {
    let parsed = DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").map(|naive| naive.and_utc())
        })
        .ok()?;
    Some(parsed.to_rfc3339_opts(SecondsFormat::Secs, false))
}

fn truncate_to_date(value: &mut Value) {
    let Some(raw) = value.as_str() else {
        return;
    };
    if let Some(date) = raw
        .get(..10)
        .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
    {
        *value = Value::String(date.format("%Y-%m-%d").to_string());
    }
}

// ----------------------------------------------------------------------
// Steps
// ----------------------------------------------------------------------

pub(crate) fn baseline(document: Value) -> Value {
    document
}

/// Audit fields gain a `metadata_` prefix; empty strings become null.
pub(crate) fn upgrade_to_1_0_0(mut document: Value) -> Value {
    if let Some(dataset) = dataset_mut(&mut document) {
        for (old, new) in [
            ("created_date", "metadata_created_date"),
            ("created_by", "metadata_created_by"),
            ("last_updated_date", "metadata_last_updated_date"),
            ("last_updated_by", "metadata_last_updated_by"),
        ] {
            rename_key(dataset, old, new);
        }
        dataset.values_mut().for_each(blank_strings_to_null);
    }
    document
}

/// Audit timestamps become UTC with second precision; a plain-string
/// data source becomes an English language string.
pub(crate) fn upgrade_to_2_1_0(mut document: Value) -> Value {
    if let Some(dataset) = dataset_mut(&mut document) {
        for field in ["metadata_created_date", "metadata_last_updated_date"] {
            if let Some(value) = dataset.get_mut(field) {
                if let Some(normalized) = value.as_str().and_then(normalize_timestamp) {
                    *value = Value::String(normalized);
                }
            }
        }
        if let Some(value) = dataset.get_mut("data_source") {
            if value.is_string() {
                *value = json!({ "en": value.take() });
            }
        }
    }
    document
}

/// Owner collapses to a single text and the document moves into a container.
pub(crate) fn upgrade_to_2_2_0(mut document: Value) -> Value {
    if let Some(dataset) = dataset_mut(&mut document) {
        collapse_language_keyed(dataset, "owner");
    }
    if is_container(&document) {
        return document;
    }
    let mut root = Map::new();
    root.insert(
        DocumentConfig::VERSION_FIELD_NAME.to_string(),
        Value::String(DocumentConfig::CONTAINER_VERSION.to_string()),
    );
    root.insert(DocumentConfig::DATADOC_KEY.to_string(), document);
    root.insert(DocumentConfig::PSEUDONYMIZATION_KEY.to_string(), Value::Null);
    Value::Object(root)
}

/// Subject field collapses to a single text, custom fields appear, and
/// language-keyed objects become lists of language strings.
pub(crate) fn upgrade_to_3_1_0(mut document: Value) -> Value {
    if let Some(dataset) = dataset_mut(&mut document) {
        collapse_language_keyed(dataset, "subject_field");
        dataset.entry("custom_type").or_insert(Value::Null);
        convert_language_strings(dataset);
    }
    for variable in variables_mut(&mut document) {
        variable.entry("special_value").or_insert(Value::Null);
        variable.entry("custom_type").or_insert(Value::Null);
        convert_language_strings(variable);
    }
    document
}

/// Data source goes back to a single text.
pub(crate) fn upgrade_to_3_2_0(mut document: Value) -> Value {
    if let Some(dataset) = dataset_mut(&mut document) {
        collapse_language_list(dataset, "data_source");
    }
    for variable in variables_mut(&mut document) {
        collapse_language_list(variable, "data_source");
    }
    document
}

/// Validity bounds become plain dates.
pub(crate) fn upgrade_to_3_3_0(mut document: Value) -> Value {
    let bounds = ["contains_data_from", "contains_data_until"];
    if let Some(dataset) = dataset_mut(&mut document) {
        for field in bounds {
            truncate_to_date(dataset.entry(field).or_insert(Value::Null));
        }
    }
    for variable in variables_mut(&mut document) {
        for field in bounds {
            truncate_to_date(variable.entry(field).or_insert(Value::Null));
        }
    }
    document
}

/// Dataset-level facts are copied onto variables that lack their own value.
pub(crate) fn upgrade_to_4_0_0(mut document: Value) -> Value {
    let hoisted = [
        "contains_data_from",
        "contains_data_until",
        "data_source",
        "temporality_type",
        "population_description",
    ];
    let fallbacks: Vec<(&str, Value)> = dataset_mut(&mut document)
        .map(|dataset| {
            hoisted
                .iter()
                .map(|field| (*field, dataset.get(*field).cloned().unwrap_or(Value::Null)))
                .collect()
        })
        .unwrap_or_default();

    for variable in variables_mut(&mut document) {
        for (field, fallback) in &fallbacks {
            if is_missing(variable, field) {
                variable.insert(field.to_string(), fallback.clone());
            }
        }
    }
    document
}

/// Use restriction and its date become a list of restriction records;
/// the personal identification flag becomes a personal data category.
pub(crate) fn upgrade_to_5_0_1(mut document: Value) -> Value {
    if let Some(dataset) = dataset_mut(&mut document) {
        let restriction = dataset.shift_remove("use_restriction").unwrap_or(Value::Null);
        let restriction_date = dataset
            .shift_remove("use_restriction_date")
            .unwrap_or(Value::Null);
        if !dataset.contains_key("use_restrictions") {
            let restrictions = if restriction.is_null() && restriction_date.is_null() {
                json!([])
            } else {
                json!([{
                    "use_restriction_type": restriction,
                    "use_restriction_date": restriction_date,
                }])
            };
            dataset.insert("use_restrictions".to_string(), restrictions);
        }
    }
    for variable in variables_mut(&mut document) {
        let Some(identifying) = variable.shift_remove("direct_person_identifying") else {
            continue;
        };
        let category = match identifying {
            Value::Bool(true) => Value::String(PERSONAL_DATA_VALUES[0].to_string()),
            Value::Bool(false) => Value::String(NOT_PERSONAL_DATA.to_string()),
            other => other,
        };
        variable
            .entry("is_personal_data")
            .or_insert(category);
    }
    document
}

/// Pseudonymization moves from its sibling sub-tree onto the variables it
/// describes, and the personal data category becomes a flag.
pub(crate) fn upgrade_to_6_0_0(mut document: Value) -> Value {
    let sibling = document
        .as_object_mut()
        .and_then(|root| root.shift_remove(DocumentConfig::PSEUDONYMIZATION_KEY));

    let pseudo_variables: HashMap<String, Map<String, Value>> = sibling
        .as_ref()
        .and_then(|p| p.get("pseudo_variables"))
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(|var| {
            let short_name = var.get("short_name")?.as_str()?.to_string();
            let fields = PSEUDONYMIZATION_FIELDS
                .iter()
                .filter_map(|key| var.get(*key).map(|v| (key.to_string(), v.clone())))
                .collect();
            Some((short_name, fields))
        })
        .collect();

    for variable in variables_mut(&mut document) {
        if let Some(fields) = variable
            .get("short_name")
            .and_then(Value::as_str)
            .and_then(|name| pseudo_variables.get(name))
        {
            variable.insert(
                "pseudonymization".to_string(),
                Value::Object(fields.clone()),
            );
        }

        if let Some(value) = variable.get_mut("is_personal_data") {
            let coerced = match value.as_str() {
                Some(s) if PERSONAL_DATA_VALUES.contains(&s) => Some(true),
                Some(NOT_PERSONAL_DATA) => Some(false),
                _ => None,
            };
            if let Some(flag) = coerced {
                *value = Value::Bool(flag);
            }
        }
    }
    document
}
