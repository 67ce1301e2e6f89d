//! Merge freshly extracted metadata with an existing metadata document.
//!
//! Structure and inferred facts come from the dataset; curated free-text
//! fields come from the document.

use tracing::debug;

use crate::model::{DatadocMetadata, Dataset, Variable};

/// Combine extracted and existing metadata into one snapshot.
pub fn merge(
    extracted: Option<DatadocMetadata>,
    existing: Option<DatadocMetadata>,
) -> DatadocMetadata {
    let (extracted, existing) = match (extracted, existing) {
        (extracted, None) => return extracted.unwrap_or_default(),
        (None, Some(existing)) => return existing,
        (Some(extracted), Some(existing)) => (extracted, existing),
    };

    let dataset = merge_dataset(&extracted.dataset, &existing.dataset);
    let lookup = existing.variables_lookup();

    let mut inherited = 0;
    let variables: Vec<Variable> = extracted
        .variables
        .iter()
        .map(|extracted_var| {
            let previous = extracted_var
                .short_name
                .as_deref()
                .and_then(|name| lookup.get(name));
            match previous {
                Some(previous) => {
                    inherited += 1;
                    merge_variable(extracted_var, previous)
                }
                None => extracted_var.clone(),
            }
        })
        .collect();

    debug!(
        "Merged {} variables, {} inherited from the existing document",
        variables.len(),
        inherited
    );

    DatadocMetadata {
        percentage_complete: existing.percentage_complete,
        document_version: existing.document_version.clone(),
        dataset,
        variables,
    }
}

fn merge_dataset(extracted: &Dataset, existing: &Dataset) -> Dataset {
    let mut merged = extracted.clone();
    merged.dataset_status = existing.dataset_status;
    merged.name = existing.name.clone();
    merged.description = existing.description.clone();
    merged.population_description = existing.population_description.clone();
    merged.subject_field = existing.subject_field.clone();
    merged.keyword = existing.keyword.clone();
    merged.spatial_coverage_description = existing.spatial_coverage_description.clone();
    merged.use_restrictions = existing.use_restrictions.clone();
    merged.custom_type = existing.custom_type.clone();
    merged.owner = existing.owner.clone();
    merged.version_description = existing.version_description.clone();
    merged.metadata_created_date = existing.metadata_created_date;
    merged.metadata_created_by = existing.metadata_created_by.clone();
    merged.metadata_last_updated_date = existing.metadata_last_updated_date;
    merged.metadata_last_updated_by = existing.metadata_last_updated_by.clone();
    merged
}

/// Existing record with a cleared identifier and the extracted validity bounds.
fn merge_variable(extracted: &Variable, existing: &Variable) -> Variable {
    let mut merged = existing.clone();
    merged.id = None;
    if extracted.contains_data_from.is_some() {
        merged.contains_data_from = extracted.contains_data_from;
    }
    if extracted.contains_data_until.is_some() {
        merged.contains_data_until = extracted.contains_data_until;
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DataSetState, DataSetStatus, DataType, LanguageStrings};
    use chrono::{NaiveDate, TimeZone, Utc};
    use uuid::Uuid;

    fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    #[test]
    fn test_merge_without_existing_returns_extracted() {
        let extracted = DatadocMetadata::new(Dataset::default(), vec![Variable::new("a", None)]);
        assert_eq!(merge(Some(extracted.clone()), None), extracted);
        assert_eq!(merge(None, None), DatadocMetadata::default());
    }

    #[test]
    fn test_merge_without_extracted_returns_existing() {
        let existing = DatadocMetadata::new(Dataset::default(), vec![Variable::new("a", None)]);
        assert_eq!(merge(None, Some(existing.clone())), existing);
    }

    #[test]
    fn test_merge_dataset_fields() {
        let extracted = Dataset {
            short_name: Some("ny".to_string()),
            dataset_state: Some(DataSetState::InputData),
            dataset_status: Some(DataSetStatus::Draft),
            contains_data_from: date(2023, 1, 1),
            ..Default::default()
        };
        let existing = Dataset {
            short_name: Some("gammel".to_string()),
            dataset_state: Some(DataSetState::SourceData),
            dataset_status: Some(DataSetStatus::Internal),
            name: Some(LanguageStrings::new().with("nb", "Navn")),
            owner: Some("Seksjon 320".to_string()),
            contains_data_from: date(2020, 1, 1),
            ..Default::default()
        };

        let merged = merge(
            Some(DatadocMetadata::new(extracted, vec![])),
            Some(DatadocMetadata::new(existing, vec![])),
        );

        assert_eq!(merged.dataset.short_name.as_deref(), Some("ny"));
        assert_eq!(merged.dataset.dataset_state, Some(DataSetState::InputData));
        assert_eq!(merged.dataset.contains_data_from, date(2023, 1, 1));
        assert_eq!(merged.dataset.dataset_status, Some(DataSetStatus::Internal));
        assert_eq!(merged.dataset.owner.as_deref(), Some("Seksjon 320"));
        assert_eq!(
            merged.dataset.name.as_ref().and_then(|n| n.get("nb")),
            Some("Navn")
        );
    }

    #[test]
    fn test_merge_keeps_audit_fields() {
        let created = Utc.with_ymd_and_hms(2021, 3, 4, 10, 0, 0).single();
        let updated = Utc.with_ymd_and_hms(2022, 5, 6, 12, 30, 0).single();
        let existing = Dataset {
            metadata_created_date: created,
            metadata_created_by: Some("alice@ssb.no".to_string()),
            metadata_last_updated_date: updated,
            metadata_last_updated_by: Some("bob@ssb.no".to_string()),
            ..Default::default()
        };

        let merged = merge(
            Some(DatadocMetadata::new(Dataset::default(), vec![])),
            Some(DatadocMetadata::new(existing, vec![])),
        );

        let ds = &merged.dataset;
        assert_eq!(ds.metadata_created_date, created);
        assert_eq!(ds.metadata_created_by.as_deref(), Some("alice@ssb.no"));
        assert_eq!(ds.metadata_last_updated_date, updated);
        assert_eq!(ds.metadata_last_updated_by.as_deref(), Some("bob@ssb.no"));
    }

    #[test]
    fn test_merge_variables() {
        let mut a_new = Variable::new("a", Some(DataType::String));
        a_new.id = Some(Uuid::new_v4());
        a_new.contains_data_from = date(2023, 1, 1);
        let c_new = Variable::new("c", Some(DataType::Integer));

        let mut a_old = Variable::new("a", Some(DataType::String));
        a_old.id = Some(Uuid::new_v4());
        a_old.comment = Some(LanguageStrings::new().with("nb", "Kommentar"));
        a_old.contains_data_from = date(2020, 1, 1);
        a_old.contains_data_until = date(2020, 12, 31);

        let merged = merge(
            Some(DatadocMetadata::new(Dataset::default(), vec![a_new, c_new.clone()])),
            Some(DatadocMetadata::new(Dataset::default(), vec![a_old])),
        );

        assert_eq!(merged.variables.len(), 2);
        let a = &merged.variables[0];
        assert_eq!(a.id, None);
        assert_eq!(a.comment.as_ref().and_then(|c| c.get("nb")), Some("Kommentar"));
        assert_eq!(a.contains_data_from, date(2023, 1, 1));
        assert_eq!(a.contains_data_until, date(2020, 12, 31));
        assert_eq!(merged.variables[1], c_new);
    }
}
