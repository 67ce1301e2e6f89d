//! Metadata inferred from a dataset path that follows the naming standard.
//!
//! ```text
//! gs://ssb-prod-bucket/grensehandel/klargjorte_data/grensehandel_imputert_p2022-10-01_p2022-12-31_v1.parquet
//!      └── bucket ───┘ └─ subject ─┘ └── state ──┘ └─ short name ──────┘└─ from ───┘└─ until ───┘└ver┘
//! ```
//!
//! Every accessor is a pure function of the path string and is recomputed
//! on each call. Missing or malformed parts yield `None`, never an error.

use chrono::NaiveDate;

use super::formats::{categorize_period, is_period_segment};
use crate::config::PathConfig;
use crate::model::DataSetState;

/// Read-only view over a dataset path string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetPathInfo {
    dataset_string: String,
}

impl DatasetPathInfo {
    pub fn new(dataset_path: impl Into<String>) -> Self {
        Self {
            dataset_string: dataset_path.into(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.dataset_string
    }

    /// Non-empty path components, file name included.
    fn components(path: &str) -> Vec<&str> {
        path.split(['/', '\\']).filter(|c| !c.is_empty()).collect()
    }

    /// Directory components only.
    fn directory_components(path: &str) -> Vec<&str> {
        let mut components = Self::components(path);
        components.pop();
        components
    }

    fn file_stem(&self) -> &str {
        let file_name = self
            .dataset_string
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or_default();
        match file_name.rfind('.') {
            Some(dot) if dot > 0 => &file_name[..dot],
            _ => file_name,
        }
    }

    /// File stem split on underscores.
    pub fn dataset_name_sections(&self) -> Vec<&str> {
        self.file_stem().split('_').collect()
    }

    fn period_segment_indices(&self) -> Vec<usize> {
        self.dataset_name_sections()
            .iter()
            .enumerate()
            .filter(|(_, section)| is_period_segment(section))
            .map(|(i, _)| i)
            .collect()
    }

    /// Period tokens in order of appearance, without their `p` prefix.
    pub fn period_strings(&self) -> Vec<&str> {
        let sections = self.dataset_name_sections();
        self.period_segment_indices()
            .into_iter()
            .map(|i| &sections[i][1..])
            .collect()
    }

    /// First and optional second period token, unless they are misordered.
    fn ordered_period_tokens(&self) -> Option<(&str, Option<&str>)> {
        let periods = self.period_strings();
        let first = *periods.first()?;
        let second = periods.get(1).copied();
        match second {
            Some(second) if second < first => None,
            _ => Some((first, second)),
        }
    }

    /// First date covered by the dataset.
    pub fn contains_data_from(&self) -> Option<NaiveDate> {
        let (first, _) = self.ordered_period_tokens()?;
        categorize_period(first)?.floor(first)
    }

    /// Last date covered by the dataset.
    ///
    /// Evaluated independently of [`Self::contains_data_from`], so one may be
    /// present while the other is not.
    pub fn contains_data_until(&self) -> Option<NaiveDate> {
        let (first, second) = self.ordered_period_tokens()?;
        let last = second.unwrap_or(first);
        categorize_period(last)?.ceil(last)
    }

    /// Processing state encoded as a directory name.
    pub fn dataset_state(&self) -> Option<DataSetState> {
        let directories = Self::directory_components(&self.dataset_string);
        DataSetState::ALL.into_iter().find(|state| {
            state
                .folder_names()
                .iter()
                .any(|name| directories.contains(&name.as_str()))
        })
    }

    /// Digits of a trailing `v<digits>` segment.
    pub fn dataset_version(&self) -> Option<String> {
        let sections = self.dataset_name_sections();
        let last = sections.last()?;
        let digits = last.strip_prefix(PathConfig::VERSION_PREFIX)?;
        if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) {
            Some(digits.to_string())
        } else {
            None
        }
    }

    /// File stem without period and version segments.
    pub fn dataset_short_name(&self) -> Option<String> {
        let sections = self.dataset_name_sections();
        let period_indices = self.period_segment_indices();
        let short_name_sections = if let Some(first_period) = period_indices.iter().min() {
            &sections[..*first_period]
        } else if self.dataset_version().is_some() {
            &sections[..sections.len() - 1]
        } else {
            &sections[..]
        };
        let short_name = short_name_sections.join("_");
        (!short_name.is_empty()).then_some(short_name)
    }

    /// Path components after the bucket marker, file name included.
    ///
    /// The marker is either a `gs://` (or `gs:/`) prefix of the whole path
    /// or a `buckets` directory component.
    fn after_bucket_marker(&self) -> Option<Vec<&str>> {
        let path = self.dataset_string.as_str();
        if let Some(rest) = path
            .strip_prefix(PathConfig::GS_PREFIX)
            .or_else(|| path.strip_prefix(PathConfig::GS_PREFIX_SINGLE_SLASH))
        {
            return Some(Self::components(rest));
        }

        let directories = Self::directory_components(path);
        let marker = directories
            .iter()
            .position(|d| *d == PathConfig::BUCKETS_SEGMENT)?;
        let mut components = Self::components(path);
        Some(components.split_off(marker + 1))
    }

    /// Name of the storage bucket holding the dataset.
    pub fn bucket_name(&self) -> Option<String> {
        self.after_bucket_marker()?
            .first()
            .map(|c| c.to_string())
    }

    /// Short name of the statistic (subject area) owning the dataset.
    pub fn statistic_short_name(&self) -> Option<String> {
        let after_marker = self.after_bucket_marker();
        let directories = match &after_marker {
            Some(components) => components[..components.len().saturating_sub(1)].to_vec(),
            None => Self::directory_components(&self.dataset_string),
        };

        let Some(state) = self.dataset_state() else {
            // Without a state folder the subject area directly follows the bucket.
            if after_marker.is_none() {
                return None;
            }
            return directories.get(1).map(|c| c.to_string());
        };

        let state_index = state
            .folder_names()
            .iter()
            .find_map(|name| directories.iter().position(|d| d == name))?;

        // With a bucket marker, directories[0] is the bucket itself.
        let first_candidate = usize::from(after_marker.is_some());
        if state_index <= first_candidate {
            return None;
        }
        Some(directories[state_index - 1].to_string())
    }

    /// True when state, subject area, both validity bounds and version are all present.
    pub fn path_complies_with_naming_standard(&self) -> bool {
        self.dataset_state().is_some()
            && self.statistic_short_name().is_some()
            && self.contains_data_from().is_some()
            && self.contains_data_until().is_some()
            && self.dataset_version().is_some()
    }
}
