//! Consistency checks between a dataset and its existing metadata document.

use std::collections::HashSet;
use std::fmt;
use tracing::{debug, warn};

use crate::error::{DatadocError, Result};
use crate::model::{DatadocMetadata, DataType};
use crate::path::DatasetPathInfo;

/// The facts compared between the new dataset and the existing document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConsistencyCheckKind {
    BucketName,
    StatisticShortName,
    DatasetState,
    DatasetShortName,
    VariableNames,
    VariableDatatypes,
}

impl ConsistencyCheckKind {
    pub fn name(&self) -> &'static str {
        match self {
            ConsistencyCheckKind::BucketName => "Bucket name",
            ConsistencyCheckKind::StatisticShortName => "Statistic short name",
            ConsistencyCheckKind::DatasetState => "Dataset state",
            ConsistencyCheckKind::DatasetShortName => "Dataset short name",
            ConsistencyCheckKind::VariableNames => "Variable names",
            ConsistencyCheckKind::VariableDatatypes => "Variable datatypes",
        }
    }
}

impl fmt::Display for ConsistencyCheckKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Outcome of one check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConsistencyCheck {
    pub kind: ConsistencyCheckKind,
    pub success: bool,
}

/// Ordered results of every consistency check.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConsistencyReport {
    checks: Vec<ConsistencyCheck>,
}

impl ConsistencyReport {
    pub fn checks(&self) -> &[ConsistencyCheck] {
        &self.checks
    }

    /// Checks that did not pass, in report order.
    pub fn failures(&self) -> impl Iterator<Item = ConsistencyCheckKind> + '_ {
        self.checks.iter().filter(|c| !c.success).map(|c| c.kind)
    }

    pub fn is_consistent(&self) -> bool {
        self.checks.iter().all(|c| c.success)
    }

    pub fn passed(&self, kind: ConsistencyCheckKind) -> Option<bool> {
        self.checks
            .iter()
            .find(|c| c.kind == kind)
            .map(|c| c.success)
    }

    fn push(&mut self, kind: ConsistencyCheckKind, success: bool) {
        debug!("Consistency check '{}': {}", kind, if success { "ok" } else { "failed" });
        self.checks.push(ConsistencyCheck { kind, success });
    }
}

/// Compare a freshly extracted dataset with an existing metadata document.
///
/// Path-derived facts come from the two paths; variable names are compared
/// as sets and data types as sequences, so reordering the same variables
/// passes the first and fails the second.
pub fn check_consistency(
    new_path: &str,
    existing_path: &str,
    extracted: &DatadocMetadata,
    existing: &DatadocMetadata,
) -> ConsistencyReport {
    let new_info = DatasetPathInfo::new(new_path);
    let existing_info = DatasetPathInfo::new(existing_path);
    let mut report = ConsistencyReport::default();

    report.push(
        ConsistencyCheckKind::BucketName,
        new_info.bucket_name() == existing_info.bucket_name(),
    );
    report.push(
        ConsistencyCheckKind::StatisticShortName,
        new_info.statistic_short_name() == existing_info.statistic_short_name(),
    );
    report.push(
        ConsistencyCheckKind::DatasetState,
        new_info.dataset_state() == existing_info.dataset_state(),
    );
    report.push(
        ConsistencyCheckKind::DatasetShortName,
        new_info.dataset_short_name() == existing_info.dataset_short_name(),
    );
    report.push(
        ConsistencyCheckKind::VariableNames,
        variable_names(extracted) == variable_names(existing),
    );
    report.push(
        ConsistencyCheckKind::VariableDatatypes,
        variable_datatypes(extracted) == variable_datatypes(existing),
    );

    report
}

fn variable_names(meta: &DatadocMetadata) -> HashSet<Option<&str>> {
    meta.variables
        .iter()
        .map(|v| v.short_name.as_deref())
        .collect()
}

fn variable_datatypes(meta: &DatadocMetadata) -> Vec<Option<DataType>> {
    meta.variables.iter().map(|v| v.data_type).collect()
}

/// Gate a merge on the outcome of the consistency checks.
///
/// Every failing check is named in one message. With `errors_as_warnings`
/// the message is logged and the merge may go ahead.
pub fn ready_to_merge(report: &ConsistencyReport, errors_as_warnings: bool) -> Result<()> {
    let failures: Vec<&str> = report.failures().map(|k| k.name()).collect();
    if failures.is_empty() {
        return Ok(());
    }

    let message = format!(
        "The dataset is inconsistent with its existing metadata document. Failed checks: {}",
        failures.join(", ")
    );
    if errors_as_warnings {
        warn!("{}", message);
        Ok(())
    } else {
        Err(DatadocError::InconsistentDatasets { message })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Dataset, Variable};
    use std::io;
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::fmt::MakeWriter;

    /// Log sink shared between a test and its subscriber.
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for CapturedLogs {
        type Writer = CapturedLogs;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    const PATH: &str =
        "gs://ssb-prod-grensehandel/grensehandel/klargjorte_data/grensehandel_imputert_p2022-10-01_p2022-12-31_v1.parquet";

    fn meta(vars: &[(&str, DataType)]) -> DatadocMetadata {
        DatadocMetadata::new(
            Dataset::default(),
            vars.iter()
                .map(|(name, dt)| Variable::new(*name, Some(*dt)))
                .collect(),
        )
    }

    #[test]
    fn test_identical_inputs_are_consistent() {
        let m = meta(&[("a", DataType::String), ("b", DataType::Integer)]);
        let report = check_consistency(PATH, PATH, &m, &m);
        assert_eq!(report.checks().len(), 6);
        assert!(report.is_consistent());
        assert!(ready_to_merge(&report, false).is_ok());
    }

    #[test]
    fn test_check_order() {
        let m = meta(&[]);
        let report = check_consistency(PATH, PATH, &m, &m);
        let kinds: Vec<ConsistencyCheckKind> = report.checks().iter().map(|c| c.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ConsistencyCheckKind::BucketName,
                ConsistencyCheckKind::StatisticShortName,
                ConsistencyCheckKind::DatasetState,
                ConsistencyCheckKind::DatasetShortName,
                ConsistencyCheckKind::VariableNames,
                ConsistencyCheckKind::VariableDatatypes,
            ]
        );
    }

    #[test]
    fn test_reordered_variables_fail_only_datatypes() {
        let extracted = meta(&[("a", DataType::String), ("b", DataType::Integer)]);
        let existing = meta(&[("b", DataType::Integer), ("a", DataType::String)]);
        let report = check_consistency(PATH, PATH, &extracted, &existing);
        let failures: Vec<_> = report.failures().collect();
        assert_eq!(failures, vec![ConsistencyCheckKind::VariableDatatypes]);
        assert_eq!(report.passed(ConsistencyCheckKind::VariableNames), Some(true));
    }

    #[test]
    fn test_changed_state_and_short_name() {
        let other = "gs://ssb-prod-grensehandel/grensehandel/inndata/grensehandel_rå_p2022-10-01_p2022-12-31_v1.parquet";
        let m = meta(&[]);
        let report = check_consistency(other, PATH, &m, &m);
        let failures: Vec<_> = report.failures().collect();
        assert_eq!(
            failures,
            vec![
                ConsistencyCheckKind::DatasetState,
                ConsistencyCheckKind::DatasetShortName
            ]
        );
    }

    #[test]
    fn test_ready_to_merge_names_every_failure() {
        let extracted = meta(&[("a", DataType::String), ("c", DataType::String)]);
        let existing = meta(&[("a", DataType::String)]);
        let report = check_consistency(PATH, "", &extracted, &existing);

        let err = ready_to_merge(&report, false).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("Bucket name"));
        assert!(message.contains("Variable names"));
        assert!(message.contains("Variable datatypes"));
        assert!(matches!(err, DatadocError::InconsistentDatasets { .. }));

        assert!(ready_to_merge(&report, true).is_ok());
    }

    #[test]
    fn test_ready_to_merge_logs_warning_in_warnings_mode() {
        let extracted = meta(&[("a", DataType::String), ("c", DataType::String)]);
        let existing = meta(&[("a", DataType::String)]);
        let report = check_consistency(PATH, "", &extracted, &existing);

        let logs = CapturedLogs::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(logs.clone())
            .with_ansi(false)
            .finish();
        let result = tracing::subscriber::with_default(subscriber, || {
            ready_to_merge(&report, true)
        });

        assert!(result.is_ok());
        let output = logs.contents();
        assert!(output.contains("WARN"), "{output}");
        assert!(output.contains("Bucket name"), "{output}");
        assert!(output.contains("Variable names"), "{output}");
    }

    #[test]
    fn test_consistent_report_logs_nothing_when_merging() {
        let m = meta(&[("a", DataType::String)]);
        let report = check_consistency(PATH, PATH, &m, &m);

        let logs = CapturedLogs::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(logs.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::WARN)
            .finish();
        tracing::subscriber::with_default(subscriber, || {
            ready_to_merge(&report, true).expect("Consistent report should merge");
        });

        assert!(logs.contents().is_empty());
    }
}
