//! Integration tests for the dataset path parser and period catalog.

use chrono::NaiveDate;
use datadoc_core::model::DataSetState;
use datadoc_core::path::{period_formats, Timeframe};
use datadoc_core::{categorize_period, DatasetPathInfo};

fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(y, m, d)
}

#[test]
fn test_iso_period_range_with_version() {
    let info = DatasetPathInfo::new("grensehandel_imputert_p2022-10-01_p2022-12-31_v1.parquet");
    assert_eq!(info.contains_data_from(), date(2022, 10, 1));
    assert_eq!(info.contains_data_until(), date(2022, 12, 31));
    assert_eq!(info.dataset_short_name().as_deref(), Some("grensehandel_imputert"));
    assert_eq!(info.dataset_version().as_deref(), Some("1"));
}

#[test]
fn test_bimester_period() {
    let info = DatasetPathInfo::new("skipsanloep_p2021B2_v1.parquet");
    assert_eq!(info.contains_data_from(), date(2021, 3, 1));
    assert_eq!(info.contains_data_until(), date(2021, 4, 30));
    assert_eq!(info.dataset_short_name().as_deref(), Some("skipsanloep"));
}

#[test]
fn test_full_standard_path() {
    let info = DatasetPathInfo::new(
        "gs://ssb-prod-grensehandel-data-produkt/grensehandel/klargjorte_data/grensehandel_imputert_p2022-10-01_p2022-12-31_v1.parquet",
    );
    assert_eq!(info.bucket_name().as_deref(), Some("ssb-prod-grensehandel-data-produkt"));
    assert_eq!(info.statistic_short_name().as_deref(), Some("grensehandel"));
    assert_eq!(info.dataset_state(), Some(DataSetState::ProcessedData));
    assert!(info.path_complies_with_naming_standard());
}

#[test]
fn test_misordered_periods_are_absent() {
    let info = DatasetPathInfo::new("varehandel_p2022_p2021_v1.parquet");
    assert_eq!(info.contains_data_from(), None);
    assert_eq!(info.contains_data_until(), None);
    assert!(!info.path_complies_with_naming_standard());
}

#[test]
fn test_naming_standard_is_a_function_of_the_path() {
    let path = "/buckets/produkt/ifpn/inndata/person_data_p2021Q1_v3.parquet";
    let first = DatasetPathInfo::new(path).path_complies_with_naming_standard();
    let second = DatasetPathInfo::new(path).path_complies_with_naming_standard();
    assert_eq!(first, second);
    assert!(first);
}

#[test]
fn test_catalog_is_ordered_and_mutually_exclusive() {
    let samples = [
        ("2022", Timeframe::Year),
        ("2022-10", Timeframe::Month),
        ("2022-10-01", Timeframe::Day),
        ("2022W40", Timeframe::Week),
        ("2022B5", Timeframe::Month),
        ("2022Q3", Timeframe::Month),
        ("2022T2", Timeframe::Month),
        ("2022H1", Timeframe::Month),
    ];
    assert_eq!(period_formats().len(), samples.len());

    for (period, timeframe) in samples {
        let format = categorize_period(period).unwrap_or_else(|| panic!("{period}"));
        assert_eq!(format.timeframe(), timeframe, "{period}");
        let matching = period_formats().iter().filter(|f| f.matches(period)).count();
        assert_eq!(matching, 1, "{period}");
        let floor = format.floor(period).expect("floor");
        let ceil = format.ceil(period).expect("ceil");
        assert!(floor <= ceil, "{period}");
    }
}
