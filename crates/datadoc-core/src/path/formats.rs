//! Catalog of period notations that may appear in dataset file names.
//!
//! Four ISO calendar notations plus four SSB sub-year notations. Detection
//! patterns are mutually exclusive, so the first match in catalog order is
//! the only match for any well-formed token.

use chrono::{Datelike, NaiveDate, Weekday};
use regex::{Captures, Regex};
use std::sync::LazyLock;

/// Granularity of the period a token denotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timeframe {
    Year,
    Month,
    Week,
    Day,
}

/// Start and end month for each SSB sub-year code.
type SubYearTable = &'static [(&'static str, u32, u32)];

const BIMESTERS: SubYearTable = &[
    ("B1", 1, 2),
    ("B2", 3, 4),
    ("B3", 5, 6),
    ("B4", 7, 8),
    ("B5", 9, 10),
    ("B6", 11, 12),
];
const QUARTERS: SubYearTable = &[("Q1", 1, 3), ("Q2", 4, 6), ("Q3", 7, 9), ("Q4", 10, 12)];
const TRIANNUALS: SubYearTable = &[("T1", 1, 4), ("T2", 5, 8), ("T3", 9, 12)];
const HALF_YEARS: SubYearTable = &[("H1", 1, 6), ("H2", 7, 12)];

#[derive(Debug)]
enum Notation {
    Iso,
    SubYear(SubYearTable),
}

/// A named period notation able to compute the first and last date it covers.
#[derive(Debug)]
pub struct PeriodFormat {
    name: &'static str,
    detection: Regex,
    /// Same shape as `detection`, with named groups for the date parts.
    parse: Regex,
    timeframe: Timeframe,
    notation: Notation,
}

impl PeriodFormat {
    fn new(
        name: &'static str,
        parse_pattern: &str,
        timeframe: Timeframe,
        notation: Notation,
    ) -> Self {
        let detection = strip_group_names(parse_pattern);
        Self {
            name,
            detection: Regex::new(&detection).unwrap(),
            parse: Regex::new(parse_pattern).unwrap(),
            timeframe,
            notation,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn timeframe(&self) -> Timeframe {
        self.timeframe
    }

    /// Whether `period` is structurally of this notation.
    pub fn matches(&self, period: &str) -> bool {
        self.detection.is_match(period)
    }

    /// First calendar date of the period, or `None` if it names no real date.
    pub fn floor(&self, period: &str) -> Option<NaiveDate> {
        let caps = self.parse.captures(period)?;
        let year = capture_number(&caps, "year")? as i32;
        match (&self.notation, self.timeframe) {
            (Notation::SubYear(table), _) => {
                let (start, _) = lookup_sub_year(table, &caps)?;
                NaiveDate::from_ymd_opt(year, start, 1)
            }
            (Notation::Iso, Timeframe::Year) => NaiveDate::from_ymd_opt(year, 1, 1),
            (Notation::Iso, Timeframe::Month) => {
                NaiveDate::from_ymd_opt(year, capture_number(&caps, "month")?, 1)
            }
            (Notation::Iso, Timeframe::Week) => {
                NaiveDate::from_isoywd_opt(year, capture_number(&caps, "week")?, Weekday::Mon)
            }
            (Notation::Iso, Timeframe::Day) => NaiveDate::from_ymd_opt(
                year,
                capture_number(&caps, "month")?,
                capture_number(&caps, "day")?,
            ),
        }
    }

    /// Last calendar date of the period, or `None` if it names no real date.
    pub fn ceil(&self, period: &str) -> Option<NaiveDate> {
        let caps = self.parse.captures(period)?;
        let year = capture_number(&caps, "year")? as i32;
        match (&self.notation, self.timeframe) {
            (Notation::SubYear(table), _) => {
                let (_, end) = lookup_sub_year(table, &caps)?;
                last_day_of_month(year, end)
            }
            (Notation::Iso, Timeframe::Year) => NaiveDate::from_ymd_opt(year, 12, 31),
            (Notation::Iso, Timeframe::Month) => {
                last_day_of_month(year, capture_number(&caps, "month")?)
            }
            (Notation::Iso, Timeframe::Week) => {
                NaiveDate::from_isoywd_opt(year, capture_number(&caps, "week")?, Weekday::Sun)
            }
            (Notation::Iso, Timeframe::Day) => self.floor(period),
        }
    }
}

static PERIOD_FORMATS: LazyLock<Vec<PeriodFormat>> = LazyLock::new(|| {
    vec![
        PeriodFormat::new("ISO_YEAR", r"^(?P<year>\d{4})$", Timeframe::Year, Notation::Iso),
        PeriodFormat::new(
            "ISO_YEAR_MONTH",
            r"^(?P<year>\d{4})-(?P<month>\d{2})$",
            Timeframe::Month,
            Notation::Iso,
        ),
        PeriodFormat::new(
            "ISO_YEAR_MONTH_DAY",
            r"^(?P<year>\d{4})-(?P<month>\d{2})-(?P<day>\d{2})$",
            Timeframe::Day,
            Notation::Iso,
        ),
        PeriodFormat::new(
            "ISO_YEAR_WEEK",
            r"^(?P<year>\d{4})-?W(?P<week>\d{2})$",
            Timeframe::Week,
            Notation::Iso,
        ),
        PeriodFormat::new(
            "SSB_BIMESTER",
            r"^(?P<year>\d{4})(?P<code>B\d)$",
            Timeframe::Month,
            Notation::SubYear(BIMESTERS),
        ),
        PeriodFormat::new(
            "SSB_QUARTERLY",
            r"^(?P<year>\d{4})(?P<code>Q\d)$",
            Timeframe::Month,
            Notation::SubYear(QUARTERS),
        ),
        PeriodFormat::new(
            "SSB_TRIANNUAL",
            r"^(?P<year>\d{4})(?P<code>T\d)$",
            Timeframe::Month,
            Notation::SubYear(TRIANNUALS),
        ),
        PeriodFormat::new(
            "SSB_HALF_YEAR",
            r"^(?P<year>\d{4})(?P<code>H\d)$",
            Timeframe::Month,
            Notation::SubYear(HALF_YEARS),
        ),
    ]
});

/// All supported notations, in matching order.
pub fn period_formats() -> &'static [PeriodFormat] {
    &PERIOD_FORMATS
}

/// The notation a period token is written in, if any.
pub fn categorize_period(period: &str) -> Option<&'static PeriodFormat> {
    period_formats().iter().find(|format| format.matches(period))
}

/// Whether a file name segment is a `p`-prefixed period token.
pub(crate) fn is_period_segment(segment: &str) -> bool {
    segment
        .strip_prefix(crate::config::PathConfig::PERIOD_PREFIX)
        .is_some_and(|period| categorize_period(period).is_some())
}

fn strip_group_names(pattern: &str) -> String {
    static GROUP_NAME: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\?P<\w+>").unwrap());
    GROUP_NAME.replace_all(pattern, "").into_owned()
}

fn capture_number(caps: &Captures<'_>, group: &str) -> Option<u32> {
    caps.name(group)?.as_str().parse().ok()
}

fn lookup_sub_year(table: SubYearTable, caps: &Captures<'_>) -> Option<(u32, u32)> {
    let code = caps.name("code")?.as_str();
    table
        .iter()
        .find(|(key, _, _)| *key == code)
        .map(|(_, start, end)| (*start, *end))
}

fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next_month = if first.month() == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    next_month.pred_opt()
}
