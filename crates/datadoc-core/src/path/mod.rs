//! Dataset path parsing.
//!
//! - `formats` - the catalog of period notations and their date bounds
//! - `info` - [`DatasetPathInfo`], the facts derivable from one path

mod formats;
mod info;

pub use formats::{categorize_period, period_formats, PeriodFormat, Timeframe};
pub use info::DatasetPathInfo;
