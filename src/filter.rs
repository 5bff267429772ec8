//! Month filtering for discovered images.
//!
//! Selects the images that belong to the target calendar month. Two signals
//! are consulted, in order:
//!
//! 1. A `YYYY-MM-DD` date embedded in the filename — compared **as
//!    zero-padded strings** against the target, so `"04"` never equals `"4"`.
//! 2. Failing that, the file's last-modified timestamp, compared numerically.
//!
//! Nothing else is consulted.

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::LazyLock;

use chrono::{DateTime, Datelike, Local};
use regex::Regex;
use tracing::{debug, warn};

use crate::dates;
use crate::error::PaymatchError;

static MONTH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]{4})-([0-9]{2})$").expect("invalid regex"));

/// A validated `YYYY-MM` month filter.
///
/// # Example
///
/// ```rust
/// use paymatch::filter::Month;
///
/// let month: Month = "2025-04".parse()?;
/// assert_eq!(month.to_string(), "2025-04");
/// assert!("2025-4".parse::<Month>().is_err());
/// # Ok::<(), paymatch::PaymatchError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Month {
    year: String,
    month: String,
}

impl Month {
    /// The current calendar month, per the local clock.
    pub fn current() -> Self {
        let now = Local::now();
        Self {
            year: format!("{:04}", now.year()),
            month: format!("{:02}", now.month()),
        }
    }

    /// Zero-padded year field, e.g. `"2025"`.
    pub fn year(&self) -> &str {
        &self.year
    }

    /// Zero-padded month field, e.g. `"04"`.
    pub fn month(&self) -> &str {
        &self.month
    }

    fn year_num(&self) -> i32 {
        self.year.parse().unwrap_or(0)
    }

    fn month_num(&self) -> u32 {
        self.month.parse().unwrap_or(0)
    }
}

impl FromStr for Month {
    type Err = PaymatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || PaymatchError::InvalidMonth {
            input: s.to_string(),
            expected: "YYYY-MM",
        };

        let caps = MONTH_RE.captures(s).ok_or_else(invalid)?;
        let year = caps[1].to_string();
        let month = caps[2].to_string();

        match month.parse::<u32>() {
            Ok(1..=12) => Ok(Self { year, month }),
            _ => Err(invalid()),
        }
    }
}

impl std::fmt::Display for Month {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.year, self.month)
    }
}

/// Keeps the images whose date falls in the target month.
///
/// Order of the input is preserved. Files whose mtime cannot be read are
/// excluded with a warning.
pub fn filter_by_month(images: &[PathBuf], target: &Month) -> Vec<PathBuf> {
    let selected: Vec<PathBuf> = images
        .iter()
        .filter(|path| in_month(path, target))
        .cloned()
        .collect();

    debug!(
        selected = selected.len(),
        total = images.len(),
        month = %target,
        "month filter applied"
    );
    selected
}

fn in_month(path: &Path, target: &Month) -> bool {
    let basename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    if let Some(embedded) = dates::embedded_date_str(&basename) {
        // "YYYY-MM-DD": string comparison on the zero-padded fields.
        return &embedded[..4] == target.year() && &embedded[5..7] == target.month();
    }

    match fs::metadata(path).and_then(|m| m.modified()) {
        Ok(mtime) => {
            let mtime: DateTime<Local> = mtime.into();
            mtime.year() == target.year_num() && mtime.month() == target.month_num()
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "cannot read mtime, excluding");
            false
        }
    }
}
