//! Time-window query translation.
//!
//! Turns an optional `since` expression such as `7d` or `3w` into a
//! [`ChangesetQuery`] over the change log. The window runs from the start of
//! the UTC day `N` days (or `7·N` days) before `now`, up to `now` inclusive.
//! Results are always ordered newest first.

use crate::changeset::ChangesetRecord;
use crate::errors::CatalogError;
use chrono::{DateTime, Days, TimeZone, Utc};
use regex::Regex;
use std::str::FromStr;
use std::sync::OnceLock;

static SINCE_PATTERN: OnceLock<Regex> = OnceLock::new();

fn since_pattern() -> &'static Regex {
    SINCE_PATTERN.get_or_init(|| Regex::new(r"^[1-9][0-9]*[dw]$").expect("static pattern compiles"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowUnit {
    Days,
    Weeks,
}

/// A validated `since` expression: a positive integer followed by `d` or `w`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinceExpr {
    amount: u32,
    unit: WindowUnit,
}

impl SinceExpr {
    /// Validate and parse a `since` expression.
    ///
    /// # Errors
    ///
    /// `CatalogError::InvalidSince` for anything other than
    /// `<positive-integer><d|w>`, including leading zeros, signs, other units,
    /// a missing unit, the empty string and amounts beyond `u32`.
    pub fn parse(text: &str) -> Result<Self, CatalogError> {
        let invalid = || CatalogError::InvalidSince {
            value: text.to_string(),
        };
        if !since_pattern().is_match(text) {
            return Err(invalid());
        }
        let (digits, unit) = text.split_at(text.len() - 1);
        let amount: u32 = digits.parse().map_err(|_| invalid())?;
        let unit = match unit {
            "d" => WindowUnit::Days,
            "w" => WindowUnit::Weeks,
            _ => return Err(invalid()),
        };
        Ok(Self { amount, unit })
    }

    pub fn amount(&self) -> u32 {
        self.amount
    }

    pub fn unit(&self) -> WindowUnit {
        self.unit
    }

    /// Length of the window in whole days.
    pub fn days(&self) -> u64 {
        match self.unit {
            WindowUnit::Days => u64::from(self.amount),
            WindowUnit::Weeks => u64::from(self.amount) * 7,
        }
    }

    /// Lower bound of the window: midnight UTC of the day `days()` before `now`.
    pub fn cutoff(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now.date_naive()
            .checked_sub_days(Days::new(self.days()))
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|naive| Utc.from_utc_datetime(&naive))
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }
}

impl FromStr for SinceExpr {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Inclusive timestamp range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

impl TimeRange {
    pub fn contains(&self, ts: &DateTime<Utc>) -> bool {
        *ts >= self.from && *ts <= self.to
    }
}

/// Selection over the change log. Results are sorted by timestamp, newest first.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChangesetQuery {
    pub document: Option<String>,
    pub range: Option<TimeRange>,
}

impl ChangesetQuery {
    /// Query across all documents.
    ///
    /// # Errors
    ///
    /// `CatalogError::InvalidSince` if `since` is present and malformed.
    pub fn all(since: Option<&str>, now: DateTime<Utc>) -> Result<Self, CatalogError> {
        Ok(Self {
            document: None,
            range: since_range(since, now)?,
        })
    }

    /// Query restricted to one document.
    ///
    /// # Errors
    ///
    /// `CatalogError::InvalidSince` if `since` is present and malformed.
    pub fn for_document(
        document_id: &str,
        since: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<Self, CatalogError> {
        Ok(Self {
            document: Some(document_id.to_string()),
            range: since_range(since, now)?,
        })
    }

    /// True when `record` falls inside this query.
    pub fn matches(&self, record: &ChangesetRecord) -> bool {
        if let Some(document) = &self.document {
            if &record.document != document {
                return false;
            }
        }
        match &self.range {
            Some(range) => range.contains(&record.timestamp),
            None => true,
        }
    }
}

/// Translate an optional `since` expression into a time range ending at `now`.
///
/// # Errors
///
/// `CatalogError::InvalidSince` if `since` is present and malformed.
pub fn since_range(
    since: Option<&str>,
    now: DateTime<Utc>,
) -> Result<Option<TimeRange>, CatalogError> {
    match since {
        None => Ok(None),
        Some(text) => {
            let expr = SinceExpr::parse(text)?;
            Ok(Some(TimeRange {
                from: expr.cutoff(now),
                to: now,
            }))
        }
    }
}
