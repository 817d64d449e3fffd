//! # Period Module
//!
//! A calendar month. Cashback tiers are computed per reseller per period,
//! and purchase listings are filtered by one.
//!
//! ## Date Range
//! ```text
//! Period 2021-08
//!   first_day()  = 2021-08-01   (inclusive)
//!   end()        = 2021-09-01   (exclusive)
//!
//! Period 2021-12
//!   first_day()  = 2021-12-01
//!   end()        = 2022-01-01
//! ```
//! Half-open ranges let the database compare plain `YYYY-MM-DD` dates.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::fmt;

use crate::error::ValidationError;
use crate::{DEFAULT_LISTING_MONTH, DEFAULT_LISTING_YEAR};

/// Calendar (year, month) pair. Always a valid month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Period {
    year: i32,
    month: u32,
}

impl Period {
    /// Creates a period, rejecting months outside 1-12 and unrepresentable years.
    ///
    /// ## Example
    /// ```rust
    /// use cashback_core::period::Period;
    ///
    /// assert!(Period::new(2021, 8).is_ok());
    /// assert!(Period::new(2021, 13).is_err());
    /// ```
    pub fn new(year: i32, month: u32) -> Result<Period, ValidationError> {
        if !(1..=12).contains(&month) {
            return Err(ValidationError::OutOfRange {
                field: "month".to_string(),
                min: 1,
                max: 12,
            });
        }

        // Both boundaries must exist as calendar dates
        let period = Period { year, month };
        if NaiveDate::from_ymd_opt(year, month, 1).is_none()
            || period.next().first_day_opt().is_none()
        {
            return Err(ValidationError::InvalidFormat {
                field: "year".to_string(),
                reason: format!("{year} is not a supported year"),
            });
        }

        Ok(period)
    }

    /// The period containing `date`.
    pub fn of(date: NaiveDate) -> Period {
        Period {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Period used when a listing does not specify one.
    pub fn default_listing() -> Period {
        Period {
            year: DEFAULT_LISTING_YEAR,
            month: DEFAULT_LISTING_MONTH,
        }
    }

    /// Resolves the listing period from raw query parameters.
    ///
    /// ## Rules
    /// - Both `year` and `month` present (non-blank) → that period
    /// - Otherwise → `default`, even if one of them was given
    /// - Unparseable or out-of-range values → `ValidationError`
    ///
    /// ## Example
    /// ```rust
    /// use cashback_core::period::Period;
    ///
    /// let default = Period::default_listing();
    /// let p = Period::from_query(Some("2021"), Some("1"), default).unwrap();
    /// assert_eq!((p.year(), p.month()), (2021, 1));
    ///
    /// let p = Period::from_query(None, Some("1"), default).unwrap();
    /// assert_eq!(p, default);
    /// ```
    pub fn from_query(
        year: Option<&str>,
        month: Option<&str>,
        default: Period,
    ) -> Result<Period, ValidationError> {
        let year = year.map(str::trim).filter(|s| !s.is_empty());
        let month = month.map(str::trim).filter(|s| !s.is_empty());

        match (year, month) {
            (Some(year), Some(month)) => {
                let year: i32 = year.parse().map_err(|_| ValidationError::InvalidFormat {
                    field: "year".to_string(),
                    reason: "must be an integer".to_string(),
                })?;
                let month: u32 = month.parse().map_err(|_| ValidationError::InvalidFormat {
                    field: "month".to_string(),
                    reason: "must be an integer".to_string(),
                })?;
                Period::new(year, month)
            }
            _ => Ok(default),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// The following calendar month.
    pub fn next(&self) -> Period {
        if self.month == 12 {
            Period {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Period {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    fn first_day_opt(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    /// First day of the period (inclusive lower bound).
    pub fn first_day(&self) -> NaiveDate {
        // Construction guarantees day 1 of this month exists
        self.first_day_opt().unwrap_or(NaiveDate::MIN)
    }

    /// First day of the next period (exclusive upper bound).
    pub fn end(&self) -> NaiveDate {
        self.next().first_day_opt().unwrap_or(NaiveDate::MAX)
    }

    /// True when `date` falls inside the period.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_boundaries() {
        let p = Period::new(2021, 8).unwrap();
        assert_eq!(p.first_day(), date(2021, 8, 1));
        assert_eq!(p.end(), date(2021, 9, 1));

        let dec = Period::new(2020, 12).unwrap();
        assert_eq!(dec.end(), date(2021, 1, 1));
        assert_eq!(dec.next(), Period::new(2021, 1).unwrap());
    }

    #[test]
    fn test_invalid_month() {
        assert!(Period::new(2021, 0).is_err());
        assert!(Period::new(2021, 13).is_err());
    }

    #[test]
    fn test_contains_and_of() {
        let p = Period::of(date(2019, 7, 8));
        assert_eq!(p, Period::new(2019, 7).unwrap());
        assert!(p.contains(date(2019, 7, 31)));
        assert!(!p.contains(date(2019, 8, 1)));
        assert!(!p.contains(date(2018, 7, 8)));
    }

    #[test]
    fn test_from_query() {
        let default = Period::default_listing();
        assert_eq!(default.to_string(), "2021-08");

        let p = Period::from_query(Some("2015"), Some("9"), default).unwrap();
        assert_eq!(p, Period::new(2015, 9).unwrap());

        assert_eq!(Period::from_query(None, None, default).unwrap(), default);
        assert_eq!(
            Period::from_query(Some("2020"), None, default).unwrap(),
            default
        );
        assert_eq!(
            Period::from_query(Some(""), Some(" "), default).unwrap(),
            default
        );

        assert!(Period::from_query(Some("abc"), Some("1"), default).is_err());
        assert!(Period::from_query(Some("2020"), Some("13"), default).is_err());
    }
}
