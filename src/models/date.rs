use chrono::{Duration, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::config::REPORTING_TZ_OFFSET_HOURS;
use crate::errors::AppError;

/// Parse a calendar date in strict `YYYY-MM-DD` form.
///
/// chrono accepts unpadded numbers for `%m`/`%d`, so the parsed date is
/// formatted back and compared to reject inputs like `2025-6-1`.
pub fn parse_date(s: &str) -> Result<NaiveDate, AppError> {
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| AppError::InvalidDateFormat(s.to_string()))?;
    if date.format("%Y-%m-%d").to_string() != s {
        return Err(AppError::InvalidDateFormat(s.to_string()));
    }
    Ok(date)
}

/// Current civil date in the platform's reporting timezone.
pub fn today() -> NaiveDate {
    match FixedOffset::east_opt(REPORTING_TZ_OFFSET_HOURS * 3600) {
        Some(offset) => Utc::now().with_timezone(&offset).date_naive(),
        None => Utc::now().date_naive(),
    }
}

/// Half-open interval overlap: `[a_start, a_end)` intersects `[b_start, b_end)`.
///
/// A range ending on day D never conflicts with a range starting on day D,
/// so a checkout date may equal the next checkin date. Every overlap check in
/// the crate goes through here.
pub fn overlaps(a_start: NaiveDate, a_end: NaiveDate, b_start: NaiveDate, b_end: NaiveDate) -> bool {
    a_start < b_end && a_end > b_start
}

/// A half-open date range `[start, end)` with `end > start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, AppError> {
        if end <= start {
            return Err(AppError::InvalidRange);
        }
        Ok(Self { start, end })
    }

    pub fn parse(start: &str, end: &str) -> Result<Self, AppError> {
        Self::new(parse_date(start)?, parse_date(end)?)
    }

    pub fn overlaps(&self, other: &DateRange) -> bool {
        overlaps(self.start, self.end, other.start, other.end)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date < self.end
    }

    pub fn nights(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    /// The single day `[date, date + 1)`.
    pub fn single_day(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date + Duration::days(1),
        }
    }
}

/// Whether a range starting at `start` is already in effect as of `today`.
///
/// Started ranges are locked: rates reject any mutation, blocks only allow
/// extending the end date.
pub fn has_started(start: NaiveDate, today: NaiveDate) -> bool {
    start <= today
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    #[test]
    fn test_parse_valid_date() {
        assert_eq!(
            d("2025-06-10"),
            NaiveDate::from_ymd_opt(2025, 6, 10).unwrap()
        );
    }

    #[test]
    fn test_parse_rejects_bad_format() {
        assert!(matches!(
            parse_date("10/06/2025"),
            Err(AppError::InvalidDateFormat(_))
        ));
        assert!(matches!(
            parse_date("2025-6-1"),
            Err(AppError::InvalidDateFormat(_))
        ));
        assert!(matches!(
            parse_date("2025-06-10T00:00:00"),
            Err(AppError::InvalidDateFormat(_))
        ));
        assert!(matches!(
            parse_date("not a date"),
            Err(AppError::InvalidDateFormat(_))
        ));
    }

    #[test]
    fn test_range_requires_end_after_start() {
        assert!(DateRange::parse("2025-06-10", "2025-06-15").is_ok());
        assert!(matches!(
            DateRange::parse("2025-06-10", "2025-06-10"),
            Err(AppError::InvalidRange)
        ));
        assert!(matches!(
            DateRange::parse("2025-06-15", "2025-06-10"),
            Err(AppError::InvalidRange)
        ));
    }

    #[test]
    fn test_overlap_truth_table() {
        // Disjoint: A entirely before B, and touching boundaries.
        assert!(!overlaps(d("2025-06-01"), d("2025-06-05"), d("2025-06-05"), d("2025-06-10")));
        assert!(!overlaps(d("2025-06-05"), d("2025-06-10"), d("2025-06-01"), d("2025-06-05")));
        assert!(!overlaps(d("2025-06-01"), d("2025-06-03"), d("2025-06-07"), d("2025-06-09")));

        // Overlapping: partial, contained, identical, one-day intersection.
        assert!(overlaps(d("2025-06-01"), d("2025-06-06"), d("2025-06-05"), d("2025-06-10")));
        assert!(overlaps(d("2025-06-01"), d("2025-06-10"), d("2025-06-03"), d("2025-06-05")));
        assert!(overlaps(d("2025-06-01"), d("2025-06-05"), d("2025-06-01"), d("2025-06-05")));
        assert!(overlaps(d("2025-06-01"), d("2025-06-05"), d("2025-06-04"), d("2025-06-08")));
    }

    #[test]
    fn test_back_to_back_stays_do_not_conflict() {
        // Checkout on 06-15 + checkin on 06-15 is allowed.
        assert!(!overlaps(d("2025-06-10"), d("2025-06-15"), d("2025-06-15"), d("2025-06-20")));
    }

    #[test]
    fn test_contains_is_half_open() {
        let range = DateRange::parse("2025-06-10", "2025-06-15").unwrap();
        assert!(range.contains(d("2025-06-10")));
        assert!(range.contains(d("2025-06-14")));
        assert!(!range.contains(d("2025-06-15")));
        assert!(!range.contains(d("2025-06-09")));
    }

    #[test]
    fn test_nights() {
        let range = DateRange::parse("2025-06-10", "2025-06-15").unwrap();
        assert_eq!(range.nights(), 5);
    }

    #[test]
    fn test_has_started() {
        assert!(has_started(d("2025-06-01"), d("2025-06-10")));
        assert!(has_started(d("2025-06-10"), d("2025-06-10")));
        assert!(!has_started(d("2025-06-11"), d("2025-06-10")));
    }
}
