//! Inclusive calendar date ranges.

use chrono::NaiveDate;

use super::DownloadError;

/// Format used for dates on the command line and in config files.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// An inclusive range of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Fails when `start` is after `end`. A single day has `start == end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, DownloadError> {
        if start > end {
            return Err(DownloadError::InvalidDateRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Parses `YYYY-MM-DD` endpoints.
    pub fn parse(start: &str, end: &str) -> Result<Self, DownloadError> {
        Self::new(parse_date(start)?, parse_date(end)?)
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of days, counting both ends.
    pub fn len(&self) -> usize {
        (self.end - self.start).num_days() as usize + 1
    }

    /// Never true: a range holds at least one day.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Every day from start to end inclusive, in order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |day| *day <= end)
    }
}

/// Parses one `YYYY-MM-DD` date.
pub fn parse_date(text: &str) -> Result<NaiveDate, DownloadError> {
    NaiveDate::parse_from_str(text.trim(), DATE_FORMAT)
        .map_err(|e| DownloadError::InvalidDate(format!("'{}': {}", text, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    #[test]
    fn test_days_inclusive() {
        let range = DateRange::parse("2021-07-30", "2021-08-02").unwrap();
        let days: Vec<String> = range.days().map(|d| d.to_string()).collect();

        assert_eq!(
            days,
            vec!["2021-07-30", "2021-07-31", "2021-08-01", "2021-08-02"]
        );
        assert_eq!(range.len(), 4);
    }

    #[test]
    fn test_single_day() {
        let range = DateRange::new(date("2020-02-29"), date("2020-02-29")).unwrap();
        assert_eq!(range.days().count(), 1);
        assert_eq!(range.len(), 1);
    }

    #[test]
    fn test_start_after_end_fails() {
        let result = DateRange::parse("2021-08-31", "2021-07-01");
        assert!(matches!(
            result,
            Err(DownloadError::InvalidDateRange { .. })
        ));
    }

    #[test]
    fn test_reference_window_length() {
        // July and August
        let range = DateRange::parse("2021-07-01", "2021-08-31").unwrap();
        assert_eq!(range.days().count(), 62);
    }

    #[test]
    fn test_bad_date_text() {
        assert!(matches!(
            parse_date("2021-13-01"),
            Err(DownloadError::InvalidDate(_))
        ));
        assert!(matches!(
            parse_date("yesterday"),
            Err(DownloadError::InvalidDate(_))
        ));
    }
}
