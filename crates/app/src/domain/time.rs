//! Business-local day arithmetic.
//!
//! The scheduler and the slot-capacity count both scope queries to "today"
//! in the business time zone, not UTC; both derive the same half-open
//! instant range from a civil date here.

use jiff::{Timestamp, civil::Date, tz::TimeZone};

/// The half-open `[start, end)` instant range of a civil date in `tz`.
///
/// # Errors
///
/// Returns an error when the date cannot be resolved in the time zone
/// (e.g. out of the representable range).
pub(crate) fn local_day_range(date: Date, tz: &TimeZone) -> Result<(Timestamp, Timestamp), jiff::Error> {
    let start = date.to_zoned(tz.clone())?.timestamp();
    let end = date.tomorrow()?.to_zoned(tz.clone())?.timestamp();

    Ok((start, end))
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn day_range_spans_exactly_one_local_day() -> TestResult {
        let tz = TimeZone::get("America/New_York")?;
        let (start, end) = local_day_range(date(2026, 8, 3), &tz)?;

        // EDT is UTC-4 in August: local midnight is 04:00 UTC.
        assert_eq!(start.to_string(), "2026-08-03T04:00:00Z");
        assert_eq!(end.to_string(), "2026-08-04T04:00:00Z");

        Ok(())
    }

    #[test]
    fn range_is_half_open() -> TestResult {
        let tz = TimeZone::get("UTC")?;
        let (start, end) = local_day_range(date(2026, 8, 3), &tz)?;

        assert!(start < end, "start must precede end");
        assert_eq!(end.as_second() - start.as_second(), 86_400);

        Ok(())
    }
}
