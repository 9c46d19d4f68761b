//! Vendor schedule rows and their conversion into slot windows.

use jiff::civil::Weekday;
use uuid::Uuid;

use flowline::{ids::TimeslotId, schedule::SlotWindow};

use crate::domain::schedule::errors::ScheduleServiceError;

/// One vendor-schedule row.
#[derive(Debug, Clone)]
pub struct SlotWindowRow {
    pub timeslot_id: Uuid,
    /// Weekday code as stored: 0 = Sunday through 6 = Saturday.
    pub weekday: i16,
    pub max_accept_order_limit: i32,
    pub is_checked: bool,
}

/// Decode the stored Sunday-based weekday code.
#[must_use]
pub fn weekday_from_code(code: i16) -> Option<Weekday> {
    match code {
        0 => Some(Weekday::Sunday),
        1 => Some(Weekday::Monday),
        2 => Some(Weekday::Tuesday),
        3 => Some(Weekday::Wednesday),
        4 => Some(Weekday::Thursday),
        5 => Some(Weekday::Friday),
        6 => Some(Weekday::Saturday),
        _ => None,
    }
}

/// Convert a schedule row into an engine slot window.
///
/// # Errors
///
/// Returns an error on an unknown weekday code or a negative order limit.
pub fn build_slot_window(row: &SlotWindowRow) -> Result<SlotWindow, ScheduleServiceError> {
    Ok(SlotWindow {
        timeslot: TimeslotId::from_uuid(row.timeslot_id),
        weekday: weekday_from_code(row.weekday)
            .ok_or(ScheduleServiceError::UnknownWeekday(row.weekday))?,
        max_accept: u32::try_from(row.max_accept_order_limit)?,
        enabled: row.is_checked,
    })
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn sunday_based_codes_decode_in_order() {
        let decoded: Vec<_> = (0..7).map(weekday_from_code).collect();

        assert_eq!(
            decoded,
            vec![
                Some(Weekday::Sunday),
                Some(Weekday::Monday),
                Some(Weekday::Tuesday),
                Some(Weekday::Wednesday),
                Some(Weekday::Thursday),
                Some(Weekday::Friday),
                Some(Weekday::Saturday),
            ]
        );
    }

    #[test]
    fn out_of_range_code_is_rejected() {
        let row = SlotWindowRow {
            timeslot_id: Uuid::from_u128(1),
            weekday: 7,
            max_accept_order_limit: 10,
            is_checked: true,
        };

        let result = build_slot_window(&row);

        assert!(
            matches!(result, Err(ScheduleServiceError::UnknownWeekday(7))),
            "expected UnknownWeekday, got {result:?}"
        );
    }

    #[test]
    fn row_converts_to_a_window() -> TestResult {
        let row = SlotWindowRow {
            timeslot_id: Uuid::from_u128(1),
            weekday: 1,
            max_accept_order_limit: 10,
            is_checked: true,
        };

        let window = build_slot_window(&row)?;

        assert_eq!(window.weekday, Weekday::Monday);
        assert_eq!(window.max_accept, 10);
        assert!(window.enabled);

        Ok(())
    }
}
