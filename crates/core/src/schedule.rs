//! Vendor schedule slot admission.
//!
//! A vendor publishes, per weekday and time slot, whether they accept orders
//! and how many they will take. This gate runs at cart-line creation time:
//! it admits a booking while the slot has headroom and rejects it once
//! saturated. Rejection is an expected, frequent outcome — a decision value,
//! never an error.

use jiff::civil::{Date, Weekday};

use crate::ids::TimeslotId;

/// One enabled-or-not schedule window for a vendor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotWindow {
    /// The time slot this window governs.
    pub timeslot: TimeslotId,

    /// Weekday the window applies to.
    pub weekday: Weekday,

    /// Maximum orders the vendor accepts in this slot per day.
    pub max_accept: u32,

    /// Whether the vendor has the window switched on.
    pub enabled: bool,
}

/// Why a booking was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotRejection {
    /// No enabled window covers this slot on this weekday.
    SlotClosed,

    /// The slot's daily order cap is already reached.
    CapacityExhausted,
}

/// The admission decision for one prospective booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotAdmission {
    /// The booking may proceed; `remaining` counts headroom after it.
    Accepted {
        /// Bookings still available in the slot, including this one.
        remaining: u32,
    },

    /// The booking must be refused.
    Rejected(SlotRejection),
}

impl SlotAdmission {
    /// Whether the booking was admitted.
    #[must_use]
    pub const fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }
}

/// Decide whether a vendor accepts one more booking in a slot on a date,
/// given the bookings already counted for that vendor/slot/day.
#[must_use]
pub fn evaluate_slot(
    windows: &[SlotWindow],
    timeslot: TimeslotId,
    date: Date,
    booked: u32,
) -> SlotAdmission {
    let weekday = date.weekday();

    let Some(window) = windows
        .iter()
        .find(|window| window.enabled && window.timeslot == timeslot && window.weekday == weekday)
    else {
        return SlotAdmission::Rejected(SlotRejection::SlotClosed);
    };

    if booked >= window.max_accept {
        return SlotAdmission::Rejected(SlotRejection::CapacityExhausted);
    }

    SlotAdmission::Accepted {
        remaining: window.max_accept - booked,
    }
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;
    use uuid::Uuid;

    use super::*;

    fn slot() -> TimeslotId {
        TimeslotId::from_uuid(Uuid::from_u128(0x51))
    }

    fn monday_window(max_accept: u32, enabled: bool) -> SlotWindow {
        SlotWindow {
            timeslot: slot(),
            weekday: Weekday::Monday,
            max_accept,
            enabled,
        }
    }

    // 2026-08-03 is a Monday.
    const MONDAY: Date = date(2026, 8, 3);

    #[test]
    fn open_slot_with_headroom_is_admitted() {
        let admission = evaluate_slot(&[monday_window(5, true)], slot(), MONDAY, 2);

        assert_eq!(admission, SlotAdmission::Accepted { remaining: 3 });
    }

    #[test]
    fn saturated_slot_rejects_further_bookings() {
        let admission = evaluate_slot(&[monday_window(5, true)], slot(), MONDAY, 5);

        assert_eq!(
            admission,
            SlotAdmission::Rejected(SlotRejection::CapacityExhausted)
        );
    }

    #[test]
    fn disabled_window_reads_as_closed() {
        let admission = evaluate_slot(&[monday_window(5, false)], slot(), MONDAY, 0);

        assert_eq!(admission, SlotAdmission::Rejected(SlotRejection::SlotClosed));
    }

    #[test]
    fn window_on_another_weekday_does_not_admit() {
        let tuesday = MONDAY.tomorrow().expect("date arithmetic in range");

        let admission = evaluate_slot(&[monday_window(5, true)], slot(), tuesday, 0);

        assert_eq!(admission, SlotAdmission::Rejected(SlotRejection::SlotClosed));
    }

    #[test]
    fn window_for_another_timeslot_does_not_admit() {
        let other = TimeslotId::from_uuid(Uuid::from_u128(0x52));

        let admission = evaluate_slot(&[monday_window(5, true)], other, MONDAY, 0);

        assert_eq!(admission, SlotAdmission::Rejected(SlotRejection::SlotClosed));
    }
}
