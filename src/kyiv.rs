//! Civil-calendar arithmetic in Europe/Kyiv.
//!
//! Offsets come from the tz database for every instant, so the seasonal
//! shift between +02:00 and +03:00 is never hard-coded.

use chrono::{Offset, TimeZone};
use chrono_tz::Europe::Kyiv;
use time::{Date, OffsetDateTime, PrimitiveDateTime, Time, UtcOffset};

pub const ZONE_NAME: &str = "Europe/Kyiv";

/// UTC offset in effect in Kyiv at `instant`.
pub fn offset_at(instant: OffsetDateTime) -> UtcOffset {
    let Some(utc) = chrono::DateTime::from_timestamp(instant.unix_timestamp(), 0) else {
        return UtcOffset::UTC;
    };
    let seconds = Kyiv
        .offset_from_utc_datetime(&utc.naive_utc())
        .fix()
        .local_minus_utc();
    UtcOffset::from_whole_seconds(seconds).unwrap_or(UtcOffset::UTC)
}

/// `instant` expressed in Kyiv local time.
pub fn to_local(instant: OffsetDateTime) -> OffsetDateTime {
    instant.to_offset(offset_at(instant))
}

/// Kyiv calendar date that `instant` falls on.
pub fn civil_date(instant: OffsetDateTime) -> Date {
    to_local(instant).date()
}

/// Absolute instant of the Kyiv wall-clock `time` on `date`, using the
/// offset in effect at that wall-clock moment.
pub fn at_local(date: Date, time: Time) -> OffsetDateTime {
    let wall = PrimitiveDateTime::new(date, time);
    let mut offset = offset_at(wall.assume_utc());
    for _ in 0..2 {
        let candidate = wall.assume_offset(offset);
        let actual = offset_at(candidate);
        if actual == offset {
            return candidate;
        }
        offset = actual;
    }
    wall.assume_offset(offset)
}

/// Kyiv midnight that opened the calendar day containing `now`.
pub fn start_of_day(now: OffsetDateTime) -> OffsetDateTime {
    at_local(civil_date(now), Time::MIDNIGHT)
}

/// First instant strictly after `now` at which Kyiv wall-clock reads `time`.
pub fn next_at(now: OffsetDateTime, time: Time) -> OffsetDateTime {
    let today = civil_date(now);
    let candidate = at_local(today, time);
    if candidate > now {
        return candidate;
    }
    today
        .next_day()
        .map(|tomorrow| at_local(tomorrow, time))
        .unwrap_or(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime, offset, time};

    #[test]
    fn offset_follows_season() {
        assert_eq!(offset_at(datetime!(2024-01-15 12:00 UTC)), offset!(+2));
        assert_eq!(offset_at(datetime!(2024-07-15 12:00 UTC)), offset!(+3));
    }

    #[test]
    fn boundary_on_spring_shift_day_uses_winter_offset() {
        // Both instants are on Kyiv 2024-03-31, before the 03:00 shift.
        let late = start_of_day(datetime!(2024-03-30 23:30 UTC));
        let later = start_of_day(datetime!(2024-03-31 00:30 UTC));
        assert_eq!(late, datetime!(2024-03-30 22:00 UTC));
        assert_eq!(later, datetime!(2024-03-30 22:00 UTC));
        assert_eq!(late.offset(), offset!(+2));
    }

    #[test]
    fn boundaries_on_either_side_of_spring_shift_differ_in_offset() {
        let before = start_of_day(datetime!(2024-03-30 21:30 UTC));
        let after = start_of_day(datetime!(2024-03-31 21:30 UTC));
        assert_eq!(before, datetime!(2024-03-29 22:00 UTC));
        assert_eq!(after, datetime!(2024-03-31 21:00 UTC));
        assert_eq!(before.offset(), offset!(+2));
        assert_eq!(after.offset(), offset!(+3));
    }

    #[test]
    fn boundary_on_autumn_shift_day_uses_offset_at_midnight() {
        // 23:30 local on 2024-10-27 is already +02:00, but that day's
        // midnight was still +03:00.
        let boundary = start_of_day(datetime!(2024-10-27 21:30 UTC));
        assert_eq!(boundary, datetime!(2024-10-26 21:00 UTC));
    }

    #[test]
    fn civil_date_rolls_over_at_local_midnight() {
        assert_eq!(civil_date(datetime!(2024-06-10 20:59 UTC)), date!(2024-06-10));
        assert_eq!(civil_date(datetime!(2024-06-10 21:00 UTC)), date!(2024-06-11));
    }

    #[test]
    fn next_at_same_day_and_next_day() {
        let summer_morning = datetime!(2024-06-01 04:00 UTC);
        assert_eq!(next_at(summer_morning, time!(8:00)), datetime!(2024-06-01 05:00 UTC));

        let summer_noon = datetime!(2024-06-01 09:00 UTC);
        assert_eq!(next_at(summer_noon, time!(8:00)), datetime!(2024-06-02 05:00 UTC));

        let winter = datetime!(2024-01-15 07:00 UTC);
        assert_eq!(next_at(winter, time!(8:00)), datetime!(2024-01-16 06:00 UTC));
    }

    #[test]
    fn next_at_exact_trigger_moves_to_following_day() {
        let midnight = datetime!(2024-01-14 22:00 UTC);
        assert_eq!(next_at(midnight, Time::MIDNIGHT), datetime!(2024-01-15 22:00 UTC));
    }
}
