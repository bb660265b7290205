//! Hour/day bookkeeping with day and week rollover.

use std::num::NonZeroU8;

use crate::numbers::index_to_u8;
use crate::space::State;

/// Calendar dimensions used to normalize advanced times.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Clock {
    hours_per_day: NonZeroU8,
    days_per_week: NonZeroU8,
}

impl Clock {
    /// Build a clock. Returns `None` for zero-length or oversized dimensions.
    #[must_use]
    pub fn new(hours_per_day: usize, days_per_week: usize) -> Option<Self> {
        Some(Self::from_dimensions(
            index_to_u8(hours_per_day).and_then(NonZeroU8::new)?,
            index_to_u8(days_per_week).and_then(NonZeroU8::new)?,
        ))
    }

    #[must_use]
    pub const fn from_dimensions(hours_per_day: NonZeroU8, days_per_week: NonZeroU8) -> Self {
        Self {
            hours_per_day,
            days_per_week,
        }
    }

    /// Advance `(hour, day)` by `duration` whole hours.
    ///
    /// Stays on the same day while `hour + duration` fits in the day;
    /// otherwise the overflow rolls into as many days as it spans, and the
    /// day wraps around the week. Inputs are expected to be in range.
    #[must_use]
    pub fn advance(self, hour: u8, day: u8, duration: u32) -> (u8, u8) {
        let hours_per_day = u64::from(self.hours_per_day.get());
        let elapsed = u64::from(hour) + u64::from(duration);
        if elapsed < hours_per_day {
            return (narrow(elapsed), day);
        }
        let new_hour = elapsed % hours_per_day;
        let days_advanced = elapsed / hours_per_day;
        let new_day = (u64::from(day) + days_advanced) % u64::from(self.days_per_week.get());
        (narrow(new_hour), narrow(new_day))
    }

    /// Advance the time components of `state`, keeping its location.
    #[must_use]
    pub fn advance_state(self, state: State, duration: u32) -> State {
        let (hour, day) = self.advance(state.hour, state.day, duration);
        State { hour, day, ..state }
    }
}

// Results of `% hours_per_day` / `% days_per_week` always fit in u8.
fn narrow(value: u64) -> u8 {
    u8::try_from(value).unwrap_or(u8::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn week() -> Clock {
        Clock::new(24, 7).unwrap()
    }

    #[test]
    fn zero_duration_is_identity() {
        let clock = week();
        for hour in 0..24 {
            for day in 0..7 {
                assert_eq!(clock.advance(hour, day, 0), (hour, day));
            }
        }
    }

    #[test]
    fn end_of_week_rolls_over() {
        assert_eq!(week().advance(23, 6, 1), (0, 0));
    }

    #[test]
    fn more_than_a_day_advances_days() {
        assert_eq!(week().advance(10, 2, 25), (11, 3));
    }

    #[test]
    fn same_day_when_it_fits() {
        assert_eq!(week().advance(5, 4, 18), (23, 4));
        assert_eq!(week().advance(5, 4, 19), (0, 5));
    }

    #[test]
    fn multi_week_durations_wrap() {
        // 200 hours from Sat 20:00 -> 220h = 9 days + 4h; (6 + 9) % 7 = 1
        assert_eq!(week().advance(20, 6, 200), (4, 1));
        assert_eq!(week().advance(0, 0, 24 * 7), (0, 0));
    }

    #[test]
    fn advance_state_keeps_location() {
        let next = week().advance_state(State::new(3, 22, 6), 3);
        assert_eq!(next, State::new(3, 1, 0));
    }

    #[test]
    fn rejects_degenerate_dimensions() {
        assert!(Clock::new(0, 7).is_none());
        assert!(Clock::new(24, 0).is_none());
        assert!(Clock::new(300, 7).is_none());
    }
}
