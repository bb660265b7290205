//! State transition for one `(state, action)` pair.

use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::constants::REFUSAL_WAIT_HOURS;
use crate::error::EnvError;
use crate::space::{Action, State};
use crate::travel::TravelTimeLookup;

/// Hours elapsed during one step, split by what the driver was doing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeBreakdown {
    /// Idle hours after refusing every request.
    pub wait: u32,
    /// Empty driving from the current location to the pickup.
    pub transit: u32,
    /// Hours with the passenger on board.
    pub ride: u32,
}

impl TimeBreakdown {
    /// Saturates at `u32::MAX`; [`TransitionEngine::apply`] never builds a
    /// breakdown whose legs overflow.
    #[must_use]
    pub const fn total(self) -> u32 {
        self.idle().saturating_add(self.ride)
    }

    /// Unpaid hours: waiting or driving to a pickup.
    #[must_use]
    pub const fn idle(self) -> u32 {
        self.wait.saturating_add(self.transit)
    }
}

/// Result of applying an action to a state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    pub next_state: State,
    pub breakdown: TimeBreakdown,
}

/// Computes next states from the travel-time lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionEngine {
    clock: Clock,
}

impl TransitionEngine {
    #[must_use]
    pub const fn new(clock: Clock) -> Self {
        Self { clock }
    }

    /// Apply `action` in `state`.
    ///
    /// Refusal waits one hour in place. A ride that starts at the current
    /// location only incurs ride time. Otherwise the driver first transits to
    /// the pickup, and the ride leg is looked up at the post-transit time.
    /// The returned state is always advanced from the original time by the
    /// total elapsed hours.
    ///
    /// # Errors
    ///
    /// Propagates lookup failures from `table`, and returns
    /// `EnvError::DurationOverflow` when the two legs do not fit in a `u32`.
    pub fn apply<T: TravelTimeLookup + ?Sized>(
        &self,
        state: State,
        action: Action,
        table: &T,
    ) -> Result<Transition, EnvError> {
        let State {
            location,
            hour,
            day,
        } = state;

        let (next_location, breakdown) = match action {
            Action::Refuse => (
                location,
                TimeBreakdown {
                    wait: REFUSAL_WAIT_HOURS,
                    ..TimeBreakdown::default()
                },
            ),
            Action::Ride { pickup, drop } if pickup == location => (
                drop,
                TimeBreakdown {
                    ride: table.hours(pickup, drop, hour, day)?,
                    ..TimeBreakdown::default()
                },
            ),
            Action::Ride { pickup, drop } => {
                let transit = table.hours(location, pickup, hour, day)?;
                let (pickup_hour, pickup_day) = self.clock.advance(hour, day, transit);
                let ride = table.hours(pickup, drop, pickup_hour, pickup_day)?;
                transit
                    .checked_add(ride)
                    .ok_or(EnvError::DurationOverflow { transit, ride })?;
                (
                    drop,
                    TimeBreakdown {
                        transit,
                        ride,
                        ..TimeBreakdown::default()
                    },
                )
            }
        };

        let (next_hour, next_day) = self.clock.advance(hour, day, breakdown.total());
        Ok(Transition {
            next_state: State::new(next_location, next_hour, next_day),
            breakdown,
        })
    }
}
