//! State and action space definitions.
//!
//! Both spaces are enumerated once, in a canonical order, and then only
//! indexed into. The action ordering is part of the environment contract:
//! the refusal action always sits at index 0, followed by every ordered
//! `(pickup, drop)` pair with `pickup != drop`, outer over pickup and inner
//! over drop.

use std::fmt;

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::numbers::index_to_u8;

/// City index in `0..locations`.
pub type Location = u8;

/// Position of an action in the canonical action ordering.
pub type ActionIndex = usize;

/// Index of [`Action::Refuse`] in every action space.
pub const REFUSAL_INDEX: ActionIndex = 0;

/// Driver state: where the cab is and when.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct State {
    pub location: Location,
    pub hour: u8,
    pub day: u8,
}

impl State {
    #[must_use]
    pub const fn new(location: Location, hour: u8, day: u8) -> Self {
        Self {
            location,
            hour,
            day,
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.location, self.hour, self.day)
    }
}

/// A decision available to the driver in one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Action {
    /// Turn down every request and wait one hour in place.
    Refuse,
    /// Drive to `pickup` (if not already there) and carry a passenger to `drop`.
    Ride { pickup: Location, drop: Location },
}

impl Action {
    /// Build a ride action. Returns `None` when pickup and drop coincide,
    /// since such a pair is never a ride.
    #[must_use]
    pub const fn ride(pickup: Location, drop: Location) -> Option<Self> {
        if pickup == drop {
            None
        } else {
            Some(Self::Ride { pickup, drop })
        }
    }

    #[must_use]
    pub const fn is_refusal(self) -> bool {
        matches!(self, Self::Refuse)
    }

    /// Legacy `(pickup, drop)` pair; refusal maps to `(0, 0)`.
    #[must_use]
    pub const fn as_pair(self) -> (Location, Location) {
        match self {
            Self::Refuse => (0, 0),
            Self::Ride { pickup, drop } => (pickup, drop),
        }
    }

    /// Inverse of [`Action::as_pair`]. Only `(0, 0)` decodes to refusal;
    /// any other pair with equal endpoints is rejected.
    #[must_use]
    pub const fn from_pair(pickup: Location, drop: Location) -> Option<Self> {
        match (pickup, drop) {
            (0, 0) => Some(Self::Refuse),
            _ => Self::ride(pickup, drop),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Refuse => f.write_str("refuse"),
            Self::Ride { pickup, drop } => write!(f, "ride {pickup}->{drop}"),
        }
    }
}

/// Canonically ordered sequence of every action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionSpace {
    locations: usize,
    actions: Vec<Action>,
}

impl ActionSpace {
    /// Enumerate the action space for `locations` cities.
    ///
    /// Locations beyond `u8::MAX` are not representable and are skipped;
    /// [`crate::EnvConfig::validate`] rejects such configurations up front.
    #[must_use]
    pub fn new(locations: usize) -> Self {
        let cities: Vec<Location> = (0..locations).filter_map(index_to_u8).collect();
        let mut actions = Vec::with_capacity(cities.len() * cities.len().saturating_sub(1) + 1);
        actions.push(Action::Refuse);
        for &pickup in &cities {
            actions.extend(
                cities
                    .iter()
                    .filter_map(|&drop| Action::ride(pickup, drop)),
            );
        }
        Self {
            locations: cities.len(),
            actions,
        }
    }

    #[must_use]
    pub const fn locations(&self) -> usize {
        self.locations
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Number of ride actions, i.e. every index except [`REFUSAL_INDEX`].
    #[must_use]
    pub fn ride_count(&self) -> usize {
        self.actions.len().saturating_sub(1)
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Action] {
        &self.actions
    }

    pub fn iter(&self) -> impl Iterator<Item = &Action> {
        self.actions.iter()
    }

    #[must_use]
    pub fn get(&self, index: ActionIndex) -> Option<Action> {
        self.actions.get(index).copied()
    }

    /// Canonical index of `action`, computed arithmetically.
    #[must_use]
    pub fn index_of(&self, action: Action) -> Option<ActionIndex> {
        match action {
            Action::Refuse => Some(REFUSAL_INDEX),
            Action::Ride { pickup, drop } => {
                let (pickup, drop) = (usize::from(pickup), usize::from(drop));
                if pickup >= self.locations || drop >= self.locations || pickup == drop {
                    return None;
                }
                let offset = if drop < pickup { drop } else { drop - 1 };
                Some(1 + pickup * (self.locations - 1) + offset)
            }
        }
    }

    #[must_use]
    pub fn contains(&self, action: Action) -> bool {
        self.index_of(action).is_some()
    }

    /// Uniformly random action, refusal included.
    pub fn random_action<R: Rng + ?Sized>(&self, rng: &mut R) -> Action {
        self.actions.choose(rng).copied().unwrap_or(Action::Refuse)
    }
}

/// Every `(location, hour, day)` triple, outer over location, then hour, then day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateSpace {
    locations: usize,
    hours_per_day: usize,
    days_per_week: usize,
    states: Vec<State>,
}

impl StateSpace {
    /// Enumerate the full state space. Dimensions beyond `u8::MAX` are
    /// truncated the same way as in [`ActionSpace::new`].
    #[must_use]
    pub fn new(locations: usize, hours_per_day: usize, days_per_week: usize) -> Self {
        let cities: Vec<u8> = (0..locations).filter_map(index_to_u8).collect();
        let hours: Vec<u8> = (0..hours_per_day).filter_map(index_to_u8).collect();
        let days: Vec<u8> = (0..days_per_week).filter_map(index_to_u8).collect();
        let mut states = Vec::with_capacity(cities.len() * hours.len() * days.len());
        for &location in &cities {
            for &hour in &hours {
                states.extend(days.iter().map(|&day| State::new(location, hour, day)));
            }
        }
        Self {
            locations: cities.len(),
            hours_per_day: hours.len(),
            days_per_week: days.len(),
            states,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[State] {
        &self.states
    }

    pub fn iter(&self) -> impl Iterator<Item = &State> {
        self.states.iter()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<State> {
        self.states.get(index).copied()
    }

    /// Whether every component of `state` is within bounds.
    #[must_use]
    pub fn contains(&self, state: State) -> bool {
        usize::from(state.location) < self.locations
            && usize::from(state.hour) < self.hours_per_day
            && usize::from(state.day) < self.days_per_week
    }

    /// Position of `state` in the enumeration order.
    #[must_use]
    pub fn index_of(&self, state: State) -> Option<usize> {
        if !self.contains(state) {
            return None;
        }
        let per_location = self.hours_per_day * self.days_per_week;
        Some(
            usize::from(state.location) * per_location
                + usize::from(state.hour) * self.days_per_week
                + usize::from(state.day),
        )
    }

    /// Uniformly random state.
    pub fn random_state<R: Rng + ?Sized>(&self, rng: &mut R) -> State {
        self.states.choose(rng).copied().unwrap_or_default()
    }
}
