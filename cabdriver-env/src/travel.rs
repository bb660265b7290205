//! Travel-time lookup consumed by the transition engine.
//!
//! How travel times are produced is outside this crate. The engine only
//! needs a total lookup over `[from][to][hour][day]`; any type can supply it
//! through [`TravelTimeLookup`].

use serde::{Deserialize, Serialize};

use crate::error::EnvError;
use crate::space::Location;

/// Source of direct travel durations, in whole hours.
pub trait TravelTimeLookup {
    /// Hours needed to drive from `from` to `to` when departing at `hour` on `day`.
    ///
    /// # Errors
    ///
    /// Returns `EnvError::TravelTimeOutOfDomain` when the lookup is not covered.
    fn hours(&self, from: Location, to: Location, hour: u8, day: u8) -> Result<u32, EnvError>;
}

/// Dense row-major `[from][to][hour][day]` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawTable")]
pub struct TravelTimeTable {
    locations: usize,
    hours_per_day: usize,
    days_per_week: usize,
    hours: Vec<u32>,
}

/// Unchecked JSON form; converted through [`TravelTimeTable::from_flat`].
#[derive(Deserialize)]
struct RawTable {
    locations: usize,
    hours_per_day: usize,
    days_per_week: usize,
    hours: Vec<u32>,
}

impl TryFrom<RawTable> for TravelTimeTable {
    type Error = EnvError;

    fn try_from(raw: RawTable) -> Result<Self, Self::Error> {
        Self::from_flat(raw.locations, raw.hours_per_day, raw.days_per_week, raw.hours)
    }
}

impl TravelTimeTable {
    /// Wrap a flat row-major vector.
    ///
    /// # Errors
    ///
    /// Returns `EnvError::TableShape` if the vector length does not match the dimensions.
    pub fn from_flat(
        locations: usize,
        hours_per_day: usize,
        days_per_week: usize,
        hours: Vec<u32>,
    ) -> Result<Self, EnvError> {
        let expected = locations
            .checked_mul(locations)
            .and_then(|n| n.checked_mul(hours_per_day))
            .and_then(|n| n.checked_mul(days_per_week))
            .unwrap_or(usize::MAX);
        if hours.len() != expected {
            return Err(EnvError::TableShape {
                expected,
                actual: hours.len(),
            });
        }
        Ok(Self {
            locations,
            hours_per_day,
            days_per_week,
            hours,
        })
    }

    /// Build from nested `[from][to][hour][day]` vectors.
    ///
    /// # Errors
    ///
    /// Returns `EnvError::TableShape` if the nesting is ragged.
    pub fn from_nested(nested: &[Vec<Vec<Vec<u32>>>]) -> Result<Self, EnvError> {
        let locations = nested.len();
        let hours_per_day = nested
            .first()
            .and_then(|to| to.first())
            .map_or(0, Vec::len);
        let days_per_week = nested
            .first()
            .and_then(|to| to.first())
            .and_then(|hours| hours.first())
            .map_or(0, Vec::len);
        let square = nested.iter().all(|to| to.len() == locations)
            && nested
                .iter()
                .flatten()
                .all(|hours| hours.len() == hours_per_day)
            && nested
                .iter()
                .flatten()
                .flatten()
                .all(|days| days.len() == days_per_week);
        if !square {
            return Err(EnvError::TableShape {
                expected: locations * locations * hours_per_day * days_per_week,
                actual: nested.iter().flatten().flatten().map(Vec::len).sum(),
            });
        }
        let flat = nested.iter().flatten().flatten().flatten().copied().collect();
        Self::from_flat(locations, hours_per_day, days_per_week, flat)
    }

    /// Table where every trip takes `hours`, regardless of time.
    #[must_use]
    pub fn uniform(
        locations: usize,
        hours_per_day: usize,
        days_per_week: usize,
        hours: u32,
    ) -> Self {
        Self {
            locations,
            hours_per_day,
            days_per_week,
            hours: vec![hours; locations * locations * hours_per_day * days_per_week],
        }
    }

    /// Parse a table from its JSON form.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed or `hours` does not
    /// match the declared dimensions.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    #[must_use]
    pub const fn dimensions(&self) -> (usize, usize, usize) {
        (self.locations, self.hours_per_day, self.days_per_week)
    }

    /// Whether the table is large enough to serve every lookup for the given dimensions.
    #[must_use]
    pub const fn covers(
        &self,
        locations: usize,
        hours_per_day: usize,
        days_per_week: usize,
    ) -> bool {
        self.locations >= locations
            && self.hours_per_day >= hours_per_day
            && self.days_per_week >= days_per_week
            && self.hours.len()
                == self.locations * self.locations * self.hours_per_day * self.days_per_week
    }

    /// Overwrite one entry. Returns the previous value.
    ///
    /// # Errors
    ///
    /// Returns `EnvError::TravelTimeOutOfDomain` when the coordinates are out of range.
    pub fn set(
        &mut self,
        from: Location,
        to: Location,
        hour: u8,
        day: u8,
        hours: u32,
    ) -> Result<u32, EnvError> {
        let offset = self.offset(from, to, hour, day)?;
        Ok(std::mem::replace(&mut self.hours[offset], hours))
    }

    fn offset(&self, from: Location, to: Location, hour: u8, day: u8) -> Result<usize, EnvError> {
        let (f, t, h, d) = (
            usize::from(from),
            usize::from(to),
            usize::from(hour),
            usize::from(day),
        );
        if f >= self.locations
            || t >= self.locations
            || h >= self.hours_per_day
            || d >= self.days_per_week
        {
            return Err(EnvError::TravelTimeOutOfDomain {
                from,
                to,
                hour,
                day,
            });
        }
        let offset = ((f * self.locations + t) * self.hours_per_day + h) * self.days_per_week + d;
        if offset >= self.hours.len() {
            return Err(EnvError::TravelTimeOutOfDomain {
                from,
                to,
                hour,
                day,
            });
        }
        Ok(offset)
    }
}

impl TravelTimeLookup for TravelTimeTable {
    fn hours(&self, from: Location, to: Location, hour: u8, day: u8) -> Result<u32, EnvError> {
        let offset = self.offset(from, to, hour, day)?;
        Ok(self.hours[offset])
    }
}

impl<T: TravelTimeLookup + ?Sized> TravelTimeLookup for &T {
    fn hours(&self, from: Location, to: Location, hour: u8, day: u8) -> Result<u32, EnvError> {
        (**self).hours(from, to, hour, day)
    }
}
