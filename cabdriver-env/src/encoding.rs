//! One-hot state features for external models.
//!
//! Layout: `[location; m] ++ [hour; t] ++ [day; d]`, with exactly one `1`
//! in each segment.

use crate::error::EnvError;
use crate::numbers::index_to_u8;
use crate::space::State;

/// Encodes states for a fixed set of dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateEncoder {
    locations: usize,
    hours_per_day: usize,
    days_per_week: usize,
}

impl StateEncoder {
    #[must_use]
    pub const fn new(locations: usize, hours_per_day: usize, days_per_week: usize) -> Self {
        Self {
            locations,
            hours_per_day,
            days_per_week,
        }
    }

    /// Length of every encoded vector, `m + t + d`.
    #[must_use]
    pub const fn dimension(&self) -> usize {
        self.locations + self.hours_per_day + self.days_per_week
    }

    /// Encode `state` as a 0/1 vector.
    ///
    /// # Errors
    ///
    /// Returns `EnvError::StateOutOfRange` if any component is out of bounds.
    pub fn encode(&self, state: State) -> Result<Vec<u8>, EnvError> {
        let location = usize::from(state.location);
        let hour = usize::from(state.hour);
        let day = usize::from(state.day);
        if location >= self.locations || hour >= self.hours_per_day || day >= self.days_per_week {
            return Err(EnvError::StateOutOfRange { state });
        }
        let mut features = vec![0_u8; self.dimension()];
        features[location] = 1;
        features[self.locations + hour] = 1;
        features[self.locations + self.hours_per_day + day] = 1;
        Ok(features)
    }

    /// Same as [`StateEncoder::encode`], as `f32` for numeric models.
    ///
    /// # Errors
    ///
    /// Returns `EnvError::StateOutOfRange` if any component is out of bounds.
    pub fn encode_f32(&self, state: State) -> Result<Vec<f32>, EnvError> {
        Ok(self
            .encode(state)?
            .into_iter()
            .map(f32::from)
            .collect())
    }

    /// Recover the state from its one-hot encoding.
    ///
    /// # Errors
    ///
    /// Returns an error for wrong lengths or segments that are not one-hot.
    pub fn decode(&self, features: &[u8]) -> Result<State, EnvError> {
        if features.len() != self.dimension() {
            return Err(EnvError::FeatureLength {
                expected: self.dimension(),
                actual: features.len(),
            });
        }
        let (location, rest) = features.split_at(self.locations);
        let (hour, day) = rest.split_at(self.hours_per_day);
        Ok(State::new(
            hot_index(location, "location")?,
            hot_index(hour, "hour")?,
            hot_index(day, "day")?,
        ))
    }
}

fn hot_index(segment: &[u8], name: &'static str) -> Result<u8, EnvError> {
    let mut hot = segment
        .iter()
        .enumerate()
        .filter(|(_, value)| **value != 0)
        .map(|(index, value)| (index, *value));
    match (hot.next(), hot.next()) {
        (Some((index, 1)), None) => {
            index_to_u8(index).ok_or(EnvError::FeatureNotOneHot { segment: name })
        }
        _ => Err(EnvError::FeatureNotOneHot { segment: name }),
    }
}
