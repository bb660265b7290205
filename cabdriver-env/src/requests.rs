//! Stochastic ride request generation.

use log::trace;
use rand::Rng;
use rand::distributions::Distribution;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use statrs::distribution::Poisson;

use crate::config::EnvConfig;
use crate::error::EnvError;
use crate::numbers::f64_to_count;
use crate::space::{Action, ActionIndex, ActionSpace, Location, REFUSAL_INDEX, State};

/// Inline capacity covering the default clamp plus the refusal entry.
pub type RequestList<T> = SmallVec<[T; 16]>;

/// Actions available to the driver for one step.
///
/// `indices` and `actions` are aligned positionally. The refusal action is
/// always present, and always last.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestBatch {
    pub indices: RequestList<ActionIndex>,
    pub actions: RequestList<Action>,
}

impl RequestBatch {
    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Number of ride offers, excluding the refusal entry.
    #[must_use]
    pub fn ride_count(&self) -> usize {
        self.actions.iter().filter(|action| !action.is_refusal()).count()
    }

    /// Iterate `(index, action)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (ActionIndex, Action)> + '_ {
        self.indices
            .iter()
            .copied()
            .zip(self.actions.iter().copied())
    }

    #[must_use]
    pub fn contains(&self, action: Action) -> bool {
        self.actions.contains(&action)
    }
}

/// Per-location Poisson request generator.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestSampler {
    rates: Vec<f64>,
    max_requests: usize,
}

impl RequestSampler {
    /// Build a sampler from explicit rates and clamp.
    #[must_use]
    pub const fn new(rates: Vec<f64>, max_requests: usize) -> Self {
        Self {
            rates,
            max_requests,
        }
    }

    #[must_use]
    pub fn from_config(cfg: &EnvConfig) -> Self {
        Self::new(cfg.request_rates.clone(), cfg.max_requests)
    }

    #[must_use]
    pub const fn max_requests(&self) -> usize {
        self.max_requests
    }

    /// Poisson mean at `location`.
    #[must_use]
    pub fn rate(&self, location: Location) -> Option<f64> {
        self.rates.get(usize::from(location)).copied()
    }

    /// Draw the number of requests seen at `location`, before clamping.
    ///
    /// # Errors
    ///
    /// Returns an error if the location has no rate or the rate is not a valid Poisson mean.
    pub fn draw_count<R: Rng + ?Sized>(
        &self,
        location: Location,
        rng: &mut R,
    ) -> Result<usize, EnvError> {
        let rate = self.rate(location).ok_or(EnvError::LocationOutOfRange {
            location,
            locations: self.rates.len(),
        })?;
        let poisson = Poisson::new(rate).map_err(|_| EnvError::InvalidRate { location, rate })?;
        let sample: f64 = poisson.sample(rng);
        Ok(f64_to_count(sample))
    }

    /// Sample the requests available in `state`.
    ///
    /// The count is drawn from the location's Poisson rate and clamped to
    /// `max_requests`; that many distinct ride actions are then chosen
    /// uniformly without replacement, and the refusal action is appended.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown location, an invalid rate, or when the
    /// clamped count exceeds the number of ride actions in `actions`.
    pub fn sample<R: Rng + ?Sized>(
        &self,
        state: State,
        actions: &ActionSpace,
        rng: &mut R,
    ) -> Result<RequestBatch, EnvError> {
        let drawn = self.draw_count(state.location, rng)?;
        let requested = drawn.min(self.max_requests);
        let available = actions.ride_count();
        if requested > available {
            return Err(EnvError::InsufficientActions {
                requested,
                available,
            });
        }

        let mut indices: RequestList<ActionIndex> =
            rand::seq::index::sample(rng, available, requested)
                .into_iter()
                .map(|offset| offset + 1)
                .collect();
        indices.push(REFUSAL_INDEX);

        let batch_actions = indices
            .iter()
            .map(|&index| actions.get(index).unwrap_or(Action::Refuse))
            .collect();

        trace!("requests at {state}: drew {drawn}, offering {requested} rides");

        Ok(RequestBatch {
            indices,
            actions: batch_actions,
        })
    }
}
