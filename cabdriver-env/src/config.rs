//! Environment configuration.
//!
//! All values are fixed once an environment is constructed. Configuration is
//! validated eagerly so inconsistent settings are rejected before the first
//! step rather than discovered mid-simulation.

use std::num::NonZeroU8;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::clock::Clock;
use crate::constants::{
    DAYS_PER_WEEK, DEFAULT_COST_PER_HOUR, DEFAULT_LOCATIONS, DEFAULT_MAX_REQUESTS,
    DEFAULT_REQUEST_RATES, DEFAULT_REVENUE_PER_HOUR, HOURS_PER_DAY, MAX_DIMENSION,
};
use crate::numbers::index_to_u8;

/// Static environment parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvConfig {
    /// Number of city locations (`m`).
    #[serde(default = "EnvConfig::default_locations")]
    pub locations: usize,
    /// Hours in a day (`t`).
    #[serde(default = "EnvConfig::default_hours_per_day")]
    pub hours_per_day: usize,
    /// Days in a week (`d`).
    #[serde(default = "EnvConfig::default_days_per_week")]
    pub days_per_week: usize,
    /// Cost per elapsed hour (`C`).
    #[serde(default = "EnvConfig::default_cost_per_hour")]
    pub cost_per_hour: f64,
    /// Revenue per ride hour (`R`).
    #[serde(default = "EnvConfig::default_revenue_per_hour")]
    pub revenue_per_hour: f64,
    /// Poisson request rate indexed by location.
    #[serde(default = "EnvConfig::default_request_rates")]
    pub request_rates: Vec<f64>,
    /// Clamp applied to the number of requests seen in one step.
    #[serde(default = "EnvConfig::default_max_requests")]
    pub max_requests: usize,
}

impl EnvConfig {
    #[must_use]
    pub const fn default_locations() -> usize {
        DEFAULT_LOCATIONS
    }

    #[must_use]
    pub const fn default_hours_per_day() -> usize {
        HOURS_PER_DAY
    }

    #[must_use]
    pub const fn default_days_per_week() -> usize {
        DAYS_PER_WEEK
    }

    #[must_use]
    pub const fn default_cost_per_hour() -> f64 {
        DEFAULT_COST_PER_HOUR
    }

    #[must_use]
    pub const fn default_revenue_per_hour() -> f64 {
        DEFAULT_REVENUE_PER_HOUR
    }

    #[must_use]
    pub fn default_request_rates() -> Vec<f64> {
        DEFAULT_REQUEST_RATES.to_vec()
    }

    #[must_use]
    pub const fn default_max_requests() -> usize {
        DEFAULT_MAX_REQUESTS
    }

    /// Parse a configuration from JSON, filling omitted fields with defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed into a configuration.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Number of distinct ride actions, `m * (m - 1)`.
    #[must_use]
    pub const fn ride_action_count(&self) -> usize {
        self.locations * self.locations.saturating_sub(1)
    }

    /// Length of the one-hot state encoding, `m + t + d`.
    #[must_use]
    pub const fn feature_len(&self) -> usize {
        self.locations + self.hours_per_day + self.days_per_week
    }

    /// Validate configuration invariants.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when any field violates the documented bounds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_dimensions()?;
        self.validate_economics()?;
        self.validate_requests()?;
        Ok(())
    }

    fn validate_dimensions(&self) -> Result<(), ConfigError> {
        if self.locations < 2 || self.locations > MAX_DIMENSION {
            return Err(ConfigError::DimensionRange {
                field: "locations",
                min: 2,
                max: MAX_DIMENSION,
                value: self.locations,
            });
        }
        self.clock()?;
        Ok(())
    }

    /// Calendar for `hours_per_day` and `days_per_week`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::DimensionRange` naming the offending field.
    pub fn clock(&self) -> Result<Clock, ConfigError> {
        Ok(Clock::from_dimensions(
            calendar_dimension("hours_per_day", self.hours_per_day)?,
            calendar_dimension("days_per_week", self.days_per_week)?,
        ))
    }

    fn validate_economics(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("cost_per_hour", self.cost_per_hour),
            ("revenue_per_hour", self.revenue_per_hour),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidRate { field, value });
            }
        }
        Ok(())
    }

    fn validate_requests(&self) -> Result<(), ConfigError> {
        if self.request_rates.len() != self.locations {
            return Err(ConfigError::RateTableLength {
                expected: self.locations,
                actual: self.request_rates.len(),
            });
        }
        if let Some(&value) = self
            .request_rates
            .iter()
            .find(|rate| !rate.is_finite() || **rate <= 0.0)
        {
            return Err(ConfigError::InvalidRate {
                field: "request_rates",
                value,
            });
        }
        let available = self.ride_action_count();
        if self.max_requests > available {
            return Err(ConfigError::RequestClampExceedsActions {
                max_requests: self.max_requests,
                available,
            });
        }
        Ok(())
    }
}

fn calendar_dimension(field: &'static str, value: usize) -> Result<NonZeroU8, ConfigError> {
    index_to_u8(value)
        .and_then(NonZeroU8::new)
        .ok_or(ConfigError::DimensionRange {
            field,
            min: 1,
            max: MAX_DIMENSION,
            value,
        })
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            locations: Self::default_locations(),
            hours_per_day: Self::default_hours_per_day(),
            days_per_week: Self::default_days_per_week(),
            cost_per_hour: Self::default_cost_per_hour(),
            revenue_per_hour: Self::default_revenue_per_hour(),
            request_rates: Self::default_request_rates(),
            max_requests: Self::default_max_requests(),
        }
    }
}

/// Errors raised when environment configuration invariants are violated.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{field} must be between {min} and {max} (got {value})")]
    DimensionRange {
        field: &'static str,
        min: usize,
        max: usize,
        value: usize,
    },
    #[error("{field} must be finite and non-negative (got {value})")]
    InvalidRate { field: &'static str, value: f64 },
    #[error("request rate table has {actual} entries but there are {expected} locations")]
    RateTableLength { expected: usize, actual: usize },
    #[error("max_requests {max_requests} exceeds the {available} distinct ride actions")]
    RequestClampExceedsActions {
        max_requests: usize,
        available: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let cfg = EnvConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.ride_action_count(), 20);
        assert_eq!(cfg.feature_len(), 36);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let cfg = EnvConfig::from_json(r#"{ "cost_per_hour": 4.5 }"#).unwrap();
        assert!((cfg.cost_per_hour - 4.5).abs() < f64::EPSILON);
        assert_eq!(cfg.locations, 5);
        assert_eq!(cfg.request_rates, vec![2.0, 12.0, 4.0, 7.0, 8.0]);
        assert_eq!(cfg.max_requests, 15);
    }

    #[test]
    fn clamp_larger_than_action_space_is_rejected() {
        let cfg = EnvConfig {
            locations: 4,
            request_rates: vec![1.0; 4],
            ..EnvConfig::default()
        };
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::RequestClampExceedsActions {
                max_requests: 15,
                available: 12,
            })
        );

        let adjusted = EnvConfig {
            max_requests: 12,
            ..cfg
        };
        assert!(adjusted.validate().is_ok());
    }

    #[test]
    fn rate_table_must_match_locations() {
        let cfg = EnvConfig {
            request_rates: vec![1.0, 2.0],
            ..EnvConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::RateTableLength {
                expected: 5,
                actual: 2
            })
        ));
    }

    #[test]
    fn non_positive_rates_are_rejected() {
        let cfg = EnvConfig {
            request_rates: vec![2.0, 0.0, 4.0, 7.0, 8.0],
            ..EnvConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidRate {
                field: "request_rates",
                ..
            })
        ));
    }

    #[test]
    fn dimensions_are_bounded() {
        let single = EnvConfig {
            locations: 1,
            request_rates: vec![1.0],
            max_requests: 0,
            ..EnvConfig::default()
        };
        assert!(matches!(
            single.validate(),
            Err(ConfigError::DimensionRange {
                field: "locations",
                ..
            })
        ));

        let no_hours = EnvConfig {
            hours_per_day: 0,
            ..EnvConfig::default()
        };
        assert!(matches!(
            no_hours.validate(),
            Err(ConfigError::DimensionRange {
                field: "hours_per_day",
                ..
            })
        ));
    }

    #[test]
    fn clock_errors_name_the_offending_field() {
        let no_days = EnvConfig {
            days_per_week: 0,
            ..EnvConfig::default()
        };
        assert_eq!(
            no_days.clock(),
            Err(ConfigError::DimensionRange {
                field: "days_per_week",
                min: 1,
                max: 255,
                value: 0,
            })
        );
        assert_eq!(no_days.validate(), no_days.clock().map(|_| ()));

        let long_day = EnvConfig {
            hours_per_day: 300,
            ..EnvConfig::default()
        };
        assert!(matches!(
            long_day.clock(),
            Err(ConfigError::DimensionRange {
                field: "hours_per_day",
                value: 300,
                ..
            })
        ));

        let clock = EnvConfig::default().clock().unwrap();
        assert_eq!(clock, Clock::new(24, 7).unwrap());
    }

    #[test]
    fn negative_economics_are_rejected() {
        let cfg = EnvConfig {
            cost_per_hour: -1.0,
            ..EnvConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidRate {
                field: "cost_per_hour",
                ..
            })
        ));
    }
}
