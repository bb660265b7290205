//! Per-step net revenue.

use serde::{Deserialize, Serialize};

use crate::config::EnvConfig;
use crate::numbers::hours_to_f64;
use crate::space::Action;
use crate::transition::TimeBreakdown;

/// Economic constants used to price a step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RewardRates {
    /// Revenue per hour with a passenger (`R`).
    pub revenue_per_hour: f64,
    /// Cost per elapsed hour of any kind (`C`).
    pub cost_per_hour: f64,
}

impl RewardRates {
    #[must_use]
    pub const fn from_config(cfg: &EnvConfig) -> Self {
        Self {
            revenue_per_hour: cfg.revenue_per_hour,
            cost_per_hour: cfg.cost_per_hour,
        }
    }

    /// Reward for taking `action` with the resulting time `breakdown`.
    ///
    /// Refusal always costs exactly one hour of operating cost. Any other
    /// action earns `R * ride` and pays `C` for every ride and idle hour.
    #[must_use]
    pub fn reward(&self, action: Action, breakdown: TimeBreakdown) -> f64 {
        if action.is_refusal() {
            return -self.cost_per_hour;
        }
        let ride = hours_to_f64(breakdown.ride);
        let idle = hours_to_f64(breakdown.idle());
        let earnings = self.revenue_per_hour * ride;
        let costs = self.cost_per_hour * (ride + idle);
        earnings - costs
    }
}

impl Default for RewardRates {
    fn default() -> Self {
        Self::from_config(&EnvConfig::default())
    }
}
