//! Single-step composition of transition and reward.

use serde::{Deserialize, Serialize};

use crate::error::EnvError;
use crate::reward::RewardRates;
use crate::space::{Action, State};
use crate::transition::{TimeBreakdown, TransitionEngine};
use crate::travel::TravelTimeLookup;

/// Everything a driver loop needs after taking an action.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepOutcome {
    pub next_state: State,
    pub reward: f64,
    /// Hours consumed by the step; always `breakdown.total()`.
    pub total_time: u32,
    pub breakdown: TimeBreakdown,
}

/// Run the transition engine once and price its breakdown.
///
/// # Errors
///
/// Propagates transition failures.
pub fn step<T: TravelTimeLookup + ?Sized>(
    engine: &TransitionEngine,
    rates: &RewardRates,
    state: State,
    action: Action,
    table: &T,
) -> Result<StepOutcome, EnvError> {
    let transition = engine.apply(state, action, table)?;
    Ok(StepOutcome {
        next_state: transition.next_state,
        reward: rates.reward(action, transition.breakdown),
        total_time: transition.breakdown.total(),
        breakdown: transition.breakdown,
    })
}
