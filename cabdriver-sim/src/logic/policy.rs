use std::fmt;

use anyhow::Result;
use cabdriver_env::{Action, CabDriverEnv, RequestBatch, State, TravelTimeLookup};
use clap::ValueEnum;
use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha20Rng;

/// Decision returned by a [`DriverPolicy`]
#[derive(Debug, Clone)]
pub struct PolicyDecision {
    pub action: Action,
    pub rationale: Option<String>,
}

impl PolicyDecision {
    #[must_use]
    pub fn new(action: Action, rationale: Option<String>) -> Self {
        Self { action, rationale }
    }
}

/// Policy interface for automated driving strategies.
pub trait DriverPolicy {
    /// Name used for logging/debug output.
    fn name(&self) -> &'static str;

    /// Pick one of the offered actions.
    fn pick_action(
        &mut self,
        env: &CabDriverEnv,
        state: State,
        offers: &RequestBatch,
        table: &dyn TravelTimeLookup,
    ) -> Result<PolicyDecision>;
}

/// Built-in driving strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, ValueEnum)]
pub enum DriverStrategy {
    /// Pick uniformly among the offers, refusal included
    Random,
    /// Always refuse and wait
    Refuse,
    /// Take the offer with the best immediate reward
    Greedy,
}

impl DriverStrategy {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            DriverStrategy::Random => "Random",
            DriverStrategy::Refuse => "Refuse",
            DriverStrategy::Greedy => "Greedy",
        }
    }

    #[must_use]
    pub fn create_policy(self, seed: u64) -> Box<dyn DriverPolicy> {
        match self {
            DriverStrategy::Random => Box::new(RandomPolicy::new(seed)),
            DriverStrategy::Refuse => Box::new(RefusePolicy),
            DriverStrategy::Greedy => Box::new(GreedyPolicy),
        }
    }
}

impl fmt::Display for DriverStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

struct RandomPolicy {
    rng: ChaCha20Rng,
}

impl RandomPolicy {
    fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }
}

struct RefusePolicy;
struct GreedyPolicy;

impl DriverPolicy for RandomPolicy {
    fn name(&self) -> &'static str {
        "Random"
    }

    fn pick_action(
        &mut self,
        _env: &CabDriverEnv,
        _state: State,
        offers: &RequestBatch,
        _table: &dyn TravelTimeLookup,
    ) -> Result<PolicyDecision> {
        let action = offers
            .actions
            .choose(&mut self.rng)
            .copied()
            .unwrap_or(Action::Refuse);
        Ok(PolicyDecision::new(action, None))
    }
}

impl DriverPolicy for RefusePolicy {
    fn name(&self) -> &'static str {
        "Refuse"
    }

    fn pick_action(
        &mut self,
        _env: &CabDriverEnv,
        _state: State,
        _offers: &RequestBatch,
        _table: &dyn TravelTimeLookup,
    ) -> Result<PolicyDecision> {
        Ok(PolicyDecision::new(Action::Refuse, None))
    }
}

impl DriverPolicy for GreedyPolicy {
    fn name(&self) -> &'static str {
        "Greedy"
    }

    fn pick_action(
        &mut self,
        env: &CabDriverEnv,
        state: State,
        offers: &RequestBatch,
        table: &dyn TravelTimeLookup,
    ) -> Result<PolicyDecision> {
        let mut best = (Action::Refuse, -env.config().cost_per_hour);
        for &action in &offers.actions {
            let reward = env.reward(state, action, table)?;
            // earlier offers win ties
            if reward > best.1 {
                best = (action, reward);
            }
        }
        Ok(PolicyDecision::new(
            best.0,
            Some(format!("expected reward {:.1}", best.1)),
        ))
    }
}
