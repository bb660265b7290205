use anyhow::{Context, Result};
use cabdriver_env::{Action, CabDriverEnv, State, TimeBreakdown, TravelTimeLookup};
use log::debug;
use serde::Serialize;

use crate::logic::policy::{DriverPolicy, DriverStrategy};
use crate::logic::seeds::episode_seed;

/// Configuration for one episode.
#[derive(Debug, Clone, Copy)]
pub struct EpisodeConfig {
    pub seed: u64,
    pub episode: usize,
    pub strategy: DriverStrategy,
    pub episode_days: u32,
}

impl EpisodeConfig {
    #[must_use]
    pub fn new(strategy: DriverStrategy, seed: u64) -> Self {
        Self {
            seed,
            episode: 0,
            strategy,
            episode_days: 30,
        }
    }

    #[must_use]
    pub fn with_episode(mut self, episode: usize) -> Self {
        self.episode = episode;
        self
    }

    #[must_use]
    pub fn with_episode_days(mut self, episode_days: u32) -> Self {
        self.episode_days = episode_days;
        self
    }

    /// Seed actually fed to the environment and policy for this episode.
    #[must_use]
    pub fn run_seed(&self) -> u64 {
        episode_seed(self.seed, self.episode)
    }
}

/// Snapshot of a single decision.
#[derive(Debug, Clone, Serialize)]
pub struct StepRecord {
    pub step: usize,
    pub state: State,
    pub offers: usize,
    pub action: Action,
    pub rationale: Option<String>,
    pub next_state: State,
    pub reward: f64,
    pub hours: u32,
}

/// Aggregated result of one episode.
#[derive(Debug, Clone, Serialize)]
pub struct EpisodeSummary {
    pub seed: u64,
    pub episode: usize,
    pub policy: &'static str,
    pub steps: usize,
    pub rides: usize,
    pub refusals: usize,
    pub hours: u32,
    pub ride_hours: u32,
    pub idle_hours: u32,
    pub total_reward: f64,
    pub initial_state: State,
    pub final_state: State,
}

impl EpisodeSummary {
    /// Share of elapsed hours spent with a passenger, in percent.
    #[must_use]
    pub fn utilization(&self) -> f64 {
        if self.hours == 0 {
            0.0
        } else {
            f64::from(self.ride_hours) / f64::from(self.hours) * 100.0
        }
    }
}

/// Drives one environment instance until the episode's hour budget is spent.
pub struct EpisodeSession<'a> {
    env: &'a mut CabDriverEnv,
    table: &'a dyn TravelTimeLookup,
    policy: Box<dyn DriverPolicy>,
    config: EpisodeConfig,
    state: State,
    summary: EpisodeSummary,
}

impl<'a> EpisodeSession<'a> {
    /// Reseed `env` for this episode and start from its initial state.
    pub fn new(
        env: &'a mut CabDriverEnv,
        table: &'a dyn TravelTimeLookup,
        config: EpisodeConfig,
    ) -> Self {
        let seed = config.run_seed();
        env.reseed(seed);
        let state = env.initial_state();
        let policy = config.strategy.create_policy(seed);
        let summary = EpisodeSummary {
            seed: config.seed,
            episode: config.episode,
            policy: policy.name(),
            steps: 0,
            rides: 0,
            refusals: 0,
            hours: 0,
            ride_hours: 0,
            idle_hours: 0,
            total_reward: 0.0,
            initial_state: state,
            final_state: state,
        };
        Self {
            env,
            table,
            policy,
            config,
            state,
            summary,
        }
    }

    /// Hour budget for the whole episode.
    #[must_use]
    pub fn budget_hours(&self) -> u32 {
        let hours_per_day = u32::try_from(self.env.config().hours_per_day).unwrap_or(u32::MAX);
        self.config.episode_days.saturating_mul(hours_per_day)
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.summary.hours >= self.budget_hours()
    }

    /// Sample offers, let the policy decide, and apply the step.
    pub fn advance(&mut self) -> Result<StepRecord> {
        let offers = self
            .env
            .sample_requests(self.state)
            .with_context(|| format!("sampling requests at {}", self.state))?;
        let decision = self
            .policy
            .pick_action(self.env, self.state, &offers, self.table)?;
        let outcome = self
            .env
            .step(self.state, decision.action, self.table)
            .with_context(|| format!("stepping {} from {}", decision.action, self.state))?;

        let record = StepRecord {
            step: self.summary.steps,
            state: self.state,
            offers: offers.ride_count(),
            action: decision.action,
            rationale: decision.rationale,
            next_state: outcome.next_state,
            reward: outcome.reward,
            hours: outcome.total_time,
        };
        debug!(
            "seed {} step {}: {} at {} -> {} ({:+.1})",
            self.config.seed,
            record.step,
            record.action,
            record.state,
            record.next_state,
            record.reward
        );

        self.record(decision.action, outcome.breakdown, outcome.reward);
        self.state = outcome.next_state;
        self.summary.final_state = outcome.next_state;
        Ok(record)
    }

    fn record(&mut self, action: Action, breakdown: TimeBreakdown, reward: f64) {
        let summary = &mut self.summary;
        summary.steps += 1;
        if action.is_refusal() {
            summary.refusals += 1;
        } else {
            summary.rides += 1;
        }
        summary.hours = summary.hours.saturating_add(breakdown.total());
        summary.ride_hours = summary.ride_hours.saturating_add(breakdown.ride);
        summary.idle_hours = summary.idle_hours.saturating_add(breakdown.idle());
        summary.total_reward += reward;
    }

    /// Run to completion, handing every step to `on_step`.
    pub fn run_with<F>(mut self, mut on_step: F) -> Result<EpisodeSummary>
    where
        F: FnMut(&StepRecord),
    {
        while !self.is_finished() {
            let record = self.advance()?;
            on_step(&record);
        }
        Ok(self.summary)
    }

    pub fn run(self) -> Result<EpisodeSummary> {
        self.run_with(|_| {})
    }
}
