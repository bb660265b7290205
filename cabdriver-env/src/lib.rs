//! Cab Driver Environment
//!
//! Environment side of an hour-by-hour decision process for a cab driver:
//! each step the driver sees a random set of ride requests at their current
//! location, accepts one or refuses them all, and is rewarded with the net
//! revenue of the hours that pass. This crate provides the mechanics only;
//! agents, training loops and travel-time sources live elsewhere.

pub mod clock;
pub mod config;
pub mod constants;
pub mod encoding;
pub mod error;
pub mod numbers;
pub mod requests;
pub mod reward;
pub mod rng;
pub mod space;
pub mod step;
pub mod transition;
pub mod travel;

use log::{debug, trace};

// Re-export commonly used types
pub use clock::Clock;
pub use config::{ConfigError, EnvConfig};
pub use encoding::StateEncoder;
pub use error::EnvError;
pub use requests::{RequestBatch, RequestSampler};
pub use reward::RewardRates;
pub use rng::{CountingRng, RngBundle};
pub use space::{Action, ActionIndex, ActionSpace, Location, REFUSAL_INDEX, State, StateSpace};
pub use step::StepOutcome;
pub use transition::{TimeBreakdown, Transition, TransitionEngine};
pub use travel::{TravelTimeLookup, TravelTimeTable};

/// A configured environment instance with its own random streams.
///
/// Instances are cheap to clone and never share randomness, so parallel
/// rollouts should each construct (or clone and reseed) their own.
#[derive(Debug, Clone)]
pub struct CabDriverEnv {
    config: EnvConfig,
    actions: ActionSpace,
    states: StateSpace,
    sampler: RequestSampler,
    engine: TransitionEngine,
    rates: RewardRates,
    encoder: StateEncoder,
    rng: RngBundle,
    initial_state: State,
    initial_action: Action,
}

impl CabDriverEnv {
    /// Validate `config`, enumerate both spaces and pick a random initial state.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the configuration is inconsistent.
    pub fn new(config: EnvConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        let clock = config.clock()?;
        let actions = ActionSpace::new(config.locations);
        let states = StateSpace::new(
            config.locations,
            config.hours_per_day,
            config.days_per_week,
        );
        let mut env = Self {
            sampler: RequestSampler::from_config(&config),
            engine: TransitionEngine::new(clock),
            rates: RewardRates::from_config(&config),
            encoder: StateEncoder::new(
                config.locations,
                config.hours_per_day,
                config.days_per_week,
            ),
            rng: RngBundle::from_user_seed(seed),
            initial_state: State::default(),
            initial_action: Action::Refuse,
            config,
            actions,
            states,
        };
        env.draw_initial();
        debug!(
            "environment ready: {} actions, {} states, seed {seed}, initial state {}",
            env.actions.len(),
            env.states.len(),
            env.initial_state
        );
        Ok(env)
    }

    /// Environment with the reference configuration.
    ///
    /// # Errors
    ///
    /// Never fails for the built-in defaults; the `Result` mirrors [`CabDriverEnv::new`].
    pub fn with_defaults(seed: u64) -> Result<Self, ConfigError> {
        Self::new(EnvConfig::default(), seed)
    }

    fn draw_initial(&mut self) {
        let rng = self.rng.init();
        self.initial_action = self.actions.random_action(rng);
        self.initial_state = self.states.random_state(rng);
    }

    /// Action space, state space and the initial state chosen at construction.
    #[must_use]
    pub fn reset(&self) -> (&ActionSpace, &StateSpace, State) {
        (&self.actions, &self.states, self.initial_state)
    }

    /// Deterministically reseed every stream and redraw the initial state.
    pub fn reseed(&mut self, seed: u64) {
        self.rng = RngBundle::from_user_seed(seed);
        self.draw_initial();
    }

    #[must_use]
    pub const fn config(&self) -> &EnvConfig {
        &self.config
    }

    #[must_use]
    pub const fn action_space(&self) -> &ActionSpace {
        &self.actions
    }

    #[must_use]
    pub const fn state_space(&self) -> &StateSpace {
        &self.states
    }

    #[must_use]
    pub const fn encoder(&self) -> &StateEncoder {
        &self.encoder
    }

    #[must_use]
    pub const fn rng_bundle(&self) -> &RngBundle {
        &self.rng
    }

    #[must_use]
    pub const fn initial_state(&self) -> State {
        self.initial_state
    }

    /// Random action drawn alongside the initial state.
    #[must_use]
    pub const fn initial_action(&self) -> Action {
        self.initial_action
    }

    /// Uniformly random state from the initialization stream.
    pub fn random_state(&mut self) -> State {
        self.states.random_state(self.rng.init())
    }

    /// Uniformly random action from the initialization stream.
    pub fn random_action(&mut self) -> Action {
        self.actions.random_action(self.rng.init())
    }

    /// Ride requests available in `state`, refusal last.
    ///
    /// # Errors
    ///
    /// Returns an error if `state` is outside the state space.
    pub fn sample_requests(&mut self, state: State) -> Result<RequestBatch, EnvError> {
        self.check_state(state)?;
        self.sampler.sample(state, &self.actions, self.rng.requests())
    }

    /// Next state and time breakdown for `action` in `state`.
    ///
    /// # Errors
    ///
    /// Returns an error for out-of-range states, unknown actions, or lookups
    /// the table does not cover.
    pub fn transition<T: TravelTimeLookup + ?Sized>(
        &self,
        state: State,
        action: Action,
        table: &T,
    ) -> Result<Transition, EnvError> {
        self.check_state(state)?;
        self.check_action(action)?;
        self.engine.apply(state, action, table)
    }

    /// Next state only.
    ///
    /// # Errors
    ///
    /// Same as [`CabDriverEnv::transition`].
    pub fn next_state<T: TravelTimeLookup + ?Sized>(
        &self,
        state: State,
        action: Action,
        table: &T,
    ) -> Result<State, EnvError> {
        self.transition(state, action, table)
            .map(|transition| transition.next_state)
    }

    /// Reward only.
    ///
    /// # Errors
    ///
    /// Same as [`CabDriverEnv::transition`].
    pub fn reward<T: TravelTimeLookup + ?Sized>(
        &self,
        state: State,
        action: Action,
        table: &T,
    ) -> Result<f64, EnvError> {
        let transition = self.transition(state, action, table)?;
        Ok(self.rates.reward(action, transition.breakdown))
    }

    /// Take one step: next state, reward and elapsed hours.
    ///
    /// # Errors
    ///
    /// Same as [`CabDriverEnv::transition`].
    pub fn step<T: TravelTimeLookup + ?Sized>(
        &self,
        state: State,
        action: Action,
        table: &T,
    ) -> Result<StepOutcome, EnvError> {
        self.check_state(state)?;
        self.check_action(action)?;
        let outcome = step::step(&self.engine, &self.rates, state, action, table)?;
        trace!(
            "step {state} --{action}--> {} reward {:.1} in {}h",
            outcome.next_state, outcome.reward, outcome.total_time
        );
        Ok(outcome)
    }

    /// One-hot features of `state`, length `m + t + d`.
    ///
    /// # Errors
    ///
    /// Returns an error if `state` is outside the state space.
    pub fn encode(&self, state: State) -> Result<Vec<u8>, EnvError> {
        self.encoder.encode(state)
    }

    fn check_state(&self, state: State) -> Result<(), EnvError> {
        if self.states.contains(state) {
            Ok(())
        } else {
            Err(EnvError::StateOutOfRange { state })
        }
    }

    fn check_action(&self, action: Action) -> Result<(), EnvError> {
        if self.actions.contains(action) {
            Ok(())
        } else {
            Err(EnvError::InvalidAction { action })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> TravelTimeTable {
        TravelTimeTable::uniform(5, 24, 7, 2)
    }

    #[test]
    fn reset_exposes_spaces_and_initial_state() {
        let env = CabDriverEnv::with_defaults(0xABCD).unwrap();
        let (actions, states, initial) = env.reset();
        assert_eq!(actions.len(), 21);
        assert_eq!(states.len(), 840);
        assert!(states.contains(initial));
        assert_eq!(initial, env.initial_state());
        assert!(actions.contains(env.initial_action()));
    }

    #[test]
    fn same_seed_same_initial_state_and_requests() {
        let mut a = CabDriverEnv::with_defaults(99).unwrap();
        let mut b = CabDriverEnv::with_defaults(99).unwrap();
        assert_eq!(a.initial_state(), b.initial_state());
        let state = a.initial_state();
        for _ in 0..10 {
            assert_eq!(
                a.sample_requests(state).unwrap(),
                b.sample_requests(state).unwrap()
            );
        }
    }

    #[test]
    fn reseed_replays_the_request_stream() {
        let mut env = CabDriverEnv::with_defaults(5).unwrap();
        let state = State::new(1, 0, 0);
        let first: Vec<_> = (0..5).map(|_| env.sample_requests(state).unwrap()).collect();
        env.reseed(5);
        let replay: Vec<_> = (0..5).map(|_| env.sample_requests(state).unwrap()).collect();
        assert_eq!(first, replay);
        assert_eq!(env.rng_bundle().seed(), 5);
    }

    #[test]
    fn draw_counters_track_each_stream() {
        let mut env = CabDriverEnv::with_defaults(12).unwrap();
        let init_draws = env.rng_bundle().init_draws();
        assert!(init_draws > 0);
        assert_eq!(env.rng_bundle().request_draws(), 0);

        let _ = env.sample_requests(State::new(1, 0, 0)).unwrap();
        assert!(env.rng_bundle().request_draws() > 0);
        assert_eq!(env.rng_bundle().init_draws(), init_draws);

        let _ = env.random_state();
        assert!(env.rng_bundle().init_draws() > init_draws);
    }

    #[test]
    fn invalid_config_is_rejected_eagerly() {
        let cfg = EnvConfig {
            locations: 3,
            request_rates: vec![1.0; 3],
            ..EnvConfig::default()
        };
        assert!(matches!(
            CabDriverEnv::new(cfg, 1),
            Err(ConfigError::RequestClampExceedsActions { .. })
        ));
    }

    #[test]
    fn step_rejects_foreign_states_and_actions() {
        let env = CabDriverEnv::with_defaults(1).unwrap();
        assert!(matches!(
            env.step(State::new(9, 0, 0), Action::Refuse, &table()),
            Err(EnvError::StateOutOfRange { .. })
        ));
        assert!(matches!(
            env.step(
                State::new(0, 0, 0),
                Action::Ride { pickup: 1, drop: 1 },
                &table()
            ),
            Err(EnvError::InvalidAction { .. })
        ));
        assert!(matches!(
            env.step(
                State::new(0, 0, 0),
                Action::Ride { pickup: 0, drop: 7 },
                &table()
            ),
            Err(EnvError::InvalidAction { .. })
        ));
    }

    #[test]
    fn step_agrees_with_reward_and_next_state() {
        let env = CabDriverEnv::with_defaults(1).unwrap();
        let state = State::new(3, 21, 6);
        let action = Action::Ride { pickup: 0, drop: 4 };
        let outcome = env.step(state, action, &table()).unwrap();
        assert_eq!(
            outcome.next_state,
            env.next_state(state, action, &table()).unwrap()
        );
        let reward = env.reward(state, action, &table()).unwrap();
        assert!((outcome.reward - reward).abs() < f64::EPSILON);
        assert_eq!(outcome.total_time, 4);
        assert_eq!(outcome.next_state, State::new(4, 1, 0));
    }

    #[test]
    fn encode_has_expected_dimension() {
        let env = CabDriverEnv::with_defaults(1).unwrap();
        let features = env.encode(env.initial_state()).unwrap();
        assert_eq!(features.len(), env.config().feature_len());
        assert_eq!(env.encoder().decode(&features), Ok(env.initial_state()));
    }

    #[test]
    fn random_actions_come_from_the_init_stream() {
        let mut env = CabDriverEnv::with_defaults(21).unwrap();
        let init_draws = env.rng_bundle().init_draws();
        for _ in 0..50 {
            let action = env.random_action();
            assert!(env.action_space().contains(action));
        }
        assert!(env.rng_bundle().init_draws() > init_draws);
        assert_eq!(env.rng_bundle().request_draws(), 0);

        let mut twin = CabDriverEnv::with_defaults(21).unwrap();
        let mut replay = CabDriverEnv::with_defaults(21).unwrap();
        let a: Vec<_> = (0..10).map(|_| twin.random_action()).collect();
        let b: Vec<_> = (0..10).map(|_| replay.random_action()).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn calendar_errors_name_the_field_at_construction() {
        let cfg = EnvConfig {
            days_per_week: 0,
            ..EnvConfig::default()
        };
        assert!(matches!(
            CabDriverEnv::new(cfg, 1),
            Err(ConfigError::DimensionRange {
                field: "days_per_week",
                ..
            })
        ));
    }

    #[test]
    fn overflowing_travel_times_are_reported() {
        let env = CabDriverEnv::with_defaults(1).unwrap();
        let mut table = table();
        table.set(0, 1, 0, 0, u32::MAX).unwrap();
        let err = env
            .step(State::new(0, 0, 0), Action::Ride { pickup: 1, drop: 2 }, &table)
            .unwrap_err();
        assert_eq!(
            err,
            EnvError::DurationOverflow {
                transit: u32::MAX,
                ride: 2,
            }
        );
    }
}
