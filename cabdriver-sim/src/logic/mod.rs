pub mod inputs;
pub mod policy;
pub mod reports;
pub mod seeds;
pub mod simulation;

pub use inputs::{load_config, load_travel_times, synthetic_travel_times};
pub use policy::DriverStrategy;
pub use seeds::{resolve_seed_inputs, split_csv};
pub use simulation::{EpisodeConfig, EpisodeSession, EpisodeSummary, StepRecord};
