//! Runtime errors raised by environment operations.
//!
//! Every variant is a precondition violation by the caller. None of them is
//! retried or defaulted.

use thiserror::Error;

use crate::space::{Action, State};

/// Errors raised when an operation receives inputs outside its domain.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum EnvError {
    #[error("location {location} is outside 0..{locations}")]
    LocationOutOfRange { location: u8, locations: usize },
    #[error("state {state} is outside the configured state space")]
    StateOutOfRange { state: State },
    #[error("action {action} is not part of the action space")]
    InvalidAction { action: Action },
    #[error("travel time lookup [{from}][{to}][{hour}][{day}] is outside the table domain")]
    TravelTimeOutOfDomain { from: u8, to: u8, hour: u8, day: u8 },
    #[error("travel time table shape mismatch: expected {expected} entries, got {actual}")]
    TableShape { expected: usize, actual: usize },
    #[error("transit of {transit}h plus ride of {ride}h overflows the step duration")]
    DurationOverflow { transit: u32, ride: u32 },
    #[error("requested {requested} distinct ride actions but only {available} exist")]
    InsufficientActions { requested: usize, available: usize },
    #[error("request rate for location {location} is invalid ({rate})")]
    InvalidRate { location: u8, rate: f64 },
    #[error("feature vector has length {actual}, expected {expected}")]
    FeatureLength { expected: usize, actual: usize },
    #[error("feature segment `{segment}` is not one-hot")]
    FeatureNotOneHot { segment: &'static str },
}
