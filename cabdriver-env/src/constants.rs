//! Centralized defaults and tuning constants for the cab driver environment.
//!
//! These values define the reference economics and demand model. Every one of
//! them can be overridden through [`crate::EnvConfig`]; the constants only
//! seed the defaults.

// Dimensions ---------------------------------------------------------------
pub const DEFAULT_LOCATIONS: usize = 5;
pub const HOURS_PER_DAY: usize = 24;
pub const DAYS_PER_WEEK: usize = 7;
/// Upper bound for any single dimension; indices are stored as `u8`.
pub(crate) const MAX_DIMENSION: usize = u8::MAX as usize;

// Economics ----------------------------------------------------------------
/// Fuel and operating cost charged for every elapsed hour.
pub const DEFAULT_COST_PER_HOUR: f64 = 5.0;
/// Revenue earned per hour with a passenger on board.
pub const DEFAULT_REVENUE_PER_HOUR: f64 = 9.0;
/// Hours spent idling when the driver refuses every request.
pub const REFUSAL_WAIT_HOURS: u32 = 1;

// Demand -------------------------------------------------------------------
/// Poisson mean for the number of requests seen at each location.
pub const DEFAULT_REQUEST_RATES: [f64; DEFAULT_LOCATIONS] = [2.0, 12.0, 4.0, 7.0, 8.0];
pub const DEFAULT_MAX_REQUESTS: usize = 15;

// Random streams -----------------------------------------------------------
pub(crate) const STREAM_INIT: &[u8] = b"init";
pub(crate) const STREAM_REQUESTS: &[u8] = b"requests";
