//! Environment configuration and travel-time inputs for simulation runs.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use cabdriver_env::{EnvConfig, TravelTimeTable};
use log::info;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

/// Shortest and longest synthetic trip between distinct locations, in hours.
const SYNTHETIC_HOURS: std::ops::RangeInclusive<u32> = 1..=11;

/// Read an [`EnvConfig`] from a JSON file and validate it.
pub fn load_config(path: &Path) -> Result<EnvConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let config = EnvConfig::from_json(&raw)
        .with_context(|| format!("failed to parse config {}", path.display()))?;
    config
        .validate()
        .with_context(|| format!("invalid config {}", path.display()))?;
    info!("loaded environment config from {}", path.display());
    Ok(config)
}

/// Read a travel-time table from a JSON file and check it covers `config`.
pub fn load_travel_times(path: &Path, config: &EnvConfig) -> Result<TravelTimeTable> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read travel times {}", path.display()))?;
    let table = TravelTimeTable::from_json(&raw)
        .with_context(|| format!("failed to parse travel times {}", path.display()))?;
    if !table.covers(config.locations, config.hours_per_day, config.days_per_week) {
        let (m, t, d) = table.dimensions();
        bail!(
            "travel times in {} are {m}x{m}x{t}x{d} but the environment needs {}x{}x{}x{}",
            path.display(),
            config.locations,
            config.locations,
            config.hours_per_day,
            config.days_per_week
        );
    }
    info!("loaded travel times from {}", path.display());
    Ok(table)
}

/// Seeded random table: whole hours in `1..=11` between distinct locations
/// and zero on the diagonal.
pub fn synthetic_travel_times(config: &EnvConfig, seed: u64) -> Result<TravelTimeTable> {
    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    let (m, t, d) = (config.locations, config.hours_per_day, config.days_per_week);
    let mut hours = Vec::with_capacity(m * m * t * d);
    for from in 0..m {
        for to in 0..m {
            for _ in 0..t * d {
                hours.push(if from == to {
                    0
                } else {
                    rng.gen_range(SYNTHETIC_HOURS)
                });
            }
        }
    }
    TravelTimeTable::from_flat(m, t, d, hours).context("building synthetic travel times")
}

#[cfg(test)]
mod tests {
    use super::*;
    use cabdriver_env::TravelTimeLookup;

    fn temp_file(label: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!(
            "cabdriver-inputs-{label}-{}",
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos()
        ));
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn synthetic_table_respects_bounds() {
        let config = EnvConfig::default();
        let table = synthetic_travel_times(&config, 9).unwrap();
        assert_eq!(table.dimensions(), (5, 24, 7));
        for from in 0..5 {
            for to in 0..5 {
                for hour in [0, 11, 23] {
                    let hours = table.hours(from, to, hour, 6).unwrap();
                    if from == to {
                        assert_eq!(hours, 0);
                    } else {
                        assert!(SYNTHETIC_HOURS.contains(&hours));
                    }
                }
            }
        }
    }

    #[test]
    fn synthetic_table_is_seeded() {
        let config = EnvConfig::default();
        assert_eq!(
            synthetic_travel_times(&config, 4).unwrap(),
            synthetic_travel_times(&config, 4).unwrap()
        );
        assert_ne!(
            synthetic_travel_times(&config, 4).unwrap(),
            synthetic_travel_times(&config, 5).unwrap()
        );
    }

    #[test]
    fn config_file_is_validated() {
        let path = temp_file("config", r#"{ "locations": 3, "request_rates": [1, 2, 3] }"#);
        let err = load_config(&path).unwrap_err();
        assert!(format!("{err:#}").contains("max_requests"));

        let ok = temp_file(
            "config-ok",
            r#"{ "locations": 3, "request_rates": [1, 2, 3], "max_requests": 6 }"#,
        );
        assert_eq!(load_config(&ok).unwrap().locations, 3);
    }

    #[test]
    fn undersized_table_is_rejected() {
        let table = TravelTimeTable::uniform(3, 24, 7, 2);
        let path = temp_file("table", &serde_json::to_string(&table).unwrap());
        let err = load_travel_times(&path, &EnvConfig::default()).unwrap_err();
        assert!(err.to_string().contains("3x3x24x7"));
    }
}
