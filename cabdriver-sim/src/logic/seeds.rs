use anyhow::{Result, bail};

/// Split a comma-separated CLI argument, trimming blanks.
#[must_use]
pub fn split_csv(s: &str) -> Vec<String> {
    s.split(',')
        .map(|x| x.trim().to_string())
        .filter(|x| !x.is_empty())
        .collect()
}

/// Resolve CLI seed tokens into numeric seeds, preserving order and
/// dropping duplicates.
///
/// Negative integers are accepted and mapped to their magnitude.
pub fn resolve_seed_inputs(tokens: &[String]) -> Result<Vec<u64>> {
    let mut seeds: Vec<u64> = Vec::new();
    for token in tokens {
        let seed = if let Ok(value) = token.parse::<u64>() {
            value
        } else if let Ok(value) = token.parse::<i64>() {
            value.unsigned_abs()
        } else {
            bail!("invalid seed '{token}': expected an integer");
        };
        if !seeds.contains(&seed) {
            seeds.push(seed);
        }
    }
    if seeds.is_empty() {
        bail!("no seeds provided");
    }
    Ok(seeds)
}

/// Seed for the `episode`-th run of `seed`; episode 0 uses the seed itself.
#[must_use]
pub fn episode_seed(seed: u64, episode: usize) -> u64 {
    let episode = u64::try_from(episode).unwrap_or(u64::MAX);
    seed ^ episode.wrapping_mul(0x9E37_79B9_7F4A_7C15)
}
