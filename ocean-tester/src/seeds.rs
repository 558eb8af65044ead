use anyhow::{Result, bail};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

/// Seed used when no usable seed is given.
pub const DEFAULT_SEED: u64 = 1337;

/// Resolve CLI seed tokens into concrete seeds.
///
/// Accepts signed or unsigned integers and `random:N`, which draws `N`
/// seeds from a generator seeded with [`DEFAULT_SEED`] so runs stay
/// reproducible. Duplicates are dropped, keeping first occurrence order.
pub fn resolve_seed_inputs(tokens: &[String]) -> Result<Vec<u64>> {
    let mut seeds: Vec<u64> = Vec::new();

    for token in tokens {
        if token.is_empty() {
            continue;
        }

        if let Ok(value) = token.parse::<i64>() {
            push_unique(&mut seeds, value.unsigned_abs());
            continue;
        }

        if let Ok(value) = token.parse::<u64>() {
            push_unique(&mut seeds, value);
            continue;
        }

        if let Some(count) = token.strip_prefix("random:") {
            let Ok(count) = count.parse::<usize>() else {
                bail!("Invalid random seed count: {token}");
            };
            let mut rng = ChaCha20Rng::seed_from_u64(DEFAULT_SEED);
            for _ in 0..count {
                push_unique(&mut seeds, rng.gen_range(0..u64::MAX));
            }
            continue;
        }

        bail!("Unrecognized seed token: {token}");
    }

    if seeds.is_empty() {
        seeds.push(DEFAULT_SEED);
    }
    Ok(seeds)
}

fn push_unique(seeds: &mut Vec<u64>, seed: u64) {
    if !seeds.contains(&seed) {
        seeds.push(seed);
    }
}
