//! Procedural problem generation scaled to a difficulty tier.
//!
//! Every generated expression has a computable integer value: subtraction
//! never goes negative and division always has an exact quotient.

use std::collections::BTreeSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::GenerateError;
use crate::model::{DifficultyLevel, Expression, Operator};

/// Uniform draws attempted before falling back to a scan for a composite.
const COMPOSITE_DRAWS: usize = 32;

/// Produces arithmetic problems from an owned randomness source.
#[derive(Debug, Clone)]
pub struct ExpressionGenerator<R = StdRng> {
    rng: R,
}

impl ExpressionGenerator<StdRng> {
    /// Generator seeded from the operating system.
    pub fn from_os_rng() -> Self {
        Self::new(StdRng::from_os_rng())
    }

    /// Deterministic generator, for reproducible drills and tests.
    pub fn from_seed(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> ExpressionGenerator<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Generate a new expression for the given difficulty.
    pub fn generate(
        &mut self,
        difficulty: DifficultyLevel,
    ) -> Result<Expression, GenerateError> {
        let operators = difficulty.operators();
        let operator = operators[self.rng.random_range(0..operators.len())];
        let (low, high) = difficulty.magnitude_range();

        let (a, b) = match operator {
            Operator::Add | Operator::Multiply => (
                self.rng.random_range(low..=high),
                self.rng.random_range(low..=high),
            ),
            Operator::Subtract => {
                let a = self.rng.random_range(low..=high);
                (a, self.rng.random_range(1..=a))
            }
            Operator::Divide => {
                let a = pick_composite(&mut self.rng, low, high)?;
                let candidates: Vec<i64> = divisors(a).into_iter().collect();
                if candidates.is_empty() {
                    return Err(GenerateError::UnsatisfiableRange { low, high });
                }
                (a, candidates[self.rng.random_range(0..candidates.len())])
            }
        };

        let expression = Expression::new(a, operator, b)?;
        tracing::debug!(%difficulty, expression = %expression, "generated problem");
        Ok(expression)
    }
}

/// Deterministic primality test by trial division over `6k ± 1`.
///
/// `0`, `1` and negative numbers are not prime.
pub fn is_prime(n: i64) -> bool {
    if n <= 1 {
        return false;
    }
    if n <= 3 {
        return true;
    }
    if n % 2 == 0 || n % 3 == 0 {
        return false;
    }
    let mut i = 5_i64;
    while i <= n / i {
        if n % i == 0 || n % (i + 2) == 0 {
            return false;
        }
        i += 6;
    }
    true
}

/// Non-trivial divisors of `n`: `d` and `n / d` for every `d` in
/// `2..=⌊√n⌋` that divides `n`.
///
/// Neither `1` nor `n` itself is ever included.
pub fn divisors(n: i64) -> BTreeSet<i64> {
    let mut set = BTreeSet::new();
    let mut d = 2_i64;
    while d <= n / d {
        if n % d == 0 {
            set.insert(d);
            set.insert(n / d);
        }
        d += 1;
    }
    set
}

/// Pick a composite number from `[low, high]`.
///
/// Draws uniformly a bounded number of times, then scans the whole range
/// from a random start before giving up.
pub(crate) fn pick_composite<R: Rng>(
    rng: &mut R,
    low: i64,
    high: i64,
) -> Result<i64, GenerateError> {
    let is_composite = |n: i64| n > 1 && !is_prime(n);

    for _ in 0..COMPOSITE_DRAWS {
        let n = rng.random_range(low..=high);
        if is_composite(n) {
            return Ok(n);
        }
    }

    let start = rng.random_range(low..=high);
    (start..=high)
        .chain(low..start)
        .find(|&n| is_composite(n))
        .ok_or(GenerateError::UnsatisfiableRange { low, high })
}
