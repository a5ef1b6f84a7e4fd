//! Time and randomness seams shared by the simulated services.
//!
//! Artificial latency and reply timers go through [`Sleeper`], coin flips
//! and jitter through [`Chance`]. Tests swap both for deterministic doubles
//! so scenarios run without waiting.

use std::fmt;
use std::ops::RangeInclusive;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use mockable::{Clock, DefaultClock};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Async sleep used for simulated latency and timers.
#[async_trait]
pub trait Sleeper: Send + Sync {
    /// Wait for `duration`.
    async fn sleep(&self, duration: Duration);
}

/// Tokio-based sleeper implementation.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Source of randomness for simulated behaviour.
pub trait Chance: Send + Sync {
    /// Return `true` with the given probability, clamped to `0.0..=1.0`.
    fn happens(&self, probability: f64) -> bool;

    /// Pick a delay uniformly within `range`.
    fn delay_within(&self, range: RangeInclusive<Duration>) -> Duration;

    /// Pick an index below `len`. `len` must be non-zero.
    fn pick_index(&self, len: usize) -> usize;
}

/// [`Chance`] backed by a small, fast RNG.
pub struct RandomChance(Mutex<SmallRng>);

impl RandomChance {
    /// Seed from operating system entropy.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self(Mutex::new(SmallRng::from_entropy()))
    }

    /// Seed deterministically.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self(Mutex::new(SmallRng::seed_from_u64(seed)))
    }

    fn with_rng<T>(&self, f: impl FnOnce(&mut SmallRng) -> T) -> T {
        let mut rng = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut rng)
    }
}

impl fmt::Debug for RandomChance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RandomChance").finish_non_exhaustive()
    }
}

impl Chance for RandomChance {
    fn happens(&self, probability: f64) -> bool {
        let probability = if probability.is_nan() {
            0.0
        } else {
            probability.clamp(0.0, 1.0)
        };
        self.with_rng(|rng| rng.gen_bool(probability))
    }

    fn delay_within(&self, range: RangeInclusive<Duration>) -> Duration {
        let (start, end) = range.into_inner();
        if end <= start {
            return start;
        }
        self.with_rng(|rng| rng.gen_range(start..=end))
    }

    fn pick_index(&self, len: usize) -> usize {
        if len <= 1 {
            return 0;
        }
        self.with_rng(|rng| rng.gen_range(0..len))
    }
}

/// Clock, sleeper and randomness handed to each service at construction.
#[derive(Clone)]
pub struct ServiceRuntime {
    /// Wall-clock source for timestamps.
    pub clock: Arc<dyn Clock>,
    /// Async sleep implementation.
    pub sleeper: Arc<dyn Sleeper>,
    /// Randomness for simulated replies.
    pub chance: Arc<dyn Chance>,
}

impl ServiceRuntime {
    /// Bundle explicit implementations.
    pub fn new(clock: Arc<dyn Clock>, sleeper: Arc<dyn Sleeper>, chance: Arc<dyn Chance>) -> Self {
        Self {
            clock,
            sleeper,
            chance,
        }
    }
}

impl Default for ServiceRuntime {
    fn default() -> Self {
        Self {
            clock: Arc::new(DefaultClock),
            sleeper: Arc::new(TokioSleeper),
            chance: Arc::new(RandomChance::from_entropy()),
        }
    }
}

impl fmt::Debug for ServiceRuntime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceRuntime").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0.0, false)]
    #[case(-3.0, false)]
    #[case(f64::NAN, false)]
    #[case(1.0, true)]
    #[case(7.5, true)]
    fn certain_outcomes_ignore_the_rng(#[case] probability: f64, #[case] expected: bool) {
        let chance = RandomChance::seeded(7);
        for _ in 0..32 {
            assert_eq!(chance.happens(probability), expected);
        }
    }

    #[test]
    fn delays_stay_within_bounds() {
        let chance = RandomChance::seeded(11);
        let range = Duration::from_secs(2)..=Duration::from_secs(5);
        for _ in 0..64 {
            let delay = chance.delay_within(range.clone());
            assert!(range.contains(&delay), "{delay:?} out of range");
        }
    }

    #[test]
    fn degenerate_ranges_return_the_start() {
        let chance = RandomChance::seeded(3);
        let delay = chance.delay_within(Duration::from_secs(9)..=Duration::from_secs(1));
        assert_eq!(delay, Duration::from_secs(9));
        assert_eq!(chance.pick_index(0), 0);
        assert_eq!(chance.pick_index(1), 0);
    }

    #[test]
    fn pick_index_stays_below_len() {
        let chance = RandomChance::seeded(5);
        for _ in 0..64 {
            assert!(chance.pick_index(4) < 4);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn tokio_sleeper_waits_on_the_runtime_clock() {
        let started = tokio::time::Instant::now();
        TokioSleeper.sleep(Duration::from_millis(800)).await;
        assert!(started.elapsed() >= Duration::from_millis(800));
    }
}
