//! Test doubles shared by unit tests (in `src/`) and integration tests (in
//! `tests/`). Compiled for tests or with the `test-support` feature.

use std::ops::RangeInclusive;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use mockable::Clock;

use crate::domain::ports::{KeyValueStore, KeyValueStoreError};
use crate::domain::{Chance, ServiceRuntime, Sleeper};
use crate::outbound::storage::InMemoryKeyValueStore;

/// Fixed start instant used across scenarios.
#[must_use]
pub fn outbreak_day() -> DateTime<Utc> {
    match Utc.with_ymd_and_hms(2033, 9, 26, 8, 0, 0).single() {
        Some(instant) => instant,
        None => panic!("outbreak day must be a valid instant"),
    }
}

/// Clock that only moves when told to.
pub struct MutableClock(Mutex<DateTime<Utc>>);

impl MutableClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    pub fn advance(&self, delta: Duration) {
        let delta = match TimeDelta::from_std(delta) {
            Ok(delta) => delta,
            Err(error) => {
                panic!("failed to convert Duration to TimeDelta: {error}; delta={delta:?}")
            }
        };
        *self.lock_clock() += delta;
    }

    pub fn advance_minutes(&self, minutes: i64) {
        *self.lock_clock() += TimeDelta::minutes(minutes);
    }

    fn lock_clock(&self) -> MutexGuard<'_, DateTime<Utc>> {
        match self.0.lock() {
            Ok(guard) => guard,
            Err(_) => panic!("clock mutex"),
        }
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.lock_clock()
    }
}

/// Sleeper that returns at once.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImmediateSleeper;

#[async_trait]
impl Sleeper for ImmediateSleeper {
    async fn sleep(&self, _duration: Duration) {}
}

/// Sleeper that returns at once and remembers each requested delay.
#[derive(Debug, Default)]
pub struct RecordingSleeper(Mutex<Vec<Duration>>);

impl RecordingSleeper {
    /// Delays requested so far, in call order.
    pub fn recorded(&self) -> Vec<Duration> {
        match self.0.lock() {
            Ok(entries) => entries.clone(),
            Err(_) => panic!("sleeper mutex"),
        }
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        let mut entries = match self.0.lock() {
            Ok(entries) => entries,
            Err(_) => panic!("sleeper mutex"),
        };
        entries.push(duration);
    }
}

/// Deterministic [`Chance`]: a fixed outcome, the shortest delay and a
/// fixed pick.
#[derive(Debug, Clone, Copy)]
pub struct FixedChance {
    happens: bool,
    index: usize,
}

impl FixedChance {
    /// Every roll succeeds.
    pub const fn always() -> Self {
        Self {
            happens: true,
            index: 0,
        }
    }

    /// Every roll fails.
    pub const fn never() -> Self {
        Self {
            happens: false,
            index: 0,
        }
    }

    /// Pick `index` (wrapped to the list length) whenever asked.
    #[must_use]
    pub const fn picking(mut self, index: usize) -> Self {
        self.index = index;
        self
    }
}

impl Chance for FixedChance {
    fn happens(&self, _probability: f64) -> bool {
        self.happens
    }

    fn delay_within(&self, range: RangeInclusive<Duration>) -> Duration {
        *range.start()
    }

    fn pick_index(&self, len: usize) -> usize {
        if len == 0 { 0 } else { self.index % len }
    }
}

/// Runtime with a controllable clock, an instant sleeper and `chance`.
pub fn instant_runtime(chance: FixedChance) -> (ServiceRuntime, Arc<MutableClock>) {
    let clock = Arc::new(MutableClock::new(outbreak_day()));
    let runtime = ServiceRuntime::new(clock.clone(), Arc::new(ImmediateSleeper), Arc::new(chance));
    (runtime, clock)
}

/// In-memory store whose writes can be switched to fail.
#[derive(Debug, Default)]
pub struct FlakyKeyValueStore {
    inner: InMemoryKeyValueStore,
    fail_writes: AtomicBool,
}

impl FlakyKeyValueStore {
    /// Make later `set` and `remove` calls fail (or succeed again).
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn check(&self, key: &str) -> Result<(), KeyValueStoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            Err(KeyValueStoreError::write(key, "storage quota exceeded"))
        } else {
            Ok(())
        }
    }
}

impl KeyValueStore for FlakyKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, KeyValueStoreError> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), KeyValueStoreError> {
        self.check(key)?;
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), KeyValueStoreError> {
        self.check(key)?;
        self.inner.remove(key)
    }
}
