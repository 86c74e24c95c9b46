//! Injected randomness and time sources
//!
//! The scorer never reaches for ambient randomness or the wall clock
//! directly. Production wiring uses [`ThreadRngSource`] and [`SystemClock`];
//! tests pin both with [`FixedRandom`] and [`FixedClock`].

use chrono::{DateTime, Utc};
use rand::Rng;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Largest value strictly below 1.0, the upper bound of a unit draw
const MAX_UNIT: f64 = 1.0 - f64::EPSILON;

/// Source of independent uniform draws on `[0, 1)`
pub trait RandomSource: Send + Sync {
    fn next_unit(&self) -> f64;
}

/// Source of the current UTC instant
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Thread-local RNG from `rand`
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRngSource;

impl RandomSource for ThreadRngSource {
    fn next_unit(&self) -> f64 {
        rand::thread_rng().gen::<f64>()
    }
}

/// Replays a fixed sequence of draws, cycling when exhausted
#[derive(Debug)]
pub struct FixedRandom {
    values: Vec<f64>,
    cursor: AtomicUsize,
}

impl FixedRandom {
    pub fn new(values: Vec<f64>) -> Self {
        let values = if values.is_empty() { vec![0.0] } else { values };
        Self {
            values,
            cursor: AtomicUsize::new(0),
        }
    }

    /// A source that always returns `value`
    pub fn constant(value: f64) -> Self {
        Self::new(vec![value])
    }
}

impl RandomSource for FixedRandom {
    fn next_unit(&self) -> f64 {
        let i = self.cursor.fetch_add(1, Ordering::Relaxed) % self.values.len();
        self.values[i].clamp(0.0, MAX_UNIT)
    }
}

/// Wall clock via `chrono::Utc::now`
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock frozen at a single instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// The two raw unit draws behind a cosmic-sync pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SyncDraws {
    pub lunar: f64,
    pub galactic: f64,
}

impl SyncDraws {
    /// Out-of-range draws are clamped into `[0, 1)`.
    pub fn new(lunar: f64, galactic: f64) -> Self {
        Self {
            lunar: lunar.clamp(0.0, MAX_UNIT),
            galactic: galactic.clamp(0.0, MAX_UNIT),
        }
    }

    /// Take two independent draws from `source`
    pub fn draw(source: &dyn RandomSource) -> Self {
        let lunar = source.next_unit();
        let galactic = source.next_unit();
        Self::new(lunar, galactic)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thread_rng_in_unit_range() {
        let source = ThreadRngSource;
        for _ in 0..1000 {
            let u = source.next_unit();
            assert!((0.0..1.0).contains(&u));
        }
    }

    #[test]
    fn test_fixed_random_cycles() {
        let source = FixedRandom::new(vec![0.1, 0.2]);
        assert_eq!(source.next_unit(), 0.1);
        assert_eq!(source.next_unit(), 0.2);
        assert_eq!(source.next_unit(), 0.1);
    }

    #[test]
    fn test_draws_are_clamped() {
        let draws = SyncDraws::new(-3.0, 1.0);
        assert_eq!(draws.lunar, 0.0);
        assert!(draws.galactic < 1.0);

        let draws = SyncDraws::draw(&FixedRandom::new(vec![0.25, 0.75]));
        assert_eq!(draws, SyncDraws::new(0.25, 0.75));
    }
}
