//! Time and randomness sources.
//!
//! Both are traits so tests can pin the nonce, instance id and token age.

use rand::Rng;
use std::time::Instant;
use uuid::Uuid;

/// Monotonic time source used for token staleness checks.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// [`Clock`] backed by [`Instant::now`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Randomness used for request nonces and the per-process instance id.
pub trait RandomSource: Send + Sync {
    /// Uniform index in `0..bound`.
    fn index(&self, bound: usize) -> usize;

    /// A fresh random UUID.
    fn uuid(&self) -> Uuid;
}

/// [`RandomSource`] backed by the thread-local RNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn index(&self, bound: usize) -> usize {
        rand::rng().random_range(0..bound)
    }

    fn uuid(&self) -> Uuid {
        Uuid::new_v4()
    }
}
