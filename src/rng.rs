//! The engine's shared random source.
//!
//! `std` builds guard the generator with [`std::sync::Mutex`] and keep using
//! it after a panic poisoned the lock. `alloc`-only builds use a spin lock.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

#[cfg(feature = "std")]
type Lock<T> = std::sync::Mutex<T>;

#[cfg(all(not(feature = "std"), feature = "alloc"))]
type Lock<T> = spin::Mutex<T>;

/// A seedable generator that can be drawn from through `&self`.
pub struct SharedRng(Lock<ChaCha8Rng>);

impl SharedRng {
    pub const fn new(rng: ChaCha8Rng) -> Self {
        Self(Lock::new(rng))
    }

    pub fn seed_from_u64(seed: u64) -> Self {
        Self::new(ChaCha8Rng::seed_from_u64(seed))
    }

    /// Runs `f` with exclusive access to the generator.
    #[cfg(feature = "std")]
    pub fn with<R>(&self, f: impl FnOnce(&mut ChaCha8Rng) -> R) -> R {
        let mut rng = self
            .0
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        f(&mut rng)
    }

    /// Runs `f` with exclusive access to the generator.
    #[cfg(all(not(feature = "std"), feature = "alloc"))]
    pub fn with<R>(&self, f: impl FnOnce(&mut ChaCha8Rng) -> R) -> R {
        f(&mut self.0.lock())
    }
}
