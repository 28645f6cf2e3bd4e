//! A server-authoritative blackjack round engine with optional `no_std` support.
//!
//! The crate provides a [`RoundEngine`] that drives a single-player round held
//! in a [`RoundState`] value: placing a bet deals a biased starting hand, the
//! player hits, stands or surrenders, and resolution runs the dealer's
//! catch-up draw. The state is plain data; persisting it between calls is the
//! caller's job.
//!
//! # Example
//!
//! ```
//! use bjround::{RoundEngine, RoundOptions, RoundState};
//!
//! let engine = RoundEngine::new(RoundOptions::default(), 42);
//! let mut state = engine.new_state();
//! engine.place_bet(&mut state, 10_000).unwrap();
//! engine.stand(&mut state).unwrap();
//! let result = engine.resolve(&mut state).unwrap();
//! assert!(state.round_finished);
//! let _ = result.outcome;
//! ```
#![cfg_attr(not(feature = "std"), no_std)]
#![cfg_attr(docsrs, feature(doc_cfg))]

#[cfg(all(not(feature = "std"), not(feature = "alloc")))]
compile_error!(
    "`std` is disabled but `alloc` feature is not enabled. Enable `alloc` or keep `std` enabled."
);

extern crate alloc;

pub mod card;
pub mod error;
pub mod game;
pub mod hand;
pub mod options;
pub mod result;
mod rng;
pub mod view;

// Re-export main types
pub use card::{Card, SUITS, Suit};
pub use error::{ActionError, BetError, StateError};
pub use game::{DealerStatus, PlayerStatus, RoundEngine, RoundState};
pub use hand::Hand;
pub use options::{MIN_TARGET, RoundOptions};
pub use result::{Outcome, RoundResult};
pub use view::{CardView, DealerView, PlayerView, RoundView};
