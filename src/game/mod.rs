//! Round engine.

use crate::card::Card;
use crate::error::ActionError;
use crate::options::RoundOptions;
use crate::rng::SharedRng;
use crate::view::RoundView;

mod actions;
mod bet;
mod dealer;
pub mod state;

pub use state::{DealerStatus, PlayerStatus, RoundState};

/// A blackjack round engine that applies bets and actions to a [`RoundState`].
///
/// The engine holds no game state of its own, only the table options and the
/// random source. Every operation validates before it mutates, so a failed
/// call leaves the state untouched. Callers that share a state between threads
/// must serialize access to it; the engine itself can be shared freely.
pub struct RoundEngine {
    /// Table options.
    pub options: RoundOptions,
    /// Random number generator.
    rng: SharedRng,
}

impl RoundEngine {
    /// Creates a new engine with the given seed.
    ///
    /// # Example
    ///
    /// ```
    /// use bjround::{RoundEngine, RoundOptions};
    ///
    /// let engine = RoundEngine::new(RoundOptions::default(), 42);
    /// assert_eq!(engine.new_state().balance, 100_000);
    /// ```
    #[must_use]
    pub fn new(options: RoundOptions, seed: u64) -> Self {
        Self {
            options,
            rng: SharedRng::seed_from_u64(seed),
        }
    }

    /// Creates a fresh game state with the starting balance.
    #[must_use]
    pub const fn new_state(&self) -> RoundState {
        RoundState::new(self.options.starting_balance)
    }

    /// Projects the state for display, hiding the dealer's hole card while
    /// the round is live.
    #[must_use]
    pub fn view(&self, state: &RoundState) -> RoundView {
        RoundView::from(state)
    }

    /// Draws an independent random card.
    fn draw(&self) -> Card {
        self.rng.with(|rng| Card::random(rng))
    }

    /// Draws a card whose rank is picked from `value`, with a random suit.
    fn draw_for_value(&self, value: u8) -> Card {
        self.rng.with(|rng| Card::for_value(value, rng))
    }

    /// Rejects actions on a round that is resolved or was never started.
    fn ensure_in_round(state: &RoundState) -> Result<(), ActionError> {
        if state.round_finished {
            return Err(ActionError::RoundAlreadyFinished);
        }
        if state.current_bet == 0 {
            return Err(ActionError::NotStarted);
        }
        Ok(())
    }
}
