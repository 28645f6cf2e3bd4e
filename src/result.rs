//! Round result types for resolution.

extern crate alloc;

use alloc::vec::Vec;

use serde::{Deserialize, Serialize};

use crate::card::Card;

/// Winner of a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    /// Player wins (dealer busts or player has the higher score).
    Player,
    /// Dealer wins (player busts or surrenders, or dealer has the higher score).
    Dealer,
    /// Both hands finish level.
    Tie,
}

impl Outcome {
    /// Amount credited back to the balance for a resolved bet.
    ///
    /// The stake was debited when the bet was placed, so a win returns twice
    /// the stake, a tie returns the stake and a loss returns nothing.
    #[must_use]
    pub const fn payout(self, bet: usize) -> usize {
        match self {
            Self::Player => bet * 2,
            Self::Tie => bet,
            Self::Dealer => 0,
        }
    }
}

/// Result of resolving a round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundResult {
    /// The winner.
    pub outcome: Outcome,
    /// The bet that was settled.
    pub bet: usize,
    /// Amount credited to the balance.
    pub payout: usize,
    /// The player's final score.
    pub player_value: u8,
    /// The dealer's final score.
    pub dealer_value: u8,
    /// Cards the dealer drew while catching up.
    pub dealer_draws: Vec<Card>,
}
