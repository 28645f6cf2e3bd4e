//! Round state types.

use serde::{Deserialize, Serialize};

use crate::error::StateError;
use crate::hand::Hand;

/// Player status within a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerStatus {
    /// Player may still act.
    #[default]
    Playing,
    /// Player went over 21.
    Busted,
    /// Player has stood.
    Standing,
    /// Player gave up the round.
    Surrendered,
}

/// Dealer status within a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DealerStatus {
    /// Dealer hand is still open.
    #[default]
    Playing,
    /// Dealer went over 21.
    Busted,
    /// Dealer hand is final.
    Standing,
}

/// The persisted unit of a game.
///
/// The balance carries across rounds; hands, statuses and the bet reset each
/// time a new bet is placed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundState {
    /// Money available to bet.
    pub balance: usize,
    /// The player's cards.
    pub player_hand: Hand,
    /// The dealer's cards, hole card included.
    pub dealer_hand: Hand,
    /// Player status.
    pub player_status: PlayerStatus,
    /// Dealer status.
    pub dealer_status: DealerStatus,
    /// Stake of the round in progress, 0 when none.
    pub current_bet: usize,
    /// Whether the round has been resolved.
    pub round_finished: bool,
}

impl RoundState {
    /// Creates a fresh state with the given balance.
    #[must_use]
    pub const fn new(balance: usize) -> Self {
        Self {
            balance,
            player_hand: Hand::new(),
            dealer_hand: Hand::new(),
            player_status: PlayerStatus::Playing,
            dealer_status: DealerStatus::Playing,
            current_bet: 0,
            round_finished: false,
        }
    }

    /// Checks that the state is one the engine could have produced.
    ///
    /// # Errors
    ///
    /// Returns an error if a card has a rank outside 1..=13, a finished round
    /// still holds a bet, or a live bet has no dealt cards.
    pub fn validate(&self) -> Result<(), StateError> {
        let cards = self
            .player_hand
            .cards()
            .iter()
            .chain(self.dealer_hand.cards());
        for card in cards {
            if !card.is_valid() {
                return Err(StateError::InvalidCard { rank: card.rank });
            }
        }

        if self.round_finished && self.current_bet > 0 {
            return Err(StateError::BetOnFinishedRound);
        }

        if self.current_bet > 0 && (self.player_hand.is_empty() || self.dealer_hand.is_empty()) {
            return Err(StateError::BetWithoutHands);
        }

        Ok(())
    }
}
