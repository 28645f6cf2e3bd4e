//! Display projection of a round state.
//!
//! The dealer's hole card stays hidden while the player can still act or the
//! round is unresolved: only the first dealer card is shown, scored on its
//! own. Once the round is finished the full dealer hand is exposed.

extern crate alloc;

use alloc::vec::Vec;

use serde::Serialize;

use crate::card::{Card, Suit};
use crate::game::{DealerStatus, PlayerStatus, RoundState};
use crate::hand::score;

/// A card as shown to the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CardView {
    /// Rank label: `A`, `2`..`10`, `J`, `Q` or `K`.
    pub value: &'static str,
    /// Suit.
    pub suit: Suit,
}

impl From<&Card> for CardView {
    fn from(card: &Card) -> Self {
        Self {
            value: card.label(),
            suit: card.suit,
        }
    }
}

/// Player side of the projection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerView {
    /// The player's cards.
    pub hand: Vec<CardView>,
    /// Player status.
    pub state: PlayerStatus,
    /// The player's score.
    pub score: u8,
    /// Current balance.
    pub money: usize,
    /// Stake of the round in progress.
    pub current_bet: usize,
}

/// Dealer side of the projection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DealerView {
    /// Visible dealer cards.
    pub hand: Vec<CardView>,
    /// Dealer status.
    pub state: DealerStatus,
    /// Score of the visible cards only.
    pub score: u8,
    /// Whether the hole card is withheld.
    pub hole_card_hidden: bool,
}

/// What a caller may see of a round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundView {
    /// Player side.
    pub player_state: PlayerView,
    /// Dealer side.
    pub dealer_state: DealerView,
    /// Whether the round has been resolved.
    pub is_round_finished: bool,
}

/// Whether the dealer's hole card must be withheld for `state`.
#[must_use]
pub fn hides_hole_card(state: &RoundState) -> bool {
    state.player_status == PlayerStatus::Playing || !state.round_finished
}

impl From<&RoundState> for RoundView {
    fn from(state: &RoundState) -> Self {
        let hidden = hides_hole_card(state) && state.dealer_hand.len() > 1;
        let dealer_cards = if hides_hole_card(state) {
            &state.dealer_hand.cards()[..state.dealer_hand.len().min(1)]
        } else {
            state.dealer_hand.cards()
        };

        Self {
            player_state: PlayerView {
                hand: state.player_hand.cards().iter().map(CardView::from).collect(),
                state: state.player_status,
                score: state.player_hand.value(),
                money: state.balance,
                current_bet: state.current_bet,
            },
            dealer_state: DealerView {
                hand: dealer_cards.iter().map(CardView::from).collect(),
                state: state.dealer_status,
                score: score(dealer_cards),
                hole_card_hidden: hidden,
            },
            is_round_finished: state.round_finished,
        }
    }
}
