use rand::Rng;

use crate::error::BetError;
use crate::hand::{Hand, incremental_value};
use crate::options::{MIN_TARGET, normalize_target};

use super::{DealerStatus, PlayerStatus, RoundEngine, RoundState};

impl RoundEngine {
    /// Places a bet and deals a fresh round.
    ///
    /// The stake is debited immediately. The dealer is dealt two cards against
    /// a target drawn from [`RoundOptions::dealer_target`], then the player is
    /// dealt two cards against a target below the dealer's dealt score.
    ///
    /// [`RoundOptions::dealer_target`]: crate::RoundOptions::dealer_target
    ///
    /// # Errors
    ///
    /// Returns an error if the amount is under the table minimum or exceeds
    /// the balance. The state is left untouched on error.
    pub fn place_bet(&self, state: &mut RoundState, amount: usize) -> Result<(), BetError> {
        if amount < self.options.minimum_bet {
            return Err(BetError::BelowMinimum {
                minimum: self.options.minimum_bet,
            });
        }

        if amount > state.balance {
            return Err(BetError::InsufficientFunds);
        }

        state.balance -= amount;
        state.current_bet = amount;
        state.round_finished = false;
        state.player_status = PlayerStatus::Playing;
        state.dealer_status = DealerStatus::Playing;

        state.dealer_hand = self.deal_dealer_hand();
        state.player_hand = self.deal_player_hand(&state.dealer_hand);

        Ok(())
    }

    fn deal_dealer_hand(&self) -> Hand {
        let range = normalize_target(&self.options.dealer_target);
        let target = self.rng.with(|rng| rng.random_range(range));
        self.deal_two_toward(target)
    }

    fn deal_player_hand(&self, dealer_hand: &Hand) -> Hand {
        let target = self.player_target(dealer_hand.value());
        self.deal_two_toward(target)
    }

    /// Picks the player's nominal target, one below the dealer's dealt score
    /// at most.
    ///
    /// A dealer score of 13 or less leaves no room above the floor; the range
    /// then collapses onto the floor.
    fn player_target(&self, dealer_value: u8) -> u8 {
        let floor = self.options.player_target_floor.max(MIN_TARGET);
        let ceiling = dealer_value.saturating_sub(1).max(floor);
        self.rng.with(|rng| rng.random_range(floor..=ceiling))
    }

    /// Deals two cards, steering the first toward `target`.
    ///
    /// A drawn card is kept when it fits under the target, or unconditionally
    /// once one card is held, so the target only shapes the first card and the
    /// final score may miss it either way.
    fn deal_two_toward(&self, target: u8) -> Hand {
        let target = target.max(MIN_TARGET);
        let mut hand = Hand::new();

        while hand.len() < 2 {
            let card = self.draw();
            if accepts(&hand, incremental_value(&card, hand.value()), target) {
                hand.add_card(card);
            }
        }

        hand
    }
}

fn accepts(hand: &Hand, value: u8, target: u8) -> bool {
    hand.value().saturating_add(value) <= target || hand.len() == 1
}
