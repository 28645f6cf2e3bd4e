use alloc::vec::Vec;
use core::cmp::Ordering;

use crate::error::ActionError;
use crate::hand::BLACKJACK;
use crate::result::{Outcome, RoundResult};

use super::{DealerStatus, PlayerStatus, RoundEngine, RoundState};

impl RoundEngine {
    /// Resolves the round and settles the bet.
    ///
    /// A busted player loses without the dealer drawing. Otherwise the dealer
    /// keeps the dealt hand if it already leads or holds 21, and when behind
    /// draws cards sized to overtake the player:
    ///
    /// 1. `need` is `21 - dealer` when the player holds 21, else
    ///    `player - dealer + 1`, capped at [`RoundOptions::max_catch_up_value`].
    /// 2. The drawn card's rank is `need` itself, so 11 maps to a Jack.
    /// 3. Drawing stops once the dealer reaches the player's score or 21.
    ///
    /// [`RoundOptions::max_catch_up_value`]: crate::RoundOptions::max_catch_up_value
    ///
    /// # Errors
    ///
    /// Returns an error if the round is already finished or no bet was placed.
    pub fn resolve(&self, state: &mut RoundState) -> Result<RoundResult, ActionError> {
        Self::ensure_in_round(state)?;

        let player_value = state.player_hand.value();
        let mut dealer_value = state.dealer_hand.value();
        let mut dealer_draws = Vec::new();

        let outcome = if state.player_status == PlayerStatus::Busted {
            Outcome::Dealer
        } else if dealer_value == BLACKJACK && player_value == BLACKJACK {
            Outcome::Tie
        } else if dealer_value > player_value || dealer_value == BLACKJACK {
            Outcome::Dealer
        } else {
            while dealer_value < player_value && dealer_value < BLACKJACK {
                let card = self.draw_for_value(self.catch_up_value(player_value, dealer_value));
                state.dealer_hand.add_card(card);
                dealer_draws.push(card);
                dealer_value = state.dealer_hand.value();
            }

            if dealer_value > BLACKJACK {
                Outcome::Player
            } else {
                compare(player_value, dealer_value)
            }
        };

        state.dealer_status = if dealer_value > BLACKJACK {
            DealerStatus::Busted
        } else {
            DealerStatus::Standing
        };

        let bet = state.current_bet;
        let payout = Self::settle(state, outcome);

        Ok(RoundResult {
            outcome,
            bet,
            payout,
            player_value,
            dealer_value,
            dealer_draws,
        })
    }

    /// Value the dealer asks for on the next catch-up draw.
    fn catch_up_value(&self, player_value: u8, dealer_value: u8) -> u8 {
        let need = if player_value == BLACKJACK {
            BLACKJACK - dealer_value
        } else {
            player_value - dealer_value + 1
        };
        need.min(self.options.max_catch_up_value)
    }

    /// Credits the payout for `outcome` and closes the round.
    ///
    /// Returns the amount credited.
    pub(super) fn settle(state: &mut RoundState, outcome: Outcome) -> usize {
        let payout = outcome.payout(state.current_bet);
        state.balance += payout;
        state.current_bet = 0;
        state.round_finished = true;
        payout
    }
}

fn compare(player_value: u8, dealer_value: u8) -> Outcome {
    match player_value.cmp(&dealer_value) {
        Ordering::Greater => Outcome::Player,
        Ordering::Less => Outcome::Dealer,
        Ordering::Equal => Outcome::Tie,
    }
}
