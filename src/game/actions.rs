use crate::card::Card;
use crate::error::ActionError;
use crate::result::Outcome;

use super::{PlayerStatus, RoundEngine, RoundState};

impl RoundEngine {
    /// Player action: Hit (draw a card).
    ///
    /// Returns the drawn card, or `None` when the player is no longer playing
    /// and the state was left unchanged. A hit that takes the player over 21
    /// marks them busted; the caller then resolves the round.
    ///
    /// # Errors
    ///
    /// Returns an error if the round is already finished or no bet was placed.
    pub fn hit(&self, state: &mut RoundState) -> Result<Option<Card>, ActionError> {
        Self::ensure_in_round(state)?;

        if state.player_status != PlayerStatus::Playing {
            return Ok(None);
        }

        let card = self.draw();
        state.player_hand.add_card(card);

        if state.player_hand.is_bust() {
            state.player_status = PlayerStatus::Busted;
        }

        Ok(Some(card))
    }

    /// Player action: Stand (keep current hand).
    ///
    /// Only a playing hand changes status; the caller resolves the round next.
    ///
    /// # Errors
    ///
    /// Returns an error if the round is already finished or no bet was placed.
    pub fn stand(&self, state: &mut RoundState) -> Result<(), ActionError> {
        Self::ensure_in_round(state)?;

        if state.player_status == PlayerStatus::Playing {
            state.player_status = PlayerStatus::Standing;
        }

        Ok(())
    }

    /// Player action: Surrender (forfeit the bet).
    ///
    /// The round ends as a dealer win without the dealer drawing. The stake
    /// was debited when the bet was placed, so the balance does not move.
    ///
    /// # Errors
    ///
    /// Returns an error if the round is already finished or no bet was placed.
    pub fn surrender(&self, state: &mut RoundState) -> Result<Outcome, ActionError> {
        Self::ensure_in_round(state)?;

        state.player_status = PlayerStatus::Surrendered;
        Self::settle(state, Outcome::Dealer);

        Ok(Outcome::Dealer)
    }
}
