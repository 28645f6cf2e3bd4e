//! Card types and random card draws.

use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

/// Card suit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Suit {
    /// Hearts.
    Hearts,
    /// Diamonds.
    Diamonds,
    /// Clubs.
    Clubs,
    /// Spades.
    Spades,
}

/// All four suits, in display order.
pub const SUITS: [Suit; 4] = [Suit::Hearts, Suit::Diamonds, Suit::Clubs, Suit::Spades];

/// Lowest valid rank (Ace).
pub const ACE: u8 = 1;

/// Highest valid rank (King).
pub const KING: u8 = 13;

/// A playing card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    /// The suit of the card.
    pub suit: Suit,
    /// The rank of the card (1 = Ace, 11 = Jack, 12 = Queen, 13 = King).
    pub rank: u8,
}

impl Card {
    /// Creates a new card.
    ///
    /// Note: This function does not validate the rank. Values outside 1..=13
    /// are accepted but score as zero; [`crate::RoundState::validate`] rejects them.
    #[must_use]
    pub const fn new(suit: Suit, rank: u8) -> Self {
        Self { suit, rank }
    }

    /// Draws a card with a uniformly random rank and suit.
    ///
    /// Draws are independent: there is no deck, so the same card can come up
    /// any number of times in a round.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let rank = rng.random_range(ACE..=KING);
        Self::new(random_suit(rng), rank)
    }

    /// Draws a card of a random suit whose rank is picked from a target value.
    ///
    /// The mapping is `1 -> A`, `2..=10 -> numeral`, `11 -> J`, `12 -> Q`,
    /// `13 -> K`, so a request for 11 yields a Jack worth 10.
    pub fn for_value<R: Rng + ?Sized>(value: u8, rng: &mut R) -> Self {
        Self::new(random_suit(rng), value.clamp(ACE, KING))
    }

    /// Returns whether the card is valid (rank within 1..=13).
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.rank >= ACE && self.rank <= KING
    }

    /// Returns whether the card is an ace.
    #[must_use]
    pub const fn is_ace(&self) -> bool {
        self.rank == ACE
    }

    /// Blackjack value with the ace counted high.
    #[must_use]
    pub const fn value(&self) -> u8 {
        match self.rank {
            1 => 11,
            2..=10 => self.rank,
            11..=13 => 10,
            _ => 0,
        }
    }

    /// Display label: `A`, `2`..`10`, `J`, `Q` or `K`.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self.rank {
            1 => "A",
            2 => "2",
            3 => "3",
            4 => "4",
            5 => "5",
            6 => "6",
            7 => "7",
            8 => "8",
            9 => "9",
            10 => "10",
            11 => "J",
            12 => "Q",
            13 => "K",
            _ => "?",
        }
    }
}

fn random_suit<R: Rng + ?Sized>(rng: &mut R) -> Suit {
    *SUITS.choose(rng).unwrap_or(&Suit::Spades)
}
