//! Error types for round operations.

use thiserror::Error;

/// Errors that can occur when placing a bet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BetError {
    /// Bet is below the table minimum.
    #[error("minimum bet is {minimum}")]
    BelowMinimum {
        /// The table minimum.
        minimum: usize,
    },
    /// Bet exceeds the balance.
    #[error("not enough money to place this bet")]
    InsufficientFunds,
}

/// Errors that can occur during player actions and resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ActionError {
    /// No bet has been placed for this round.
    #[error("round not started, place a bet first")]
    NotStarted,
    /// The round has already been resolved.
    #[error("round is already finished")]
    RoundAlreadyFinished,
}

/// Errors reported when checking an externally supplied state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StateError {
    /// A card carries a rank outside 1..=13.
    #[error("invalid card rank {rank}")]
    InvalidCard {
        /// The offending rank.
        rank: u8,
    },
    /// A finished round still holds a bet.
    #[error("finished round still holds a bet")]
    BetOnFinishedRound,
    /// A bet is live but no cards were dealt.
    #[error("bet is live but hands are empty")]
    BetWithoutHands,
}
