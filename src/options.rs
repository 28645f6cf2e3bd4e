//! Table configuration options.

use core::ops::RangeInclusive;

/// Lowest usable dealing target. Every card is worth at least 2 as a first
/// card, so anything lower could never be dealt toward.
pub const MIN_TARGET: u8 = 2;

/// Lifts a target range to [`MIN_TARGET`] and collapses an inverted range
/// onto its start.
#[must_use]
pub fn normalize_target(target: &RangeInclusive<u8>) -> RangeInclusive<u8> {
    let start = (*target.start()).max(MIN_TARGET);
    let end = (*target.end()).max(start);
    start..=end
}

/// Configuration options for the round engine.
///
/// Use the builder pattern to customize options:
///
/// ```
/// use bjround::RoundOptions;
///
/// let options = RoundOptions::default()
///     .with_starting_balance(50_000)
///     .with_minimum_bet(5_000);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundOptions {
    /// Balance of a freshly created game.
    pub starting_balance: usize,
    /// Smallest accepted bet.
    pub minimum_bet: usize,
    /// Range the dealer's nominal two-card target is drawn from.
    ///
    /// The engine normalizes it with [`normalize_target`] before drawing.
    pub dealer_target: RangeInclusive<u8>,
    /// Lower bound of the player's nominal two-card target.
    ///
    /// The upper bound is one below the dealer's dealt score, clamped so it
    /// never falls under this floor.
    pub player_target_floor: u8,
    /// Largest value the dealer asks for in a single catch-up draw.
    pub max_catch_up_value: u8,
}

impl Default for RoundOptions {
    fn default() -> Self {
        Self {
            starting_balance: 100_000,
            minimum_bet: 10_000,
            dealer_target: 18..=21,
            player_target_floor: 12,
            max_catch_up_value: 11,
        }
    }
}

impl RoundOptions {
    /// Sets the starting balance.
    ///
    /// # Example
    ///
    /// ```
    /// use bjround::RoundOptions;
    ///
    /// let options = RoundOptions::default().with_starting_balance(250_000);
    /// assert_eq!(options.starting_balance, 250_000);
    /// ```
    #[must_use]
    pub const fn with_starting_balance(mut self, balance: usize) -> Self {
        self.starting_balance = balance;
        self
    }

    /// Sets the minimum bet.
    ///
    /// # Example
    ///
    /// ```
    /// use bjround::RoundOptions;
    ///
    /// let options = RoundOptions::default().with_minimum_bet(1_000);
    /// assert_eq!(options.minimum_bet, 1_000);
    /// ```
    #[must_use]
    pub const fn with_minimum_bet(mut self, minimum: usize) -> Self {
        self.minimum_bet = minimum;
        self
    }

    /// Sets the dealer target range.
    ///
    /// Bounds under [`MIN_TARGET`] are raised to it, and an inverted range
    /// collapses onto its start.
    ///
    /// # Example
    ///
    /// ```
    /// use bjround::RoundOptions;
    ///
    /// let options = RoundOptions::default().with_dealer_target(17..=20);
    /// assert_eq!(options.dealer_target, 17..=20);
    /// ```
    #[must_use]
    pub fn with_dealer_target(mut self, target: RangeInclusive<u8>) -> Self {
        self.dealer_target = normalize_target(&target);
        self
    }

    /// Sets the floor of the player target range, no lower than [`MIN_TARGET`].
    #[must_use]
    pub const fn with_player_target_floor(mut self, floor: u8) -> Self {
        self.player_target_floor = if floor < MIN_TARGET { MIN_TARGET } else { floor };
        self
    }

    /// Sets the cap on a single catch-up draw.
    #[must_use]
    pub const fn with_max_catch_up_value(mut self, value: u8) -> Self {
        self.max_catch_up_value = value;
        self
    }
}
