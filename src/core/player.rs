//! Player identification and per-player data.
//!
//! ## PlayerId
//!
//! Type-safe seat identifier. Seats are 0-based and assigned in join order.
//!
//! ## Player / Company
//!
//! Each player founds exactly one company. The player's founder equity plus
//! the investors' equity always sums to 100.

use serde::{Deserialize, Serialize};

use super::money::Cash;

/// Player seat identifier.
///
/// Player indices are 0-based: the first player is `PlayerId(0)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u8);

impl PlayerId {
    /// Create a new player ID.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Get the raw seat index (0-based).
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Iterate over all player IDs for a game with `player_count` players.
    ///
    /// ```
    /// use bubble_engine::core::PlayerId;
    ///
    /// let players: Vec<_> = PlayerId::all(4).collect();
    /// assert_eq!(players.len(), 4);
    /// assert_eq!(players[0], PlayerId::new(0));
    /// assert_eq!(players[3], PlayerId::new(3));
    /// ```
    pub fn all(player_count: usize) -> impl Iterator<Item = PlayerId> {
        (0..player_count.min(usize::from(u8::MAX)) as u8).map(PlayerId)
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.0)
    }
}

/// A player's startup.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Company {
    /// Number of products shipped.
    pub products: u32,
    /// Sum of the value of every product shipped.
    pub product_value: Cash,
    /// Total cash raised from funding rounds and the IPO.
    pub funding_raised: Cash,
    /// Has the company gone public?
    pub public: bool,
    /// Cached valuation, recomputed after every transition.
    pub valuation: Cash,
}

/// One seat at the table.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Player {
    /// Seat identifier.
    pub id: PlayerId,
    /// Display name supplied by the host.
    pub name: String,
    /// Cash on hand. Never negative.
    pub cash: Cash,
    /// Outstanding debt. Never negative.
    pub debt: Cash,
    /// Founder equity in percent.
    pub equity: u8,
    /// Board position, `0..board_size`.
    pub position: u8,
    /// Completed laps around the board.
    pub laps: u32,
    /// False once bankrupt.
    pub active: bool,
    /// The player's company.
    pub company: Company,
}

impl Player {
    /// Create a player at the start of a match.
    #[must_use]
    pub fn new(id: PlayerId, name: impl Into<String>, cash: Cash, equity: u8) -> Self {
        Self {
            id,
            name: name.into(),
            cash,
            debt: Cash::ZERO,
            equity,
            position: 0,
            laps: 0,
            active: true,
            company: Company::default(),
        }
    }

    /// Equity held by investors.
    #[must_use]
    pub fn investor_equity(&self) -> u8 {
        100u8.saturating_sub(self.equity)
    }

    /// Current company valuation.
    #[must_use]
    pub fn valuation(&self) -> Cash {
        self.company.valuation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_id_basics() {
        let p0 = PlayerId::new(0);
        let p1 = PlayerId::new(1);

        assert_eq!(p0.index(), 0);
        assert_eq!(p1.index(), 1);
        assert_eq!(format!("{}", p0), "Player 0");
    }

    #[test]
    fn test_player_id_all() {
        let players: Vec<_> = PlayerId::all(6).collect();
        assert_eq!(players.len(), 6);
        assert_eq!(players[5], PlayerId::new(5));
    }

    #[test]
    fn test_new_player() {
        let player = Player::new(PlayerId::new(1), "ada", Cash::new(500_000), 100);

        assert_eq!(player.name, "ada");
        assert_eq!(player.cash, Cash::new(500_000));
        assert_eq!(player.debt, Cash::ZERO);
        assert_eq!(player.position, 0);
        assert!(player.active);
        assert_eq!(player.investor_equity(), 0);
        assert_eq!(player.company.products, 0);
    }

    #[test]
    fn test_investor_equity() {
        let mut player = Player::new(PlayerId::new(0), "bo", Cash::ZERO, 100);
        player.equity = 35;
        assert_eq!(player.investor_equity(), 65);
        assert_eq!(u32::from(player.equity) + u32::from(player.investor_equity()), 100);
    }

    #[test]
    fn test_player_serialization() {
        let player = Player::new(PlayerId::new(2), "di", Cash::new(7), 90);
        let json = serde_json::to_string(&player).unwrap();
        let deserialized: Player = serde_json::from_str(&json).unwrap();
        assert_eq!(player, deserialized);
    }
}
