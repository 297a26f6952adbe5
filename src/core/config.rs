//! Rules configuration.
//!
//! Every tunable number of the game lives in [`RulesConfig`]. The defaults
//! are the published Bubble constants; hosts may load house rules from TOML.
//! A config is embedded in each `GameState`, so a match can never switch
//! rules mid-game.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::money::Cash;

/// Number of tiles on the standard board.
pub const BOARD_SIZE: u8 = 40;
/// Cash each founder starts with.
pub const STARTING_CASH: i64 = 500_000;
/// Founder equity at match start, in percent.
pub const STARTING_EQUITY: u8 = 100;
/// Founders may never own less than this, in percent.
pub const MIN_EQUITY: u8 = 10;
/// Valuation that wins the game.
pub const UNICORN_VALUATION: i64 = 1_000_000_000;
/// Valuation required to go public.
pub const IPO_MIN_VALUATION: i64 = 500_000_000;
/// Cash paid on landing on Demo Day.
pub const DEMO_DAY_BONUS: i64 = 200_000;

/// Complete rule set for one match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Number of tiles on the board.
    pub board_size: u8,
    /// Fewest players allowed at the table.
    pub min_players: u8,
    /// Most players allowed at the table.
    pub max_players: u8,
    /// Cash each founder starts with.
    pub starting_cash: Cash,
    /// Founder equity at match start.
    pub starting_equity: u8,
    /// Equity floor.
    pub min_equity: u8,
    /// Winning valuation.
    pub unicorn_valuation: Cash,
    /// Valuation required to declare an IPO.
    pub ipo_min_valuation: Cash,
    /// Demo Day payout.
    pub demo_day_bonus: Cash,
    /// Valuation of a company with no products and no funding.
    pub seed_valuation: Cash,
    /// Dice rolled per turn.
    pub dice_count: u8,
    /// Faces per die.
    pub dice_sides: u8,
    /// Interest charged on outstanding debt at the start of each turn.
    pub debt_interest_pct: u8,
    /// Ending a turn with more debt than this is bankruptcy.
    pub debt_ceiling: Cash,
    /// Equity floated to the public on IPO.
    pub ipo_float_pct: u8,
    /// Valuation multiplier applied to public companies.
    pub ipo_premium_pct: u16,
    /// Market sentiment at match start.
    pub starting_sentiment: u16,
    /// Lowest market sentiment.
    pub sentiment_floor: u16,
    /// Highest market sentiment.
    pub sentiment_ceiling: u16,
    /// Turn limit. Reaching it without a winner bursts the bubble.
    pub max_turns: Option<u32>,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            board_size: BOARD_SIZE,
            min_players: 2,
            max_players: 6,
            starting_cash: Cash::new(STARTING_CASH),
            starting_equity: STARTING_EQUITY,
            min_equity: MIN_EQUITY,
            unicorn_valuation: Cash::new(UNICORN_VALUATION),
            ipo_min_valuation: Cash::new(IPO_MIN_VALUATION),
            demo_day_bonus: Cash::new(DEMO_DAY_BONUS),
            seed_valuation: Cash::new(5_000_000),
            dice_count: 2,
            dice_sides: 6,
            debt_interest_pct: 10,
            debt_ceiling: Cash::new(1_000_000),
            ipo_float_pct: 20,
            ipo_premium_pct: 200,
            starting_sentiment: 100,
            sentiment_floor: 50,
            sentiment_ceiling: 200,
            max_turns: Some(600),
        }
    }
}

impl RulesConfig {
    /// Create the default rule set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse house rules from TOML. Missing keys take their default value.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid TOML for this schema or
    /// the resulting config fails [`RulesConfig::validate`].
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: RulesConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Set starting cash.
    #[must_use]
    pub fn with_starting_cash(mut self, cash: Cash) -> Self {
        self.starting_cash = cash;
        self
    }

    /// Set the equity floor.
    #[must_use]
    pub fn with_min_equity(mut self, pct: u8) -> Self {
        self.min_equity = pct;
        self
    }

    /// Set the winning valuation.
    #[must_use]
    pub fn with_unicorn_valuation(mut self, valuation: Cash) -> Self {
        self.unicorn_valuation = valuation;
        self
    }

    /// Set the IPO threshold.
    #[must_use]
    pub fn with_ipo_min_valuation(mut self, valuation: Cash) -> Self {
        self.ipo_min_valuation = valuation;
        self
    }

    /// Set the debt ceiling.
    #[must_use]
    pub fn with_debt_ceiling(mut self, ceiling: Cash) -> Self {
        self.debt_ceiling = ceiling;
        self
    }

    /// Set the turn limit.
    #[must_use]
    pub fn with_max_turns(mut self, max_turns: Option<u32>) -> Self {
        self.max_turns = max_turns;
        self
    }

    /// Set the board size.
    #[must_use]
    pub fn with_board_size(mut self, size: u8) -> Self {
        self.board_size = size;
        self
    }

    /// Check the config for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns the first inconsistency found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.board_size < 2 {
            return Err(ConfigError::Invalid("board_size must be at least 2".into()));
        }
        if self.min_players == 0 || self.min_players > self.max_players {
            return Err(ConfigError::Invalid(format!(
                "player range {}..={} is empty",
                self.min_players, self.max_players
            )));
        }
        if self.starting_equity > 100 || self.min_equity > self.starting_equity {
            return Err(ConfigError::Invalid(format!(
                "equity floor {} must not exceed starting equity {} (max 100)",
                self.min_equity, self.starting_equity
            )));
        }
        if self.starting_cash.is_negative()
            || self.demo_day_bonus.is_negative()
            || self.seed_valuation.is_negative()
            || self.debt_ceiling.is_negative()
        {
            return Err(ConfigError::Invalid("monetary settings must be non-negative".into()));
        }
        if self.dice_count == 0 || self.dice_sides < 2 {
            return Err(ConfigError::Invalid("need at least one die with two sides".into()));
        }
        if self.ipo_float_pct > 100 {
            return Err(ConfigError::Invalid("ipo_float_pct must be at most 100".into()));
        }
        if !(self.sentiment_floor..=self.sentiment_ceiling).contains(&self.starting_sentiment) {
            return Err(ConfigError::Invalid(format!(
                "starting sentiment {} outside {}..={}",
                self.starting_sentiment, self.sentiment_floor, self.sentiment_ceiling
            )));
        }
        if self.max_turns == Some(0) {
            return Err(ConfigError::Invalid("max_turns must be positive".into()));
        }
        Ok(())
    }
}

/// Invalid rule configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The TOML could not be parsed.
    #[error("failed to parse rules: {0}")]
    Parse(#[from] toml::de::Error),

    /// The values are inconsistent.
    #[error("invalid rules: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_published_constants() {
        let config = RulesConfig::default();

        assert_eq!(config.board_size, 40);
        assert_eq!(config.starting_cash, Cash::new(500_000));
        assert_eq!(config.starting_equity, 100);
        assert_eq!(config.min_equity, 10);
        assert_eq!(config.unicorn_valuation, Cash::new(1_000_000_000));
        assert_eq!(config.ipo_min_valuation, Cash::new(500_000_000));
        assert_eq!(config.demo_day_bonus, Cash::new(200_000));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = RulesConfig::new()
            .with_starting_cash(Cash::new(1_000))
            .with_min_equity(25)
            .with_max_turns(None);

        assert_eq!(config.starting_cash, Cash::new(1_000));
        assert_eq!(config.min_equity, 25);
        assert_eq!(config.max_turns, None);
    }

    #[test]
    fn test_validate_rejects_bad_equity() {
        let config = RulesConfig::new().with_min_equity(101);
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_validate_rejects_empty_player_range() {
        let config = RulesConfig {
            min_players: 4,
            max_players: 3,
            ..RulesConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_sentiment_out_of_range() {
        let config = RulesConfig {
            starting_sentiment: 10,
            ..RulesConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_toml_partial() {
        let config = RulesConfig::from_toml_str(
            r#"
            starting_cash = 750000
            min_equity = 15
            max_turns = 200
            "#,
        )
        .unwrap();

        assert_eq!(config.starting_cash, Cash::new(750_000));
        assert_eq!(config.min_equity, 15);
        assert_eq!(config.max_turns, Some(200));
        // Untouched keys keep defaults
        assert_eq!(config.board_size, 40);
    }

    #[test]
    fn test_from_toml_invalid() {
        assert!(matches!(
            RulesConfig::from_toml_str("board_size = \"forty\""),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            RulesConfig::from_toml_str("dice_sides = 1"),
            Err(ConfigError::Invalid(_))
        ));
    }
}
