//! Board tiles and layout.
//!
//! The board is a fixed ring of tiles. Positions wrap modulo the board
//! length; passing tile 0 (the Launchpad) completes a lap.

use im::Vector;
use serde::{Deserialize, Serialize};

use super::money::Cash;

/// A board tile and its effect parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tile {
    /// Starting tile.
    Launchpad,
    /// Chance to ship a product.
    Opportunity {
        /// Cash needed to build.
        build_cost: Cash,
        /// Value the product adds to the company.
        product_value: Cash,
    },
    /// Investors offer to buy up to `max_stake` points of equity.
    FundingRound {
        /// Most equity points the round will take.
        max_stake: u8,
        /// Price relative to the current valuation, in percent.
        terms_pct: u16,
    },
    /// Draw a market card.
    MarketEvent,
    /// Cash bonus.
    DemoDay,
    /// Going public is possible here.
    IpoGate,
    /// Unavoidable expense.
    Burn {
        /// Amount charged.
        amount: Cash,
    },
}

impl Tile {
    /// Short label for logs and UIs.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Tile::Launchpad => "Launchpad",
            Tile::Opportunity { .. } => "Startup Opportunity",
            Tile::FundingRound { .. } => "Funding Round",
            Tile::MarketEvent => "Market Event",
            Tile::DemoDay => "Demo Day",
            Tile::IpoGate => "IPO Gate",
            Tile::Burn { .. } => "Burn",
        }
    }

    /// True if the tile's parameters can be played.
    ///
    /// Funding rounds must offer between 1 and 100 points; costs, values
    /// and burns are never negative.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        match *self {
            Tile::Opportunity { build_cost, product_value } => {
                !build_cost.is_negative() && !product_value.is_negative()
            }
            Tile::FundingRound { max_stake, .. } => (1..=100).contains(&max_stake),
            Tile::Burn { amount } => !amount.is_negative(),
            Tile::Launchpad | Tile::MarketEvent | Tile::DemoDay | Tile::IpoGate => true,
        }
    }
}

impl std::fmt::Display for Tile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Tile::Opportunity { build_cost, product_value } => {
                write!(f, "{} (cost {build_cost}, value {product_value})", self.label())
            }
            Tile::FundingRound { max_stake, terms_pct } => {
                write!(f, "{} (up to {max_stake}% at {terms_pct}%)", self.label())
            }
            Tile::Burn { amount } => write!(f, "{} ({amount})", self.label()),
            _ => f.write_str(self.label()),
        }
    }
}

/// The ring of tiles.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Board {
    tiles: Vector<Tile>,
}

impl Board {
    /// Build a board from an explicit tile list.
    #[must_use]
    pub fn from_tiles(tiles: impl IntoIterator<Item = Tile>) -> Self {
        Self {
            tiles: tiles.into_iter().collect(),
        }
    }

    /// The standard 40-tile Bubble board.
    #[must_use]
    pub fn standard() -> Self {
        Self::from_tiles(STANDARD_LAYOUT.iter().copied())
    }

    /// Number of tiles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// True if the board has no tiles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Tile at a position, if in range.
    #[must_use]
    pub fn get(&self, position: u8) -> Option<&Tile> {
        self.tiles.get(usize::from(position))
    }

    /// Iterate over `(position, tile)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (u8, &Tile)> {
        self.tiles.iter().enumerate().map(|(i, t)| (i as u8, t))
    }

    /// Tiles whose parameters are out of range, with their positions.
    pub fn malformed_tiles(&self) -> impl Iterator<Item = (u8, &Tile)> {
        self.iter().filter(|(_, tile)| !tile.is_well_formed())
    }

    /// Position reached moving `steps` from `from`, and how many times tile 0
    /// was passed or landed on along the way.
    ///
    /// A long roll on a small board can wrap more than once.
    #[must_use]
    pub fn advance(&self, from: u8, steps: u32) -> (u8, u32) {
        let len = self.tiles.len().max(1) as u32;
        let raw = u32::from(from) + steps;
        ((raw % len) as u8, raw / len)
    }
}

const fn opportunity(cost: i64, value: i64) -> Tile {
    Tile::Opportunity {
        build_cost: Cash::new(cost),
        product_value: Cash::new(value),
    }
}

const fn funding(max_stake: u8, terms_pct: u16) -> Tile {
    Tile::FundingRound {
        max_stake,
        terms_pct,
    }
}

const fn burn(amount: i64) -> Tile {
    Tile::Burn {
        amount: Cash::new(amount),
    }
}

const STANDARD_LAYOUT: [Tile; 40] = [
    Tile::Launchpad,
    opportunity(100_000, 8_000_000),
    Tile::MarketEvent,
    opportunity(120_000, 10_000_000),
    burn(150_000),
    funding(10, 100),
    opportunity(150_000, 14_000_000),
    Tile::MarketEvent,
    opportunity(160_000, 15_000_000),
    opportunity(180_000, 18_000_000),
    Tile::DemoDay,
    opportunity(200_000, 22_000_000),
    burn(200_000),
    opportunity(220_000, 25_000_000),
    opportunity(240_000, 28_000_000),
    funding(15, 110),
    opportunity(260_000, 32_000_000),
    Tile::MarketEvent,
    opportunity(280_000, 36_000_000),
    opportunity(300_000, 40_000_000),
    Tile::IpoGate,
    opportunity(320_000, 45_000_000),
    Tile::MarketEvent,
    opportunity(340_000, 50_000_000),
    opportunity(360_000, 55_000_000),
    funding(20, 120),
    opportunity(380_000, 60_000_000),
    opportunity(400_000, 65_000_000),
    burn(300_000),
    opportunity(420_000, 70_000_000),
    Tile::DemoDay,
    opportunity(450_000, 80_000_000),
    opportunity(480_000, 90_000_000),
    Tile::MarketEvent,
    opportunity(500_000, 100_000_000),
    funding(25, 130),
    Tile::IpoGate,
    opportunity(550_000, 120_000_000),
    burn(400_000),
    opportunity(600_000, 150_000_000),
];
