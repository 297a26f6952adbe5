//! Market conditions: sentiment and the market-event deck.

use im::Vector;
use serde::{Deserialize, Serialize};

use super::money::Cash;
use super::rng::GameRng;

/// A market-event card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarketCard {
    /// Sentiment rises by `points`.
    Boom {
        /// Sentiment points gained.
        points: u16,
    },
    /// Sentiment falls by `points`.
    Correction {
        /// Sentiment points lost.
        points: u16,
    },
    /// The drawing player receives `amount`.
    Windfall {
        /// Cash received.
        amount: Cash,
    },
    /// The drawing player is charged `amount`.
    Lawsuit {
        /// Cash charged.
        amount: Cash,
    },
    /// The drawing player pays `per_product` for each shipped product.
    TalentWar {
        /// Cost per product.
        per_product: Cash,
    },
}

impl std::fmt::Display for MarketCard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MarketCard::Boom { points } => write!(f, "Boom (+{points})"),
            MarketCard::Correction { points } => write!(f, "Correction (-{points})"),
            MarketCard::Windfall { amount } => write!(f, "Windfall ({amount})"),
            MarketCard::Lawsuit { amount } => write!(f, "Lawsuit ({amount})"),
            MarketCard::TalentWar { per_product } => {
                write!(f, "Talent War ({per_product} per product)")
            }
        }
    }
}

/// Market-wide state.
///
/// `next_card` indexes into `deck`; once it reaches the end the deck is
/// reshuffled from the game's random stream.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Market {
    /// Valuation multiplier in percent.
    pub sentiment_pct: u16,
    /// Card order.
    pub deck: Vector<MarketCard>,
    /// Index of the next card to draw.
    pub next_card: usize,
    /// Number of reshuffles so far.
    pub reshuffles: u32,
}

impl Market {
    /// Create a market with a freshly shuffled standard deck.
    pub fn new(sentiment_pct: u16, rng: &mut GameRng) -> Self {
        let mut cards = standard_deck();
        rng.shuffle(&mut cards);
        Self {
            sentiment_pct,
            deck: cards.into_iter().collect(),
            next_card: 0,
            reshuffles: 0,
        }
    }

    /// Draw the next card, reshuffling first if the deck is exhausted.
    ///
    /// Returns `None` only for an empty deck.
    pub fn draw(&mut self, rng: &mut GameRng) -> Option<MarketCard> {
        if self.deck.is_empty() {
            return None;
        }
        if self.next_card >= self.deck.len() {
            let mut cards: Vec<MarketCard> = self.deck.iter().copied().collect();
            rng.shuffle(&mut cards);
            self.deck = cards.into_iter().collect();
            self.next_card = 0;
            self.reshuffles += 1;
        }
        let card = self.deck.get(self.next_card).copied();
        self.next_card += 1;
        card
    }

    /// Shift sentiment by `delta`, clamped to `[floor, ceiling]`.
    pub fn shift_sentiment(&mut self, delta: i32, floor: u16, ceiling: u16) {
        let shifted = (i32::from(self.sentiment_pct) + delta)
            .clamp(i32::from(floor), i32::from(ceiling));
        self.sentiment_pct = shifted as u16;
    }
}

/// The sixteen-card standard market deck, unshuffled.
#[must_use]
pub fn standard_deck() -> Vec<MarketCard> {
    let mut deck = Vec::with_capacity(16);
    deck.extend([MarketCard::Boom { points: 20 }; 3]);
    deck.extend([MarketCard::Boom { points: 10 }; 2]);
    deck.extend([MarketCard::Correction { points: 15 }; 3]);
    deck.push(MarketCard::Correction { points: 30 });
    deck.extend([MarketCard::Windfall { amount: Cash::new(150_000) }; 2]);
    deck.push(MarketCard::Windfall { amount: Cash::new(300_000) });
    deck.extend([MarketCard::Lawsuit { amount: Cash::new(250_000) }; 2]);
    deck.extend([MarketCard::TalentWar { per_product: Cash::new(50_000) }; 2]);
    deck
}
