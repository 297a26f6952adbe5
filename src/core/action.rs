//! Player actions and the structured log.
//!
//! Actions carry only the payload needed to validate and apply them; all
//! other parameters (prices, offers, tile effects) come from the state.
//! Every accepted action produces one [`LogEntry`] describing what happened,
//! which is enough to audit a match or verify a replay.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::board::Tile;
use super::market::MarketCard;
use super::money::Cash;
use super::player::PlayerId;
use super::rng::DiceRoll;
use super::state::StateHash;

/// A player action.
///
/// ```
/// use bubble_engine::core::{Action, ActionKind};
///
/// let accept = Action::AcceptFunding { stake: 20 };
/// assert_eq!(accept.kind(), ActionKind::AcceptFunding);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Roll the dice, move, and resolve the landed tile.
    RollAndMove,
    /// Sell `stake` points of equity into the open funding round.
    AcceptFunding {
        /// Equity points sold.
        stake: u8,
    },
    /// Walk away from the open funding round.
    DeclineFunding,
    /// Ship the product offered by the current opportunity tile.
    BuildProduct,
    /// Repay part of the outstanding debt.
    PayDebt {
        /// Amount repaid.
        amount: Cash,
    },
    /// Take the company public from an IPO gate.
    DeclareIpo,
    /// Finish the turn.
    EndTurn,
}

impl Action {
    /// Payload-free discriminant.
    #[must_use]
    pub fn kind(&self) -> ActionKind {
        match self {
            Action::RollAndMove => ActionKind::RollAndMove,
            Action::AcceptFunding { .. } => ActionKind::AcceptFunding,
            Action::DeclineFunding => ActionKind::DeclineFunding,
            Action::BuildProduct => ActionKind::BuildProduct,
            Action::PayDebt { .. } => ActionKind::PayDebt,
            Action::DeclareIpo => ActionKind::DeclareIpo,
            Action::EndTurn => ActionKind::EndTurn,
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::AcceptFunding { stake } => write!(f, "AcceptFunding({stake}%)"),
            Action::PayDebt { amount } => write!(f, "PayDebt({amount})"),
            other => write!(f, "{:?}", other.kind()),
        }
    }
}

/// Action variant without payload, used by the phase table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    /// See [`Action::RollAndMove`].
    RollAndMove,
    /// See [`Action::AcceptFunding`].
    AcceptFunding,
    /// See [`Action::DeclineFunding`].
    DeclineFunding,
    /// See [`Action::BuildProduct`].
    BuildProduct,
    /// See [`Action::PayDebt`].
    PayDebt,
    /// See [`Action::DeclareIpo`].
    DeclareIpo,
    /// See [`Action::EndTurn`].
    EndTurn,
}

/// Something that happened while applying an action.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    /// Dice were rolled.
    Rolled(DiceRoll),
    /// A player moved.
    Moved {
        /// Start position.
        from: u8,
        /// End position.
        to: u8,
        /// Times the Launchpad was passed or landed on.
        laps: u32,
    },
    /// A player landed on a tile.
    Landed {
        /// Board position.
        position: u8,
        /// The tile.
        tile: Tile,
    },
    /// A market card was drawn.
    CardDrawn(MarketCard),
    /// Market sentiment moved.
    SentimentChanged {
        /// Old sentiment.
        from: u16,
        /// New sentiment.
        to: u16,
    },
    /// A player received cash.
    Received {
        /// Recipient.
        player: PlayerId,
        /// Amount.
        amount: Cash,
    },
    /// A player paid cash.
    Paid {
        /// Payer.
        player: PlayerId,
        /// Amount taken from cash.
        amount: Cash,
    },
    /// A charge exceeded cash and the rest became debt.
    DebtIncurred {
        /// Debtor.
        player: PlayerId,
        /// New debt.
        amount: Cash,
    },
    /// Interest was added to debt.
    InterestAccrued {
        /// Debtor.
        player: PlayerId,
        /// Interest.
        amount: Cash,
    },
    /// Debt was repaid.
    DebtRepaid {
        /// Debtor.
        player: PlayerId,
        /// Amount repaid.
        amount: Cash,
    },
    /// A funding round was opened for the current player.
    FundingOffered {
        /// Most equity points on offer.
        max_stake: u8,
        /// Pricing terms.
        terms_pct: u16,
    },
    /// Equity was sold to investors.
    FundingAccepted {
        /// Equity points sold.
        stake: u8,
        /// Cash raised.
        raised: Cash,
    },
    /// The open funding round was declined.
    FundingDeclined,
    /// A product was shipped.
    ProductBuilt {
        /// Cash spent.
        cost: Cash,
        /// Value added.
        value: Cash,
    },
    /// A company went public.
    WentPublic {
        /// Equity floated.
        float: u8,
        /// Cash raised.
        raised: Cash,
    },
    /// A player went bankrupt and left the game.
    Bankrupt {
        /// Eliminated player.
        player: PlayerId,
    },
    /// The turn passed to another player.
    TurnPassed {
        /// New current player.
        to: PlayerId,
    },
    /// The game ended with a winner.
    GameWon {
        /// Winner.
        player: PlayerId,
    },
    /// The game ended with no winner.
    GameLost,
}

/// Structured record of one accepted action.
///
/// `resulting_state_hash` is the [`StateHash`] of the state produced by
/// this action, so a replay can be checked step by step.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Position in the match history (0-based).
    pub sequence: u32,
    /// Turn number when the action was taken.
    pub turn_number: u32,
    /// Acting player.
    pub player: PlayerId,
    /// The action.
    pub action: Action,
    /// What happened.
    pub events: SmallVec<[Event; 4]>,
    /// Hash of the resulting state.
    pub resulting_state_hash: StateHash,
}

impl LogEntry {
    /// Did this action end the game?
    #[must_use]
    pub fn ended_game(&self) -> bool {
        self.events
            .iter()
            .any(|e| matches!(e, Event::GameWon { .. } | Event::GameLost))
    }
}
