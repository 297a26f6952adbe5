//! Deterministic random number generation.
//!
//! ## Key Features
//!
//! - **Deterministic**: Same seed produces identical sequence
//! - **Snapshot-friendly**: the whole stream position fits in an
//!   [`RngCursor`], which lives inside every `GameState`
//! - **Portable**: ChaCha8 output does not depend on platform or pointer width
//!
//! The engine never keeps a live `GameRng` between transitions. Each
//! transition that needs randomness restores a generator from the state's
//! cursor, draws, and stores the advanced cursor in the next state.
//!
//! ```
//! use bubble_engine::core::GameRng;
//!
//! let mut rng = GameRng::new(42);
//! let cursor = rng.cursor();
//! let first = rng.roll(2, 6);
//!
//! let mut replayed = GameRng::from_cursor(&cursor);
//! assert_eq!(replayed.roll(2, 6), first);
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Deterministic RNG backed by ChaCha8.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl GameRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Roll `count` dice with `sides` faces each.
    pub fn roll(&mut self, count: u8, sides: u8) -> DiceRoll {
        let faces = (0..count)
            .map(|_| self.inner.gen_range(1..=sides.max(1)))
            .collect();
        DiceRoll { faces }
    }

    /// Shuffle a slice in place.
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        use rand::seq::SliceRandom;
        slice.shuffle(&mut self.inner);
    }

    /// Choose a random element from a slice.
    #[must_use]
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        use rand::seq::SliceRandom;
        slice.choose(&mut self.inner)
    }

    /// Capture the current stream position.
    #[must_use]
    pub fn cursor(&self) -> RngCursor {
        RngCursor {
            seed: self.seed,
            word_pos: self.inner.get_word_pos(),
        }
    }

    /// Restore from a saved cursor.
    #[must_use]
    pub fn from_cursor(cursor: &RngCursor) -> Self {
        let mut inner = ChaCha8Rng::seed_from_u64(cursor.seed);
        inner.set_word_pos(cursor.word_pos);
        Self {
            inner,
            seed: cursor.seed,
        }
    }
}

/// Serializable position in the random stream.
///
/// Uses the ChaCha8 word position for O(1) capture regardless of
/// how many random numbers have been generated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RngCursor {
    /// Original seed
    pub seed: u64,
    /// ChaCha8 word position (128-bit counter)
    pub word_pos: u128,
}

impl RngCursor {
    /// Cursor at the start of the stream for `seed`.
    #[must_use]
    pub fn start(seed: u64) -> Self {
        Self { seed, word_pos: 0 }
    }
}

/// The faces of one roll.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DiceRoll {
    /// Individual die faces, in roll order.
    pub faces: SmallVec<[u8; 2]>,
}

impl DiceRoll {
    /// Sum of all faces.
    #[must_use]
    pub fn total(&self) -> u32 {
        self.faces.iter().map(|&f| u32::from(f)).sum()
    }
}

impl std::fmt::Display for DiceRoll {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let faces: Vec<String> = self.faces.iter().map(u8::to_string).collect();
        write!(f, "{} (= {})", faces.join("+"), self.total())
    }
}
