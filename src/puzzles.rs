//! Catalogue of named starting configurations.
//!
//! Each pile is written bottom first, one character per item. The last two
//! piles of every puzzle start empty.

use crate::error::PuzzleError;
use crate::state::PuzzleState;

/// A starting configuration with a name the driver can select.
pub struct NamedPuzzle {
    pub name: &'static str,
    pub pile_capacity: usize,
    pub piles: &'static [&'static str],
}

impl NamedPuzzle {
    /// Creates a puzzle definition with compile-time pile size checks.
    pub const fn new(
        name: &'static str,
        pile_capacity: usize,
        piles: &'static [&'static str],
    ) -> Self {
        assert!(pile_capacity > 0, "pile_capacity must be at least 1");
        assert!(piles.len() >= 2, "a puzzle needs at least two piles");
        let mut i = 0;
        while i < piles.len() {
            assert!(piles[i].len() <= pile_capacity, "pile exceeds capacity");
            i += 1;
        }
        Self {
            name,
            pile_capacity,
            piles,
        }
    }

    /// Builds the initial state for this puzzle.
    pub fn state(&self) -> Result<PuzzleState, PuzzleError> {
        PuzzleState::new(
            self.pile_capacity,
            self.piles.iter().map(|pile| pile.chars().collect()).collect(),
        )
    }
}

/// Two labels, two piles, two free piles.
pub const TINY: NamedPuzzle = NamedPuzzle::new("tiny", 2, &["ab", "ab", "", ""]);

/// Four identical rainbow piles.
pub const FOUR: NamedPuzzle =
    NamedPuzzle::new("four", 4, &["abcd", "abcd", "abcd", "abcd", "", ""]);

/// Nine labels in piles of four.
pub const ELEVEN: NamedPuzzle = NamedPuzzle::new(
    "eleven",
    4,
    &[
        "mcsc", "pbpm", "vblv", "cvos", "obvk", "klkp", "omlc", "sblk", "pmso", "", "",
    ],
);

/// Twelve labels in piles of five.
pub const CLASSIC: NamedPuzzle = NamedPuzzle::new(
    "classic",
    5,
    &[
        "vobcc", "avrsp", "amblo", "oorkd", "aslkm", "dpkbv", "rkrac", "bpaks", "slldd", "pbrmv",
        "clmom", "pdcvs", "", "",
    ],
);

/// Every catalogued puzzle, smallest first.
pub const ALL: &[NamedPuzzle] = &[TINY, FOUR, ELEVEN, CLASSIC];

/// Looks up a catalogued puzzle by name.
pub fn find(name: &str) -> Option<&'static NamedPuzzle> {
    ALL.iter().find(|puzzle| puzzle.name == name)
}
