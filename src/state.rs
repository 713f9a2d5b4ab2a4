//! Puzzle state representation and move rules.
//!
//! A state is an immutable snapshot of every pile. Each pile lists its items
//! bottom first, so the top of a pile is the last element. Successor states
//! are built by [`PuzzleState::apply_move`]; nothing mutates a state in place.

use std::collections::BTreeMap;
use std::fmt;

use crate::error::PuzzleError;

/// A single item on a pile, e.g. one fruit or ball colour.
pub type Label = char;

/// One pile's contents, bottom first.
pub type Pile = Vec<Label>;

/// Joins sorted piles inside a canonical signature.
pub const SIGNATURE_SEPARATOR: char = '|';

/// Separates piles in the textual puzzle format accepted by [`PuzzleState::parse`].
pub const PILE_SEPARATOR: char = ',';

/// Relocation of the top item of `source` onto `target`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Move {
    pub source: usize,
    pub target: usize,
    /// Label of the moved item, kept for reporting.
    pub label: Label,
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} -> {}", self.label, self.source, self.target)
    }
}

/// Snapshot of all piles in a puzzle.
///
/// The canonical signature is derived once at construction, so two states
/// whose piles are permutations of each other compare equal by signature
/// even though their pile indices differ.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PuzzleState {
    pile_capacity: usize,
    piles: Vec<Pile>,
    signature: String,
}

impl PuzzleState {
    /// Builds a state, checking the per-pile capacity and reserved labels.
    ///
    /// This does not check that the puzzle is solvable or well formed; see
    /// [`PuzzleState::validate`] for that.
    pub fn new(pile_capacity: usize, piles: Vec<Pile>) -> Result<Self, PuzzleError> {
        if pile_capacity == 0 {
            return Err(PuzzleError::ZeroCapacity);
        }
        for (index, pile) in piles.iter().enumerate() {
            if pile.len() > pile_capacity {
                return Err(PuzzleError::PileOverflow {
                    pile: index,
                    len: pile.len(),
                    capacity: pile_capacity,
                });
            }
            if let Some(&label) = pile
                .iter()
                .find(|&&label| label == SIGNATURE_SEPARATOR || label == PILE_SEPARATOR)
            {
                return Err(PuzzleError::ReservedLabel(label));
            }
        }
        Ok(Self::from_piles_unchecked(pile_capacity, piles))
    }

    /// Parses piles separated by `,`, e.g. `"ab,ab,,"` for two full piles and
    /// two empty ones.
    pub fn parse(pile_capacity: usize, text: &str) -> Result<Self, PuzzleError> {
        let piles = text
            .split(PILE_SEPARATOR)
            .map(|pile| pile.trim().chars().collect())
            .collect();
        Self::new(pile_capacity, piles)
    }

    fn from_piles_unchecked(pile_capacity: usize, piles: Vec<Pile>) -> Self {
        let signature = canonical_signature(&piles);
        Self {
            pile_capacity,
            piles,
            signature,
        }
    }

    pub fn pile_capacity(&self) -> usize {
        self.pile_capacity
    }

    pub fn piles(&self) -> &[Pile] {
        &self.piles
    }

    /// Order-independent key used to detect revisited states.
    pub fn signature(&self) -> &str {
        &self.signature
    }

    fn can_receive(&self, pile: &[Label], label: Label) -> bool {
        pile.len() < self.pile_capacity && pile.last().map_or(true, |&top| top == label)
    }

    /// Lists every legal move, by source pile then target pile ascending.
    pub fn legal_moves(&self) -> Vec<Move> {
        let mut moves = Vec::new();
        for (source, pile) in self.piles.iter().enumerate() {
            let Some(&label) = pile.last() else {
                continue;
            };
            for (target, target_pile) in self.piles.iter().enumerate() {
                if target != source && self.can_receive(target_pile, label) {
                    moves.push(Move {
                        source,
                        target,
                        label,
                    });
                }
            }
        }
        moves
    }

    /// Returns the state after moving the top item of `source` onto `target`.
    ///
    /// Fails with [`PuzzleError::EmptySource`] or [`PuzzleError::IllegalMove`]
    /// instead of producing a corrupt state.
    pub fn apply_move(&self, source: usize, target: usize) -> Result<Self, PuzzleError> {
        let illegal = PuzzleError::IllegalMove {
            from: source,
            to: target,
        };
        if source == target || target >= self.piles.len() {
            return Err(illegal);
        }
        let Some(source_pile) = self.piles.get(source) else {
            return Err(illegal);
        };
        let Some(&label) = source_pile.last() else {
            return Err(PuzzleError::EmptySource(source));
        };
        if !self.can_receive(&self.piles[target], label) {
            return Err(illegal);
        }
        Ok(self.moved(source, target))
    }

    /// Applies a move taken from [`PuzzleState::legal_moves`] of this state.
    pub(crate) fn moved(&self, source: usize, target: usize) -> Self {
        let mut piles = self.piles.clone();
        if let Some(label) = piles[source].pop() {
            piles[target].push(label);
        }
        Self::from_piles_unchecked(self.pile_capacity, piles)
    }

    fn is_pile_sorted(&self, pile: &[Label]) -> bool {
        match pile.first() {
            None => true,
            Some(&bottom) => {
                pile.len() == self.pile_capacity && pile.iter().all(|&label| label == bottom)
            }
        }
    }

    /// True when every pile is empty or full of a single label.
    pub fn is_goal(&self) -> bool {
        self.piles.iter().all(|pile| self.is_pile_sorted(pile))
    }

    /// Sum over piles of the number of distinct labels in each pile.
    ///
    /// Empty piles contribute 0. Lower is tidier; a goal state scores the
    /// number of distinct labels in the puzzle.
    pub fn heterogeneity(&self) -> usize {
        self.piles.iter().map(|pile| distinct_count(pile)).sum()
    }

    /// Number of distinct labels across all piles.
    pub fn distinct_labels(&self) -> usize {
        self.label_counts().len()
    }

    fn label_counts(&self) -> BTreeMap<Label, usize> {
        let mut counts = BTreeMap::new();
        for &label in self.piles.iter().flatten() {
            *counts.entry(label).or_insert(0) += 1;
        }
        counts
    }

    /// Checks the puzzle shape once before searching.
    ///
    /// Two piles are reserved as free space, so the item count must be
    /// `capacity * (piles - 2)` and every label must fill exactly one pile.
    pub fn validate(&self) -> Result<(), PuzzleError> {
        if self.piles.len() < 2 {
            return Err(PuzzleError::TooFewPiles(self.piles.len()));
        }
        let actual: usize = self.piles.iter().map(Vec::len).sum();
        let expected = self.pile_capacity * (self.piles.len() - 2);
        if actual != expected {
            return Err(PuzzleError::WrongItemCount { actual, expected });
        }
        match self
            .label_counts()
            .into_iter()
            .find(|&(_, count)| count != self.pile_capacity)
        {
            Some((label, count)) => Err(PuzzleError::WrongLabelCount {
                label,
                count,
                capacity: self.pile_capacity,
            }),
            None => Ok(()),
        }
    }

    pub fn is_well_formed(&self) -> bool {
        self.validate().is_ok()
    }
}

fn distinct_count(pile: &[Label]) -> usize {
    let mut seen: Vec<Label> = Vec::with_capacity(pile.len());
    for &label in pile {
        if !seen.contains(&label) {
            seen.push(label);
        }
    }
    seen.len()
}

/// Sorts pile contents and joins them, so pile order does not matter.
fn canonical_signature(piles: &[Pile]) -> String {
    let mut sorted: Vec<&Pile> = piles.iter().collect();
    sorted.sort();

    let mut signature = String::with_capacity(piles.iter().map(|pile| pile.len() + 1).sum());
    for (index, pile) in sorted.into_iter().enumerate() {
        if index > 0 {
            signature.push(SIGNATURE_SEPARATOR);
        }
        signature.extend(pile.iter());
    }
    signature
}
