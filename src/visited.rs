//! Memoization of canonical state signatures across a whole search.

use rustc_hash::FxHashSet;

/// Signatures of every state reached during one solve, across all branches.
///
/// Only grows; a fresh set is used for each solve.
#[derive(Debug, Default)]
pub struct VisitedSet {
    signatures: FxHashSet<Box<str>>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a signature. Returns `false` if it was already present.
    pub fn insert(&mut self, signature: &str) -> bool {
        if self.signatures.contains(signature) {
            return false;
        }
        self.signatures.insert(signature.into())
    }

    pub fn contains(&self, signature: &str) -> bool {
        self.signatures.contains(signature)
    }

    pub fn len(&self) -> usize {
        self.signatures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signatures.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_then_contains() {
        let mut visited = VisitedSet::new();
        assert!(visited.is_empty());
        assert!(visited.insert("|a|ab|b"));
        assert!(visited.contains("|a|ab|b"));
        assert!(!visited.contains("|a|ab"));
    }

    #[test]
    fn test_membership_survives_other_inserts() {
        let mut visited = VisitedSet::new();
        visited.insert("aa|bb||");
        for other in ["ab|ab||", "|a|ab|b", "|||"] {
            visited.insert(other);
            assert!(visited.contains("aa|bb||"), "Lost entry after inserting {other}");
        }
        assert_eq!(visited.len(), 4);
    }

    #[test]
    fn test_insert_is_idempotent() {
        let mut visited = VisitedSet::new();
        assert!(visited.insert("ab|ab||"));
        assert!(!visited.insert("ab|ab||"), "Second insert reported as new");
        assert_eq!(visited.len(), 1);
    }
}
