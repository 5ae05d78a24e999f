use std::fmt::{Debug, Formatter};

use bit_set::BitSet;
use log::debug;

use crate::crossword::Crossword;
use crate::{VariableId, WordId};

/// A word removed from a variable's domain, kept so that the removal can be undone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Removal {
    variable_id: VariableId,
    word_id: WordId,
}

/// Position in the undo trail, as returned by `Domains::checkpoint`.
pub type Checkpoint = usize;

/// The set of words still considered legal for each variable, stored as a bitset over the
/// crossword's `WordId`s.
///
/// Every removal is also pushed onto an undo trail. The initial filtering passes call
/// `commit` to make their removals permanent; search uses `checkpoint` and `rollback` to undo
/// the removals it makes while exploring a branch.
#[derive(Clone)]
pub struct Domains {
    sets: Vec<BitSet>,
    trail: Vec<Removal>,
}

impl Debug for Domains {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Domains")
            .field("sizes", &self.sets.iter().map(|set| set.len()).collect::<Vec<_>>())
            .field("trail_len", &self.trail.len())
            .finish()
    }
}

impl Domains {
    /// Seed every variable with the full dictionary.
    pub fn new(crossword: &Crossword) -> Domains {
        let word_count = crossword.words().len();
        let mut full = BitSet::with_capacity(word_count);
        for word_id in 0..word_count {
            full.insert(word_id);
        }

        Domains {
            sets: crossword.variable_ids().map(|_| full.clone()).collect(),
            trail: vec![],
        }
    }

    /// Remove every word whose length doesn't match its variable's length. This is the only unary
    /// constraint in the puzzle, so after this call every domain satisfies it for good. Returns
    /// the number of words removed across all variables.
    pub fn enforce_node_consistency(&mut self, crossword: &Crossword) -> usize {
        let mut removed = 0;

        for variable_id in crossword.variable_ids() {
            let length = crossword.variable(variable_id).length;
            let mismatched: Vec<WordId> = self.sets[variable_id]
                .iter()
                .filter(|&word_id| crossword.word(word_id).len() != length)
                .collect();

            for word_id in mismatched {
                self.remove(variable_id, word_id);
                removed += 1;
            }
        }
        self.commit();

        debug!(
            target: "solver",
            "Node consistency removed {} words; domain sizes {:?}",
            removed,
            self.sets.iter().map(|set| set.len()).collect::<Vec<_>>()
        );

        removed
    }

    pub fn variable_count(&self) -> usize {
        self.sets.len()
    }

    /// Number of candidate words left for the variable.
    pub fn size(&self, variable_id: VariableId) -> usize {
        self.sets[variable_id].len()
    }

    pub fn is_empty(&self, variable_id: VariableId) -> bool {
        self.sets[variable_id].is_empty()
    }

    pub fn contains(&self, variable_id: VariableId, word_id: WordId) -> bool {
        self.sets[variable_id].contains(word_id)
    }

    /// Candidate word ids for the variable, in ascending (dictionary) order.
    pub fn word_ids(&self, variable_id: VariableId) -> impl Iterator<Item = WordId> + '_ {
        self.sets[variable_id].iter()
    }

    /// Candidate words for the variable, in dictionary order.
    pub fn words<'a>(
        &'a self,
        crossword: &'a Crossword,
        variable_id: VariableId,
    ) -> impl Iterator<Item = &'a str> + 'a {
        self.word_ids(variable_id).map(move |word_id| crossword.word(word_id).string.as_str())
    }

    /// The first variable whose domain has been wiped out, if any.
    pub fn first_empty(&self) -> Option<VariableId> {
        self.sets.iter().position(|set| set.is_empty())
    }

    /// Remove a word from a variable's domain, recording it on the trail. Returns whether the
    /// word was present.
    pub fn remove(&mut self, variable_id: VariableId, word_id: WordId) -> bool {
        let removed = self.sets[variable_id].remove(word_id);
        if removed {
            self.trail.push(Removal { variable_id, word_id });
        }
        removed
    }

    /// Shrink a variable's domain down to a single word. Returns the number of words removed.
    pub fn restrict_to(&mut self, variable_id: VariableId, word_id: WordId) -> usize {
        let others: Vec<WordId> =
            self.sets[variable_id].iter().filter(|&other| other != word_id).collect();
        for &other in &others {
            self.remove(variable_id, other);
        }
        others.len()
    }

    pub fn checkpoint(&self) -> Checkpoint {
        self.trail.len()
    }

    /// Reinsert everything removed since the checkpoint, most recent first.
    pub fn rollback(&mut self, checkpoint: Checkpoint) {
        while self.trail.len() > checkpoint {
            if let Some(Removal { variable_id, word_id }) = self.trail.pop() {
                self.sets[variable_id].insert(word_id);
            }
        }
    }

    /// Forget the trail, making every removal so far permanent.
    pub fn commit(&mut self) {
        self.trail.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crossword::{Overlap, Variable};
    use crate::Direction::{Across, Down};

    fn crossword() -> Crossword {
        Crossword::new(
            vec![Variable::new(0, 0, Across, 3), Variable::new(0, 0, Down, 4)],
            [(0, 1, Overlap::new(0, 0))],
            ["cat", "care", "dog", "door", "a"],
        )
        .unwrap()
    }

    #[test]
    fn test_new_domains_hold_full_dictionary() {
        let crossword = crossword();
        let domains = Domains::new(&crossword);

        assert_eq!(domains.variable_count(), 2);
        assert_eq!(domains.size(0), 5);
        assert_eq!(domains.size(1), 5);
    }

    #[test]
    fn test_node_consistency_filters_by_length() {
        let crossword = crossword();
        let mut domains = Domains::new(&crossword);

        let removed = domains.enforce_node_consistency(&crossword);

        assert_eq!(removed, 6);
        assert_eq!(domains.words(&crossword, 0).collect::<Vec<_>>(), vec!["cat", "dog"]);
        assert_eq!(domains.words(&crossword, 1).collect::<Vec<_>>(), vec!["care", "door"]);
        assert_eq!(domains.first_empty(), None);
    }

    #[test]
    fn test_node_consistency_can_empty_a_domain() {
        let crossword =
            Crossword::new(vec![Variable::new(0, 0, Across, 7)], [], ["cat", "dog"]).unwrap();
        let mut domains = Domains::new(&crossword);

        domains.enforce_node_consistency(&crossword);

        assert!(domains.is_empty(0));
        assert_eq!(domains.first_empty(), Some(0));
    }

    #[test]
    fn test_rollback_restores_removed_words() {
        let crossword = crossword();
        let mut domains = Domains::new(&crossword);
        domains.enforce_node_consistency(&crossword);

        let checkpoint = domains.checkpoint();
        let cat = crossword.word_id("cat").unwrap();
        assert_eq!(domains.restrict_to(0, cat), 1);
        assert!(!domains.remove(0, crossword.word_id("dog").unwrap()));
        assert_eq!(domains.words(&crossword, 0).collect::<Vec<_>>(), vec!["cat"]);

        domains.rollback(checkpoint);

        assert_eq!(domains.words(&crossword, 0).collect::<Vec<_>>(), vec!["cat", "dog"]);
        assert_eq!(domains.checkpoint(), checkpoint);
    }
}
