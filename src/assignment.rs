use std::collections::HashMap;
use std::fmt::{Debug, Formatter};

use bit_set::BitSet;
use thiserror::Error;

use crate::crossword::Crossword;
use crate::{VariableId, WordId};

/// A mapping from variables to chosen words, built up and torn down by search. Alongside it we
/// keep the set of words in use, since no word may fill two slots.
#[derive(Clone, PartialEq, Eq)]
pub struct Assignment {
    words: Vec<Option<WordId>>,
    used: BitSet,
    assigned_count: usize,
}

impl Debug for Assignment {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl Assignment {
    /// An empty assignment for the given puzzle.
    pub fn new(crossword: &Crossword) -> Assignment {
        Assignment {
            words: crossword.variable_ids().map(|_| None).collect(),
            used: BitSet::with_capacity(crossword.words().len()),
            assigned_count: 0,
        }
    }

    pub fn get(&self, variable_id: VariableId) -> Option<WordId> {
        self.words[variable_id]
    }

    /// The word assigned to the variable, as a string.
    pub fn word<'a>(&self, crossword: &'a Crossword, variable_id: VariableId) -> Option<&'a str> {
        self.words[variable_id].map(|word_id| crossword.word(word_id).string.as_str())
    }

    pub fn is_assigned(&self, variable_id: VariableId) -> bool {
        self.words[variable_id].is_some()
    }

    /// Number of variables that have a word.
    pub fn len(&self) -> usize {
        self.assigned_count
    }

    pub fn is_empty(&self) -> bool {
        self.assigned_count == 0
    }

    /// Whether some variable already holds this word.
    pub fn is_used(&self, word_id: WordId) -> bool {
        self.used.contains(word_id)
    }

    /// Bind a variable, replacing whatever it held before.
    pub fn assign(&mut self, variable_id: VariableId, word_id: WordId) {
        self.unassign(variable_id);
        self.words[variable_id] = Some(word_id);
        self.used.insert(word_id);
        self.assigned_count += 1;
    }

    /// Unbind a variable, returning the word it held.
    pub fn unassign(&mut self, variable_id: VariableId) -> Option<WordId> {
        let previous = self.words[variable_id].take()?;
        self.assigned_count -= 1;
        if !self.words.contains(&Some(previous)) {
            self.used.remove(previous);
        }
        Some(previous)
    }

    /// Assigned (variable, word) pairs in variable order.
    pub fn iter(&self) -> impl Iterator<Item = (VariableId, WordId)> + '_ {
        self.words
            .iter()
            .enumerate()
            .filter_map(|(variable_id, word_id)| word_id.map(|word_id| (variable_id, word_id)))
    }

    /// The assignment as strings, indexed by variable id.
    pub fn to_words<'a>(&self, crossword: &'a Crossword) -> Vec<Option<&'a str>> {
        crossword.variable_ids().map(|variable_id| self.word(crossword, variable_id)).collect()
    }

    /// Would binding `variable_id` to `word_id` keep an otherwise consistent assignment
    /// consistent? Only the new binding is checked: its length, its crossings with assigned
    /// neighbors, and whether the word is already in use elsewhere.
    pub fn is_consistent_with(
        &self,
        crossword: &Crossword,
        variable_id: VariableId,
        word_id: WordId,
    ) -> bool {
        let word = crossword.word(word_id);
        if word.len() != crossword.variable(variable_id).length {
            return false;
        }

        if self.is_used(word_id) && self.words[variable_id] != Some(word_id) {
            return false;
        }

        crossword.crossings(variable_id).iter().all(|crossing| {
            match self.words[crossing.other_variable_id] {
                Some(other_word_id) => {
                    let other_glyph = crossword.word(other_word_id).char_at(crossing.other_cell);
                    matches!(word.char_at(crossing.cell), Some(glyph) if Some(glyph) == other_glyph)
                }
                None => true,
            }
        })
    }

    /// Full consistency check of a (possibly partial) assignment: lengths, crossings between
    /// assigned neighbors, and distinctness of every assigned word.
    pub fn is_consistent(&self, crossword: &Crossword) -> bool {
        check_consistency(crossword, &self.to_words(crossword)).is_ok()
    }

    /// Every variable has a word, and every word comes from the dictionary.
    pub fn is_complete(&self, crossword: &Crossword) -> bool {
        self.words.len() == crossword.variable_count()
            && self.words.iter().all(|word_id| {
                word_id.map(|word_id| word_id < crossword.words().len()).unwrap_or(false)
            })
    }
}

/// Reasons a fill can be rejected by `validate`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Violation {
    #[error("expected words for {expected} variables, got {actual}")]
    WrongVariableCount { expected: usize, actual: usize },

    #[error("variable {variable} has no word")]
    Missing { variable: VariableId },

    #[error("word {word:?} for variable {variable} is not in the dictionary")]
    NotInDictionary { variable: VariableId, word: String },

    #[error("word {word:?} does not fit variable {variable} of length {length}")]
    LengthMismatch {
        variable: VariableId,
        word: String,
        length: usize,
    },

    #[error("variables {first} and {second} disagree where they cross")]
    CrossingMismatch { first: VariableId, second: VariableId },

    #[error("word {word:?} is used by both variable {first} and variable {second}")]
    Reused {
        word: String,
        first: VariableId,
        second: VariableId,
    },
}

/// Check the assigned entries of a partial fill (indexed by variable id): every word has the
/// right length, crossing letters agree, and no word appears twice.
fn check_consistency<S: AsRef<str>>(
    crossword: &Crossword,
    words: &[Option<S>],
) -> Result<(), Violation> {
    if words.len() != crossword.variable_count() {
        return Err(Violation::WrongVariableCount {
            expected: crossword.variable_count(),
            actual: words.len(),
        });
    }

    let chars: Vec<Option<Vec<char>>> =
        words.iter().map(|word| word.as_ref().map(|w| w.as_ref().chars().collect())).collect();

    let assigned: Vec<(VariableId, &str, &Vec<char>)> = words
        .iter()
        .zip(&chars)
        .enumerate()
        .filter_map(|(variable, pair)| match pair {
            (Some(word), Some(word_chars)) => Some((variable, word.as_ref(), word_chars)),
            _ => None,
        })
        .collect();

    for &(variable, word, word_chars) in &assigned {
        let length = crossword.variable(variable).length;
        if word_chars.len() != length {
            return Err(Violation::LengthMismatch { variable, word: word.to_string(), length });
        }
    }

    let mut first_use: HashMap<&str, VariableId> = HashMap::new();
    for &(variable, word, _) in &assigned {
        if let Some(&first) = first_use.get(word) {
            return Err(Violation::Reused { word: word.to_string(), first, second: variable });
        }
        first_use.insert(word, variable);
    }

    for &(variable, _, word_chars) in &assigned {
        for crossing in crossword.crossings(variable) {
            if let Some(other_chars) = &chars[crossing.other_variable_id] {
                let agrees = other_chars
                    .get(crossing.other_cell)
                    .map(|&c| c == word_chars[crossing.cell])
                    .unwrap_or(false);
                if !agrees {
                    return Err(Violation::CrossingMismatch {
                        first: variable,
                        second: crossing.other_variable_id,
                    });
                }
            }
        }
    }

    Ok(())
}

/// Validate a finished fill given as one word per variable: it must be complete, use only
/// dictionary words, and satisfy every length, crossing, and distinctness constraint.
pub fn validate<S: AsRef<str>>(crossword: &Crossword, words: &[Option<S>]) -> Result<(), Violation> {
    if words.len() != crossword.variable_count() {
        return Err(Violation::WrongVariableCount {
            expected: crossword.variable_count(),
            actual: words.len(),
        });
    }

    for (variable, word) in words.iter().enumerate() {
        match word {
            None => return Err(Violation::Missing { variable }),
            Some(word) if !crossword.contains_word(word.as_ref()) => {
                return Err(Violation::NotInDictionary {
                    variable,
                    word: word.as_ref().to_string(),
                });
            }
            Some(_) => {}
        }
    }

    check_consistency(crossword, words)
}
