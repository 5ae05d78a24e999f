use std::collections::{BTreeSet, HashMap};
use std::fmt::{self, Debug, Display, Formatter};
use std::ops::Range;

use smallvec::SmallVec;
use thiserror::Error;

use crate::{Direction, VariableId, WordId, MAX_SLOT_LENGTH};

/// A single slot in the grid. Rows grow downward and columns grow rightward, both zero-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Variable {
    pub row: usize,
    pub col: usize,
    pub direction: Direction,
    pub length: usize,
}

impl Variable {
    pub fn new(row: usize, col: usize, direction: Direction, length: usize) -> Variable {
        Variable { row, col, direction, length }
    }

    /// Generate the (row, col) coords for each cell of this slot.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.length).map(move |cell_idx| match self.direction {
            Direction::Across => (self.row, self.col + cell_idx),
            Direction::Down => (self.row + cell_idx, self.col),
        })
    }
}

impl Display for Variable {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}) {} : {}", self.row, self.col, self.direction, self.length)
    }
}

/// Where two slots meet: `first` is the cell index in the first slot of the pair and `second` the
/// cell index in the second one. The letters at those positions must match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Overlap {
    pub first: usize,
    pub second: usize,
}

impl Overlap {
    pub fn new(first: usize, second: usize) -> Overlap {
        Overlap { first, second }
    }

    /// The same overlap seen from the other slot.
    pub fn reversed(self) -> Overlap {
        Overlap { first: self.second, second: self.first }
    }
}

/// A crossing between one slot and another, referencing the other slot's id, the cell of this
/// slot where they meet, and the location of the intersection within the other slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Crossing {
    pub other_variable_id: VariableId,
    pub cell: usize,
    pub other_cell: usize,
}

/// A dictionary entry. Characters are stored separately so that positional lookups don't have to
/// rescan UTF-8.
#[derive(Clone, PartialEq, Eq)]
pub struct Word {
    pub string: String,
    pub chars: SmallVec<[char; MAX_SLOT_LENGTH]>,
}

impl Word {
    fn new(string: String) -> Word {
        let chars = string.chars().collect();
        Word { string, chars }
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// The letter at `idx`, or `None` if the word is too short to reach it.
    pub fn char_at(&self, idx: usize) -> Option<char> {
        self.chars.get(idx).copied()
    }
}

impl Debug for Word {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Debug::fmt(&self.string, f)
    }
}

/// Problems with a puzzle definition that make it impossible to solve meaningfully. These are
/// caught when the `Crossword` is built, before any domain exists.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DefinitionError {
    #[error("variable {variable} has length zero")]
    ZeroLengthVariable { variable: VariableId },

    #[error("overlap references unknown variable {variable} ({count} variables defined)")]
    UnknownVariable { variable: VariableId, count: usize },

    #[error("variable {variable} cannot overlap itself")]
    SelfOverlap { variable: VariableId },

    #[error("overlap index {index} is out of range for variable {variable} of length {length}")]
    OverlapOutOfRange {
        variable: VariableId,
        index: usize,
        length: usize,
    },

    #[error("variables {first} and {second} were given conflicting overlaps")]
    ConflictingOverlap { first: VariableId, second: VariableId },
}

/// The static definition of a puzzle: its slots, the crossings between them, and the dictionary.
/// Nothing in here changes while solving.
#[derive(Clone)]
pub struct Crossword {
    variables: Vec<Variable>,

    /// Indexed by variable id, sorted by the other variable's id.
    crossings: Vec<SmallVec<[Crossing; MAX_SLOT_LENGTH]>>,

    /// Deduplicated and sorted, so that `WordId`s are stable for a given word list.
    words: Vec<Word>,
    word_ids: HashMap<String, WordId>,
}

impl Debug for Crossword {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Crossword")
            .field("variables", &self.variables)
            .field("crossings", &self.crossings)
            .field("words", &format_args!("({} entries)", self.words.len()))
            .finish()
    }
}

impl Crossword {
    /// Build a puzzle definition from its slots, a list of `(x, y, overlap)` entries, and a word
    /// list. Each overlap only needs to be given once; supplying both directions is fine as long as
    /// they agree.
    pub fn new<O, W, S>(
        variables: Vec<Variable>,
        overlaps: O,
        words: W,
    ) -> Result<Crossword, DefinitionError>
    where
        O: IntoIterator<Item = (VariableId, VariableId, Overlap)>,
        W: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if let Some(variable) = variables.iter().position(|v| v.length == 0) {
            return Err(DefinitionError::ZeroLengthVariable { variable });
        }

        let count = variables.len();
        let mut overlap_by_pair: HashMap<(VariableId, VariableId), Overlap> = HashMap::new();

        for (x, y, overlap) in overlaps {
            for variable in [x, y] {
                if variable >= count {
                    return Err(DefinitionError::UnknownVariable { variable, count });
                }
            }
            if x == y {
                return Err(DefinitionError::SelfOverlap { variable: x });
            }
            for (variable, index) in [(x, overlap.first), (y, overlap.second)] {
                let length = variables[variable].length;
                if index >= length {
                    return Err(DefinitionError::OverlapOutOfRange { variable, index, length });
                }
            }

            for (key, value) in [((x, y), overlap), ((y, x), overlap.reversed())] {
                match overlap_by_pair.get(&key) {
                    Some(&existing) if existing != value => {
                        return Err(DefinitionError::ConflictingOverlap { first: x, second: y });
                    }
                    _ => {
                        overlap_by_pair.insert(key, value);
                    }
                }
            }
        }

        let mut crossings: Vec<SmallVec<[Crossing; MAX_SLOT_LENGTH]>> =
            (0..count).map(|_| SmallVec::new()).collect();
        for (&(x, y), overlap) in &overlap_by_pair {
            crossings[x].push(Crossing {
                other_variable_id: y,
                cell: overlap.first,
                other_cell: overlap.second,
            });
        }
        for variable_crossings in &mut crossings {
            variable_crossings.sort_by_key(|crossing| crossing.other_variable_id);
        }

        let words: Vec<Word> = words
            .into_iter()
            .map(Into::into)
            .collect::<BTreeSet<String>>()
            .into_iter()
            .map(Word::new)
            .collect();
        let word_ids = words
            .iter()
            .enumerate()
            .map(|(id, word)| (word.string.clone(), id))
            .collect();

        Ok(Crossword { variables, crossings, words, word_ids })
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn variable(&self, variable_id: VariableId) -> &Variable {
        &self.variables[variable_id]
    }

    pub fn variable_ids(&self) -> Range<VariableId> {
        0..self.variables.len()
    }

    pub fn variable_count(&self) -> usize {
        self.variables.len()
    }

    /// Where `x` and `y` cross, expressed as (cell in `x`, cell in `y`), or `None` if they don't.
    pub fn overlap(&self, x: VariableId, y: VariableId) -> Option<Overlap> {
        self.crossings[x]
            .iter()
            .find(|crossing| crossing.other_variable_id == y)
            .map(|crossing| Overlap::new(crossing.cell, crossing.other_cell))
    }

    pub fn crossings(&self, variable_id: VariableId) -> &[Crossing] {
        &self.crossings[variable_id]
    }

    /// All variables crossing `variable_id`, in ascending id order.
    pub fn neighbors(&self, variable_id: VariableId) -> impl Iterator<Item = VariableId> + '_ {
        self.crossings[variable_id].iter().map(|crossing| crossing.other_variable_id)
    }

    pub fn degree(&self, variable_id: VariableId) -> usize {
        self.crossings[variable_id].len()
    }

    pub fn words(&self) -> &[Word] {
        &self.words
    }

    pub fn word(&self, word_id: WordId) -> &Word {
        &self.words[word_id]
    }

    pub fn word_id(&self, word: &str) -> Option<WordId> {
        self.word_ids.get(word).copied()
    }

    pub fn contains_word(&self, word: &str) -> bool {
        self.word_ids.contains_key(word)
    }
}
