use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use thiserror::Error;

use crate::crossword::{Crossword, DefinitionError, Overlap, Variable};
use crate::{Direction, VariableId};

/// Problems turning structure and word files into a puzzle definition.
#[derive(Debug, Error)]
pub enum StructureError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("structure has no rows")]
    Empty,

    #[error(transparent)]
    Definition(#[from] DefinitionError),
}

/// The shape of a grid: which cells are open for letters. Rows shorter than the widest one are
/// padded with blocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Structure {
    pub width: usize,
    pub height: usize,
    open: Vec<Vec<bool>>,
}

impl Structure {
    /// Parse a structure where `_` marks an open cell and any other character a block.
    pub fn parse(text: &str) -> Result<Structure, StructureError> {
        let rows: Vec<&str> = text.lines().collect();
        if rows.is_empty() {
            return Err(StructureError::Empty);
        }

        let width = rows.iter().map(|row| row.chars().count()).max().unwrap_or(0);
        let open = rows
            .iter()
            .map(|row| {
                let mut cells: Vec<bool> = row.chars().map(|c| c == '_').collect();
                cells.resize(width, false);
                cells
            })
            .collect();

        Ok(Structure { width, height: rows.len(), open })
    }

    pub fn is_open(&self, row: usize, col: usize) -> bool {
        row < self.height && col < self.width && self.open[row][col]
    }

    /// Length of the run of open cells starting at (row, col) in the given direction.
    fn run_length(&self, row: usize, col: usize, direction: Direction) -> usize {
        (0..)
            .take_while(|&k| match direction {
                Direction::Across => self.is_open(row, col + k),
                Direction::Down => self.is_open(row + k, col),
            })
            .count()
    }

    /// Every slot in the grid: a maximal run of two or more open cells, scanning rows top to
    /// bottom and columns left to right, down before across at the same cell.
    pub fn variables(&self) -> Vec<Variable> {
        let mut variables = vec![];

        for row in 0..self.height {
            for col in 0..self.width {
                if !self.is_open(row, col) {
                    continue;
                }

                if row == 0 || !self.is_open(row - 1, col) {
                    let length = self.run_length(row, col, Direction::Down);
                    if length > 1 {
                        variables.push(Variable::new(row, col, Direction::Down, length));
                    }
                }

                if col == 0 || !self.is_open(row, col - 1) {
                    let length = self.run_length(row, col, Direction::Across);
                    if length > 1 {
                        variables.push(Variable::new(row, col, Direction::Across, length));
                    }
                }
            }
        }

        variables
    }

    /// Build a puzzle definition for this grid, deriving overlaps from shared cells.
    pub fn to_crossword<W, S>(&self, words: W) -> Result<Crossword, DefinitionError>
    where
        W: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let variables = self.variables();
        let overlaps = overlaps(&variables);
        Crossword::new(variables, overlaps, words)
    }
}

/// Overlaps between every pair of slots that share a cell.
pub fn overlaps(variables: &[Variable]) -> Vec<(VariableId, VariableId, Overlap)> {
    let cells: Vec<Vec<(usize, usize)>> =
        variables.iter().map(|variable| variable.cells().collect()).collect();

    let mut result = vec![];
    for x in 0..variables.len() {
        for y in x + 1..variables.len() {
            let shared = cells[x].iter().enumerate().find_map(|(first, cell)| {
                cells[y].iter().position(|other| other == cell).map(|second| (first, second))
            });
            if let Some((first, second)) = shared {
                result.push((x, y, Overlap::new(first, second)));
            }
        }
    }
    result
}

/// One word per line, upper-cased; surrounding whitespace and blank lines are ignored.
pub fn parse_words(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_uppercase)
        .collect()
}

fn read(path: &Path) -> Result<String, StructureError> {
    fs::read_to_string(path)
        .map_err(|source| StructureError::Io { path: path.to_path_buf(), source })
}

/// Read a structure file and a word-list file into a grid shape and its puzzle definition.
pub fn load(
    structure_path: &Path,
    words_path: &Path,
) -> Result<(Structure, Crossword), StructureError> {
    let structure = Structure::parse(&read(structure_path)?)?;
    let words = parse_words(&read(words_path)?);
    let crossword = structure.to_crossword(words)?;

    debug!(
        target: "structure",
        "Loaded {}x{} grid with {} variables and {} distinct words",
        structure.width,
        structure.height,
        crossword.variable_count(),
        crossword.words().len()
    );

    Ok((structure, crossword))
}
