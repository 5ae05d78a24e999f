use crate::assignment::Assignment;
use crate::crossword::Crossword;
use crate::structure::Structure;

/// Character used for blocked cells.
pub const BLOCK: char = '█';

/// Place each assigned word into a height x width grid of letters. Cells no assigned word covers
/// are `None`.
pub fn letter_grid(
    structure: &Structure,
    crossword: &Crossword,
    assignment: &Assignment,
) -> Vec<Vec<Option<char>>> {
    let mut letters = vec![vec![None; structure.width]; structure.height];

    for (variable_id, word_id) in assignment.iter() {
        let variable = crossword.variable(variable_id);
        let word = crossword.word(word_id);

        for ((row, col), &letter) in variable.cells().zip(word.chars.iter()) {
            if let Some(cell) = letters.get_mut(row).and_then(|cells| cells.get_mut(col)) {
                *cell = Some(letter);
            }
        }
    }

    letters
}

/// Turn the given structure and assignment into a rendered string, one line per row. Blocks are
/// drawn as `BLOCK` and open cells without a letter as spaces.
pub fn render_grid(structure: &Structure, crossword: &Crossword, assignment: &Assignment) -> String {
    let letters = letter_grid(structure, crossword, assignment);

    (0..structure.height)
        .map(|row| {
            (0..structure.width)
                .map(|col| {
                    if structure.is_open(row, col) {
                        letters[row][col].unwrap_or(' ')
                    } else {
                        BLOCK
                    }
                })
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}
