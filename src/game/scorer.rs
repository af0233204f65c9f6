use serde::{Deserialize, Serialize};

use crate::{
    game::{Board, MoveDescriptor, WordRun},
    models::{Premium, WordScore},
    utils::letters::get_letter_value,
};

/// Result of scoring a move
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScoreResult {
    /// Total score for the move
    pub score: u32,
    /// Breakdown per word formed
    pub words: Vec<WordScore>,
}

pub struct Scorer;

impl Scorer {
    /// Score every word an accepted move formed.
    ///
    /// Scoring rules:
    /// - Each letter has its standard value
    /// - DL/TL multiply a letter only when that tile was placed this move
    /// - A word is doubled once if any new tile sits on DW and tripled once
    ///   if any sits on TW; both apply when both are present
    /// - The start square has no effect on score
    /// - Premium squares under tiles from earlier turns are spent
    pub fn score_move(board: &Board, descriptor: &MoveDescriptor) -> ScoreResult {
        let words: Vec<WordScore> = descriptor
            .words
            .iter()
            .map(|run| WordScore {
                word: run.spelling.clone(),
                score: Self::score_word(board, run, descriptor),
            })
            .collect();

        ScoreResult {
            score: words.iter().map(|w| w.score).sum(),
            words,
        }
    }

    fn score_word(board: &Board, run: &WordRun, descriptor: &MoveDescriptor) -> u32 {
        let mut letter_total = 0;
        let mut has_double_word = false;
        let mut has_triple_word = false;

        for (pos, letter) in run.positions.iter().zip(run.spelling.chars()) {
            let base_value = get_letter_value(letter);

            let premium = board
                .cell(*pos)
                .filter(|_| descriptor.is_new(*pos))
                .map(|cell| cell.premium);

            match premium {
                Some(premium) => {
                    letter_total += base_value * premium.letter_multiplier();
                    has_double_word |= premium == Premium::DoubleWord;
                    has_triple_word |= premium == Premium::TripleWord;
                }
                None => letter_total += base_value,
            }
        }

        let mut total = letter_total;
        if has_double_word {
            total *= Premium::DoubleWord.word_multiplier();
        }
        if has_triple_word {
            total *= Premium::TripleWord.word_multiplier();
        }
        total
    }
}
