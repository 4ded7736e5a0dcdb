//! Position sequence construction from move sources.
//!
//! The builder replays a move source against the rules engine and produces
//! an ordered sequence of [`PositionRecord`]s: the initial position first,
//! then one record per successfully applied ply.
//!
//! # Validation Policy
//!
//! The two input modes historically differ in how they treat bad moves,
//! and the difference is preserved as the default behavior of the two
//! entry points - but both are thin wrappers around a single
//! [`replay`](SequenceBuilder::replay) core taking an explicit
//! [`ValidationPolicy`], so callers wanting a uniform policy can have one:
//!
//! - [`from_game_record`](SequenceBuilder::from_game_record) (PGN blob) is
//!   fail-fast: any unparseable or unplayable move abandons the whole
//!   extraction and yields an empty sequence, never a partial one.
//! - [`from_moves`](SequenceBuilder::from_moves) (raw SAN list) is
//!   fail-soft: a bad entry is skipped with a diagnostic and replay
//!   continues from the last good position.
//!
//! Neither entry point returns an error; degradation plus a `tracing`
//! event is the whole failure story.

use std::sync::Arc;

use keypos_engine::{Board, PgnGame};
use tracing::{debug, warn};

use crate::{
    phase::classify_phase,
    record::{GameInfo, PositionRecord},
};

/// How the builder reacts to a move that fails to parse or apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationPolicy {
    /// Abandon the extraction and return an empty sequence.
    FailFast,
    /// Skip the offending entry and continue with the rest.
    SkipInvalid,
}

/// Builds annotated position sequences for one game.
#[derive(Debug, Clone)]
pub struct SequenceBuilder {
    game_index: u32,
    game_info: Arc<GameInfo>,
}

impl SequenceBuilder {
    #[must_use]
    pub fn new(game_index: u32, game_info: Arc<GameInfo>) -> Self {
        Self {
            game_index,
            game_info,
        }
    }

    /// Extracts the position sequence from a PGN game record (fail-fast).
    #[must_use]
    pub fn from_game_record(&self, record: &str) -> Vec<PositionRecord> {
        match PgnGame::parse(record) {
            Ok(game) => self.replay(
                game.moves.iter().map(String::as_str),
                ValidationPolicy::FailFast,
            ),
            Err(err) => {
                warn!(
                    game_index = self.game_index,
                    error = %err,
                    "failed to parse game record; returning empty sequence"
                );
                Vec::new()
            }
        }
    }

    /// Extracts the position sequence from a raw SAN move list (fail-soft).
    #[must_use]
    pub fn from_moves<'a, I>(&self, moves: I) -> Vec<PositionRecord>
    where
        I: IntoIterator<Item = &'a str>,
    {
        self.replay(moves, ValidationPolicy::SkipInvalid)
    }

    /// Replays a move list under an explicit validation policy.
    ///
    /// The returned sequence always starts with the initial position and
    /// has non-decreasing move numbers; the ply counter only advances on
    /// successfully applied moves.
    #[must_use]
    pub fn replay<'a, I>(&self, moves: I, policy: ValidationPolicy) -> Vec<PositionRecord>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut board = Board::initial();
        let mut records = vec![PositionRecord::initial(
            self.game_index,
            Arc::clone(&self.game_info),
        )];
        let mut ply: u32 = 0;

        for san in moves {
            match board.apply_san(san) {
                Ok((next, detail)) => {
                    let move_number = ply / 2 + 1;
                    let board_state = next.to_fen();
                    let preceding_move = records
                        .last()
                        .filter(|r| r.move_number > 0)
                        .map(|r| r.move_notation.clone());
                    records.push(PositionRecord {
                        move_number,
                        move_notation: san.to_string(),
                        phase: classify_phase(move_number, &board_state),
                        side_to_move: next.side_to_move(),
                        board_state,
                        game_index: self.game_index,
                        game_info: Arc::clone(&self.game_info),
                        preceding_move,
                        move_detail: Some(detail),
                        accuracy_score: None,
                    });
                    board = next;
                    ply += 1;
                }
                Err(err) => match policy {
                    ValidationPolicy::FailFast => {
                        warn!(
                            game_index = self.game_index,
                            notation = san,
                            error = %err,
                            "unplayable move; abandoning extraction"
                        );
                        return Vec::new();
                    }
                    ValidationPolicy::SkipInvalid => {
                        warn!(
                            game_index = self.game_index,
                            notation = san,
                            error = %err,
                            "skipping unplayable move"
                        );
                    }
                },
            }
        }

        debug!(
            game_index = self.game_index,
            positions = records.len(),
            "built position sequence"
        );
        records
    }
}

#[cfg(test)]
mod tests {
    use keypos_engine::{Color, PieceKind};

    use crate::record::{GamePhase, INITIAL_MOVE};

    use super::*;

    fn builder() -> SequenceBuilder {
        SequenceBuilder::new(0, Arc::new(GameInfo::default()))
    }

    #[test]
    fn test_empty_input_yields_initial_only() {
        let positions = builder().from_moves(std::iter::empty());
        assert_eq!(positions.len(), 1);
        assert_eq!(positions[0].move_number, 0);
        assert_eq!(positions[0].phase, GamePhase::Opening);
    }

    #[test]
    fn test_move_numbering_and_sides() {
        let positions = builder().from_moves("e4 e5 Nf3 Nc6".split_whitespace());
        assert_eq!(positions.len(), 5);
        let move_numbers: Vec<u32> = positions.iter().map(|r| r.move_number).collect();
        assert_eq!(move_numbers, vec![0, 1, 1, 2, 2]);
        let sides: Vec<Color> = positions.iter().map(|r| r.side_to_move).collect();
        assert_eq!(
            sides,
            vec![
                Color::White,
                Color::Black,
                Color::White,
                Color::Black,
                Color::White
            ]
        );
        // Non-decreasing move numbers.
        assert!(move_numbers.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_preceding_move_and_detail() {
        let positions = builder().from_moves("e4 d5 exd5".split_whitespace());
        assert!(positions[1].preceding_move.is_none());
        assert_eq!(positions[2].preceding_move.as_deref(), Some("e4"));
        assert_eq!(positions[3].preceding_move.as_deref(), Some("d5"));
        let detail = positions[3].move_detail.as_ref().unwrap();
        assert_eq!(detail.captured, Some(PieceKind::Pawn));
        assert!(positions.iter().all(|r| r.accuracy_score.is_none()));
    }

    #[test]
    fn test_skip_invalid_continues() {
        let positions = builder().from_moves("e4 Qxf7 e5 Nf3".split_whitespace());
        // The impossible queen move is dropped; replay resumes at e5.
        let notations: Vec<&str> = positions.iter().map(|r| r.move_notation.as_str()).collect();
        assert_eq!(notations, vec![INITIAL_MOVE, "e4", "e5", "Nf3"]);
        assert_eq!(positions[3].move_number, 2);
    }

    #[test]
    fn test_game_record_fail_fast() {
        // A structurally fine PGN whose third move is unplayable.
        let positions = builder().from_game_record("1. e4 e5 2. Ke3 Nc6");
        assert!(positions.is_empty());
        // Unparseable movetext also fails the whole extraction.
        let positions = builder().from_game_record("1. e4 ?? e5");
        assert!(positions.is_empty());
    }

    #[test]
    fn test_game_record_success() {
        let pgn = "[Event \"Test\"]\n\n1. e4 e5 2. Nf3 Nc6 3. Bb5 a6 1/2-1/2";
        let positions = builder().from_game_record(pgn);
        assert_eq!(positions.len(), 7);
        assert_eq!(positions[6].move_notation, "a6");
        assert_eq!(positions[6].move_number, 3);
    }

    #[test]
    fn test_replay_policy_override() {
        let moves: Vec<&str> = "e4 zz e5".split_whitespace().collect();
        let fail_fast = builder().replay(moves.iter().copied(), ValidationPolicy::FailFast);
        assert!(fail_fast.is_empty());
        let fail_soft = builder().replay(moves.iter().copied(), ValidationPolicy::SkipInvalid);
        assert_eq!(fail_soft.len(), 3);
    }
}
