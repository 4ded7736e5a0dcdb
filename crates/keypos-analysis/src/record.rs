//! Position records and their supporting data types.
//!
//! A [`PositionRecord`] is the immutable unit flowing through the whole
//! pipeline: one snapshot of the game after a ply (or the initial
//! position), identified by its canonical board-state string. Records are
//! created once by the sequence builder and never mutated; generators copy
//! them into candidates.

use std::{collections::BTreeMap, sync::Arc};

use chrono::NaiveDate;
use keypos_engine::{Board, Color, MoveDetail};
use serde::{Deserialize, Serialize};

/// Coarse game stage derived from move count and remaining material.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum GamePhase {
    #[display("opening")]
    Opening,
    #[display("middlegame")]
    Middlegame,
    #[display("endgame")]
    Endgame,
}

/// Caller-supplied game metadata, passed through unchanged into every
/// position record.
///
/// Modeled as a PGN-style tag map so game records can populate it
/// directly; the pipeline itself never interprets the contents beyond the
/// typed accessors offered here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameInfo {
    pub tags: BTreeMap<String, String>,
}

impl GameInfo {
    #[must_use]
    pub fn from_tags(tags: BTreeMap<String, String>) -> Self {
        Self { tags }
    }

    #[must_use]
    pub fn tag(&self, name: &str) -> Option<&str> {
        self.tags.get(name).map(String::as_str)
    }

    #[must_use]
    pub fn event(&self) -> Option<&str> {
        self.tag("Event")
    }

    #[must_use]
    pub fn white(&self) -> Option<&str> {
        self.tag("White")
    }

    #[must_use]
    pub fn black(&self) -> Option<&str> {
        self.tag("Black")
    }

    /// The game date, when the `Date` tag is present and fully specified.
    #[must_use]
    pub fn date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.tag("Date")?, "%Y.%m.%d").ok()
    }
}

/// Sentinel notation carried by the synthetic initial record.
pub const INITIAL_MOVE: &str = "start";

/// One annotated board state in a game's position sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionRecord {
    /// Move-pair number; 0 denotes the initial position.
    pub move_number: u32,
    /// SAN of the move that produced this position, or [`INITIAL_MOVE`].
    pub move_notation: String,
    /// Canonical FEN string; the identity key for deduplication.
    pub board_state: String,
    /// Which game of a batch this position belongs to.
    pub game_index: u32,
    /// Opaque caller-supplied metadata, shared across the sequence.
    pub game_info: Arc<GameInfo>,
    pub phase: GamePhase,
    /// The side to move in this position.
    pub side_to_move: Color,
    /// SAN of the immediately preceding ply, if any.
    pub preceding_move: Option<String>,
    /// Structured move detail, when the engine could fully resolve it.
    pub move_detail: Option<MoveDetail>,
    /// Quality score filled in by a later enrichment step; never set here.
    pub accuracy_score: Option<f64>,
}

impl PositionRecord {
    /// The synthetic record for the standard starting position.
    #[must_use]
    pub fn initial(game_index: u32, game_info: Arc<GameInfo>) -> Self {
        Self {
            move_number: 0,
            move_notation: INITIAL_MOVE.to_string(),
            board_state: Board::START_FEN.to_string(),
            game_index,
            game_info,
            phase: GamePhase::Opening,
            side_to_move: Color::White,
            preceding_move: None,
            move_detail: None,
            accuracy_score: None,
        }
    }
}

/// External move-quality label attached per ply by an outside evaluator.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::FromStr,
)]
#[serde(rename_all = "lowercase")]
pub enum MoveJudgment {
    #[display("brilliant")]
    Brilliant,
    #[display("great")]
    Great,
    #[display("best")]
    Best,
    #[display("good")]
    Good,
    #[display("book")]
    Book,
    #[display("inaccuracy")]
    Inaccuracy,
    #[display("mistake")]
    Mistake,
    #[display("blunder")]
    Blunder,
}

impl MoveJudgment {
    /// Whether this judgment marks a move worth flagging as critical.
    #[must_use]
    pub fn is_critical(self) -> bool {
        matches!(self, Self::Blunder | Self::Inaccuracy)
    }
}

/// One entry of the optional per-ply accuracy annotation set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MoveAnnotation {
    pub judgment: Option<MoveJudgment>,
    pub evaluation: Option<f64>,
}
