//! Chess rules support for the keypos workspace.
//!
//! This crate provides the board and move machinery that the analysis
//! pipeline consumes: a mailbox board with FEN encoding, legal move
//! application from short algebraic notation (SAN), and a PGN game-record
//! parser. Analysis code treats the engine as a producer of
//! (position, move) pairs - a FEN string per position and a [`MoveDetail`]
//! per applied ply - and never inspects board internals directly.
//!
//! # Example
//!
//! ```
//! use keypos_engine::Board;
//!
//! let board = Board::initial();
//! let (after, detail) = board.apply_san("e4").unwrap();
//! assert_eq!(detail.to.to_string(), "e4");
//! assert!(after.to_fen().starts_with("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b"));
//! ```

pub use self::{core::*, rules::*};

pub mod core;
pub mod rules;
