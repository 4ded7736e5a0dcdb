//! Key position selection for played chess games
//!
//! This crate turns a long ordered sequence of board states from one game
//! into a small, ranked subset of "key positions" for a downstream report
//! renderer. The hard part lives here: candidate generation,
//! deduplication, and prioritization.
//!
//! # Pipeline
//!
//! Data flows strictly forward; no stage mutates another's output:
//!
//! 1. **Build** ([`builder::SequenceBuilder`]): replay a PGN game record or
//!    a raw SAN move list into an ordered [`record::PositionRecord`]
//!    sequence, one record per ply plus the initial position.
//! 2. **Classify** ([`phase::classify_phase`]): every record carries a
//!    coarse game phase derived from move count and remaining material.
//! 3. **Generate** (four independent, side-effect-free heuristics):
//!    - [`transition::detect_phase_transitions`]: phase boundaries
//!    - [`mistake::match_critical_moves`]: externally annotated blunders
//!      and inaccuracies
//!    - [`evaluation::detect_evaluation_shifts`]: material-swing placeholder
//!    - [`strategic::select_strategic_checkpoints`]: fixed fallback
//!      checkpoints
//! 4. **Rank** ([`selector::select_key_positions`]): merge, deduplicate by
//!    board state, order by priority, truncate to the caller's budget.
//!
//! # Error Policy
//!
//! Selection never fails: malformed game records, unplayable moves, and
//! structurally invalid board states degrade the output (possibly to an
//! empty list) and emit `tracing` diagnostics, so a report pipeline can
//! always proceed with partial analysis. Install whatever subscriber fits
//! the host application; this crate only emits events.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use keypos_analysis::{
//!     builder::SequenceBuilder,
//!     record::GameInfo,
//!     selector::{self, SelectionConfig},
//! };
//!
//! let builder = SequenceBuilder::new(0, Arc::new(GameInfo::default()));
//! let positions = builder.from_moves("e4 e5 Nf3 Nc6 Bb5".split_whitespace());
//! assert_eq!(positions.len(), 6); // initial position + five plies
//!
//! let selected = selector::select_key_positions(&positions, None, &SelectionConfig::default());
//! assert!(selected.len() <= SelectionConfig::default().max_positions);
//! ```

pub mod builder;
pub mod candidate;
pub mod evaluation;
pub mod mistake;
pub mod phase;
pub mod record;
pub mod selector;
pub mod strategic;
pub mod transition;
