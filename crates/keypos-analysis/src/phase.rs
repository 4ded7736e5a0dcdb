//! Game phase classification.

use crate::record::GamePhase;

/// Move numbers up to and including this are always the opening.
pub const OPENING_MOVE_LIMIT: u32 = 15;

/// At or below this many pieces (kings included) the game is an endgame.
pub const ENDGAME_PIECE_LIMIT: usize = 12;

/// Classifies the phase of a position from its move number and board state.
///
/// Pure function: move number 15 or lower is the opening regardless of
/// material; beyond that, the piece letters in the FEN placement field
/// decide between endgame and middlegame.
#[must_use]
pub fn classify_phase(move_number: u32, board_state: &str) -> GamePhase {
    if move_number <= OPENING_MOVE_LIMIT {
        return GamePhase::Opening;
    }
    let placement = board_state.split_whitespace().next().unwrap_or("");
    let piece_count = placement.chars().filter(char::is_ascii_alphabetic).count();
    if piece_count <= ENDGAME_PIECE_LIMIT {
        GamePhase::Endgame
    } else {
        GamePhase::Middlegame
    }
}

#[cfg(test)]
mod tests {
    use keypos_engine::Board;

    use super::*;

    #[test]
    fn test_opening_regardless_of_material() {
        // Even a bare-kings board is "opening" inside the move limit.
        assert_eq!(
            classify_phase(15, "4k3/8/8/8/8/8/8/4K3 w - - 0 15"),
            GamePhase::Opening
        );
        assert_eq!(classify_phase(0, Board::START_FEN), GamePhase::Opening);
    }

    #[test]
    fn test_middlegame_with_full_material() {
        assert_eq!(classify_phase(16, Board::START_FEN), GamePhase::Middlegame);
        assert_eq!(classify_phase(40, Board::START_FEN), GamePhase::Middlegame);
    }

    #[test]
    fn test_endgame_at_piece_limit() {
        // Twelve pieces exactly, kings included.
        let fen = "r3k3/pppp4/8/8/8/8/PPPP4/R3K3 w - - 0 30";
        assert_eq!(classify_phase(30, fen), GamePhase::Endgame);
        // Thirteen pieces is still a middlegame.
        let fen = "r3k3/ppppp3/8/8/8/8/PPPP4/R3K3 w - - 0 30";
        assert_eq!(classify_phase(30, fen), GamePhase::Middlegame);
    }
}
