//! Legal move application from short algebraic notation.
//!
//! [`Board::apply_san`] resolves a SAN token against a position: it finds
//! the unique legal origin square (honoring disambiguation hints), verifies
//! full legality including pins, castling through check, and en passant,
//! and returns the successor board together with a [`MoveDetail`] describing
//! what happened. The board itself is never mutated.

use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

use crate::core::{Board, CastlingRights, Color, Piece, PieceKind, Square};

/// Which side of the board a castling move goes to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum CastleSide {
    #[display("O-O")]
    Kingside,
    #[display("O-O-O")]
    Queenside,
}

/// Structured description of one applied ply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveDetail {
    pub from: Square,
    pub to: Square,
    pub color: Color,
    pub piece: PieceKind,
    pub captured: Option<PieceKind>,
    pub promotion: Option<PieceKind>,
    pub castle: Option<CastleSide>,
    pub en_passant: bool,
    pub double_push: bool,
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum SanError {
    #[display("cannot parse move '{san}'")]
    Malformed { san: String },
    #[display("move '{san}' is not legal in this position")]
    Illegal { san: String },
    #[display("move '{san}' is ambiguous in this position")]
    Ambiguous { san: String },
}

#[derive(Debug, Clone, Copy)]
struct ParsedSan {
    piece: PieceKind,
    from_file: Option<u8>,
    from_rank: Option<u8>,
    to: Square,
    promotion: Option<PieceKind>,
}

impl Board {
    /// Applies one SAN move, returning the successor position and move detail.
    ///
    /// Check/mate suffixes (`+`, `#`) and annotation glyphs (`!`, `?`) are
    /// ignored. Capture markers are not required to match the position; the
    /// board decides whether a capture actually happens.
    pub fn apply_san(&self, san: &str) -> Result<(Self, MoveDetail), SanError> {
        let body = san.trim().trim_end_matches(['+', '#', '!', '?']);
        if body.is_empty() {
            return Err(SanError::Malformed {
                san: san.to_string(),
            });
        }
        if matches!(body, "O-O" | "0-0") {
            return self.apply_castle(CastleSide::Kingside, san);
        }
        if matches!(body, "O-O-O" | "0-0-0") {
            return self.apply_castle(CastleSide::Queenside, san);
        }

        let parsed = parse_san_body(body).ok_or_else(|| SanError::Malformed {
            san: san.to_string(),
        })?;

        let last_rank = if self.side_to_move.is_white() { 7 } else { 0 };
        let needs_promotion = parsed.piece == PieceKind::Pawn && parsed.to.rank() == last_rank;
        if needs_promotion != parsed.promotion.is_some() {
            return Err(SanError::Malformed {
                san: san.to_string(),
            });
        }

        let us = self.side_to_move;
        let mut origins: ArrayVec<Square, 16> = ArrayVec::new();
        for index in 0..64 {
            let Some(square) = Square::from_index(index) else {
                continue;
            };
            if self.piece_at(square) != Some(Piece::new(us, parsed.piece)) {
                continue;
            }
            if parsed.from_file.is_some_and(|file| file != square.file()) {
                continue;
            }
            if parsed.from_rank.is_some_and(|rank| rank != square.rank()) {
                continue;
            }
            if !self.can_reach(us, parsed.piece, square, parsed.to) {
                continue;
            }
            // A move leaving the mover's own king attacked is not a candidate.
            let (next, _) = self.make_plain_move(
                Piece::new(us, parsed.piece),
                square,
                parsed.to,
                parsed.promotion,
            );
            if next.in_check(us) {
                continue;
            }
            origins.push(square);
        }

        match origins.as_slice() {
            [] => Err(SanError::Illegal {
                san: san.to_string(),
            }),
            [from] => Ok(self.make_plain_move(
                Piece::new(us, parsed.piece),
                *from,
                parsed.to,
                parsed.promotion,
            )),
            _ => Err(SanError::Ambiguous {
                san: san.to_string(),
            }),
        }
    }

    /// Whether a piece of `kind` and `color` on `from` can move to `to`,
    /// ignoring king safety.
    fn can_reach(&self, color: Color, kind: PieceKind, from: Square, to: Square) -> bool {
        if from == to {
            return false;
        }
        if self.piece_at(to).is_some_and(|dest| dest.color == color) {
            return false;
        }
        let df = i8::try_from(to.file()).unwrap_or(0) - i8::try_from(from.file()).unwrap_or(0);
        let dr = i8::try_from(to.rank()).unwrap_or(0) - i8::try_from(from.rank()).unwrap_or(0);
        match kind {
            PieceKind::Knight => matches!((df.abs(), dr.abs()), (1, 2) | (2, 1)),
            PieceKind::King => df.abs() <= 1 && dr.abs() <= 1,
            PieceKind::Rook => (df == 0 || dr == 0) && self.path_clear(from, to),
            PieceKind::Bishop => df.abs() == dr.abs() && self.path_clear(from, to),
            PieceKind::Queen => {
                (df == 0 || dr == 0 || df.abs() == dr.abs()) && self.path_clear(from, to)
            }
            PieceKind::Pawn => {
                let forward: i8 = if color.is_white() { 1 } else { -1 };
                let start_rank: u8 = if color.is_white() { 1 } else { 6 };
                if df == 0 {
                    if self.piece_at(to).is_some() {
                        return false;
                    }
                    if dr == forward {
                        return true;
                    }
                    dr == 2 * forward
                        && from.rank() == start_rank
                        && from
                            .offset(0, forward)
                            .is_some_and(|mid| self.piece_at(mid).is_none())
                } else {
                    df.abs() == 1
                        && dr == forward
                        && (self.piece_at(to).is_some() || self.en_passant == Some(to))
                }
            }
        }
    }

    /// Executes a resolved non-castling move. Callers must have validated
    /// reachability; this handles captures, en passant, promotion, and all
    /// clock/right bookkeeping.
    fn make_plain_move(
        &self,
        piece: Piece,
        from: Square,
        to: Square,
        promotion: Option<PieceKind>,
    ) -> (Self, MoveDetail) {
        let mut next = self.clone();
        let mut captured = self.piece_at(to).map(|p| p.kind);
        let mut en_passant_capture = false;

        if piece.kind == PieceKind::Pawn
            && captured.is_none()
            && self.en_passant == Some(to)
            && from.file() != to.file()
        {
            if let Some(captured_square) = Square::from_coords(to.file(), from.rank()) {
                next.squares[captured_square.index()] = None;
                captured = Some(PieceKind::Pawn);
                en_passant_capture = true;
            }
        }

        next.squares[from.index()] = None;
        let placed = promotion.map_or(piece, |kind| Piece::new(piece.color, kind));
        next.squares[to.index()] = Some(placed);

        let double_push = piece.kind == PieceKind::Pawn && from.rank().abs_diff(to.rank()) == 2;
        next.en_passant = if double_push {
            Square::from_coords(from.file(), (from.rank() + to.rank()) / 2)
        } else {
            None
        };

        next.update_castling_rights(piece, from, to);
        next.halfmove_clock = if piece.kind == PieceKind::Pawn || captured.is_some() {
            0
        } else {
            self.halfmove_clock + 1
        };
        if piece.color == Color::Black {
            next.fullmove_number += 1;
        }
        next.side_to_move = piece.color.opponent();

        let detail = MoveDetail {
            from,
            to,
            color: piece.color,
            piece: piece.kind,
            captured,
            promotion,
            castle: None,
            en_passant: en_passant_capture,
            double_push,
        };
        (next, detail)
    }

    fn update_castling_rights(&mut self, piece: Piece, from: Square, to: Square) {
        if piece.kind == PieceKind::King {
            match piece.color {
                Color::White => {
                    self.castling.white_kingside = false;
                    self.castling.white_queenside = false;
                }
                Color::Black => {
                    self.castling.black_kingside = false;
                    self.castling.black_queenside = false;
                }
            }
        }
        // A rook leaving its corner or anything landing on it kills the right.
        for square in [from, to] {
            match square {
                Square::A1 => self.castling.white_queenside = false,
                Square::H1 => self.castling.white_kingside = false,
                Square::A8 => self.castling.black_queenside = false,
                Square::H8 => self.castling.black_kingside = false,
                _ => {}
            }
        }
    }

    fn apply_castle(&self, side: CastleSide, san: &str) -> Result<(Self, MoveDetail), SanError> {
        let us = self.side_to_move;
        let illegal = || SanError::Illegal {
            san: san.to_string(),
        };

        let (king_from, king_to, rook_from, rook_to, allowed) = match (us, side) {
            (Color::White, CastleSide::Kingside) => (
                Square::E1,
                Square::G1,
                Square::H1,
                Square::F1,
                self.castling.white_kingside,
            ),
            (Color::White, CastleSide::Queenside) => (
                Square::E1,
                Square::C1,
                Square::A1,
                Square::D1,
                self.castling.white_queenside,
            ),
            (Color::Black, CastleSide::Kingside) => (
                Square::E8,
                Square::G8,
                Square::H8,
                Square::F8,
                self.castling.black_kingside,
            ),
            (Color::Black, CastleSide::Queenside) => (
                Square::E8,
                Square::C8,
                Square::A8,
                Square::D8,
                self.castling.black_queenside,
            ),
        };

        if !allowed
            || self.piece_at(king_from) != Some(Piece::new(us, PieceKind::King))
            || self.piece_at(rook_from) != Some(Piece::new(us, PieceKind::Rook))
            || !self.path_clear(king_from, rook_from)
        {
            return Err(illegal());
        }

        // The king may not castle out of, through, or into check.
        let them = us.opponent();
        if self.is_attacked(king_from, them) {
            return Err(illegal());
        }
        let step: i8 = if king_to.file() > king_from.file() { 1 } else { -1 };
        let mut current = king_from;
        while current != king_to {
            let Some(next) = current.offset(step, 0) else {
                return Err(illegal());
            };
            if self.is_attacked(next, them) {
                return Err(illegal());
            }
            current = next;
        }

        let mut next = self.clone();
        next.squares[king_from.index()] = None;
        next.squares[rook_from.index()] = None;
        next.squares[king_to.index()] = Some(Piece::new(us, PieceKind::King));
        next.squares[rook_to.index()] = Some(Piece::new(us, PieceKind::Rook));
        next.update_castling_rights(Piece::new(us, PieceKind::King), king_from, king_to);
        next.en_passant = None;
        next.halfmove_clock = self.halfmove_clock + 1;
        if us == Color::Black {
            next.fullmove_number += 1;
        }
        next.side_to_move = them;

        let detail = MoveDetail {
            from: king_from,
            to: king_to,
            color: us,
            piece: PieceKind::King,
            captured: None,
            promotion: None,
            castle: Some(side),
            en_passant: false,
            double_push: false,
        };
        Ok((next, detail))
    }
}

/// Splits a SAN body (suffixes already stripped) into its components.
fn parse_san_body(body: &str) -> Option<ParsedSan> {
    let mut chars: Vec<char> = body.chars().collect();

    let mut promotion = None;
    if chars.len() >= 2 && chars[chars.len() - 2] == '=' {
        let kind = PieceKind::from_char(chars[chars.len() - 1])?;
        if !matches!(
            kind,
            PieceKind::Knight | PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen
        ) || !chars[chars.len() - 1].is_ascii_uppercase()
        {
            return None;
        }
        promotion = Some(kind);
        chars.truncate(chars.len() - 2);
    }

    let piece = match chars.first() {
        Some(&c @ ('N' | 'B' | 'R' | 'Q' | 'K')) => {
            chars.remove(0);
            PieceKind::from_char(c)?
        }
        _ => PieceKind::Pawn,
    };

    if chars.len() < 2 {
        return None;
    }
    let rank_c = chars.pop()?;
    let file_c = chars.pop()?;
    if !('a'..='h').contains(&file_c) || !('1'..='8').contains(&rank_c) {
        return None;
    }
    let to = Square::from_coords(file_c as u8 - b'a', rank_c as u8 - b'1')?;

    let mut from_file = None;
    let mut from_rank = None;
    for c in chars {
        match c {
            'x' => {}
            'a'..='h' if from_file.is_none() => from_file = Some(c as u8 - b'a'),
            '1'..='8' if from_rank.is_none() => from_rank = Some(c as u8 - b'1'),
            _ => return None,
        }
    }

    if promotion.is_some() && piece != PieceKind::Pawn {
        return None;
    }

    Some(ParsedSan {
        piece,
        from_file,
        from_rank,
        to,
        promotion,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pawn_push_from_start() {
        let board = Board::initial();
        let (after, detail) = board.apply_san("e4").unwrap();
        assert_eq!(
            after.to_fen(),
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1"
        );
        assert_eq!(detail.from.to_string(), "e2");
        assert_eq!(detail.to.to_string(), "e4");
        assert_eq!(detail.piece, PieceKind::Pawn);
        assert!(detail.double_push);
        assert!(detail.captured.is_none());
    }

    #[test]
    fn test_capture_sequence() {
        let board = Board::initial();
        let (board, _) = board.apply_san("e4").unwrap();
        let (board, _) = board.apply_san("d5").unwrap();
        let (board, detail) = board.apply_san("exd5").unwrap();
        assert_eq!(detail.captured, Some(PieceKind::Pawn));
        assert_eq!(detail.to.to_string(), "d5");
        assert_eq!(board.halfmove_clock(), 0);
        assert_eq!(board.fullmove_number(), 2);
        assert_eq!(board.side_to_move(), Color::Black);
    }

    #[test]
    fn test_knight_development_and_clocks() {
        let board = Board::initial();
        let (board, _) = board.apply_san("Nf3").unwrap();
        assert_eq!(board.halfmove_clock(), 1);
        let (board, detail) = board.apply_san("Nc6").unwrap();
        assert_eq!(detail.color, Color::Black);
        assert_eq!(board.fullmove_number(), 2);
    }

    #[test]
    fn test_kingside_castle() {
        let board = Board::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        let (after, detail) = board.apply_san("O-O").unwrap();
        assert_eq!(after.to_fen(), "r3k2r/8/8/8/8/8/8/R4RK1 b kq - 1 1");
        assert_eq!(detail.castle, Some(CastleSide::Kingside));
        assert_eq!(detail.piece, PieceKind::King);
    }

    #[test]
    fn test_queenside_castle_black() {
        let board = Board::from_fen("r3k2r/8/8/8/8/8/8/R3K2R b KQkq - 0 1").unwrap();
        let (after, detail) = board.apply_san("O-O-O").unwrap();
        assert_eq!(after.to_fen(), "2kr3r/8/8/8/8/8/8/R3K2R w KQ - 1 2");
        assert_eq!(detail.castle, Some(CastleSide::Queenside));
    }

    #[test]
    fn test_castle_through_check_rejected() {
        // Black rook on f8 covers f1, so white may not castle kingside.
        let board = Board::from_fen("4kr2/8/8/8/8/8/8/R3K2R w KQ - 0 1").unwrap();
        assert!(matches!(
            board.apply_san("O-O"),
            Err(SanError::Illegal { .. })
        ));
        // Queenside path (d1, c1) is unthreatened.
        assert!(board.apply_san("O-O-O").is_ok());
    }

    #[test]
    fn test_en_passant_capture() {
        let board = Board::from_fen("4k3/8/8/8/3pP3/8/8/4K3 b - e3 0 1").unwrap();
        let (after, detail) = board.apply_san("dxe3").unwrap();
        assert!(detail.en_passant);
        assert_eq!(detail.captured, Some(PieceKind::Pawn));
        assert_eq!(after.to_fen(), "4k3/8/8/8/8/4p3/8/4K3 w - - 0 2");
    }

    #[test]
    fn test_promotion() {
        let board = Board::from_fen("4k3/P7/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        let (after, detail) = board.apply_san("a8=Q+").unwrap();
        assert_eq!(detail.promotion, Some(PieceKind::Queen));
        assert_eq!(after.to_fen(), "Q3k3/8/8/8/8/8/8/4K3 b - - 0 1");
        // A pawn reaching the last rank without a promotion piece is malformed.
        assert!(matches!(
            board.apply_san("a8"),
            Err(SanError::Malformed { .. })
        ));
    }

    #[test]
    fn test_disambiguation() {
        let board = Board::from_fen("4k3/8/8/8/8/5N2/8/1N2K3 w - - 0 1").unwrap();
        assert!(matches!(
            board.apply_san("Nd2"),
            Err(SanError::Ambiguous { .. })
        ));
        let (_, detail) = board.apply_san("Nbd2").unwrap();
        assert_eq!(detail.from.to_string(), "b1");
        let (_, detail) = board.apply_san("Nfd2").unwrap();
        assert_eq!(detail.from.to_string(), "f3");
    }

    #[test]
    fn test_pinned_piece_resolves_ambiguity() {
        // The e5 knight is pinned to the king by the e8 rook, so "Nd3"
        // uniquely refers to the b4 knight.
        let board = Board::from_fen("4r3/8/8/4N3/1N6/8/8/4K3 w - - 0 1").unwrap();
        let (_, detail) = board.apply_san("Nd3").unwrap();
        assert_eq!(detail.from.to_string(), "b4");
    }

    #[test]
    fn test_illegal_moves_rejected() {
        let board = Board::initial();
        assert!(matches!(
            board.apply_san("e5"),
            Err(SanError::Illegal { .. })
        ));
        assert!(matches!(
            board.apply_san("Ke2"),
            Err(SanError::Illegal { .. })
        ));
        assert!(matches!(
            board.apply_san("zz"),
            Err(SanError::Malformed { .. })
        ));
        assert!(matches!(
            board.apply_san(""),
            Err(SanError::Malformed { .. })
        ));
    }

    #[test]
    fn test_move_into_check_rejected() {
        let board = Board::from_fen("4k3/8/8/8/8/8/4q3/4K3 w - - 0 1").unwrap();
        // The queen on e2 covers every king step except the capture itself.
        assert!(board.apply_san("Kxe2").is_ok());
        assert!(board.apply_san("Kd1").is_err());
        assert!(board.apply_san("Kf1").is_err());
    }

    #[test]
    fn test_check_suffix_ignored() {
        let board = Board::from_fen("4k3/8/8/8/8/8/8/R3K3 w - - 0 1").unwrap();
        let (_, detail) = board.apply_san("Ra8+").unwrap();
        assert_eq!(detail.to.to_string(), "a8");
    }
}
