//! Mailbox board representation with FEN encoding.
//!
//! The board carries the full position state that a FEN string encodes:
//! piece placement, side to move, castling rights, en-passant target, and
//! the halfmove/fullmove clocks. [`Board::to_fen`] is the canonical
//! board-state string used as the identity key throughout the analysis
//! pipeline; [`Board::from_fen`] doubles as the structural validity check
//! for externally supplied board states.
//!
//! Boards are immutable from the caller's point of view - move application
//! (see [`apply_san`](Board::apply_san)) returns a new `Board`.

use super::{
    piece::{Color, Piece, PieceKind},
    square::Square,
};

pub(crate) const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

pub(crate) const KING_OFFSETS: [(i8, i8); 8] = [
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
];

const ROOK_DIRECTIONS: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

/// Castling availability for both sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CastlingRights {
    pub white_kingside: bool,
    pub white_queenside: bool,
    pub black_kingside: bool,
    pub black_queenside: bool,
}

impl CastlingRights {
    pub const ALL: Self = Self {
        white_kingside: true,
        white_queenside: true,
        black_kingside: true,
        black_queenside: true,
    };

    pub const NONE: Self = Self {
        white_kingside: false,
        white_queenside: false,
        black_kingside: false,
        black_queenside: false,
    };

    fn from_fen_field(field: &str) -> Option<Self> {
        if field == "-" {
            return Some(Self::NONE);
        }
        let mut rights = Self::NONE;
        for c in field.chars() {
            match c {
                'K' => rights.white_kingside = true,
                'Q' => rights.white_queenside = true,
                'k' => rights.black_kingside = true,
                'q' => rights.black_queenside = true,
                _ => return None,
            }
        }
        Some(rights)
    }

    fn to_fen_field(self) -> String {
        let mut field = String::new();
        if self.white_kingside {
            field.push('K');
        }
        if self.white_queenside {
            field.push('Q');
        }
        if self.black_kingside {
            field.push('k');
        }
        if self.black_queenside {
            field.push('q');
        }
        if field.is_empty() {
            field.push('-');
        }
        field
    }
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum FenParseError {
    #[display("FEN must have 6 fields, got {count}")]
    FieldCount { count: usize },
    #[display("piece placement must have 8 ranks, got {count}")]
    RankCount { count: usize },
    #[display("invalid piece placement rank '{rank}'")]
    Rank { rank: String },
    #[display("invalid side to move '{value}'")]
    SideToMove { value: String },
    #[display("invalid castling field '{value}'")]
    Castling { value: String },
    #[display("invalid en passant field '{value}'")]
    EnPassant { value: String },
    #[display("invalid clock field '{value}'")]
    Clock { value: String },
    #[display("expected exactly one {color} king, found {count}")]
    KingCount { color: Color, count: usize },
}

/// A full chess position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    pub(crate) squares: [Option<Piece>; 64],
    pub(crate) side_to_move: Color,
    pub(crate) castling: CastlingRights,
    pub(crate) en_passant: Option<Square>,
    pub(crate) halfmove_clock: u32,
    pub(crate) fullmove_number: u32,
}

impl Board {
    /// FEN of the standard starting position.
    pub const START_FEN: &'static str =
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    /// The standard starting position.
    #[must_use]
    pub fn initial() -> Self {
        const BACK_RANK: [PieceKind; 8] = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];
        let mut squares = [None; 64];
        for (file, &kind) in BACK_RANK.iter().enumerate() {
            squares[file] = Some(Piece::new(Color::White, kind));
            squares[8 + file] = Some(Piece::new(Color::White, PieceKind::Pawn));
            squares[48 + file] = Some(Piece::new(Color::Black, PieceKind::Pawn));
            squares[56 + file] = Some(Piece::new(Color::Black, kind));
        }
        Self {
            squares,
            side_to_move: Color::White,
            castling: CastlingRights::ALL,
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }

    #[must_use]
    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.squares[square.index()]
    }

    #[must_use]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[must_use]
    pub fn castling(&self) -> CastlingRights {
        self.castling
    }

    #[must_use]
    pub fn en_passant(&self) -> Option<Square> {
        self.en_passant
    }

    #[must_use]
    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    #[must_use]
    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    /// Parses a FEN string, validating its structure.
    ///
    /// All six fields are required and each side must have exactly one king.
    pub fn from_fen(fen: &str) -> Result<Self, FenParseError> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        if fields.len() != 6 {
            return Err(FenParseError::FieldCount {
                count: fields.len(),
            });
        }

        let ranks: Vec<&str> = fields[0].split('/').collect();
        if ranks.len() != 8 {
            return Err(FenParseError::RankCount { count: ranks.len() });
        }
        let mut squares = [None; 64];
        for (i, rank_str) in ranks.iter().enumerate() {
            let rank = 7 - u8::try_from(i).unwrap_or(7);
            let mut file: u8 = 0;
            for c in rank_str.chars() {
                if let Some(digit) = c.to_digit(10) {
                    if digit == 0 || digit > 8 {
                        return Err(FenParseError::Rank {
                            rank: (*rank_str).to_string(),
                        });
                    }
                    file += u8::try_from(digit).unwrap_or(8);
                } else if let Some(piece) = Piece::from_fen_char(c) {
                    let Some(square) = Square::from_coords(file, rank) else {
                        return Err(FenParseError::Rank {
                            rank: (*rank_str).to_string(),
                        });
                    };
                    squares[square.index()] = Some(piece);
                    file += 1;
                } else {
                    return Err(FenParseError::Rank {
                        rank: (*rank_str).to_string(),
                    });
                }
                if file > 8 {
                    return Err(FenParseError::Rank {
                        rank: (*rank_str).to_string(),
                    });
                }
            }
            if file != 8 {
                return Err(FenParseError::Rank {
                    rank: (*rank_str).to_string(),
                });
            }
        }

        let side_to_move = match fields[1] {
            "w" => Color::White,
            "b" => Color::Black,
            value => {
                return Err(FenParseError::SideToMove {
                    value: value.to_string(),
                });
            }
        };

        let castling =
            CastlingRights::from_fen_field(fields[2]).ok_or_else(|| FenParseError::Castling {
                value: fields[2].to_string(),
            })?;

        let en_passant = match fields[3] {
            "-" => None,
            value => Some(value.parse().map_err(|_| FenParseError::EnPassant {
                value: value.to_string(),
            })?),
        };

        let halfmove_clock = fields[4].parse().map_err(|_| FenParseError::Clock {
            value: fields[4].to_string(),
        })?;
        let fullmove_number = fields[5].parse().map_err(|_| FenParseError::Clock {
            value: fields[5].to_string(),
        })?;

        let board = Self {
            squares,
            side_to_move,
            castling,
            en_passant,
            halfmove_clock,
            fullmove_number,
        };
        for color in [Color::White, Color::Black] {
            let count = board
                .squares
                .iter()
                .flatten()
                .filter(|p| p.color == color && p.kind == PieceKind::King)
                .count();
            if count != 1 {
                return Err(FenParseError::KingCount { color, count });
            }
        }
        Ok(board)
    }

    /// Renders the canonical FEN string for this position.
    #[must_use]
    pub fn to_fen(&self) -> String {
        let mut placement = String::new();
        for rank in (0..8).rev() {
            let mut empty = 0;
            for file in 0..8 {
                let square = Square::from_coords(file, rank);
                match square.and_then(|sq| self.piece_at(sq)) {
                    Some(piece) => {
                        if empty > 0 {
                            placement.push_str(&empty.to_string());
                            empty = 0;
                        }
                        placement.push(piece.to_fen_char());
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                placement.push_str(&empty.to_string());
            }
            if rank > 0 {
                placement.push('/');
            }
        }

        let side = if self.side_to_move.is_white() { "w" } else { "b" };
        let castling = self.castling.to_fen_field();
        let en_passant = self
            .en_passant
            .map_or_else(|| "-".to_string(), |sq| sq.to_string());
        format!(
            "{placement} {side} {castling} {en_passant} {} {}",
            self.halfmove_clock, self.fullmove_number
        )
    }

    /// Signed material sum with standard weights; white counts positive.
    #[must_use]
    pub fn material_balance(&self) -> i32 {
        self.squares
            .iter()
            .flatten()
            .map(|piece| {
                let value = piece.kind.material_value();
                if piece.color.is_white() { value } else { -value }
            })
            .sum()
    }

    #[must_use]
    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.squares.iter().position(|p| {
            *p == Some(Piece::new(color, PieceKind::King))
        }).and_then(Square::from_index)
    }

    /// Whether `by` has any piece attacking `target`.
    #[must_use]
    pub fn is_attacked(&self, target: Square, by: Color) -> bool {
        // Pawns attack diagonally forward, so look one rank back from the target.
        let pawn_rank_delta: i8 = if by.is_white() { -1 } else { 1 };
        for file_delta in [-1, 1] {
            if let Some(square) = target.offset(file_delta, pawn_rank_delta) {
                if self.piece_at(square) == Some(Piece::new(by, PieceKind::Pawn)) {
                    return true;
                }
            }
        }

        for (df, dr) in KNIGHT_OFFSETS {
            if let Some(square) = target.offset(df, dr) {
                if self.piece_at(square) == Some(Piece::new(by, PieceKind::Knight)) {
                    return true;
                }
            }
        }

        for (df, dr) in KING_OFFSETS {
            if let Some(square) = target.offset(df, dr) {
                if self.piece_at(square) == Some(Piece::new(by, PieceKind::King)) {
                    return true;
                }
            }
        }

        self.ray_attacked(target, by, &ROOK_DIRECTIONS, PieceKind::Rook)
            || self.ray_attacked(target, by, &BISHOP_DIRECTIONS, PieceKind::Bishop)
    }

    #[must_use]
    pub fn in_check(&self, color: Color) -> bool {
        self.king_square(color)
            .is_some_and(|king| self.is_attacked(king, color.opponent()))
    }

    fn ray_attacked(
        &self,
        target: Square,
        by: Color,
        directions: &[(i8, i8)],
        slider: PieceKind,
    ) -> bool {
        for &(df, dr) in directions {
            let mut current = target;
            while let Some(next) = current.offset(df, dr) {
                if let Some(piece) = self.piece_at(next) {
                    if piece.color == by && (piece.kind == slider || piece.kind == PieceKind::Queen)
                    {
                        return true;
                    }
                    break;
                }
                current = next;
            }
        }
        false
    }

    /// Whether the path strictly between two aligned squares is empty.
    pub(crate) fn path_clear(&self, from: Square, to: Square) -> bool {
        let df = (i8::try_from(to.file()).unwrap_or(0) - i8::try_from(from.file()).unwrap_or(0))
            .signum();
        let dr = (i8::try_from(to.rank()).unwrap_or(0) - i8::try_from(from.rank()).unwrap_or(0))
            .signum();
        let mut current = from;
        loop {
            let Some(next) = current.offset(df, dr) else {
                return false;
            };
            if next == to {
                return true;
            }
            if self.piece_at(next).is_some() {
                return false;
            }
            current = next;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_matches_start_fen() {
        assert_eq!(Board::initial().to_fen(), Board::START_FEN);
    }

    #[test]
    fn test_fen_round_trip() {
        let fens = [
            Board::START_FEN,
            "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1",
            "4k3/8/8/3pP3/8/8/8/4K3 w - d6 4 23",
            "8/5k2/8/8/8/2K5/8/8 b - - 10 40",
        ];
        for fen in fens {
            let board = Board::from_fen(fen).unwrap();
            assert_eq!(board.to_fen(), fen);
        }
    }

    #[test]
    fn test_from_fen_rejects_malformed() {
        // Too few fields.
        assert!(matches!(
            Board::from_fen("4k3/8/8/8/8/8/8/4K3 w -"),
            Err(FenParseError::FieldCount { count: 3 })
        ));
        // Rank does not sum to 8 files.
        assert!(Board::from_fen("4k3/8/8/8/8/8/8/4K2 w - - 0 1").is_err());
        // Nine ranks.
        assert!(Board::from_fen("4k3/8/8/8/8/8/8/8/4K3 w - - 0 1").is_err());
        // Garbage placement character.
        assert!(Board::from_fen("4x3/8/8/8/8/8/8/4K3 w - - 0 1").is_err());
        // Missing black king.
        assert!(matches!(
            Board::from_fen("8/8/8/8/8/8/8/4K3 w - - 0 1"),
            Err(FenParseError::KingCount { .. })
        ));
        // Bad side to move.
        assert!(Board::from_fen("4k3/8/8/8/8/8/8/4K3 x - - 0 1").is_err());
        // Not a FEN at all.
        assert!(Board::from_fen("not a fen").is_err());
    }

    #[test]
    fn test_material_balance() {
        assert_eq!(Board::initial().material_balance(), 0);
        let board = Board::from_fen("4k3/8/8/8/8/8/4P3/4K3 w - - 0 1").unwrap();
        assert_eq!(board.material_balance(), 1);
        let board = Board::from_fen("3qk3/8/8/8/8/8/8/3RK3 w - - 0 1").unwrap();
        assert_eq!(board.material_balance(), -4);
    }

    #[test]
    fn test_is_attacked() {
        let board = Board::from_fen("4k3/8/8/8/4r3/8/8/4K3 w - - 0 1").unwrap();
        assert!(board.is_attacked("e2".parse().unwrap(), Color::Black));
        assert!(board.in_check(Color::White));
        assert!(!board.in_check(Color::Black));

        let board = Board::from_fen("4k3/8/8/8/8/5n2/8/4K3 w - - 0 1").unwrap();
        assert!(board.is_attacked(Square::E1, Color::Black));

        let board = Board::from_fen("4k3/8/8/8/8/8/3p4/4K3 w - - 0 1").unwrap();
        assert!(board.is_attacked(Square::E1, Color::Black));
        assert!(!board.is_attacked(Square::D1, Color::Black));
    }
}
