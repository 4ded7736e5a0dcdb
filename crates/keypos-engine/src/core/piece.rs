use serde::{Deserialize, Serialize};

/// The two sides of a chess game.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::IsVariant,
)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    #[display("white")]
    White,
    #[display("black")]
    Black,
}

impl Color {
    #[must_use]
    pub fn opponent(self) -> Self {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }
}

/// A chess piece type, independent of color.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum PieceKind {
    #[display("pawn")]
    Pawn,
    #[display("knight")]
    Knight,
    #[display("bishop")]
    Bishop,
    #[display("rook")]
    Rook,
    #[display("queen")]
    Queen,
    #[display("king")]
    King,
}

impl PieceKind {
    /// Parses a piece letter in either case (`'n'` or `'N'` -> knight).
    #[must_use]
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'p' => Some(Self::Pawn),
            'n' => Some(Self::Knight),
            'b' => Some(Self::Bishop),
            'r' => Some(Self::Rook),
            'q' => Some(Self::Queen),
            'k' => Some(Self::King),
            _ => None,
        }
    }

    /// The lowercase FEN letter for this piece type.
    #[must_use]
    pub fn as_char(self) -> char {
        match self {
            Self::Pawn => 'p',
            Self::Knight => 'n',
            Self::Bishop => 'b',
            Self::Rook => 'r',
            Self::Queen => 'q',
            Self::King => 'k',
        }
    }

    /// Standard material weight: pawn 1, minor pieces 3, rook 5, queen 9.
    ///
    /// Kings weigh 0 so that material sums stay comparable between positions.
    #[must_use]
    pub fn material_value(self) -> i32 {
        match self {
            Self::Pawn => 1,
            Self::Knight | Self::Bishop => 3,
            Self::Rook => 5,
            Self::Queen => 9,
            Self::King => 0,
        }
    }
}

/// A colored piece as it sits on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub color: Color,
    pub kind: PieceKind,
}

impl Piece {
    #[must_use]
    pub fn new(color: Color, kind: PieceKind) -> Self {
        Self { color, kind }
    }

    /// Parses a FEN piece letter; uppercase is white, lowercase is black.
    #[must_use]
    pub fn from_fen_char(c: char) -> Option<Self> {
        let kind = PieceKind::from_char(c)?;
        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        Some(Self { color, kind })
    }

    #[must_use]
    pub fn to_fen_char(self) -> char {
        let c = self.kind.as_char();
        if self.color.is_white() {
            c.to_ascii_uppercase()
        } else {
            c
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fen_char_round_trip() {
        for c in "PNBRQKpnbrqk".chars() {
            let piece = Piece::from_fen_char(c).unwrap();
            assert_eq!(piece.to_fen_char(), c);
        }
        assert!(Piece::from_fen_char('x').is_none());
        assert!(Piece::from_fen_char('1').is_none());
    }

    #[test]
    fn test_material_values() {
        assert_eq!(PieceKind::Pawn.material_value(), 1);
        assert_eq!(PieceKind::Knight.material_value(), 3);
        assert_eq!(PieceKind::Bishop.material_value(), 3);
        assert_eq!(PieceKind::Rook.material_value(), 5);
        assert_eq!(PieceKind::Queen.material_value(), 9);
        assert_eq!(PieceKind::King.material_value(), 0);
    }

    #[test]
    fn test_opponent() {
        assert_eq!(Color::White.opponent(), Color::Black);
        assert_eq!(Color::Black.opponent(), Color::White);
    }
}
