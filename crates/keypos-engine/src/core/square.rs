use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("invalid square name: '{name}'")]
pub struct SquareParseError {
    pub name: String,
}

/// A board square, indexed 0..64 with `a1 = 0` and `h8 = 63`.
///
/// Files run a-h, ranks run 1-8. The index is `rank * 8 + file`, both
/// zero-based. Squares serialize as their algebraic name (e.g. `"e4"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square(u8);

impl Square {
    pub const A1: Self = Self(0);
    pub const B1: Self = Self(1);
    pub const C1: Self = Self(2);
    pub const D1: Self = Self(3);
    pub const E1: Self = Self(4);
    pub const F1: Self = Self(5);
    pub const G1: Self = Self(6);
    pub const H1: Self = Self(7);
    pub const A8: Self = Self(56);
    pub const B8: Self = Self(57);
    pub const C8: Self = Self(58);
    pub const D8: Self = Self(59);
    pub const E8: Self = Self(60);
    pub const F8: Self = Self(61);
    pub const G8: Self = Self(62);
    pub const H8: Self = Self(63);

    /// Builds a square from zero-based file and rank, if both are in range.
    #[must_use]
    pub fn from_coords(file: u8, rank: u8) -> Option<Self> {
        (file < 8 && rank < 8).then(|| Self(rank * 8 + file))
    }

    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        u8::try_from(index).ok().filter(|&i| i < 64).map(Self)
    }

    #[must_use]
    pub fn index(self) -> usize {
        usize::from(self.0)
    }

    /// Zero-based file (0 = a-file).
    #[must_use]
    pub fn file(self) -> u8 {
        self.0 % 8
    }

    /// Zero-based rank (0 = rank 1).
    #[must_use]
    pub fn rank(self) -> u8 {
        self.0 / 8
    }

    /// The square shifted by the given file/rank deltas, if still on the board.
    #[must_use]
    pub fn offset(self, file_delta: i8, rank_delta: i8) -> Option<Self> {
        let file = u8::try_from(i16::from(self.file()) + i16::from(file_delta)).ok()?;
        let rank = u8::try_from(i16::from(self.rank()) + i16::from(rank_delta)).ok()?;
        Self::from_coords(file, rank)
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let file = char::from(b'a' + self.file());
        let rank = char::from(b'1' + self.rank());
        write!(f, "{file}{rank}")
    }
}

impl FromStr for Square {
    type Err = SquareParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let error = || SquareParseError {
            name: s.to_string(),
        };
        let mut chars = s.chars();
        let file_c = chars.next().ok_or_else(error)?;
        let rank_c = chars.next().ok_or_else(error)?;
        if chars.next().is_some() {
            return Err(error());
        }
        let (file, rank) = match (file_c, rank_c) {
            ('a'..='h', '1'..='8') => (file_c as u8 - b'a', rank_c as u8 - b'1'),
            _ => return Err(error()),
        };
        Self::from_coords(file, rank).ok_or_else(error)
    }
}

impl Serialize for Square {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Square {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        for name in ["a1", "e4", "h8", "d5"] {
            let square: Square = name.parse().unwrap();
            assert_eq!(square.to_string(), name);
        }
        assert_eq!("a1".parse::<Square>().unwrap(), Square::A1);
        assert_eq!("e1".parse::<Square>().unwrap(), Square::E1);
    }

    #[test]
    fn test_parse_rejects_bad_names() {
        for name in ["", "e", "e9", "i4", "e44", "4e"] {
            assert!(name.parse::<Square>().is_err(), "accepted '{name}'");
        }
    }

    #[test]
    fn test_offset() {
        let e4: Square = "e4".parse().unwrap();
        assert_eq!(e4.offset(1, 1).unwrap().to_string(), "f5");
        assert_eq!(e4.offset(-4, 0).unwrap().to_string(), "a4");
        assert!(e4.offset(-5, 0).is_none());
        assert!(e4.offset(0, 5).is_none());
    }

    #[test]
    fn test_serialization() {
        let square: Square = "c6".parse().unwrap();
        let json = serde_json::to_string(&square).unwrap();
        assert_eq!(json, "\"c6\"");
        let back: Square = serde_json::from_str(&json).unwrap();
        assert_eq!(back, square);
    }
}
