pub use self::{board::*, piece::*, square::*};

pub mod board;
pub mod piece;
pub mod square;
