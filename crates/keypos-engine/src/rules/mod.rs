pub use self::{pgn::*, san::*};

pub mod pgn;
pub mod san;
