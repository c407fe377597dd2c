pub mod split;
pub use split::*;

pub mod strategy_cpi;
pub use strategy_cpi::*;

pub mod token;
pub use token::*;
