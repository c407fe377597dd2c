pub mod math;
pub use math::*;

pub mod token;
pub use token::*;

pub mod yield_source;
pub use yield_source::*;
