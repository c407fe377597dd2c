pub mod accrual;
pub use accrual::*;

pub mod delegator;
pub use delegator::*;

pub mod events;
pub use events::*;

pub mod roles;
pub use roles::*;

pub mod strategy;
pub use strategy::*;
