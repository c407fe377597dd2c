pub mod epoch;
pub use epoch::*;

pub mod events;
pub use events::*;

pub mod initiative;
pub use initiative::*;

pub mod ledger;
pub use ledger::*;

pub mod roles;
pub use roles::*;

pub mod stake_info;
pub use stake_info::*;

pub mod strategy_registry;
pub use strategy_registry::*;
