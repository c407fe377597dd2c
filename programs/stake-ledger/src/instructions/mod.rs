pub mod delegate_all;
pub use delegate_all::*;

pub mod distribute_rewards;
pub use distribute_rewards::*;

pub mod exit;
pub use exit::*;

pub mod initialize_ledger;
pub use initialize_ledger::*;

pub mod initiatives;
pub use initiatives::*;

pub mod rollover_epoch;
pub use rollover_epoch::*;

pub mod stake;
pub use stake::*;

pub mod strategies;
pub use strategies::*;

pub mod total_rewards;
pub use total_rewards::*;

pub mod update_roles;
pub use update_roles::*;
