pub mod initialize_strategy;
pub use initialize_strategy::*;

pub mod manage_vaults;
pub use manage_vaults::*;

pub mod vault_operation;
pub use vault_operation::*;

pub mod accrue;
pub use accrue::*;

pub mod views;
pub use views::*;
