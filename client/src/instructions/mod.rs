pub mod ledger_instructions;
pub mod rpc;
pub mod strategy_instructions;
pub mod utils;
