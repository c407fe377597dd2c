use anchor_lang::prelude::*;

declare_id!("PczTaWh4PMhTEBMVbWg6bPzevpiqnq8cVhPp33LnKVj");

pub const STRATEGY_AUTH_SEED: &str = "strategy_auth";
pub const YIELD_VAULT_SEED: &str = "yield_vault";
/// Fixed-point scale of `acc_reward_per_share`.
pub const SCALE: u128 = 1_000_000_000_000;

pub mod error;
pub mod instructions;
pub mod states;
pub mod utils;

use instructions::*;

#[cfg(not(feature = "no-entrypoint"))]
use solana_security_txt::security_txt;
#[cfg(not(feature = "no-entrypoint"))]
security_txt! {
    name: "strategy-pool",
    project_url: "https://sdg.staking",
    contacts: "email:security@sdg.staking",
    policy: "https://sdg.staking/security",
    preferred_languages: "en"
}

#[program]
pub mod strategy_pool {

    use super::*;

    pub fn initialize_strategy(ctx: Context<InitializeStrategy>) -> Result<()> {
        instructions::initialize_strategy(ctx)
    }

    pub fn grant_vault(ctx: Context<GrantVault>) -> Result<()> {
        instructions::grant_vault(ctx)
    }

    pub fn revoke_vault(ctx: Context<RevokeVault>) -> Result<()> {
        instructions::revoke_vault(ctx)
    }

    pub fn delegate(ctx: Context<VaultOperation>, amount: u64) -> Result<()> {
        instructions::delegate(ctx, amount)
    }

    pub fn undelegate(ctx: Context<VaultOperation>, amount: u64) -> Result<()> {
        instructions::undelegate(ctx, amount)
    }

    pub fn collect_rewards(ctx: Context<VaultOperation>, amount: u64) -> Result<()> {
        instructions::collect_rewards(ctx, amount)
    }

    pub fn accrue(ctx: Context<AccrueStrategy>) -> Result<()> {
        instructions::accrue(ctx)
    }

    pub fn available_rewards(ctx: Context<ReadPosition>) -> Result<u64> {
        instructions::available_rewards(ctx)
    }

    pub fn balance_of(ctx: Context<ReadPosition>) -> Result<u64> {
        instructions::balance_of(ctx)
    }

    pub fn total_rewards(ctx: Context<ReadStrategy>) -> Result<u64> {
        instructions::total_rewards(ctx)
    }
}
