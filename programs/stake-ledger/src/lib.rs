use anchor_lang::prelude::*;

declare_id!("JAkikaxwpBZuSsv4a1azcSKqMrgLUoircR1kXxULic1o");

pub const AUTH_SEED: &str = "ledger_auth";
pub const LEDGER_VAULT_SEED: &str = "ledger_vault";
pub const RECEIPT_MINT_SEED: &str = "receipt";
/// Shares of a delegation or a distribution always add up to this.
pub const SHARES_TOTAL: u64 = 100;
/// Exit fees are expressed in basis points.
pub const FEE_RATE_DENOMINATOR_VALUE: u64 = 10_000;

pub mod error;
pub mod instructions;
pub mod states;
pub mod utils;

use instructions::*;

#[cfg(not(feature = "no-entrypoint"))]
use solana_security_txt::security_txt;
#[cfg(not(feature = "no-entrypoint"))]
security_txt! {
    name: "stake-ledger",
    project_url: "https://sdg.staking",
    contacts: "email:security@sdg.staking",
    policy: "https://sdg.staking/security",
    preferred_languages: "en"
}

#[program]
pub mod stake_ledger {

    use super::*;

    pub fn initialize_ledger(
        ctx: Context<InitializeLedger>,
        label: String,
        fee_rate: u64,
        fee_receiver: Pubkey,
    ) -> Result<()> {
        instructions::initialize_ledger(ctx, label, fee_rate, fee_receiver)
    }

    pub fn set_controller(ctx: Context<LedgerAdmin>, controller: Pubkey, enabled: bool) -> Result<()> {
        instructions::set_controller(ctx, controller, enabled)
    }

    pub fn transfer_admin(ctx: Context<LedgerAdmin>, new_admin: Pubkey) -> Result<()> {
        instructions::transfer_admin(ctx, new_admin)
    }

    pub fn stake(ctx: Context<CreateStake>, amount: u64) -> Result<()> {
        instructions::stake(ctx, amount)
    }

    pub fn delegate_all<'info>(
        ctx: Context<'_, '_, 'info, 'info, DelegateAll<'info>>,
        strategies: Vec<Pubkey>,
        shares: Vec<u8>,
    ) -> Result<()> {
        instructions::delegate_all(ctx, strategies, shares)
    }

    pub fn add_strategy(ctx: Context<AddStrategy>) -> Result<()> {
        instructions::add_strategy(ctx)
    }

    pub fn remove_strategy(ctx: Context<LedgerControl>, strategy: Pubkey) -> Result<()> {
        instructions::remove_strategy(ctx, strategy)
    }

    pub fn add_initiative(ctx: Context<LedgerControl>, name: String, beneficiary: Pubkey) -> Result<()> {
        instructions::add_initiative(ctx, name, beneficiary)
    }

    pub fn remove_initiative(ctx: Context<LedgerControl>, id: u64) -> Result<()> {
        instructions::remove_initiative(ctx, id)
    }

    pub fn set_initiatives_shares(
        ctx: Context<LedgerControl>,
        ids: Vec<u64>,
        shares: Vec<u8>,
    ) -> Result<()> {
        instructions::set_initiatives_shares(ctx, ids, shares)
    }

    pub fn distribute_rewards<'info>(
        ctx: Context<'_, '_, 'info, 'info, DistributeRewards<'info>>,
    ) -> Result<()> {
        instructions::distribute_rewards(ctx)
    }

    pub fn total_rewards<'info>(
        ctx: Context<'_, '_, 'info, 'info, ReadLedgerRewards<'info>>,
    ) -> Result<u64> {
        instructions::total_rewards(ctx)
    }

    pub fn rollover_epoch(ctx: Context<LedgerControl>) -> Result<()> {
        instructions::rollover_epoch(ctx)
    }

    pub fn exit<'info>(
        ctx: Context<'_, '_, 'info, 'info, ExitStake<'info>>,
        stake_id: u64,
    ) -> Result<()> {
        instructions::exit(ctx, stake_id)
    }
}
