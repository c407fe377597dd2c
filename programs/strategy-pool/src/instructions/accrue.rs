use crate::error::ErrorCode;
use crate::states::*;
use anchor_lang::prelude::*;
use anchor_spl::token_interface::TokenAccount;

/// Permissionless accrual: absorbs yield that landed in the vault without
/// moving any funds.
#[derive(Accounts)]
pub struct AccrueStrategy<'info> {
    #[account(mut, has_one = yield_vault @ ErrorCode::InvalidVault)]
    pub strategy: Box<Account<'info, Strategy>>,

    pub yield_vault: Box<InterfaceAccount<'info, TokenAccount>>,
}

pub fn accrue(ctx: Context<AccrueStrategy>) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;
    let live_balance = ctx.accounts.yield_vault.amount;
    let strategy = &mut ctx.accounts.strategy;

    let absorbed = strategy.accrual.accrue(live_balance, now)?;
    if absorbed > 0 {
        emit!(Accrued {
            strategy: strategy.key(),
            absorbed,
            acc_reward_per_share: strategy.accrual.acc_reward_per_share,
            timestamp: strategy.accrual.last_accrual_timestamp,
        });
    }
    Ok(())
}
