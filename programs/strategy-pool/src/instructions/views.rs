use crate::error::ErrorCode;
use crate::states::*;
use anchor_lang::prelude::*;
use anchor_spl::token_interface::TokenAccount;

/// Read-only view of one depositor's position. Results are returned as
/// program return data.
#[derive(Accounts)]
pub struct ReadPosition<'info> {
    #[account(has_one = yield_vault @ ErrorCode::InvalidVault)]
    pub strategy: Box<Account<'info, Strategy>>,

    #[account(
        constraint = delegator.strategy == strategy.key() @ ErrorCode::InvalidDelegator
    )]
    pub delegator: Box<Account<'info, DelegatorAccount>>,

    pub yield_vault: Box<InterfaceAccount<'info, TokenAccount>>,
}

#[derive(Accounts)]
pub struct ReadStrategy<'info> {
    #[account(has_one = yield_vault @ ErrorCode::InvalidVault)]
    pub strategy: Box<Account<'info, Strategy>>,

    pub yield_vault: Box<InterfaceAccount<'info, TokenAccount>>,
}

/// Rewards the depositor could collect right now.
pub fn available_rewards(ctx: Context<ReadPosition>) -> Result<u64> {
    ctx.accounts
        .strategy
        .accrual
        .available_rewards(&ctx.accounts.delegator, ctx.accounts.yield_vault.amount)
}

/// Principal the depositor has delegated.
pub fn balance_of(ctx: Context<ReadPosition>) -> Result<u64> {
    Ok(ctx.accounts.delegator.principal)
}

/// Yield held for all depositors together.
pub fn total_rewards(ctx: Context<ReadStrategy>) -> Result<u64> {
    Ok(ctx
        .accounts
        .strategy
        .accrual
        .total_rewards(ctx.accounts.yield_vault.amount))
}
