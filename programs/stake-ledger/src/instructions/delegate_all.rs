use crate::error::ErrorCode;
use crate::states::*;
use crate::utils::{StrategyAccounts, StrategyCpi};
use crate::AUTH_SEED;
use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};
use strategy_pool::program::StrategyPool;

/// Accounts context for `delegate_all`.
///
/// `remaining_accounts` carries the accounts of every selected strategy, in
/// the order of the `strategies` argument (see `StrategyAccounts`).
#[derive(Accounts)]
pub struct DelegateAll<'info> {
    #[account(
        constraint = ledger.has_role(Role::Controller, &controller.key()) @ ErrorCode::MissingRole
    )]
    pub controller: Signer<'info>,

    #[account(
        mut,
        has_one = vault @ ErrorCode::InvalidVault,
        has_one = underlying_mint @ ErrorCode::MintMismatch,
    )]
    pub ledger: Box<Account<'info, Ledger>>,

    /// Depositor towards every strategy.
    ///
    /// CHECK: PDA derivation enforced by seeds; used only as a signer.
    #[account(
        seeds = [AUTH_SEED.as_bytes(), ledger.key().as_ref()],
        bump = ledger.authority_bump,
    )]
    pub authority: UncheckedAccount<'info>,

    #[account(mut)]
    pub vault: Box<InterfaceAccount<'info, TokenAccount>>,

    pub underlying_mint: Box<InterfaceAccount<'info, Mint>>,

    pub token_program: Interface<'info, TokenInterface>,

    pub strategy_pool_program: Program<'info, StrategyPool>,
}

/// Routes all undelegated principal into strategies by percentage share.
///
/// Steps:
/// 1) Validate lengths, share sum, undelegated principal and strategies.
/// 2) Split the undelegated total; the last strategy takes the rounding remainder.
/// 3) Flip every undelegated stake to delegated and clear the epoch balances.
/// 4) Delegate each allocation through strategy-pool.
/// 5) Emit `StakesDelegated`.
///
/// # Errors
/// - `LengthMismatch`, `InvalidSharesSum`, `NothingToDelegate`, `InvalidStrategy`.
/// - `InvalidRemainingAccounts` if the strategy accounts do not line up.
pub fn delegate_all<'info>(
    ctx: Context<'_, '_, 'info, 'info, DelegateAll<'info>>,
    strategies: Vec<Pubkey>,
    shares: Vec<u8>,
) -> Result<()> {
    let amounts = ctx.accounts.ledger.plan_delegation(&strategies, &shares)?;
    let targets = StrategyAccounts::parse(ctx.remaining_accounts, &strategies)?;
    let total = ctx.accounts.ledger.apply_delegation()?;

    let ledger_key = ctx.accounts.ledger.key();
    let authority_bump = [ctx.accounts.ledger.authority_bump];
    let signer_seeds: &[&[&[u8]]] = &[&[
        AUTH_SEED.as_bytes(),
        ledger_key.as_ref(),
        &authority_bump,
    ]];

    let cpi = StrategyCpi {
        program: ctx.accounts.strategy_pool_program.to_account_info(),
        depositor: ctx.accounts.authority.to_account_info(),
        depositor_token: ctx.accounts.vault.to_account_info(),
        underlying_mint: ctx.accounts.underlying_mint.to_account_info(),
        token_program: ctx.accounts.token_program.to_account_info(),
    };
    for (target, amount) in targets.iter().zip(&amounts) {
        cpi.delegate(target, *amount, signer_seeds)?;
    }
    msg!("delegated {} across {} strategies", total, strategies.len());

    emit!(StakesDelegated {
        ledger: ledger_key,
        total,
        delegated_before: ctx.accounts.ledger.delegated_before,
        strategies,
        amounts,
    });
    Ok(())
}
