use super::LedgerControl;
use crate::error::ErrorCode;
use crate::states::*;
use anchor_lang::prelude::*;
use strategy_pool::states::Strategy;

#[derive(Accounts)]
pub struct AddStrategy<'info> {
    #[account(
        constraint = ledger.has_role(Role::Controller, &controller.key()) @ ErrorCode::MissingRole
    )]
    pub controller: Signer<'info>,

    #[account(mut)]
    pub ledger: Box<Account<'info, Ledger>>,

    /// Strategy-pool account; must pay out the ledger's asset.
    #[account(
        constraint = strategy.underlying_mint == ledger.underlying_mint @ ErrorCode::MintMismatch
    )]
    pub strategy: Box<Account<'info, Strategy>>,
}

/// Registers a strategy, or reactivates a removed one.
pub fn add_strategy(ctx: Context<AddStrategy>) -> Result<()> {
    let strategy = ctx.accounts.strategy.key();
    let ledger = &mut ctx.accounts.ledger;
    ledger.add_strategy(strategy)?;

    emit!(StrategyAdded {
        ledger: ledger.key(),
        strategy,
    });
    Ok(())
}

/// Stops new delegation to `strategy`. Its principal and rewards stay
/// reachable through `exit` and `distribute_rewards`.
pub fn remove_strategy(ctx: Context<LedgerControl>, strategy: Pubkey) -> Result<()> {
    let ledger = &mut ctx.accounts.ledger;
    ledger.remove_strategy(&strategy)?;

    emit!(StrategyRemoved {
        ledger: ledger.key(),
        strategy,
    });
    Ok(())
}
