use crate::states::*;
use crate::utils::StrategyAccounts;
use crate::AUTH_SEED;
use anchor_lang::prelude::*;

/// Accounts context for `total_rewards`.
///
/// `remaining_accounts` carries the accounts of every registered strategy in
/// registry order (see `StrategyAccounts`).
#[derive(Accounts)]
pub struct ReadLedgerRewards<'info> {
    pub ledger: Box<Account<'info, Ledger>>,

    /// CHECK: PDA derivation enforced by seeds; the ledger's depositor identity.
    #[account(
        seeds = [AUTH_SEED.as_bytes(), ledger.key().as_ref()],
        bump = ledger.authority_bump,
    )]
    pub authority: UncheckedAccount<'info>,
}

/// Rewards the ledger could collect from all its strategies right now,
/// returned as program return data.
pub fn total_rewards<'info>(
    ctx: Context<'_, '_, 'info, 'info, ReadLedgerRewards<'info>>,
) -> Result<u64> {
    let registered = ctx.accounts.ledger.registered_strategies();
    let targets = StrategyAccounts::parse(ctx.remaining_accounts, &registered)?;
    let depositor = ctx.accounts.authority.key();

    let mut total = 0u64;
    for target in &targets {
        total = total.saturating_add(target.available_rewards(&depositor)?);
    }
    msg!("total rewards {} across {} strategies", total, targets.len());
    Ok(total)
}
