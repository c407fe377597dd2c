use crate::error::ErrorCode;
use crate::states::*;
use anchor_lang::prelude::*;

/// Grants `depositor` the vault role and opens its position.
///
/// The position account survives a revoke, so re-granting a depositor
/// resumes its principal and rewards.
#[derive(Accounts)]
pub struct GrantVault<'info> {
    /// Strategy admin; funds the position account.
    #[account(
        mut,
        constraint = strategy.has_role(Role::Admin, &admin.key()) @ ErrorCode::MissingRole
    )]
    pub admin: Signer<'info>,

    #[account(mut)]
    pub strategy: Box<Account<'info, Strategy>>,

    /// Identity that will sign vault operations (a stake ledger's authority PDA).
    ///
    /// CHECK: only the address is recorded.
    pub depositor: UncheckedAccount<'info>,

    #[account(
        init_if_needed,
        payer = admin,
        space = DelegatorAccount::LEN,
        seeds = [
            DELEGATOR_SEED.as_bytes(),
            strategy.key().as_ref(),
            depositor.key().as_ref(),
        ],
        bump,
    )]
    pub delegator: Box<Account<'info, DelegatorAccount>>,

    pub system_program: Program<'info, System>,
}

pub fn grant_vault(ctx: Context<GrantVault>) -> Result<()> {
    let strategy_key = ctx.accounts.strategy.key();
    let depositor = ctx.accounts.depositor.key();

    ctx.accounts.strategy.grant_vault(depositor)?;

    let delegator = &mut ctx.accounts.delegator;
    if delegator.strategy == Pubkey::default() {
        delegator.bump = ctx.bumps.delegator;
        delegator.strategy = strategy_key;
        delegator.depositor = depositor;
    }

    emit!(VaultGranted {
        strategy: strategy_key,
        depositor,
    });
    Ok(())
}

#[derive(Accounts)]
pub struct RevokeVault<'info> {
    #[account(
        constraint = strategy.has_role(Role::Admin, &admin.key()) @ ErrorCode::MissingRole
    )]
    pub admin: Signer<'info>,

    #[account(mut)]
    pub strategy: Box<Account<'info, Strategy>>,

    /// CHECK: only the address is used.
    pub depositor: UncheckedAccount<'info>,
}

/// Removes the vault role. Principal already delegated stays in the pool.
pub fn revoke_vault(ctx: Context<RevokeVault>) -> Result<()> {
    let depositor = ctx.accounts.depositor.key();
    ctx.accounts.strategy.revoke_vault(&depositor)?;

    emit!(VaultRevoked {
        strategy: ctx.accounts.strategy.key(),
        depositor,
    });
    Ok(())
}
