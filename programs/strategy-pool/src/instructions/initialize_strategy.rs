use crate::states::*;
use crate::{STRATEGY_AUTH_SEED, YIELD_VAULT_SEED};
use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

/// Accounts context for `initialize_strategy`.
///
/// Creates the strategy account and its PDA-owned yield vault. The signer
/// becomes the strategy admin.
#[derive(Accounts)]
pub struct InitializeStrategy<'info> {
    /// Admin of the new strategy; funds the accounts.
    #[account(mut)]
    pub admin: Signer<'info>,

    /// Fresh strategy account (keypair signer).
    #[account(init, payer = admin, space = Strategy::LEN)]
    pub strategy: Box<Account<'info, Strategy>>,

    /// Owner of the yield vault.
    ///
    /// CHECK: PDA derivation enforced by seeds; used only as a signer.
    #[account(
        seeds = [STRATEGY_AUTH_SEED.as_bytes(), strategy.key().as_ref()],
        bump,
    )]
    pub authority: UncheckedAccount<'info>,

    /// Asset the strategy accepts.
    pub underlying_mint: Box<InterfaceAccount<'info, Mint>>,

    /// Vault holding principal and yield.
    #[account(
        init,
        seeds = [YIELD_VAULT_SEED.as_bytes(), strategy.key().as_ref()],
        bump,
        payer = admin,
        token::mint = underlying_mint,
        token::authority = authority,
        token::token_program = token_program,
    )]
    pub yield_vault: Box<InterfaceAccount<'info, TokenAccount>>,

    pub token_program: Interface<'info, TokenInterface>,

    pub system_program: Program<'info, System>,
}

pub fn initialize_strategy(ctx: Context<InitializeStrategy>) -> Result<()> {
    let strategy = &mut ctx.accounts.strategy;
    strategy.authority_bump = ctx.bumps.authority;
    strategy.admin = ctx.accounts.admin.key();
    strategy.underlying_mint = ctx.accounts.underlying_mint.key();
    strategy.yield_vault = ctx.accounts.yield_vault.key();
    strategy.vaults = Vec::new();
    strategy.accrual = AccrualState {
        last_accrual_timestamp: Clock::get()?.unix_timestamp,
        ..Default::default()
    };
    msg!("Strategy initialized");

    emit!(StrategyInitialized {
        strategy: strategy.key(),
        admin: strategy.admin,
        underlying_mint: strategy.underlying_mint,
        yield_vault: strategy.yield_vault,
    });
    Ok(())
}
