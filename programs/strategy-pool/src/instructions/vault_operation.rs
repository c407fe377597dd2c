use crate::error::ErrorCode;
use crate::states::*;
use crate::utils::TokenVaultSource;
use crate::STRATEGY_AUTH_SEED;
use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

/// Accounts shared by `delegate`, `undelegate` and `collect_rewards`.
///
/// The depositor must hold the vault role. Funds move between the
/// depositor's token account and the strategy's yield vault.
#[derive(Accounts)]
pub struct VaultOperation<'info> {
    /// Vault-role holder; authority of `depositor_token`.
    #[account(
        constraint = strategy.has_role(Role::Vault, &depositor.key()) @ ErrorCode::MissingRole
    )]
    pub depositor: Signer<'info>,

    #[account(
        mut,
        has_one = yield_vault @ ErrorCode::InvalidVault,
        has_one = underlying_mint @ ErrorCode::MintMismatch,
    )]
    pub strategy: Box<Account<'info, Strategy>>,

    /// Position of `depositor` in `strategy`.
    #[account(
        mut,
        seeds = [
            DELEGATOR_SEED.as_bytes(),
            strategy.key().as_ref(),
            depositor.key().as_ref(),
        ],
        bump = delegator.bump,
    )]
    pub delegator: Box<Account<'info, DelegatorAccount>>,

    /// Owner of the yield vault.
    ///
    /// CHECK: PDA derivation enforced by seeds; used only as a signer.
    #[account(
        seeds = [STRATEGY_AUTH_SEED.as_bytes(), strategy.key().as_ref()],
        bump = strategy.authority_bump,
    )]
    pub authority: UncheckedAccount<'info>,

    #[account(mut)]
    pub yield_vault: Box<InterfaceAccount<'info, TokenAccount>>,

    /// Depositor-side token account funds are pulled from and paid to.
    #[account(
        mut,
        token::mint = underlying_mint,
        token::authority = depositor,
    )]
    pub depositor_token: Box<InterfaceAccount<'info, TokenAccount>>,

    pub underlying_mint: Box<InterfaceAccount<'info, Mint>>,

    pub token_program: Interface<'info, TokenInterface>,
}

/// Deposits `amount` of the underlying asset for the depositor.
///
/// Steps:
/// 1) Accrue pending yield into the index.
/// 2) Raise depositor and strategy principal, carrying pending rewards.
/// 3) Transfer `amount` from the depositor into the yield vault.
pub fn delegate(mut ctx: Context<VaultOperation>, amount: u64) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;
    let mut source = TokenVaultSource::new(&ctx.accounts);
    let accounts = &mut ctx.accounts;

    accounts
        .strategy
        .accrual
        .delegate(&mut accounts.delegator, &mut source, amount, now)?;

    emit!(Delegated {
        strategy: accounts.strategy.key(),
        depositor: accounts.depositor.key(),
        amount,
        principal: accounts.delegator.principal,
        total_principal: accounts.strategy.accrual.total_principal,
    });
    Ok(())
}

/// Returns up to `amount` of principal to the depositor.
///
/// Over-requests are clamped to the depositor's principal.
pub fn undelegate(mut ctx: Context<VaultOperation>, amount: u64) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;
    let mut source = TokenVaultSource::new(&ctx.accounts);
    let accounts = &mut ctx.accounts;

    let withdrawn = accounts
        .strategy
        .accrual
        .undelegate(&mut accounts.delegator, &mut source, amount, now)?;
    if withdrawn < amount {
        msg!("undelegate clamped: requested {} withdrawn {}", amount, withdrawn);
    }

    emit!(Undelegated {
        strategy: accounts.strategy.key(),
        depositor: accounts.depositor.key(),
        requested: amount,
        withdrawn,
        principal: accounts.delegator.principal,
    });
    Ok(())
}

/// Pays up to `amount` of accrued rewards to the depositor.
///
/// Over-requests are clamped to what is available; `u64::MAX` collects
/// everything.
pub fn collect_rewards(mut ctx: Context<VaultOperation>, amount: u64) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;
    let mut source = TokenVaultSource::new(&ctx.accounts);
    let accounts = &mut ctx.accounts;

    let collected = accounts
        .strategy
        .accrual
        .collect_rewards(&mut accounts.delegator, &mut source, amount, now)?;

    emit!(RewardsCollected {
        strategy: accounts.strategy.key(),
        depositor: accounts.depositor.key(),
        requested: amount,
        collected,
    });
    Ok(())
}
