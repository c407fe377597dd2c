use crate::error::ErrorCode;
use crate::states::*;
use crate::utils::{transfer_from_vault_to_user, StrategyAccounts, StrategyCpi, STRATEGY_ACCOUNTS_LEN};
use crate::AUTH_SEED;
use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};
use strategy_pool::program::StrategyPool;

/// Accounts context for `distribute_rewards`.
///
/// `remaining_accounts` layout:
/// - the accounts of every registered strategy, active or not, in registry
///   order (see `StrategyAccounts`);
/// - then one token account per initiative, in roster order, owned by the
///   initiative's beneficiary.
#[derive(Accounts)]
pub struct DistributeRewards<'info> {
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

/// Collects every strategy's rewards and pays them out to initiatives.
///
/// Steps:
/// 1) Check the remaining accounts against the registry and the roster.
/// 2) Collect all available rewards from every registered strategy holding
///    an open position of the ledger.
/// 3) Add the carried remainder and split the total by initiative share.
/// 4) Pay each initiative; keep the rounding remainder for next time.
/// 5) Emit `RewardsDistributed`.
///
/// # Errors
/// - `InvalidRemainingAccounts`, `InvalidBeneficiary`, `MintMismatch`.
/// - `InitiativeSharesOverflow` if the shares add up to more than 100.
pub fn distribute_rewards<'info>(
    ctx: Context<'_, '_, 'info, 'info, DistributeRewards<'info>>,
) -> Result<()> {
    let registered = ctx.accounts.ledger.registered_strategies();
    let strategy_accounts_len = registered.len() * STRATEGY_ACCOUNTS_LEN;
    require_eq!(
        ctx.remaining_accounts.len(),
        strategy_accounts_len + ctx.accounts.ledger.initiatives.len(),
        ErrorCode::InvalidRemainingAccounts
    );
    let (strategy_accounts, beneficiary_accounts) =
        ctx.remaining_accounts.split_at(strategy_accounts_len);
    let targets = StrategyAccounts::parse(strategy_accounts, &registered)?;

    // --- 1) Beneficiary token accounts ---
    for (account, initiative) in beneficiary_accounts.iter().zip(&ctx.accounts.ledger.initiatives) {
        let token = InterfaceAccount::<TokenAccount>::try_from(account)?;
        require_keys_eq!(token.owner, initiative.beneficiary, ErrorCode::InvalidBeneficiary);
        require_keys_eq!(
            token.mint,
            ctx.accounts.ledger.underlying_mint,
            ErrorCode::MintMismatch
        );
    }

    let ledger_key = ctx.accounts.ledger.key();
    let authority_bump = [ctx.accounts.ledger.authority_bump];
    let signer_seeds: &[&[&[u8]]] = &[&[
        AUTH_SEED.as_bytes(),
        ledger_key.as_ref(),
        &authority_bump,
    ]];

    // --- 2) Collect from every strategy ---
    let before = ctx.accounts.vault.amount;
    let cpi = StrategyCpi {
        program: ctx.accounts.strategy_pool_program.to_account_info(),
        depositor: ctx.accounts.authority.to_account_info(),
        depositor_token: ctx.accounts.vault.to_account_info(),
        underlying_mint: ctx.accounts.underlying_mint.to_account_info(),
        token_program: ctx.accounts.token_program.to_account_info(),
    };
    let depositor = ctx.accounts.authority.key();
    for target in &targets {
        if !target.accepts_collect(&depositor)? {
            msg!("no open position in strategy {}", target.strategy.key);
            continue;
        }
        cpi.collect_rewards(target, u64::MAX, signer_seeds)?;
    }
    ctx.accounts.vault.reload()?;
    let collected = ctx
        .accounts
        .vault
        .amount
        .checked_sub(before)
        .ok_or(ErrorCode::MathOverflow)?;

    // --- 3) Split carried + collected ---
    let distribution = ctx.accounts.ledger.plan_distribution(collected)?;
    ctx.accounts.ledger.undistributed_rewards = distribution.leftover;

    // --- 4) Pay initiatives ---
    for (account, payout) in beneficiary_accounts.iter().zip(&distribution.payouts) {
        transfer_from_vault_to_user(
            ctx.accounts.authority.to_account_info(),
            ctx.accounts.vault.to_account_info(),
            account.clone(),
            ctx.accounts.underlying_mint.to_account_info(),
            ctx.accounts.token_program.to_account_info(),
            *payout,
            ctx.accounts.underlying_mint.decimals,
            signer_seeds,
        )?;
    }

    let distributed = distribution
        .total
        .checked_sub(distribution.leftover)
        .ok_or(ErrorCode::MathOverflow)?;
    msg!(
        "collected {} distributed {} carried {}",
        collected,
        distributed,
        distribution.leftover
    );

    emit!(RewardsDistributed {
        ledger: ledger_key,
        collected,
        distributed,
        carried: distribution.leftover,
    });
    Ok(())
}
