use crate::error::ErrorCode;
use crate::states::*;
use crate::utils::{
    burn_receipt, split_proportional, transfer_from_vault_to_user, StrategyAccounts, StrategyCpi,
};
use crate::AUTH_SEED;
use anchor_lang::prelude::*;
use anchor_spl::associated_token::AssociatedToken;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};
use strategy_pool::program::StrategyPool;

/// Accounts context for `exit`.
///
/// For a delegated stake, `remaining_accounts` carries the accounts of every
/// registered strategy in registry order (see `StrategyAccounts`). Strategies
/// where the ledger has no open position count as holding nothing. An
/// undelegated stake needs none.
#[derive(Accounts)]
#[instruction(stake_id: u64)]
pub struct ExitStake<'info> {
    /// Receipt holder; pays for its token account if needed.
    #[account(mut)]
    pub owner: Signer<'info>,

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

    #[account(
        mut,
        seeds = [
            STAKE_SEED.as_bytes(),
            ledger.key().as_ref(),
            &stake_id.to_le_bytes(),
        ],
        bump = stake_info.bump,
    )]
    pub stake_info: Box<Account<'info, StakeInfo>>,

    #[account(
        mut,
        address = stake_info.receipt_mint @ ErrorCode::StakeNotFound,
    )]
    pub receipt_mint: Box<InterfaceAccount<'info, Mint>>,

    /// Token account that actually holds the receipt, whoever owns it.
    #[account(
        mut,
        token::mint = receipt_mint,
        token::token_program = token_program,
    )]
    pub receipt_token: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(mut)]
    pub vault: Box<InterfaceAccount<'info, TokenAccount>>,

    pub underlying_mint: Box<InterfaceAccount<'info, Mint>>,

    /// Receives the payout; created on demand.
    #[account(
        init_if_needed,
        payer = owner,
        associated_token::mint = underlying_mint,
        associated_token::authority = owner,
        associated_token::token_program = token_program,
    )]
    pub owner_token: Box<InterfaceAccount<'info, TokenAccount>>,

    /// Receives the exit fee.
    #[account(
        mut,
        token::mint = underlying_mint,
        constraint = fee_receiver_token.owner == ledger.fee_receiver @ ErrorCode::InvalidFeeReceiver,
    )]
    pub fee_receiver_token: Box<InterfaceAccount<'info, TokenAccount>>,

    pub token_program: Interface<'info, TokenInterface>,

    pub associated_token_program: Program<'info, AssociatedToken>,

    pub system_program: Program<'info, System>,

    pub strategy_pool_program: Program<'info, StrategyPool>,
}

/// Exits stake `stake_id` for the receipt holder.
///
/// Steps:
/// 1) Check the receipt still exists and the caller holds it.
/// 2) Compute fee and payout; exited stakes are refused.
/// 3) If delegated, withdraw the principal from strategies in proportion to
///    the ledger's principal in each.
/// 4) Mark the stake exited and update the ledger aggregates.
/// 5) Pay the fee and the payout from the vault.
/// 6) Burn the receipt.
/// 7) Emit `Exit`.
///
/// # Errors
/// - `StakeNotFound` if the receipt was burned.
/// - `ReceiptNotHeld` if the given token account does not hold the receipt.
/// - `NotOwnerOfStake` if the receipt is held by someone else.
/// - `StakeAlreadyExited`.
/// - `StrategyShortfall` if strategies return less than the principal.
pub fn exit<'info>(
    mut ctx: Context<'_, '_, 'info, 'info, ExitStake<'info>>,
    stake_id: u64,
) -> Result<()> {
    // --- 1) Ownership via the receipt ---
    require!(ctx.accounts.receipt_mint.supply > 0, ErrorCode::StakeNotFound);
    let caller = ctx.accounts.owner.key();
    let receipt = &ctx.accounts.receipt_token;
    ctx.accounts
        .stake_info
        .check_holder(&caller, &receipt.owner, receipt.amount)?;

    // --- 2) Settlement ---
    let settlement = ctx.accounts.ledger.settlement_for(&ctx.accounts.stake_info)?;
    let amount = ctx.accounts.stake_info.amount;

    let ledger_key = ctx.accounts.ledger.key();
    let authority_bump = [ctx.accounts.ledger.authority_bump];
    let signer_seeds: &[&[&[u8]]] = &[&[
        AUTH_SEED.as_bytes(),
        ledger_key.as_ref(),
        &authority_bump,
    ]];

    // --- 3) Recall delegated principal ---
    let was_delegated = settlement.status == StakeStatus::Delegated;
    if was_delegated {
        let registered = ctx.accounts.ledger.registered_strategies();
        let targets = StrategyAccounts::parse(ctx.remaining_accounts, &registered)?;
        let depositor = ctx.accounts.authority.key();
        let balances = targets
            .iter()
            .map(|target| target.principal_of(&depositor))
            .collect::<Result<Vec<u64>>>()?;
        let parts = split_proportional(amount, &balances)?;

        let before = ctx.accounts.vault.amount;
        let cpi = StrategyCpi {
            program: ctx.accounts.strategy_pool_program.to_account_info(),
            depositor: ctx.accounts.authority.to_account_info(),
            depositor_token: ctx.accounts.vault.to_account_info(),
            underlying_mint: ctx.accounts.underlying_mint.to_account_info(),
            token_program: ctx.accounts.token_program.to_account_info(),
        };
        for (target, part) in targets.iter().zip(&parts) {
            cpi.undelegate(target, *part, signer_seeds)?;
        }
        ctx.accounts.vault.reload()?;
        let received = ctx
            .accounts
            .vault
            .amount
            .checked_sub(before)
            .ok_or(ErrorCode::MathOverflow)?;
        require_eq!(received, amount, ErrorCode::StrategyShortfall);
    }

    // --- 4) Book the exit ---
    let accounts = &mut ctx.accounts;
    accounts.ledger.record_exit(&mut accounts.stake_info)?;

    // --- 5) Fee and payout ---
    transfer_from_vault_to_user(
        accounts.authority.to_account_info(),
        accounts.vault.to_account_info(),
        accounts.fee_receiver_token.to_account_info(),
        accounts.underlying_mint.to_account_info(),
        accounts.token_program.to_account_info(),
        settlement.fee,
        accounts.underlying_mint.decimals,
        signer_seeds,
    )?;
    transfer_from_vault_to_user(
        accounts.authority.to_account_info(),
        accounts.vault.to_account_info(),
        accounts.owner_token.to_account_info(),
        accounts.underlying_mint.to_account_info(),
        accounts.token_program.to_account_info(),
        settlement.payout,
        accounts.underlying_mint.decimals,
        signer_seeds,
    )?;

    // --- 6) Burn the receipt ---
    burn_receipt(
        accounts.owner.to_account_info(),
        accounts.receipt_mint.to_account_info(),
        accounts.receipt_token.to_account_info(),
        accounts.token_program.to_account_info(),
    )?;

    emit!(Exit {
        ledger: ledger_key,
        stake_id,
        owner: caller,
        amount,
        fee: settlement.fee,
        payout: settlement.payout,
        was_delegated,
    });
    Ok(())
}
