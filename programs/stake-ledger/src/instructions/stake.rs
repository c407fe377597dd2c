use crate::error::ErrorCode;
use crate::states::*;
use crate::utils::{mint_receipt, transfer_from_user_to_vault};
use crate::{AUTH_SEED, RECEIPT_MINT_SEED};
use anchor_lang::prelude::*;
use anchor_spl::associated_token::AssociatedToken;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

/// Accounts context for `stake`.
///
/// Creates the stake record and its receipt mint, both derived from the id
/// the stake is about to receive, and the recipient's receipt token account.
#[derive(Accounts)]
pub struct CreateStake<'info> {
    /// Staker; pays for the new accounts and funds the stake.
    #[account(mut)]
    pub staker: Signer<'info>,

    /// CHECK: any wallet; only used as the receipt token account authority.
    pub recipient: UncheckedAccount<'info>,

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
        init,
        payer = staker,
        space = StakeInfo::LEN,
        seeds = [
            STAKE_SEED.as_bytes(),
            ledger.key().as_ref(),
            &ledger.next_stake_id.to_le_bytes(),
        ],
        bump,
    )]
    pub stake_info: Box<Account<'info, StakeInfo>>,

    /// Ownership receipt of the new stake.
    #[account(
        init,
        payer = staker,
        seeds = [
            RECEIPT_MINT_SEED.as_bytes(),
            ledger.key().as_ref(),
            &ledger.next_stake_id.to_le_bytes(),
        ],
        bump,
        mint::decimals = 0,
        mint::authority = authority,
        mint::token_program = token_program,
    )]
    pub receipt_mint: Box<InterfaceAccount<'info, Mint>>,

    #[account(
        init,
        payer = staker,
        associated_token::mint = receipt_mint,
        associated_token::authority = recipient,
        associated_token::token_program = token_program,
    )]
    pub recipient_receipt: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(
        mut,
        token::mint = underlying_mint,
        token::authority = staker,
    )]
    pub staker_token: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(mut)]
    pub vault: Box<InterfaceAccount<'info, TokenAccount>>,

    pub underlying_mint: Box<InterfaceAccount<'info, Mint>>,

    pub token_program: Interface<'info, TokenInterface>,

    pub associated_token_program: Program<'info, AssociatedToken>,

    pub system_program: Program<'info, System>,
}

/// Locks `amount` of the underlying asset as a new stake.
///
/// Steps:
/// 1) Book the stake on the ledger (id, epoch quarantine, status totals).
/// 2) Fill the stake record.
/// 3) Transfer `amount` from the staker into the vault.
/// 4) Mint the receipt to the recipient, who owns the stake from then on.
/// 5) Emit `Stake`.
///
/// # Errors
/// - `ZeroAmount` if `amount == 0`.
pub fn stake(ctx: Context<CreateStake>, amount: u64) -> Result<()> {
    let ledger_key = ctx.accounts.ledger.key();
    let (id, epoch) = ctx.accounts.ledger.record_stake(amount)?;

    let stake_info = &mut ctx.accounts.stake_info;
    stake_info.bump = ctx.bumps.stake_info;
    stake_info.ledger = ledger_key;
    stake_info.id = id;
    stake_info.receipt_mint = ctx.accounts.receipt_mint.key();
    stake_info.amount = amount;
    stake_info.epoch = epoch;
    stake_info.status = StakeStatus::Undelegated;

    transfer_from_user_to_vault(
        ctx.accounts.staker.to_account_info(),
        ctx.accounts.staker_token.to_account_info(),
        ctx.accounts.vault.to_account_info(),
        ctx.accounts.underlying_mint.to_account_info(),
        ctx.accounts.token_program.to_account_info(),
        amount,
        ctx.accounts.underlying_mint.decimals,
    )?;

    let authority_bump = [ctx.accounts.ledger.authority_bump];
    let signer_seeds: &[&[&[u8]]] = &[&[
        AUTH_SEED.as_bytes(),
        ledger_key.as_ref(),
        &authority_bump,
    ]];
    mint_receipt(
        ctx.accounts.authority.to_account_info(),
        ctx.accounts.receipt_mint.to_account_info(),
        ctx.accounts.recipient_receipt.to_account_info(),
        ctx.accounts.token_program.to_account_info(),
        signer_seeds,
    )?;

    emit!(Stake {
        ledger: ledger_key,
        stake_id: id,
        staker: ctx.accounts.staker.key(),
        recipient: ctx.accounts.recipient.key(),
        amount,
        epoch,
        receipt_mint: ctx.accounts.receipt_mint.key(),
    });
    Ok(())
}
