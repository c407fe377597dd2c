use crate::states::*;
use crate::{AUTH_SEED, LEDGER_VAULT_SEED};
use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

/// Accounts context for `initialize_ledger`.
///
/// Creates the ledger account and its PDA-owned custody vault. The signer
/// becomes admin and first controller.
#[derive(Accounts)]
pub struct InitializeLedger<'info> {
    /// Admin of the new ledger; funds the accounts.
    #[account(mut)]
    pub admin: Signer<'info>,

    /// Fresh ledger account (keypair signer).
    #[account(init, payer = admin, space = Ledger::LEN)]
    pub ledger: Box<Account<'info, Ledger>>,

    /// Owner of the vault, receipt mint authority and strategy depositor.
    ///
    /// CHECK: PDA derivation enforced by seeds; used only as a signer.
    #[account(
        seeds = [AUTH_SEED.as_bytes(), ledger.key().as_ref()],
        bump,
    )]
    pub authority: UncheckedAccount<'info>,

    /// Asset accepted by the ledger.
    pub underlying_mint: Box<InterfaceAccount<'info, Mint>>,

    /// Custody of undelegated principal, exit fees and undistributed rewards.
    #[account(
        init,
        seeds = [LEDGER_VAULT_SEED.as_bytes(), ledger.key().as_ref()],
        bump,
        payer = admin,
        token::mint = underlying_mint,
        token::authority = authority,
        token::token_program = token_program,
    )]
    pub vault: Box<InterfaceAccount<'info, TokenAccount>>,

    pub token_program: Interface<'info, TokenInterface>,

    pub system_program: Program<'info, System>,
}

/// Initializes a ledger.
///
/// # Parameters
/// - `label`: display name, at most `MAX_LABEL_LEN` bytes.
/// - `fee_rate`: exit fee in basis points, at most `FEE_RATE_DENOMINATOR_VALUE`.
/// - `fee_receiver`: wallet whose token account receives exit fees.
///
/// # Errors
/// - `LabelTooLong`, `InvalidFeeRate`.
pub fn initialize_ledger(
    ctx: Context<InitializeLedger>,
    label: String,
    fee_rate: u64,
    fee_receiver: Pubkey,
) -> Result<()> {
    Ledger::validate_config(&label, fee_rate)?;

    let admin = ctx.accounts.admin.key();
    let ledger = &mut ctx.accounts.ledger;
    ledger.authority_bump = ctx.bumps.authority;
    ledger.admin = admin;
    ledger.controllers = vec![admin];
    ledger.label = label;
    ledger.underlying_mint = ctx.accounts.underlying_mint.key();
    ledger.vault = ctx.accounts.vault.key();
    ledger.fee_receiver = fee_receiver;
    ledger.fee_rate = fee_rate;
    msg!("Ledger initialized: {}", ledger.label);

    emit!(LedgerInitialized {
        ledger: ledger.key(),
        admin,
        label: ledger.label.clone(),
        underlying_mint: ledger.underlying_mint,
        vault: ledger.vault,
        fee_receiver,
        fee_rate,
    });
    Ok(())
}
