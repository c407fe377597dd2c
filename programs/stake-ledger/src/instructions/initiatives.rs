use crate::error::ErrorCode;
use crate::states::*;
use anchor_lang::prelude::*;

/// Controller-gated ledger update with no token movement.
#[derive(Accounts)]
pub struct LedgerControl<'info> {
    #[account(
        constraint = ledger.has_role(Role::Controller, &controller.key()) @ ErrorCode::MissingRole
    )]
    pub controller: Signer<'info>,

    #[account(mut)]
    pub ledger: Box<Account<'info, Ledger>>,
}

/// Appends an initiative with a zero share.
pub fn add_initiative(ctx: Context<LedgerControl>, name: String, beneficiary: Pubkey) -> Result<()> {
    require_keys_neq!(beneficiary, Pubkey::default(), ErrorCode::InvalidBeneficiary);

    let ledger = &mut ctx.accounts.ledger;
    let id = ledger.add_initiative(name.clone(), beneficiary)?;
    msg!("initiative {} added: {}", id, name);

    emit!(InitiativeAdded {
        ledger: ledger.key(),
        id,
        name,
        beneficiary,
    });
    Ok(())
}

pub fn remove_initiative(ctx: Context<LedgerControl>, id: u64) -> Result<()> {
    let ledger = &mut ctx.accounts.ledger;
    ledger.remove_initiative(id)?;

    emit!(InitiativeRemoved {
        ledger: ledger.key(),
        id,
    });
    Ok(())
}

/// Overwrites the shares of the listed initiatives.
///
/// The total is not bounded here; `distribute_rewards` refuses to run while
/// the shares add up to more than 100.
pub fn set_initiatives_shares(
    ctx: Context<LedgerControl>,
    ids: Vec<u64>,
    shares: Vec<u8>,
) -> Result<()> {
    let ledger = &mut ctx.accounts.ledger;
    ledger.set_initiatives_shares(&ids, &shares)?;

    emit!(InitiativeSharesUpdated {
        ledger: ledger.key(),
        ids,
        shares,
    });
    Ok(())
}
