use crate::error::ErrorCode;
use crate::states::*;
use anchor_lang::prelude::*;

#[derive(Accounts)]
pub struct LedgerAdmin<'info> {
    #[account(
        constraint = ledger.has_role(Role::Admin, &admin.key()) @ ErrorCode::MissingRole
    )]
    pub admin: Signer<'info>,

    #[account(mut)]
    pub ledger: Box<Account<'info, Ledger>>,
}

/// Grants (`enabled = true`) or revokes the controller role.
pub fn set_controller(ctx: Context<LedgerAdmin>, controller: Pubkey, enabled: bool) -> Result<()> {
    let ledger = &mut ctx.accounts.ledger;
    ledger.set_controller(controller, enabled)?;

    emit!(ControllerUpdated {
        ledger: ledger.key(),
        controller,
        enabled,
    });
    Ok(())
}

/// Hands the admin role to `new_admin`. The controller roster is untouched.
pub fn transfer_admin(ctx: Context<LedgerAdmin>, new_admin: Pubkey) -> Result<()> {
    require_keys_neq!(new_admin, Pubkey::default());

    let ledger = &mut ctx.accounts.ledger;
    let previous_admin = ledger.admin;
    ledger.admin = new_admin;

    emit!(AdminTransferred {
        ledger: ledger.key(),
        previous_admin,
        new_admin,
    });
    Ok(())
}
