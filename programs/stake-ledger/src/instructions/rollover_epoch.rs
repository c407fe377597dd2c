use super::LedgerControl;
use crate::states::*;
use anchor_lang::prelude::*;

/// Closes the current epoch: stakes of the closing epoch join the pool of
/// previous-epoch principal.
pub fn rollover_epoch(ctx: Context<LedgerControl>) -> Result<()> {
    let ledger = &mut ctx.accounts.ledger;
    let epoch = ledger.epoch_balance.rollover()?;
    msg!("epoch {} opened", epoch);

    emit!(EpochRolledOver {
        ledger: ledger.key(),
        epoch,
        current_epoch_balance: ledger.epoch_balance.current_epoch_balance,
    });
    Ok(())
}
