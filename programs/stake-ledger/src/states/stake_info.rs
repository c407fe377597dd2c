use crate::error::ErrorCode;
use anchor_lang::prelude::*;

//
// ──────────────────────────────────────────────────────────────────────────────
// StakeInfo Account
// ──────────────────────────────────────────────────────────────────────────────
//

/// PDA seed string used to derive a stake record: `STAKE_SEED + ledger + id`.
pub const STAKE_SEED: &str = "stake";

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StakeStatus {
    #[default]
    Undelegated,
    Delegated,
    Exited,
}

impl StakeStatus {
    pub const ALL: [StakeStatus; 3] = [
        StakeStatus::Undelegated,
        StakeStatus::Delegated,
        StakeStatus::Exited,
    ];
}

/// One locked deposit.
///
/// The owner is whoever holds the single token of `receipt_mint`; it is not
/// stored here. The stored status is only ever `Undelegated` or `Exited`:
/// delegation is tracked by the ledger's watermark, so readers of the raw
/// account must resolve it through `Ledger::status_of`.
#[account]
#[derive(Default, Debug)]
pub struct StakeInfo {
    /// PDA bump for this account.
    pub bump: u8,

    /// Ledger the stake belongs to.
    pub ledger: Pubkey,

    /// Sequential id within the ledger, starting at 0.
    pub id: u64,

    /// Mint of the ownership receipt (supply 1, 0 decimals).
    pub receipt_mint: Pubkey,

    /// Principal locked by the stake.
    pub amount: u64,

    /// Epoch open at staking time.
    pub epoch: u64,

    pub status: StakeStatus,
}

impl StakeInfo {
    /// Fixed serialized size of the account.
    ///
    /// Breakdown:
    /// - 8: account discriminator
    /// - 1: bump
    /// - 32 * 2: ledger, receipt mint
    /// - 8 * 3: id, amount, epoch
    /// - 1: status
    pub const LEN: usize = 8 + 1 + 32 * 2 + 8 * 3 + 1;

    /// Checks that `caller` holds the receipt, given the owner and balance
    /// of the token account presented as its holder.
    pub fn check_holder(&self, caller: &Pubkey, holder: &Pubkey, held: u64) -> Result<()> {
        require_eq!(held, 1, ErrorCode::ReceiptNotHeld);
        if holder != caller {
            msg!(
                "caller {} is not the owner {} of stake {}",
                caller,
                holder,
                self.id
            );
            return err!(ErrorCode::NotOwnerOfStake);
        }
        Ok(())
    }
}
