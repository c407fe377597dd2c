use anchor_lang::prelude::*;

//
// ──────────────────────────────────────────────────────────────────────────────
// Events: Emitted for off-chain indexers/clients to track ledger state changes
// ──────────────────────────────────────────────────────────────────────────────
//

/// Emitted once when a ledger is created, with its fixed configuration.
#[event]
#[cfg_attr(feature = "client", derive(Debug))]
pub struct LedgerInitialized {
    pub ledger: Pubkey,
    pub admin: Pubkey,
    pub label: String,
    pub underlying_mint: Pubkey,
    pub vault: Pubkey,
    pub fee_receiver: Pubkey,
    /// Exit fee in basis points.
    pub fee_rate: u64,
}

#[event]
#[cfg_attr(feature = "client", derive(Debug))]
pub struct ControllerUpdated {
    pub ledger: Pubkey,
    pub controller: Pubkey,
    pub enabled: bool,
}

#[event]
#[cfg_attr(feature = "client", derive(Debug))]
pub struct AdminTransferred {
    pub ledger: Pubkey,
    pub previous_admin: Pubkey,
    pub new_admin: Pubkey,
}

/// Emitted when a user locks principal and receives a stake receipt.
///
/// The stake starts `Undelegated`; a later `StakesDelegated` moves it to
/// delegated through the ledger watermark only.
#[event]
#[cfg_attr(feature = "client", derive(Debug))]
pub struct Stake {
    pub ledger: Pubkey,
    pub stake_id: u64,
    pub staker: Pubkey,
    /// Holder of the receipt, and so the owner of the stake.
    pub recipient: Pubkey,
    /// Principal locked (base units).
    pub amount: u64,
    /// Epoch open at staking time.
    pub epoch: u64,
    pub receipt_mint: Pubkey,
}

/// Emitted when a receipt holder exits a stake.
#[event]
#[cfg_attr(feature = "client", derive(Debug))]
pub struct Exit {
    pub ledger: Pubkey,
    pub stake_id: u64,
    pub owner: Pubkey,
    /// Principal of the stake (base units).
    pub amount: u64,
    /// Fee paid to the fee receiver.
    pub fee: u64,
    /// Amount returned to the owner.
    pub payout: u64,
    /// Whether the principal had to be recalled from strategies.
    pub was_delegated: bool,
}

/// Emitted after all undelegated principal is routed into strategies.
///
/// Stake records are not rewritten: every stake with an id below
/// `delegated_before` that has not exited is delegated from now on, while
/// its stored `status` still reads `Undelegated`.
#[event]
#[cfg_attr(feature = "client", derive(Debug))]
pub struct StakesDelegated {
    pub ledger: Pubkey,
    pub total: u64,
    /// Ledger delegation watermark after this call.
    pub delegated_before: u64,
    pub strategies: Vec<Pubkey>,
    pub amounts: Vec<u64>,
}

#[event]
#[cfg_attr(feature = "client", derive(Debug))]
pub struct StrategyAdded {
    pub ledger: Pubkey,
    pub strategy: Pubkey,
}

#[event]
#[cfg_attr(feature = "client", derive(Debug))]
pub struct StrategyRemoved {
    pub ledger: Pubkey,
    pub strategy: Pubkey,
}

#[event]
#[cfg_attr(feature = "client", derive(Debug))]
pub struct InitiativeAdded {
    pub ledger: Pubkey,
    pub id: u64,
    pub name: String,
    pub beneficiary: Pubkey,
}

#[event]
#[cfg_attr(feature = "client", derive(Debug))]
pub struct InitiativeRemoved {
    pub ledger: Pubkey,
    pub id: u64,
}

#[event]
#[cfg_attr(feature = "client", derive(Debug))]
pub struct InitiativeSharesUpdated {
    pub ledger: Pubkey,
    pub ids: Vec<u64>,
    pub shares: Vec<u8>,
}

/// Emitted after collected strategy rewards are paid out to initiatives.
#[event]
#[cfg_attr(feature = "client", derive(Debug))]
pub struct RewardsDistributed {
    pub ledger: Pubkey,
    /// Rewards collected from strategies by this call.
    pub collected: u64,
    /// Paid to initiatives.
    pub distributed: u64,
    /// Kept for the next distribution.
    pub carried: u64,
}

#[event]
#[cfg_attr(feature = "client", derive(Debug))]
pub struct EpochRolledOver {
    pub ledger: Pubkey,
    /// Epoch opened by the rollover.
    pub epoch: u64,
    pub current_epoch_balance: u64,
}
