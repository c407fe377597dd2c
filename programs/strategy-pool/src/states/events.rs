use anchor_lang::prelude::*;

//
// ──────────────────────────────────────────────────────────────────────────────
// Events: Emitted for off-chain indexers/clients to track strategy state changes
// ──────────────────────────────────────────────────────────────────────────────
//

#[event]
#[cfg_attr(feature = "client", derive(Debug))]
pub struct StrategyInitialized {
    pub strategy: Pubkey,
    pub admin: Pubkey,
    pub underlying_mint: Pubkey,
    pub yield_vault: Pubkey,
}

/// Emitted when a depositor is allowed to move funds through the strategy.
#[event]
#[cfg_attr(feature = "client", derive(Debug))]
pub struct VaultGranted {
    pub strategy: Pubkey,
    pub depositor: Pubkey,
}

#[event]
#[cfg_attr(feature = "client", derive(Debug))]
pub struct VaultRevoked {
    pub strategy: Pubkey,
    pub depositor: Pubkey,
}

/// Emitted after principal is deposited into the yield vault.
#[event]
#[cfg_attr(feature = "client", derive(Debug))]
pub struct Delegated {
    pub strategy: Pubkey,
    pub depositor: Pubkey,
    /// Amount deposited (base units).
    pub amount: u64,
    /// Depositor principal after the deposit.
    pub principal: u64,
    /// Strategy-wide principal after the deposit.
    pub total_principal: u64,
}

/// Emitted after principal is returned to a depositor.
///
/// `withdrawn` can be lower than `requested`: requests above the
/// depositor's principal are clamped.
#[event]
#[cfg_attr(feature = "client", derive(Debug))]
pub struct Undelegated {
    pub strategy: Pubkey,
    pub depositor: Pubkey,
    pub requested: u64,
    pub withdrawn: u64,
    pub principal: u64,
}

/// Emitted after accrued yield is paid out to a depositor.
#[event]
#[cfg_attr(feature = "client", derive(Debug))]
pub struct RewardsCollected {
    pub strategy: Pubkey,
    pub depositor: Pubkey,
    pub requested: u64,
    pub collected: u64,
}

/// Emitted by `accrue` when new yield was absorbed into the index.
#[event]
#[cfg_attr(feature = "client", derive(Debug))]
pub struct Accrued {
    pub strategy: Pubkey,
    /// Yield absorbed by this accrual (base units).
    pub absorbed: u64,
    pub acc_reward_per_share: u128,
    pub timestamp: i64,
}
