use anchor_lang::prelude::*;

//
// ──────────────────────────────────────────────────────────────────────────────
// DelegatorAccount
// ──────────────────────────────────────────────────────────────────────────────
//

/// PDA seed string used to derive a depositor's position in a strategy.
pub const DELEGATOR_SEED: &str = "delegator";

/// Position of one depositor (a stake ledger) inside one strategy.
///
/// Derived from `DELEGATOR_SEED + strategy + depositor`. Created when the
/// strategy admin grants the depositor the vault role and kept after a
/// revoke, so a re-grant picks the position up again.
#[account]
#[derive(Default, Debug)]
pub struct DelegatorAccount {
    /// PDA bump for this account.
    pub bump: u8,

    /// Strategy this position belongs to.
    pub strategy: Pubkey,

    /// Depositor identity (the signer of vault operations).
    pub depositor: Pubkey,

    /// Principal currently delegated by the depositor.
    pub principal: u64,

    /// Whole units of entitlement already accounted for.
    ///
    /// Signed: a depositor that withdrew all principal but still has
    /// uncollected rewards carries a negative debt.
    pub reward_debt: i128,

    /// Sub-unit part of the debt, in `SCALE` units. Always below `SCALE`.
    pub reward_debt_fraction: u128,
}

impl DelegatorAccount {
    /// Fixed serialized size of the account.
    ///
    /// Breakdown:
    /// - 8: account discriminator
    /// - 1: bump
    /// - 32 * 2: strategy, depositor
    /// - 8: principal
    /// - 16: reward_debt
    /// - 16: reward_debt_fraction
    pub const LEN: usize = 8 + 1 + 32 * 2 + 8 + 16 + 16;
}
