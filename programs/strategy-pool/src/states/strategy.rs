use super::{AccessGate, AccrualState, Role};
use crate::error::ErrorCode;
use anchor_lang::prelude::*;

//
// ──────────────────────────────────────────────────────────────────────────────
// Strategy Account
// ──────────────────────────────────────────────────────────────────────────────
//

/// Maximum number of depositors holding the vault role at once.
pub const MAX_VAULTS: usize = 32;

/// A yield strategy: one underlying mint, one yield vault, many depositors.
///
/// Every depositor's entitlement is derived from `accrual`; the strategy
/// never iterates over depositors.
#[account]
#[derive(Default, Debug)]
pub struct Strategy {
    /// Bump of the authority PDA that owns `yield_vault`.
    pub authority_bump: u8,

    /// Manages the vault roster.
    pub admin: Pubkey,

    /// Asset accepted and paid out by this strategy.
    pub underlying_mint: Pubkey,

    /// Token account whose balance is the strategy's live balance.
    pub yield_vault: Pubkey,

    /// Depositors holding the vault role.
    pub vaults: Vec<Pubkey>,

    /// Reward-per-share bookkeeping.
    pub accrual: AccrualState,
}

impl Strategy {
    /// Fixed serialized size of the account.
    ///
    /// Breakdown:
    /// - 8: account discriminator
    /// - 1: authority bump
    /// - 32 * 3: admin, underlying mint, yield vault
    /// - 4 + 32 * MAX_VAULTS: vault roster
    /// - AccrualState::LEN: accrual state
    pub const LEN: usize = 8 + 1 + 32 * 3 + 4 + 32 * MAX_VAULTS + AccrualState::LEN;

    pub fn grant_vault(&mut self, depositor: Pubkey) -> Result<()> {
        require!(
            !self.vaults.contains(&depositor),
            ErrorCode::VaultAlreadyGranted
        );
        require!(self.vaults.len() < MAX_VAULTS, ErrorCode::VaultRosterFull);
        self.vaults.push(depositor);
        Ok(())
    }

    pub fn revoke_vault(&mut self, depositor: &Pubkey) -> Result<()> {
        let index = self
            .vaults
            .iter()
            .position(|vault| vault == depositor)
            .ok_or(error!(ErrorCode::VaultNotGranted))?;
        self.vaults.remove(index);
        Ok(())
    }
}

impl AccessGate for Strategy {
    fn has_role(&self, role: Role, account: &Pubkey) -> bool {
        match role {
            Role::Admin => self.admin == *account,
            Role::Vault => self.vaults.contains(account),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_follow_roster() {
        let admin = Pubkey::new_unique();
        let ledger = Pubkey::new_unique();
        let mut strategy = Strategy {
            admin,
            ..Default::default()
        };

        assert!(strategy.has_role(Role::Admin, &admin));
        assert!(!strategy.has_role(Role::Vault, &ledger));

        strategy.grant_vault(ledger).unwrap();
        assert!(strategy.has_role(Role::Vault, &ledger));
        assert!(!strategy.has_role(Role::Admin, &ledger));

        strategy.revoke_vault(&ledger).unwrap();
        assert!(!strategy.has_role(Role::Vault, &ledger));
    }

    #[test]
    fn grant_twice_fails() {
        let ledger = Pubkey::new_unique();
        let mut strategy = Strategy::default();
        strategy.grant_vault(ledger).unwrap();

        let result = strategy.grant_vault(ledger);
        assert_eq!(result.unwrap_err(), ErrorCode::VaultAlreadyGranted.into());
    }

    #[test]
    fn roster_is_bounded() {
        let mut strategy = Strategy::default();
        for _ in 0..MAX_VAULTS {
            strategy.grant_vault(Pubkey::new_unique()).unwrap();
        }
        let result = strategy.grant_vault(Pubkey::new_unique());
        assert_eq!(result.unwrap_err(), ErrorCode::VaultRosterFull.into());
    }

    #[test]
    fn revoke_unknown_fails() {
        let mut strategy = Strategy::default();
        let result = strategy.revoke_vault(&Pubkey::new_unique());
        assert_eq!(result.unwrap_err(), ErrorCode::VaultNotGranted.into());
    }
}
