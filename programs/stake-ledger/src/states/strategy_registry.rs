use super::Ledger;
use crate::error::ErrorCode;
use crate::utils::split_by_shares;
use crate::SHARES_TOTAL;
use anchor_lang::prelude::*;

pub const MAX_STRATEGIES: usize = 8;

/// Strategy known to the ledger.
///
/// Inactive registrations are kept so their principal and rewards can still
/// be withdrawn and collected.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StrategyRegistration {
    pub address: Pubkey,
    /// Eligible for new delegation.
    pub active: bool,
}

impl StrategyRegistration {
    pub const LEN: usize = 32 + 1;
}

impl Ledger {
    /// Registers `address`, or reactivates it if it was removed.
    pub fn add_strategy(&mut self, address: Pubkey) -> Result<()> {
        if let Some(registration) = self
            .strategies
            .iter_mut()
            .find(|registration| registration.address == address)
        {
            require!(!registration.active, ErrorCode::StrategyAlreadyRegistered);
            registration.active = true;
            return Ok(());
        }

        require!(
            self.strategies.len() < MAX_STRATEGIES,
            ErrorCode::StrategyRosterFull
        );
        self.strategies.push(StrategyRegistration {
            address,
            active: true,
        });
        Ok(())
    }

    /// Deactivates `address`. Principal already delegated stays where it is.
    pub fn remove_strategy(&mut self, address: &Pubkey) -> Result<()> {
        match self
            .strategies
            .iter_mut()
            .find(|registration| registration.address == *address && registration.active)
        {
            Some(registration) => {
                registration.active = false;
                Ok(())
            }
            None => {
                msg!("invalid strategy: {}", address);
                err!(ErrorCode::InvalidStrategy)
            }
        }
    }

    pub fn is_active_strategy(&self, address: &Pubkey) -> bool {
        self.strategies
            .iter()
            .any(|registration| registration.address == *address && registration.active)
    }

    /// Every registered strategy, active or not, in registration order.
    pub fn registered_strategies(&self) -> Vec<Pubkey> {
        self.strategies
            .iter()
            .map(|registration| registration.address)
            .collect()
    }

    /// Validates a `delegate_all` request and returns each strategy's allocation.
    ///
    /// Checked in order: array lengths, share sum, undelegated principal,
    /// strategy eligibility.
    pub fn plan_delegation(&self, strategies: &[Pubkey], shares: &[u8]) -> Result<Vec<u64>> {
        require_eq!(strategies.len(), shares.len(), ErrorCode::LengthMismatch);

        let got: u64 = shares.iter().map(|share| u64::from(*share)).sum();
        require_eq!(got, SHARES_TOTAL, ErrorCode::InvalidSharesSum);

        let total = self.balance_by_status.undelegated;
        require!(total > 0, ErrorCode::NothingToDelegate);

        if let Some(address) = strategies
            .iter()
            .find(|address| !self.is_active_strategy(address))
        {
            msg!("invalid strategy: {}", address);
            return err!(ErrorCode::InvalidStrategy);
        }

        split_by_shares(total, shares)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn staked_ledger(amount: u64) -> Ledger {
        let mut ledger = Ledger::default();
        ledger.record_stake(amount).unwrap();
        ledger
    }

    #[test]
    fn remove_then_add_reactivates() {
        let mut ledger = Ledger::default();
        let strategy = Pubkey::new_unique();
        ledger.add_strategy(strategy).unwrap();
        assert_eq!(
            ledger.add_strategy(strategy).unwrap_err(),
            ErrorCode::StrategyAlreadyRegistered.into()
        );

        ledger.remove_strategy(&strategy).unwrap();
        assert!(!ledger.is_active_strategy(&strategy));
        assert_eq!(ledger.registered_strategies(), vec![strategy]);

        ledger.add_strategy(strategy).unwrap();
        assert!(ledger.is_active_strategy(&strategy));
        assert_eq!(ledger.strategies.len(), 1);
    }

    #[test]
    fn remove_unknown_or_inactive_fails() {
        let mut ledger = Ledger::default();
        let strategy = Pubkey::new_unique();
        assert_eq!(
            ledger.remove_strategy(&strategy).unwrap_err(),
            ErrorCode::InvalidStrategy.into()
        );
        ledger.add_strategy(strategy).unwrap();
        ledger.remove_strategy(&strategy).unwrap();
        assert!(ledger.remove_strategy(&strategy).is_err());
    }

    #[test]
    fn registry_is_bounded() {
        let mut ledger = Ledger::default();
        for _ in 0..MAX_STRATEGIES {
            ledger.add_strategy(Pubkey::new_unique()).unwrap();
        }
        assert_eq!(
            ledger.add_strategy(Pubkey::new_unique()).unwrap_err(),
            ErrorCode::StrategyRosterFull.into()
        );
    }

    #[test]
    fn delegation_splits_by_share() {
        let mut ledger = staked_ledger(10);
        let first = Pubkey::new_unique();
        let second = Pubkey::new_unique();
        ledger.add_strategy(first).unwrap();
        ledger.add_strategy(second).unwrap();

        let amounts = ledger.plan_delegation(&[first, second], &[30, 70]).unwrap();
        assert_eq!(amounts, vec![3, 7]);
    }

    #[test]
    fn delegation_remainder_goes_to_last_strategy() {
        let mut ledger = staked_ledger(1_001);
        let strategies: Vec<Pubkey> = (0..3).map(|_| Pubkey::new_unique()).collect();
        for strategy in &strategies {
            ledger.add_strategy(*strategy).unwrap();
        }

        let amounts = ledger.plan_delegation(&strategies, &[33, 33, 34]).unwrap();
        assert_eq!(amounts, vec![330, 330, 341]);
        assert_eq!(amounts.iter().sum::<u64>(), 1_001);
    }

    #[test]
    fn share_sum_is_checked_before_anything_else() {
        let mut ledger = Ledger::default();
        let strategy = Pubkey::new_unique();
        ledger.add_strategy(strategy).unwrap();

        let result = ledger.plan_delegation(&[strategy], &[30]);
        assert_eq!(result.unwrap_err(), ErrorCode::InvalidSharesSum.into());
    }

    #[test]
    fn nothing_to_delegate() {
        let ledger = Ledger::default();
        let result = ledger.plan_delegation(&[Pubkey::new_unique()], &[100]);
        assert_eq!(result.unwrap_err(), ErrorCode::NothingToDelegate.into());
    }

    #[test]
    fn unregistered_or_removed_strategy_is_invalid() {
        let mut ledger = staked_ledger(10);
        let result = ledger.plan_delegation(&[Pubkey::new_unique()], &[100]);
        assert_eq!(result.unwrap_err(), ErrorCode::InvalidStrategy.into());

        let strategy = Pubkey::new_unique();
        ledger.add_strategy(strategy).unwrap();
        ledger.remove_strategy(&strategy).unwrap();
        let result = ledger.plan_delegation(&[strategy], &[100]);
        assert_eq!(result.unwrap_err(), ErrorCode::InvalidStrategy.into());
    }

    #[test]
    fn length_mismatch() {
        let ledger = staked_ledger(10);
        let result = ledger.plan_delegation(&[Pubkey::new_unique()], &[50, 50]);
        assert_eq!(result.unwrap_err(), ErrorCode::LengthMismatch.into());
    }

    #[test]
    fn failed_plan_changes_nothing() {
        let mut ledger = staked_ledger(10);
        let strategy = Pubkey::new_unique();
        ledger.add_strategy(strategy).unwrap();
        let before = ledger.clone();

        assert!(ledger.plan_delegation(&[strategy], &[99]).is_err());
        assert_eq!(ledger.balance_by_status, before.balance_by_status);
        assert_eq!(ledger.epoch_balance, before.epoch_balance);
        assert_eq!(ledger.delegated_before, before.delegated_before);
    }
}
