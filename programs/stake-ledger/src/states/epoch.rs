use crate::error::ErrorCode;
use anchor_lang::prelude::*;

/// Undelegated principal split by epoch.
///
/// Principal staked during epoch `e` sits in `next_epoch_balance` until the
/// rollover that opens epoch `e + 1`, so it never competes with principal
/// already present in the current epoch. Together the two buckets always
/// equal the ledger's undelegated aggregate.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EpochBalance {
    /// Epoch currently open for deposits.
    pub epoch: u64,
    pub current_epoch_balance: u64,
    pub next_epoch_balance: u64,
}

impl EpochBalance {
    pub const LEN: usize = 8 * 3;

    pub fn deposit(&mut self, amount: u64) -> Result<()> {
        self.next_epoch_balance = self
            .next_epoch_balance
            .checked_add(amount)
            .ok_or(ErrorCode::MathOverflow)?;
        Ok(())
    }

    /// Removes an undelegated stake staked during `staked_epoch`.
    pub fn withdraw(&mut self, amount: u64, staked_epoch: u64) -> Result<()> {
        let bucket = if staked_epoch == self.epoch {
            &mut self.next_epoch_balance
        } else {
            &mut self.current_epoch_balance
        };
        *bucket = bucket.checked_sub(amount).ok_or(ErrorCode::MathOverflow)?;
        Ok(())
    }

    /// Promotes quarantined principal and opens the following epoch.
    pub fn rollover(&mut self) -> Result<u64> {
        self.current_epoch_balance = self
            .current_epoch_balance
            .checked_add(self.next_epoch_balance)
            .ok_or(ErrorCode::MathOverflow)?;
        self.next_epoch_balance = 0;
        self.epoch = self.epoch.checked_add(1).ok_or(ErrorCode::MathOverflow)?;
        Ok(self.epoch)
    }

    /// Empties both buckets, returning what they held.
    pub fn drain(&mut self) -> Result<u64> {
        let total = self.total()?;
        self.current_epoch_balance = 0;
        self.next_epoch_balance = 0;
        Ok(total)
    }

    pub fn total(&self) -> Result<u64> {
        self.current_epoch_balance
            .checked_add(self.next_epoch_balance)
            .ok_or(error!(ErrorCode::MathOverflow))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deposits_wait_for_rollover() {
        let mut balance = EpochBalance::default();
        balance.deposit(10).unwrap();
        assert_eq!(balance.current_epoch_balance, 0);
        assert_eq!(balance.next_epoch_balance, 10);

        assert_eq!(balance.rollover().unwrap(), 1);
        balance.deposit(5).unwrap();
        assert_eq!(balance.current_epoch_balance, 10);
        assert_eq!(balance.next_epoch_balance, 5);
        assert_eq!(balance.total().unwrap(), 15);
    }

    #[test]
    fn withdraw_hits_the_bucket_of_the_staking_epoch() {
        let mut balance = EpochBalance::default();
        balance.deposit(10).unwrap();
        balance.rollover().unwrap();
        balance.deposit(4).unwrap();

        balance.withdraw(4, 1).unwrap();
        assert_eq!(balance.next_epoch_balance, 0);
        balance.withdraw(10, 0).unwrap();
        assert_eq!(balance.current_epoch_balance, 0);
    }

    #[test]
    fn withdraw_more_than_bucket_fails() {
        let mut balance = EpochBalance::default();
        balance.deposit(3).unwrap();
        assert!(balance.withdraw(4, 0).is_err());
        assert_eq!(balance.next_epoch_balance, 3);
    }

    #[test]
    fn drain_empties_both_buckets() {
        let mut balance = EpochBalance::default();
        balance.deposit(7).unwrap();
        balance.rollover().unwrap();
        balance.deposit(2).unwrap();

        assert_eq!(balance.drain().unwrap(), 9);
        assert_eq!(balance.total().unwrap(), 0);
        assert_eq!(balance.epoch, 1);
    }
}
