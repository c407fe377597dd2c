use super::*;
use crate::error::ErrorCode;
use crate::FEE_RATE_DENOMINATOR_VALUE;
use anchor_lang::prelude::*;

//
// ──────────────────────────────────────────────────────────────────────────────
// Ledger Account
// ──────────────────────────────────────────────────────────────────────────────
//

pub const MAX_LABEL_LEN: usize = 64;
pub const MAX_CONTROLLERS: usize = 8;

/// Per-status tally, used for both balances and counts.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StatusTotals {
    pub undelegated: u64,
    pub delegated: u64,
    pub exited: u64,
}

impl StatusTotals {
    pub const LEN: usize = 8 * 3;

    pub fn get(&self, status: StakeStatus) -> u64 {
        match status {
            StakeStatus::Undelegated => self.undelegated,
            StakeStatus::Delegated => self.delegated,
            StakeStatus::Exited => self.exited,
        }
    }

    fn add(&mut self, status: StakeStatus, value: u64) -> Result<()> {
        let slot = self.slot(status);
        *slot = slot.checked_add(value).ok_or(ErrorCode::MathOverflow)?;
        Ok(())
    }

    fn sub(&mut self, status: StakeStatus, value: u64) -> Result<()> {
        let slot = self.slot(status);
        *slot = slot.checked_sub(value).ok_or(ErrorCode::MathOverflow)?;
        Ok(())
    }

    fn slot(&mut self, status: StakeStatus) -> &mut u64 {
        match status {
            StakeStatus::Undelegated => &mut self.undelegated,
            StakeStatus::Delegated => &mut self.delegated,
            StakeStatus::Exited => &mut self.exited,
        }
    }
}

/// Outcome of exiting one stake.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExitSettlement {
    /// Status the stake had before exiting.
    pub status: StakeStatus,
    /// Fee routed to the fee receiver.
    pub fee: u64,
    /// Principal returned to the owner.
    pub payout: u64,
}

/// The staking vault.
///
/// Owns every stake record of the ledger, the epoch quarantine, the strategy
/// registry and the initiative roster. The authority PDA
/// `AUTH_SEED + ledger` owns `vault`, mints stake receipts and acts as the
/// depositor towards strategies.
#[account]
#[derive(Default, Debug)]
pub struct Ledger {
    /// Bump of the ledger authority PDA.
    pub authority_bump: u8,

    /// Manages the controller roster.
    pub admin: Pubkey,

    /// Accounts allowed to run controller instructions.
    pub controllers: Vec<Pubkey>,

    /// Human readable name, fixed at creation.
    pub label: String,

    /// Asset staked into the ledger, fixed at creation.
    pub underlying_mint: Pubkey,

    /// Custody token account owned by the authority PDA.
    pub vault: Pubkey,

    /// Wallet receiving exit fees, fixed at creation.
    pub fee_receiver: Pubkey,

    /// Exit fee in basis points of `FEE_RATE_DENOMINATOR_VALUE`, fixed at creation.
    pub fee_rate: u64,

    /// Id the next stake will receive.
    pub next_stake_id: u64,

    /// Stakes with a lower id that have not exited are delegated.
    pub delegated_before: u64,

    /// Undelegated principal split by epoch.
    pub epoch_balance: EpochBalance,

    /// Principal per stake status.
    pub balance_by_status: StatusTotals,

    /// Number of stakes per stake status.
    pub count_by_status: StatusTotals,

    pub strategies: Vec<StrategyRegistration>,

    pub initiatives: Vec<Initiative>,

    /// Id the next initiative will receive. Never decreases.
    pub next_initiative_id: u64,

    /// Collected rewards left over by integer division, paid out next time.
    pub undistributed_rewards: u64,
}

impl Ledger {
    /// Fixed serialized size of the account.
    ///
    /// Breakdown:
    /// - 8: account discriminator
    /// - 1: authority bump
    /// - 32: admin
    /// - 4 + 32 * MAX_CONTROLLERS: controllers
    /// - 4 + MAX_LABEL_LEN: label
    /// - 32 * 3: underlying mint, vault, fee receiver
    /// - 8 * 3: fee rate, next stake id, delegation watermark
    /// - EpochBalance::LEN + StatusTotals::LEN * 2: balances and counts
    /// - 4 + StrategyRegistration::LEN * MAX_STRATEGIES: strategy registry
    /// - 4 + Initiative::LEN * MAX_INITIATIVES: initiative roster
    /// - 8 * 2: next initiative id, undistributed rewards
    pub const LEN: usize = 8
        + 1
        + 32
        + 4
        + 32 * MAX_CONTROLLERS
        + 4
        + MAX_LABEL_LEN
        + 32 * 3
        + 8 * 3
        + EpochBalance::LEN
        + StatusTotals::LEN * 2
        + 4
        + StrategyRegistration::LEN * MAX_STRATEGIES
        + 4
        + Initiative::LEN * MAX_INITIATIVES
        + 8 * 2;

    pub fn validate_config(label: &str, fee_rate: u64) -> Result<()> {
        require!(label.len() <= MAX_LABEL_LEN, ErrorCode::LabelTooLong);
        require!(
            fee_rate <= FEE_RATE_DENOMINATOR_VALUE,
            ErrorCode::InvalidFeeRate
        );
        Ok(())
    }

    pub fn set_controller(&mut self, controller: Pubkey, enabled: bool) -> Result<()> {
        let position = self.controllers.iter().position(|c| *c == controller);
        match (position, enabled) {
            (None, true) => {
                require!(
                    self.controllers.len() < MAX_CONTROLLERS,
                    ErrorCode::ControllerRosterFull
                );
                self.controllers.push(controller);
            }
            (Some(index), false) => {
                self.controllers.remove(index);
            }
            _ => {}
        }
        Ok(())
    }

    /// Effective status of a stake of this ledger.
    pub fn status_of(&self, stake: &StakeInfo) -> StakeStatus {
        match stake.status {
            StakeStatus::Exited => StakeStatus::Exited,
            _ if stake.id < self.delegated_before => StakeStatus::Delegated,
            status => status,
        }
    }

    /// Books a new stake of `amount`. Returns its id and epoch.
    pub fn record_stake(&mut self, amount: u64) -> Result<(u64, u64)> {
        require!(amount > 0, ErrorCode::ZeroAmount);

        let id = self.next_stake_id;
        let next_stake_id = id.checked_add(1).ok_or(ErrorCode::MathOverflow)?;

        self.epoch_balance.deposit(amount)?;
        self.balance_by_status
            .add(StakeStatus::Undelegated, amount)?;
        self.count_by_status.add(StakeStatus::Undelegated, 1)?;
        self.next_stake_id = next_stake_id;

        Ok((id, self.epoch_balance.epoch))
    }

    /// Moves every undelegated stake to delegated. Returns the principal moved.
    pub fn apply_delegation(&mut self) -> Result<u64> {
        let total = self.balance_by_status.undelegated;
        let count = self.count_by_status.undelegated;

        self.epoch_balance.drain()?;
        self.balance_by_status.sub(StakeStatus::Undelegated, total)?;
        self.balance_by_status.add(StakeStatus::Delegated, total)?;
        self.count_by_status.sub(StakeStatus::Undelegated, count)?;
        self.count_by_status.add(StakeStatus::Delegated, count)?;
        self.delegated_before = self.next_stake_id;

        Ok(total)
    }

    /// Fee and payout for exiting `stake`, without changing anything.
    pub fn settlement_for(&self, stake: &StakeInfo) -> Result<ExitSettlement> {
        let status = self.status_of(stake);
        require!(status != StakeStatus::Exited, ErrorCode::StakeAlreadyExited);

        let fee = u128::from(stake.amount)
            .checked_mul(u128::from(self.fee_rate))
            .ok_or(ErrorCode::MathOverflow)?
            / u128::from(FEE_RATE_DENOMINATOR_VALUE);
        let fee = u64::try_from(fee).map_err(|_| error!(ErrorCode::MathOverflow))?;
        let payout = stake
            .amount
            .checked_sub(fee)
            .ok_or(ErrorCode::MathOverflow)?;

        Ok(ExitSettlement {
            status,
            fee,
            payout,
        })
    }

    /// Marks `stake` exited and removes it from the live aggregates.
    pub fn record_exit(&mut self, stake: &mut StakeInfo) -> Result<ExitSettlement> {
        let settlement = self.settlement_for(stake)?;

        if settlement.status == StakeStatus::Undelegated {
            self.epoch_balance.withdraw(stake.amount, stake.epoch)?;
        }
        self.balance_by_status.sub(settlement.status, stake.amount)?;
        self.balance_by_status.add(StakeStatus::Exited, stake.amount)?;
        self.count_by_status.sub(settlement.status, 1)?;
        self.count_by_status.add(StakeStatus::Exited, 1)?;
        stake.status = StakeStatus::Exited;

        Ok(settlement)
    }

    pub fn stake_balance_by_status(&self, status: StakeStatus) -> u64 {
        self.balance_by_status.get(status)
    }

    pub fn stake_count_by_status(&self, status: StakeStatus) -> u64 {
        self.count_by_status.get(status)
    }

    /// Ids of the stakes of ledger `address` currently in `status`, ascending.
    pub fn stakes_by_status(
        &self,
        address: &Pubkey,
        stakes: &[StakeInfo],
        status: StakeStatus,
    ) -> Vec<u64> {
        let mut ids: Vec<u64> = stakes
            .iter()
            .filter(|stake| stake.ledger == *address && self.status_of(stake) == status)
            .map(|stake| stake.id)
            .collect();
        ids.sort_unstable();
        ids
    }
}

impl AccessGate for Ledger {
    fn has_role(&self, role: Role, account: &Pubkey) -> bool {
        match role {
            Role::Admin => self.admin == *account,
            Role::Controller => self.controllers.contains(account),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ledger_with_fee(fee_rate: u64) -> Ledger {
        Ledger {
            fee_rate,
            ..Default::default()
        }
    }

    fn stake(ledger: &mut Ledger, address: Pubkey, amount: u64) -> StakeInfo {
        let (id, epoch) = ledger.record_stake(amount).unwrap();
        StakeInfo {
            ledger: address,
            id,
            amount,
            epoch,
            ..Default::default()
        }
    }

    #[test]
    fn stake_ids_are_sequential() {
        let mut ledger = Ledger::default();
        let address = Pubkey::new_unique();
        let first = stake(&mut ledger, address, 10);
        let second = stake(&mut ledger, address, 20);

        assert_eq!((first.id, second.id), (0, 1));
        assert_eq!(ledger.epoch_balance.next_epoch_balance, 30);
        assert_eq!(ledger.stake_balance_by_status(StakeStatus::Undelegated), 30);
        assert_eq!(ledger.stake_count_by_status(StakeStatus::Undelegated), 2);
    }

    #[test]
    fn zero_stake_is_rejected() {
        let mut ledger = Ledger::default();
        let result = ledger.record_stake(0);
        assert_eq!(result.unwrap_err(), ErrorCode::ZeroAmount.into());
        assert_eq!(ledger.next_stake_id, 0);
    }

    #[test]
    fn delegation_flips_only_existing_stakes() {
        let mut ledger = Ledger::default();
        let address = Pubkey::new_unique();
        let early = stake(&mut ledger, address, 10);
        ledger.epoch_balance.rollover().unwrap();
        let other = stake(&mut ledger, address, 5);

        assert_eq!(ledger.apply_delegation().unwrap(), 15);
        let late = stake(&mut ledger, address, 7);

        assert_eq!(ledger.status_of(&early), StakeStatus::Delegated);
        assert_eq!(ledger.status_of(&other), StakeStatus::Delegated);
        assert_eq!(ledger.status_of(&late), StakeStatus::Undelegated);
        assert_eq!(ledger.stake_balance_by_status(StakeStatus::Delegated), 15);
        assert_eq!(ledger.stake_balance_by_status(StakeStatus::Undelegated), 7);
        assert_eq!(ledger.epoch_balance.current_epoch_balance, 0);
        assert_eq!(ledger.epoch_balance.next_epoch_balance, 7);
    }

    #[test]
    fn exit_applies_fee() {
        let mut ledger = ledger_with_fee(300);
        let mut stake_info = stake(&mut ledger, Pubkey::new_unique(), 10_000);

        let settlement = ledger.record_exit(&mut stake_info).unwrap();
        assert_eq!(settlement.fee, 300);
        assert_eq!(settlement.payout, 9_700);
        assert_eq!(settlement.status, StakeStatus::Undelegated);
        assert_eq!(stake_info.status, StakeStatus::Exited);
        assert_eq!(ledger.epoch_balance.total().unwrap(), 0);
        assert_eq!(ledger.stake_balance_by_status(StakeStatus::Exited), 10_000);
    }

    #[test]
    fn exit_of_1000_returns_970() {
        let ledger = ledger_with_fee(300);
        let stake_info = StakeInfo {
            amount: 1_000,
            ..Default::default()
        };
        assert_eq!(ledger.settlement_for(&stake_info).unwrap().payout, 970);
    }

    #[test]
    fn exit_twice_fails() {
        let mut ledger = ledger_with_fee(300);
        let mut stake_info = stake(&mut ledger, Pubkey::new_unique(), 100);
        ledger.record_exit(&mut stake_info).unwrap();

        let result = ledger.record_exit(&mut stake_info);
        assert_eq!(result.unwrap_err(), ErrorCode::StakeAlreadyExited.into());
        assert_eq!(ledger.stake_count_by_status(StakeStatus::Exited), 1);
    }

    #[test]
    fn exit_of_delegated_stake_leaves_epoch_buckets_alone() {
        let mut ledger = ledger_with_fee(0);
        let address = Pubkey::new_unique();
        let mut delegated = stake(&mut ledger, address, 40);
        ledger.apply_delegation().unwrap();
        stake(&mut ledger, address, 8);

        let settlement = ledger.record_exit(&mut delegated).unwrap();
        assert_eq!(settlement.status, StakeStatus::Delegated);
        assert_eq!(settlement.payout, 40);
        assert_eq!(ledger.epoch_balance.next_epoch_balance, 8);
        assert_eq!(ledger.stake_balance_by_status(StakeStatus::Delegated), 0);
        assert_eq!(ledger.status_of(&delegated), StakeStatus::Exited);
    }

    #[test]
    fn exit_after_rollover_uses_current_bucket() {
        let mut ledger = ledger_with_fee(0);
        let address = Pubkey::new_unique();
        let mut old = stake(&mut ledger, address, 10);
        ledger.epoch_balance.rollover().unwrap();
        stake(&mut ledger, address, 3);

        ledger.record_exit(&mut old).unwrap();
        assert_eq!(ledger.epoch_balance.current_epoch_balance, 0);
        assert_eq!(ledger.epoch_balance.next_epoch_balance, 3);
        assert_eq!(
            ledger.epoch_balance.total().unwrap(),
            ledger.stake_balance_by_status(StakeStatus::Undelegated)
        );
    }

    #[test]
    fn stakes_by_status_tracks_transitions() {
        let mut ledger = ledger_with_fee(300);
        let address = Pubkey::new_unique();
        let mut stakes: Vec<StakeInfo> = (0..4).map(|_| stake(&mut ledger, address, 100)).collect();
        ledger.apply_delegation().unwrap();
        stakes.push(stake(&mut ledger, address, 100));
        ledger.record_exit(&mut stakes[1]).unwrap();
        ledger.record_exit(&mut stakes[4]).unwrap();

        let foreign = StakeInfo {
            ledger: Pubkey::new_unique(),
            id: 9,
            ..Default::default()
        };
        stakes.push(foreign);

        assert_eq!(
            ledger.stakes_by_status(&address, &stakes, StakeStatus::Delegated),
            vec![0, 2, 3]
        );
        assert_eq!(
            ledger.stakes_by_status(&address, &stakes, StakeStatus::Exited),
            vec![1, 4]
        );
        assert!(ledger
            .stakes_by_status(&address, &stakes, StakeStatus::Undelegated)
            .is_empty());
        for status in StakeStatus::ALL {
            assert_eq!(
                ledger.stakes_by_status(&address, &stakes, status).len() as u64,
                ledger.stake_count_by_status(status)
            );
        }
    }

    #[test]
    fn config_bounds() {
        assert!(Ledger::validate_config("SDG 1", 300).is_ok());
        assert_eq!(
            Ledger::validate_config("SDG 1", 10_001).unwrap_err(),
            ErrorCode::InvalidFeeRate.into()
        );
        assert_eq!(
            Ledger::validate_config(&"x".repeat(MAX_LABEL_LEN + 1), 0).unwrap_err(),
            ErrorCode::LabelTooLong.into()
        );
    }

    #[test]
    fn controller_roster() {
        let admin = Pubkey::new_unique();
        let controller = Pubkey::new_unique();
        let mut ledger = Ledger {
            admin,
            ..Default::default()
        };

        assert!(ledger.has_role(Role::Admin, &admin));
        assert!(!ledger.has_role(Role::Controller, &controller));

        ledger.set_controller(controller, true).unwrap();
        ledger.set_controller(controller, true).unwrap();
        assert_eq!(ledger.controllers.len(), 1);
        assert!(ledger.has_role(Role::Controller, &controller));

        ledger.set_controller(controller, false).unwrap();
        assert!(!ledger.has_role(Role::Controller, &controller));
    }

    #[test]
    fn controller_roster_is_bounded() {
        let mut ledger = Ledger::default();
        for _ in 0..MAX_CONTROLLERS {
            ledger.set_controller(Pubkey::new_unique(), true).unwrap();
        }
        assert_eq!(
            ledger.set_controller(Pubkey::new_unique(), true).unwrap_err(),
            ErrorCode::ControllerRosterFull.into()
        );
    }

    #[derive(Clone, Debug)]
    enum Op {
        Stake(u64),
        Delegate(u8),
        Exit(usize),
        Rollover,
    }

    fn op() -> impl proptest::strategy::Strategy<Value = Op> {
        prop_oneof![
            (1..1_000_000u64).prop_map(Op::Stake),
            (1..100u8).prop_map(Op::Delegate),
            any::<usize>().prop_map(Op::Exit),
            Just(Op::Rollover),
        ]
    }

    proptest! {
        #[test]
        fn aggregates_follow_every_stake(ops in prop::collection::vec(op(), 1..80)) {
            let address = Pubkey::new_unique();
            let (first, second) = (Pubkey::new_unique(), Pubkey::new_unique());
            let mut ledger = ledger_with_fee(300);
            ledger.add_strategy(first).unwrap();
            ledger.add_strategy(second).unwrap();
            let mut stakes: Vec<StakeInfo> = Vec::new();
            let mut staked = 0u64;

            for op in ops {
                match op {
                    Op::Stake(amount) => {
                        stakes.push(stake(&mut ledger, address, amount));
                        staked += amount;
                    }
                    Op::Delegate(share) => {
                        let undelegated = ledger.stake_balance_by_status(StakeStatus::Undelegated);
                        match ledger.plan_delegation(&[first, second], &[share, 100 - share]) {
                            Ok(amounts) => {
                                prop_assert_eq!(amounts.iter().sum::<u64>(), undelegated);
                                prop_assert_eq!(ledger.apply_delegation().unwrap(), undelegated);
                            }
                            Err(err) => {
                                prop_assert_eq!(undelegated, 0);
                                prop_assert_eq!(err, Error::from(ErrorCode::NothingToDelegate));
                            }
                        }
                    }
                    Op::Exit(pick) => {
                        if stakes.is_empty() {
                            continue;
                        }
                        let index = pick % stakes.len();
                        let exiting = &mut stakes[index];
                        let before = ledger.status_of(exiting);
                        let result = ledger.record_exit(exiting);
                        if before == StakeStatus::Exited {
                            prop_assert!(result.is_err());
                        } else {
                            let settlement = result.unwrap();
                            prop_assert_eq!(settlement.status, before);
                            prop_assert_eq!(settlement.fee + settlement.payout, exiting.amount);
                            prop_assert_eq!(ledger.status_of(exiting), StakeStatus::Exited);
                        }
                    }
                    Op::Rollover => {
                        ledger.epoch_balance.rollover().unwrap();
                    }
                }

                for status in StakeStatus::ALL {
                    let matching = stakes.iter().filter(|stake| ledger.status_of(stake) == status);
                    let (count, balance) = matching
                        .fold((0u64, 0u64), |(count, balance), stake| (count + 1, balance + stake.amount));
                    prop_assert_eq!(ledger.stake_count_by_status(status), count);
                    prop_assert_eq!(ledger.stake_balance_by_status(status), balance);
                }
                let total: u64 = StakeStatus::ALL
                    .iter()
                    .map(|status| ledger.stake_balance_by_status(*status))
                    .sum();
                prop_assert_eq!(total, staked);
                prop_assert_eq!(
                    ledger.epoch_balance.total().unwrap(),
                    ledger.stake_balance_by_status(StakeStatus::Undelegated)
                );
            }
        }
    }
}
