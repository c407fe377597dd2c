use super::DelegatorAccount;
use crate::{
    error::ErrorCode,
    utils::{mul_div_rem, YieldSource},
    SCALE,
};
use anchor_lang::prelude::*;

//
// ──────────────────────────────────────────────────────────────────────────────
// Accrual engine
// ──────────────────────────────────────────────────────────────────────────────
//

/// Strategy-wide reward-per-share state.
///
/// Yield is detected as the growth of the backend's live balance over
/// `last_tracked_balance`. Every mutating operation first absorbs that
/// growth into `acc_reward_per_share`, so a depositor's entitlement is
/// `principal * acc_reward_per_share / SCALE - reward_debt` without ever
/// walking the depositor set.
///
/// Invariants:
/// - `last_tracked_balance >= total_principal`. The difference is yield
///   already absorbed but not yet collected.
/// - The pending rewards of all depositors, in `SCALE` units, add up to
///   `(last_tracked_balance - total_principal) * SCALE - index_remainder`.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AccrualState {
    /// Principal delegated by all depositors.
    pub total_principal: u64,

    /// Accumulated reward per unit of principal, scaled by `SCALE`.
    pub acc_reward_per_share: u128,

    /// UNIX timestamp (seconds) of the last accrual.
    pub last_accrual_timestamp: i64,

    /// Live balance the index has accounted for.
    pub last_tracked_balance: u64,

    /// Absorbed yield the index could not represent yet, in `SCALE` units.
    /// Added to the next accrual.
    pub index_remainder: u128,
}

impl AccrualState {
    /// Serialized size inside the owning account.
    ///
    /// Breakdown:
    /// - 8: total_principal
    /// - 16: acc_reward_per_share
    /// - 8: last_accrual_timestamp
    /// - 8: last_tracked_balance
    /// - 16: index_remainder
    pub const LEN: usize = 8 + 16 + 8 + 8 + 16;

    /// State an accrual at `live_balance` would produce.
    ///
    /// Surplus observed while no principal is delegated stays untracked and
    /// goes to whoever is delegated at the next accrual.
    pub fn project(&self, live_balance: u64) -> Result<Self> {
        let surplus = live_balance.saturating_sub(self.last_tracked_balance);
        if self.total_principal == 0 || surplus == 0 {
            return Ok(*self);
        }

        let total_principal = u128::from(self.total_principal);
        let scaled = u128::from(surplus)
            .checked_mul(SCALE)
            .and_then(|scaled| scaled.checked_add(self.index_remainder))
            .ok_or(ErrorCode::MathOverflow)?;
        let acc_reward_per_share = self
            .acc_reward_per_share
            .checked_add(scaled / total_principal)
            .ok_or(ErrorCode::MathOverflow)?;

        Ok(Self {
            acc_reward_per_share,
            last_tracked_balance: live_balance,
            index_remainder: scaled % total_principal,
            ..*self
        })
    }

    /// Absorbs new yield into the index. Returns the amount absorbed.
    pub fn accrue(&mut self, live_balance: u64, now: i64) -> Result<u64> {
        let projected = self.project(live_balance)?;
        let absorbed = projected.last_tracked_balance - self.last_tracked_balance;

        *self = Self {
            last_accrual_timestamp: self.last_accrual_timestamp.max(now),
            ..projected
        };
        Ok(absorbed)
    }

    /// Deposits `amount` on behalf of `delegator`.
    ///
    /// Pending rewards are carried over; the new principal only earns yield
    /// observed from now on.
    pub fn delegate<S: YieldSource>(
        &mut self,
        delegator: &mut DelegatorAccount,
        source: &mut S,
        amount: u64,
        now: i64,
    ) -> Result<()> {
        self.accrue(source.live_balance()?, now)?;

        let principal = delegator
            .principal
            .checked_add(amount)
            .ok_or(ErrorCode::MathOverflow)?;
        let total_principal = self
            .total_principal
            .checked_add(amount)
            .ok_or(ErrorCode::MathOverflow)?;
        let last_tracked_balance = self
            .last_tracked_balance
            .checked_add(amount)
            .ok_or(ErrorCode::MathOverflow)?;

        self.rebase(delegator, principal)?;
        self.total_principal = total_principal;
        self.last_tracked_balance = last_tracked_balance;

        source.deposit(amount)
    }

    /// Withdraws up to `amount` of principal. Returns what was withdrawn.
    ///
    /// Requests above the depositor's principal are clamped, not rejected.
    pub fn undelegate<S: YieldSource>(
        &mut self,
        delegator: &mut DelegatorAccount,
        source: &mut S,
        amount: u64,
        now: i64,
    ) -> Result<u64> {
        self.accrue(source.live_balance()?, now)?;

        let withdrawn = amount.min(delegator.principal);
        let total_principal = self
            .total_principal
            .checked_sub(withdrawn)
            .ok_or(ErrorCode::MathOverflow)?;
        let last_tracked_balance = self
            .last_tracked_balance
            .checked_sub(withdrawn)
            .ok_or(ErrorCode::MathOverflow)?;

        self.rebase(delegator, delegator.principal - withdrawn)?;
        self.total_principal = total_principal;
        self.last_tracked_balance = last_tracked_balance;

        source.withdraw(withdrawn)?;
        Ok(withdrawn)
    }

    /// Pays out up to `amount` of the depositor's rewards. Returns what was paid.
    ///
    /// Requests above the available rewards are clamped, not rejected. The
    /// payout is also capped by the yield the pool has absorbed.
    pub fn collect_rewards<S: YieldSource>(
        &mut self,
        delegator: &mut DelegatorAccount,
        source: &mut S,
        amount: u64,
        now: i64,
    ) -> Result<u64> {
        self.accrue(source.live_balance()?, now)?;

        let available = Self::rewards_at(delegator, self.acc_reward_per_share)?;
        let collected = amount.min(available).min(self.unclaimed_rewards());
        let reward_debt = delegator
            .reward_debt
            .checked_add(i128::from(collected))
            .ok_or(ErrorCode::MathOverflow)?;
        let last_tracked_balance = self
            .last_tracked_balance
            .checked_sub(collected)
            .ok_or(ErrorCode::MathOverflow)?;

        delegator.reward_debt = reward_debt;
        self.last_tracked_balance = last_tracked_balance;

        source.withdraw(collected)?;
        Ok(collected)
    }

    /// Rewards `delegator` could collect if the pool accrued at `live_balance`.
    pub fn available_rewards(
        &self,
        delegator: &DelegatorAccount,
        live_balance: u64,
    ) -> Result<u64> {
        let projected = self.project(live_balance)?;
        Self::rewards_at(delegator, projected.acc_reward_per_share)
    }

    /// Yield held by the pool for all depositors together.
    pub fn total_rewards(&self, live_balance: u64) -> u64 {
        live_balance.saturating_sub(self.total_principal)
    }

    /// Absorbed yield that has not been collected yet.
    pub fn unclaimed_rewards(&self) -> u64 {
        self.last_tracked_balance.saturating_sub(self.total_principal)
    }

    /// `principal * acc_reward_per_share / SCALE` as whole units and a
    /// fraction in `SCALE` units.
    fn entitlement(principal: u64, acc_reward_per_share: u128) -> Result<(i128, u128)> {
        let (units, fraction) = mul_div_rem(u128::from(principal), acc_reward_per_share, SCALE)
            .ok_or(ErrorCode::MathOverflow)?;
        let units = i128::try_from(units).map_err(|_| error!(ErrorCode::MathOverflow))?;
        Ok((units, fraction))
    }

    /// `lhs - rhs` on `(units, fraction)` pairs, borrowing across the fraction.
    fn difference(lhs: (i128, u128), rhs: (i128, u128)) -> Result<(i128, u128)> {
        let (borrow, fraction) = if lhs.1 >= rhs.1 {
            (0, lhs.1 - rhs.1)
        } else {
            (1, lhs.1 + SCALE - rhs.1)
        };
        let units = lhs
            .0
            .checked_sub(rhs.0)
            .and_then(|units| units.checked_sub(borrow))
            .ok_or(ErrorCode::MathOverflow)?;
        Ok((units, fraction))
    }

    fn pending_at(delegator: &DelegatorAccount, acc_reward_per_share: u128) -> Result<(i128, u128)> {
        Self::difference(
            Self::entitlement(delegator.principal, acc_reward_per_share)?,
            (delegator.reward_debt, delegator.reward_debt_fraction),
        )
    }

    fn rewards_at(delegator: &DelegatorAccount, acc_reward_per_share: u128) -> Result<u64> {
        let (units, _) = Self::pending_at(delegator, acc_reward_per_share)?;
        Ok(units.clamp(0, i128::from(u64::MAX)) as u64)
    }

    /// Moves `delegator` to `principal` keeping its pending rewards intact,
    /// sub-unit fraction included.
    fn rebase(&self, delegator: &mut DelegatorAccount, principal: u64) -> Result<()> {
        let pending = Self::pending_at(delegator, self.acc_reward_per_share)?;
        let earned = Self::entitlement(principal, self.acc_reward_per_share)?;
        let (reward_debt, reward_debt_fraction) = Self::difference(earned, pending)?;

        delegator.principal = principal;
        delegator.reward_debt = reward_debt;
        delegator.reward_debt_fraction = reward_debt_fraction;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::MemorySource;
    use proptest::prelude::*;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    struct Pool {
        state: AccrualState,
        source: MemorySource,
        delegators: Vec<DelegatorAccount>,
        now: i64,
    }

    impl Pool {
        fn new(depositors: usize) -> Self {
            Self {
                state: AccrualState::default(),
                source: MemorySource::default(),
                delegators: (0..depositors).map(|_| DelegatorAccount::default()).collect(),
                now: 1_700_000_000,
            }
        }

        fn delegate(&mut self, who: usize, amount: u64) {
            self.state
                .delegate(&mut self.delegators[who], &mut self.source, amount, self.now)
                .unwrap();
        }

        fn undelegate(&mut self, who: usize, amount: u64) -> u64 {
            self.state
                .undelegate(&mut self.delegators[who], &mut self.source, amount, self.now)
                .unwrap()
        }

        fn collect(&mut self, who: usize, amount: u64) -> u64 {
            self.state
                .collect_rewards(&mut self.delegators[who], &mut self.source, amount, self.now)
                .unwrap()
        }

        fn earn(&mut self, amount: u64) {
            self.now += 3_600;
            self.source.balance += amount;
        }

        fn available(&self, who: usize) -> u64 {
            self.state
                .available_rewards(&self.delegators[who], self.source.balance)
                .unwrap()
        }

        fn total(&self) -> u64 {
            self.state.total_rewards(self.source.balance)
        }

        fn sum_available(&self) -> u64 {
            (0..self.delegators.len()).map(|who| self.available(who)).sum()
        }
    }

    #[test]
    fn same_instant_deposits_split_proportionally() {
        let mut pool = Pool::new(2);
        pool.delegate(0, 1);
        pool.delegate(1, 2);
        pool.earn(30);

        assert_eq!(pool.available(0), 10);
        assert_eq!(pool.available(1), 20);
        assert_eq!(pool.total(), 30);
    }

    #[test]
    fn uneven_split_stays_within_one_unit_per_extra_depositor() {
        let mut pool = Pool::new(2);
        pool.delegate(0, 1);
        pool.delegate(1, 2);
        pool.earn(10);

        assert_eq!(pool.available(0), 3);
        assert_eq!(pool.available(1), 6);
        assert!(pool.total() - pool.sum_available() <= 1);
    }

    #[test]
    fn late_deposit_does_not_earn_past_yield() {
        let mut pool = Pool::new(2);
        pool.delegate(0, 100);
        pool.earn(50);
        pool.delegate(1, 100);

        assert_eq!(pool.available(0), 50);
        assert_eq!(pool.available(1), 0);

        pool.earn(100);
        assert_eq!(pool.available(0), 100);
        assert_eq!(pool.available(1), 50);
    }

    #[test]
    fn topping_up_keeps_pending_rewards() {
        let mut pool = Pool::new(1);
        pool.delegate(0, 100);
        pool.earn(40);
        pool.delegate(0, 100);

        assert_eq!(pool.available(0), 40);
        assert_eq!(pool.delegators[0].principal, 200);
    }

    #[test]
    fn undelegate_is_clamped_to_principal() {
        let mut pool = Pool::new(1);
        pool.delegate(0, 1_000);

        let withdrawn = pool.undelegate(0, 2_000);
        assert_eq!(withdrawn, 1_000);
        assert_eq!(pool.delegators[0].principal, 0);
        assert_eq!(pool.state.total_principal, 0);
        assert_eq!(pool.source.balance, 0);
    }

    #[test]
    fn undelegate_keeps_rewards_collectable() {
        let mut pool = Pool::new(2);
        pool.delegate(0, 100);
        pool.delegate(1, 100);
        pool.earn(80);

        assert_eq!(pool.undelegate(0, 100), 100);
        assert_eq!(pool.available(0), 40);
        assert_eq!(pool.delegators[0].reward_debt, -40);

        pool.earn(60);
        assert_eq!(pool.available(0), 40);
        assert_eq!(pool.available(1), 100);

        assert_eq!(pool.collect(0, u64::MAX), 40);
        assert_eq!(pool.available(0), 0);
    }

    #[test]
    fn collect_is_clamped_and_never_pays_twice() {
        let mut pool = Pool::new(1);
        pool.delegate(0, 1);
        pool.earn(30);

        assert_eq!(pool.collect(0, 60), 30);
        assert_eq!(pool.collect(0, 60), 0);
        assert_eq!(pool.source.balance, 1);
        assert_eq!(pool.total(), 0);
    }

    #[test]
    fn partial_collect_leaves_the_rest() {
        let mut pool = Pool::new(1);
        pool.delegate(0, 10);
        pool.earn(30);

        assert_eq!(pool.collect(0, 12), 12);
        assert_eq!(pool.available(0), 18);
    }

    #[test]
    fn surplus_without_principal_goes_to_next_depositor() {
        let mut pool = Pool::new(1);
        pool.earn(25);
        pool.delegate(0, 100);

        assert_eq!(pool.state.acc_reward_per_share, 0);
        assert_eq!(pool.available(0), 25);
        assert_eq!(pool.collect(0, u64::MAX), 25);
    }

    #[test]
    fn repeated_accrual_without_growth_is_a_no_op() {
        let mut pool = Pool::new(1);
        pool.delegate(0, 100);
        pool.earn(7);

        let now = pool.now;
        assert_eq!(pool.state.accrue(pool.source.balance, now).unwrap(), 7);
        let snapshot = pool.state;
        assert_eq!(pool.state.accrue(pool.source.balance, now).unwrap(), 0);
        assert_eq!(pool.state, snapshot);
    }

    #[test]
    fn many_small_accruals_never_overstate_rewards() {
        let mut pool = Pool::new(1);
        pool.delegate(0, 3);

        for _ in 0..100 {
            pool.earn(1);
            let now = pool.now;
            pool.state.accrue(pool.source.balance, now).unwrap();
            assert!(pool.available(0) <= pool.total());
        }

        assert_eq!(pool.state.last_tracked_balance, pool.source.balance);
        assert_eq!(
            pool.state.acc_reward_per_share * 3 + pool.state.index_remainder,
            100 * SCALE
        );
        assert_eq!(pool.available(0), 99);
        assert_eq!(pool.collect(0, u64::MAX), 99);
        assert_eq!(pool.available(0), 0);
        assert_eq!(pool.total(), 1);
    }

    #[test]
    fn index_remainder_reaches_depositors_later() {
        let mut pool = Pool::new(1);
        pool.delegate(0, 3);

        pool.earn(1);
        assert_eq!(pool.available(0), 0);
        pool.earn(1);
        assert_eq!(pool.available(0), 1);
        pool.earn(1);
        assert_eq!(pool.available(0), 3);
    }

    #[test]
    fn late_top_up_does_not_claim_sub_unit_rewards_twice() {
        let mut pool = Pool::new(2);
        pool.earn(20);
        pool.delegate(1, 6);
        pool.collect(0, 2);
        pool.delegate(0, 2);
        assert!(pool.sum_available() <= pool.total());

        for _ in 0..50 {
            pool.earn(1);
            pool.delegate(0, 1);
            assert!(pool.sum_available() <= pool.total());
        }
        assert!(pool.total() - pool.sum_available() <= 2);
    }

    #[test]
    fn accrual_timestamp_is_monotonic() {
        let mut state = AccrualState::default();
        state.accrue(0, 100).unwrap();
        state.accrue(0, 50).unwrap();
        assert_eq!(state.last_accrual_timestamp, 100);
    }

    #[test]
    fn projection_matches_accrual() {
        let mut pool = Pool::new(2);
        pool.delegate(0, 3);
        pool.delegate(1, 7);
        pool.earn(1_234);

        let projected = pool.available(1);
        let now = pool.now;
        pool.state.accrue(pool.source.balance, now).unwrap();
        assert_eq!(pool.available(1), projected);
    }

    #[test]
    fn seeded_simulation_never_dips_into_principal() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut pool = Pool::new(4);

        for _ in 0..500 {
            let who = rng.random_range(0..4);
            match rng.random_range(0..4) {
                0 => pool.delegate(who, rng.random_range(1..1_000_000)),
                1 => {
                    pool.undelegate(who, rng.random_range(1..1_000_000));
                }
                2 => {
                    pool.collect(who, rng.random_range(1..1_000_000));
                }
                _ => pool.earn(rng.random_range(0..100_000)),
            }
            assert!(pool.source.balance >= pool.state.total_principal);
            assert!(pool.state.last_tracked_balance >= pool.state.total_principal);
        }

        for who in 0..4 {
            let principal = pool.delegators[who].principal;
            assert_eq!(pool.undelegate(who, u64::MAX), principal);
        }
        assert_eq!(pool.state.total_principal, 0);
    }

    #[derive(Clone, Debug)]
    enum Op {
        Delegate(usize, u64),
        Undelegate(usize, u64),
        Collect(usize, u64),
        Earn(u64),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0..3usize, 1..1_000_000_000u64).prop_map(|(who, amount)| Op::Delegate(who, amount)),
            (0..3usize, 1..2_000_000_000u64).prop_map(|(who, amount)| Op::Undelegate(who, amount)),
            (0..3usize, 1..1_000_000u64).prop_map(|(who, amount)| Op::Collect(who, amount)),
            (0..10_000_000u64).prop_map(Op::Earn),
        ]
    }

    proptest! {
        #[test]
        fn entitlements_add_up_to_total_rewards(ops in prop::collection::vec(op(), 1..60)) {
            let mut pool = Pool::new(3);

            for op in ops {
                match op {
                    Op::Delegate(who, amount) => pool.delegate(who, amount),
                    Op::Undelegate(who, amount) => {
                        let principal = pool.delegators[who].principal;
                        let withdrawn = pool.undelegate(who, amount);
                        prop_assert_eq!(withdrawn, amount.min(principal));
                    }
                    Op::Collect(who, amount) => {
                        let available = pool.available(who);
                        let collected = pool.collect(who, amount);
                        prop_assert!(collected <= amount.min(available));
                    }
                    Op::Earn(amount) => pool.earn(amount),
                }

                let total = pool.total();
                let sum = pool.sum_available();
                prop_assert!(sum <= total, "sum {} exceeds total {}", sum, total);

                // Yield landing while nobody is delegated has no owner yet.
                if pool.state.total_principal == 0 {
                    continue;
                }
                // One floored unit per depositor, plus the index remainder,
                // which stays below one unit while total principal is under SCALE.
                let slack = pool.delegators.len() as u64 + 1;
                prop_assert!(total - sum <= slack, "total {} sum {}", total, sum);
            }
        }
    }
}
