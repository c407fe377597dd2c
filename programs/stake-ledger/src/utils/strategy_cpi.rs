//! Calls into strategy-pool on behalf of the ledger.
//!
//! Strategy accounts arrive through `remaining_accounts`, four per strategy
//! in this order: strategy, delegator position, strategy authority, yield
//! vault. The strategy program re-validates every one of them.

use crate::error::ErrorCode;
use anchor_lang::prelude::*;
use anchor_spl::token_interface::TokenAccount;
use strategy_pool::cpi::accounts::VaultOperation;
use strategy_pool::states::{
    AccessGate as StrategyGate, DelegatorAccount, Role as StrategyRole, Strategy, DELEGATOR_SEED,
};

pub const STRATEGY_ACCOUNTS_LEN: usize = 4;

/// Accounts of one strategy taken from `remaining_accounts`.
pub struct StrategyAccounts<'info> {
    pub strategy: &'info AccountInfo<'info>,
    pub delegator: &'info AccountInfo<'info>,
    pub authority: &'info AccountInfo<'info>,
    pub yield_vault: &'info AccountInfo<'info>,
}

impl<'info> StrategyAccounts<'info> {
    /// Groups `remaining` by strategy and checks it lines up with `expected`.
    pub fn parse(
        remaining: &'info [AccountInfo<'info>],
        expected: &[Pubkey],
    ) -> Result<Vec<StrategyAccounts<'info>>> {
        require_eq!(
            remaining.len(),
            expected.len() * STRATEGY_ACCOUNTS_LEN,
            ErrorCode::InvalidRemainingAccounts
        );

        remaining
            .chunks_exact(STRATEGY_ACCOUNTS_LEN)
            .zip(expected)
            .map(|(group, address)| {
                require_keys_eq!(*group[0].key, *address, ErrorCode::InvalidRemainingAccounts);
                Ok(StrategyAccounts {
                    strategy: &group[0],
                    delegator: &group[1],
                    authority: &group[2],
                    yield_vault: &group[3],
                })
            })
            .collect()
    }

    /// Position of `depositor` in this strategy, `None` if it was never created.
    pub fn position(&self, depositor: &Pubkey) -> Result<Option<DelegatorAccount>> {
        let (expected, _) = Pubkey::find_program_address(
            &[
                DELEGATOR_SEED.as_bytes(),
                self.strategy.key.as_ref(),
                depositor.as_ref(),
            ],
            &strategy_pool::ID,
        );
        require_keys_eq!(
            *self.delegator.key,
            expected,
            ErrorCode::InvalidRemainingAccounts
        );
        if *self.delegator.owner != strategy_pool::ID || self.delegator.data_is_empty() {
            return Ok(None);
        }

        let delegator = Account::<DelegatorAccount>::try_from(self.delegator)?;
        require_keys_eq!(
            delegator.strategy,
            *self.strategy.key,
            ErrorCode::InvalidRemainingAccounts
        );
        require_keys_eq!(
            delegator.depositor,
            *depositor,
            ErrorCode::InvalidRemainingAccounts
        );
        Ok(Some(delegator.into_inner()))
    }

    /// Whether `depositor` holds the vault role on this strategy.
    pub fn grants_vault(&self, depositor: &Pubkey) -> Result<bool> {
        let strategy = Box::new(Account::<Strategy>::try_from(self.strategy)?);
        Ok(strategy.has_role(StrategyRole::Vault, depositor))
    }

    /// Principal `depositor` can recall from this strategy right now.
    ///
    /// Strategies that never granted the depositor, or where its position
    /// was never created, count as holding nothing.
    pub fn principal_of(&self, depositor: &Pubkey) -> Result<u64> {
        if !self.grants_vault(depositor)? {
            return Ok(0);
        }
        Ok(self
            .position(depositor)?
            .map_or(0, |position| position.principal))
    }

    /// Rewards `depositor` could collect from this strategy right now.
    pub fn available_rewards(&self, depositor: &Pubkey) -> Result<u64> {
        let Some(position) = self.position(depositor)? else {
            return Ok(0);
        };
        let strategy = Box::new(Account::<Strategy>::try_from(self.strategy)?);
        require_keys_eq!(
            strategy.yield_vault,
            *self.yield_vault.key,
            ErrorCode::InvalidRemainingAccounts
        );
        let yield_vault = InterfaceAccount::<TokenAccount>::try_from(self.yield_vault)?;
        strategy
            .accrual
            .available_rewards(&position, yield_vault.amount)
    }

    /// Whether rewards can be collected here on behalf of `depositor`.
    pub fn accepts_collect(&self, depositor: &Pubkey) -> Result<bool> {
        Ok(self.grants_vault(depositor)? && self.position(depositor)?.is_some())
    }
}

/// Ledger-side accounts of a vault operation. The ledger authority PDA is the
/// depositor and the ledger vault is the depositor token account.
pub struct StrategyCpi<'info> {
    pub program: AccountInfo<'info>,
    pub depositor: AccountInfo<'info>,
    pub depositor_token: AccountInfo<'info>,
    pub underlying_mint: AccountInfo<'info>,
    pub token_program: AccountInfo<'info>,
}

impl<'info> StrategyCpi<'info> {
    pub fn delegate(
        &self,
        target: &StrategyAccounts<'info>,
        amount: u64,
        signer_seeds: &[&[&[u8]]],
    ) -> Result<()> {
        if amount == 0 {
            return Ok(());
        }
        strategy_pool::cpi::delegate(
            CpiContext::new_with_signer(
                self.program.clone(),
                self.operation(target),
                signer_seeds,
            ),
            amount,
        )
    }

    pub fn undelegate(
        &self,
        target: &StrategyAccounts<'info>,
        amount: u64,
        signer_seeds: &[&[&[u8]]],
    ) -> Result<()> {
        if amount == 0 {
            return Ok(());
        }
        strategy_pool::cpi::undelegate(
            CpiContext::new_with_signer(
                self.program.clone(),
                self.operation(target),
                signer_seeds,
            ),
            amount,
        )
    }

    /// Collects up to `amount` of rewards; the strategy clamps over-requests.
    pub fn collect_rewards(
        &self,
        target: &StrategyAccounts<'info>,
        amount: u64,
        signer_seeds: &[&[&[u8]]],
    ) -> Result<()> {
        strategy_pool::cpi::collect_rewards(
            CpiContext::new_with_signer(
                self.program.clone(),
                self.operation(target),
                signer_seeds,
            ),
            amount,
        )
    }

    fn operation(&self, target: &StrategyAccounts<'info>) -> VaultOperation<'info> {
        VaultOperation {
            depositor: self.depositor.clone(),
            strategy: target.strategy.clone(),
            delegator: target.delegator.clone(),
            authority: target.authority.clone(),
            yield_vault: target.yield_vault.clone(),
            depositor_token: self.depositor_token.clone(),
            underlying_mint: self.underlying_mint.clone(),
            token_program: self.token_program.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anchor_lang::system_program;
    use anchor_spl::token::spl_token;
    use spl_token::solana_program::program_pack::Pack;
    use strategy_pool::states::AccrualState;

    fn account_info(key: Pubkey, owner: Pubkey, data: Vec<u8>) -> AccountInfo<'static> {
        AccountInfo::new(
            Box::leak(Box::new(key)),
            false,
            true,
            Box::leak(Box::new(1_000_000)),
            Box::leak(data.into_boxed_slice()),
            Box::leak(Box::new(owner)),
            false,
            0,
        )
    }

    fn serialized<T: AccountSerialize>(account: &T) -> Vec<u8> {
        let mut data = Vec::new();
        account.try_serialize(&mut data).unwrap();
        data
    }

    fn delegator_address(strategy: &Pubkey, depositor: &Pubkey) -> Pubkey {
        Pubkey::find_program_address(
            &[DELEGATOR_SEED.as_bytes(), strategy.as_ref(), depositor.as_ref()],
            &strategy_pool::ID,
        )
        .0
    }

    fn token_account(key: Pubkey, amount: u64) -> AccountInfo<'static> {
        let mut data = vec![0u8; spl_token::state::Account::LEN];
        spl_token::state::Account {
            mint: Pubkey::new_unique(),
            owner: Pubkey::new_unique(),
            amount,
            state: spl_token::state::AccountState::Initialized,
            ..Default::default()
        }
        .pack_into_slice(&mut data);
        account_info(key, spl_token::ID, data)
    }

    /// Accounts of one strategy; `granted` puts `depositor` on the vault
    /// roster and `principal` creates its position.
    fn strategy_group(
        depositor: &Pubkey,
        granted: bool,
        principal: Option<u64>,
    ) -> &'static [AccountInfo<'static>] {
        strategy_group_with_yield(depositor, granted, principal, 0)
    }

    /// Same as `strategy_group`, with `earned` yield sitting in the vault.
    fn strategy_group_with_yield(
        depositor: &Pubkey,
        granted: bool,
        principal: Option<u64>,
        earned: u64,
    ) -> &'static [AccountInfo<'static>] {
        let strategy_key = Pubkey::new_unique();
        let yield_vault_key = Pubkey::new_unique();
        let principal_held = principal.unwrap_or(0);
        let strategy = Strategy {
            vaults: if granted { vec![*depositor] } else { vec![] },
            yield_vault: yield_vault_key,
            accrual: AccrualState {
                total_principal: principal_held,
                last_tracked_balance: principal_held,
                ..Default::default()
            },
            ..Default::default()
        };
        let delegator_key = delegator_address(&strategy_key, depositor);
        let delegator = match principal {
            Some(principal) => account_info(
                delegator_key,
                strategy_pool::ID,
                serialized(&DelegatorAccount {
                    strategy: strategy_key,
                    depositor: *depositor,
                    principal,
                    ..Default::default()
                }),
            ),
            None => account_info(delegator_key, system_program::ID, vec![]),
        };

        Box::leak(
            vec![
                account_info(strategy_key, strategy_pool::ID, serialized(&strategy)),
                delegator,
                account_info(Pubkey::new_unique(), system_program::ID, vec![]),
                token_account(yield_vault_key, principal_held + earned),
            ]
            .into_boxed_slice(),
        )
    }

    fn parse_one(group: &'static [AccountInfo<'static>]) -> StrategyAccounts<'static> {
        StrategyAccounts::parse(group, &[*group[0].key])
            .unwrap()
            .remove(0)
    }

    #[test]
    fn open_position_reports_principal() {
        let depositor = Pubkey::new_unique();
        let target = parse_one(strategy_group(&depositor, true, Some(700)));

        assert_eq!(target.principal_of(&depositor).unwrap(), 700);
        assert!(target.accepts_collect(&depositor).unwrap());
    }

    #[test]
    fn never_granted_strategy_holds_nothing() {
        let depositor = Pubkey::new_unique();
        let target = parse_one(strategy_group(&depositor, false, None));

        assert!(target.position(&depositor).unwrap().is_none());
        assert_eq!(target.principal_of(&depositor).unwrap(), 0);
        assert!(!target.accepts_collect(&depositor).unwrap());
    }

    #[test]
    fn revoked_strategy_is_skipped() {
        let depositor = Pubkey::new_unique();
        let target = parse_one(strategy_group(&depositor, false, Some(50)));

        assert_eq!(target.principal_of(&depositor).unwrap(), 0);
        assert!(!target.accepts_collect(&depositor).unwrap());
    }

    #[test]
    fn available_rewards_follow_the_yield_vault() {
        let depositor = Pubkey::new_unique();
        let target = parse_one(strategy_group_with_yield(&depositor, true, Some(1_000), 25));
        assert_eq!(target.available_rewards(&depositor).unwrap(), 25);

        let missing = parse_one(strategy_group_with_yield(&depositor, true, None, 25));
        assert_eq!(missing.available_rewards(&depositor).unwrap(), 0);
    }

    #[test]
    fn foreign_position_account_is_rejected() {
        let depositor = Pubkey::new_unique();
        let group = strategy_group(&depositor, true, Some(10));
        let target = parse_one(group);

        let result = target.position(&Pubkey::new_unique());
        assert_eq!(
            result.unwrap_err(),
            ErrorCode::InvalidRemainingAccounts.into()
        );
    }

    #[test]
    fn groups_must_follow_the_registry() {
        let depositor = Pubkey::new_unique();
        let group = strategy_group(&depositor, true, None);

        assert!(StrategyAccounts::parse(group, &[Pubkey::new_unique()]).is_err());
        assert!(StrategyAccounts::parse(group, &[]).is_err());
    }
}
