use super::{transfer_from_pool_vault_to_user, transfer_from_user_to_pool_vault};
use crate::{error::ErrorCode, instructions::VaultOperation, STRATEGY_AUTH_SEED};
use anchor_lang::prelude::*;

/// Backend a strategy routes principal into.
///
/// The accrual engine only relies on these three operations, so every
/// backend shares the same reward-per-share bookkeeping.
pub trait YieldSource {
    /// Everything the backend currently holds for the strategy, principal
    /// and yield together.
    fn live_balance(&self) -> Result<u64>;

    /// Pulls `amount` from the depositor into the backend.
    fn deposit(&mut self, amount: u64) -> Result<()>;

    /// Pays `amount` from the backend back to the depositor.
    fn withdraw(&mut self, amount: u64) -> Result<()>;
}

/// Backend holding the underlying asset in a PDA-owned token account.
///
/// Yield is anything that lands in the vault beyond what the engine tracked.
pub struct TokenVaultSource<'info> {
    balance: u64,
    strategy: Pubkey,
    authority_bump: u8,
    decimals: u8,
    authority: AccountInfo<'info>,
    yield_vault: AccountInfo<'info>,
    depositor: AccountInfo<'info>,
    depositor_token: AccountInfo<'info>,
    mint: AccountInfo<'info>,
    token_program: AccountInfo<'info>,
}

impl<'info> TokenVaultSource<'info> {
    pub fn new(accounts: &VaultOperation<'info>) -> Self {
        Self {
            balance: accounts.yield_vault.amount,
            strategy: accounts.strategy.key(),
            authority_bump: accounts.strategy.authority_bump,
            decimals: accounts.underlying_mint.decimals,
            authority: accounts.authority.to_account_info(),
            yield_vault: accounts.yield_vault.to_account_info(),
            depositor: accounts.depositor.to_account_info(),
            depositor_token: accounts.depositor_token.to_account_info(),
            mint: accounts.underlying_mint.to_account_info(),
            token_program: accounts.token_program.to_account_info(),
        }
    }
}

impl YieldSource for TokenVaultSource<'_> {
    fn live_balance(&self) -> Result<u64> {
        Ok(self.balance)
    }

    fn deposit(&mut self, amount: u64) -> Result<()> {
        transfer_from_user_to_pool_vault(
            self.depositor.clone(),
            self.depositor_token.clone(),
            self.yield_vault.clone(),
            self.mint.clone(),
            self.token_program.clone(),
            amount,
            self.decimals,
        )?;
        self.balance = self
            .balance
            .checked_add(amount)
            .ok_or(ErrorCode::MathOverflow)?;
        Ok(())
    }

    fn withdraw(&mut self, amount: u64) -> Result<()> {
        transfer_from_pool_vault_to_user(
            self.authority.clone(),
            self.yield_vault.clone(),
            self.depositor_token.clone(),
            self.mint.clone(),
            self.token_program.clone(),
            amount,
            self.decimals,
            &[&[
                STRATEGY_AUTH_SEED.as_bytes(),
                self.strategy.as_ref(),
                &[self.authority_bump],
            ]],
        )?;
        self.balance = self
            .balance
            .checked_sub(amount)
            .ok_or(ErrorCode::MathOverflow)?;
        Ok(())
    }
}

/// In-memory backend; yield is simulated by bumping `balance`.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemorySource {
    pub balance: u64,
}

#[cfg(test)]
impl YieldSource for MemorySource {
    fn live_balance(&self) -> Result<u64> {
        Ok(self.balance)
    }

    fn deposit(&mut self, amount: u64) -> Result<()> {
        self.balance = self
            .balance
            .checked_add(amount)
            .ok_or(ErrorCode::MathOverflow)?;
        Ok(())
    }

    fn withdraw(&mut self, amount: u64) -> Result<()> {
        self.balance = self
            .balance
            .checked_sub(amount)
            .ok_or(ErrorCode::MathOverflow)?;
        Ok(())
    }
}
