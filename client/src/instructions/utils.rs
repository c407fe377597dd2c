use anchor_client::{Client, Cluster, Program};
use anyhow::Result;
use solana_sdk::{instruction::AccountMeta, pubkey::Pubkey, signature::Keypair};
use stake_ledger::states::STAKE_SEED;
use stake_ledger::{AUTH_SEED, LEDGER_VAULT_SEED, RECEIPT_MINT_SEED};
use strategy_pool::states::DELEGATOR_SEED;
use strategy_pool::{STRATEGY_AUTH_SEED, YIELD_VAULT_SEED};
use std::rc::Rc;

use super::super::{read_keypair_file, ClientConfig};

/// Anchor program handle paying and signing with the keypair at `signer_path`.
pub fn program_for(
    config: &ClientConfig,
    program_id: Pubkey,
    signer_path: &str,
) -> Result<Program<Rc<Keypair>>> {
    let signer = read_keypair_file(signer_path)?;
    let url = Cluster::Custom(config.http_url.clone(), config.ws_url.clone());
    let client = Client::new(url, Rc::new(signer));
    Ok(client.program(program_id)?)
}

pub fn get_ledger_authority_address(ledger: &Pubkey, program_id: &Pubkey) -> Pubkey {
    let (authority, _bump) =
        Pubkey::find_program_address(&[AUTH_SEED.as_bytes(), ledger.as_ref()], program_id);
    authority
}

pub fn get_ledger_vault_address(ledger: &Pubkey, program_id: &Pubkey) -> Pubkey {
    let (vault, _bump) =
        Pubkey::find_program_address(&[LEDGER_VAULT_SEED.as_bytes(), ledger.as_ref()], program_id);
    vault
}

pub fn get_stake_info_address(ledger: &Pubkey, stake_id: u64, program_id: &Pubkey) -> Pubkey {
    let (stake_info, _bump) = Pubkey::find_program_address(
        &[
            STAKE_SEED.as_bytes(),
            ledger.as_ref(),
            &stake_id.to_le_bytes(),
        ],
        program_id,
    );
    stake_info
}

pub fn get_receipt_mint_address(ledger: &Pubkey, stake_id: u64, program_id: &Pubkey) -> Pubkey {
    let (receipt_mint, _bump) = Pubkey::find_program_address(
        &[
            RECEIPT_MINT_SEED.as_bytes(),
            ledger.as_ref(),
            &stake_id.to_le_bytes(),
        ],
        program_id,
    );
    receipt_mint
}

pub fn get_strategy_authority_address(strategy: &Pubkey, program_id: &Pubkey) -> Pubkey {
    let (authority, _bump) = Pubkey::find_program_address(
        &[STRATEGY_AUTH_SEED.as_bytes(), strategy.as_ref()],
        program_id,
    );
    authority
}

pub fn get_yield_vault_address(strategy: &Pubkey, program_id: &Pubkey) -> Pubkey {
    let (yield_vault, _bump) =
        Pubkey::find_program_address(&[YIELD_VAULT_SEED.as_bytes(), strategy.as_ref()], program_id);
    yield_vault
}

pub fn get_delegator_address(strategy: &Pubkey, depositor: &Pubkey, program_id: &Pubkey) -> Pubkey {
    let (delegator, _bump) = Pubkey::find_program_address(
        &[
            DELEGATOR_SEED.as_bytes(),
            strategy.as_ref(),
            depositor.as_ref(),
        ],
        program_id,
    );
    delegator
}

/// Remaining accounts the ledger expects for `strategies`, four per strategy.
pub fn strategy_remaining_accounts(
    strategies: &[Pubkey],
    depositor: &Pubkey,
    strategy_program: &Pubkey,
) -> Vec<AccountMeta> {
    strategies
        .iter()
        .flat_map(|strategy| {
            [
                AccountMeta::new(*strategy, false),
                AccountMeta::new(
                    get_delegator_address(strategy, depositor, strategy_program),
                    false,
                ),
                AccountMeta::new_readonly(
                    get_strategy_authority_address(strategy, strategy_program),
                    false,
                ),
                AccountMeta::new(get_yield_vault_address(strategy, strategy_program), false),
            ]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remaining_accounts_are_grouped_by_strategy() {
        let program = strategy_pool::id();
        let depositor = Pubkey::new_unique();
        let strategies = [Pubkey::new_unique(), Pubkey::new_unique()];

        let metas = strategy_remaining_accounts(&strategies, &depositor, &program);
        assert_eq!(metas.len(), 8);
        assert_eq!(metas[0].pubkey, strategies[0]);
        assert_eq!(metas[4].pubkey, strategies[1]);
        assert_eq!(
            metas[5].pubkey,
            get_delegator_address(&strategies[1], &depositor, &program)
        );
        assert!(!metas[2].is_writable);
        assert!(metas[3].is_writable);
    }

    #[test]
    fn stake_addresses_depend_on_id() {
        let program = stake_ledger::id();
        let ledger = Pubkey::new_unique();
        assert_ne!(
            get_stake_info_address(&ledger, 0, &program),
            get_stake_info_address(&ledger, 1, &program)
        );
        assert_ne!(
            get_stake_info_address(&ledger, 0, &program),
            get_receipt_mint_address(&ledger, 0, &program)
        );
    }
}
