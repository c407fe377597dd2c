//! Read-only queries printed as JSON.

use anyhow::{format_err, Result};
use colorful::Colorful;
use serde_json::json;
use solana_client::rpc_filter::{Memcmp, RpcFilterType};
use solana_sdk::{program_pack::Pack, pubkey::Pubkey};
use spl_associated_token_account::get_associated_token_address;
use stake_ledger::states::{Ledger, StakeInfo, StakeStatus};
use strategy_pool::states::{DelegatorAccount, Strategy};

use crate::instructions::rpc::find_receipt_holder;
use crate::instructions::utils::{
    get_delegator_address, get_ledger_authority_address, get_stake_info_address, program_for,
};
use crate::ClientConfig;

/// Offset of `StakeInfo::ledger`: discriminator and bump.
const STAKE_LEDGER_OFFSET: usize = 8 + 1;

fn print_view(title: &str, value: serde_json::Value) -> Result<()> {
    println!("{}", title.blue().bold());
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

fn status_name(status: StakeStatus) -> &'static str {
    match status {
        StakeStatus::Undelegated => "undelegated",
        StakeStatus::Delegated => "delegated",
        StakeStatus::Exited => "exited",
    }
}

fn ledger_stakes(config: &ClientConfig, ledger: &Pubkey) -> Result<Vec<StakeInfo>> {
    let program = program_for(config, config.stake_ledger_program, &config.payer_path)?;
    let stakes = program.accounts::<StakeInfo>(vec![RpcFilterType::Memcmp(
        Memcmp::new_raw_bytes(STAKE_LEDGER_OFFSET, ledger.to_bytes().to_vec()),
    )])?;
    Ok(stakes.into_iter().map(|(_, stake)| stake).collect())
}

pub fn show_ledger(config: &ClientConfig, ledger: Pubkey) -> Result<()> {
    let program = program_for(config, config.stake_ledger_program, &config.payer_path)?;
    let state: Ledger = program.account(ledger)?;

    let by_status = |totals: fn(&Ledger, StakeStatus) -> u64| {
        StakeStatus::ALL
            .iter()
            .map(|status| (status_name(*status).to_string(), json!(totals(&state, *status))))
            .collect::<serde_json::Map<String, serde_json::Value>>()
    };

    print_view(
        "Ledger",
        json!({
            "address": ledger.to_string(),
            "label": state.label,
            "admin": state.admin.to_string(),
            "controllers": state.controllers.iter().map(|c| c.to_string()).collect::<Vec<_>>(),
            "underlying_mint": state.underlying_mint.to_string(),
            "vault": state.vault.to_string(),
            "fee_receiver": state.fee_receiver.to_string(),
            "fee_rate_bps": state.fee_rate,
            "next_stake_id": state.next_stake_id,
            "epoch": state.epoch_balance.epoch,
            "current_epoch_balance": state.epoch_balance.current_epoch_balance,
            "next_epoch_balance": state.epoch_balance.next_epoch_balance,
            "balance_by_status": by_status(Ledger::stake_balance_by_status),
            "count_by_status": by_status(Ledger::stake_count_by_status),
            "undistributed_rewards": state.undistributed_rewards,
            "strategies": state.strategies.iter().map(|s| json!({
                "address": s.address.to_string(),
                "active": s.active,
            })).collect::<Vec<_>>(),
            "initiatives": state.initiatives.iter().map(|i| json!({
                "id": i.id,
                "name": i.name,
                "beneficiary": i.beneficiary.to_string(),
                "share": i.share,
            })).collect::<Vec<_>>(),
        }),
    )
}

/// Prints one stake, including the current holder of its receipt.
pub fn show_stake(config: &ClientConfig, ledger: Pubkey, stake_id: u64) -> Result<()> {
    let program = program_for(config, config.stake_ledger_program, &config.payer_path)?;
    let state: Ledger = program.account(ledger)?;
    let stake: StakeInfo =
        program.account(get_stake_info_address(&ledger, stake_id, &program.id()))?;

    let owner = find_receipt_holder(&program.rpc(), &stake.receipt_mint)?.map(|(_, owner)| owner);

    print_view(
        &format!("Stake {}", stake_id),
        json!({
            "id": stake.id,
            "amount": stake.amount,
            "epoch": stake.epoch,
            "status": status_name(state.status_of(&stake)),
            "receipt_mint": stake.receipt_mint.to_string(),
            "owner": owner.map(|owner| owner.to_string()),
        }),
    )
}

pub fn show_stakes_by_status(config: &ClientConfig, ledger: Pubkey, status: StakeStatus) -> Result<()> {
    let program = program_for(config, config.stake_ledger_program, &config.payer_path)?;
    let state: Ledger = program.account(ledger)?;
    let stakes = ledger_stakes(config, &ledger)?;

    print_view(
        &format!("Stakes {}", status_name(status)),
        json!(state.stakes_by_status(&ledger, &stakes, status)),
    )
}

/// Ids of the stakes whose receipt sits in `wallet`'s associated token account.
pub fn show_receipts(config: &ClientConfig, ledger: Pubkey, wallet: Pubkey) -> Result<()> {
    let program = program_for(config, config.stake_ledger_program, &config.payer_path)?;
    let mut stakes = ledger_stakes(config, &ledger)?;
    stakes.sort_unstable_by_key(|stake| stake.id);

    let addresses: Vec<Pubkey> = stakes
        .iter()
        .map(|stake| get_associated_token_address(&wallet, &stake.receipt_mint))
        .collect();
    let rpc = program.rpc();
    let mut owned = Vec::new();
    for (chunk_stakes, chunk_addresses) in stakes.chunks(100).zip(addresses.chunks(100)) {
        let accounts = rpc.get_multiple_accounts(chunk_addresses)?;
        for (stake, account) in chunk_stakes.iter().zip(accounts) {
            if let Some(account) = account {
                if spl_token::state::Account::unpack(&account.data)?.amount == 1 {
                    owned.push(stake.id);
                }
            }
        }
    }

    print_view(&format!("Receipts of {}", wallet), json!(owned))
}

/// Principal and rewards of `ledger` in `strategy`, as of the live vault balance.
pub fn show_position(config: &ClientConfig, ledger: Pubkey, strategy: Pubkey) -> Result<()> {
    let program = program_for(config, config.strategy_pool_program, &config.payer_path)?;
    let depositor = get_ledger_authority_address(&ledger, &config.stake_ledger_program);
    let strategy_state: Strategy = program.account(strategy)?;
    let delegator: DelegatorAccount =
        program.account(get_delegator_address(&strategy, &depositor, &program.id()))?;
    let vault = program.rpc().get_account(&strategy_state.yield_vault)?;
    let live_balance = spl_token::state::Account::unpack(&vault.data)?.amount;

    let available = strategy_state
        .accrual
        .available_rewards(&delegator, live_balance)
        .map_err(|err| format_err!("failed to project rewards: {}", err))?;

    print_view(
        "Strategy position",
        json!({
            "strategy": strategy.to_string(),
            "depositor": depositor.to_string(),
            "balance": delegator.principal,
            "available_rewards": available,
            "total_principal": strategy_state.accrual.total_principal,
            "total_rewards": strategy_state.accrual.total_rewards(live_balance),
            "acc_reward_per_share": strategy_state.accrual.acc_reward_per_share.to_string(),
        }),
    )
}

/// Rewards `ledger` could collect from every registered strategy right now.
pub fn ledger_total_rewards(config: &ClientConfig, ledger: Pubkey) -> Result<u64> {
    let ledger_program = program_for(config, config.stake_ledger_program, &config.payer_path)?;
    let state: Ledger = ledger_program.account(ledger)?;
    let program = program_for(config, config.strategy_pool_program, &config.payer_path)?;
    let depositor = get_ledger_authority_address(&ledger, &config.stake_ledger_program);
    let rpc = program.rpc();

    let mut total = 0u64;
    for strategy in state.registered_strategies() {
        let delegator_address = get_delegator_address(&strategy, &depositor, &program.id());
        if rpc.get_account(&delegator_address).is_err() {
            continue;
        }
        let delegator: DelegatorAccount = program.account(delegator_address)?;
        let strategy_state: Strategy = program.account(strategy)?;
        let vault = rpc.get_account(&strategy_state.yield_vault)?;
        let live_balance = spl_token::state::Account::unpack(&vault.data)?.amount;
        let available = strategy_state
            .accrual
            .available_rewards(&delegator, live_balance)
            .map_err(|err| format_err!("failed to project rewards: {}", err))?;
        total = total.saturating_add(available);
    }
    Ok(total)
}

pub fn show_total_rewards(config: &ClientConfig, ledger: Pubkey) -> Result<()> {
    let total = ledger_total_rewards(config, ledger)?;
    print_view(
        "Ledger rewards",
        json!({
            "ledger": ledger.to_string(),
            "total_rewards": total,
        }),
    )
}
