use anchor_client::Program;
use anyhow::Result;
use solana_sdk::{
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
    signature::Keypair,
    system_program,
};
use spl_associated_token_account::{
    get_associated_token_address, instruction::create_associated_token_account_idempotent,
};
use std::rc::Rc;

use stake_ledger::accounts as ledger_accounts;
use stake_ledger::instruction as ledger_instructions;
use stake_ledger::states::{Ledger, StakeInfo, StakeStatus};

use crate::instructions::rpc::find_receipt_holder;
use crate::instructions::utils::{
    get_ledger_authority_address, get_ledger_vault_address, get_receipt_mint_address,
    get_stake_info_address, program_for, strategy_remaining_accounts,
};

use super::super::ClientConfig;

fn ledger_program(config: &ClientConfig, signer_path: &str) -> Result<Program<Rc<Keypair>>> {
    program_for(config, config.stake_ledger_program, signer_path)
}

pub fn initialize_ledger_instr(
    config: &ClientConfig,
    ledger: Pubkey,
    underlying_mint: Pubkey,
    label: String,
    fee_rate: u64,
    fee_receiver: Pubkey,
) -> Result<Vec<Instruction>> {
    let program = ledger_program(config, &config.admin_path)?;
    let instructions = program
        .request()
        .accounts(ledger_accounts::InitializeLedger {
            admin: program.payer(),
            ledger,
            authority: get_ledger_authority_address(&ledger, &program.id()),
            underlying_mint,
            vault: get_ledger_vault_address(&ledger, &program.id()),
            token_program: spl_token::id(),
            system_program: system_program::id(),
        })
        .args(ledger_instructions::InitializeLedger {
            label,
            fee_rate,
            fee_receiver,
        })
        .instructions()?;
    Ok(instructions)
}

pub fn set_controller_instr(
    config: &ClientConfig,
    ledger: Pubkey,
    controller: Pubkey,
    enabled: bool,
) -> Result<Vec<Instruction>> {
    let program = ledger_program(config, &config.admin_path)?;
    let instructions = program
        .request()
        .accounts(ledger_accounts::LedgerAdmin {
            admin: program.payer(),
            ledger,
        })
        .args(ledger_instructions::SetController {
            controller,
            enabled,
        })
        .instructions()?;
    Ok(instructions)
}

pub fn transfer_admin_instr(
    config: &ClientConfig,
    ledger: Pubkey,
    new_admin: Pubkey,
) -> Result<Vec<Instruction>> {
    let program = ledger_program(config, &config.admin_path)?;
    let instructions = program
        .request()
        .accounts(ledger_accounts::LedgerAdmin {
            admin: program.payer(),
            ledger,
        })
        .args(ledger_instructions::TransferAdmin { new_admin })
        .instructions()?;
    Ok(instructions)
}

/// Stakes `amount` from the payer; the receipt goes to `recipient`, the payer
/// by default. The stake receives the ledger's next id.
pub fn stake_instr(
    config: &ClientConfig,
    ledger: Pubkey,
    amount: u64,
    recipient: Option<Pubkey>,
) -> Result<Vec<Instruction>> {
    let program = ledger_program(config, &config.payer_path)?;
    let ledger_state: Ledger = program.account(ledger)?;
    let stake_id = ledger_state.next_stake_id;
    let receipt_mint = get_receipt_mint_address(&ledger, stake_id, &program.id());
    let staker = program.payer();
    let recipient = recipient.unwrap_or(staker);

    let instructions = program
        .request()
        .accounts(ledger_accounts::CreateStake {
            staker,
            recipient,
            ledger,
            authority: get_ledger_authority_address(&ledger, &program.id()),
            stake_info: get_stake_info_address(&ledger, stake_id, &program.id()),
            receipt_mint,
            recipient_receipt: get_associated_token_address(&recipient, &receipt_mint),
            staker_token: get_associated_token_address(&staker, &ledger_state.underlying_mint),
            vault: ledger_state.vault,
            underlying_mint: ledger_state.underlying_mint,
            token_program: spl_token::id(),
            associated_token_program: spl_associated_token_account::id(),
            system_program: system_program::id(),
        })
        .args(ledger_instructions::Stake { amount })
        .instructions()?;
    Ok(instructions)
}

pub fn delegate_all_instr(
    config: &ClientConfig,
    ledger: Pubkey,
    strategies: Vec<Pubkey>,
    shares: Vec<u8>,
) -> Result<Vec<Instruction>> {
    let program = ledger_program(config, &config.admin_path)?;
    let ledger_state: Ledger = program.account(ledger)?;
    let authority = get_ledger_authority_address(&ledger, &program.id());
    let remaining_accounts =
        strategy_remaining_accounts(&strategies, &authority, &config.strategy_pool_program);

    let instructions = program
        .request()
        .accounts(ledger_accounts::DelegateAll {
            controller: program.payer(),
            ledger,
            authority,
            vault: ledger_state.vault,
            underlying_mint: ledger_state.underlying_mint,
            token_program: spl_token::id(),
            strategy_pool_program: config.strategy_pool_program,
        })
        .accounts(remaining_accounts)
        .args(ledger_instructions::DelegateAll { strategies, shares })
        .instructions()?;
    Ok(instructions)
}

pub fn add_strategy_instr(
    config: &ClientConfig,
    ledger: Pubkey,
    strategy: Pubkey,
) -> Result<Vec<Instruction>> {
    let program = ledger_program(config, &config.admin_path)?;
    let instructions = program
        .request()
        .accounts(ledger_accounts::AddStrategy {
            controller: program.payer(),
            ledger,
            strategy,
        })
        .args(ledger_instructions::AddStrategy {})
        .instructions()?;
    Ok(instructions)
}

pub fn remove_strategy_instr(
    config: &ClientConfig,
    ledger: Pubkey,
    strategy: Pubkey,
) -> Result<Vec<Instruction>> {
    let program = ledger_program(config, &config.admin_path)?;
    let instructions = program
        .request()
        .accounts(ledger_accounts::LedgerControl {
            controller: program.payer(),
            ledger,
        })
        .args(ledger_instructions::RemoveStrategy { strategy })
        .instructions()?;
    Ok(instructions)
}

pub fn add_initiative_instr(
    config: &ClientConfig,
    ledger: Pubkey,
    name: String,
    beneficiary: Pubkey,
) -> Result<Vec<Instruction>> {
    let program = ledger_program(config, &config.admin_path)?;
    let instructions = program
        .request()
        .accounts(ledger_accounts::LedgerControl {
            controller: program.payer(),
            ledger,
        })
        .args(ledger_instructions::AddInitiative { name, beneficiary })
        .instructions()?;
    Ok(instructions)
}

pub fn remove_initiative_instr(
    config: &ClientConfig,
    ledger: Pubkey,
    id: u64,
) -> Result<Vec<Instruction>> {
    let program = ledger_program(config, &config.admin_path)?;
    let instructions = program
        .request()
        .accounts(ledger_accounts::LedgerControl {
            controller: program.payer(),
            ledger,
        })
        .args(ledger_instructions::RemoveInitiative { id })
        .instructions()?;
    Ok(instructions)
}

pub fn set_initiatives_shares_instr(
    config: &ClientConfig,
    ledger: Pubkey,
    ids: Vec<u64>,
    shares: Vec<u8>,
) -> Result<Vec<Instruction>> {
    let program = ledger_program(config, &config.admin_path)?;
    let instructions = program
        .request()
        .accounts(ledger_accounts::LedgerControl {
            controller: program.payer(),
            ledger,
        })
        .args(ledger_instructions::SetInitiativesShares { ids, shares })
        .instructions()?;
    Ok(instructions)
}

/// Collects strategy rewards and pays the initiatives.
///
/// Beneficiary token accounts are created first when missing.
pub fn distribute_rewards_instr(config: &ClientConfig, ledger: Pubkey) -> Result<Vec<Instruction>> {
    let program = ledger_program(config, &config.admin_path)?;
    let ledger_state: Ledger = program.account(ledger)?;
    let authority = get_ledger_authority_address(&ledger, &program.id());
    let payer = program.payer();

    let mut instructions: Vec<Instruction> = ledger_state
        .initiatives
        .iter()
        .map(|initiative| {
            create_associated_token_account_idempotent(
                &payer,
                &initiative.beneficiary,
                &ledger_state.underlying_mint,
                &spl_token::id(),
            )
        })
        .collect();

    let mut remaining_accounts = strategy_remaining_accounts(
        &ledger_state.registered_strategies(),
        &authority,
        &config.strategy_pool_program,
    );
    remaining_accounts.extend(ledger_state.initiatives.iter().map(|initiative| {
        AccountMeta::new(
            get_associated_token_address(&initiative.beneficiary, &ledger_state.underlying_mint),
            false,
        )
    }));

    let distribute_ix = program
        .request()
        .accounts(ledger_accounts::DistributeRewards {
            controller: payer,
            ledger,
            authority,
            vault: ledger_state.vault,
            underlying_mint: ledger_state.underlying_mint,
            token_program: spl_token::id(),
            strategy_pool_program: config.strategy_pool_program,
        })
        .accounts(remaining_accounts)
        .args(ledger_instructions::DistributeRewards {})
        .instructions()?;
    instructions.extend(distribute_ix);
    Ok(instructions)
}

pub fn rollover_epoch_instr(config: &ClientConfig, ledger: Pubkey) -> Result<Vec<Instruction>> {
    let program = ledger_program(config, &config.admin_path)?;
    let instructions = program
        .request()
        .accounts(ledger_accounts::LedgerControl {
            controller: program.payer(),
            ledger,
        })
        .args(ledger_instructions::RolloverEpoch {})
        .instructions()?;
    Ok(instructions)
}

/// Exits `stake_id` for the payer, who must hold its receipt. The receipt is
/// looked up wherever it sits, so a foreign holder is reported by the program.
pub fn exit_instr(config: &ClientConfig, ledger: Pubkey, stake_id: u64) -> Result<Vec<Instruction>> {
    let program = ledger_program(config, &config.payer_path)?;
    let ledger_state: Ledger = program.account(ledger)?;
    let stake_info = get_stake_info_address(&ledger, stake_id, &program.id());
    let stake: StakeInfo = program.account(stake_info)?;
    let authority = get_ledger_authority_address(&ledger, &program.id());
    let owner = program.payer();
    let receipt_token = find_receipt_holder(&program.rpc(), &stake.receipt_mint)?
        .map(|(holder, _)| holder)
        .unwrap_or_else(|| get_associated_token_address(&owner, &stake.receipt_mint));

    let fee_receiver_token =
        get_associated_token_address(&ledger_state.fee_receiver, &ledger_state.underlying_mint);
    let mut instructions = vec![create_associated_token_account_idempotent(
        &owner,
        &ledger_state.fee_receiver,
        &ledger_state.underlying_mint,
        &spl_token::id(),
    )];

    let remaining_accounts = if ledger_state.status_of(&stake) == StakeStatus::Delegated {
        strategy_remaining_accounts(
            &ledger_state.registered_strategies(),
            &authority,
            &config.strategy_pool_program,
        )
    } else {
        Vec::new()
    };

    let exit_ix = program
        .request()
        .accounts(ledger_accounts::ExitStake {
            owner,
            ledger,
            authority,
            stake_info,
            receipt_mint: stake.receipt_mint,
            receipt_token,
            vault: ledger_state.vault,
            underlying_mint: ledger_state.underlying_mint,
            owner_token: get_associated_token_address(&owner, &ledger_state.underlying_mint),
            fee_receiver_token,
            token_program: spl_token::id(),
            associated_token_program: spl_associated_token_account::id(),
            system_program: system_program::id(),
            strategy_pool_program: config.strategy_pool_program,
        })
        .accounts(remaining_accounts)
        .args(ledger_instructions::Exit { stake_id })
        .instructions()?;
    instructions.extend(exit_ix);
    Ok(instructions)
}
