use anyhow::Result;
use solana_sdk::{instruction::Instruction, pubkey::Pubkey, system_program};

use strategy_pool::accounts as strategy_accounts;
use strategy_pool::instruction as strategy_instructions;

use crate::instructions::utils::{
    get_delegator_address, get_strategy_authority_address, get_yield_vault_address, program_for,
};

use super::super::ClientConfig;

pub fn initialize_strategy_instr(
    config: &ClientConfig,
    strategy: Pubkey,
    underlying_mint: Pubkey,
) -> Result<Vec<Instruction>> {
    let program = program_for(config, config.strategy_pool_program, &config.admin_path)?;
    let instructions = program
        .request()
        .accounts(strategy_accounts::InitializeStrategy {
            admin: program.payer(),
            strategy,
            authority: get_strategy_authority_address(&strategy, &program.id()),
            underlying_mint,
            yield_vault: get_yield_vault_address(&strategy, &program.id()),
            token_program: spl_token::id(),
            system_program: system_program::id(),
        })
        .args(strategy_instructions::InitializeStrategy {})
        .instructions()?;
    Ok(instructions)
}

/// Grants the vault role to `depositor`, normally a ledger authority PDA.
pub fn grant_vault_instr(
    config: &ClientConfig,
    strategy: Pubkey,
    depositor: Pubkey,
) -> Result<Vec<Instruction>> {
    let program = program_for(config, config.strategy_pool_program, &config.admin_path)?;
    let instructions = program
        .request()
        .accounts(strategy_accounts::GrantVault {
            admin: program.payer(),
            strategy,
            depositor,
            delegator: get_delegator_address(&strategy, &depositor, &program.id()),
            system_program: system_program::id(),
        })
        .args(strategy_instructions::GrantVault {})
        .instructions()?;
    Ok(instructions)
}

pub fn revoke_vault_instr(
    config: &ClientConfig,
    strategy: Pubkey,
    depositor: Pubkey,
) -> Result<Vec<Instruction>> {
    let program = program_for(config, config.strategy_pool_program, &config.admin_path)?;
    let instructions = program
        .request()
        .accounts(strategy_accounts::RevokeVault {
            admin: program.payer(),
            strategy,
            depositor,
        })
        .args(strategy_instructions::RevokeVault {})
        .instructions()?;
    Ok(instructions)
}

pub fn accrue_instr(config: &ClientConfig, strategy: Pubkey) -> Result<Vec<Instruction>> {
    let program = program_for(config, config.strategy_pool_program, &config.payer_path)?;
    let instructions = program
        .request()
        .accounts(strategy_accounts::AccrueStrategy {
            strategy,
            yield_vault: get_yield_vault_address(&strategy, &program.id()),
        })
        .args(strategy_instructions::Accrue {})
        .instructions()?;
    Ok(instructions)
}
