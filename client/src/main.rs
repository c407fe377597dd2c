use anyhow::{format_err, Result};
use clap::{Parser, ValueEnum};
use configparser::ini::Ini;
use solana_client::rpc_client::RpcClient;
use solana_sdk::{
    instruction::Instruction,
    pubkey::Pubkey,
    signature::{Keypair, Signer},
    transaction::Transaction,
};
use stake_ledger::states::StakeStatus;
use std::str::FromStr;

mod instructions;
mod views;
use instructions::ledger_instructions::*;
use instructions::rpc::*;
use instructions::strategy_instructions::*;
use instructions::utils::get_ledger_authority_address;

#[derive(Clone, Debug, PartialEq)]
pub struct ClientConfig {
    http_url: String,
    ws_url: String,
    payer_path: String,
    admin_path: String,
    stake_ledger_program: Pubkey,
    strategy_pool_program: Pubkey,
}

fn required(config: &Ini, key: &str) -> Result<String> {
    match config.get("Global", key) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(format_err!("{} must not be empty", key)),
    }
}

fn load_cfg(client_config: &str) -> Result<ClientConfig> {
    let mut config = Ini::new();
    config
        .load(client_config)
        .map_err(|err| format_err!("failed to load {}: {}", client_config, err))?;

    Ok(ClientConfig {
        http_url: required(&config, "http_url")?,
        ws_url: required(&config, "ws_url")?,
        payer_path: required(&config, "payer_path")?,
        admin_path: required(&config, "admin_path")?,
        stake_ledger_program: Pubkey::from_str(&required(&config, "stake_ledger_program")?)?,
        strategy_pool_program: Pubkey::from_str(&required(&config, "strategy_pool_program")?)?,
    })
}

fn read_keypair_file(s: &str) -> Result<Keypair> {
    solana_sdk::signature::read_keypair_file(s)
        .map_err(|_| format_err!("failed to read keypair from {}", s))
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum StatusArg {
    Undelegated,
    Delegated,
    Exited,
}

impl From<StatusArg> for StakeStatus {
    fn from(status: StatusArg) -> Self {
        match status {
            StatusArg::Undelegated => StakeStatus::Undelegated,
            StatusArg::Delegated => StakeStatus::Delegated,
            StatusArg::Exited => StakeStatus::Exited,
        }
    }
}

#[derive(Debug, Parser)]
pub struct Opts {
    #[arg(long, default_value = "client_config.ini")]
    pub config: String,
    #[clap(subcommand)]
    pub command: LedgerCommands,
}

#[derive(Debug, Parser)]
pub enum LedgerCommands {
    InitLedger {
        #[arg(long)]
        underlying_mint: Pubkey,
        #[arg(long)]
        label: String,
        /// Exit fee in basis points.
        #[arg(long, default_value_t = 300)]
        fee_rate: u64,
        #[arg(long)]
        fee_receiver: Pubkey,
    },
    InitStrategy {
        #[arg(long)]
        underlying_mint: Pubkey,
    },
    /// Lets a ledger delegate into a strategy.
    GrantVault {
        #[arg(long)]
        strategy: Pubkey,
        #[arg(long)]
        ledger: Pubkey,
    },
    RevokeVault {
        #[arg(long)]
        strategy: Pubkey,
        #[arg(long)]
        ledger: Pubkey,
    },
    Accrue {
        #[arg(long)]
        strategy: Pubkey,
    },
    SetController {
        #[arg(long)]
        ledger: Pubkey,
        #[arg(long)]
        controller: Pubkey,
        #[arg(long)]
        enabled: bool,
    },
    TransferAdmin {
        #[arg(long)]
        ledger: Pubkey,
        #[arg(long)]
        new_admin: Pubkey,
    },
    Stake {
        #[arg(long)]
        ledger: Pubkey,
        #[arg(long)]
        amount: u64,
        /// Receipt holder; defaults to the payer.
        #[arg(long)]
        recipient: Option<Pubkey>,
    },
    DelegateAll {
        #[arg(long)]
        ledger: Pubkey,
        #[arg(long, value_delimiter = ',')]
        strategies: Vec<Pubkey>,
        #[arg(long, value_delimiter = ',')]
        shares: Vec<u8>,
    },
    AddStrategy {
        #[arg(long)]
        ledger: Pubkey,
        #[arg(long)]
        strategy: Pubkey,
    },
    RemoveStrategy {
        #[arg(long)]
        ledger: Pubkey,
        #[arg(long)]
        strategy: Pubkey,
    },
    AddInitiative {
        #[arg(long)]
        ledger: Pubkey,
        #[arg(long)]
        name: String,
        #[arg(long)]
        beneficiary: Pubkey,
    },
    RemoveInitiative {
        #[arg(long)]
        ledger: Pubkey,
        #[arg(long)]
        id: u64,
    },
    SetShares {
        #[arg(long)]
        ledger: Pubkey,
        #[arg(long, value_delimiter = ',')]
        ids: Vec<u64>,
        #[arg(long, value_delimiter = ',')]
        shares: Vec<u8>,
    },
    Distribute {
        #[arg(long)]
        ledger: Pubkey,
        /// Distribute even when no strategy has rewards to collect.
        #[arg(long)]
        force: bool,
    },
    Rollover {
        #[arg(long)]
        ledger: Pubkey,
    },
    Exit {
        #[arg(long)]
        ledger: Pubkey,
        #[arg(long)]
        stake_id: u64,
    },
    ShowLedger {
        #[arg(long)]
        ledger: Pubkey,
    },
    ShowStake {
        #[arg(long)]
        ledger: Pubkey,
        #[arg(long)]
        stake_id: u64,
    },
    StakesByStatus {
        #[arg(long)]
        ledger: Pubkey,
        #[arg(long, value_enum)]
        status: StatusArg,
    },
    Receipts {
        #[arg(long)]
        ledger: Pubkey,
        #[arg(long)]
        wallet: Pubkey,
    },
    Position {
        #[arg(long)]
        ledger: Pubkey,
        #[arg(long)]
        strategy: Pubkey,
    },
    TotalRewards {
        #[arg(long)]
        ledger: Pubkey,
    },
}

fn send(
    rpc_client: &RpcClient,
    instructions: &[Instruction],
    payer: &Keypair,
    extra_signers: &[&Keypair],
) -> Result<()> {
    let mut signers = vec![payer];
    signers.extend_from_slice(extra_signers);
    let recent_hash = rpc_client.get_latest_blockhash()?;
    let txn = Transaction::new_signed_with_payer(
        instructions,
        Some(&payer.pubkey()),
        &signers,
        recent_hash,
    );
    let signature = send_txn(rpc_client, &txn, true)?;
    println!("{}", signature);
    Ok(())
}

fn main() -> Result<()> {
    let opts = Opts::parse();
    let config = load_cfg(&opts.config)?;
    let payer = read_keypair_file(&config.payer_path)?;
    let admin = read_keypair_file(&config.admin_path)?;
    let rpc_client = RpcClient::new(config.http_url.to_string());

    match opts.command {
        LedgerCommands::InitLedger {
            underlying_mint,
            label,
            fee_rate,
            fee_receiver,
        } => {
            let ledger = Keypair::new();
            let ixs = initialize_ledger_instr(
                &config,
                ledger.pubkey(),
                underlying_mint,
                label,
                fee_rate,
                fee_receiver,
            )?;
            println!("ledger: {}", ledger.pubkey());
            send(&rpc_client, &ixs, &admin, &[&ledger])?;
        }
        LedgerCommands::InitStrategy { underlying_mint } => {
            let strategy = Keypair::new();
            let ixs = initialize_strategy_instr(&config, strategy.pubkey(), underlying_mint)?;
            println!("strategy: {}", strategy.pubkey());
            send(&rpc_client, &ixs, &admin, &[&strategy])?;
        }
        LedgerCommands::GrantVault { strategy, ledger } => {
            let depositor = get_ledger_authority_address(&ledger, &config.stake_ledger_program);
            let ixs = grant_vault_instr(&config, strategy, depositor)?;
            send(&rpc_client, &ixs, &admin, &[])?;
        }
        LedgerCommands::RevokeVault { strategy, ledger } => {
            let depositor = get_ledger_authority_address(&ledger, &config.stake_ledger_program);
            let ixs = revoke_vault_instr(&config, strategy, depositor)?;
            send(&rpc_client, &ixs, &admin, &[])?;
        }
        LedgerCommands::Accrue { strategy } => {
            let ixs = accrue_instr(&config, strategy)?;
            send(&rpc_client, &ixs, &payer, &[])?;
        }
        LedgerCommands::SetController {
            ledger,
            controller,
            enabled,
        } => {
            let ixs = set_controller_instr(&config, ledger, controller, enabled)?;
            send(&rpc_client, &ixs, &admin, &[])?;
        }
        LedgerCommands::TransferAdmin { ledger, new_admin } => {
            let ixs = transfer_admin_instr(&config, ledger, new_admin)?;
            send(&rpc_client, &ixs, &admin, &[])?;
        }
        LedgerCommands::Stake {
            ledger,
            amount,
            recipient,
        } => {
            let ixs = stake_instr(&config, ledger, amount, recipient)?;
            send(&rpc_client, &ixs, &payer, &[])?;
        }
        LedgerCommands::DelegateAll {
            ledger,
            strategies,
            shares,
        } => {
            let ixs = delegate_all_instr(&config, ledger, strategies, shares)?;
            send(&rpc_client, &ixs, &admin, &[])?;
        }
        LedgerCommands::AddStrategy { ledger, strategy } => {
            let ixs = add_strategy_instr(&config, ledger, strategy)?;
            send(&rpc_client, &ixs, &admin, &[])?;
        }
        LedgerCommands::RemoveStrategy { ledger, strategy } => {
            let ixs = remove_strategy_instr(&config, ledger, strategy)?;
            send(&rpc_client, &ixs, &admin, &[])?;
        }
        LedgerCommands::AddInitiative {
            ledger,
            name,
            beneficiary,
        } => {
            let ixs = add_initiative_instr(&config, ledger, name, beneficiary)?;
            send(&rpc_client, &ixs, &admin, &[])?;
        }
        LedgerCommands::RemoveInitiative { ledger, id } => {
            let ixs = remove_initiative_instr(&config, ledger, id)?;
            send(&rpc_client, &ixs, &admin, &[])?;
        }
        LedgerCommands::SetShares {
            ledger,
            ids,
            shares,
        } => {
            let ixs = set_initiatives_shares_instr(&config, ledger, ids, shares)?;
            send(&rpc_client, &ixs, &admin, &[])?;
        }
        LedgerCommands::Distribute { ledger, force } => {
            if !force && views::ledger_total_rewards(&config, ledger)? == 0 {
                println!("no rewards to distribute for {}", ledger);
                return Ok(());
            }
            let ixs = distribute_rewards_instr(&config, ledger)?;
            send(&rpc_client, &ixs, &admin, &[])?;
        }
        LedgerCommands::Rollover { ledger } => {
            let ixs = rollover_epoch_instr(&config, ledger)?;
            send(&rpc_client, &ixs, &admin, &[])?;
        }
        LedgerCommands::Exit { ledger, stake_id } => {
            let ixs = exit_instr(&config, ledger, stake_id)?;
            send(&rpc_client, &ixs, &payer, &[])?;
        }
        LedgerCommands::ShowLedger { ledger } => views::show_ledger(&config, ledger)?,
        LedgerCommands::ShowStake { ledger, stake_id } => {
            views::show_stake(&config, ledger, stake_id)?
        }
        LedgerCommands::StakesByStatus { ledger, status } => {
            views::show_stakes_by_status(&config, ledger, status.into())?
        }
        LedgerCommands::Receipts { ledger, wallet } => {
            views::show_receipts(&config, ledger, wallet)?
        }
        LedgerCommands::Position { ledger, strategy } => {
            views::show_position(&config, ledger, strategy)?
        }
        LedgerCommands::TotalRewards { ledger } => views::show_total_rewards(&config, ledger)?,
    }
    Ok(())
}
