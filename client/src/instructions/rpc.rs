use anyhow::Result;
use solana_client::rpc_client::RpcClient;
use solana_client::rpc_config::RpcSendTransactionConfig;
use solana_sdk::{
    commitment_config::CommitmentConfig, program_pack::Pack, pubkey::Pubkey,
    signature::Signature, transaction::Transaction,
};

pub fn send_txn(client: &RpcClient, txn: &Transaction, wait_confirm: bool) -> Result<Signature> {
    Ok(client.send_and_confirm_transaction_with_spinner_and_config(
        txn,
        if wait_confirm {
            CommitmentConfig::confirmed()
        } else {
            CommitmentConfig::processed()
        },
        RpcSendTransactionConfig {
            skip_preflight: false,
            ..RpcSendTransactionConfig::default()
        },
    )?)
}

/// Token account holding the single token of `receipt_mint`, with its owner.
pub fn find_receipt_holder(client: &RpcClient, receipt_mint: &Pubkey) -> Result<Option<(Pubkey, Pubkey)>> {
    let Some(holder) = client
        .get_token_largest_accounts(receipt_mint)?
        .into_iter()
        .find(|balance| balance.amount.amount == "1")
    else {
        return Ok(None);
    };
    let holder: Pubkey = holder.address.parse()?;
    let account = client.get_account(&holder)?;
    let owner = spl_token::state::Account::unpack(&account.data)?.owner;
    Ok(Some((holder, owner)))
}
