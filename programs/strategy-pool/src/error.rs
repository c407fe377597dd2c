use anchor_lang::prelude::*;

#[error_code]
pub enum ErrorCode {
    #[msg("Signer does not hold the required role")]
    MissingRole,

    #[msg("Invalid yield vault account")]
    InvalidVault,

    #[msg("Token mint does not match the strategy's underlying mint")]
    MintMismatch,

    #[msg("Vault roster is full")]
    VaultRosterFull,

    #[msg("Depositor already holds the vault role")]
    VaultAlreadyGranted,

    #[msg("Depositor does not hold the vault role")]
    VaultNotGranted,

    #[msg("Delegator account belongs to a different strategy or depositor")]
    InvalidDelegator,

    #[msg("Math operation overflowed or underflowed")]
    MathOverflow,
}
