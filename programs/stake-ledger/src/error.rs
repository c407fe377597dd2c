use anchor_lang::prelude::*;

#[error_code]
pub enum ErrorCode {
    #[msg("Signer does not hold the required role")]
    MissingRole,

    #[msg("Amount must be greater than zero")]
    ZeroAmount,

    #[msg("Shares must add up to exactly 100")]
    InvalidSharesSum,

    #[msg("There is no undelegated principal to delegate")]
    NothingToDelegate,

    #[msg("Strategy is not registered or not active")]
    InvalidStrategy,

    #[msg("Caller is not the owner of the stake")]
    NotOwnerOfStake,

    #[msg("Stake receipt does not exist")]
    StakeNotFound,

    #[msg("Token account does not hold the stake receipt")]
    ReceiptNotHeld,

    #[msg("Stake has already exited")]
    StakeAlreadyExited,

    #[msg("Input arrays have different lengths")]
    LengthMismatch,

    #[msg("Strategy is already registered and active")]
    StrategyAlreadyRegistered,

    #[msg("Strategy registry is full")]
    StrategyRosterFull,

    #[msg("Initiative roster is full")]
    InitiativeRosterFull,

    #[msg("Initiative does not exist")]
    InitiativeNotFound,

    #[msg("Initiative shares add up to more than 100")]
    InitiativeSharesOverflow,

    #[msg("Controller roster is full")]
    ControllerRosterFull,

    #[msg("Name is too long")]
    NameTooLong,

    #[msg("Label is too long")]
    LabelTooLong,

    #[msg("Fee rate exceeds the fee denominator")]
    InvalidFeeRate,

    #[msg("Strategies returned less principal than the stake holds")]
    StrategyShortfall,

    #[msg("Remaining accounts do not match the expected strategies or initiatives")]
    InvalidRemainingAccounts,

    #[msg("Beneficiary token account is not owned by the initiative beneficiary")]
    InvalidBeneficiary,

    #[msg("Fee receiver token account is not owned by the fee receiver")]
    InvalidFeeReceiver,

    #[msg("Invalid vault account")]
    InvalidVault,

    #[msg("Token mint does not match the ledger's underlying mint")]
    MintMismatch,

    #[msg("Math operation overflowed or underflowed")]
    MathOverflow,
}
