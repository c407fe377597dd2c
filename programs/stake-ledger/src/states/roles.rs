use anchor_lang::prelude::*;

/// Capabilities checked by ledger instructions.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    /// Manages the controller roster.
    Admin,
    /// Runs delegation, registries, distribution and epoch rollover.
    Controller,
}

pub trait AccessGate {
    fn has_role(&self, role: Role, account: &Pubkey) -> bool;
}
