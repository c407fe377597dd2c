use anchor_lang::prelude::*;

/// Capabilities checked by strategy instructions.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    /// Manages the vault roster.
    Admin,
    /// May delegate, undelegate and collect rewards.
    Vault,
}

/// Single predicate every gated instruction goes through.
pub trait AccessGate {
    fn has_role(&self, role: Role, account: &Pubkey) -> bool;
}
