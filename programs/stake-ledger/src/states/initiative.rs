use super::Ledger;
use crate::error::ErrorCode;
use crate::utils::share_of;
use crate::SHARES_TOTAL;
use anchor_lang::prelude::*;

pub const MAX_INITIATIVES: usize = 17;
pub const MAX_INITIATIVE_NAME_LEN: usize = 64;

/// Beneficiary of distributed rewards.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct Initiative {
    /// Never reused, even after removal.
    pub id: u64,
    pub name: String,
    /// Wallet whose token account receives the payouts.
    pub beneficiary: Pubkey,
    /// Percentage of each distribution.
    pub share: u8,
}

impl Initiative {
    /// Breakdown: id, name (4 + MAX_INITIATIVE_NAME_LEN), beneficiary, share.
    pub const LEN: usize = 8 + 4 + MAX_INITIATIVE_NAME_LEN + 32 + 1;
}

/// Payouts of one `distribute_rewards` call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Distribution {
    /// Carried rewards plus newly collected rewards.
    pub total: u64,
    /// Payout per initiative, in roster order.
    pub payouts: Vec<u64>,
    /// Kept in custody for the next distribution.
    pub leftover: u64,
}

impl Ledger {
    /// Appends an initiative with a zero share. Returns its id.
    pub fn add_initiative(&mut self, name: String, beneficiary: Pubkey) -> Result<u64> {
        require!(
            name.len() <= MAX_INITIATIVE_NAME_LEN,
            ErrorCode::NameTooLong
        );
        require!(
            self.initiatives.len() < MAX_INITIATIVES,
            ErrorCode::InitiativeRosterFull
        );

        let id = self.next_initiative_id;
        self.next_initiative_id = id.checked_add(1).ok_or(ErrorCode::MathOverflow)?;
        self.initiatives.push(Initiative {
            id,
            name,
            beneficiary,
            share: 0,
        });
        Ok(id)
    }

    /// Removes initiative `id`, keeping the order of the others.
    pub fn remove_initiative(&mut self, id: u64) -> Result<Initiative> {
        let index = self.initiative_index(id)?;
        Ok(self.initiatives.remove(index))
    }

    /// Overwrites the share of every listed initiative.
    ///
    /// Either every listed id exists and all shares are written, or nothing is.
    pub fn set_initiatives_shares(&mut self, ids: &[u64], shares: &[u8]) -> Result<()> {
        require_eq!(ids.len(), shares.len(), ErrorCode::LengthMismatch);
        let indexes = ids
            .iter()
            .map(|id| self.initiative_index(*id))
            .collect::<Result<Vec<usize>>>()?;

        for (index, share) in indexes.into_iter().zip(shares) {
            self.initiatives[index].share = *share;
        }
        Ok(())
    }

    /// Splits carried plus `collected` rewards across the roster.
    pub fn plan_distribution(&self, collected: u64) -> Result<Distribution> {
        let assigned: u64 = self
            .initiatives
            .iter()
            .map(|initiative| u64::from(initiative.share))
            .sum();
        if assigned > SHARES_TOTAL {
            msg!("initiative shares add up to {}", assigned);
            return err!(ErrorCode::InitiativeSharesOverflow);
        }

        let total = self
            .undistributed_rewards
            .checked_add(collected)
            .ok_or(ErrorCode::MathOverflow)?;
        let payouts = self
            .initiatives
            .iter()
            .map(|initiative| share_of(total, initiative.share))
            .collect::<Result<Vec<u64>>>()?;
        let leftover = total
            .checked_sub(payouts.iter().sum())
            .ok_or(ErrorCode::MathOverflow)?;

        Ok(Distribution {
            total,
            payouts,
            leftover,
        })
    }

    fn initiative_index(&self, id: u64) -> Result<usize> {
        self.initiatives
            .iter()
            .position(|initiative| initiative.id == id)
            .ok_or_else(|| {
                msg!("initiative {} not found", id);
                error!(ErrorCode::InitiativeNotFound)
            })
    }
}
