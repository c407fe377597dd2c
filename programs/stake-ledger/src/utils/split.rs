//! Integer splitting of an amount across shares or balances.

use crate::{error::ErrorCode, SHARES_TOTAL};
use anchor_lang::prelude::*;

/// `total * share / SHARES_TOTAL`, rounded down.
pub fn share_of(total: u64, share: u8) -> Result<u64> {
    let part = u128::from(total)
        .checked_mul(u128::from(share))
        .ok_or(ErrorCode::MathOverflow)?
        / u128::from(SHARES_TOTAL);
    u64::try_from(part).map_err(|_| error!(ErrorCode::MathOverflow))
}

/// Splits `total` by percentage shares.
///
/// Every part is rounded down and the last part absorbs the rounding
/// remainder, so the parts always add up to `total` when the shares add up
/// to `SHARES_TOTAL`.
pub fn split_by_shares(total: u64, shares: &[u8]) -> Result<Vec<u64>> {
    let mut parts = shares
        .iter()
        .map(|share| share_of(total, *share))
        .collect::<Result<Vec<u64>>>()?;

    let assigned = parts
        .iter()
        .try_fold(0u64, |sum, part| sum.checked_add(*part))
        .ok_or(ErrorCode::MathOverflow)?;
    if let Some(last) = parts.last_mut() {
        let remainder = total.checked_sub(assigned).ok_or(ErrorCode::MathOverflow)?;
        *last = last.checked_add(remainder).ok_or(ErrorCode::MathOverflow)?;
    }
    Ok(parts)
}

/// Splits `amount` in proportion to `balances` without exceeding any balance.
///
/// Parts are rounded down first; the remainder is then handed out in order
/// to entries that still have room.
pub fn split_proportional(amount: u64, balances: &[u64]) -> Result<Vec<u64>> {
    let total: u128 = balances.iter().map(|balance| u128::from(*balance)).sum();
    require!(u128::from(amount) <= total, ErrorCode::StrategyShortfall);
    if amount == 0 {
        return Ok(vec![0; balances.len()]);
    }

    let mut parts = balances
        .iter()
        .map(|balance| {
            // amount <= total, so every part fits in the balance it came from
            (u128::from(amount) * u128::from(*balance) / total) as u64
        })
        .collect::<Vec<u64>>();

    let mut remainder = amount - parts.iter().sum::<u64>();
    for (part, balance) in parts.iter_mut().zip(balances) {
        if remainder == 0 {
            break;
        }
        let extra = remainder.min(balance - *part);
        *part += extra;
        remainder -= extra;
    }
    Ok(parts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck::{quickcheck, TestResult};

    /// Turns arbitrary cut points into shares adding up to 100.
    fn shares_from_cuts(cuts: &[u8]) -> Vec<u8> {
        let mut points: Vec<u8> = cuts.iter().map(|cut| cut % 101).collect();
        points.push(0);
        points.push(100);
        points.sort_unstable();
        points.windows(2).map(|pair| pair[1] - pair[0]).collect()
    }

    #[test]
    fn remainder_goes_to_last() {
        assert_eq!(split_by_shares(10, &[30, 70]).unwrap(), vec![3, 7]);
        assert_eq!(split_by_shares(10, &[33, 33, 34]).unwrap(), vec![3, 3, 4]);
        assert_eq!(split_by_shares(1, &[50, 50]).unwrap(), vec![0, 1]);
    }

    #[test]
    fn share_rounds_down() {
        assert_eq!(share_of(25_325_555, 50).unwrap(), 12_662_777);
        assert_eq!(share_of(u64::MAX, 100).unwrap(), u64::MAX);
    }

    #[test]
    fn parts_add_up_for_any_split() {
        fn prop(total: u64, cuts: Vec<u8>) -> TestResult {
            if cuts.len() > 8 {
                return TestResult::discard();
            }
            let shares = shares_from_cuts(&cuts);
            let parts = split_by_shares(total, &shares).unwrap();
            TestResult::from_bool(
                parts.len() == shares.len()
                    && parts.iter().map(|part| u128::from(*part)).sum::<u128>() == u128::from(total),
            )
        }
        quickcheck(prop as fn(u64, Vec<u8>) -> TestResult);
    }

    #[test]
    fn proportional_split_spreads_remainder() {
        assert_eq!(split_proportional(10, &[10, 20]).unwrap(), vec![4, 6]);
        assert_eq!(split_proportional(3, &[0, 3]).unwrap(), vec![0, 3]);
        assert_eq!(split_proportional(0, &[5, 5]).unwrap(), vec![0, 0]);
    }

    #[test]
    fn proportional_split_needs_enough_balance() {
        let result = split_proportional(11, &[5, 5]);
        assert_eq!(result.unwrap_err(), ErrorCode::StrategyShortfall.into());
        assert!(split_proportional(1, &[]).is_err());
    }

    #[test]
    fn proportional_parts_fit_their_balance() {
        fn prop(amount: u64, balances: Vec<u32>) -> TestResult {
            let balances: Vec<u64> = balances.into_iter().map(u64::from).collect();
            let total: u64 = balances.iter().sum();
            if balances.len() > 8 || total == 0 {
                return TestResult::discard();
            }
            let amount = amount % (total + 1);
            let parts = split_proportional(amount, &balances).unwrap();
            TestResult::from_bool(
                parts.iter().sum::<u64>() == amount
                    && parts.iter().zip(&balances).all(|(part, balance)| part <= balance),
            )
        }
        quickcheck(prop as fn(u64, Vec<u32>) -> TestResult);
    }
}
