//! Wide intermediate arithmetic for index math.

uint::construct_uint! {
    pub struct U256(4);
}

/// `a * b` split into `(a * b / denominator, a * b % denominator)`, with a
/// 256-bit intermediate product.
///
/// Returns `None` on a zero denominator or when the quotient does not fit
/// in a `u128`.
pub fn mul_div_rem(a: u128, b: u128, denominator: u128) -> Option<(u128, u128)> {
    if denominator == 0 {
        return None;
    }
    let product = U256::from(a).checked_mul(U256::from(b))?;
    let denominator = U256::from(denominator);
    let (quotient, remainder) = (product / denominator, product % denominator);
    if quotient > U256::from(u128::MAX) {
        return None;
    }
    Some((quotient.as_u128(), remainder.as_u128()))
}
