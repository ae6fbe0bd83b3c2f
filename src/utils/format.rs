use near_primitives::types::Balance;
use num_bigint::{BigInt, Sign};
use num_traits::ToPrimitive;

/// Indivisible units per NEAR.
pub const ONE_NEAR: Balance = 1_000_000_000_000_000_000_000_000;

const DISPLAY_DECIMALS: u32 = 2;
const FRACTION_UNIT: Balance = ONE_NEAR / 10u128.pow(DISPLAY_DECIMALS);

/// Renders a yoctoNEAR amount as a display amount with two decimals, rounded
/// half up. The conversion stays in integer arithmetic so amounts with no
/// sub-cent remainder survive a round trip through `parse_near` exactly.
pub fn format_near(yocto: Balance) -> String {
    let mut whole = yocto / ONE_NEAR;
    let mut cents = (yocto % ONE_NEAR + FRACTION_UNIT / 2) / FRACTION_UNIT;
    if cents >= 100 {
        whole += 1;
        cents -= 100;
    }
    format!("{}.{:02}", whole, cents)
}

/// Parses a decimal display amount back into yoctoNEAR. Accepts thousands
/// grouping in the whole part and up to 24 fractional digits.
pub fn parse_near(text: &str) -> Option<Balance> {
    let (whole_text, fraction_text) = match text.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (text, ""),
    };

    let whole_digits: String = whole_text.chars().filter(|c| *c != ',').collect();
    if whole_digits.is_empty() && fraction_text.is_empty() {
        return None;
    }
    if !whole_digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let whole: Balance = if whole_digits.is_empty() {
        0
    } else {
        whole_digits.parse().ok()?
    };
    let mut yocto = whole.checked_mul(ONE_NEAR)?;

    if !fraction_text.is_empty() {
        if fraction_text.len() > 24 || !fraction_text.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        let fraction: Balance = fraction_text.parse().ok()?;
        let scale = 10u128.pow(24 - fraction_text.len() as u32);
        yocto = yocto.checked_add(fraction.checked_mul(scale)?)?;
    }
    Some(yocto)
}

/// Display-unit value for USD conversion, rounded to two decimals.
pub fn to_near(yocto: Balance) -> f64 {
    let value = yocto as f64 / ONE_NEAR as f64;
    (value * 100.0).round() / 100.0
}

/// Fixed two-decimal currency string with thousands grouping.
pub fn format_usd(value: f64) -> String {
    let cents = (value * 100.0).round() as i128;
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.unsigned_abs();
    let whole = cents / 100;
    let fraction = cents % 100;
    format!("{}{}.{:02}", sign, group_thousands(&whole.to_string()), fraction)
}

/// Signed display amount for reward deltas.
pub fn format_signed_near(delta: &BigInt) -> String {
    let sign = if delta.sign() == Sign::Minus { "-" } else { "+" };
    let magnitude = delta.magnitude().to_u128().unwrap_or(Balance::MAX);
    format!("{}{}", sign, format_near(magnitude))
}

fn group_thousands(digits: &str) -> String {
    let bytes = digits.as_bytes();
    let mut grouped = String::with_capacity(bytes.len() + bytes.len() / 3);
    for (i, digit) in bytes.iter().enumerate() {
        if i > 0 && (bytes.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*digit as char);
    }
    grouped
}
