//! Conversion between decimal units and minor units
//!
//! Steps talk in whole units ("leases 1.5 lto"); the node talks in minor
//! units. Parsing is exact decimal arithmetic, no floats involved.

/// Parse a decimal unit amount into minor units
///
/// Fails on negative, malformed or over-precise input, and on overflow.
///
/// # Examples
/// ```
/// use ledger_e2e::utils::currency::to_minor_units;
///
/// assert_eq!(to_minor_units("1.0", 100_000_000), Ok(100_000_000));
/// assert_eq!(to_minor_units("0.5", 100_000_000), Ok(50_000_000));
/// assert_eq!(to_minor_units("12", 100_000_000), Ok(1_200_000_000));
/// ```
pub fn to_minor_units(amount: &str, minor_per_unit: u64) -> Result<u64, String> {
    let amount = amount.trim();
    let (whole, fraction) = match amount.split_once('.') {
        Some((w, f)) => (w, f),
        None => (amount, ""),
    };

    if whole.is_empty() && fraction.is_empty() {
        return Err(format!("'{}' is not an amount", amount));
    }
    if !whole.chars().all(|c| c.is_ascii_digit()) || !fraction.chars().all(|c| c.is_ascii_digit())
    {
        return Err(format!("'{}' is not an amount", amount));
    }

    let decimals = decimal_places(minor_per_unit)
        .ok_or_else(|| format!("{} is not a power of ten", minor_per_unit))?;
    let significant = fraction.trim_end_matches('0');
    if significant.len() > decimals {
        return Err(format!(
            "'{}' has more than {} decimal places",
            amount, decimals
        ));
    }

    let whole: u64 = if whole.is_empty() {
        0
    } else {
        whole
            .parse()
            .map_err(|_| format!("'{}' is out of range", amount))?
    };
    let fraction_minor: u64 = if significant.is_empty() {
        0
    } else {
        let padded = format!("{:0<width$}", significant, width = decimals);
        padded
            .parse()
            .map_err(|_| format!("'{}' is out of range", amount))?
    };

    whole
        .checked_mul(minor_per_unit)
        .and_then(|w| w.checked_add(fraction_minor))
        .ok_or_else(|| format!("'{}' is out of range", amount))
}

/// Format minor units as a decimal unit amount
///
/// # Examples
/// ```
/// use ledger_e2e::utils::currency::format_units;
///
/// assert_eq!(format_units(150_000_000, 100_000_000), "1.50000000");
/// ```
pub fn format_units(minor: u64, minor_per_unit: u64) -> String {
    let decimals = decimal_places(minor_per_unit).unwrap_or(0);
    if minor_per_unit == 0 {
        return minor.to_string();
    }
    let whole = minor / minor_per_unit;
    let fraction = minor % minor_per_unit;
    if decimals == 0 {
        whole.to_string()
    } else {
        format!("{}.{:0width$}", whole, fraction, width = decimals)
    }
}

/// Number of decimal places when `minor_per_unit` is a power of ten
fn decimal_places(minor_per_unit: u64) -> Option<usize> {
    if minor_per_unit == 0 {
        return None;
    }
    let mut n = minor_per_unit;
    let mut places = 0;
    while n % 10 == 0 {
        n /= 10;
        places += 1;
    }
    (n == 1).then_some(places)
}
