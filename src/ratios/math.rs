//! Null-safe arithmetic shared by every ratio
//!
//! Absent inputs are `None`. Zero is treated as "not reported" in the two
//! places the reference outputs require it: a zero numerator or denominator
//! in [`safe_divide`], and a zero current or prior value in [`period_average`].

/// Divide `numerator` by `denominator`, or `None` when either is absent or zero
///
/// A legitimately zero numerator is reported as unknown rather than `0.0`.
pub fn safe_divide(numerator: Option<f64>, denominator: Option<f64>) -> Option<f64> {
    match (numerator, denominator) {
        (Some(n), Some(d)) if n != 0.0 && d != 0.0 => Some(n / d),
        _ => None,
    }
}

/// Average of a balance sheet figure across the current and prior period
///
/// With a usable prior value `p`: `(c + p) / 2` when the current value `c` is
/// present and nonzero, otherwise `p / 2`. Without one: `c`, or `0.0`.
pub fn period_average(current: Option<f64>, previous: Option<f64>) -> f64 {
    let current = nonzero(current);
    match nonzero(previous) {
        Some(p) => match current {
            Some(c) => (c + p) / 2.0,
            None => p / 2.0,
        },
        None => current.unwrap_or(0.0),
    }
}

/// Sum of line items with absent entries counted as zero
pub fn sum_present(values: &[Option<f64>]) -> f64 {
    values.iter().map(|v| v.unwrap_or(0.0)).sum()
}

fn nonzero(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v != 0.0)
}
