use std::cmp::Ordering;
use thiserror::Error;

/// InputValueError is used if some simulation option or parameter does not fulfill the posed
/// requirements, e.g., a tick interval of zero.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Invalid input value: {0}")]
pub struct InputValueError(pub String);

#[derive(Debug, Clone, Copy)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// argsort returns the indices that would sort an array. The sort is stable, i.e. equal values
/// keep their original order. Incomparable values (NaN) are treated as equal.
pub fn argsort<T: PartialOrd>(x: &[T], order: SortOrder) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..x.len()).collect();
    let cmp = |a: &T, b: &T| a.partial_cmp(b).unwrap_or(Ordering::Equal);
    match order {
        SortOrder::Ascending => indices.sort_by(|&a, &b| cmp(&x[a], &x[b])),
        SortOrder::Descending => indices.sort_by(|&a, &b| cmp(&x[b], &x[a])),
    }
    indices
}

/// round_to returns x rounded to the given number of decimal places.
pub fn round_to(x: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (x * factor).round() / factor
}
