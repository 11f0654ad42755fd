/// Computes the arithmetic mean of a slice of values. Returns `None` for empty input.
///
/// Finite values always give a finite mean: if the plain sum overflows, each
/// value is scaled by the count before summing.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let n = values.len() as f64;
    let sum = values.iter().sum::<f64>();
    if sum.is_finite() {
        Some(sum / n)
    } else {
        Some(values.iter().map(|v| v / n).sum())
    }
}
