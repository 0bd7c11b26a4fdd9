/// Mean absolute error, reported as a diagnostic only: mean(|predicted - expected|).
///
/// Returns 0.0 for empty input.
pub fn mean_absolute_error(predicted: &[f64], expected: &[f64]) -> f64 {
    let n = predicted.len().min(expected.len());
    if n == 0 {
        return 0.0;
    }
    predicted.iter().zip(expected.iter())
        .map(|(p, y)| (p - y).abs())
        .sum::<f64>() / n as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn averages_absolute_differences() {
        assert_eq!(mean_absolute_error(&[1.0, 0.0, 0.5], &[0.0, 0.0, 1.0]), 0.5);
        assert_eq!(mean_absolute_error(&[], &[]), 0.0);
    }
}
