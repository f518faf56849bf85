const SUM_TOLERANCE: f64 = 1e-3;

/// Treats the raw output as a distribution if it already is one, otherwise
/// as logits.
pub fn to_probabilities(raw: &[f32]) -> Vec<f64> {
    let values: Vec<f64> = raw.iter().map(|&v| v as f64).collect();
    if is_distribution(&values) {
        values
    } else {
        softmax(&values)
    }
}

fn is_distribution(values: &[f64]) -> bool {
    !values.is_empty()
        && values.iter().all(|v| (0.0..=1.0).contains(v))
        && (values.iter().sum::<f64>() - 1.0).abs() <= SUM_TOLERANCE
}

fn softmax(values: &[f64]) -> Vec<f64> {
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = values.iter().map(|v| (v - max).exp()).collect();
    let sum: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}
