use crate::config::InputSize;
use crate::error::AnalyzeError;
use crate::image_classifier::interface::{check_buffer_size, ClassificationResult, ImageClassifier};
use crate::preprocessor::prepared_buffer::PreparedBuffer;
use rand::distr::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Stand-in model. Scores are drawn from an rng seeded by the pixels, so the
/// same image always gets the same answer.
pub struct ImageClassifierFake {
    input_size: InputSize,
    labels: Vec<String>,
    calls: AtomicUsize,
}

impl ImageClassifierFake {
    pub fn new(input_size: InputSize, labels: Vec<String>) -> Self {
        Self {
            input_size,
            labels,
            calls: AtomicUsize::new(0),
        }
    }

    #[cfg(test)]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

// FNV-1a
fn seed(bytes: &[u8]) -> u64 {
    bytes.iter().fold(0xcbf29ce484222325, |hash, &b| {
        (hash ^ b as u64).wrapping_mul(0x100000001b3)
    })
}

impl ImageClassifier for ImageClassifierFake {
    fn input_size(&self) -> InputSize {
        self.input_size
    }

    fn labels(&self) -> &[String] {
        &self.labels
    }

    fn classify(&self, buffer: &PreparedBuffer) -> Result<ClassificationResult, AnalyzeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        check_buffer_size(self, buffer)?;

        let mut rng = StdRng::seed_from_u64(seed(buffer.as_bytes()));
        let score_dist =
            Uniform::new(0.01, 1.0).map_err(|e| AnalyzeError::Inference(e.to_string()))?;

        let scores: Vec<f64> = self
            .labels
            .iter()
            .map(|_| score_dist.sample(&mut rng))
            .collect();
        let total: f64 = scores.iter().sum();
        let probabilities: Vec<f64> = scores.iter().map(|s| s / total).collect();

        ClassificationResult::from_scores(&self.labels, &probabilities)
    }
}
