use crate::config::InputSize;
use crate::error::AnalyzeError;
use crate::preprocessor::prepared_buffer::PreparedBuffer;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationResult {
    pub label: String,
    pub probabilities: HashMap<String, f64>,
}

impl ClassificationResult {
    /// Picks the highest scoring label. Ties go to the label listed first.
    pub fn from_scores(labels: &[String], scores: &[f64]) -> Result<Self, AnalyzeError> {
        if labels.len() != scores.len() {
            return Err(AnalyzeError::Inference(format!(
                "model produced {} scores for {} labels",
                scores.len(),
                labels.len()
            )));
        }
        if scores.iter().any(|score| !score.is_finite()) {
            return Err(AnalyzeError::Inference(
                "model produced non-finite scores".to_string(),
            ));
        }

        let (best, _) = scores
            .iter()
            .enumerate()
            .fold(None, |best: Option<(usize, f64)>, (i, &score)| match best {
                Some((_, top)) if top >= score => best,
                _ => Some((i, score)),
            })
            .ok_or_else(|| AnalyzeError::Inference("model produced no scores".to_string()))?;

        Ok(Self {
            label: labels[best].clone(),
            probabilities: labels.iter().cloned().zip(scores.iter().copied()).collect(),
        })
    }

    /// Probability of the predicted label, 0 when the mapping lacks it.
    pub fn confidence(&self) -> f64 {
        self.probabilities.get(&self.label).copied().unwrap_or(0.0)
    }
}

pub trait ImageClassifier: Send + Sync {
    fn input_size(&self) -> InputSize;
    fn labels(&self) -> &[String];
    fn classify(&self, buffer: &PreparedBuffer) -> Result<ClassificationResult, AnalyzeError>;
}

pub fn check_buffer_size(
    classifier: &dyn ImageClassifier,
    buffer: &PreparedBuffer,
) -> Result<(), AnalyzeError> {
    if buffer.size() != classifier.input_size() {
        return Err(AnalyzeError::Inference(format!(
            "buffer is {} but the model expects {}",
            buffer.size(),
            classifier.input_size()
        )));
    }
    Ok(())
}
