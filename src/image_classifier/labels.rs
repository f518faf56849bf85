use crate::error::AnalyzeError;
use std::path::Path;

/// HAM10000 diagnostic categories.
pub const DEFAULT_LABELS: [&str; 7] = [
    "actinic keratosis",
    "basal cell carcinoma",
    "benign keratosis",
    "dermatofibroma",
    "melanoma",
    "melanocytic nevus",
    "vascular lesion",
];

pub fn default_labels() -> Vec<String> {
    DEFAULT_LABELS.iter().map(|s| s.to_string()).collect()
}

pub fn parse_labels(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn load_labels(path: &Path) -> Result<Vec<String>, AnalyzeError> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        AnalyzeError::ModelLoad(format!("cannot read labels {}: {}", path.display(), e))
    })?;
    let labels = parse_labels(&text);
    if labels.is_empty() {
        return Err(AnalyzeError::ModelLoad(format!(
            "labels file {} is empty",
            path.display()
        )));
    }
    Ok(labels)
}
