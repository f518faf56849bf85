use crate::error::AnalyzeError;
use crate::image_classifier::interface::ClassificationResult;

pub fn format_result(result: &ClassificationResult) -> String {
    format!(
        "{} with a confidence of {:.2}%.",
        result.label,
        result.confidence() * 100.0
    )
}

pub fn format_error(error: &AnalyzeError) -> String {
    match error {
        AnalyzeError::Preprocessing(_) => "Error converting image.".to_string(),
        AnalyzeError::ModelLoad(description) => format!("Failed to load model: {}", description),
        AnalyzeError::Inference(description) => {
            format!("Failed to make prediction: {}", description)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn result(label: &str, probabilities: &[(&str, f64)]) -> ClassificationResult {
        ClassificationResult {
            label: label.to_string(),
            probabilities: probabilities
                .iter()
                .map(|(l, p)| (l.to_string(), *p))
                .collect::<HashMap<_, _>>(),
        }
    }

    #[test]
    fn test_format_result() {
        let text = format_result(&result(
            "melanoma",
            &[("melanoma", 0.8734), ("benign", 0.1266)],
        ));

        assert_eq!(text, "melanoma with a confidence of 87.34%.");
    }

    #[test]
    fn test_missing_label_defaults_to_zero() {
        let text = format_result(&result("melanoma", &[("benign", 1.0)]));

        assert_eq!(text, "melanoma with a confidence of 0.00%.");
    }

    #[test]
    fn test_full_confidence() {
        let text = format_result(&result("vascular lesion", &[("vascular lesion", 1.0)]));

        assert_eq!(text, "vascular lesion with a confidence of 100.00%.");
    }

    #[test]
    fn test_format_error() {
        assert_eq!(
            format_error(&AnalyzeError::Preprocessing("zero size".to_string())),
            "Error converting image."
        );
        assert_eq!(
            format_error(&AnalyzeError::ModelLoad("file not found".to_string())),
            "Failed to load model: file not found"
        );
        assert_eq!(
            format_error(&AnalyzeError::Inference("bad shape".to_string())),
            "Failed to make prediction: bad shape"
        );
    }
}
