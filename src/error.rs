use thiserror::Error;

/// Failures that end a single classification request.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalyzeError {
    #[error("Image preprocessing failed: {0}")]
    Preprocessing(String),

    #[error("Model loading failed: {0}")]
    ModelLoad(String),

    #[error("Inference failed: {0}")]
    Inference(String),
}

impl AnalyzeError {
    pub fn error_code(&self) -> &'static str {
        match self {
            AnalyzeError::Preprocessing(_) => "PREPROCESSING_FAILURE",
            AnalyzeError::ModelLoad(_) => "MODEL_LOAD_FAILURE",
            AnalyzeError::Inference(_) => "INFERENCE_FAILURE",
        }
    }
}

impl From<image::ImageError> for AnalyzeError {
    fn from(error: image::ImageError) -> Self {
        AnalyzeError::Preprocessing(error.to_string())
    }
}
