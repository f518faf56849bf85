use crate::config::{Config, InputSize, Normalization};
use crate::error::AnalyzeError;
use crate::image_classifier::labels::{default_labels, load_labels};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq)]
pub struct ModelConfig {
    pub onnx_model_path: PathBuf,
    pub input_size: InputSize,
    pub normalization: Normalization,
    pub labels: Vec<String>,
}

impl ModelConfig {
    pub fn from_config(config: &Config, onnx_model_path: PathBuf) -> Result<Self, AnalyzeError> {
        let labels = match &config.labels_path {
            Some(path) => load_labels(path)?,
            None => default_labels(),
        };

        Ok(Self {
            onnx_model_path,
            input_size: config.input_size,
            normalization: config.normalization,
            labels,
        })
    }
}
