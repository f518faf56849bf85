use crate::config::InputSize;
use crate::error::AnalyzeError;
use crate::image_classifier::interface::{check_buffer_size, ClassificationResult, ImageClassifier};
use crate::image_classifier::model_config::ModelConfig;
use crate::image_classifier::probabilities::to_probabilities;
use crate::image_classifier::tract::tensor::{buffer_to_tensor, input_layout, TensorLayout};
use crate::library::logger::interface::Logger;
use crate::preprocessor::prepared_buffer::PreparedBuffer;
use std::sync::Arc;
use tract_onnx::prelude::*;

pub struct ImageClassifierTractOnnx {
    model: TypedRunnableModel<TypedModel>,
    layout: TensorLayout,
    config: ModelConfig,
    logger: Arc<dyn Logger + Send + Sync>,
}

fn load_error(config: &ModelConfig, error: impl std::fmt::Display) -> AnalyzeError {
    AnalyzeError::ModelLoad(format!(
        "{}: {}",
        config.onnx_model_path.display(),
        error
    ))
}

/// Input dims as the model declares them; `None` for symbolic dims, or for
/// all of them when the graph carries no shape information.
fn declared_input_dims(model: &InferenceModel) -> Option<Vec<Option<usize>>> {
    let typed = model.clone().into_typed().ok()?;
    let fact = typed.input_fact(0).ok()?;
    Some(
        fact.shape
            .iter()
            .map(|dim| dim.to_i64().ok().and_then(|v| usize::try_from(v).ok()))
            .collect(),
    )
}

impl ImageClassifierTractOnnx {
    pub fn new(
        config: ModelConfig,
        logger: Arc<dyn Logger + Send + Sync>,
    ) -> Result<Self, AnalyzeError> {
        let logger = logger.with_namespace("tract_onnx");
        let _ = logger.info(&format!(
            "Loading model from {}",
            config.onnx_model_path.display()
        ));

        if !config.onnx_model_path.exists() {
            return Err(load_error(&config, "file not found"));
        }

        let model = tract_onnx::onnx()
            .model_for_path(&config.onnx_model_path)
            .map_err(|e| load_error(&config, e))?;

        let layout = match declared_input_dims(&model) {
            Some(dims) => input_layout(&dims, config.input_size)?,
            None => {
                let _ = logger.info("Model declares no input shape, assuming NCHW");
                TensorLayout::Nchw
            }
        };

        let model = model
            .with_input_fact(0, f32::fact(layout.shape(config.input_size)).into())
            .and_then(|model| model.into_optimized())
            .and_then(|model| model.into_runnable())
            .map_err(|e| load_error(&config, e))?;

        let _ = logger.info(&format!(
            "Model ready: input {} {:?}, {} labels",
            config.input_size,
            layout,
            config.labels.len()
        ));

        Ok(Self {
            model,
            layout,
            config,
            logger,
        })
    }
}

impl ImageClassifier for ImageClassifierTractOnnx {
    fn input_size(&self) -> InputSize {
        self.config.input_size
    }

    fn labels(&self) -> &[String] {
        &self.config.labels
    }

    fn classify(&self, buffer: &PreparedBuffer) -> Result<ClassificationResult, AnalyzeError> {
        check_buffer_size(self, buffer)?;

        let input = buffer_to_tensor(buffer, self.layout, &self.config.normalization)?;

        let outputs = self
            .model
            .run(tvec!(input.into_tvalue()))
            .map_err(|e| AnalyzeError::Inference(e.to_string()))?;

        let output = outputs
            .first()
            .ok_or_else(|| AnalyzeError::Inference("model produced no outputs".to_string()))?
            .to_array_view::<f32>()
            .map_err(|e| AnalyzeError::Inference(e.to_string()))?;

        let raw: Vec<f32> = output.iter().copied().collect();
        let probabilities = to_probabilities(&raw);
        let result = ClassificationResult::from_scores(&self.config.labels, &probabilities)?;

        let _ = self.logger.info(&format!(
            "Predicted {} ({:.4})",
            result.label,
            result.confidence()
        ));

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Normalization;
    use crate::image_classifier::labels::default_labels;
    use crate::library::logger::impl_fake::LoggerFake;
    use image::{Rgba, RgbaImage};
    use prost::Message;
    use std::path::PathBuf;
    use tract_onnx::pb::attribute_proto::AttributeType;
    use tract_onnx::pb::tensor_shape_proto::{dimension, Dimension};
    use tract_onnx::pb::{
        type_proto, AttributeProto, GraphProto, ModelProto, NodeProto, OperatorSetIdProto,
        TensorShapeProto, TypeProto, ValueInfoProto,
    };

    /// Float tensor value; `None` dims are symbolic.
    fn float_value(name: &str, dims: Option<&[Option<i64>]>) -> ValueInfoProto {
        let shape = dims.map(|dims| TensorShapeProto {
            dim: dims
                .iter()
                .enumerate()
                .map(|(i, d)| Dimension {
                    value: Some(match d {
                        Some(v) => dimension::Value::DimValue(*v),
                        None => dimension::Value::DimParam(format!("d{}", i)),
                    }),
                    ..Default::default()
                })
                .collect(),
        });

        ValueInfoProto {
            name: name.to_string(),
            r#type: Some(TypeProto {
                value: Some(type_proto::Value::TensorType(type_proto::Tensor {
                    elem_type: 1,
                    shape,
                })),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    /// A model whose scores are the mean of each color channel.
    fn channel_means_model(name: &str, dims: &[Option<i64>], axes: &[i64]) -> PathBuf {
        let node = NodeProto {
            input: vec!["image".to_string()],
            output: vec!["scores".to_string()],
            op_type: "ReduceMean".to_string(),
            attribute: vec![
                AttributeProto {
                    name: "axes".to_string(),
                    r#type: AttributeType::Ints as i32,
                    ints: axes.to_vec(),
                    ..Default::default()
                },
                AttributeProto {
                    name: "keepdims".to_string(),
                    r#type: AttributeType::Int as i32,
                    i: 0,
                    ..Default::default()
                },
            ],
            ..Default::default()
        };
        let model = ModelProto {
            ir_version: 7,
            opset_import: vec![OperatorSetIdProto {
                domain: String::new(),
                version: 13,
            }],
            graph: Some(GraphProto {
                name: "channel_means".to_string(),
                node: vec![node],
                input: vec![float_value("image", Some(dims))],
                output: vec![float_value("scores", None)],
                ..Default::default()
            }),
            ..Default::default()
        };

        let path = std::env::temp_dir().join(format!(
            "skin-lesion-analyzer-{}-{}.onnx",
            name,
            std::process::id()
        ));
        std::fs::write(&path, model.encode_to_vec()).unwrap();
        path
    }

    fn rgb_config(path: PathBuf, input_size: InputSize) -> ModelConfig {
        ModelConfig {
            onnx_model_path: path,
            input_size,
            normalization: Normalization::default(),
            labels: vec!["red".to_string(), "green".to_string(), "blue".to_string()],
        }
    }

    fn green(size: InputSize) -> PreparedBuffer {
        PreparedBuffer::from_rgba(&RgbaImage::from_pixel(
            size.width,
            size.height,
            Rgba([0, 255, 0, 255]),
        ))
        .unwrap()
    }

    fn load(config: ModelConfig) -> Result<ImageClassifierTractOnnx, AnalyzeError> {
        let path = config.onnx_model_path.clone();
        let result = ImageClassifierTractOnnx::new(config, Arc::new(LoggerFake::new()));
        let _ = std::fs::remove_file(&path);
        result
    }

    #[test]
    fn test_nchw_model_classifies() {
        let size = InputSize::new(8, 6);
        let path = channel_means_model("nchw", &[Some(1), Some(3), Some(6), Some(8)], &[2, 3]);

        let classifier = load(rgb_config(path, size)).unwrap();
        let result = classifier.classify(&green(size)).unwrap();

        assert_eq!(classifier.layout, TensorLayout::Nchw);
        assert_eq!(result.label, "green");
        assert!((result.confidence() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_nhwc_model_with_symbolic_batch_classifies() {
        let size = InputSize::new(8, 6);
        let path = channel_means_model("nhwc", &[None, Some(6), Some(8), Some(3)], &[1, 2]);

        let classifier = load(rgb_config(path, size)).unwrap();
        let result = classifier.classify(&green(size)).unwrap();

        assert_eq!(classifier.layout, TensorLayout::Nhwc);
        assert_eq!(result.label, "green");
        assert!((result.confidence() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_declared_size_mismatch_is_model_load_failure() {
        let path = channel_means_model(
            "mismatch",
            &[Some(1), Some(3), Some(299), Some(299)],
            &[2, 3],
        );

        let result = load(rgb_config(path, InputSize::new(224, 224)));

        match result {
            Err(AnalyzeError::ModelLoad(message)) => {
                assert!(message.contains("[1, 3, 299, 299]"), "{}", message)
            }
            Err(other) => panic!("unexpected error: {}", other),
            Ok(_) => panic!("mismatched model loaded"),
        }
    }

    #[test]
    fn test_output_label_count_mismatch_is_inference_failure() {
        let size = InputSize::new(4, 4);
        let path = channel_means_model("labels", &[Some(1), Some(3), Some(4), Some(4)], &[2, 3]);
        let config = ModelConfig {
            labels: vec!["red".to_string(), "green".to_string()],
            ..rgb_config(path, size)
        };

        let classifier = load(config).unwrap();

        assert_eq!(
            classifier.classify(&green(size)).map(|r| r.label),
            Err(AnalyzeError::Inference(
                "model produced 3 scores for 2 labels".to_string()
            ))
        );
    }

    #[test]
    fn test_wrong_buffer_size_is_inference_failure() {
        let size = InputSize::new(4, 4);
        let path = channel_means_model("buffer", &[Some(1), Some(3), Some(4), Some(4)], &[2, 3]);

        let classifier = load(rgb_config(path, size)).unwrap();

        assert!(matches!(
            classifier.classify(&green(InputSize::new(5, 5))),
            Err(AnalyzeError::Inference(_))
        ));
    }

    #[test]
    fn test_missing_model_is_model_load_failure() {
        let config = ModelConfig {
            onnx_model_path: PathBuf::from("/no/such/model.onnx"),
            input_size: InputSize::new(224, 224),
            normalization: Normalization::default(),
            labels: default_labels(),
        };

        let result = ImageClassifierTractOnnx::new(config, Arc::new(LoggerFake::new()));

        assert!(matches!(result, Err(AnalyzeError::ModelLoad(_))));
    }

    #[test]
    fn test_corrupt_model_is_model_load_failure() {
        let path = std::env::temp_dir().join(format!(
            "skin-lesion-analyzer-corrupt-{}.onnx",
            std::process::id()
        ));
        std::fs::write(&path, b"not a protobuf").unwrap();
        let config = ModelConfig {
            onnx_model_path: path.clone(),
            input_size: InputSize::new(224, 224),
            normalization: Normalization::default(),
            labels: default_labels(),
        };

        let result = ImageClassifierTractOnnx::new(config, Arc::new(LoggerFake::new()));

        let _ = std::fs::remove_file(&path);
        assert!(matches!(result, Err(AnalyzeError::ModelLoad(_))));
    }
}
