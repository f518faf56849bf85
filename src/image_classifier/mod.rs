pub mod impl_fake;
pub mod impl_tract_onnx;
pub mod interface;
pub mod labels;
pub mod manager;
pub mod model_config;
pub mod probabilities;
pub mod tract;
