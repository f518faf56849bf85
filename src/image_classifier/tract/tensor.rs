use crate::config::{InputSize, Normalization};
use crate::error::AnalyzeError;
use crate::preprocessor::prepared_buffer::PreparedBuffer;
use tract_onnx::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TensorLayout {
    /// `[1, 3, height, width]`
    Nchw,
    /// `[1, height, width, 3]`
    Nhwc,
}

impl TensorLayout {
    pub fn shape(&self, size: InputSize) -> [usize; 4] {
        let (h, w) = (size.height as usize, size.width as usize);
        match self {
            TensorLayout::Nchw => [1, 3, h, w],
            TensorLayout::Nhwc => [1, h, w, 3],
        }
    }
}

/// Works out the layout from the model's declared input dims (`None` where a
/// dim is symbolic) and checks it against the configured size.
pub fn input_layout(dims: &[Option<usize>], size: InputSize) -> Result<TensorLayout, AnalyzeError> {
    if dims.len() != 4 {
        return Err(AnalyzeError::ModelLoad(format!(
            "expected a rank 4 image input, model declares {}",
            describe(dims)
        )));
    }
    if let Some(batch) = dims[0] {
        if batch != 1 {
            return Err(AnalyzeError::ModelLoad(format!(
                "model declares batch size {}, only 1 is supported",
                batch
            )));
        }
    }

    let (layout, height, width) = match (dims[1], dims[3]) {
        (Some(3), _) => (TensorLayout::Nchw, dims[2], dims[3]),
        (_, Some(3)) => (TensorLayout::Nhwc, dims[1], dims[2]),
        _ => {
            return Err(AnalyzeError::ModelLoad(format!(
                "no 3-channel axis in declared input {}",
                describe(dims)
            )))
        }
    };

    let matches = |declared: Option<usize>, configured: u32| {
        declared.map_or(true, |d| d == configured as usize)
    };
    if !matches(height, size.height) || !matches(width, size.width) {
        return Err(AnalyzeError::ModelLoad(format!(
            "model declares input {}, configured input size is {}",
            describe(dims),
            size
        )));
    }

    Ok(layout)
}

fn describe(dims: &[Option<usize>]) -> String {
    let parts: Vec<String> = dims
        .iter()
        .map(|d| d.map_or_else(|| "?".to_string(), |d| d.to_string()))
        .collect();
    format!("[{}]", parts.join(", "))
}

pub fn buffer_to_tensor(
    buffer: &PreparedBuffer,
    layout: TensorLayout,
    normalization: &Normalization,
) -> Result<Tensor, AnalyzeError> {
    let size = buffer.size();
    let bytes = buffer.as_bytes();
    let width = size.width as usize;

    // ARGB: channel c (0=r, 1=g, 2=b) sits at byte offset c + 1.
    let value = |c: usize, y: usize, x: usize| {
        let raw = bytes[(y * width + x) * 4 + c + 1] as f32 / 255.0;
        (raw - normalization.mean[c]) / normalization.std[c]
    };

    let [_, d1, d2, d3] = layout.shape(size);
    let tensor = match layout {
        TensorLayout::Nchw => {
            tract_ndarray::Array4::from_shape_fn((1, d1, d2, d3), |(_, c, y, x)| value(c, y, x))
                .into_tensor()
        }
        TensorLayout::Nhwc => {
            tract_ndarray::Array4::from_shape_fn((1, d1, d2, d3), |(_, y, x, c)| value(c, y, x))
                .into_tensor()
        }
    };

    Ok(tensor)
}
