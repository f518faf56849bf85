use chrono::Offset;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Width and height the model consumes. Resizing and buffer allocation both
/// read this one value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputSize {
    pub width: u32,
    pub height: u32,
}

pub const INPUT_SIZE: InputSize = InputSize {
    width: 224,
    height: 224,
};

impl InputSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl fmt::Display for InputSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl FromStr for InputSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (width, height) = s
            .split_once(['x', 'X'])
            .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{}'", s))?;
        let width = width
            .trim()
            .parse::<u32>()
            .map_err(|e| format!("invalid width '{}': {}", width, e))?;
        let height = height
            .trim()
            .parse::<u32>()
            .map_err(|e| format!("invalid height '{}': {}", height, e))?;
        let size = InputSize::new(width, height);
        if size.is_empty() {
            return Err(format!("input size must be non-zero, got {}", size));
        }
        Ok(size)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normalization {
    pub mean: [f32; 3],
    pub std: [f32; 3],
}

impl Default for Normalization {
    fn default() -> Self {
        Self {
            mean: [0.0, 0.0, 0.0],
            std: [1.0, 1.0, 1.0],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayKind {
    Console,
    Gui,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub input_size: InputSize,
    pub normalization: Normalization,
    pub model_path: Option<PathBuf>,
    pub labels_path: Option<PathBuf>,
    pub display: DisplayKind,
    pub image_paths: Vec<PathBuf>,
    pub read_stdin: bool,
    pub logger_timezone: chrono::FixedOffset,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_size: INPUT_SIZE,
            normalization: Normalization::default(),
            model_path: None,
            labels_path: None,
            display: DisplayKind::Console,
            image_paths: vec![],
            read_stdin: true,
            logger_timezone: utc(),
        }
    }
}

pub fn utc() -> chrono::FixedOffset {
    chrono::Utc.fix()
}

pub fn timezone_from_hours(hours: i32) -> Option<chrono::FixedOffset> {
    chrono::FixedOffset::east_opt(hours.checked_mul(3600)?)
}
