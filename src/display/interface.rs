use crate::analyzer::core::Preview;
use std::error::Error;

/// Everything the presentation layer needs for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Screen {
    pub title: &'static str,
    /// Shown while there is no preview.
    pub notice: Option<&'static str>,
    pub preview: Option<Preview>,
    pub status: String,
    pub instructions: &'static str,
    pub busy: bool,
}

pub trait Display: Send {
    fn init(&mut self) -> Result<(), Box<dyn Error + Send + Sync>>;

    /// Called after every state transition.
    fn show(&mut self, screen: &Screen) -> Result<(), Box<dyn Error + Send + Sync>>;
}
