use crate::analyzer::core::{Phase, State};
use crate::display::interface::Screen;
use crate::result_formatter::{format_error, format_result};

pub const TITLE: &str = "Skin Lesion Analyzer";
pub const PLACEHOLDER: &str = "No classification yet";
pub const ANALYZING: &str = "Analyzing...";
pub const DISCLAIMER: &str =
    "This app is for educational purposes only and not for diagnostic use.";
pub const INSTRUCTIONS: &str =
    "Take a picture of the lesion on your skin or select one from your photo library.";

pub fn view(state: &State) -> Screen {
    let (status, busy) = match &state.phase {
        Phase::AwaitingImage => (PLACEHOLDER.to_string(), false),
        Phase::Preprocessing { .. } | Phase::Inferring { .. } => (ANALYZING.to_string(), true),
        Phase::Displaying {
            outcome: Ok(result),
            ..
        } => (format_result(result), false),
        Phase::Displaying {
            outcome: Err(error),
            ..
        } => (format_error(error), false),
    };

    Screen {
        title: TITLE,
        notice: match state.preview {
            Some(_) => None,
            None => Some(DISCLAIMER),
        },
        preview: state.preview.clone(),
        status,
        instructions: INSTRUCTIONS,
        busy,
    }
}
