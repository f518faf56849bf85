use crate::error::AnalyzeError;
use crate::image_classifier::interface::ClassificationResult;
use crate::image_source::interface::{ImageSelection, RawImage};
use crate::preprocessor::prepared_buffer::PreparedBuffer;
use image::RgbaImage;
use std::fmt;
use std::sync::Arc;

/// Sequence number handed to each selection. Results carry it back so
/// superseded work can be recognised.
pub type RequestId = u64;

/// The resized image, as the model sees it.
#[derive(Clone, PartialEq)]
pub struct Preview(Arc<RgbaImage>);

impl Preview {
    pub fn new(image: RgbaImage) -> Self {
        Self(Arc::new(image))
    }

    pub fn image(&self) -> &RgbaImage {
        &self.0
    }

    /// Stable while the same preview is shown; used to cache textures.
    pub fn key(&self) -> usize {
        Arc::as_ptr(&self.0) as usize
    }
}

impl fmt::Debug for Preview {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Preview({}x{})", self.0.width(), self.0.height())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Phase {
    AwaitingImage,
    Preprocessing {
        request_id: RequestId,
    },
    Inferring {
        request_id: RequestId,
    },
    Displaying {
        request_id: RequestId,
        outcome: Result<ClassificationResult, AnalyzeError>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct State {
    pub phase: Phase,
    pub latest_request_id: RequestId,
    pub preview: Option<Preview>,
    pub image_source_closed: bool,
}

impl State {
    pub fn in_flight(&self) -> Option<RequestId> {
        match self.phase {
            Phase::Preprocessing { request_id } | Phase::Inferring { request_id } => {
                Some(request_id)
            }
            _ => None,
        }
    }

    /// Nothing more can happen: no selections will arrive and no work is
    /// pending.
    pub fn is_settled(&self) -> bool {
        self.image_source_closed && self.in_flight().is_none()
    }
}

#[derive(Debug)]
pub enum Event {
    ImageSelected(ImageSelection),
    ImageSourceClosed,
    PreprocessDone {
        request_id: RequestId,
        result: Result<PreparedBuffer, AnalyzeError>,
    },
    ClassifyDone {
        request_id: RequestId,
        result: Result<ClassificationResult, AnalyzeError>,
    },
}

impl Event {
    pub fn request_id(&self) -> Option<RequestId> {
        match self {
            Event::PreprocessDone { request_id, .. } | Event::ClassifyDone { request_id, .. } => {
                Some(*request_id)
            }
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    SubscribeToImageSource,
    Preprocess {
        request_id: RequestId,
        image: RawImage,
    },
    Classify {
        request_id: RequestId,
        buffer: PreparedBuffer,
    },
}

pub fn init() -> (State, Vec<Effect>) {
    (
        State {
            phase: Phase::AwaitingImage,
            latest_request_id: 0,
            preview: None,
            image_source_closed: false,
        },
        vec![Effect::SubscribeToImageSource],
    )
}

/// True when the event reports on a request that is no longer the one in
/// flight.
pub fn is_stale(state: &State, event: &Event) -> bool {
    match event.request_id() {
        Some(request_id) => state.in_flight() != Some(request_id),
        None => false,
    }
}

pub fn transition(state: State, event: Event) -> (State, Vec<Effect>) {
    if is_stale(&state, &event) {
        return (state, vec![]);
    }

    match (state.phase.clone(), event) {
        (_, Event::ImageSelected(ImageSelection::Cancelled)) => (state, vec![]),

        (_, Event::ImageSelected(ImageSelection::Selected(image))) => {
            let request_id = state.latest_request_id + 1;
            (
                State {
                    phase: Phase::Preprocessing { request_id },
                    latest_request_id: request_id,
                    preview: None,
                    ..state
                },
                vec![Effect::Preprocess { request_id, image }],
            )
        }

        (_, Event::ImageSelected(ImageSelection::Rejected(error))) => {
            let request_id = state.latest_request_id + 1;
            (
                State {
                    phase: Phase::Displaying {
                        request_id,
                        outcome: Err(error),
                    },
                    latest_request_id: request_id,
                    preview: None,
                    ..state
                },
                vec![],
            )
        }

        (_, Event::ImageSourceClosed) => (
            State {
                image_source_closed: true,
                ..state
            },
            vec![],
        ),

        (
            Phase::Preprocessing { request_id },
            Event::PreprocessDone {
                result: Ok(buffer), ..
            },
        ) => (
            State {
                phase: Phase::Inferring { request_id },
                preview: Some(Preview::new(buffer.to_rgba_image())),
                ..state
            },
            vec![Effect::Classify { request_id, buffer }],
        ),

        (
            Phase::Preprocessing { request_id },
            Event::PreprocessDone {
                result: Err(error), ..
            },
        ) => (
            State {
                phase: Phase::Displaying {
                    request_id,
                    outcome: Err(error),
                },
                ..state
            },
            vec![],
        ),

        (Phase::Inferring { request_id }, Event::ClassifyDone { result, .. }) => (
            State {
                phase: Phase::Displaying {
                    request_id,
                    outcome: result,
                },
                ..state
            },
            vec![],
        ),

        _ => (state, vec![]),
    }
}
