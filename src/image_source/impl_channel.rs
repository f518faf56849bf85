use crate::image_source::interface::{ImageSelection, ImageSource};
use parking_lot::Mutex;
use std::sync::mpsc::{channel, Receiver, Sender};

/// Selections pushed in from elsewhere in the process, such as files dropped
/// onto the window.
pub struct ImageSourceChannel {
    receiver: Mutex<Option<Receiver<ImageSelection>>>,
}

impl ImageSourceChannel {
    pub fn new() -> (Self, Sender<ImageSelection>) {
        let (sender, receiver) = channel();
        (
            Self {
                receiver: Mutex::new(Some(receiver)),
            },
            sender,
        )
    }
}

impl ImageSource for ImageSourceChannel {
    fn selections(&self) -> Receiver<ImageSelection> {
        match self.receiver.lock().take() {
            Some(receiver) => receiver,
            None => {
                // Already subscribed once; hand out a stream that is closed.
                let (_, receiver) = channel();
                receiver
            }
        }
    }
}
