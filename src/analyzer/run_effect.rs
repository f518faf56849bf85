use crate::analyzer::core::{Effect, Event};
use crate::config::Config;
use crate::image_classifier::manager::ModelManager;
use crate::image_source::interface::ImageSource;
use crate::library::logger::interface::Logger;
use crate::preprocessor::preprocess;
use std::sync::mpsc::Sender;
use std::sync::Arc;

#[derive(Clone)]
pub struct RunEffect {
    config: Config,
    logger: Arc<dyn Logger + Send + Sync>,
    image_source: Arc<dyn ImageSource + Send + Sync>,
    model_manager: Arc<ModelManager>,
    event_sender: Sender<Event>,
}

impl RunEffect {
    pub fn new(
        config: Config,
        logger: Arc<dyn Logger + Send + Sync>,
        image_source: Arc<dyn ImageSource + Send + Sync>,
        model_manager: Arc<ModelManager>,
        event_sender: Sender<Event>,
    ) -> Self {
        Self {
            config,
            logger: logger.with_namespace("effect"),
            image_source,
            model_manager,
            event_sender,
        }
    }

    pub fn run_effect(&self, effect: Effect) {
        let _ = self.logger.info(&format!("Running effect: {:?}", effect));

        match effect {
            Effect::SubscribeToImageSource => {
                for selection in self.image_source.selections() {
                    if self
                        .event_sender
                        .send(Event::ImageSelected(selection))
                        .is_err()
                    {
                        return;
                    }
                }
                let _ = self.event_sender.send(Event::ImageSourceClosed);
            }
            Effect::Preprocess { request_id, image } => {
                let result = preprocess(&image, self.config.input_size);
                let _ = self
                    .event_sender
                    .send(Event::PreprocessDone { request_id, result });
            }
            Effect::Classify { request_id, buffer } => {
                let result = self
                    .model_manager
                    .instance()
                    .and_then(|classifier| classifier.classify(&buffer));
                let _ = self
                    .event_sender
                    .send(Event::ClassifyDone { request_id, result });
            }
        }
    }
}
