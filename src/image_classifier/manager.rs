use crate::error::AnalyzeError;
use crate::image_classifier::interface::ImageClassifier;
use crate::library::logger::interface::Logger;
use parking_lot::RwLock;
use std::sync::Arc;

pub type SharedClassifier = Arc<dyn ImageClassifier + Send + Sync>;
pub type ClassifierLoader = Box<dyn Fn() -> Result<SharedClassifier, AnalyzeError> + Send + Sync>;

/// Holds the one loaded model for the whole process.
pub struct ModelManager {
    loader: ClassifierLoader,
    classifier: RwLock<Option<SharedClassifier>>,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl ModelManager {
    pub fn new(loader: ClassifierLoader, logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            loader,
            classifier: RwLock::new(None),
            logger: logger.with_namespace("model_manager"),
        }
    }

    /// Loads the model up front. A failure is returned but leaves the manager
    /// usable; the next `instance` call tries again.
    pub fn init(&self) -> Result<(), AnalyzeError> {
        self.instance().map(|_| ())
    }

    pub fn instance(&self) -> Result<SharedClassifier, AnalyzeError> {
        if let Some(classifier) = self.classifier.read().as_ref() {
            return Ok(Arc::clone(classifier));
        }

        let mut slot = self.classifier.write();
        if let Some(classifier) = slot.as_ref() {
            return Ok(Arc::clone(classifier));
        }

        let _ = self.logger.info("Loading model...");
        match (self.loader)() {
            Ok(classifier) => {
                let _ = self.logger.info(&format!(
                    "Model loaded ({} input, {} labels)",
                    classifier.input_size(),
                    classifier.labels().len()
                ));
                *slot = Some(Arc::clone(&classifier));
                Ok(classifier)
            }
            Err(error) => {
                let _ = self.logger.error(&format!("Model load failed: {}", error));
                Err(error)
            }
        }
    }

    #[cfg(test)]
    pub fn is_loaded(&self) -> bool {
        self.classifier.read().is_some()
    }

    pub fn teardown(&self) {
        if self.classifier.write().take().is_some() {
            let _ = self.logger.info("Model unloaded");
        }
    }
}
