use crate::image_classifier::interface::ImageClassifier;
use crate::library::logger::interface::Logger;
use std::sync::{Arc, OnceLock};

pub type ClassifierFactory = Box<
    dyn Fn() -> Result<Arc<dyn ImageClassifier + Send + Sync>, Box<dyn std::error::Error + Send + Sync>>
        + Send
        + Sync,
>;

/// Builds the classifier the first time it is needed and hands out the same
/// instance afterwards.
pub struct LazyClassifier {
    logger: Arc<dyn Logger + Send + Sync>,
    factory: ClassifierFactory,
    instance: OnceLock<Arc<dyn ImageClassifier + Send + Sync>>,
}

impl LazyClassifier {
    pub fn new(
        logger: Arc<dyn Logger + Send + Sync>,
        factory: impl Fn() -> Result<
                Arc<dyn ImageClassifier + Send + Sync>,
                Box<dyn std::error::Error + Send + Sync>,
            > + Send
            + Sync
            + 'static,
    ) -> Self {
        Self {
            logger: logger.with_namespace("image_classifier"),
            factory: Box::new(factory),
            instance: OnceLock::new(),
        }
    }

    /// Panics if the classifier cannot be built. Nothing can be classified
    /// without it.
    pub fn get(&self) -> Arc<dyn ImageClassifier + Send + Sync> {
        self.instance
            .get_or_init(|| {
                let _ = self.logger.info("Creating image classifier...");
                match (self.factory)() {
                    Ok(classifier) => {
                        let _ = self.logger.info("Image classifier created");
                        classifier
                    }
                    Err(e) => {
                        let _ = self
                            .logger
                            .error(&format!("Failed to create image classifier: {}", e));
                        panic!("App failed to create an image classifier model instance: {}", e);
                    }
                }
            })
            .clone()
    }

    #[allow(dead_code)]
    pub fn is_initialized(&self) -> bool {
        self.instance.get().is_some()
    }
}
