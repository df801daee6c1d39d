use crate::image_classifier::interface::{
    ClassificationRequest, ClassifierCompletion, CropAndScale, RequestToken,
};
use crate::image_classifier::lazy::LazyClassifier;
use crate::image_predictor::dispatch::CompletionDispatcher;
use crate::image_predictor::interface::{Prediction, PredictionHandler};
use crate::library::logger::interface::Logger;
use crate::photo::Image;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{channel, Sender};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

pub(super) type Handlers = Arc<Mutex<HashMap<RequestToken, PredictionHandler>>>;

pub(super) fn lock(handlers: &Handlers) -> MutexGuard<'_, HashMap<RequestToken, PredictionHandler>> {
    handlers.lock().unwrap_or_else(PoisonError::into_inner)
}

pub struct ImagePredictor {
    logger: Arc<dyn Logger + Send + Sync>,
    classifier: Arc<LazyClassifier>,
    handlers: Handlers,
    next_token: AtomicU64,
    completion_sender: Sender<ClassifierCompletion>,
}

impl ImagePredictor {
    pub fn new(logger: Arc<dyn Logger + Send + Sync>, classifier: Arc<LazyClassifier>) -> Self {
        let logger = logger.with_namespace("image_predictor");
        let handlers: Handlers = Arc::new(Mutex::new(HashMap::new()));
        let (completion_sender, completion_receiver) = channel();

        let dispatcher = CompletionDispatcher::new(logger.clone(), handlers.clone());
        std::thread::spawn(move || dispatcher.run(completion_receiver));

        Self {
            logger,
            classifier,
            handlers,
            next_token: AtomicU64::new(0),
            completion_sender,
        }
    }

    /// Classifies `image` in the background and calls `handler` exactly once
    /// with the ranked predictions, or `None` if nothing could be classified.
    ///
    /// Panics if the image carries an unknown orientation tag.
    pub fn predict(
        &self,
        image: Image,
        handler: impl FnOnce(Option<Vec<Prediction>>) + Send + 'static,
    ) {
        let Some(orientation) = image.orientation() else {
            panic!(
                "Selected photo does not have an associated orientation (tag {}).",
                image.orientation_tag()
            );
        };

        let classifier = self.classifier.get();

        let token = RequestToken(self.next_token.fetch_add(1, Ordering::Relaxed));
        lock(&self.handlers).insert(token, Box::new(handler));

        let _ = self
            .logger
            .info(&format!("Submitting request {} ({:?})", token, orientation));

        classifier.submit(
            ClassificationRequest {
                token,
                pixels: image.into_pixels(),
                orientation,
                crop_and_scale: CropAndScale::CenterCrop,
            },
            self.completion_sender.clone(),
        );
    }

    /// Number of submitted requests still waiting for their completion.
    #[allow(dead_code)]
    pub fn pending_requests(&self) -> usize {
        lock(&self.handlers).len()
    }
}
