use crate::image_classifier::interface::{ClassifierCompletion, ClassifierResults};
use crate::image_predictor::interface::Prediction;
use crate::image_predictor::main::{lock, Handlers};
use crate::library::logger::interface::Logger;
use std::sync::mpsc::Receiver;
use std::sync::Arc;

pub(super) struct CompletionDispatcher {
    logger: Arc<dyn Logger + Send + Sync>,
    handlers: Handlers,
}

impl CompletionDispatcher {
    pub fn new(logger: Arc<dyn Logger + Send + Sync>, handlers: Handlers) -> Self {
        Self { logger, handlers }
    }

    pub fn run(&self, completions: Receiver<ClassifierCompletion>) {
        while let Ok(completion) = completions.recv() {
            self.complete(completion);
        }
    }

    pub fn complete(&self, completion: ClassifierCompletion) {
        let token = completion.token;

        // Released before the handler runs so it may submit again.
        let handler = lock(&self.handlers).remove(&token);

        let Some(handler) = handler else {
            panic!("Every request must have a prediction handler (request {}).", token);
        };

        let predictions = self.predictions_from(completion);
        handler(predictions);
    }

    fn predictions_from(&self, completion: ClassifierCompletion) -> Option<Vec<Prediction>> {
        let token = completion.token;

        match completion.outcome {
            Err(e) => {
                let _ = self.logger.error(&format!(
                    "Image classification error for request {}...\n\n{}",
                    token, e
                ));
                None
            }
            Ok(None) => {
                let _ = self
                    .logger
                    .error(&format!("Request {} had no results.", token));
                None
            }
            Ok(Some(ClassifierResults::Unexpected(shape))) => {
                let _ = self.logger.error(&format!(
                    "Request {} produced the wrong result type: {}",
                    token, shape
                ));
                None
            }
            Ok(Some(ClassifierResults::Classifications(observations))) => {
                if observations.is_empty() {
                    let _ = self
                        .logger
                        .error(&format!("Request {} had no observations.", token));
                    return None;
                }

                Some(
                    observations
                        .into_iter()
                        .map(|observation| Prediction {
                            classification: observation.label,
                            confidence: observation.confidence,
                        })
                        .collect(),
                )
            }
        }
    }
}
