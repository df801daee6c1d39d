use crate::image_classifier::interface::{
    Classification, ClassificationRequest, ClassifierCompletion, ClassifierResults,
    ImageClassifier,
};
use crate::library::logger::interface::Logger;
use rand::distr::{Distribution, Uniform};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::time::Duration;

/// What the fake replies to one request, and after how long.
#[derive(Debug)]
pub struct FakeResponse {
    pub delay: Duration,
    pub outcome: Result<Option<ClassifierResults>, Box<dyn std::error::Error + Send + Sync>>,
}

#[allow(dead_code)]
impl FakeResponse {
    pub fn classifications(observations: &[(&str, f32)]) -> Self {
        let classifications = observations
            .iter()
            .map(|(label, confidence)| Classification::new(label, *confidence))
            .collect();
        Self::from_outcome(Ok(Some(ClassifierResults::Classifications(classifications))))
    }

    pub fn no_results() -> Self {
        Self::from_outcome(Ok(None))
    }

    pub fn unexpected(shape: &str) -> Self {
        Self::from_outcome(Ok(Some(ClassifierResults::Unexpected(shape.to_string()))))
    }

    pub fn error(message: &str) -> Self {
        Self::from_outcome(Err(message.into()))
    }

    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    fn from_outcome(
        outcome: Result<Option<ClassifierResults>, Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self {
            delay: Duration::ZERO,
            outcome,
        }
    }
}

pub type FakeScript = Arc<dyn Fn(&ClassificationRequest) -> FakeResponse + Send + Sync>;

pub struct ImageClassifierFake {
    logger: Arc<dyn Logger + Send + Sync>,
    script: FakeScript,
    submitted: AtomicUsize,
}

impl ImageClassifierFake {
    /// Answers every request with a random cat, dog and rabbit ranking.
    pub fn new(logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self::scripted(logger, Arc::new(|_: &ClassificationRequest| random_response()))
    }

    #[allow(dead_code)]
    pub fn scripted(logger: Arc<dyn Logger + Send + Sync>, script: FakeScript) -> Self {
        Self {
            logger: logger.with_namespace("image_classifier").with_namespace("fake"),
            script,
            submitted: AtomicUsize::new(0),
        }
    }

    #[allow(dead_code)]
    pub fn submitted_count(&self) -> usize {
        self.submitted.load(Ordering::SeqCst)
    }
}

fn random_response() -> FakeResponse {
    match random_classifications() {
        Ok(classifications) => FakeResponse::from_outcome(Ok(Some(
            ClassifierResults::Classifications(classifications),
        ))),
        Err(e) => FakeResponse::from_outcome(Err(e)),
    }
}

fn random_classifications() -> Result<Vec<Classification>, Box<dyn std::error::Error + Send + Sync>>
{
    let mut rng = rand::rng();
    let weight_dist = Uniform::new(0.0f32, 1.0)?;

    let weights: Vec<(&str, f32)> = ["cat", "dog", "rabbit"]
        .into_iter()
        .map(|label| (label, weight_dist.sample(&mut rng)))
        .collect();
    let total: f32 = weights.iter().map(|(_, weight)| weight).sum();

    let mut classifications: Vec<Classification> = weights
        .into_iter()
        .map(|(label, weight)| Classification::new(label, weight / total.max(f32::EPSILON)))
        .collect();
    classifications.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));

    Ok(classifications)
}

impl ImageClassifier for ImageClassifierFake {
    fn submit(&self, request: ClassificationRequest, completions: Sender<ClassifierCompletion>) {
        self.submitted.fetch_add(1, Ordering::SeqCst);
        let _ = self
            .logger
            .info(&format!("Classifying request {} with fake classifier...", request.token));

        let response = (self.script)(&request);
        let token = request.token;

        std::thread::spawn(move || {
            std::thread::sleep(response.delay);
            let _ = completions.send(ClassifierCompletion {
                token,
                outcome: response.outcome,
            });
        });
    }
}
