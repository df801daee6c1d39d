use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub classification: String,
    pub confidence: f32,
}

impl fmt::Display for Prediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:.1}%", self.classification, self.confidence * 100.0)
    }
}

/// Receives the ranked predictions, or `None` when nothing could be classified.
pub type PredictionHandler = Box<dyn FnOnce(Option<Vec<Prediction>>) + Send>;
