use crate::photo::Orientation;
use image::DynamicImage;
use std::fmt;
use std::sync::mpsc::Sender;

/// Correlates a submitted request with its completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestToken(pub u64);

impl fmt::Display for RequestToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub label: String,
    pub confidence: f32,
}

impl Classification {
    pub fn new(label: &str, confidence: f32) -> Self {
        Self {
            label: label.to_string(),
            confidence,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ClassifierResults {
    Classifications(Vec<Classification>),
    /// Results that are not labeled classifications, described by shape.
    Unexpected(String),
}

/// How pixels are fitted to the model's input size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CropAndScale {
    /// Scale to cover the input, then crop the middle.
    #[default]
    CenterCrop,
    /// Scale to fit inside the input and pad the rest.
    #[allow(dead_code)]
    ScaleFit,
    /// Stretch to the input ignoring aspect ratio.
    #[allow(dead_code)]
    ScaleFill,
}

#[derive(Debug, Clone)]
pub struct ClassificationRequest {
    pub token: RequestToken,
    pub pixels: DynamicImage,
    pub orientation: Orientation,
    pub crop_and_scale: CropAndScale,
}

#[derive(Debug)]
pub struct ClassifierCompletion {
    pub token: RequestToken,
    /// `Ok(None)` when the request finished without any results.
    pub outcome: Result<Option<ClassifierResults>, Box<dyn std::error::Error + Send + Sync>>,
}

pub trait ImageClassifier: Send + Sync {
    /// Starts classifying `request` and returns without waiting. Exactly one
    /// completion carrying `request.token` is later sent on `completions`.
    fn submit(&self, request: ClassificationRequest, completions: Sender<ClassifierCompletion>);
}
