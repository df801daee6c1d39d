use crate::image_classifier::impl_fake::{FakeResponse, FakeScript, ImageClassifierFake};
use crate::image_classifier::interface::{
    ClassificationRequest, ClassifierCompletion, CropAndScale, RequestToken,
};
use crate::library::logger::{impl_console::LoggerConsole, interface::Logger};
use crate::photo::Orientation;
use image::{DynamicImage, ImageBuffer, Rgb};
use std::sync::Arc;

pub struct Fixture {
    pub logger: Arc<dyn Logger + Send + Sync>,
}

impl Fixture {
    pub fn new() -> Self {
        let logger = Arc::new(LoggerConsole::new(chrono::FixedOffset::east_opt(0).unwrap()));
        Self { logger }
    }

    pub fn fake(&self, script: FakeScript) -> ImageClassifierFake {
        ImageClassifierFake::scripted(self.logger.clone(), script)
    }

    pub fn fake_replying(&self, reply: fn() -> FakeResponse) -> ImageClassifierFake {
        self.fake(Arc::new(move |_: &ClassificationRequest| reply()))
    }
}

pub fn request(token: u64) -> ClassificationRequest {
    ClassificationRequest {
        token: RequestToken(token),
        pixels: DynamicImage::ImageRgb8(ImageBuffer::from_pixel(4, 4, Rgb([10, 20, 30]))),
        orientation: Orientation::Up,
        crop_and_scale: CropAndScale::CenterCrop,
    }
}

pub fn recv(completions: &std::sync::mpsc::Receiver<ClassifierCompletion>) -> ClassifierCompletion {
    completions
        .recv_timeout(std::time::Duration::from_secs(5))
        .expect("classifier never completed")
}
