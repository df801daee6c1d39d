use clap::Parser;
use config::Config;
use image_classifier::impl_fake::ImageClassifierFake;
use image_classifier::impl_tract_onnx::ImageClassifierTractOnnx;
use image_classifier::interface::ImageClassifier;
use image_classifier::lazy::LazyClassifier;
use image_predictor::interface::Prediction;
use image_predictor::main::ImagePredictor;
use library::logger::{impl_console::LoggerConsole, interface::Logger};
use photo::Image;
use std::path::PathBuf;
use std::sync::mpsc::channel;
use std::sync::Arc;
use std::time::Duration;

mod config;
mod image_classifier;
mod image_predictor;
mod library;
mod photo;

#[derive(Parser, Debug)]
#[command(name = "cat-dog-rabbit")]
#[command(about = "Classify photos as cat, dog or rabbit")]
struct Cli {
    /// Photos to classify
    #[arg(required = true)]
    images: Vec<PathBuf>,

    /// ONNX model to load instead of the bundled one
    #[arg(long)]
    model: Option<String>,

    /// Use the random fake classifier instead of a model
    #[arg(long)]
    fake: bool,

    /// EXIF orientation tag (1-8) applied to every photo
    #[arg(long, default_value_t = 1)]
    orientation: u32,

    /// Seconds to wait for each result
    #[arg(long)]
    timeout_secs: Option<u64>,
}

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cli = Cli::parse();

    let mut config = Config::default();
    if let Some(model) = cli.model {
        config.model.onnx_model_path = model;
    }
    if let Some(timeout_secs) = cli.timeout_secs {
        config.result_timeout = Duration::from_secs(timeout_secs);
    }

    let logger: Arc<dyn Logger + Send + Sync> =
        Arc::new(LoggerConsole::new(config.logger_timezone));

    let classifier = {
        let logger = logger.clone();
        let model_config = config.model.clone();
        let fake = cli.fake;
        LazyClassifier::new(logger.clone(), move || {
            let classifier: Arc<dyn ImageClassifier + Send + Sync> = if fake {
                Arc::new(ImageClassifierFake::new(logger.clone()))
            } else {
                Arc::new(ImageClassifierTractOnnx::new(
                    model_config.clone(),
                    logger.clone(),
                )?)
            };
            Ok(classifier)
        })
    };

    let image_predictor = ImagePredictor::new(logger.clone(), Arc::new(classifier));

    let (result_sender, result_receiver) = channel();
    let mut submitted = 0;

    for path in cli.images {
        let image = match Image::open(&path, cli.orientation) {
            Ok(image) => image,
            Err(e) => {
                logger.error(&format!("Failed to open {}: {}", path.display(), e))?;
                continue;
            }
        };

        let result_sender = result_sender.clone();
        image_predictor.predict(image, move |predictions| {
            let _ = result_sender.send((path, predictions));
        });
        submitted += 1;
    }

    for _ in 0..submitted {
        let (path, predictions) = result_receiver.recv_timeout(config.result_timeout)?;
        logger.info(&format!(
            "{}: {}",
            path.display(),
            describe_predictions(predictions.as_deref())
        ))?;
    }

    Ok(())
}

fn describe_predictions(predictions: Option<&[Prediction]>) -> String {
    match predictions {
        Some(predictions) => predictions
            .iter()
            .map(|prediction| prediction.to_string())
            .collect::<Vec<_>>()
            .join(", "),
        None => "no classification available".to_string(),
    }
}
