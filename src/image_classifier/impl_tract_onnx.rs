use crate::image_classifier::interface::{
    Classification, ClassificationRequest, ClassifierCompletion, ClassifierResults,
    ImageClassifier,
};
use crate::image_classifier::models::model_config::ModelConfig;
use crate::image_classifier::tract::image::prepare_tensor;
use crate::library::logger::interface::Logger;
use std::sync::mpsc::Sender;
use std::sync::Arc;
use tract_onnx::prelude::*;

pub struct ImageClassifierTractOnnx {
    model: Arc<TypedRunnableModel<TypedModel>>,
    config: ModelConfig,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl ImageClassifierTractOnnx {
    pub fn new(
        config: ModelConfig,
        logger: Arc<dyn Logger + Send + Sync>,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let logger = logger.with_namespace("image_classifier").with_namespace("tract_onnx");
        let (height, width) = config.input_shape;

        logger.info(&format!("Loading model from {}", config.onnx_model_path))?;

        let model = tract_onnx::onnx()
            .model_for_path(&config.onnx_model_path)?
            .with_input_fact(0, f32::fact([1, 3, height as usize, width as usize]).into())?
            .into_optimized()?
            .into_runnable()?;

        Ok(Self {
            model: Arc::new(model),
            config,
            logger,
        })
    }
}

fn classify(
    model: &TypedRunnableModel<TypedModel>,
    config: &ModelConfig,
    request: &ClassificationRequest,
) -> Result<Option<ClassifierResults>, Box<dyn std::error::Error + Send + Sync>> {
    let (height, width) = config.input_shape;
    let input = prepare_tensor(
        &request.pixels,
        request.orientation,
        request.crop_and_scale,
        width,
        height,
    );

    let outputs = model.run(tvec!(input.into_tvalue()))?;

    let Some(output) = outputs.first() else {
        return Ok(None);
    };

    let output = output.to_array_view::<f32>()?;
    let scores: Vec<f32> = output.iter().copied().collect();

    Ok(Some(results_from_scores(
        output.shape(),
        &scores,
        &config.labels,
        config.apply_softmax,
    )))
}

/// Maps a score vector of shape `[1, labels]` or `[labels]` to classifications
/// ranked by descending confidence.
pub fn results_from_scores(
    shape: &[usize],
    scores: &[f32],
    labels: &[String],
    apply_softmax: bool,
) -> ClassifierResults {
    let is_label_vector = match shape {
        [n] | [1, n] => *n == labels.len(),
        _ => false,
    };

    if !is_label_vector {
        return ClassifierResults::Unexpected(format!(
            "tensor of shape {:?} for {} labels",
            shape,
            labels.len()
        ));
    }

    let confidences = if apply_softmax {
        softmax(scores)
    } else {
        scores.to_vec()
    };

    let mut classifications: Vec<Classification> = labels
        .iter()
        .zip(confidences)
        .map(|(label, confidence)| Classification::new(label, confidence))
        .collect();

    classifications.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));

    ClassifierResults::Classifications(classifications)
}

fn softmax(scores: &[f32]) -> Vec<f32> {
    let max = scores.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = scores.iter().map(|score| (score - max).exp()).collect();
    let total: f32 = exps.iter().sum();
    exps.into_iter().map(|e| e / total).collect()
}

impl ImageClassifier for ImageClassifierTractOnnx {
    fn submit(&self, request: ClassificationRequest, completions: Sender<ClassifierCompletion>) {
        let model = self.model.clone();
        let config = self.config.clone();
        let logger = self.logger.clone();

        std::thread::spawn(move || {
            let _ = logger.info(&format!("Classifying request {}...", request.token));

            let outcome = classify(&model, &config, &request);

            if let Ok(Some(results)) = &outcome {
                let _ = logger.info(&format!(
                    "Request {} classified: {:?}",
                    request.token, results
                ));
            }

            let _ = completions.send(ClassifierCompletion {
                token: request.token,
                outcome,
            });
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels() -> Vec<String> {
        ModelConfig::default().labels
    }

    #[test]
    fn test_results_ranked_by_confidence() {
        let results = results_from_scores(&[1, 3], &[0.03, 0.05, 0.92], &labels(), false);

        assert_eq!(
            results,
            ClassifierResults::Classifications(vec![
                Classification::new("rabbit", 0.92),
                Classification::new("dog", 0.05),
                Classification::new("cat", 0.03),
            ])
        );
    }

    #[test]
    fn test_results_accept_flat_vector() {
        let results = results_from_scores(&[3], &[0.7, 0.2, 0.1], &labels(), false);

        match results {
            ClassifierResults::Classifications(classifications) => {
                assert_eq!(classifications[0], Classification::new("cat", 0.7));
            }
            other => panic!("Unexpected results: {:?}", other),
        }
    }

    #[test]
    fn test_results_softmax_sums_to_one() {
        let results = results_from_scores(&[1, 3], &[2.0, 1.0, 0.1], &labels(), true);

        match results {
            ClassifierResults::Classifications(classifications) => {
                let total: f32 = classifications.iter().map(|c| c.confidence).sum();
                assert!((total - 1.0).abs() < 0.0001);
                assert_eq!(classifications[0].label, "cat");
                assert!(classifications
                    .iter()
                    .all(|c| (0.0..=1.0).contains(&c.confidence)));
            }
            other => panic!("Unexpected results: {:?}", other),
        }
    }

    #[test]
    fn test_results_with_wrong_shape_are_unexpected() {
        let results = results_from_scores(&[1, 1000], &vec![0.0; 1000], &labels(), false);
        assert!(matches!(results, ClassifierResults::Unexpected(_)));

        let results = results_from_scores(&[1, 25200, 85], &[], &labels(), false);
        assert!(matches!(results, ClassifierResults::Unexpected(_)));
    }

    #[test]
    fn test_missing_model_is_an_error() {
        let config = ModelConfig {
            onnx_model_path: "./does/not/exist.onnx".to_string(),
            ..ModelConfig::default()
        };
        let logger = Arc::new(crate::library::logger::impl_console::LoggerConsole::new(
            chrono::FixedOffset::east_opt(0).unwrap(),
        ));

        assert!(ImageClassifierTractOnnx::new(config, logger).is_err());
    }
}
