use crate::image_classifier::models::model_config::ModelConfig;
use chrono::{Offset, Utc};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub logger_timezone: chrono::FixedOffset,
    pub model: ModelConfig,
    /// How long the command line waits for each photo's callback.
    pub result_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            logger_timezone: Utc.fix(),
            model: ModelConfig::default(),
            result_timeout: Duration::from_secs(30),
        }
    }
}
