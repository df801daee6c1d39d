use crate::library::logger::interface::Logger;
use chrono::{DateTime, Utc};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct LoggerConsole {
    namespace: Option<String>,
    timezone: chrono::FixedOffset,
}

impl LoggerConsole {
    pub fn new(timezone: chrono::FixedOffset) -> Self {
        Self {
            namespace: None,
            timezone,
        }
    }

    fn format_line(&self, at: DateTime<Utc>, level: &str, message: &str) -> String {
        let local_time = at.with_timezone(&self.timezone);
        let formatted = local_time.format("%Y-%m-%d %I:%M:%S%.3f %p");
        match &self.namespace {
            Some(namespace) => format!("[{}] {} {}: {}", formatted, level, namespace, message),
            None => format!("[{}] {} {}", formatted, level, message),
        }
    }
}

impl Logger for LoggerConsole {
    fn info(&self, message: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        println!("{}", self.format_line(Utc::now(), "INFO", message));
        Ok(())
    }

    fn error(&self, message: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        eprintln!("{}", self.format_line(Utc::now(), "ERROR", message));
        Ok(())
    }

    fn with_namespace(&self, namespace: &str) -> Arc<dyn Logger + Send + Sync> {
        let new_namespace = match &self.namespace {
            Some(current) => format!("{}:{}", current, namespace),
            None => namespace.to_string(),
        };

        Arc::new(LoggerConsole {
            namespace: Some(new_namespace),
            timezone: self.timezone,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_format_line_without_namespace() {
        let logger = LoggerConsole::new(chrono::FixedOffset::east_opt(0).unwrap());

        let line = logger.format_line(noon(), "INFO", "hello");

        assert_eq!(line, "[2024-03-01 12:00:00.000 PM] INFO hello");
    }

    #[test]
    fn test_format_line_applies_timezone_and_namespace() {
        let logger = LoggerConsole {
            namespace: Some("image_predictor:dispatch".to_string()),
            timezone: chrono::FixedOffset::west_opt(7 * 3600).unwrap(),
        };

        let line = logger.format_line(noon(), "ERROR", "boom");

        assert_eq!(
            line,
            "[2024-03-01 05:00:00.000 AM] ERROR image_predictor:dispatch: boom"
        );
    }

    #[test]
    fn test_with_namespace_nests() {
        let logger = LoggerConsole::new(chrono::FixedOffset::east_opt(0).unwrap());

        let nested = logger.with_namespace("classifier").with_namespace("fake");

        assert!(nested.info("nested namespace").is_ok());
        assert!(nested.error("nested namespace").is_ok());
    }
}
