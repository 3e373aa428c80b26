use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Please enter a question")]
    Validation,

    #[error("Rate limit exceeded. Please try again in a moment.")]
    RateLimited,

    #[error("AI credits exhausted. Please add credits to continue.")]
    QuotaExhausted,

    #[error("{0}")]
    Upstream(String),

    #[error("Gateway call timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("HTTP request error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl GenerationError {
    /// Second line of the failure notification.
    pub fn hint(&self) -> &'static str {
        match self {
            GenerationError::Validation => "Type a question or topic you'd like explained.",
            GenerationError::RateLimited | GenerationError::Timeout(_) => {
                "Wait a little and run it again."
            }
            GenerationError::QuotaExhausted => "Top up the gateway account, then retry.",
            _ => "Please try again.",
        }
    }
}

pub type Result<T> = std::result::Result<T, GenerationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_distinguish_failure_classes() {
        assert_eq!(GenerationError::Validation.to_string(), "Please enter a question");
        assert!(GenerationError::RateLimited.to_string().contains("Rate limit"));
        assert!(GenerationError::QuotaExhausted.to_string().contains("credits exhausted"));
        assert_eq!(
            GenerationError::Upstream("AI API error: 500".into()).to_string(),
            "AI API error: 500"
        );
        assert_eq!(
            GenerationError::Timeout(Duration::from_secs(30)).to_string(),
            "Gateway call timed out after 30s"
        );
    }
}
