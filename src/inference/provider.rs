use std::fmt;
use std::time::Duration;

use async_trait::async_trait;

/// Errors that can occur during provider operations.
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderError {
    /// Provider misconfigured (missing API key, bad URL).
    Config(String),
    /// Network-level failure (DNS, connection refused, reset).
    Network(String),
    /// API returned an error response.
    Api { status: u16, message: String },
    /// Failed to parse the provider's response.
    Parse(String),
    /// No answer within the request timeout.
    Timeout(Duration),
}

impl ProviderError {
    /// Text shown to the user in place of the reply.
    ///
    /// The service's own message is passed through untouched; everything
    /// else gets a short description.
    pub fn display_text(&self) -> String {
        match self {
            ProviderError::Api { message, .. } => message.clone(),
            ProviderError::Config(msg) => msg.clone(),
            ProviderError::Network(_) => "Failed to reach the service.".to_string(),
            ProviderError::Parse(_) => "The service sent a response that could not be read.".to_string(),
            ProviderError::Timeout(after) => {
                format!("No response after {}s.", after.as_secs())
            }
        }
    }
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderError::Config(msg) => write!(f, "config error: {msg}"),
            ProviderError::Network(msg) => write!(f, "network error: {msg}"),
            ProviderError::Api { status, message } => {
                write!(f, "API error (HTTP {status}): {message}")
            }
            ProviderError::Parse(msg) => write!(f, "parse error: {msg}"),
            ProviderError::Timeout(after) => write!(f, "timed out after {after:?}"),
        }
    }
}

impl std::error::Error for ProviderError {}

#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Returns the name of the provider.
    fn name(&self) -> &str;

    /// Sends `prompt` as a single user turn and returns the cleaned-up reply.
    async fn complete(&self, prompt: &str) -> Result<String, ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_shows_service_message_verbatim() {
        let err = ProviderError::Api {
            status: 429,
            message: "quota exceeded".to_string(),
        };
        assert_eq!(err.display_text(), "quota exceeded");
        assert_eq!(err.to_string(), "API error (HTTP 429): quota exceeded");
    }

    #[test]
    fn test_other_errors_get_generic_text() {
        assert_eq!(
            ProviderError::Network("connection refused".to_string()).display_text(),
            "Failed to reach the service."
        );
        assert_eq!(
            ProviderError::Timeout(Duration::from_secs(30)).display_text(),
            "No response after 30s."
        );
        assert!(!ProviderError::Parse("eof".to_string()).display_text().contains("eof"));
    }

    #[test]
    fn test_provider_usable_as_trait_object() {
        let provider: std::sync::Arc<dyn CompletionProvider> =
            std::sync::Arc::new(crate::test_support::NoopProvider);
        assert_eq!(provider.name(), "noop");
        assert_eq!(tokio_test::block_on(provider.complete("hi")), Ok(String::new()));
    }
}
