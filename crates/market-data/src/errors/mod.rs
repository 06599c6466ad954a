//! Error types and failure classification for the market data crate.
//!
//! This module provides:
//! - [`MarketDataError`]: The main error enum for all fetch operations
//! - [`FailureKind`]: Coarse classification used in logs and warnings

mod kind;

pub use kind::FailureKind;

use thiserror::Error;

/// Errors that can occur while fetching from an upstream source.
///
/// Every variant maps to a [`FailureKind`] via [`kind`](Self::kind).
#[derive(Error, Debug)]
pub enum MarketDataError {
    /// A credential required by the provider is missing.
    #[error("Configuration error: {provider} - {message}")]
    Configuration {
        /// The provider that cannot be called
        provider: String,
        /// What is missing
        message: String,
    },

    /// The provider reported a failure of its own.
    #[error("Provider error: {provider} - {message}")]
    ProviderError {
        /// The provider that returned the error
        provider: String,
        /// The error message from the provider
        message: String,
    },

    /// The provider returned data that failed validation.
    #[error("Validation failed: {message}")]
    ValidationFailed {
        /// Description of the validation failure
        message: String,
    },

    /// The requested symbol was not present in the provider response.
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    /// The symbol exists but has no quotes in the requested period.
    #[error("No data for date range")]
    NoDataForRange,

    /// The request to the provider timed out.
    #[error("Timeout: {provider}")]
    Timeout {
        /// The provider that timed out
        provider: String,
    },

    /// A network error occurred while communicating with a provider.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// A cached payload could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The background fetch task did not complete.
    #[error("Fetch task failed: {0}")]
    TaskFailed(String),
}

impl MarketDataError {
    /// Returns the failure classification for this error.
    ///
    /// # Examples
    ///
    /// ```
    /// use goldwatch_market_data::errors::{FailureKind, MarketDataError};
    ///
    /// let error = MarketDataError::Timeout { provider: "YAHOO".to_string() };
    /// assert_eq!(error.kind(), FailureKind::Transport);
    ///
    /// let error = MarketDataError::Configuration {
    ///     provider: "NEWS_API".to_string(),
    ///     message: "NEWS_API_KEY is not set".to_string(),
    /// };
    /// assert_eq!(error.kind(), FailureKind::Configuration);
    /// ```
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Configuration { .. } => FailureKind::Configuration,

            Self::ProviderError { .. }
            | Self::ValidationFailed { .. }
            | Self::SymbolNotFound(_)
            | Self::NoDataForRange
            | Self::Serialization(_) => FailureKind::Upstream,

            Self::Timeout { .. } | Self::Network(_) | Self::TaskFailed(_) => FailureKind::Transport,
        }
    }

    /// Map a reqwest error, keeping timeouts distinct from other transport failures.
    pub(crate) fn from_transport(provider: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout {
                provider: provider.to_string(),
            }
        } else {
            Self::Network(err)
        }
    }

    pub(crate) fn missing_credential(provider: &str, variable: &str) -> Self {
        Self::Configuration {
            provider: provider.to_string(),
            message: format!("{} is not set", variable),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_kind() {
        let error = MarketDataError::missing_credential("METAL_PRICE_API", "METAL_PRICE_API_KEY");
        assert_eq!(error.kind(), FailureKind::Configuration);
    }

    #[test]
    fn test_provider_error_is_upstream() {
        let error = MarketDataError::ProviderError {
            provider: "NEWS_API".to_string(),
            message: "rateLimited".to_string(),
        };
        assert_eq!(error.kind(), FailureKind::Upstream);
    }

    #[test]
    fn test_validation_failed_is_upstream() {
        let error = MarketDataError::ValidationFailed {
            message: "Invalid rate (zero)".to_string(),
        };
        assert_eq!(error.kind(), FailureKind::Upstream);
    }

    #[test]
    fn test_timeout_is_transport() {
        let error = MarketDataError::Timeout {
            provider: "YAHOO".to_string(),
        };
        assert_eq!(error.kind(), FailureKind::Transport);
    }

    #[test]
    fn test_error_display() {
        let error = MarketDataError::missing_credential("NEWS_API", "NEWS_API_KEY");
        assert_eq!(
            format!("{}", error),
            "Configuration error: NEWS_API - NEWS_API_KEY is not set"
        );

        let error = MarketDataError::ProviderError {
            provider: "METAL_PRICE_API".to_string(),
            message: "Invalid API key".to_string(),
        };
        assert_eq!(
            format!("{}", error),
            "Provider error: METAL_PRICE_API - Invalid API key"
        );

        let error = MarketDataError::SymbolNotFound("^GSPC".to_string());
        assert_eq!(format!("{}", error), "Symbol not found: ^GSPC");
    }
}
