use thiserror::Error;

/// Error types for the laptop advisor
#[derive(Error, Debug)]
pub enum AdvisorError {
    // Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Invalid configuration file: {path}")]
    InvalidConfig { path: String },

    #[error("Missing credential: environment variable {variable} is not set")]
    MissingCredential { variable: String },

    // Catalog errors
    #[error("Catalog error: {message}")]
    Catalog { message: String },

    #[error("Catalog file not found: {path}")]
    CatalogNotFound { path: String },

    // Delegated generation errors
    #[error("Generation request failed: {message}")]
    Llm { message: String },

    #[error("Generation service returned status {status}: {message}")]
    LlmStatus { status: u16, message: String },

    #[error("Generation service returned no choices")]
    EmptyReply,

    #[error("Could not parse generation reply: {message}")]
    MalformedReply { message: String },

    // Wrapped library errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

impl AdvisorError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration { message: message.into() }
    }

    /// Create a missing-credential error
    pub fn missing_credential(variable: impl Into<String>) -> Self {
        Self::MissingCredential { variable: variable.into() }
    }

    /// Create a catalog error
    pub fn catalog(message: impl Into<String>) -> Self {
        Self::Catalog { message: message.into() }
    }

    /// Create a generation error
    pub fn llm(message: impl Into<String>) -> Self {
        Self::Llm { message: message.into() }
    }

    /// Create a malformed-reply error
    pub fn malformed_reply(message: impl Into<String>) -> Self {
        Self::MalformedReply { message: message.into() }
    }

    /// Check if the assistant can degrade and keep serving commands.
    ///
    /// Generation and catalog failures are absorbed by fallbacks; only
    /// configuration problems take the process down.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Llm { .. }
            | Self::LlmStatus { .. }
            | Self::EmptyReply
            | Self::MalformedReply { .. }
            | Self::Http(_)
            | Self::Json(_)
            | Self::Catalog { .. }
            | Self::CatalogNotFound { .. }
            | Self::Csv(_)
            | Self::Io(_) => true,

            Self::Configuration { .. }
            | Self::InvalidConfig { .. }
            | Self::MissingCredential { .. }
            | Self::TomlParse(_)
            | Self::TomlSerialize(_) => false,
        }
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            Self::Configuration { .. }
            | Self::InvalidConfig { .. }
            | Self::MissingCredential { .. }
            | Self::TomlParse(_)
            | Self::TomlSerialize(_) => "configuration",
            Self::Catalog { .. } | Self::CatalogNotFound { .. } | Self::Csv(_) => "catalog",
            Self::Llm { .. }
            | Self::LlmStatus { .. }
            | Self::EmptyReply
            | Self::MalformedReply { .. }
            | Self::Http(_)
            | Self::Json(_) => "llm",
            Self::Io(_) => "io",
        }
    }
}

/// Result type alias for the laptop advisor
pub type AdvisorResult<T> = std::result::Result<T, AdvisorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let error = AdvisorError::config("bad temperature");
        assert_eq!(error.category(), "configuration");
        assert!(!error.is_recoverable());
    }

    #[test]
    fn test_recoverable_errors() {
        let llm_error = AdvisorError::llm("connection refused");
        assert!(llm_error.is_recoverable());
        assert_eq!(llm_error.category(), "llm");

        let credential_error = AdvisorError::missing_credential("HF_TOKEN");
        assert!(!credential_error.is_recoverable());
        assert!(credential_error.to_string().contains("HF_TOKEN"));
    }

    #[test]
    fn test_status_error_display() {
        let error = AdvisorError::LlmStatus {
            status: 503,
            message: "overloaded".to_string(),
        };
        let rendered = error.to_string();
        assert!(rendered.contains("503"));
        assert!(rendered.contains("overloaded"));
    }
}
