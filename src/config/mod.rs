use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::info;

use crate::error::{AdvisorError, AdvisorResult};
use crate::logging::LoggingConfig;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvisorConfig {
    pub catalog: CatalogConfig,
    pub llm: LlmConfig,
    pub matcher: MatcherConfig,
    pub logging: LoggingConfig,
    /// Language code for assistant replies ("en" or "ru")
    pub language: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    pub path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    pub base_url: String,
    pub model: String,
    pub extraction_temperature: f32,
    pub recommendation_temperature: f32,
    pub comparison_temperature: f32,
    /// Name of the environment variable holding the bearer token.
    /// The token itself is never written to the configuration file.
    pub credential_variable: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatcherConfig {
    /// Similarity threshold on a 0-100 scale
    pub threshold: f64,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            catalog: CatalogConfig {
                path: PathBuf::from("data/laptops.csv"),
            },
            llm: LlmConfig {
                base_url: "https://router.huggingface.co/v1".to_string(),
                model: "openai/gpt-oss-120b".to_string(),
                extraction_temperature: 0.3,
                recommendation_temperature: 0.3,
                comparison_temperature: 0.2,
                credential_variable: "HF_TOKEN".to_string(),
            },
            matcher: MatcherConfig { threshold: 75.0 },
            logging: LoggingConfig::default(),
            language: "en".to_string(),
        }
    }
}

impl AdvisorConfig {
    /// Load configuration from the default location
    pub async fn load() -> AdvisorResult<Self> {
        let config_path = get_config_path();

        if config_path.exists() {
            Self::load_from_file(&config_path).await
        } else {
            info!("No configuration file found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file
    pub async fn load_from_file<P: AsRef<std::path::Path>>(path: P) -> AdvisorResult<Self> {
        let content = tokio::fs::read_to_string(path).await?;
        let config: AdvisorConfig = toml::from_str(&content)?;

        config.validate()?;

        info!("Configuration loaded successfully");
        Ok(config)
    }

    /// Save configuration to the default location
    pub async fn save(&self) -> AdvisorResult<()> {
        let config_path = get_config_path();

        if let Some(parent) = config_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let content = toml::to_string_pretty(self)?;
        tokio::fs::write(&config_path, content).await?;

        info!("Configuration saved to: {}", config_path.display());
        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> AdvisorResult<()> {
        for (name, value) in [
            ("extraction_temperature", self.llm.extraction_temperature),
            ("recommendation_temperature", self.llm.recommendation_temperature),
            ("comparison_temperature", self.llm.comparison_temperature),
        ] {
            if !(0.0..=2.0).contains(&value) {
                return Err(AdvisorError::config(format!(
                    "{name} must be between 0.0 and 2.0"
                )));
            }
        }

        if self.llm.base_url.is_empty() {
            return Err(AdvisorError::config("llm.base_url must not be empty"));
        }

        if self.llm.model.is_empty() {
            return Err(AdvisorError::config("llm.model must not be empty"));
        }

        if self.llm.credential_variable.is_empty() {
            return Err(AdvisorError::config(
                "llm.credential_variable must not be empty",
            ));
        }

        if !(0.0..=100.0).contains(&self.matcher.threshold) {
            return Err(AdvisorError::config(
                "matcher.threshold must be between 0 and 100",
            ));
        }

        if crate::i18n::Language::from_code(&self.language).is_none() {
            return Err(AdvisorError::config(format!(
                "unsupported language code: {}",
                self.language
            )));
        }

        Ok(())
    }

    /// Read the bearer token from the configured environment variable.
    ///
    /// Absence is fatal: the assistant refuses to start without a credential.
    pub fn resolve_credential(&self) -> AdvisorResult<String> {
        match std::env::var(&self.llm.credential_variable) {
            Ok(token) if !token.trim().is_empty() => Ok(token),
            _ => Err(AdvisorError::missing_credential(
                self.llm.credential_variable.clone(),
            )),
        }
    }

    /// Resolved reply language
    pub fn resolved_language(&self) -> crate::i18n::Language {
        crate::i18n::Language::from_code(&self.language).unwrap_or_default()
    }
}

/// Get the configuration file path
fn get_config_path() -> PathBuf {
    directories::ProjectDirs::from("com", "advisor", "laptop-advisor")
        .map(|dirs| dirs.config_dir().join("config.toml"))
        .unwrap_or_else(|| {
            std::env::current_dir()
                .unwrap_or_default()
                .join("config.toml")
        })
}

/// Environment-based configuration overrides
pub struct ConfigOverrides;

impl ConfigOverrides {
    /// Apply environment variable overrides to the configuration
    pub fn apply(config: &mut AdvisorConfig) {
        if let Ok(path) = std::env::var("ADVISOR_CATALOG_PATH") {
            config.catalog.path = PathBuf::from(path);
        }

        if let Ok(base_url) = std::env::var("ADVISOR_LLM_BASE_URL") {
            config.llm.base_url = base_url;
        }

        if let Ok(model) = std::env::var("ADVISOR_LLM_MODEL") {
            config.llm.model = model;
        }

        if let Ok(threshold_str) = std::env::var("ADVISOR_MATCH_THRESHOLD") {
            if let Ok(threshold) = threshold_str.parse::<f64>() {
                config.matcher.threshold = threshold;
            }
        }

        if let Ok(language) = std::env::var("ADVISOR_LANGUAGE") {
            config.language = language;
        }

        if let Ok(log_level) = std::env::var("ADVISOR_LOG_LEVEL") {
            config.logging.level = log_level;
        }

        info!("Applied environment variable overrides");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_validates() {
        let config = AdvisorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.llm.model, "openai/gpt-oss-120b");
        assert_eq!(config.matcher.threshold, 75.0);
        assert_eq!(config.resolved_language(), crate::i18n::Language::English);
    }

    #[test]
    fn test_validate_rejects_bad_temperature() {
        let mut config = AdvisorConfig::default();
        config.llm.extraction_temperature = 3.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_threshold() {
        let mut config = AdvisorConfig::default();
        config.matcher.threshold = 140.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_unknown_language() {
        let mut config = AdvisorConfig::default();
        config.language = "xx".to_string();
        assert!(config.validate().is_err());
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let content = toml::to_string_pretty(&AdvisorConfig::default()).unwrap();
        file.write_all(content.as_bytes()).unwrap();

        let config = AdvisorConfig::load_from_file(file.path()).await.unwrap();
        assert_eq!(config.llm.base_url, "https://router.huggingface.co/v1");
    }

    #[test]
    fn test_resolve_credential() {
        let mut config = AdvisorConfig::default();

        config.llm.credential_variable = "ADVISOR_TEST_TOKEN_SET".to_string();
        std::env::set_var("ADVISOR_TEST_TOKEN_SET", "tok-123");
        assert_eq!(config.resolve_credential().unwrap(), "tok-123");

        config.llm.credential_variable = "ADVISOR_TEST_TOKEN_UNSET".to_string();
        std::env::remove_var("ADVISOR_TEST_TOKEN_UNSET");
        let err = config.resolve_credential().unwrap_err();
        assert!(!err.is_recoverable());
        assert!(err.to_string().contains("ADVISOR_TEST_TOKEN_UNSET"));
    }
}
