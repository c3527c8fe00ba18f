//! Application configuration.
//!
//! Everything is read once at startup by [`AppConfig::from_env`] and then
//! handed to the component constructors by reference. Nothing here is
//! mutated after the server starts.

use std::env;
use std::path::PathBuf;
use thiserror::Error;

const DEFAULT_STRIPE_API_BASE: &str = "https://api.stripe.com";
const DEFAULT_OPENAI_API_BASE: &str = "https://api.openai.com";
const DEFAULT_OPENAI_MODEL: &str = "gpt-4-turbo-preview";
const DEFAULT_MAX_TOKENS: u32 = 4000;
const DEFAULT_PRICE_CENTS: i64 = 1999;
const DEFAULT_CURRENCY: &str = "usd";
const DEFAULT_DOCUMENTS_DIR: &str = "./Documents";
const DEFAULT_TYPST_BIN: &str = "typst";
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;

/// Label used when a form names a document type outside the catalog.
pub const CUSTOM_DOCUMENT_LABEL: &str = "Custom Document";

const DOCUMENT_TYPES: &[(&str, &str)] = &[
    ("nda", "Non-Disclosure Agreement (NDA)"),
    ("terms", "Website Terms of Service"),
    ("privacy", "Privacy Policy"),
    ("contract", "Freelance Contract"),
    ("employee", "Employment Agreement"),
    ("partnership", "Partnership Agreement"),
];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingVar(&'static str),
    #[error("invalid value '{value}' for environment variable {name}")]
    InvalidVar { name: &'static str, value: String },
}

/// Fixed lookup from form keys to human-readable document labels.
#[derive(Debug, Clone, Copy)]
pub struct DocumentCatalog {
    entries: &'static [(&'static str, &'static str)],
}

impl Default for DocumentCatalog {
    fn default() -> Self {
        Self {
            entries: DOCUMENT_TYPES,
        }
    }
}

impl DocumentCatalog {
    pub fn label(&self, key: &str) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, label)| *label)
    }

    /// Label for `key`, or "Custom Document" when the key is unknown.
    pub fn label_or_custom(&self, key: &str) -> &'static str {
        self.label(key).unwrap_or(CUSTOM_DOCUMENT_LABEL)
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(k, _)| *k)
    }
}

#[derive(Debug, Clone)]
pub struct StripeConfig {
    pub secret_key: String,
    pub api_base: String,
    pub unit_amount: i64,
    pub currency: String,
}

#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub api_base: String,
    pub model: String,
    pub max_tokens: u32,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub stripe: StripeConfig,
    pub openai: OpenAiConfig,
    pub documents_dir: PathBuf,
    pub typst_bin: String,
    pub host: String,
    pub port: u16,
    pub catalog: DocumentCatalog,
}

impl AppConfig {
    /// Build the configuration from the process environment.
    ///
    /// `.env` is loaded first if present. The two provider keys are
    /// required; everything else falls back to a default.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let stripe = StripeConfig {
            secret_key: required("STRIPE_SECRET_KEY")?,
            api_base: optional("STRIPE_API_BASE", DEFAULT_STRIPE_API_BASE),
            unit_amount: parsed("DOCUMENT_PRICE_CENTS", DEFAULT_PRICE_CENTS)?,
            currency: optional("DOCUMENT_CURRENCY", DEFAULT_CURRENCY),
        };

        let openai = OpenAiConfig {
            api_key: required("OPENAI_API_KEY")?,
            api_base: optional("OPENAI_API_BASE", DEFAULT_OPENAI_API_BASE),
            model: optional("OPENAI_MODEL", DEFAULT_OPENAI_MODEL),
            max_tokens: parsed("OPENAI_MAX_TOKENS", DEFAULT_MAX_TOKENS)?,
        };

        Ok(Self {
            stripe,
            openai,
            documents_dir: PathBuf::from(optional("DOCUMENTS_DIR", DEFAULT_DOCUMENTS_DIR)),
            typst_bin: optional("TYPST_BIN", DEFAULT_TYPST_BIN),
            host: optional("HOST", DEFAULT_HOST),
            port: parsed("PORT", DEFAULT_PORT)?,
            catalog: DocumentCatalog::default(),
        })
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::MissingVar(name)),
    }
}

fn optional(name: &'static str, default: &str) -> String {
    env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn parsed<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidVar { name, value }),
        _ => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_known_keys() {
        let catalog = DocumentCatalog::default();
        assert_eq!(catalog.label("nda"), Some("Non-Disclosure Agreement (NDA)"));
        assert_eq!(catalog.label("partnership"), Some("Partnership Agreement"));
        assert_eq!(catalog.keys().count(), 6);
    }

    #[test]
    fn test_catalog_unknown_key_falls_back() {
        let catalog = DocumentCatalog::default();
        assert_eq!(catalog.label("lease"), None);
        assert_eq!(catalog.label_or_custom("lease"), "Custom Document");
        assert_eq!(catalog.label_or_custom(""), "Custom Document");
    }

    #[test]
    fn test_config_error_messages() {
        let missing = ConfigError::MissingVar("STRIPE_SECRET_KEY");
        assert_eq!(
            missing.to_string(),
            "missing required environment variable: STRIPE_SECRET_KEY"
        );

        let invalid = ConfigError::InvalidVar {
            name: "PORT",
            value: "eighty".to_string(),
        };
        assert!(invalid.to_string().contains("eighty"));
    }
}
