//! CLI configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `LOGOS_DATA_DIR` - Directory holding the cart slot (default: .logos)
//! - `LOGOS_CART_KEY` - Cart slot key, used as a file name (default: `logos_cart`)
//! - `LOGOS_CATALOG_PATH` - Service catalog YAML file
//! - `LOGOS_PAYMENT_PROVIDER` - `stripe` or `paypal` (default: stripe)
//! - `LOGOS_PAYMENT_API_KEY` - Payment provider API key
//! - `LOGOS_NOTIFICATION_MS` - How long notifications stay up (default: 3000)

use std::path::PathBuf;
use std::time::Duration;

use logos_cart::{DEFAULT_CART_KEY, PaymentProvider, validate_key};
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

/// Blocklist of placeholder patterns left over from sample configs (case-insensitive).
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your_",
    "your-",
    "changeme",
    "placeholder",
    "example",
    "xxx",
    "todo",
    "insert",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// CLI configuration.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Directory holding the cart slot
    pub data_dir: PathBuf,
    /// Cart slot key
    pub cart_key: String,
    /// Service catalog file
    pub catalog_path: Option<PathBuf>,
    /// Payment gateway settings
    pub payment: PaymentConfig,
    /// How long notifications stay on screen
    pub notification_duration: Duration,
}

/// Payment gateway settings.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct PaymentConfig {
    pub provider: PaymentProvider,
    pub api_key: Option<SecretString>,
}

impl std::fmt::Debug for PaymentConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymentConfig")
            .field("provider", &self.provider)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl CliConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable has an invalid value or the API
    /// key looks like a placeholder.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through `lookup` instead of the process environment.
    ///
    /// # Errors
    ///
    /// Same as [`Self::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get_or = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let data_dir = PathBuf::from(get_or("LOGOS_DATA_DIR", ".logos"));

        let cart_key = get_or("LOGOS_CART_KEY", DEFAULT_CART_KEY);
        if cart_key.trim().is_empty() {
            return Err(ConfigError::InvalidEnvVar(
                "LOGOS_CART_KEY".to_string(),
                "must not be empty".to_string(),
            ));
        }
        validate_key(&cart_key)
            .map_err(|e| ConfigError::InvalidEnvVar("LOGOS_CART_KEY".to_string(), e.to_string()))?;

        let catalog_path = lookup("LOGOS_CATALOG_PATH").map(PathBuf::from);

        let provider = get_or("LOGOS_PAYMENT_PROVIDER", "stripe")
            .parse::<PaymentProvider>()
            .map_err(|e| ConfigError::InvalidEnvVar("LOGOS_PAYMENT_PROVIDER".to_string(), e))?;

        let api_key = lookup("LOGOS_PAYMENT_API_KEY")
            .map(|value| {
                validate_api_key(&value, "LOGOS_PAYMENT_API_KEY")?;
                Ok::<_, ConfigError>(SecretString::from(value))
            })
            .transpose()?;

        let notification_ms = get_or("LOGOS_NOTIFICATION_MS", "3000")
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("LOGOS_NOTIFICATION_MS".to_string(), e.to_string())
            })?;

        Ok(Self {
            data_dir,
            cart_key,
            catalog_path,
            payment: PaymentConfig { provider, api_key },
            notification_duration: Duration::from_millis(notification_ms),
        })
    }
}

/// Reject API keys copied from sample configs.
fn validate_api_key(value: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = value.to_lowercase();

    if lower.trim().is_empty() {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            "is empty".to_string(),
        ));
    }

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    Ok(())
}

impl PaymentConfig {
    /// Whether an API key is configured and non-empty.
    #[must_use]
    pub fn has_api_key(&self) -> bool {
        self.api_key
            .as_ref()
            .is_some_and(|key| !key.expose_secret().is_empty())
    }
}
