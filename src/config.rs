use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use federation_contact::SITEVERIFY_URL;
use federation_notification::EmailConfig;
use serde::Deserialize;
use std::{env, time::Duration};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub email: EmailConfig,
    pub recaptcha: RecaptchaConfig,
    #[serde(default)]
    pub locale: LocaleConfig,
    #[serde(default)]
    pub contact: ContactConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RecaptchaConfig {
    /// Public key rendered into the challenge widget.
    pub site_key: String,
    pub secret_key: String,
    #[serde(default = "default_verify_url")]
    pub verify_url: String,
}

fn default_verify_url() -> String {
    SITEVERIFY_URL.to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct LocaleConfig {
    /// Redirect first-time visitors according to `Accept-Language` when no
    /// locale cookie is set.
    #[serde(default = "default_detect_from_header")]
    pub detect_from_header: bool,
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self {
            detect_from_header: default_detect_from_header(),
        }
    }
}

fn default_detect_from_header() -> bool {
    true
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ContactConfig {
    /// Timeout applied to remote submissions, none when unset.
    #[serde(default)]
    pub submit_timeout_secs: Option<u64>,
}

impl ContactConfig {
    pub fn submit_timeout(&self) -> Option<Duration> {
        self.submit_timeout_secs.map(Duration::from_secs)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from file and environment variables
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (FEDERATION__SERVER__PORT, etc.)
    /// 2. Config file specified by path
    /// 3. Hardcoded defaults
    pub fn load(config_path: Option<String>) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder();

        builder = builder
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("email.smtp_host", "localhost")?
            .set_default("email.smtp_port", 1025)?
            .set_default("email.smtp_username", "")?
            .set_default("email.smtp_password", "")?
            .set_default("email.from_address", "Federation <noreply@federation.local>")?
            .set_default("email.contact_address", "info@federation.local")?
            .set_default("recaptcha.site_key", "")?
            .set_default("recaptcha.secret_key", "")?;

        // Load config file if path provided or CONFIG_PATH env var set
        let config_file_path = config_path
            .or_else(|| env::var("CONFIG_PATH").ok())
            .unwrap_or_else(|| "config/default.toml".to_string());

        // Optional, ignored if not found
        if std::path::Path::new(&config_file_path).exists() {
            builder = builder.add_source(File::with_name(&config_file_path));
        }

        builder = builder.add_source(
            Environment::with_prefix("FEDERATION")
                .separator("__")
                .try_parsing(true),
        );

        // Also support legacy environment variables without prefix
        if let Ok(secret_key) = env::var("RECAPTCHA_SECRET_KEY") {
            builder = builder.set_override("recaptcha.secret_key", secret_key)?;
        }
        if let Ok(site_key) = env::var("RECAPTCHA_SITE_KEY") {
            builder = builder.set_override("recaptcha.site_key", site_key)?;
        }

        builder.build()?.try_deserialize()
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.server.port == 0 {
            return Err("Server port must be greater than 0".to_string());
        }
        if self.recaptcha.site_key.trim().is_empty() {
            return Err("reCAPTCHA site key is not configured".to_string());
        }
        if self.recaptcha.secret_key.trim().is_empty() {
            return Err("reCAPTCHA secret key is not configured".to_string());
        }
        if self.contact.submit_timeout_secs == Some(0) {
            return Err("Contact submit timeout must be greater than 0".to_string());
        }
        Ok(())
    }
}
