// Probe configuration: target service, payment literals, contract bounds
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

pub const DEFAULT_BASE_URL: &str = "https://jobprep-7.preview.emergentagent.com/api";
pub const DEFAULT_RAZORPAY_KEY_ID: &str = "rzp_test_SAqchxHGMT5s3I";
pub const DEFAULT_CONFIG_PATH: &str = "config/probe.json";

/// Everything the probe needs to reach the service and the literal
/// values it asserts against.
#[derive(Debug, Clone)]
pub struct ProbeConfig {
    pub base_url: String,
    pub razorpay_key_id: String,
    /// Shared key secret used to compute payment signatures. Sourced
    /// only from the RAZORPAY_KEY_SECRET environment variable, never
    /// from a config file or source text. Absent means the payment
    /// verification check cannot run.
    pub razorpay_key_secret: Option<String>,
    /// Order amount in the gateway's smallest currency unit (paise).
    pub expected_amount: u64,
    pub expected_currency: String,
    pub min_roles: usize,
    pub user_email: String,
}

/// On-disk shape of config/probe.json. Every field optional; missing
/// fields keep their defaults. The key secret is deliberately not part
/// of this shape.
#[derive(Debug, Default, Deserialize)]
pub struct ProbeFile {
    pub base_url: Option<String>,
    pub razorpay_key_id: Option<String>,
    pub expected_amount: Option<u64>,
    pub expected_currency: Option<String>,
    pub min_roles: Option<usize>,
    pub user_email: Option<String>,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            razorpay_key_id: DEFAULT_RAZORPAY_KEY_ID.to_string(),
            razorpay_key_secret: None,
            expected_amount: 4900,
            expected_currency: "INR".to_string(),
            min_roles: 3,
            user_email: "test@example.com".to_string(),
        }
    }
}

impl ProbeConfig {
    /// Load configuration: defaults, overlaid by the config file (if
    /// any), overlaid by environment variables.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_PATH);
                if default_path.exists() {
                    Self::from_file(default_path)?
                } else {
                    Self::default()
                }
            }
        };
        Ok(config.with_env())
    }

    /// Load from an explicit JSON config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let file: ProbeFile = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(Self::default().merged(file))
    }

    /// Overlay values from a parsed config file.
    pub fn merged(mut self, file: ProbeFile) -> Self {
        if let Some(base_url) = file.base_url {
            self.base_url = base_url;
        }
        if let Some(key_id) = file.razorpay_key_id {
            self.razorpay_key_id = key_id;
        }
        if let Some(amount) = file.expected_amount {
            self.expected_amount = amount;
        }
        if let Some(currency) = file.expected_currency {
            self.expected_currency = currency;
        }
        if let Some(min_roles) = file.min_roles {
            self.min_roles = min_roles;
        }
        if let Some(user_email) = file.user_email {
            self.user_email = user_email;
        }
        self
    }

    /// Overlay environment variables. Applied last so the environment
    /// wins over file values; the secret has no other source.
    pub fn with_env(mut self) -> Self {
        if let Ok(base_url) = std::env::var("PROBE_BASE_URL") {
            if !base_url.is_empty() {
                self.base_url = base_url;
            }
        }
        if let Ok(key_id) = std::env::var("RAZORPAY_KEY_ID") {
            if !key_id.is_empty() {
                self.razorpay_key_id = key_id;
            }
        }
        if let Ok(secret) = std::env::var("RAZORPAY_KEY_SECRET") {
            if !secret.is_empty() {
                self.razorpay_key_secret = Some(secret);
            }
        }
        self
    }
}
