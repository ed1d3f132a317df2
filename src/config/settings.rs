use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::PathBuf;

use crate::consts;
use crate::errors::ConnectorError;

/// Asset configuration as the host hands it over.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AssetConfig {
    pub url: String,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,
    #[serde(default = "default_verify_server_cert")]
    pub verify_server_cert: bool,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_verify_server_cert() -> bool {
    true
}

fn default_timeout_secs() -> u64 {
    consts::DEFAULT_TIMEOUT_SECS
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            username: String::new(),
            password: None,
            api_token: None,
            verify_server_cert: default_verify_server_cert(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl AssetConfig {
    pub fn from_value(value: Value) -> crate::errors::Result<Self> {
        serde_json::from_value(value).map_err(|e| ConnectorError::ConfigInvalid(e.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMethod {
    Password,
    ApiToken,
}

impl AuthMethod {
    pub fn label(&self) -> &'static str {
        match self {
            AuthMethod::Password => "password",
            AuthMethod::ApiToken => "api token",
        }
    }
}

/// Everything the REST helper needs to reach and authenticate against the API.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub base_url: String,
    pub host: String,
    pub username: String,
    pub key: String,
    pub auth_method: AuthMethod,
    pub verify_server_cert: bool,
    pub timeout_secs: u64,
}

impl Credentials {
    pub fn from_config(config: &AssetConfig) -> crate::errors::Result<Self> {
        let base_url = config.url.trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(ConnectorError::ConfigInvalid(format!(
                "'{}' is required",
                consts::JSON_DEVICE_URL
            )));
        }
        if config.username.is_empty() {
            return Err(ConnectorError::ConfigInvalid(format!(
                "'{}' is required",
                consts::JSON_USERNAME
            )));
        }

        let host = match base_url.find("//") {
            Some(idx) => base_url[idx + 2..].to_string(),
            None => base_url.clone(),
        };

        let password = config.password.as_deref().filter(|p| !p.is_empty());
        let api_token = config.api_token.as_deref().filter(|t| !t.is_empty());

        let (username, key, auth_method) = match (password, api_token) {
            (Some(password), _) => (config.username.clone(), password.to_string(), AuthMethod::Password),
            (None, Some(token)) => (
                format!("{}/token", config.username),
                token.to_string(),
                AuthMethod::ApiToken,
            ),
            (None, None) => return Err(ConnectorError::CredentialsMissing),
        };

        Ok(Self {
            base_url,
            host,
            username,
            key,
            auth_method,
            verify_server_cert: config.verify_server_cert,
            timeout_secs: config.timeout_secs,
        })
    }
}

/// Locally stored default asset, used by the debug harness.
#[derive(Debug, Deserialize, Serialize)]
pub struct Settings {
    pub asset: AssetConfig,
}

impl Settings {
    /// Loads `config.toml`, with `ZENDESK_ASSET__<KEY>` variables layered on top.
    pub fn load() -> crate::errors::Result<Self> {
        let config_path = Self::config_path()?;

        let layered = ::config::Config::builder()
            .add_source(
                ::config::File::from(config_path.as_path())
                    .format(::config::FileFormat::Toml)
                    .required(false),
            )
            .add_source(
                ::config::Environment::with_prefix("ZENDESK")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| ConnectorError::ConfigInvalid(e.to_string()))?;

        match layered.try_deserialize::<Settings>() {
            Ok(settings) => Ok(settings),
            Err(_) if !config_path.exists() => Err(ConnectorError::ConfigNotFound),
            Err(e) => Err(ConnectorError::ConfigInvalid(e.to_string())),
        }
    }

    /// Writes the stored asset back, readable by the owner only since it holds secrets.
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .context("Failed to create config directory")?;
        }

        let config_str = toml::to_string_pretty(self)
            .context("Failed to serialize config")?;

        std::fs::write(&config_path, config_str)
            .context("Failed to write config file")?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = std::fs::metadata(&config_path)?.permissions();
            perms.set_mode(0o600);
            std::fs::set_permissions(&config_path, perms)?;
        }

        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// `~/.zendesk-connector`
    pub fn config_dir() -> Result<PathBuf> {
        let home = std::env::var("HOME")
            .context("HOME environment variable not set")?;
        Ok(PathBuf::from(home).join(".zendesk-connector"))
    }
}

pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 8 {
        return "***".to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}***{}", head, tail)
}
