use colored::*;
use serde_json::Value;
use std::fmt;

use crate::consts;

#[derive(Debug)]
pub enum ConnectorError {
    // Configuration errors
    ConfigNotFound,
    ConfigInvalid(String),
    CredentialsMissing,

    // REST errors
    ServerConnection(String),
    JsonParse(String),
    FromServer {
        status: u16,
        detail: String,
        payload: Value,
    },

    // Parameter errors
    MissingParameter(String),
    InvalidParameter(String),
    FieldsParse(String),
    EmptyFields,
    InvalidCustomFields,
    InvalidCustomFieldEntry,

    // Action errors
    NoData,
    UnsupportedAction(String),

    // Generic error
    Other(String),
}

impl ConnectorError {
    /// Error body returned by the server, when there was one.
    pub fn payload(&self) -> Option<&Value> {
        match self {
            ConnectorError::FromServer { payload, .. } => Some(payload),
            _ => None,
        }
    }

    /// Terminal rendering with a hint on how to recover.
    pub fn render(&self) -> String {
        let headline = format!("{}", self).red().bold();
        let hint = match self {
            ConnectorError::ConfigNotFound | ConnectorError::ConfigInvalid(_) => Some(format!(
                "   To fix:\n   1. Set a value: {}\n   2. Or pass a \"config\" object in the input JSON",
                "zendesk-connector config set asset.url https://example.zendesk.com".green()
            )),
            ConnectorError::CredentialsMissing => Some(format!(
                "   To fix:\n   1. Set a password: {}\n   2. Or an API token: {}",
                "zendesk-connector config set asset.password <password>".green(),
                "zendesk-connector config set asset.api_token <token>".green()
            )),
            ConnectorError::ServerConnection(_) => Some(
                "   To fix:\n   1. Check the asset url\n   2. Verify you can reach the Zendesk endpoints\n   3. Try again in a moment"
                    .to_string(),
            ),
            ConnectorError::UnsupportedAction(_) => Some(format!(
                "   Supported actions: {}",
                consts::ACTION_IDS.join(", ").cyan()
            )),
            _ => None,
        };

        match hint {
            Some(hint) => format!("{}\n\n{}", headline, hint),
            None => headline.to_string(),
        }
    }
}

impl fmt::Display for ConnectorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectorError::ConfigNotFound => write!(f, "Configuration not found"),
            ConnectorError::ConfigInvalid(msg) => write!(f, "Invalid configuration: {}", msg),
            ConnectorError::CredentialsMissing => write!(f, "{}", consts::ERR_CREDENTIALS_MISSING),

            ConnectorError::ServerConnection(msg) => {
                write!(f, "{}: {}", consts::ERR_SERVER_CONNECTION, msg)
            }
            ConnectorError::JsonParse(msg) => write!(f, "{}", msg),
            ConnectorError::FromServer { status, detail, .. } => {
                write!(f, "API failed, Status code: {}, Detail: {}", status, detail)
            }

            ConnectorError::MissingParameter(key) => {
                write!(f, "Missing required parameter: {}", key)
            }
            ConnectorError::InvalidParameter(key) => {
                write!(f, "Invalid value for parameter {}", key)
            }
            ConnectorError::FieldsParse(detail) => {
                write!(f, "{}: {}", consts::ERR_FIELDS_JSON_PARSE, detail)
            }
            ConnectorError::EmptyFields => write!(f, "{}", consts::ERR_EMPTY_FIELDS),
            ConnectorError::InvalidCustomFields => {
                write!(f, "{}", consts::ERR_INVALID_CUSTOM_FIELDS)
            }
            ConnectorError::InvalidCustomFieldEntry => {
                write!(f, "{}", consts::ERR_INVALID_CUSTOM_FIELD_ENTRY)
            }

            ConnectorError::NoData => write!(f, "{}", consts::ERR_NO_DATA),
            ConnectorError::UnsupportedAction(action) => {
                write!(f, "Unsupported action: {}", action)
            }

            ConnectorError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for ConnectorError {}

// Conversion from anyhow::Error
impl From<anyhow::Error> for ConnectorError {
    fn from(err: anyhow::Error) -> Self {
        ConnectorError::Other(err.to_string())
    }
}

impl From<std::io::Error> for ConnectorError {
    fn from(err: std::io::Error) -> Self {
        ConnectorError::Other(err.to_string())
    }
}

// Every reqwest failure we see happens before a status is classified
impl From<reqwest::Error> for ConnectorError {
    fn from(err: reqwest::Error) -> Self {
        ConnectorError::ServerConnection(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ConnectorError>;
