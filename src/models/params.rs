use serde_json::{Map, Value};

use crate::consts;
use crate::errors::{ConnectorError, Result};

/// Pagination passed straight through to the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub per_page: u64,
    pub page: u64,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            per_page: consts::DEFAULT_MAX_RESULTS,
            page: consts::DEFAULT_PAGE,
        }
    }
}

impl Page {
    fn from_params(params: &Map<String, Value>) -> Result<Self> {
        let defaults = Page::default();
        Ok(Self {
            per_page: optional_count(params, consts::JSON_PER_PAGE)?.unwrap_or(defaults.per_page),
            page: optional_count(params, consts::JSON_PAGE)?.unwrap_or(defaults.page),
        })
    }

    pub fn query(&self) -> Vec<(String, String)> {
        vec![
            ("per_page".to_string(), self.per_page.to_string()),
            ("page".to_string(), self.page.to_string()),
        ]
    }
}

/// One invokable connector action, with its parameters already checked.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    TestConnectivity,
    CreateTicket {
        subject: String,
        description: String,
        fields: Option<String>,
    },
    GetTicket {
        id: String,
    },
    UpdateTicket {
        id: String,
        fields: Option<String>,
    },
    ListTickets {
        page: Page,
    },
    RunQuery {
        query: String,
        page: Page,
    },
}

impl Action {
    pub fn parse(identifier: &str, params: &Map<String, Value>) -> Result<Self> {
        match identifier {
            consts::ACTION_ID_TEST_CONNECTIVITY => Ok(Action::TestConnectivity),
            consts::ACTION_ID_CREATE_TICKET => Ok(Action::CreateTicket {
                subject: required_str(params, consts::JSON_SUBJECT)?,
                description: required_str(params, consts::JSON_DESCRIPTION)?,
                fields: optional_fields(params)?,
            }),
            consts::ACTION_ID_GET_TICKET => Ok(Action::GetTicket {
                id: required_id(params)?,
            }),
            consts::ACTION_ID_UPDATE_TICKET => Ok(Action::UpdateTicket {
                id: required_id(params)?,
                fields: optional_fields(params)?,
            }),
            consts::ACTION_ID_LIST_TICKETS => Ok(Action::ListTickets {
                page: Page::from_params(params)?,
            }),
            consts::ACTION_ID_RUN_QUERY => Ok(Action::RunQuery {
                query: required_str(params, consts::JSON_QUERY)?,
                page: Page::from_params(params)?,
            }),
            other => Err(ConnectorError::UnsupportedAction(other.to_string())),
        }
    }

    pub fn identifier(&self) -> &'static str {
        match self {
            Action::TestConnectivity => consts::ACTION_ID_TEST_CONNECTIVITY,
            Action::CreateTicket { .. } => consts::ACTION_ID_CREATE_TICKET,
            Action::GetTicket { .. } => consts::ACTION_ID_GET_TICKET,
            Action::UpdateTicket { .. } => consts::ACTION_ID_UPDATE_TICKET,
            Action::ListTickets { .. } => consts::ACTION_ID_LIST_TICKETS,
            Action::RunQuery { .. } => consts::ACTION_ID_RUN_QUERY,
        }
    }
}

fn required_str(params: &Map<String, Value>, key: &str) -> Result<String> {
    match params.get(key) {
        Some(Value::String(s)) if !s.is_empty() => Ok(s.clone()),
        Some(Value::Null) | None => Err(ConnectorError::MissingParameter(key.to_string())),
        Some(Value::String(_)) => Err(ConnectorError::MissingParameter(key.to_string())),
        Some(_) => Err(ConnectorError::InvalidParameter(key.to_string())),
    }
}

// Hosts send ticket ids as either numbers or strings
fn required_id(params: &Map<String, Value>) -> Result<String> {
    match params.get(consts::JSON_TICKET_ID) {
        Some(Value::Number(n)) => Ok(n.to_string()),
        _ => required_str(params, consts::JSON_TICKET_ID),
    }
}

fn optional_fields(params: &Map<String, Value>) -> Result<Option<String>> {
    match params.get(consts::JSON_FIELDS) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(value @ Value::Object(_)) => Ok(Some(value.to_string())),
        Some(_) => Err(ConnectorError::InvalidParameter(consts::JSON_FIELDS.to_string())),
    }
}

fn optional_count(params: &Map<String, Value>, key: &str) -> Result<Option<u64>> {
    let parsed = match params.get(key) {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Number(n)) => n.as_u64(),
        Some(Value::String(s)) => s.trim().parse::<u64>().ok(),
        Some(_) => None,
    };

    match parsed {
        Some(count) if count > 0 => Ok(Some(count)),
        _ => Err(ConnectorError::InvalidParameter(key.to_string())),
    }
}
