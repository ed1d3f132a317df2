use log::{debug, info};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;

use crate::config::settings::{AuthMethod, Credentials};
use crate::consts;
use crate::errors::{ConnectorError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HttpVerb {
    #[default]
    Get,
    Post,
    Put,
}

impl HttpVerb {
    pub fn carries_body(&self) -> bool {
        matches!(self, HttpVerb::Post | HttpVerb::Put)
    }

    fn method(&self) -> Method {
        match self {
            HttpVerb::Get => Method::GET,
            HttpVerb::Post => Method::POST,
            HttpVerb::Put => Method::PUT,
        }
    }
}

/// One outbound call, relative to the API root.
#[derive(Debug, Clone)]
pub struct RestCall {
    endpoint: String,
    verb: HttpVerb,
    headers: HeaderMap,
    params: Vec<(String, String)>,
    body: Option<Value>,
}

impl RestCall {
    pub fn get(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            verb: HttpVerb::Get,
            headers: HeaderMap::new(),
            params: Vec::new(),
            body: None,
        }
    }

    pub fn post(endpoint: impl Into<String>, body: Value) -> Self {
        Self {
            verb: HttpVerb::Post,
            body: Some(body),
            ..Self::get(endpoint)
        }
    }

    pub fn put(endpoint: impl Into<String>, body: Value) -> Self {
        Self {
            verb: HttpVerb::Put,
            body: Some(body),
            ..Self::get(endpoint)
        }
    }

    pub fn with_params(mut self, params: Vec<(String, String)>) -> Self {
        self.params.extend(params);
        self
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers.extend(headers);
        self
    }
}

pub struct ZendeskClient {
    client: Client,
    base_url: String,
    username: String,
    key: String,
    auth_method: AuthMethod,
}

impl ZendeskClient {
    pub fn new(credentials: &Credentials) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(credentials.timeout_secs))
            .danger_accept_invalid_certs(!credentials.verify_server_cert)
            .build()?;

        Ok(Self {
            client,
            base_url: credentials.base_url.clone(),
            username: credentials.username.clone(),
            key: credentials.key.clone(),
            auth_method: credentials.auth_method,
        })
    }

    /// Issues `call` and classifies the outcome. Every request to the API goes through here.
    pub async fn make_rest_call(&self, call: RestCall) -> Result<Value> {
        let url = format!("{}{}{}", self.base_url, consts::API_URI, call.endpoint);

        let mut headers = call.headers;
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if call.verb.carries_body() {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }

        info!("Using {} for authentication", self.auth_method.label());
        debug!("REST {:?} {}", call.verb, url);

        let mut request = self
            .client
            .request(call.verb.method(), &url)
            .basic_auth(&self.username, Some(&self.key))
            .headers(headers);

        if !call.params.is_empty() {
            request = request.query(&call.params);
        }

        if let Some(body) = &call.body {
            let text = serde_json::to_string(body)
                .map_err(|e| ConnectorError::Other(e.to_string()))?;
            request = request.body(text);
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let text = response.text().await?;

        classify_response(status, &text)
    }
}

pub fn classify_response(status: u16, text: &str) -> Result<Value> {
    let parsed = serde_json::from_str::<Value>(text);

    if consts::EMPTY_RESPONSE_STATUS_CODES.contains(&status) {
        return Ok(parsed.unwrap_or(Value::Null));
    }

    let body = match parsed {
        Ok(body) => body,
        Err(_) => return Err(ConnectorError::JsonParse(parse_failure_message(text))),
    };

    if (200..=399).contains(&status) {
        return Ok(body);
    }

    let detail = body.to_string().replace(['{', '}'], "");

    Err(ConnectorError::FromServer {
        status,
        detail,
        payload: body,
    })
}

fn parse_failure_message(raw: &str) -> String {
    let message = format!("Unable to parse reply as a Json, raw string reply: '{}'", raw);
    if message.chars().count() > consts::MAX_PARSE_ERROR_LEN {
        consts::ERR_JSON_PARSE_GENERIC.to_string()
    } else {
        message
    }
}

/// Reads a successful response body into one of the typed envelopes.
/// A bodiless 201/204 reads as an empty envelope.
pub fn decode<T: DeserializeOwned + Default>(body: Value) -> Result<T> {
    if body.is_null() {
        return Ok(T::default());
    }
    serde_json::from_value(body)
        .map_err(|e| ConnectorError::Other(format!("Unexpected response format: {}", e)))
}
