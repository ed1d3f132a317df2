use log::debug;
use serde_json::{json, Map, Value};

use crate::api::zendesk::{decode, RestCall, ZendeskClient};
use crate::errors::{ConnectorError, Result};
use crate::models::ticket::TicketFieldList;

const CUSTOM_FIELDS_KEY: &str = "custom_fields";

/// Parses the JSON-encoded `fields` parameter. It has to be an object.
pub fn parse_fields(raw: Option<&str>) -> Result<Option<Map<String, Value>>> {
    let raw = match raw {
        Some(raw) => raw,
        None => return Ok(None),
    };

    let value: Value =
        serde_json::from_str(raw).map_err(|e| ConnectorError::FieldsParse(e.to_string()))?;

    match value {
        Value::Object(map) => Ok(Some(map)),
        other => Err(ConnectorError::FieldsParse(format!(
            "expected a JSON object, got {}",
            type_name(&other)
        ))),
    }
}

/// Rewrites `custom_fields` from `[{"<raw title>": value}]` into the
/// `[{"id": <field id>, "value": value}]` shape the API expects.
/// Titles with no matching field definition are dropped.
pub async fn resolve_custom_fields(client: &ZendeskClient, fields: &mut Map<String, Value>) -> Result<()> {
    let entries = match fields.get(CUSTOM_FIELDS_KEY) {
        Some(value) if !is_truthy(value) => return Ok(()),
        Some(Value::Array(entries)) => entries.clone(),
        Some(_) => return Err(ConnectorError::InvalidCustomFields),
        None => return Ok(()),
    };

    let mut pairs = Vec::with_capacity(entries.len());
    for entry in entries {
        match entry {
            Value::Object(map) if map.len() == 1 => {
                if let Some(pair) = map.into_iter().next() {
                    pairs.push(pair);
                }
            }
            _ => return Err(ConnectorError::InvalidCustomFieldEntry),
        }
    }

    let body = client
        .make_rest_call(RestCall::get("/ticket_fields.json"))
        .await?;
    let definitions: TicketFieldList = decode(body)?;

    let mut resolved = Vec::with_capacity(pairs.len());
    for (title, value) in pairs {
        match definitions
            .ticket_fields
            .iter()
            .find(|field| field.raw_title == title)
        {
            Some(field) => resolved.push(json!({"id": field.id, "value": value})),
            None => debug!("No ticket field titled '{}', dropping it", title),
        }
    }

    fields.insert(CUSTOM_FIELDS_KEY.to_string(), Value::Array(resolved));
    Ok(())
}

// Empty containers, empty strings, zero, false and null all count as "not given"
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
