use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A ticket as the API returns it. Only a handful of keys are ever read;
/// everything else passes through untouched.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Ticket(pub Map<String, Value>);

impl Ticket {
    pub fn id(&self) -> Option<&Value> {
        self.0.get("id")
    }

    /// Integer user id held under `key`, if any.
    pub fn user_id(&self, key: &str) -> Option<u64> {
        self.0.get(key).and_then(Value::as_u64)
    }

    pub fn insert(&mut self, key: String, value: Value) {
        self.0.insert(key, value);
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct TicketEnvelope {
    #[serde(default)]
    pub ticket: Option<Ticket>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TicketList {
    #[serde(default)]
    pub tickets: Vec<Ticket>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchResults {
    #[serde(default)]
    pub results: Vec<Ticket>,
    #[serde(default)]
    pub count: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UserEnvelope {
    #[serde(default)]
    pub user: Option<User>,
}

#[derive(Debug, Deserialize)]
pub struct User {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TicketFieldList {
    #[serde(default)]
    pub ticket_fields: Vec<TicketField>,
}

/// Field definition, as listed by `/ticket_fields.json`.
#[derive(Debug, Deserialize)]
pub struct TicketField {
    pub id: u64,
    #[serde(default)]
    pub raw_title: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ticket_round_trips_unknown_keys() {
        let raw = json!({
            "id": 35436,
            "subject": "Help, my printer is on fire!",
            "custom_fields": [{"id": 27642, "value": "745"}],
            "submitter_id": 76872,
            "assignee_id": null
        });

        let ticket: Ticket = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(ticket.id(), Some(&json!(35436)));
        assert_eq!(ticket.user_id("submitter_id"), Some(76872));
        assert_eq!(ticket.user_id("assignee_id"), None);
        assert_eq!(ticket.user_id("requester_id"), None);
        assert_eq!(ticket.into_value(), raw);
    }

    #[test]
    fn test_envelope_without_ticket() {
        let envelope: TicketEnvelope = serde_json::from_value(json!({})).unwrap();
        assert!(envelope.ticket.is_none());

        let envelope: TicketEnvelope = serde_json::from_value(json!({"ticket": null})).unwrap();
        assert!(envelope.ticket.is_none());
    }

    #[test]
    fn test_search_results_count_is_optional() {
        let results: SearchResults =
            serde_json::from_value(json!({"results": [{"id": 1}]})).unwrap();
        assert_eq!(results.results.len(), 1);
        assert_eq!(results.count, None);
    }
}
