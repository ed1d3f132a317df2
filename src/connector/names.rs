use log::{debug, warn};
use serde_json::Value;
use std::collections::HashMap;

use crate::api::zendesk::{decode, RestCall, ZendeskClient};
use crate::consts;
use crate::errors::Result;
use crate::models::ticket::{Ticket, UserEnvelope};

/// User id to display name. Entries are written once and never replaced;
/// once full, new ids are simply not remembered.
#[derive(Debug)]
pub struct NameCache {
    entries: HashMap<u64, String>,
    capacity: usize,
}

impl Default for NameCache {
    fn default() -> Self {
        Self::new(consts::DEFAULT_NAME_CACHE_CAPACITY)
    }
}

impl NameCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            capacity,
        }
    }

    pub fn get(&self, user_id: u64) -> Option<&str> {
        self.entries.get(&user_id).map(String::as_str)
    }

    /// Returns whether the entry was stored.
    pub fn insert(&mut self, user_id: u64, name: String) -> bool {
        if self.entries.contains_key(&user_id) {
            return false;
        }
        if self.entries.len() >= self.capacity {
            warn!(
                "Name cache is full ({} entries), not caching user {}",
                self.capacity, user_id
            );
            return false;
        }
        self.entries.insert(user_id, name);
        true
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Adds `<key>_name` next to every user id field of `ticket`.
/// Lookups are best effort: a failed one just leaves the name out.
pub async fn add_names_to_ids(client: &ZendeskClient, names: &mut NameCache, ticket: &mut Ticket) {
    for key in consts::USER_ID_KEYS {
        let user_id = match ticket.user_id(key) {
            Some(id) => id,
            None => continue,
        };

        let name_key = format!("{}_name", key);

        if let Some(name) = names.get(user_id) {
            ticket.insert(name_key, Value::String(name.to_string()));
            continue;
        }

        match lookup_user_name(client, user_id).await {
            Ok(Some(name)) => {
                ticket.insert(name_key, Value::String(name.clone()));
                names.insert(user_id, name);
            }
            Ok(None) => debug!("User {} has no name", user_id),
            Err(e) => debug!("Name lookup for user {} failed: {}", user_id, e),
        }
    }
}

async fn lookup_user_name(client: &ZendeskClient, user_id: u64) -> Result<Option<String>> {
    let body = client
        .make_rest_call(RestCall::get(format!("/users/{}.json", user_id)))
        .await?;

    let envelope: UserEnvelope = decode(body)?;

    Ok(envelope
        .user
        .and_then(|user| user.name)
        .filter(|name| !name.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::settings::{AssetConfig, Credentials};
    use serde_json::json;

    fn client_for(url: &str) -> ZendeskClient {
        let config = AssetConfig {
            url: url.to_string(),
            username: "agent@example.com".to_string(),
            password: Some("hunter2".to_string()),
            timeout_secs: 5,
            ..AssetConfig::default()
        };
        ZendeskClient::new(&Credentials::from_config(&config).unwrap()).unwrap()
    }

    fn sample_ticket() -> Ticket {
        serde_json::from_value(json!({"id": 1, "submitter_id": 7, "requester_id": 8})).unwrap()
    }

    #[test]
    fn test_entries_are_never_overwritten() {
        let mut cache = NameCache::default();
        assert!(cache.insert(7, "Agent Smith".to_string()));
        assert!(!cache.insert(7, "Someone Else".to_string()));
        assert_eq!(cache.get(7), Some("Agent Smith"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_full_cache_keeps_existing_entries() {
        let mut cache = NameCache::new(1);
        assert!(cache.insert(1, "First".to_string()));
        assert!(!cache.insert(2, "Second".to_string()));
        assert_eq!(cache.get(1), Some("First"));
        assert_eq!(cache.get(2), None);
    }

    #[test]
    fn test_empty_cache() {
        let cache = NameCache::new(4);
        assert_eq!(cache.len(), 0);
        assert_eq!(cache.get(1), None);
    }

    #[tokio::test]
    async fn test_unreachable_server_leaves_ticket_unchanged() {
        let client = client_for("http://127.0.0.1:1");
        let mut names = NameCache::default();
        let mut ticket = sample_ticket();

        add_names_to_ids(&client, &mut names, &mut ticket).await;

        assert_eq!(ticket, sample_ticket());
        assert_eq!(names.len(), 0);
    }

    #[tokio::test]
    async fn test_non_json_user_reply_is_skipped() {
        let mut server = mockito::Server::new_async().await;
        let submitter = server
            .mock("GET", "/api/v2/users/7.json")
            .with_status(200)
            .with_body("<html>maintenance</html>")
            .create_async()
            .await;
        server
            .mock("GET", "/api/v2/users/8.json")
            .with_status(200)
            .with_body(r#"{"user": {"name": "Ada"}}"#)
            .create_async()
            .await;

        let client = client_for(&server.url());
        let mut names = NameCache::default();
        let mut ticket = sample_ticket();

        add_names_to_ids(&client, &mut names, &mut ticket).await;

        assert!(ticket.0.get("submitter_id_name").is_none());
        assert_eq!(ticket.0["requester_id_name"], "Ada");
        assert_eq!(names.get(7), None);
        assert_eq!(names.get(8), Some("Ada"));
        submitter.assert_async().await;
    }
}
