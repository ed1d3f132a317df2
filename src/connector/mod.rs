pub mod fields;
pub mod host;
pub mod names;

mod actions;

use log::{debug, info};
use serde_json::{Map, Value};

use crate::api::zendesk::ZendeskClient;
use crate::config::settings::{AssetConfig, Credentials};
use crate::errors::Result;
use crate::models::action_result::ActionResult;
use crate::models::params::Action;
use names::NameCache;

/// One configured connector. The name cache lives as long as the instance.
pub struct ZendeskConnector {
    client: ZendeskClient,
    credentials: Credentials,
    names: NameCache,
}

impl ZendeskConnector {
    pub fn new(config: &AssetConfig) -> Result<Self> {
        Self::with_name_cache(config, NameCache::default())
    }

    pub fn with_name_cache(config: &AssetConfig, names: NameCache) -> Result<Self> {
        let credentials = Credentials::from_config(config)?;
        let client = ZendeskClient::new(&credentials)?;

        Ok(Self {
            client,
            credentials,
            names,
        })
    }

    pub fn names(&self) -> &NameCache {
        &self.names
    }

    /// Runs the action named `identifier` and returns its single result.
    pub async fn handle_action(&mut self, identifier: &str, params: Map<String, Value>) -> ActionResult {
        let mut result = ActionResult::new(params);

        match Action::parse(identifier, &result.parameter) {
            Ok(action) => self.dispatch(action, &mut result).await,
            Err(e) => {
                debug!("{}", e);
                result.fail(&e);
            }
        }

        result
    }

    async fn dispatch(&mut self, action: Action, result: &mut ActionResult) {
        info!("Running {}", action.identifier());
        info!("Using url: {}", self.credentials.base_url);
        info!("Connecting to {}...", self.credentials.host);

        let outcome = match action {
            Action::TestConnectivity => self.test_connectivity(result).await,
            Action::CreateTicket {
                subject,
                description,
                fields,
            } => {
                self.create_ticket(&subject, &description, fields.as_deref(), result)
                    .await
            }
            Action::GetTicket { id } => self.get_ticket(&id, result).await,
            Action::UpdateTicket { id, fields } => {
                self.update_ticket(&id, fields.as_deref(), result).await
            }
            Action::ListTickets { page } => self.list_tickets(page, result).await,
            Action::RunQuery { query, page } => self.run_query(&query, page, result).await,
        };

        if let Err(e) = outcome {
            debug!("{}", e);
            result.fail(&e);
        }
    }
}
