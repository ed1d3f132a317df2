use log::{debug, info};
use serde_json::{json, Map, Value};

use super::fields::{parse_fields, resolve_custom_fields};
use super::names::add_names_to_ids;
use super::ZendeskConnector;
use crate::api::zendesk::{decode, RestCall};
use crate::consts;
use crate::errors::{ConnectorError, Result};
use crate::models::action_result::{ActionResult, Status};
use crate::models::params::Page;
use crate::models::ticket::{SearchResults, Ticket, TicketEnvelope, TicketList};

impl ZendeskConnector {
    pub(super) async fn test_connectivity(&mut self, result: &mut ActionResult) -> Result<()> {
        info!("{}", consts::MSG_GET_INCIDENT_TEST);

        let call = RestCall::get("/tickets/recent.json")
            .with_params(vec![("per_page".to_string(), "1".to_string())]);

        match self.client.make_rest_call(call).await {
            Ok(_) => result.set_status(Status::Success, consts::SUCC_CONNECTIVITY_TEST),
            Err(e) => {
                debug!("{}", e);
                result.fail(&e);
                result.set_status(
                    Status::Failed,
                    format!("{}. {}", consts::ERR_CONNECTIVITY_TEST, e),
                );
            }
        }

        Ok(())
    }

    pub(super) async fn create_ticket(
        &mut self,
        subject: &str,
        description: &str,
        fields: Option<&str>,
        result: &mut ActionResult,
    ) -> Result<()> {
        let mut ticket = Map::new();
        ticket.insert("subject".to_string(), json!(subject));
        ticket.insert("comment".to_string(), json!({"body": description}));

        if let Some(mut fields) = parse_fields(fields)? {
            resolve_custom_fields(&self.client, &mut fields).await?;
            ticket.extend(fields);
        }

        let body = self
            .client
            .make_rest_call(RestCall::post("/tickets.json", json!({"ticket": ticket})))
            .await?;

        let mut created = decode::<TicketEnvelope>(body)?
            .ticket
            .ok_or(ConnectorError::NoData)?;

        let id = created.id().cloned().unwrap_or(Value::Null);
        result.update_summary(consts::JSON_NEW_TICKET_ID, id.clone());

        self.augment(&mut created).await;
        result.add_data(created.into_value());

        result.set_status(Status::Success, format!("Created ticket with key: {}", id));
        Ok(())
    }

    pub(super) async fn update_ticket(
        &mut self,
        id: &str,
        fields: Option<&str>,
        result: &mut ActionResult,
    ) -> Result<()> {
        let mut fields = match parse_fields(fields)? {
            Some(fields) if !fields.is_empty() => fields,
            _ => return Err(ConnectorError::EmptyFields),
        };

        resolve_custom_fields(&self.client, &mut fields).await?;

        let endpoint = format!("/tickets/{}.json", urlencoding::encode(id));
        let body = self
            .client
            .make_rest_call(RestCall::put(endpoint, json!({"ticket": fields})))
            .await?;

        let mut ticket = decode::<TicketEnvelope>(body)?
            .ticket
            .ok_or(ConnectorError::NoData)?;

        self.augment(&mut ticket).await;

        result.update_summary(
            consts::JSON_UPDATED_TICKET_ID,
            ticket.id().cloned().unwrap_or(Value::Null),
        );
        result.add_data(ticket.into_value());

        result.set_status(Status::Success, "");
        Ok(())
    }

    pub(super) async fn get_ticket(&mut self, id: &str, result: &mut ActionResult) -> Result<()> {
        let endpoint = format!("/tickets/{}.json", urlencoding::encode(id));
        let body = self.client.make_rest_call(RestCall::get(endpoint)).await?;

        let mut ticket = decode::<TicketEnvelope>(body)?
            .ticket
            .filter(|ticket| !ticket.0.is_empty())
            .ok_or(ConnectorError::NoData)?;

        self.augment(&mut ticket).await;

        result.update_summary(
            consts::JSON_GOT_TICKET_ID,
            ticket.id().cloned().unwrap_or(Value::Null),
        );
        result.add_data(ticket.into_value());

        result.set_status(Status::Success, "");
        Ok(())
    }

    pub(super) async fn list_tickets(&mut self, page: Page, result: &mut ActionResult) -> Result<()> {
        let body = self
            .client
            .make_rest_call(RestCall::get("/tickets.json").with_params(page.query()))
            .await?;

        let tickets = decode::<TicketList>(body)?.tickets;

        result.update_summary(consts::JSON_TOTAL_TICKETS, json!(tickets.len()));
        self.add_tickets(tickets, result).await;

        result.set_status(Status::Success, "");
        Ok(())
    }

    pub(super) async fn run_query(
        &mut self,
        query: &str,
        page: Page,
        result: &mut ActionResult,
    ) -> Result<()> {
        let mut params = vec![(
            "query".to_string(),
            format!("type:{} {}", consts::SEARCH_QUERY_TYPE, query),
        )];
        params.extend(page.query());

        let body = self
            .client
            .make_rest_call(RestCall::get("/search.json").with_params(params))
            .await?;

        let search = decode::<SearchResults>(body)?;

        result.update_summary(consts::JSON_TOTAL_TICKETS, json!(search.count));
        result.update_summary(consts::JSON_RETURNED_TICKETS, json!(search.results.len()));
        self.add_tickets(search.results, result).await;

        result.set_status(Status::Success, "");
        Ok(())
    }

    async fn add_tickets(&mut self, tickets: Vec<Ticket>, result: &mut ActionResult) {
        for mut ticket in tickets {
            self.augment(&mut ticket).await;
            result.add_data(ticket.into_value());
        }
    }

    async fn augment(&mut self, ticket: &mut Ticket) {
        add_names_to_ids(&self.client, &mut self.names, ticket).await;
    }
}
