use log::info;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::ZendeskConnector;
use crate::config::settings::AssetConfig;
use crate::models::action_result::{ActionResult, Status};

/// What the host sends for one invocation: the action, the asset
/// configuration and one parameter object per run.
#[derive(Debug, Deserialize)]
pub struct HostRequest {
    pub identifier: String,
    #[serde(default)]
    pub config: Option<Value>,
    #[serde(default)]
    pub parameters: Vec<Map<String, Value>>,
}

#[derive(Debug, Serialize)]
pub struct RunReport {
    pub identifier: String,
    pub status: Status,
    pub message: String,
    pub action_results: Vec<ActionResult>,
}

impl RunReport {
    pub fn is_success(&self) -> bool {
        self.status == Status::Success
    }
}

/// Runs the requested action once per parameter object on a single connector.
pub async fn run(request: &HostRequest, config: &AssetConfig) -> RunReport {
    let mut connector = match ZendeskConnector::new(config) {
        Ok(connector) => connector,
        Err(e) => {
            return RunReport {
                identifier: request.identifier.clone(),
                status: Status::Failed,
                message: e.to_string(),
                action_results: Vec::new(),
            }
        }
    };

    let parameters = if request.parameters.is_empty() {
        vec![Map::new()]
    } else {
        request.parameters.clone()
    };

    let mut action_results = Vec::with_capacity(parameters.len());
    for params in parameters {
        action_results.push(connector.handle_action(&request.identifier, params).await);
    }

    let succeeded = action_results.iter().filter(|r| r.is_success()).count();
    let failed = action_results.len() - succeeded;
    info!(
        "{}: {} succeeded, {} failed, {} cached user names",
        request.identifier,
        succeeded,
        failed,
        connector.names().len()
    );

    RunReport {
        identifier: request.identifier.clone(),
        status: if failed == 0 { Status::Success } else { Status::Failed },
        message: format!("{} action(s) succeeded, {} failed", succeeded, failed),
        action_results,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn asset(url: &str) -> AssetConfig {
        AssetConfig::from_value(json!({
            "url": url,
            "username": "agent@example.com",
            "api_token": "abc123",
            "timeout_secs": 5
        }))
        .unwrap()
    }

    #[test]
    fn test_host_request_shape() {
        let request: HostRequest = serde_json::from_value(json!({
            "identifier": "get_ticket",
            "parameters": [{"id": "1"}, {"id": "2"}]
        }))
        .unwrap();

        assert_eq!(request.identifier, "get_ticket");
        assert!(request.config.is_none());
        assert_eq!(request.parameters.len(), 2);
    }

    #[tokio::test]
    async fn test_one_result_per_parameter_set() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/v2/tickets/1.json")
            .with_status(200)
            .with_body(r#"{"ticket": {"id": 1, "submitter_id": 3}}"#)
            .create_async()
            .await;
        server
            .mock("GET", "/api/v2/tickets/2.json")
            .with_status(200)
            .with_body(r#"{"ticket": {"id": 2, "submitter_id": 3}}"#)
            .create_async()
            .await;
        server
            .mock("GET", "/api/v2/tickets/3.json")
            .with_status(404)
            .with_body(r#"{"error": "RecordNotFound"}"#)
            .create_async()
            .await;
        let user = server
            .mock("GET", "/api/v2/users/3.json")
            .with_status(200)
            .with_body(r#"{"user": {"name": "Grace"}}"#)
            .expect(1)
            .create_async()
            .await;

        let request: HostRequest = serde_json::from_value(json!({
            "identifier": "get_ticket",
            "parameters": [{"id": "1"}, {"id": "2"}, {"id": "3"}]
        }))
        .unwrap();

        let report = run(&request, &asset(&server.url())).await;

        assert_eq!(report.action_results.len(), 3);
        assert!(!report.is_success());
        assert_eq!(report.message, "2 action(s) succeeded, 1 failed");
        assert_eq!(report.action_results[1].data[0]["submitter_id_name"], "Grace");
        user.assert_async().await;
    }

    #[tokio::test]
    async fn test_missing_credentials_fail_the_run() {
        let config = AssetConfig::from_value(json!({
            "url": "https://example.zendesk.com",
            "username": "agent@example.com"
        }))
        .unwrap();
        let request = HostRequest {
            identifier: "list_tickets".to_string(),
            config: None,
            parameters: Vec::new(),
        };

        let report = run(&request, &config).await;

        assert!(!report.is_success());
        assert_eq!(report.message, "Please specify one of either 'Password' or 'API Token'");
        assert!(report.action_results.is_empty());
    }
}
