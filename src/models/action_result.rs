use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::ConnectorError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Failed,
}

/// Outcome of one action invocation, handed back to the host as-is.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ActionResult {
    pub parameter: Map<String, Value>,
    pub status: Status,
    pub message: String,
    pub summary: Map<String, Value>,
    pub data: Vec<Value>,
}

impl ActionResult {
    pub fn new(parameter: Map<String, Value>) -> Self {
        Self {
            parameter,
            status: Status::Failed,
            message: String::new(),
            summary: Map::new(),
            data: Vec::new(),
        }
    }

    pub fn set_status(&mut self, status: Status, message: impl Into<String>) {
        self.status = status;
        self.message = message.into();
    }

    /// Records `err` as the final outcome; server error bodies become data.
    pub fn fail(&mut self, err: &ConnectorError) {
        if let Some(payload) = err.payload() {
            self.add_data(payload.clone());
        }
        self.set_status(Status::Failed, err.to_string());
    }

    pub fn add_data(&mut self, data: Value) {
        self.data.push(data);
    }

    pub fn update_summary(&mut self, key: &str, value: Value) {
        self.summary.insert(key.to_string(), value);
    }

    pub fn is_success(&self) -> bool {
        self.status == Status::Success
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_result_starts_failed_and_empty() {
        let result = ActionResult::new(Map::new());
        assert!(!result.is_success());
        assert!(result.data.is_empty());
        assert!(result.summary.is_empty());
    }

    #[test]
    fn test_fail_attaches_server_payload() {
        let mut result = ActionResult::new(Map::new());
        result.fail(&ConnectorError::FromServer {
            status: 422,
            detail: "\"error\": \"RecordInvalid\"".to_string(),
            payload: json!({"error": "RecordInvalid"}),
        });

        assert_eq!(result.status, Status::Failed);
        assert_eq!(result.data, vec![json!({"error": "RecordInvalid"})]);
        assert!(result.message.starts_with("API failed, Status code: 422"));
    }

    #[test]
    fn test_serializes_lowercase_status() {
        let mut result = ActionResult::new(Map::new());
        result.set_status(Status::Success, "Connectivity test passed");
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["status"], "success");
        assert_eq!(value["message"], "Connectivity test passed");
    }
}
