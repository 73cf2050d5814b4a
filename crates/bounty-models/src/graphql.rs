//! GraphQL request/response and `graphql-transport-ws` message types.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A GraphQL operation as sent over HTTP or inside a `subscribe` message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GraphqlOperation {
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variables: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation_name: Option<String>,
}

impl GraphqlOperation {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            variables: None,
            operation_name: None,
        }
    }

    pub fn with_variables(mut self, variables: Value) -> Self {
        self.variables = Some(variables);
        self
    }

    pub fn with_operation_name(mut self, name: impl Into<String>) -> Self {
        self.operation_name = Some(name.into());
        self
    }
}

/// A single GraphQL error entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct GraphqlError {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Value>,
}

/// Result of executing an operation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub struct ExecutionResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<GraphqlError>>,
}

impl ExecutionResult {
    pub fn has_errors(&self) -> bool {
        self.errors.as_ref().is_some_and(|e| !e.is_empty())
    }
}

/// Messages sent from client to server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    ConnectionInit {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        payload: Option<Value>,
    },
    Ping {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        payload: Option<Value>,
    },
    Pong {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        payload: Option<Value>,
    },
    Subscribe {
        id: String,
        payload: GraphqlOperation,
    },
    Complete {
        id: String,
    },
}

/// Messages sent from server to client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    ConnectionAck {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        payload: Option<Value>,
    },
    Ping {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        payload: Option<Value>,
    },
    Pong {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        payload: Option<Value>,
    },
    Next {
        id: String,
        payload: ExecutionResult,
    },
    Error {
        id: String,
        payload: Vec<GraphqlError>,
    },
    Complete {
        id: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_subscribe_wire_format() {
        let msg = ClientMessage::Subscribe {
            id: "1".to_string(),
            payload: GraphqlOperation::new("subscription { bountyUpdated { id } }")
                .with_operation_name("OnBountyUpdated"),
        };
        let json = serde_json::to_value(&msg).unwrap();

        assert_eq!(json["type"], "subscribe");
        assert_eq!(json["payload"]["operationName"], "OnBountyUpdated");
        assert!(json["payload"].get("variables").is_none());
    }

    #[test]
    fn test_connection_init_without_payload() {
        let json = serde_json::to_string(&ClientMessage::ConnectionInit { payload: None }).unwrap();
        assert_eq!(json, r#"{"type":"connection_init"}"#);
    }

    #[test]
    fn test_parse_server_next() {
        let raw = json!({
            "type": "next",
            "id": "7",
            "payload": { "data": { "bountyUpdated": { "id": "b1" } } }
        });
        let msg: ServerMessage = serde_json::from_value(raw).unwrap();

        match msg {
            ServerMessage::Next { id, payload } => {
                assert_eq!(id, "7");
                assert!(!payload.has_errors());
                assert_eq!(payload.data.unwrap()["bountyUpdated"]["id"], "b1");
            }
            other => panic!("unexpected message: {:?}", other),
        }
    }

    #[test]
    fn test_parse_server_ack_and_error() {
        let ack: ServerMessage = serde_json::from_str(r#"{"type":"connection_ack"}"#).unwrap();
        assert_eq!(ack, ServerMessage::ConnectionAck { payload: None });

        let err: ServerMessage =
            serde_json::from_str(r#"{"type":"error","id":"1","payload":[{"message":"boom"}]}"#).unwrap();
        assert!(matches!(err, ServerMessage::Error { ref payload, .. } if payload[0].message == "boom"));
    }
}
