//! JSON-RPC envelope types for the EOS command API.
//!
//! The command API speaks JSON-RPC 2.0 with a single method, `runCmds`,
//! which takes a list of CLI commands and a response format, and answers
//! with one result object per command.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Response format requested from the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseFormat {
    Json,
    Text,
}

/// A `runCmds` request envelope.
#[derive(Debug, Serialize)]
pub(crate) struct RpcRequest<'a> {
    pub jsonrpc: &'static str,
    pub method: &'static str,
    pub params: RpcParams<'a>,
    pub id: u64,
}

impl<'a> RpcRequest<'a> {
    pub fn new(cmds: &'a [String], format: ResponseFormat, id: u64) -> Self {
        RpcRequest {
            jsonrpc: "2.0",
            method: "runCmds",
            params: RpcParams {
                version: 1,
                cmds,
                format,
            },
            id,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct RpcParams<'a> {
    pub version: u32,
    pub cmds: &'a [String],
    pub format: ResponseFormat,
}

/// A response envelope. Exactly one of `result` and `error` is set.
#[derive(Debug, Deserialize)]
pub(crate) struct RpcResponse {
    #[serde(default)]
    pub result: Option<Vec<Value>>,
    #[serde(default)]
    pub error: Option<RpcError>,
}

/// A JSON-RPC error, as reported by the command API. The interesting part
/// for diagnostics is `data`, which carries one entry per attempted command
/// with the CLI error strings for it.
#[derive(Debug, Deserialize)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
    #[serde(default)]
    pub data: Vec<CommandErrorData>,
}

#[derive(Debug, Deserialize)]
pub struct CommandErrorData {
    #[serde(default)]
    pub errors: Vec<String>,
}

impl RpcError {
    /// The last CLI error string of the first failed command, which is what
    /// the switch puts the human-readable cause in.
    pub fn last_detail(&self) -> Option<&str> {
        self.data
            .first()
            .and_then(|d| d.errors.last())
            .map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serialization() {
        let cmds = vec!["show interfaces status".to_owned()];
        let request = RpcRequest::new(&cmds, ResponseFormat::Json, 7);
        let value = serde_json::to_value(&request).expect("failed to serialize");
        assert_eq!(value["jsonrpc"], "2.0");
        assert_eq!(value["method"], "runCmds");
        assert_eq!(value["params"]["version"], 1);
        assert_eq!(value["params"]["format"], "json");
        assert_eq!(value["params"]["cmds"][0], "show interfaces status");
        assert_eq!(value["id"], 7);
    }

    #[test]
    fn test_error_detail() {
        let raw = r#"{
            "code": 1002,
            "message": "CLI command 2 of 2 'show interfaces Ethernet99' failed: invalid command",
            "data": [
                {},
                {"errors": ["first detail", "Invalid input (at token 2: 'Ethernet99')"]}
            ]
        }"#;
        let error: RpcError = serde_json::from_str(raw).expect("failed to parse");
        assert_eq!(error.code, 1002);
        assert_eq!(error.last_detail(), None);

        let raw = r#"{
            "code": 1002,
            "message": "failed",
            "data": [{"errors": ["first", "last"]}]
        }"#;
        let error: RpcError = serde_json::from_str(raw).expect("failed to parse");
        assert_eq!(error.last_detail(), Some("last"));
    }
}
