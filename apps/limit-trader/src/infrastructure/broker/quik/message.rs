//! Wire envelope shared by requests and responses.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One line on the command socket.
///
/// Responses are matched to requests by `cmd` alone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Command name, echoed back by the connector.
    pub cmd: String,
    /// Command argument or result.
    #[serde(default)]
    pub data: Value,
    /// Connector timestamp.
    #[serde(rename = "t", default)]
    pub time: String,
    /// Lua error text, set when the connector failed the command.
    #[serde(default)]
    pub lua_error: String,
}

impl Message {
    /// Build a request.
    #[must_use]
    pub fn new(cmd: impl Into<String>, data: Value) -> Self {
        Self {
            cmd: cmd.into(),
            data,
            time: String::new(),
            lua_error: String::new(),
        }
    }

    /// Whether this message answers `request`.
    #[must_use]
    pub fn is_response_to(&self, request: &Self) -> bool {
        self.cmd == request.cmd
    }
}
