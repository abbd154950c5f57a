//! Request and response data model.
//!
//! Requests arrive here already parsed by whatever transport fronts the
//! controller; this module only defines their in-process shape.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Health-check command; never touches memory.
pub const COMMAND_PING: &str = "ping";
/// Read a list of keys from PLC memory.
pub const COMMAND_READ: &str = "read";
/// Write a mapping of values into PLC memory.
pub const COMMAND_WRITE: &str = "write";

/// A parsed PLC request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlcRequest {
    pub command: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keys: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<HashMap<String, Value>>,
}

impl PlcRequest {
    pub fn ping() -> Self {
        Self {
            command: COMMAND_PING.to_string(),
            keys: None,
            values: None,
        }
    }

    pub fn read<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            command: COMMAND_READ.to_string(),
            keys: Some(keys.into_iter().map(Into::into).collect()),
            values: None,
        }
    }

    pub fn write(values: HashMap<String, Value>) -> Self {
        Self {
            command: COMMAND_WRITE.to_string(),
            keys: None,
            values: Some(values),
        }
    }
}

/// Response sent back to the caller.
///
/// `values` is present only when a read produced a non-empty mapping; ping
/// and write responses never carry it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlcResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<HashMap<String, Value>>,
}

impl PlcResponse {
    pub fn empty() -> Self {
        Self::default()
    }
}
