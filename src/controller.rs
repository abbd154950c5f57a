//! Controlling logic for the PLC: handles requests after they have been
//! parsed by the surrounding transport.

use crate::memory::{InMemoryPlcMemory, PlcMemory};
use crate::request::{PlcRequest, PlcResponse, COMMAND_PING, COMMAND_READ, COMMAND_WRITE};
use anyhow::Result;
use std::fmt;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, instrument, warn};

/// Error raised when a request carries a command tag the controller does
/// not recognize. Carries the offending tag for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidCommand(pub String);

impl fmt::Display for InvalidCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Command '{}' is unknown", self.0)
    }
}

impl std::error::Error for InvalidCommand {}

/// Dispatches parsed PLC requests against the current memory store.
///
/// One coarse controller-scoped lock serializes every store read, every
/// store write, and every store replacement, so back-ends never see
/// interleaved access.
pub struct PlcController {
    memory: Mutex<Arc<dyn PlcMemory>>,
}

impl PlcController {
    /// Controller over a fresh, empty in-memory store.
    pub fn new() -> Self {
        Self::with_memory(Arc::new(InMemoryPlcMemory::new()))
    }

    /// Controller over a caller-supplied store.
    pub fn with_memory(memory: Arc<dyn PlcMemory>) -> Self {
        Self {
            memory: Mutex::new(memory),
        }
    }

    /// Current memory store.
    ///
    /// The read holds the same lock as [`set_memory`](Self::set_memory),
    /// so it can never observe a half-finished swap.
    pub async fn memory(&self) -> Arc<dyn PlcMemory> {
        self.memory.lock().await.clone()
    }

    /// Replace the memory store.
    ///
    /// An in-flight [`process`](Self::process) call holds the lock for the
    /// duration of its store access and completes against the old store
    /// before the swap lands.
    pub async fn set_memory(&self, memory: Arc<dyn PlcMemory>) {
        *self.memory.lock().await = memory;
        debug!("memory store replaced");
    }

    /// Process one request and produce its response.
    ///
    /// Absent or empty key lists and value mappings are no-ops, not
    /// errors; the only failure is an unrecognized command tag, which
    /// propagates to the caller as [`InvalidCommand`].
    #[instrument(skip(self, request), fields(command = %request.command))]
    pub async fn process(&self, request: PlcRequest) -> Result<PlcResponse> {
        let PlcRequest {
            command,
            keys,
            values,
        } = request;

        match command.as_str() {
            COMMAND_PING => Ok(PlcResponse::empty()),

            COMMAND_READ => {
                let keys = match keys {
                    Some(keys) if !keys.is_empty() => keys,
                    _ => {
                        debug!("read with no keys, memory untouched");
                        return Ok(PlcResponse::empty());
                    }
                };

                let found = {
                    let memory = self.memory.lock().await;
                    memory.read(&keys).await?
                };

                debug!(requested = keys.len(), found = found.len(), "read complete");
                Ok(PlcResponse {
                    values: if found.is_empty() { None } else { Some(found) },
                })
            }

            COMMAND_WRITE => {
                let values = match values {
                    Some(values) if !values.is_empty() => values,
                    _ => {
                        debug!("write with no values, memory untouched");
                        return Ok(PlcResponse::empty());
                    }
                };

                let count = values.len();
                {
                    let memory = self.memory.lock().await;
                    memory.write(values).await?;
                }

                debug!(count, "write complete");
                Ok(PlcResponse::empty())
            }

            other => {
                warn!("rejecting unknown command '{}'", other);
                Err(anyhow::Error::new(InvalidCommand(other.to_string())))
            }
        }
    }
}

impl Default for PlcController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    fn mapping(pairs: &[(&str, serde_json::Value)]) -> HashMap<String, serde_json::Value> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[tokio::test]
    async fn test_write_then_read_round_trip() {
        let controller = PlcController::new();

        let write = PlcRequest::write(mapping(&[("x", json!(1))]));
        let response = controller.process(write).await.unwrap();
        assert_eq!(response.values, None);

        let response = controller.process(PlcRequest::read(["x"])).await.unwrap();
        assert_eq!(response.values, Some(mapping(&[("x", json!(1))])));
    }

    #[tokio::test]
    async fn test_read_of_absent_key_is_not_an_error() {
        let controller = PlcController::new();

        controller
            .process(PlcRequest::write(mapping(&[("x", json!(1))])))
            .await
            .unwrap();

        let response = controller.process(PlcRequest::read(["y"])).await.unwrap();
        assert_eq!(response.values, None);
    }

    #[tokio::test]
    async fn test_unknown_command_carries_offending_tag() {
        let controller = PlcController::new();

        let request = PlcRequest {
            command: "reset".to_string(),
            keys: None,
            values: None,
        };

        let err = controller.process(request).await.unwrap_err();
        let invalid = err.downcast_ref::<InvalidCommand>().unwrap();
        assert_eq!(invalid.0, "reset");
        assert!(err.to_string().contains("reset"));
    }

    #[tokio::test]
    async fn test_memory_hot_swap() {
        let controller = PlcController::new();

        controller
            .process(PlcRequest::write(mapping(&[("x", json!(1))])))
            .await
            .unwrap();

        controller
            .set_memory(Arc::new(InMemoryPlcMemory::new()))
            .await;

        let response = controller.process(PlcRequest::read(["x"])).await.unwrap();
        assert_eq!(response.values, None);
    }
}
