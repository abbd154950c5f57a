//! plclink - Core Library
//!
//! An in-process PLC request controller over a lock-guarded key-value memory.

pub mod cli;
pub mod controller;
pub mod memory;
pub mod request;
pub mod settings;
pub mod telemetry;

pub use controller::{InvalidCommand, PlcController};
pub use memory::{InMemoryPlcMemory, PlcMemory};
pub use request::{PlcRequest, PlcResponse};
