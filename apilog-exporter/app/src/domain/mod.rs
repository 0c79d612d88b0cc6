//! Domain layer for apilog-exporter.
//!
//! Contains the canonical types shared across all modules:
//! - `LogEntry`: one observed API call, the unit the exporter queues
//! - `HttpMethod` / `Environment`: enumerated wire values
//! - `BatchOutcome`: the server's per-batch tally
//! - `ExportError`: error surfaced by `flush` and `shutdown`

pub mod error;
pub mod log_entry;
pub mod wire;

pub use error::ExportError;
pub use log_entry::{Environment, HttpMethod, LogEntry};
pub use wire::{BatchOutcome, BatchRequest};
