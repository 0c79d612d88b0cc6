#![warn(rust_2018_idioms, rust_2024_compatibility)]
#![deny(
    clippy::explicit_iter_loop,
    clippy::manual_let_else,
    clippy::semicolon_if_nothing_returned,
    clippy::inconsistent_struct_constructor
)]
#![allow(
    clippy::cast_lossless,
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::doc_markdown
)]

pub mod app;
pub mod buffer;
pub mod domain;
pub mod exporter;
#[cfg(feature = "middleware")]
pub mod middleware;
pub mod reliability;
pub mod sender;

pub use app::{ConfigError, ExporterConfig};
pub use domain::{BatchOutcome, Environment, ExportError, HttpMethod, LogEntry};
pub use exporter::{Exporter, FlushResult};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
