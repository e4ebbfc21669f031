//! NDJSON event stream handling for workflow runs

pub mod ndjson;

pub use ndjson::{StreamAssembler, StreamEvent};
