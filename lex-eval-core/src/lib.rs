//! # Lex-Eval Core Library
//!
//! Shared core functionality for lex-eval including models, connectors, metrics,
//! and workflow comparison.

pub mod connectors;
pub mod metrics;
pub mod models;
pub mod services;
pub mod stream;
