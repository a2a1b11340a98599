//! Event-triggered ingestion of delimited transaction files into a relational sink.
//!
//! One invocation processes exactly one file: the trigger envelope names the
//! object, the object store provides the raw bytes, rows are parsed and coerced
//! into typed nullable records, and a single batch transaction loads them with
//! per-row failure isolation. Fatal faults (configuration, retrieval, sink
//! connection) abort the invocation before or during loading; row-level faults
//! are recorded and never stop the batch.

pub mod config;
pub mod engine;
pub mod errors;
pub mod models;
pub mod normalize;
pub mod parser;
pub mod report;
pub mod sink;
pub mod source;
pub mod trigger;
