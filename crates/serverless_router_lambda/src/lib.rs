//! AWS Lambda integration for the student router.
//!
//! This crate owns runtime integration details (the Lambda entry point,
//! Secrets Manager credentials, the lazily established Postgres pool) and the
//! student business functions registered with `serverless_router_core`.

pub mod adapters;
pub mod casing;
pub mod config;
pub mod handlers;
pub mod invocation;
pub mod sample_events;
pub mod telemetry;
