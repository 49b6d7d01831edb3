//! Business logic between handlers and `captura_core`.

pub mod auth;
pub mod ingest;
pub mod records;
