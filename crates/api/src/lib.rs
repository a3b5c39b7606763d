//! HTTP API: server bootstrap, routing, and request/response mapping.

pub mod app;
pub mod error;
pub mod observability;
pub mod routes;
