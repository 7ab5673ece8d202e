//! HTTP API for the Senso product catalog.
//!
//! Exposed as a library so integration tests can build the same router the
//! binary serves.

pub mod auth;
pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
