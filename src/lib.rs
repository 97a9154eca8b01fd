//! Library crate for the SafeBet IQ backend, exposing modules for the server binary,
//! the OpenAPI generator and integration tests.

/// Environment configuration.
pub mod config;
/// Storage, auth provider and data access.
pub mod dao;
mod dto;
mod error;
/// Outbound WhatsApp messaging.
pub mod messaging;
/// HTTP routes.
pub mod routes;
/// Business logic behind the routes.
pub mod services;
/// Shared application state.
pub mod state;
