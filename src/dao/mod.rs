/// Authentication provider abstraction.
pub mod auth;
/// Generic table client abstraction and typed helpers.
pub mod database;
/// ESG scores, inputs and ingest tables.
pub mod esg;
/// Per-casino integration settings and call log.
pub mod integration;
/// In-memory database and auth provider.
pub mod memory;
/// Database row projections.
pub mod models;
/// Software module catalogue and casino licences.
pub mod modules;
/// Users, staff and players.
pub mod people;
/// Table query description.
pub mod query;
/// Behavioural risk profiles.
pub mod risk;
/// Storage error types.
pub mod storage;
/// Supabase (PostgREST + GoTrue) clients.
pub mod supabase;
/// Wellbeing mini-game sessions and invitations.
pub mod wellbeing;
