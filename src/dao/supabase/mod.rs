mod auth;
mod config;
mod error;
mod rest;

pub use auth::SupabaseAuth;
pub use config::SupabaseConfig;
pub use error::SupabaseError;
pub use rest::SupabaseDatabase;
