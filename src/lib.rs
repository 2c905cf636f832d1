//! A single-purpose request gate: every route behind it requires the one
//! configured API token, presented as `Authorization: Bearer <token>`.
//!
//! The expected token comes from an `apipass` directive block, a JSON
//! snippet, or the environment; placeholders like `{env.API_TOKEN}` are
//! resolved once at startup.

pub mod api;
pub mod app;
pub mod config;
pub mod directive;
pub mod error;
pub mod middleware;
pub mod replacer;
pub mod state;

pub use config::{Config, ConfigError, TokenSource};
pub use middleware::bearer_auth::BearerAuth;
pub use replacer::Replacer;
