pub mod bearer_auth;
pub mod http;
