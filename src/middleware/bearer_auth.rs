//! Bearer-token gate for routes that must not be reachable without the
//! shared API token.
//!
//! Responsibility:
//! - Hold the one expected token (from a directive file, JSON, or env).
//! - Reject any request whose `Authorization` header is not exactly
//!   `Bearer <token>`: 401, a `WWW-Authenticate` challenge, empty body.
//! - Hand everything else to the inner handler and return its response
//!   untouched.
//!
//! The comparison is plain string equality. Scheme casing, surrounding
//! whitespace and any extra bytes all count as a mismatch.

use std::fmt;

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::{self, Next},
    response::Response,
};
use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::error::AppError;
use crate::replacer::Replacer;
use crate::state::AppState;

/// The gate itself: one expected token, nothing else.
///
/// Lifecycle: construct (or parse, or deserialize), `provision` once against
/// a [`Replacer`] to resolve placeholders, then `validate` before serving.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct BearerAuth {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    token: String,
}

impl BearerAuth {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }

    pub(crate) fn set_token(&mut self, token: &str) {
        self.token = token.to_string();
    }

    /// Resolve `{key}` placeholders in the configured token. Runs once at
    /// startup; a key nothing can resolve becomes the empty string, which
    /// `validate` then rejects.
    pub fn provision(&mut self, repl: &Replacer) {
        self.token = repl.replace_all(&self.token, "");
    }

    /// Refuse an empty token. An empty value would turn `Bearer ` with a
    /// trailing space into a passing header.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.token.is_empty() {
            return Err(ConfigError::EmptyToken);
        }
        Ok(())
    }

    /// Whether the given `Authorization` header value grants access.
    pub fn allows(&self, authorization: Option<&str>) -> bool {
        authorization
            .and_then(|value| value.strip_prefix("Bearer "))
            .is_some_and(|candidate| candidate == self.token)
    }
}

impl fmt::Debug for BearerAuth {
    // The token is a credential; keep it out of logs.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BearerAuth")
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Gate every route in `router` behind the token held in `state`.
///
/// Example:
/// ```ignore
/// let v1 = Router::new().route("/content", get(content));
/// let v1 = middleware::bearer_auth::apply(v1, state.clone());
/// app = app.nest("/api/v1", v1);
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    // from_fn cannot take a State extractor, so pass the state explicitly.
    router.layer(middleware::from_fn_with_state(state, bearer_auth_middleware))
}

async fn bearer_auth_middleware(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let authorization = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    if !state.gate.allows(authorization) {
        tracing::debug!("rejected request without a matching bearer token");
        return Err(AppError::Unauthorized);
    }

    Ok(next.run(req).await)
}
