use axum::{Router, routing::get};

use crate::api::v1::handlers::content::content;
use crate::middleware::bearer_auth;
use crate::state::AppState;

/// v1 URL layout. Everything routed here sits behind the bearer gate;
/// routes that must stay public belong next to `/health` in `app`.
pub fn routes(state: AppState) -> Router<AppState> {
    let router = Router::new().route("/content", get(content));
    bearer_auth::apply(router, state)
}
