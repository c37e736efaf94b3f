use axum::routing::post;
use axum::Router;

use crate::handlers::attach;
use crate::state::AppState;

/// Mount the upload route.
///
/// ```text
/// POST /attach    resize the uploaded image and store every variant
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/attach", post(attach::attach))
}
