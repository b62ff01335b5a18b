use axum::response::Html;
use axum::routing::get;
use axum::Router;

use crate::state::AppState;

/// GET / -- plain landing page.
async fn index() -> Html<&'static str> {
    Html("<h1>Welcome to backend server</h1>")
}

/// Mount the root-level landing page (NOT under `/api`).
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(index))
}
