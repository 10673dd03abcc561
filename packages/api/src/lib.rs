// ABOUTME: HTTP layer for Tasklist: route table, handlers, and rendering
// ABOUTME: Browser routes render HTML and redirect; /api routes speak JSON

use axum::{
    routing::{delete, get, post},
    Router,
};

use tasklist_storage::Database;

pub mod error;
pub mod handlers;
pub mod health;
pub mod render;
pub mod response;
pub mod todos_handlers;

pub use error::{AppError, PageError};
pub use response::ApiResponse;

/// Creates the full application router.
///
/// Routes are matched by path first; a known path with the wrong method is a
/// 405, an unknown path falls through to the HTML 404 page.
pub fn create_router(db: Database) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/add/", post(handlers::add_item))
        .route("/toggle/{id}/", post(handlers::toggle_item))
        .route("/delete/{id}/", post(handlers::delete_item))
        .route("/clear-completed/", post(handlers::clear_completed))
        .nest("/api", create_api_router())
        .fallback(handlers::not_found)
        .with_state(db)
}

/// Creates the JSON API router (nested under /api)
pub fn create_api_router() -> Router<Database> {
    Router::new()
        .route("/health", get(health::health_check))
        .route(
            "/todos",
            get(todos_handlers::list_todos)
                .post(todos_handlers::create_todo)
                .delete(todos_handlers::clear_completed_todos),
        )
        .route("/todos/{id}", delete(todos_handlers::delete_todo))
        .route("/todos/{id}/toggle", post(todos_handlers::toggle_todo))
}
