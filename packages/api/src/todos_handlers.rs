// ABOUTME: JSON API handlers for task list items
// ABOUTME: Same store operations as the HTML routes, answered with ApiResponse envelopes

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tasklist_storage::{Database, Filter, Item, ItemCounts};
use tracing::{debug, info};

use crate::error::AppError;
use crate::handlers::{parse_id, FilterQuery};
use crate::response::ApiResponse;

#[derive(Debug, Serialize, Deserialize)]
pub struct CountsBody {
    pub active: i64,
    pub completed: i64,
    pub all: i64,
}

impl From<ItemCounts> for CountsBody {
    fn from(counts: ItemCounts) -> Self {
        Self {
            active: counts.active,
            completed: counts.completed,
            all: counts.all(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TodoListing {
    pub items: Vec<Item>,
    pub filter: Filter,
    pub counts: CountsBody,
}

#[derive(Debug, Deserialize)]
pub struct CreateTodoRequest {
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ClearCompletedBody {
    pub removed: u64,
}

/// List items for a filter along with both counts
pub async fn list_todos(
    State(db): State<Database>,
    params: FilterQuery,
) -> Result<Json<ApiResponse<TodoListing>>, AppError> {
    let filter = Filter::from_query(params.filter.as_deref());
    info!("Listing todos (filter: {})", filter);

    let items = db.items().list(filter).await?;
    let counts = db.items().counts().await?;

    Ok(Json(ApiResponse::success(TodoListing {
        items,
        filter,
        counts: counts.into(),
    })))
}

/// Create an item; a missing, blank, or over-long text is a 400
pub async fn create_todo(
    State(db): State<Database>,
    body: Result<Json<CreateTodoRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<Item>>), AppError> {
    let Json(request) = body.map_err(|rejection| {
        debug!("Rejected create body: {}", rejection.body_text());
        AppError::validation("text is required")
    })?;

    let item = db.items().create(&request.text).await?;
    info!("Created todo {}", item.id);

    Ok((StatusCode::CREATED, Json(ApiResponse::success(item))))
}

pub async fn toggle_todo(
    State(db): State<Database>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Item>>, AppError> {
    let id = parse_id(&id)?;
    let item = db.items().toggle(id).await?;
    info!("Toggled todo {} (completed: {})", item.id, item.completed);

    Ok(Json(ApiResponse::success(item)))
}

pub async fn delete_todo(
    State(db): State<Database>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = parse_id(&id)?;
    db.items().delete(id).await?;
    info!("Deleted todo {}", id);

    Ok(StatusCode::NO_CONTENT)
}

/// Remove every completed item
pub async fn clear_completed_todos(
    State(db): State<Database>,
) -> Result<Json<ApiResponse<ClearCompletedBody>>, AppError> {
    let removed = db.items().delete_where_completed().await?;
    info!("Cleared {} completed todos", removed);

    Ok(Json(ApiResponse::success(ClearCompletedBody { removed })))
}
