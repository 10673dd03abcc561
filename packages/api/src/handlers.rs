// ABOUTME: HTTP request handlers for the browser-facing task list
// ABOUTME: One index page plus four POST actions that redirect back with the filter preserved

use std::convert::Infallible;

use axum::{
    extract::{rejection::FormRejection, FromRequestParts, Path, State},
    http::{header, request::Parts, StatusCode, Uri},
    response::{Html, IntoResponse, Response},
    Form,
};
use serde::Deserialize;
use tasklist_storage::{Database, Filter, StorageError};
use tracing::{debug, info, warn};

use crate::error::{AppError, PageError};
use crate::render::{self, IndexView};

/// The `filter` query parameter, kept as the raw string the client sent.
///
/// Never rejects: a repeated key keeps its last value and anything
/// unparseable simply has no filter.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct FilterQuery {
    pub filter: Option<String>,
}

impl FilterQuery {
    pub fn from_query(query: Option<&str>) -> Self {
        let filter = query.and_then(|q| {
            url::form_urlencoded::parse(q.as_bytes())
                .filter(|(key, _)| key == "filter")
                .map(|(_, value)| value.into_owned())
                .last()
        });
        Self { filter }
    }
}

impl<S> FromRequestParts<S> for FilterQuery
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_query(parts.uri.query()))
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct AddItemForm {
    #[serde(default)]
    pub text: String,
}

/// Render the list for the requested filter.
///
/// An unrecognized filter is echoed back as-is but lists every item.
pub async fn index(
    State(db): State<Database>,
    params: FilterQuery,
) -> Result<Html<String>, PageError> {
    let raw_filter = params.filter.as_deref().unwrap_or("all");
    let filter = Filter::from_query(Some(raw_filter));

    debug!("Rendering index (filter: {})", raw_filter);

    let items = db.items().list(filter).await?;
    let counts = db.items().counts().await?;

    Ok(Html(render::index_page(&IndexView {
        items: &items,
        filter: raw_filter,
        counts,
    })))
}

/// Create an item from the submitted form. Blank or over-long text is skipped.
pub async fn add_item(
    State(db): State<Database>,
    params: FilterQuery,
    form: Result<Form<AddItemForm>, FormRejection>,
) -> Result<Response, PageError> {
    let text = match form {
        Ok(Form(form)) => form.text,
        Err(rejection) => {
            debug!("Unreadable add form treated as empty: {}", rejection);
            String::new()
        }
    };

    match db.items().create(&text).await {
        Ok(item) => info!("Created item {}", item.id),
        Err(StorageError::EmptyText) => debug!("Skipping blank item"),
        Err(StorageError::TextTooLong { len, max }) => {
            warn!("Skipping item with {} characters (limit {})", len, max)
        }
        Err(e) => return Err(e.into()),
    }

    Ok(redirect_with_filter(params.filter.as_deref()))
}

pub async fn toggle_item(
    State(db): State<Database>,
    Path(id): Path<String>,
    params: FilterQuery,
) -> Result<Response, PageError> {
    let id = parse_id(&id)?;
    let item = db.items().toggle(id).await?;

    info!("Toggled item {} (completed: {})", item.id, item.completed);
    Ok(redirect_with_filter(params.filter.as_deref()))
}

pub async fn delete_item(
    State(db): State<Database>,
    Path(id): Path<String>,
    params: FilterQuery,
) -> Result<Response, PageError> {
    let id = parse_id(&id)?;
    db.items().delete(id).await?;

    info!("Deleted item {}", id);
    Ok(redirect_with_filter(params.filter.as_deref()))
}

pub async fn clear_completed(
    State(db): State<Database>,
    params: FilterQuery,
) -> Result<Response, PageError> {
    let removed = db.items().delete_where_completed().await?;

    info!("Cleared {} completed items", removed);
    Ok(redirect_with_filter(params.filter.as_deref()))
}

/// Catch-all for paths outside the route table
pub async fn not_found(uri: Uri) -> PageError {
    debug!("No route for {}", uri.path());
    PageError(AppError::not_found())
}

/// Where a POST action sends the browser afterwards.
///
/// A missing filter counts as `all`; a valid one is kept; anything else
/// falls back to the bare index.
pub fn redirect_target(filter: Option<&str>) -> String {
    let filter = filter.unwrap_or("all");
    match filter.parse::<Filter>() {
        Ok(f) => format!("/?filter={}", f),
        Err(_) => "/".to_string(),
    }
}

/// 302 back to the index, keeping the current request's filter when it is valid
pub fn redirect_with_filter(filter: Option<&str>) -> Response {
    (
        StatusCode::FOUND,
        [(header::LOCATION, redirect_target(filter))],
    )
        .into_response()
}

/// Only plain digit runs are ids; anything else never matches an item
pub(crate) fn parse_id(raw: &str) -> Result<i64, AppError> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AppError::not_found());
    }
    raw.parse::<i64>().map_err(|_| AppError::not_found())
}
