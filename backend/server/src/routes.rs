use std::sync::Arc;

use axum::{
    extract::{Path, Query, State as AxumState},
    http::header::CONTENT_TYPE,
    response::{Html, IntoResponse},
};
use crate::{
    error::AppError,
    render::render_index,
    state::State,
    utils::{known_tab, tab_or_home},
};

pub const JSON_UTF8: &str = "application/json; charset=utf-8";

pub async fn index_handler(
    AxumState(state): AxumState<Arc<State>>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<impl IntoResponse, AppError> {
    // repeated keys are allowed, the first `tab` wins
    let tab = params.iter().find(|(key, _)| key == "tab").map(|(_, value)| value.as_str());
    let active_tab = tab_or_home(tab);
    let settings = state.settings().await?;

    let html = render_index(&state.templates, &settings, active_tab)?;

    Ok(Html(html))
}

pub async fn api_handler(
    AxumState(state): AxumState<Arc<State>>,
    Path(tab): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let tab = known_tab(&tab)?;
    let rows = state.rows(tab).await?;

    let body = serde_json::to_string(&*rows)?;

    Ok(([(CONTENT_TYPE, JSON_UTF8)], body))
}

pub async fn health_handler() -> &'static str {
    "ok"
}
