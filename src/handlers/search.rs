use std::sync::Arc;

use axum::extract::{Query, State};
use axum::response::Response;
use serde::Deserialize;

use crate::db::queries;
use crate::errors::AppError;
use crate::handlers::json_response;
use crate::models::DateRange;
use crate::services::search::{self, SearchParams, SortBy, SortOrder};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct SearchQuery {
    pub check_in: String,
    pub check_out: String,
    pub guests: Option<i64>,
    pub sort_by: Option<SortBy>,
    pub sort_order: Option<SortOrder>,
    pub page: Option<usize>,
    pub take: Option<usize>,
}

// GET /api/search
pub async fn search_properties(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
) -> Result<Response, AppError> {
    let range = DateRange::parse(&query.check_in, &query.check_out)?;
    let params = SearchParams {
        range,
        guests: query.guests.unwrap_or(1),
        sort_by: query.sort_by.unwrap_or(SortBy::Price),
        sort_order: query.sort_order.unwrap_or(SortOrder::Asc),
        page: query.page.unwrap_or(1),
        take: query.take.unwrap_or(10),
    };

    let cache_key = format!(
        "search:{}:{}:{}:{:?}:{:?}:{}:{}",
        query.check_in,
        query.check_out,
        params.guests,
        params.sort_by,
        params.sort_order,
        params.page,
        params.take,
    );
    if let Some(hit) = state.cache.get(&cache_key) {
        return Ok(json_response(hit));
    }

    let page = {
        let db = state.db.lock().unwrap();
        let properties = queries::list_published_properties(&db)?;
        let mut candidates = Vec::with_capacity(properties.len());
        for property in &properties {
            candidates.push(queries::load_property_inventory(&db, property, &range)?);
        }
        search::search(&candidates, &params)
    };

    let body = serde_json::to_string(&page).map_err(anyhow::Error::from)?;
    state.cache.put(&cache_key, body.clone());
    Ok(json_response(body))
}
