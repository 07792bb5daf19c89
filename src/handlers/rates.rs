use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::Deserialize;

use crate::errors::AppError;
use crate::handlers::tenant_from_headers;
use crate::models::date::{parse_date, today};
use crate::models::{DateRange, RatePatch, RateScope, SeasonalRate};
use crate::services::rates;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct CreateRateRequest {
    pub room_id: Option<i64>,
    pub property_id: Option<i64>,
    pub name: String,
    pub start_date: String,
    pub end_date: String,
    pub fixed_price: f64,
}

// POST /api/rates
pub async fn create_rate(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<CreateRateRequest>,
) -> Result<(StatusCode, Json<SeasonalRate>), AppError> {
    let tenant_id = tenant_from_headers(&headers)?;
    let scope = RateScope::from_ids(req.room_id, req.property_id)?;
    let range = DateRange::parse(&req.start_date, &req.end_date)?;

    let mut db = state.db.lock().unwrap();
    let rate = rates::create_rate(
        &mut db,
        &state.cache,
        &tenant_id,
        scope,
        &req.name,
        range,
        req.fixed_price,
    )?;

    Ok((StatusCode::CREATED, Json(rate)))
}

#[derive(Deserialize)]
pub struct UpdateRateRequest {
    pub name: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub fixed_price: Option<f64>,
}

// PATCH /api/rates/:id
pub async fn update_rate(
    State(state): State<Arc<AppState>>,
    Path(rate_id): Path<i64>,
    headers: HeaderMap,
    Json(req): Json<UpdateRateRequest>,
) -> Result<Json<SeasonalRate>, AppError> {
    let tenant_id = tenant_from_headers(&headers)?;
    let patch = RatePatch {
        name: req.name,
        start_date: req.start_date.as_deref().map(parse_date).transpose()?,
        end_date: req.end_date.as_deref().map(parse_date).transpose()?,
        fixed_price: req.fixed_price,
    };

    let mut db = state.db.lock().unwrap();
    let rate = rates::update_rate(&mut db, &state.cache, &tenant_id, rate_id, &patch, today())?;
    Ok(Json(rate))
}

// DELETE /api/rates/:id
pub async fn delete_rate(
    State(state): State<Arc<AppState>>,
    Path(rate_id): Path<i64>,
    headers: HeaderMap,
) -> Result<StatusCode, AppError> {
    let tenant_id = tenant_from_headers(&headers)?;

    let mut db = state.db.lock().unwrap();
    rates::delete_rate(&mut db, &state.cache, &tenant_id, rate_id, today())?;
    Ok(StatusCode::NO_CONTENT)
}
