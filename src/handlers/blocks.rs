use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::Deserialize;

use crate::errors::AppError;
use crate::handlers::tenant_from_headers;
use crate::models::date::{parse_date, today};
use crate::models::{BlockPatch, DateRange, MaintenanceBlock};
use crate::services::maintenance;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct CreateBlockRequest {
    pub start_date: String,
    pub end_date: String,
    pub blocked_units: Option<i64>,
    pub reason: Option<String>,
}

// POST /api/rooms/:room_id/blocks
pub async fn create_block(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<i64>,
    headers: HeaderMap,
    Json(req): Json<CreateBlockRequest>,
) -> Result<(StatusCode, Json<MaintenanceBlock>), AppError> {
    let tenant_id = tenant_from_headers(&headers)?;
    let range = DateRange::parse(&req.start_date, &req.end_date)?;

    let mut db = state.db.lock().unwrap();
    let block = maintenance::create_block(
        &mut db,
        &state.cache,
        &tenant_id,
        room_id,
        range,
        req.blocked_units.unwrap_or(1),
        req.reason.as_deref(),
    )?;

    Ok((StatusCode::CREATED, Json(block)))
}

#[derive(Deserialize)]
pub struct UpdateBlockRequest {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub blocked_units: Option<i64>,
    pub reason: Option<String>,
}

// PATCH /api/blocks/:id
pub async fn update_block(
    State(state): State<Arc<AppState>>,
    Path(block_id): Path<i64>,
    headers: HeaderMap,
    Json(req): Json<UpdateBlockRequest>,
) -> Result<Json<MaintenanceBlock>, AppError> {
    let tenant_id = tenant_from_headers(&headers)?;
    let patch = BlockPatch {
        start_date: req.start_date.as_deref().map(parse_date).transpose()?,
        end_date: req.end_date.as_deref().map(parse_date).transpose()?,
        blocked_units: req.blocked_units,
        reason: req.reason,
    };

    let mut db = state.db.lock().unwrap();
    let block =
        maintenance::update_block(&mut db, &state.cache, &tenant_id, block_id, &patch, today())?;
    Ok(Json(block))
}

// DELETE /api/blocks/:id
pub async fn delete_block(
    State(state): State<Arc<AppState>>,
    Path(block_id): Path<i64>,
    headers: HeaderMap,
) -> Result<StatusCode, AppError> {
    let tenant_id = tenant_from_headers(&headers)?;

    let mut db = state.db.lock().unwrap();
    maintenance::delete_block(&mut db, &state.cache, &tenant_id, block_id, today())?;
    Ok(StatusCode::NO_CONTENT)
}
