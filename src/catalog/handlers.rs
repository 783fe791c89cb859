use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::{
    catalog::model::Space,
    error::{AppError, AppResult},
    schedule::hours::format_hhmm,
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Serialize)]
pub struct SpaceSummary {
    pub id: u32,
    pub name: String,
    pub location: String,
    pub price: f64,
    pub hours: String,
    pub amenities: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct SlotDto {
    pub label: String,
    pub start_time: String,
    pub end_time: String,
}

#[derive(Debug, Serialize)]
pub struct SpaceDetail {
    pub id: u32,
    pub name: String,
    pub location: String,
    pub description: String,
    pub price: f64,
    pub amenities: Vec<String>,
    pub hours: String,
    pub opens_at: String,
    pub closes_at: String,
    pub open_all_day: bool,
    pub time_slots: Vec<SlotDto>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/spaces", get(list_spaces))
        .route("/spaces/:id", get(get_space))
}

#[instrument(skip(state))]
pub async fn list_spaces(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Json<Vec<SpaceSummary>> {
    let items = state
        .catalog
        .search(&params.q)
        .into_iter()
        .map(summary)
        .collect();
    Json(items)
}

#[instrument(skip(state))]
pub async fn get_space(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> AppResult<Json<SpaceDetail>> {
    let space = state
        .catalog
        .get(id)
        .ok_or_else(|| AppError::NotFound(format!("Space {id} not found")))?;
    Ok(Json(detail(space)))
}

fn summary(space: &Space) -> SpaceSummary {
    SpaceSummary {
        id: space.id,
        name: space.name.clone(),
        location: space.location.clone(),
        price: space.price,
        hours: space.operating_hours.display.clone(),
        amenities: space.amenities.clone(),
    }
}

fn detail(space: &Space) -> SpaceDetail {
    SpaceDetail {
        id: space.id,
        name: space.name.clone(),
        location: space.location.clone(),
        description: space.description.clone(),
        price: space.price,
        amenities: space.amenities.clone(),
        hours: space.operating_hours.display.clone(),
        opens_at: format_hhmm(space.operating_hours.start),
        closes_at: format_hhmm(space.operating_hours.end),
        open_all_day: space.operating_hours.open_all_day,
        time_slots: space
            .slots
            .iter()
            .map(|slot| SlotDto {
                label: slot.label.clone(),
                start_time: format_hhmm(slot.start),
                end_time: format_hhmm(slot.end),
            })
            .collect(),
    }
}
