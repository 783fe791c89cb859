use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::{delete, get, post},
    Json, Router,
};
use time::OffsetDateTime;
use tracing::{info, instrument, warn};

use crate::{
    auth::jwt::AuthUser,
    bookings::{
        dto::{CreateBookingRequest, QuoteParams, QuoteResponse},
        price,
        store::{NewReservation, Reservation},
        validate::validate_booking,
    },
    error::{AppError, AppResult, FieldErrors},
    schedule::{hours::format_hhmm, hours::parse_hhmm, slots::matches_slot},
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/bookings", post(create_booking).get(list_bookings))
        .route("/bookings/:id", delete(cancel_booking))
        .route("/spaces/:id/quote", get(quote))
}

#[instrument(skip(state, user, payload), fields(email = %user.0.email))]
pub async fn create_booking(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateBookingRequest>,
) -> AppResult<(StatusCode, HeaderMap, Json<Reservation>)> {
    let AuthUser(user) = user;
    let space = state
        .catalog
        .get(payload.space_id)
        .ok_or_else(|| AppError::NotFound(format!("Space {} not found", payload.space_id)))?;

    let valid = match validate_booking(
        &payload,
        space,
        &state.store,
        &user.email,
        OffsetDateTime::now_utc(),
    ) {
        Ok(v) => v,
        Err(e) => {
            warn!(space_id = space.id, "booking rejected: {e}");
            return Err(e);
        }
    };

    let total_price = price::total(space.price, valid.start, valid.end, valid.guests);

    // The quick-select marker only survives if the submitted window still
    // matches what the label resolves to; a manual edit clears it.
    let time_slot = payload.time_slot.as_deref().and_then(|label| {
        matches_slot(label, &space.operating_hours, valid.start, valid.end)
            .then(|| label.to_string())
    });

    let reservation = state.store.add(NewReservation {
        user_id: user.id,
        user_email: user.email.clone(),
        space_id: space.id,
        space_name: space.name.clone(),
        booking_date: payload.booking_date.clone(),
        start_time: format_hhmm(valid.start),
        end_time: format_hhmm(valid.end),
        guests: valid.guests,
        total_price,
        time_slot,
    });

    info!(
        booking_id = reservation.id,
        space_id = space.id,
        date = %reservation.booking_date,
        "booking confirmed"
    );

    let mut headers = HeaderMap::new();
    if let Ok(location) = format!("/api/v1/bookings/{}", reservation.id).parse() {
        headers.insert(axum::http::header::LOCATION, location);
    }
    Ok((StatusCode::CREATED, headers, Json(reservation)))
}

#[instrument(skip(state, user), fields(email = %user.0.email))]
pub async fn list_bookings(
    State(state): State<AppState>,
    user: AuthUser,
) -> Json<Vec<Reservation>> {
    let mut items = state.store.list_by_user(&user.0.email);
    // Soonest first; ISO dates and zero-padded times sort lexically.
    items.sort_by(|a, b| {
        (a.booking_date.as_str(), a.start_time.as_str())
            .cmp(&(b.booking_date.as_str(), b.start_time.as_str()))
    });
    Json(items)
}

/// Cancellation is a hard delete and a no-op for ids the caller does not
/// own (or that never existed).
#[instrument(skip(state, user), fields(email = %user.0.email))]
pub async fn cancel_booking(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> StatusCode {
    if let Some(reservation) = state.store.find(id) {
        if reservation.user_email == user.0.email {
            state.store.cancel(id);
            info!(booking_id = id, space_id = reservation.space_id, "booking cancelled");
        }
    }
    StatusCode::NO_CONTENT
}

/// Running total for the booking form: hourly rate × whole hours × guests.
#[instrument(skip(state))]
pub async fn quote(
    State(state): State<AppState>,
    Path(space_id): Path<u32>,
    Query(params): Query<QuoteParams>,
) -> AppResult<Json<QuoteResponse>> {
    let space = state
        .catalog
        .get(space_id)
        .ok_or_else(|| AppError::NotFound(format!("Space {space_id} not found")))?;

    let mut errors = FieldErrors::new();
    let start = parse_hhmm(&params.start_time);
    if start.is_none() {
        errors.insert("start_time", "Invalid start time".into());
    }
    let end = parse_hhmm(&params.end_time);
    if end.is_none() {
        errors.insert("end_time", "Invalid end time".into());
    }
    let (Some(start), Some(end)) = (start, end) else {
        return Err(AppError::Validation(errors));
    };

    let guests = params.guests.unwrap_or(1);
    Ok(Json(QuoteResponse {
        space_id,
        hourly_price: space.price,
        billable_hours: price::billable_hours(start, end),
        guests,
        total: price::total(space.price, start, end, guests),
    }))
}
