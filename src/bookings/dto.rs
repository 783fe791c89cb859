use serde::{Deserialize, Serialize};

/// Booking submission. Date and time fields arrive as the form's wall-clock
/// strings and are validated field by field, so missing values default to
/// empty rather than failing deserialization.
#[derive(Debug, Deserialize)]
pub struct CreateBookingRequest {
    pub space_id: u32,
    #[serde(default)]
    pub booking_date: String,
    #[serde(default)]
    pub start_time: String,
    #[serde(default)]
    pub end_time: String,
    pub guests: Option<f64>,
    #[serde(default)]
    pub time_slot: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct QuoteParams {
    #[serde(default)]
    pub start_time: String,
    #[serde(default)]
    pub end_time: String,
    pub guests: Option<u8>,
}

#[derive(Debug, Serialize)]
pub struct QuoteResponse {
    pub space_id: u32,
    pub hourly_price: f64,
    pub billable_hours: u32,
    pub guests: u8,
    pub total: f64,
}
