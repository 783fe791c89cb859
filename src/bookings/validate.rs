use time::format_description::FormatItem;
use time::macros::format_description;
use time::{Date, OffsetDateTime, Time};

use crate::bookings::dto::CreateBookingRequest;
use crate::bookings::store::BookingStore;
use crate::catalog::model::Space;
use crate::error::{AppError, AppResult, FieldErrors};
use crate::schedule::hours::{minutes_since_midnight, parse_hhmm, within_operating_hours};

const DATE_FORMAT: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// A proposal that passed every check, with its fields parsed.
#[derive(Debug, Clone, Copy)]
pub struct ValidBooking {
    pub date: Date,
    pub start: Time,
    pub end: Time,
    pub guests: u8,
}

/// End must land after start. `end <= start` is read as an overnight
/// booking ending the next day, so after adding a day the ordering always
/// holds; the helper stays as the single place that states the policy.
pub fn validate_times(start: Time, end: Time) -> bool {
    let s = minutes_since_midnight(start);
    let mut e = minutes_since_midnight(end);
    if e <= s {
        e += 24 * 60;
    }
    e > s
}

/// Gate a booking submission. The single-reservation-per-space rule runs
/// first, before any field is looked at; field checks then accumulate one
/// message per offending field. Nothing is written here — on success the
/// caller hands the parsed proposal to the store.
pub fn validate_booking(
    req: &CreateBookingRequest,
    space: &Space,
    store: &BookingStore,
    email: &str,
    now: OffsetDateTime,
) -> AppResult<ValidBooking> {
    if let Some(existing) = store.get_reservation_for_space(space.id, email) {
        return Err(AppError::BookingConflict {
            message: format!(
                "You already have a booking for {}. Manage your existing reservation instead of creating a new one.",
                space.name
            ),
            existing_id: existing.id,
        });
    }

    let mut errors = FieldErrors::new();
    let today = now.date();
    let current_time = Time::from_hms(now.hour(), now.minute(), 0)
        .unwrap_or(Time::MIDNIGHT);

    let date = if req.booking_date.is_empty() {
        errors.insert("booking_date", "Booking date is required".into());
        None
    } else {
        match Date::parse(&req.booking_date, DATE_FORMAT) {
            Ok(d) if d < today => {
                errors.insert("booking_date", "Date cannot be in the past".into());
                None
            }
            Ok(d) => Some(d),
            Err(_) => {
                errors.insert("booking_date", "Invalid booking date".into());
                None
            }
        }
    };
    let is_today = date == Some(today);

    let start = if req.start_time.is_empty() {
        errors.insert("start_time", "Start time is required".into());
        None
    } else {
        match parse_hhmm(&req.start_time) {
            Some(t) if is_today && t <= current_time => {
                errors.insert("start_time", "Start time cannot be in the past".into());
                None
            }
            Some(t) => Some(t),
            None => {
                errors.insert("start_time", "Invalid start time".into());
                None
            }
        }
    };

    let end = if req.end_time.is_empty() {
        errors.insert("end_time", "End time is required".into());
        None
    } else {
        match parse_hhmm(&req.end_time) {
            Some(t) if is_today && t <= current_time => {
                errors.insert("end_time", "End time cannot be in the past".into());
                None
            }
            Some(t) => Some(t),
            None => {
                errors.insert("end_time", "Invalid end time".into());
                None
            }
        }
    };

    if let (Some(s), Some(e)) = (start, end) {
        if !validate_times(s, e) {
            errors.insert("end_time", "End time must be after start time".into());
        }
    }

    let guests = match req.guests {
        None => {
            errors.insert("guests", "Number of guests is required".into());
            None
        }
        Some(g) if g.fract() != 0.0 => {
            errors.insert("guests", "Number of guests must be a whole number".into());
            None
        }
        Some(g) if g < 1.0 => {
            errors.insert("guests", "At least 1 guest required".into());
            None
        }
        Some(g) if g > 10.0 => {
            errors.insert("guests", "Maximum 10 guests allowed".into());
            None
        }
        Some(g) => Some(g as u8),
    };

    if !space.operating_hours.open_all_day {
        let display = &space.operating_hours.display;
        if let Some(s) = start {
            if !within_operating_hours(s, &space.operating_hours) {
                errors.insert(
                    "start_time",
                    format!("Start time is outside operating hours ({display})"),
                );
            }
        }
        if let Some(e) = end {
            if !within_operating_hours(e, &space.operating_hours) {
                errors.insert(
                    "end_time",
                    format!("End time is outside operating hours ({display})"),
                );
            }
        }
    }

    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    // All four are Some once no field errored.
    match (date, start, end, guests) {
        (Some(date), Some(start), Some(end), Some(guests)) => Ok(ValidBooking {
            date,
            start,
            end,
            guests,
        }),
        _ => Err(AppError::Internal(anyhow::anyhow!(
            "validation passed with missing fields"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bookings::store::{BookingStore, NewReservation};
    use crate::schedule::hours::parse_operating_hours;
    use crate::schedule::slots::resolve_slots;
    use std::path::PathBuf;
    use time::macros::datetime;
    use uuid::Uuid;

    const NOW: OffsetDateTime = datetime!(2025-06-01 12:00:00 UTC);

    fn space(id: u32, hours: &str) -> Space {
        let operating_hours = parse_operating_hours(hours);
        let time_slots: Vec<String> = vec![];
        let slots = resolve_slots(&time_slots, &operating_hours);
        Space {
            id,
            name: "Silent Study Alabang".into(),
            location: "Muntinlupa City".into(),
            price: 350.0,
            description: String::new(),
            amenities: vec![],
            hours: hours.into(),
            time_slots,
            operating_hours,
            slots,
        }
    }

    fn tmp_store() -> (BookingStore, PathBuf) {
        let path =
            std::env::temp_dir().join(format!("studyspot-test-{}.json", Uuid::new_v4()));
        (BookingStore::open(&path), path)
    }

    fn request(date: &str, start: &str, end: &str, guests: Option<f64>) -> CreateBookingRequest {
        CreateBookingRequest {
            space_id: 5,
            booking_date: date.into(),
            start_time: start.into(),
            end_time: end.into(),
            guests,
            time_slot: None,
        }
    }

    fn field_error(result: AppResult<ValidBooking>, field: &str) -> String {
        match result {
            Err(AppError::Validation(errors)) => errors
                .get(field)
                .unwrap_or_else(|| panic!("no error for field {field}: {errors:?}"))
                .clone(),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn accepts_a_well_formed_future_booking() {
        let (store, path) = tmp_store();
        let valid = validate_booking(
            &request("2025-06-02", "09:00", "11:00", Some(2.0)),
            &space(5, "8:00 AM - 10:00 PM"),
            &store,
            "alice@example.com",
            NOW,
        )
        .expect("booking should validate");
        assert_eq!(valid.guests, 2);
        assert_eq!(minutes_since_midnight(valid.start), 9 * 60);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn today_is_an_acceptable_date() {
        let (store, path) = tmp_store();
        let result = validate_booking(
            &request("2025-06-01", "14:00", "16:00", Some(1.0)),
            &space(5, "8:00 AM - 10:00 PM"),
            &store,
            "alice@example.com",
            NOW,
        );
        assert!(result.is_ok());
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn past_date_is_rejected_at_day_granularity() {
        let (store, path) = tmp_store();
        let message = field_error(
            validate_booking(
                &request("2025-05-31", "09:00", "11:00", Some(1.0)),
                &space(5, "8:00 AM - 10:00 PM"),
                &store,
                "alice@example.com",
                NOW,
            ),
            "booking_date",
        );
        assert_eq!(message, "Date cannot be in the past");
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn past_start_time_today_is_rejected() {
        let (store, path) = tmp_store();
        let message = field_error(
            validate_booking(
                &request("2025-06-01", "09:00", "14:00", Some(1.0)),
                &space(5, "8:00 AM - 10:00 PM"),
                &store,
                "alice@example.com",
                NOW,
            ),
            "start_time",
        );
        assert_eq!(message, "Start time cannot be in the past");
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn past_end_time_today_is_rejected() {
        let (store, path) = tmp_store();
        let result = validate_booking(
            &request("2025-06-01", "13:00", "11:00", Some(1.0)),
            &space(5, "8:00 AM - 10:00 PM"),
            &store,
            "alice@example.com",
            NOW,
        );
        assert_eq!(
            field_error(result, "end_time"),
            "End time cannot be in the past"
        );
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn missing_fields_produce_required_errors() {
        let (store, path) = tmp_store();
        let result = validate_booking(
            &request("", "", "", None),
            &space(5, "8:00 AM - 10:00 PM"),
            &store,
            "alice@example.com",
            NOW,
        );
        match result {
            Err(AppError::Validation(errors)) => {
                assert_eq!(errors.get("booking_date").unwrap(), "Booking date is required");
                assert_eq!(errors.get("start_time").unwrap(), "Start time is required");
                assert_eq!(errors.get("end_time").unwrap(), "End time is required");
                assert_eq!(errors.get("guests").unwrap(), "Number of guests is required");
            }
            other => panic!("expected validation error, got {other:?}"),
        }
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn guest_count_bounds_and_integrality() {
        let (store, path) = tmp_store();
        let hours_space = space(5, "24/7");
        let cases = [
            (Some(0.0), "At least 1 guest required"),
            (Some(11.0), "Maximum 10 guests allowed"),
            (Some(2.5), "Number of guests must be a whole number"),
        ];
        for (guests, expected) in cases {
            let message = field_error(
                validate_booking(
                    &request("2025-06-02", "09:00", "11:00", guests),
                    &hours_space,
                    &store,
                    "alice@example.com",
                    NOW,
                ),
                "guests",
            );
            assert_eq!(message, expected);
        }
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn times_outside_operating_hours_are_rejected() {
        let (store, path) = tmp_store();
        let result = validate_booking(
            &request("2025-06-02", "07:00", "23:00", Some(1.0)),
            &space(5, "8:00 AM - 10:00 PM"),
            &store,
            "alice@example.com",
            NOW,
        );
        match result {
            Err(AppError::Validation(errors)) => {
                assert!(errors.get("start_time").unwrap().contains("outside operating hours"));
                assert!(errors.get("end_time").unwrap().contains("outside operating hours"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn hours_check_is_skipped_for_24_7_spaces() {
        let (store, path) = tmp_store();
        // An overnight window no fixed-hours space would accept.
        let result = validate_booking(
            &request("2025-06-02", "23:00", "03:00", Some(1.0)),
            &space(7, "24/7"),
            &store,
            "alice@example.com",
            NOW,
        );
        assert!(result.is_ok());
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn overnight_window_within_hours_that_cross_midnight() {
        let (store, path) = tmp_store();
        let result = validate_booking(
            &request("2025-06-02", "23:00", "02:00", Some(1.0)),
            &space(5, "10:00 PM - 6:00 AM"),
            &store,
            "alice@example.com",
            NOW,
        );
        assert!(result.is_ok());
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn existing_reservation_for_the_space_blocks_before_field_checks() {
        let (store, path) = tmp_store();
        let existing = store.add(NewReservation {
            user_id: Uuid::new_v4(),
            user_email: "alice@example.com".into(),
            space_id: 5,
            space_name: "Silent Study Alabang".into(),
            booking_date: "2025-06-03".into(),
            start_time: "09:00".into(),
            end_time: "11:00".into(),
            guests: 1,
            total_price: 700.0,
            time_slot: None,
        });

        // Even a proposal with garbage fields and a different date is
        // rejected up-front with the conflict, not field errors.
        let result = validate_booking(
            &request("", "", "", None),
            &space(5, "8:00 AM - 10:00 PM"),
            &store,
            "alice@example.com",
            NOW,
        );
        match result {
            Err(AppError::BookingConflict { existing_id, .. }) => {
                assert_eq!(existing_id, existing.id)
            }
            other => panic!("expected conflict, got {other:?}"),
        }

        // Other users and other spaces are unaffected.
        assert!(validate_booking(
            &request("2025-06-02", "09:00", "11:00", Some(1.0)),
            &space(5, "8:00 AM - 10:00 PM"),
            &store,
            "bob@example.com",
            NOW,
        )
        .is_ok());
        assert!(validate_booking(
            &request("2025-06-02", "09:00", "11:00", Some(1.0)),
            &space(6, "8:00 AM - 10:00 PM"),
            &store,
            "alice@example.com",
            NOW,
        )
        .is_ok());

        // Cancelling frees the space again.
        store.cancel(existing.id);
        assert!(validate_booking(
            &request("2025-06-02", "09:00", "11:00", Some(1.0)),
            &space(5, "8:00 AM - 10:00 PM"),
            &store,
            "alice@example.com",
            NOW,
        )
        .is_ok());
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn validate_times_allows_overnight_wraparound() {
        let t = |s: &str| parse_hhmm(s).expect("valid test time");
        assert!(validate_times(t("09:00"), t("10:00")));
        // Next-day end under the wraparound policy.
        assert!(validate_times(t("10:00"), t("09:00")));
        assert!(validate_times(t("22:00"), t("02:00")));
    }
}
