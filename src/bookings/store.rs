use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::warn;
use uuid::Uuid;

use crate::schedule::hours::{minutes_since_midnight, parse_hhmm};

/// File name of the slot an older deployment wrote to. Read once, as an
/// import, when the current slot does not exist yet.
const LEGACY_SLOT_FILE: &str = "bookings.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    /// The only status ever written: cancellation deletes the record
    /// instead of transitioning it.
    Confirmed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reservation {
    pub id: i64,
    pub user_id: Uuid,
    pub user_email: String,
    pub space_id: u32,
    pub space_name: String,
    /// Calendar date, ISO "YYYY-MM-DD".
    pub booking_date: String,
    /// Wall-clock "HH:MM", 24-hour.
    pub start_time: String,
    pub end_time: String,
    pub guests: u8,
    pub total_price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_slot: Option<String>,
    pub status: BookingStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// A reservation as handed to the store, before an id and timestamp are
/// assigned. All gating happens in the validator; `add` never rejects.
#[derive(Debug, Clone)]
pub struct NewReservation {
    pub user_id: Uuid,
    pub user_email: String,
    pub space_id: u32,
    pub space_name: String,
    pub booking_date: String,
    pub start_time: String,
    pub end_time: String,
    pub guests: u8,
    pub total_price: f64,
    pub time_slot: Option<String>,
}

/// The user-scoped reservation collection, persisted whole to a single
/// JSON slot file. Reads fail open: a missing or corrupt slot loads as an
/// empty collection. Writes are best-effort and never surface errors.
pub struct BookingStore {
    path: PathBuf,
    inner: Mutex<Vec<Reservation>>,
}

impl BookingStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let reservations = match load_slot(&path) {
            Some(items) => items,
            None => {
                // First run on this slot name: import the legacy slot if
                // one sits next to it.
                let legacy = path.with_file_name(LEGACY_SLOT_FILE);
                load_slot(&legacy).unwrap_or_default()
            }
        };
        Self {
            path,
            inner: Mutex::new(reservations),
        }
    }

    /// Assign an id and creation timestamp, append, persist, and return
    /// the stored record.
    pub fn add(&self, new: NewReservation) -> Reservation {
        let mut inner = self.guard();
        let now = OffsetDateTime::now_utc();
        let mut id = (now.unix_timestamp_nanos() / 1_000_000) as i64;
        // Ids are time-of-creation based but must stay unique and
        // monotone even for back-to-back submissions.
        if let Some(max) = inner.iter().map(|r| r.id).max() {
            if id <= max {
                id = max + 1;
            }
        }
        let reservation = Reservation {
            id,
            user_id: new.user_id,
            user_email: new.user_email,
            space_id: new.space_id,
            space_name: new.space_name,
            booking_date: new.booking_date,
            start_time: new.start_time,
            end_time: new.end_time,
            guests: new.guests,
            total_price: new.total_price,
            time_slot: new.time_slot,
            status: BookingStatus::Confirmed,
            created_at: now,
        };
        inner.push(reservation.clone());
        self.persist(&inner);
        reservation
    }

    /// Hard-delete the reservation with this id. No-op if absent.
    pub fn cancel(&self, id: i64) -> bool {
        let mut inner = self.guard();
        let before = inner.len();
        inner.retain(|r| r.id != id);
        let removed = inner.len() != before;
        if removed {
            self.persist(&inner);
        }
        removed
    }

    pub fn find(&self, id: i64) -> Option<Reservation> {
        self.guard().iter().find(|r| r.id == id).cloned()
    }

    /// All reservations owned by this email. No ordering guarantee;
    /// callers sort for display.
    pub fn list_by_user(&self, email: &str) -> Vec<Reservation> {
        self.guard()
            .iter()
            .filter(|r| r.user_email == email)
            .cloned()
            .collect()
    }

    pub fn has_reservation_for_space(&self, space_id: u32, email: &str) -> bool {
        self.get_reservation_for_space(space_id, email).is_some()
    }

    pub fn get_reservation_for_space(&self, space_id: u32, email: &str) -> Option<Reservation> {
        self.guard()
            .iter()
            .find(|r| r.space_id == space_id && r.user_email == email)
            .cloned()
    }

    /// Whether this email already holds the exact same space/date/window.
    pub fn has_duplicate_slot(
        &self,
        space_id: u32,
        email: &str,
        date: &str,
        start: &str,
        end: &str,
    ) -> bool {
        self.guard().iter().any(|r| {
            r.space_id == space_id
                && r.user_email == email
                && r.booking_date == date
                && r.start_time == start
                && r.end_time == end
        })
    }

    /// Whether [start, end) intersects any reservation for this space and
    /// date, across all users. Half-open intervals: touching boundaries
    /// do not overlap.
    pub fn has_overlap(&self, space_id: u32, date: &str, start: &str, end: &str) -> bool {
        let (Some(s), Some(e)) = (slot_minutes(start), slot_minutes(end)) else {
            return false;
        };
        self.guard().iter().any(|r| {
            if r.space_id != space_id || r.booking_date != date {
                return false;
            }
            match (slot_minutes(&r.start_time), slot_minutes(&r.end_time)) {
                (Some(rs), Some(re)) => s < re && rs < e,
                _ => false,
            }
        })
    }

    fn guard(&self) -> MutexGuard<'_, Vec<Reservation>> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn persist(&self, items: &[Reservation]) {
        match serde_json::to_string_pretty(items) {
            Ok(json) => {
                if let Err(e) = fs::write(&self.path, json) {
                    warn!(error = %e, path = %self.path.display(), "failed to persist bookings");
                }
            }
            Err(e) => warn!(error = %e, "failed to serialize bookings"),
        }
    }
}

fn load_slot(path: &Path) -> Option<Vec<Reservation>> {
    let raw = fs::read_to_string(path).ok()?;
    match serde_json::from_str(&raw) {
        Ok(items) => Some(items),
        Err(e) => {
            warn!(error = %e, path = %path.display(), "corrupt bookings slot; starting empty");
            Some(Vec::new())
        }
    }
}

fn slot_minutes(value: &str) -> Option<i32> {
    parse_hhmm(value).map(minutes_since_midnight)
}
