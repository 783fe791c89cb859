use time::{Duration, Time};

use crate::schedule::hours::{to_24_hour, OperatingHours, RANGE_RE};

/// A quick-select label resolved to a concrete window. Advisory only: it
/// pre-fills the booking form, and a manual edit clears the label again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeSlot {
    pub label: String,
    pub start: Time,
    pub end: Time,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotWindow {
    pub start: Time,
    pub end: Time,
}

/// Map a free-text slot label to a start/end pair.
///
/// An explicit range embedded in the label ("Morning Session (10:00 AM -
/// 2:00 PM)", "9am-1pm") always wins. Otherwise well-known pass names and
/// session keywords map to fixed windows, and anything else gets a one-hour
/// window anchored at opening time.
pub fn resolve_slot(label: &str, hours: &OperatingHours) -> SlotWindow {
    if let Some(window) = extract_embedded_range(label) {
        return window;
    }

    let lowered = label.to_lowercase();

    if lowered.contains("full day") || lowered.contains("24-hour") {
        return SlotWindow {
            start: hours.start,
            end: hours.end,
        };
    }
    if lowered.contains("night owl") || lowered.contains("night pass") {
        return SlotWindow {
            start: fixed(21, 0),
            end: fixed(6, 0),
        };
    }
    if lowered.contains("early bird") {
        return SlotWindow {
            start: fixed(6, 0),
            end: fixed(10, 0),
        };
    }
    if lowered.contains("morning") {
        return SlotWindow {
            start: fixed(8, 0),
            end: fixed(12, 0),
        };
    }
    if lowered.contains("afternoon") {
        return SlotWindow {
            start: fixed(12, 0),
            end: fixed(17, 0),
        };
    }
    if lowered.contains("evening") || lowered.contains("night") {
        return SlotWindow {
            start: fixed(17, 0),
            end: fixed(21, 0),
        };
    }

    // Unrecognized label: one hour from opening.
    SlotWindow {
        start: hours.start,
        end: hours.start + Duration::hours(1),
    }
}

/// Resolve every label a space advertises, in catalog order.
pub fn resolve_slots(labels: &[String], hours: &OperatingHours) -> Vec<TimeSlot> {
    labels
        .iter()
        .map(|label| {
            let window = resolve_slot(label, hours);
            TimeSlot {
                label: label.clone(),
                start: window.start,
                end: window.end,
            }
        })
        .collect()
}

/// Whether submitted times still match the window a label resolves to.
/// Used to decide if the "selected slot" marker survives a manual edit.
pub fn matches_slot(label: &str, hours: &OperatingHours, start: Time, end: Time) -> bool {
    let window = resolve_slot(label, hours);
    window.start == start && window.end == end
}

fn extract_embedded_range(label: &str) -> Option<SlotWindow> {
    let caps = RANGE_RE.captures(label)?;

    let start_hour: u8 = caps[1].parse().ok()?;
    let start_min: u8 = caps.get(2).map_or(0, |m| m.as_str().parse().unwrap_or(0));
    let start_period = caps.get(3).map(|m| m.as_str().to_uppercase());
    let end_hour: u8 = caps[4].parse().ok()?;
    let end_min: u8 = caps.get(5).map_or(0, |m| m.as_str().parse().unwrap_or(0));
    let end_period = caps.get(6).map(|m| m.as_str().to_uppercase());

    let start = Time::from_hms(
        to_24_hour(start_hour, start_period.as_deref()),
        start_min,
        0,
    )
    .ok()?;
    // An end of "12:00 AM" means midnight of the next day; clamp to 23:59
    // the same way the operating-hours parser does, so the window stays a
    // same-day range.
    let end_24 = to_24_hour(end_hour, end_period.as_deref());
    let end = if end_24 == 0 && end_period.as_deref() == Some("AM") {
        Time::from_hms(23, 59, 0).ok()?
    } else {
        Time::from_hms(end_24, end_min, 0).ok()?
    };

    Some(SlotWindow { start, end })
}

fn fixed(hour: u8, minute: u8) -> Time {
    Time::from_hms(hour, minute, 0).expect("fixed slot times are valid")
}
