use lazy_static::lazy_static;
use regex::Regex;
use time::Time;

lazy_static! {
    // Tolerates "9:00 AM - 9:00 PM", "22:00 - 06:00", "9am-1pm" and
    // missing minutes or meridiem markers.
    pub(crate) static ref RANGE_RE: Regex =
        Regex::new(r"(?i)(\d{1,2}):?(\d{0,2})\s*(AM|PM)?\s*-\s*(\d{1,2}):?(\d{0,2})\s*(AM|PM)?")
            .unwrap();
}

/// A space's daily window, normalized to 24-hour wall-clock times.
///
/// `end` can sort before `start`, which means the window crosses midnight
/// (e.g. "10:00 PM - 6:00 AM"). A close of "12:00 AM" is clamped to 23:59
/// because a same-day end cannot express "past midnight".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperatingHours {
    pub start: Time,
    pub end: Time,
    pub display: String,
    pub open_all_day: bool,
}

impl Default for OperatingHours {
    fn default() -> Self {
        default_hours()
    }
}

/// Parse a free-text hours string from the catalog. Never fails: anything
/// unrecognizable falls back to the default 9:00 AM - 9:00 PM window.
pub fn parse_operating_hours(hours: &str) -> OperatingHours {
    if hours == "24/7" || hours == "Open 24/7" {
        return OperatingHours {
            start: Time::MIDNIGHT,
            end: end_of_day(),
            display: "24/7".into(),
            open_all_day: true,
        };
    }

    if let Some(caps) = RANGE_RE.captures(hours) {
        let raw_start_hour: u8 = match caps[1].parse() {
            Ok(h) => h,
            Err(_) => return default_hours(),
        };
        let start_min: u8 = caps.get(2).map_or(0, |m| m.as_str().parse().unwrap_or(0));
        let start_period = caps.get(3).map(|m| m.as_str().to_uppercase());
        let raw_end_hour: u8 = match caps[4].parse() {
            Ok(h) => h,
            Err(_) => return default_hours(),
        };
        let end_min: u8 = caps.get(5).map_or(0, |m| m.as_str().parse().unwrap_or(0));
        let end_period = caps.get(6).map(|m| m.as_str().to_uppercase());

        let start_hour = to_24_hour(raw_start_hour, start_period.as_deref());
        let end_hour = to_24_hour(raw_end_hour, end_period.as_deref());

        // A close of 12:00 AM means midnight of the following day.
        let closes_at_midnight = end_hour == 0 && end_period.as_deref() == Some("AM");

        let start = match Time::from_hms(start_hour, start_min, 0) {
            Ok(t) => t,
            Err(_) => return default_hours(),
        };
        let end = if closes_at_midnight {
            end_of_day()
        } else {
            match Time::from_hms(end_hour, end_min, 0) {
                Ok(t) => t,
                Err(_) => return default_hours(),
            }
        };

        let start_display = format_12_hour(raw_start_hour, start_min, start_period.as_deref(), "AM");
        let end_display = if closes_at_midnight {
            "12:00 AM (Midnight)".to_string()
        } else {
            format_12_hour(raw_end_hour, end_min, end_period.as_deref(), "PM")
        };

        return OperatingHours {
            start,
            end,
            display: format!("{start_display} - {end_display}"),
            open_all_day: false,
        };
    }

    default_hours()
}

/// Whether `time` falls inside the window, handling windows that cross
/// midnight: those match `time >= start || time <= end`.
pub fn within_operating_hours(time: Time, hours: &OperatingHours) -> bool {
    if hours.open_all_day {
        return true;
    }
    if hours.start > hours.end {
        time >= hours.start || time <= hours.end
    } else {
        hours.start <= time && time <= hours.end
    }
}

/// Parse a 24-hour "HH:MM" wall-clock string.
pub fn parse_hhmm(value: &str) -> Option<Time> {
    let (h, m) = value.split_once(':')?;
    let hour: u8 = h.trim().parse().ok()?;
    let minute: u8 = m.trim().parse().ok()?;
    Time::from_hms(hour, minute, 0).ok()
}

pub fn format_hhmm(time: Time) -> String {
    format!("{:02}:{:02}", time.hour(), time.minute())
}

pub(crate) fn minutes_since_midnight(time: Time) -> i32 {
    time.hour() as i32 * 60 + time.minute() as i32
}

pub(crate) fn to_24_hour(hour: u8, period: Option<&str>) -> u8 {
    match period {
        Some("PM") if hour != 12 => hour + 12,
        Some("AM") if hour == 12 => 0,
        _ => hour,
    }
}

fn format_12_hour(hour: u8, minute: u8, period: Option<&str>, fallback_period: &str) -> String {
    format!("{}:{:02} {}", hour, minute, period.unwrap_or(fallback_period))
}

fn end_of_day() -> Time {
    Time::from_hms(23, 59, 0).expect("23:59 is a valid time")
}

fn default_hours() -> OperatingHours {
    OperatingHours {
        start: Time::from_hms(9, 0, 0).expect("09:00 is a valid time"),
        end: Time::from_hms(21, 0, 0).expect("21:00 is a valid time"),
        display: "9:00 AM - 9:00 PM".into(),
        open_all_day: false,
    }
}
