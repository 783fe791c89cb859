use time::Time;

/// Billable duration in whole hours. Minutes are ignored on purpose: the
/// catalog prices by the hour and partial hours round the same way the
/// booking form always has. An end hour before the start hour means the
/// booking crosses midnight.
pub fn billable_hours(start: Time, end: Time) -> u32 {
    let mut hours = end.hour() as i32 - start.hour() as i32;
    if hours < 0 {
        hours += 24;
    }
    hours.max(1) as u32
}

/// Total cost of a booking: hourly rate × whole hours × guest count.
pub fn total(hourly_price: f64, start: Time, end: Time, guests: u8) -> f64 {
    billable_hours(start, end) as f64 * hourly_price * guests.max(1) as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::hours::parse_hhmm;

    fn t(s: &str) -> Time {
        parse_hhmm(s).expect("valid test time")
    }

    #[test]
    fn two_hours_two_guests() {
        assert_eq!(total(300.0, t("09:00"), t("11:00"), 2), 1200.0);
    }

    #[test]
    fn minimum_of_one_hour() {
        assert_eq!(billable_hours(t("09:00"), t("09:00")), 1);
        assert_eq!(billable_hours(t("09:00"), t("09:45")), 1);
        assert_eq!(total(250.0, t("14:00"), t("14:30"), 1), 250.0);
    }

    #[test]
    fn overnight_duration_wraps() {
        assert_eq!(billable_hours(t("22:00"), t("02:00")), 4);
        assert_eq!(total(280.0, t("21:00"), t("06:00"), 1), 9.0 * 280.0);
    }

    #[test]
    fn zero_guests_bills_as_one() {
        assert_eq!(total(300.0, t("09:00"), t("10:00"), 0), 300.0);
    }

    #[test]
    fn minutes_do_not_change_the_bill() {
        // 09:30-11:10 bills the same as 09:00-11:00.
        assert_eq!(billable_hours(t("09:30"), t("11:10")), 2);
    }
}
