use time::OffsetDateTime;

/// Formats a date the way the pages print it, e.g. `7 March 2024`.
pub fn format_date(at: OffsetDateTime) -> String {
    format!("{} {} {}", at.day(), at.month(), at.year())
}

pub fn format_datetime(at: OffsetDateTime) -> String {
    format!("{}, {:02}:{:02}", format_date(at), at.hour(), at.minute())
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::{Date, Month, Time};

    #[test]
    fn test_format_date() {
        let at = Date::from_calendar_date(2024, Month::March, 7)
            .unwrap()
            .with_time(Time::from_hms(19, 5, 0).unwrap())
            .assume_utc();
        assert_eq!(format_date(at), "7 March 2024");
        assert_eq!(format_datetime(at), "7 March 2024, 19:05");
    }
}
