use chrono::{DateTime, TimeZone};

/// 12-hour clock with AM/PM, e.g. `09:05 PM`.
pub fn format_clock<Tz: TimeZone>(dt: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    dt.format("%I:%M %p").to_string()
}

/// Day and month, e.g. `31/12`.
pub fn format_day_month<Tz: TimeZone>(dt: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    dt.format("%d/%m").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_formats() {
        let dt = Utc.with_ymd_and_hms(2024, 12, 31, 21, 5, 0).unwrap();
        assert_eq!(format_clock(&dt), "09:05 PM");
        assert_eq!(format_day_month(&dt), "31/12");

        let morning = chrono_tz::Asia::Kolkata.with_ymd_and_hms(2024, 3, 4, 0, 30, 0).unwrap();
        assert_eq!(format_clock(&morning), "12:30 AM");
        assert_eq!(format_day_month(&morning), "04/03");
    }
}
