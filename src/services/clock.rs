use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use tracing::debug;

pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Current wall-clock time in `zone`, or `None` when the zone is unknown
pub fn current_time_in(zone: &str) -> Option<String> {
    time_in(zone, Utc::now())
}

/// `instant` rendered in `zone`; `None` when the zone does not parse
pub fn time_in(zone: &str, instant: DateTime<Utc>) -> Option<String> {
    match zone.parse::<Tz>() {
        Ok(tz) => Some(instant.with_timezone(&tz).format(TIME_FORMAT).to_string()),
        Err(_) => {
            debug!(target: "clock", "Unrecognised timezone '{}'", zone);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_time_in_known_zone() {
        let instant = Utc.with_ymd_and_hms(2024, 1, 15, 17, 30, 0).unwrap();
        assert_eq!(
            time_in("America/New_York", instant).as_deref(),
            Some("2024-01-15 12:30:00")
        );
        assert_eq!(
            time_in("Asia/Jakarta", instant).as_deref(),
            Some("2024-01-16 00:30:00")
        );
    }

    #[test]
    fn test_unknown_zone_is_none() {
        assert_eq!(time_in("Mars/Olympus_Mons", Utc::now()), None);
        assert_eq!(current_time_in(""), None);
    }
}
