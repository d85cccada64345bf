use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};

use crate::models::{Result, RoundStatus, RoundWindow};

/// Anywhere on Earth is a fixed UTC-12:00 offset with no daylight saving.
pub const AOE_UTC_OFFSET: &str = "-12:00";
const AOE_OFFSET_HOURS: i64 = 12;

/// Convert an AoE wall-clock time to a UTC instant.
fn aoe_to_utc(date: NaiveDate, time: NaiveTime) -> DateTime<Utc> {
    let local = date.and_time(time);
    Utc.from_utc_datetime(&(local + Duration::hours(AOE_OFFSET_HOURS)))
}

/// 00:00:00 AoE on `date`, which is 12:00:00 UTC the same day.
pub fn start_boundary(date: NaiveDate) -> DateTime<Utc> {
    aoe_to_utc(date, NaiveTime::MIN)
}

/// 23:59:59 AoE on `date`, which is 11:59:59 UTC the following day.
pub fn end_boundary(date: NaiveDate) -> DateTime<Utc> {
    let last_second = NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN);
    aoe_to_utc(date, last_second)
}

impl RoundWindow {
    pub fn opens_at(&self) -> DateTime<Utc> {
        start_boundary(self.status_start())
    }

    pub fn closes_at(&self) -> DateTime<Utc> {
        end_boundary(self.status_end())
    }

    /// Status at an explicit instant. Both boundaries are inclusive.
    pub fn status_at(&self, now: DateTime<Utc>) -> RoundStatus {
        if now < self.opens_at() {
            RoundStatus::Upcoming
        } else if now > self.closes_at() {
            RoundStatus::Closed
        } else {
            RoundStatus::Active
        }
    }

    pub fn status(&self) -> RoundStatus {
        self.status_at(Utc::now())
    }
}

/// Status of a round described by `YYYY-MM-DD` strings, evaluated now.
pub fn compute_status(
    start_date: &str,
    end_date: &str,
    effective_start_date: Option<&str>,
    effective_end_date: Option<&str>,
) -> Result<RoundStatus> {
    compute_status_at(start_date, end_date, effective_start_date, effective_end_date, Utc::now())
}

pub fn compute_status_at(
    start_date: &str,
    end_date: &str,
    effective_start_date: Option<&str>,
    effective_end_date: Option<&str>,
    now: DateTime<Utc>,
) -> Result<RoundStatus> {
    let window = RoundWindow::parse(start_date, end_date, effective_start_date, effective_end_date)?;
    Ok(window.status_at(now))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GrantsError;

    fn at(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    fn status(start: &str, end: &str, now: &str) -> RoundStatus {
        compute_status_at(start, end, None, None, at(now)).unwrap()
    }

    #[test]
    fn test_boundaries_match_explicit_offset() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let expected_start = DateTime::parse_from_rfc3339(&format!("2025-03-10T00:00:00{}", AOE_UTC_OFFSET)).unwrap();
        let expected_end = DateTime::parse_from_rfc3339(&format!("2025-03-10T23:59:59{}", AOE_UTC_OFFSET)).unwrap();

        assert_eq!(start_boundary(date), expected_start.with_timezone(&Utc));
        assert_eq!(end_boundary(date), expected_end.with_timezone(&Utc));
        assert_eq!(start_boundary(date), at("2025-03-10T12:00:00Z"));
        assert_eq!(end_boundary(date), at("2025-03-11T11:59:59Z"));
    }

    #[test]
    fn test_single_day_round() {
        let d = "2025-06-15";
        assert_eq!(status(d, d, "2025-06-15T11:59:59Z"), RoundStatus::Upcoming);
        assert_eq!(status(d, d, "2025-06-15T12:00:00Z"), RoundStatus::Active);
        assert_eq!(status(d, d, "2025-06-16T00:00:00Z"), RoundStatus::Active);
        assert_eq!(status(d, d, "2025-06-16T11:59:59Z"), RoundStatus::Active);
        assert_eq!(status(d, d, "2025-06-16T12:00:00Z"), RoundStatus::Closed);
        assert_eq!(status(d, d, "2026-01-01T00:00:00Z"), RoundStatus::Closed);
    }

    #[test]
    fn test_host_timezone_does_not_shift_boundaries() {
        let d = "2025-06-15";
        for tz in ["Pacific/Kiritimati", "Pacific/Pago_Pago", "UTC"] {
            std::env::set_var("TZ", tz);
            let window = RoundWindow::parse(d, d, None, None).unwrap();
            assert_eq!(window.opens_at(), at("2025-06-15T12:00:00Z"), "TZ={}", tz);
            assert_eq!(window.closes_at(), at("2025-06-16T11:59:59Z"), "TZ={}", tz);
            assert_eq!(status(d, d, "2025-06-15T11:59:59Z"), RoundStatus::Upcoming);
            assert_eq!(status(d, d, "2025-06-15T12:00:00Z"), RoundStatus::Active);
            assert_eq!(status(d, d, "2025-06-16T12:00:00Z"), RoundStatus::Closed);
        }
        std::env::remove_var("TZ");
    }

    #[test]
    fn test_sub_second_after_end_is_closed() {
        let d = "2025-06-15";
        assert_eq!(status(d, d, "2025-06-16T11:59:59.500Z"), RoundStatus::Closed);
    }

    #[test]
    fn test_year_boundary() {
        let (start, end) = ("2025-12-31", "2026-01-02");
        assert_eq!(status(start, end, "2025-12-31T20:00:00Z"), RoundStatus::Active);
        assert_eq!(status(start, end, "2026-01-01T00:00:00Z"), RoundStatus::Active);
        assert_eq!(status(start, end, "2026-01-03T11:59:59Z"), RoundStatus::Active);
        assert_eq!(status(start, end, "2026-01-03T12:00:00Z"), RoundStatus::Closed);
    }

    #[test]
    fn test_effective_dates_override_display_dates() {
        let now = at("2025-05-20T12:00:00Z");

        // Display window has ended, effective end extends eligibility
        let extended = compute_status_at("2025-05-01", "2025-05-10", None, Some("2025-05-31"), now).unwrap();
        assert_eq!(extended, RoundStatus::Active);

        // Display window is open, effective start pushes it out
        let delayed = compute_status_at("2025-05-01", "2025-05-31", Some("2025-05-25"), None, now).unwrap();
        assert_eq!(delayed, RoundStatus::Upcoming);
    }

    #[test]
    fn test_omitted_effective_dates_fall_back() {
        let instants = [
            "2025-04-30T23:00:00Z",
            "2025-05-01T12:00:00Z",
            "2025-05-05T08:00:00Z",
            "2025-05-11T11:59:59Z",
            "2025-05-11T12:00:00Z",
        ];

        for now in instants {
            let plain = compute_status_at("2025-05-01", "2025-05-10", None, None, at(now)).unwrap();
            let same = compute_status_at(
                "2025-05-01",
                "2025-05-10",
                Some("2025-05-01"),
                Some("2025-05-10"),
                at(now),
            ).unwrap();
            assert_eq!(plain, same, "mismatch at {}", now);
        }
    }

    #[test]
    fn test_malformed_date_is_error() {
        let result = compute_status_at("2025/01/01", "2025-01-31", None, None, Utc::now());
        assert!(matches!(result, Err(GrantsError::InvalidDate { .. })));

        let result = compute_status_at("2025-01-01", "2025-01-31", Some("soon"), None, Utc::now());
        assert!(matches!(result, Err(GrantsError::InvalidDate { .. })));
    }

    #[test]
    fn test_window_display_dates_untouched() {
        let window = RoundWindow::parse("2025-05-01", "2025-05-10", Some("2025-05-03"), Some("2025-05-12")).unwrap();
        assert_eq!(window.start_date.to_string(), "2025-05-01");
        assert_eq!(window.end_date.to_string(), "2025-05-10");
        assert_eq!(window.opens_at(), at("2025-05-03T12:00:00Z"));
        assert_eq!(window.closes_at(), at("2025-05-13T11:59:59Z"));
    }
}
