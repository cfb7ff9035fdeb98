//! Appointment model and display helpers.

use chrono::{DateTime, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Video call host accepted for meeting links.
pub const MEET_DOMAIN: &str = "meet.google.com";

/// A pending appointment request as returned by the backend.
///
/// Field names follow the backend's JSON; `date` and `time` stay as the raw
/// strings the backend sends and are parsed on demand for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    #[serde(rename = "_id")]
    pub id: String,
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub date: String,
    pub time: String,
    #[serde(rename = "appointmentType")]
    pub appointment_type: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub receipt: Option<String>,
    #[serde(rename = "meetLink", default)]
    pub meet_link: Option<String>,
}

impl Appointment {
    /// Requester's full name as displayed and searched.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.firstname, self.lastname)
    }

    /// Case-insensitive substring match against "firstname lastname".
    pub fn matches_search(&self, term: &str) -> bool {
        term.is_empty() || self.full_name().to_lowercase().contains(&term.to_lowercase())
    }

    /// Parse the appointment date.
    ///
    /// The backend sends either an RFC 3339 timestamp or a plain
    /// `YYYY-MM-DD` date. Timestamps are read in their own offset: the
    /// backend encodes appointment dates as midnight-UTC instants, so
    /// shifting them into the viewer's timezone would move the intended
    /// calendar date for anyone west of UTC.
    pub fn parse_date(&self) -> Result<NaiveDate> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(&self.date) {
            return Ok(dt.date_naive());
        }
        NaiveDate::parse_from_str(&self.date, "%Y-%m-%d")
            .map_err(|e| AppError::parse(format!("Invalid appointment date '{}': {e}", self.date)))
    }

    /// Parse the appointment time (`HH:MM`).
    pub fn parse_time(&self) -> Result<NaiveTime> {
        NaiveTime::parse_from_str(&self.time, "%H:%M")
            .map_err(|e| AppError::parse(format!("Invalid appointment time '{}': {e}", self.time)))
    }

    /// Day label for list rows: "TODAY" for the current date, the weekday
    /// name otherwise. Unparseable dates fall back to the raw string.
    pub fn day_label(&self, today: NaiveDate) -> String {
        match self.parse_date() {
            Ok(date) if date == today => "TODAY".to_string(),
            Ok(date) => date.format("%A").to_string(),
            Err(_) => self.date.clone(),
        }
    }

    /// Long-form calendar date, e.g. "January 5, 2026".
    pub fn long_date(&self) -> String {
        match self.parse_date() {
            Ok(date) => date.format("%B %-d, %Y").to_string(),
            Err(_) => self.date.clone(),
        }
    }

    /// 12-hour clock time, e.g. "02:30 PM".
    pub fn display_time(&self) -> String {
        match self.parse_time() {
            Ok(time) => time.format("%I:%M %p").to_string(),
            Err(_) => self.time.clone(),
        }
    }
}

/// Normalize a meeting-link entry to a fully qualified secure URL.
///
/// Accepts input that already carries the `https://meet.google.com` prefix,
/// or bare `meet.google.com/...` input which gets the secure scheme
/// prepended. Anything else is a validation error.
pub fn normalize_meet_link(input: &str) -> Result<String> {
    let input = input.trim();
    if input.is_empty() {
        return Err(AppError::validation("Please provide a Google Meet link"));
    }

    if input.starts_with(MEET_DOMAIN) {
        Ok(format!("https://{input}"))
    } else if input.starts_with(&format!("https://{MEET_DOMAIN}")) {
        Ok(input.to_string())
    } else {
        Err(AppError::validation(format!(
            "Meeting link must be a {MEET_DOMAIN} address"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Appointment {
        Appointment {
            id: "65f1c0ffee".to_string(),
            firstname: "Jane".to_string(),
            lastname: "Doe".to_string(),
            email: "jane@example.com".to_string(),
            date: "2026-01-05".to_string(),
            time: "14:30".to_string(),
            appointment_type: "counseling".to_string(),
            role: "student".to_string(),
            receipt: None,
            meet_link: None,
        }
    }

    #[test]
    fn test_deserialize_backend_json() {
        let json = r#"{
            "_id": "abc123",
            "firstname": "John",
            "lastname": "Smith",
            "email": "john@example.com",
            "date": "2026-01-05T00:00:00.000Z",
            "time": "09:00",
            "appointmentType": "consultation",
            "role": "employee",
            "receipt": "https://cdn.example.com/receipts/abc123.jpg"
        }"#;

        let appt: Appointment = serde_json::from_str(json).unwrap();
        assert_eq!(appt.id, "abc123");
        assert_eq!(appt.appointment_type, "consultation");
        assert!(appt.receipt.is_some());
        assert!(appt.meet_link.is_none());
    }

    #[test]
    fn test_deserialize_without_receipt() {
        let json = r#"{
            "_id": "abc123",
            "firstname": "John",
            "lastname": "Smith",
            "email": "john@example.com",
            "date": "2026-01-05",
            "time": "09:00",
            "appointmentType": "consultation"
        }"#;

        let appt: Appointment = serde_json::from_str(json).unwrap();
        assert!(appt.receipt.is_none());
        assert!(appt.role.is_empty());
    }

    #[test]
    fn test_search_matches_either_name_case_insensitive() {
        let jane = sample();
        let mut john = sample();
        john.firstname = "John".to_string();
        john.lastname = "Smith".to_string();

        assert!(john.matches_search("jo"));
        assert!(!jane.matches_search("jo"));
        assert!(jane.matches_search("DOE"));
        assert!(jane.matches_search("e d")); // spans first and last name
        assert!(jane.matches_search(""));
    }

    #[test]
    fn test_day_label_today() {
        let appt = sample();
        let today = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        assert_eq!(appt.day_label(today), "TODAY");
    }

    #[test]
    fn test_day_label_weekday() {
        let appt = sample(); // 2026-01-05 is a Monday
        let today = NaiveDate::from_ymd_opt(2026, 1, 6).unwrap();
        assert_eq!(appt.day_label(today), "Monday");
    }

    #[test]
    fn test_parse_rfc3339_date() {
        let mut appt = sample();
        appt.date = "2026-01-05T00:00:00.000Z".to_string();
        assert_eq!(appt.parse_date().unwrap(), NaiveDate::from_ymd_opt(2026, 1, 5).unwrap());
    }

    #[test]
    fn test_parse_date_keeps_timestamp_own_calendar_date() {
        // 22:00-05:00 is 03:00 the next day in UTC; the date encoded in the
        // timestamp's own offset wins, independent of the machine timezone.
        let mut appt = sample();
        appt.date = "2026-01-05T22:00:00-05:00".to_string();
        assert_eq!(appt.parse_date().unwrap(), NaiveDate::from_ymd_opt(2026, 1, 5).unwrap());
    }

    #[test]
    fn test_long_date_format() {
        let appt = sample();
        assert_eq!(appt.long_date(), "January 5, 2026");
    }

    #[test]
    fn test_display_time_is_12_hour() {
        let mut appt = sample();
        assert_eq!(appt.display_time(), "02:30 PM");

        appt.time = "09:05".to_string();
        assert_eq!(appt.display_time(), "09:05 AM");
    }

    #[test]
    fn test_unparseable_date_falls_back_to_raw() {
        let mut appt = sample();
        appt.date = "soon".to_string();
        assert!(appt.parse_date().is_err());
        assert_eq!(appt.long_date(), "soon");
    }

    #[test]
    fn test_meet_link_bare_domain_gets_scheme() {
        let link = normalize_meet_link("meet.google.com/abc-defg-hij").unwrap();
        assert_eq!(link, "https://meet.google.com/abc-defg-hij");
    }

    #[test]
    fn test_meet_link_full_url_passes_through() {
        let link = normalize_meet_link("https://meet.google.com/abc-defg-hij").unwrap();
        assert_eq!(link, "https://meet.google.com/abc-defg-hij");
    }

    #[test]
    fn test_meet_link_rejects_other_input() {
        assert!(normalize_meet_link("not-a-link").is_err());
        assert!(normalize_meet_link("http://meet.google.com/abc").is_err());
        assert!(normalize_meet_link("https://zoom.us/j/123").is_err());
        assert!(normalize_meet_link("").is_err());
        assert!(normalize_meet_link("   ").is_err());
    }
}
