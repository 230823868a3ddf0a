use chrono::{DateTime, NaiveDate, Utc};

/// Milliseconds since the unix epoch.
pub fn current_timestamp_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Formats an ISO date (`2024-03-01`) or timestamp (`2024-03-01T10:00:00Z`) as
/// `dd/mm/yyyy`. Unparseable input is returned unchanged.
pub fn format_date(s: &str) -> String {
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return date.format("%d/%m/%Y").to_string();
    }
    if let Ok(datetime) = DateTime::parse_from_rfc3339(s) {
        return datetime.format("%d/%m/%Y").to_string();
    }
    if let Some((date, _)) = s.split_once('T') {
        if let Ok(date) = NaiveDate::parse_from_str(date, "%Y-%m-%d") {
            return date.format("%d/%m/%Y").to_string();
        }
    }
    s.to_string()
}
