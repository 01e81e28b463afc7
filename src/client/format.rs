use chrono::NaiveDate;

/// Render a stored ISO date (`YYYY-MM-DD`) as `DD/MM/YYYY`.
/// Empty input renders empty; anything that is not an ISO date is shown as-is.
pub fn format_birth_date(raw: Option<&str>) -> String {
    let Some(raw) = raw.filter(|s| !s.is_empty()) else {
        return String::new();
    };
    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(date) => date.format("%d/%m/%Y").to_string(),
        Err(_) => raw.to_string(),
    }
}
