use chrono::{DateTime, Datelike, NaiveDate};

fn month_name(month: u32) -> &'static str {
    match month {
        1 => "January", 2 => "February", 3 => "March", 4 => "April",
        5 => "May", 6 => "June", 7 => "July", 8 => "August",
        9 => "September", 10 => "October", 11 => "November", 12 => "December",
        _ => "January",
    }
}

/// Human-readable date for presence rows ("May 2, 2026"). Falls back to the
/// raw string when the timestamp does not parse.
pub fn format_record_date(rfc3339_date: &str) -> String {
    match DateTime::parse_from_rfc3339(rfc3339_date) {
        Ok(at) => format!("{} {}, {}", month_name(at.month()), at.day(), at.year()),
        Err(_) => rfc3339_date.to_string(),
    }
}

/// Current date in the YYYY-MM-DD shape `<input type="date">` expects.
pub fn current_date_input() -> String {
    use js_sys::Date;
    let now = Date::new_0();
    format!(
        "{:04}-{:02}-{:02}",
        now.get_full_year(),
        now.get_month() + 1,
        now.get_date()
    )
}

/// Today as a chrono date, from the browser clock.
pub fn today() -> NaiveDate {
    use js_sys::Date;
    let now = Date::new_0();
    NaiveDate::from_ymd_opt(now.get_full_year() as i32, now.get_month() + 1, now.get_date())
        .unwrap_or(NaiveDate::MIN)
}

/// Turn a date-input value into the UTC-midnight timestamp the presence
/// endpoint stores. `None` for anything that is not a real date.
pub fn date_input_to_iso_midnight(date: &str) -> Option<String> {
    let parsed = NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()?;
    Some(format!("{}T00:00:00.000Z", parsed.format("%Y-%m-%d")))
}

/// Normalize whatever the backend stored for a birth date into the
/// YYYY-MM-DD shape a date input accepts. Empty string when hopeless.
pub fn normalize_date_input(stored: &str) -> String {
    if NaiveDate::parse_from_str(stored, "%Y-%m-%d").is_ok() {
        return stored.to_string();
    }
    if let Ok(at) = DateTime::parse_from_rfc3339(stored) {
        return at.date_naive().format("%Y-%m-%d").to_string();
    }
    String::new()
}

/// Whole years between a stored birth date and today.
pub fn age_years(birth_date: &str, today: NaiveDate) -> Option<u32> {
    let normalized = normalize_date_input(birth_date);
    let born = NaiveDate::parse_from_str(&normalized, "%Y-%m-%d").ok()?;
    if born > today {
        return None;
    }
    let mut years = today.year() - born.year();
    if (today.month(), today.day()) < (born.month(), born.day()) {
        years -= 1;
    }
    u32::try_from(years).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_format_record_date() {
        assert_eq!(
            format_record_date("2026-05-02T00:00:00.000Z"),
            "May 2, 2026"
        );
        assert_eq!(format_record_date("garbage"), "garbage");
    }

    #[wasm_bindgen_test]
    fn test_date_input_to_iso_midnight() {
        assert_eq!(
            date_input_to_iso_midnight("2026-05-02").as_deref(),
            Some("2026-05-02T00:00:00.000Z")
        );
        assert_eq!(date_input_to_iso_midnight("2026-13-40"), None);
        assert_eq!(date_input_to_iso_midnight(""), None);
    }

    #[wasm_bindgen_test]
    fn test_normalize_date_input() {
        assert_eq!(normalize_date_input("2019-03-14"), "2019-03-14");
        assert_eq!(normalize_date_input("2019-03-14T12:30:00.000Z"), "2019-03-14");
        assert_eq!(normalize_date_input("not a date"), "");
    }

    #[wasm_bindgen_test]
    fn test_age_years() {
        let today = NaiveDate::from_ymd_opt(2026, 8, 6).unwrap();
        assert_eq!(age_years("2019-03-14", today), Some(7));
        // Birthday later this year: not yet 8.
        assert_eq!(age_years("2018-12-31", today), Some(7));
        assert_eq!(age_years("2018-08-06", today), Some(8));
        assert_eq!(age_years("2030-01-01", today), None);
        assert_eq!(age_years("", today), None);
    }
}
