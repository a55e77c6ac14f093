//! Due date input and display helpers.

use chrono::{Datelike, Duration, NaiveDate};

use crate::error::ValidationError;

const WEEKDAYS: [(&str, &str); 7] = [
    ("monday", "mon"),
    ("tuesday", "tue"),
    ("wednesday", "wed"),
    ("thursday", "thu"),
    ("friday", "fri"),
    ("saturday", "sat"),
    ("sunday", "sun"),
];

fn weekday_index(name: &str) -> Option<i64> {
    WEEKDAYS
        .iter()
        .position(|(long, short)| name == *long || name == *short)
        .map(|i| i as i64)
}

fn last_day_of_month(day: NaiveDate) -> Option<NaiveDate> {
    let (year, month) = if day.month() == 12 {
        (day.year() + 1, 1)
    } else {
        (day.year(), day.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1).map(|first| first - Duration::days(1))
}

/// Parse a due date relative to `today`.
///
/// Supports:
/// - "today", "tomorrow", "yesterday"
/// - "end of week" / "eow" (Sunday), "end of month" / "eom"
/// - weekday names ("fri", "this friday": the next occurrence, today included;
///   "next friday": the one after that)
/// - "in 3d", "in 2w"
/// - "YYYY-MM-DD"
pub fn parse_due(input: &str, today: NaiveDate) -> Result<NaiveDate, ValidationError> {
    let s = input.trim().to_lowercase();
    let invalid = || ValidationError::Date(input.to_string());

    match s.as_str() {
        "today" => return Ok(today),
        "tomorrow" => return Ok(today + Duration::days(1)),
        "yesterday" => return Ok(today - Duration::days(1)),
        "end of week" | "eow" => {
            let to_sunday = 6 - i64::from(today.weekday().num_days_from_monday());
            return Ok(today + Duration::days(to_sunday));
        }
        "end of month" | "eom" => return last_day_of_month(today).ok_or_else(invalid),
        _ => {}
    }

    if let Some(rest) = s.strip_prefix("in ") {
        let rest = rest.trim();
        let unit = rest.chars().last().ok_or_else(invalid)?;
        let count: i64 = rest[..rest.len() - unit.len_utf8()]
            .trim()
            .parse()
            .map_err(|_| invalid())?;
        let offset = match unit {
            'd' => Duration::try_days(count),
            'w' => Duration::try_weeks(count),
            _ => return Err(invalid()),
        };
        return offset
            .and_then(|offset| today.checked_add_signed(offset))
            .ok_or_else(invalid);
    }

    let (skip_week, name) = if let Some(name) = s.strip_prefix("next ") {
        (true, name)
    } else {
        (false, s.strip_prefix("this ").unwrap_or(&s))
    };
    if let Some(target) = weekday_index(name) {
        let current = i64::from(today.weekday().num_days_from_monday());
        let ahead = (target - current).rem_euclid(7);
        let ahead = if skip_week { ahead + 7 } else { ahead };
        return Ok(today + Duration::days(ahead));
    }

    NaiveDate::parse_from_str(&s, "%Y-%m-%d").map_err(|_| invalid())
}

/// Format a due date relative to today ("today", "tomorrow", "in 3d", "2d late").
pub fn format_due_relative(due: NaiveDate, today: NaiveDate) -> String {
    match (due - today).num_days() {
        0 => "today".into(),
        1 => "tomorrow".into(),
        n if n > 1 => format!("in {n}d"),
        n => format!("{}d late", -n),
    }
}
