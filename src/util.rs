use crate::error::{PulseError, Result};
use crate::model::DateRange;
use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};

pub fn resolve_range(since: Option<&str>, until: Option<&str>) -> Result<DateRange> {
    resolve_range_at(since, until, Utc::now())
}

pub fn resolve_range_at(
    since: Option<&str>,
    until: Option<&str>,
    now: DateTime<Utc>,
) -> Result<DateRange> {
    let since_dt = since.map(|s| parse_date(s, now)).transpose()?;
    let until_dt = until.map(|u| parse_date(u, now)).transpose()?;

    if let (Some(s), Some(u)) = (since_dt, until_dt) {
        if s > u {
            return Err(PulseError::InvalidDate(format!(
                "Invalid range: since ({s}) is after until ({u})"
            )));
        }
    }

    let mut range = DateRange::new();
    if let Some(s) = since_dt {
        range = range.with_since(s);
    }
    if let Some(u) = until_dt {
        range = range.with_until(u);
    }
    Ok(range)
}

/// Accepts RFC 3339, `YYYY-MM-DD` (midnight UTC), or `N days|weeks|months ago`.
pub fn parse_date(input: &str, now: DateTime<Utc>) -> Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt.with_timezone(&Utc));
    }

    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        if let Some(datetime) = date.and_hms_opt(0, 0, 0) {
            return Ok(Utc.from_utc_datetime(&datetime));
        }
    }

    if let Some(ago) = parse_natural_duration(input) {
        return now
            .checked_sub_signed(ago)
            .ok_or_else(|| PulseError::InvalidDate(format!("Duration overflow for '{input}'")));
    }

    Err(PulseError::InvalidDate(format!(
        "'{input}' is not RFC3339, YYYY-MM-DD, or 'N days/weeks/months ago'"
    )))
}

fn parse_natural_duration(input: &str) -> Option<Duration> {
    let input = input.trim().to_lowercase();

    let units: [(&str, i64); 3] = [(" days ago", 1), (" weeks ago", 7), (" months ago", 30)];
    units.iter().find_map(|(suffix, days_per_unit)| {
        let n = input.strip_suffix(suffix)?.trim().parse::<i64>().ok()?;
        n.checked_mul(*days_per_unit).and_then(Duration::try_days)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 30, 12, 0, 0).unwrap()
    }

    #[test]
    fn parses_plain_dates_as_utc_midnight() {
        let dt = parse_date("2024-01-15", now()).unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap());
    }

    #[test]
    fn parses_rfc3339_with_offset() {
        let dt = parse_date("2024-01-15T10:00:00+02:00", now()).unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2024, 1, 15, 8, 0, 0).unwrap());
    }

    #[test]
    fn parses_relative_durations() {
        assert_eq!(
            parse_date("3 days ago", now()).unwrap(),
            Utc.with_ymd_and_hms(2024, 6, 27, 12, 0, 0).unwrap()
        );
        assert_eq!(
            parse_date("2 Weeks Ago", now()).unwrap(),
            Utc.with_ymd_and_hms(2024, 6, 16, 12, 0, 0).unwrap()
        );
    }

    #[test]
    fn rejects_unknown_formats() {
        assert!(matches!(
            parse_date("last tuesday", now()),
            Err(PulseError::InvalidDate(_))
        ));
    }

    #[test]
    fn rejects_inverted_range() {
        let err = resolve_range_at(Some("2024-02-01"), Some("2024-01-01"), now()).unwrap_err();
        assert!(err.to_string().contains("after"));
    }

    #[test]
    fn open_range_is_unbounded() {
        assert_eq!(resolve_range_at(None, None, now()).unwrap(), DateRange::new());
    }
}
