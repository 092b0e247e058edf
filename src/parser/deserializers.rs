use chrono::{NaiveDate, NaiveDateTime};

/// Datetime layouts seen in ticket exports, tried in order.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y"];

/// Parse an export datetime ("2024-01-05 10:30", "05/01/2024 10:30", "2024-01-05", ...).
/// A bare date is read as midnight. Returns None for empty or unparseable strings.
pub fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Parse a minute count that may contain grouping spaces ("1 200" → 1200).
pub fn parse_minutes(s: &str) -> Option<u32> {
    let cleaned: String = s.chars().filter(|c| !c.is_whitespace()).collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<u32>().ok()
}

/// "" → None, "  text " → Some("text")
pub fn parse_opt_text(s: &str) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Serde-compatible deserializers for use with `#[serde(deserialize_with = "de::...")]`.
pub mod de {
    use chrono::NaiveDateTime;
    use serde::{self, Deserialize, Deserializer};

    /// Any layout accepted by `parse_datetime` (obligatoire)
    pub fn flexible_datetime<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        super::parse_datetime(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid datetime: {:?}", s)))
    }

    /// null / "" → None, otherwise any layout accepted by `parse_datetime`
    pub fn flexible_datetime_opt<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = Option::<String>::deserialize(deserializer)?;
        match s.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(v) => super::parse_datetime(v)
                .map(Some)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid datetime: {:?}", v))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iso(dt: NaiveDateTime) -> String {
        dt.format("%Y-%m-%dT%H:%M:%S").to_string()
    }

    #[test]
    fn test_parse_datetime_layouts() {
        assert_eq!(iso(parse_datetime("2024-01-05T10:30:00").unwrap()), "2024-01-05T10:30:00");
        assert_eq!(iso(parse_datetime("2024-01-05 10:30:15").unwrap()), "2024-01-05T10:30:15");
        assert_eq!(iso(parse_datetime("2024-01-05 10:30").unwrap()), "2024-01-05T10:30:00");
        assert_eq!(iso(parse_datetime("05/01/2024 10:30").unwrap()), "2024-01-05T10:30:00");
    }

    #[test]
    fn test_parse_datetime_bare_date_is_midnight() {
        assert_eq!(iso(parse_datetime("2024-02-01").unwrap()), "2024-02-01T00:00:00");
        assert_eq!(iso(parse_datetime("01/02/2024").unwrap()), "2024-02-01T00:00:00");
    }

    #[test]
    fn test_parse_datetime_invalid() {
        assert!(parse_datetime("").is_none());
        assert!(parse_datetime("   ").is_none());
        assert!(parse_datetime("not-a-date").is_none());
        assert!(parse_datetime("2024-13-01").is_none());
    }

    #[test]
    fn test_parse_minutes() {
        assert_eq!(parse_minutes("45"), Some(45));
        assert_eq!(parse_minutes(" 1 200 "), Some(1200));
        assert_eq!(parse_minutes(""), None);
        assert_eq!(parse_minutes("-5"), None);
        assert_eq!(parse_minutes("abc"), None);
    }

    #[test]
    fn test_parse_opt_text() {
        assert_eq!(parse_opt_text(""), None);
        assert_eq!(parse_opt_text("  "), None);
        assert_eq!(parse_opt_text(" Reset de senha "), Some("Reset de senha".to_string()));
    }
}
