//! Timestamp formatting helpers shared by the report and chart renderers.

use chrono::{DateTime, Datelike, Utc};

fn datetime(timestamp: i64) -> Result<DateTime<Utc>, Box<dyn std::error::Error>> {
    chrono::DateTime::from_timestamp(timestamp, 0)
        .ok_or_else(|| format!("invalid snapshot timestamp {timestamp}").into())
}

/// Human-readable date, e.g. `14/11/2023 22:13:20` (UTC).
pub fn readable_date(timestamp: i64) -> Result<String, Box<dyn std::error::Error>> {
    Ok(datetime(timestamp)?.format("%d/%m/%Y %H:%M:%S").to_string())
}

/// ISO-week label, e.g. `23w46` (two-digit year, unpadded week number).
pub fn week_label(timestamp: i64) -> Result<String, Box<dyn std::error::Error>> {
    let dt = datetime(timestamp)?;
    Ok(format!("{}w{}", dt.format("%y"), dt.iso_week().week()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn readable_date_formats_utc() {
        assert_eq!(readable_date(0).unwrap(), "01/01/1970 00:00:00");
        assert_eq!(readable_date(1_700_000_000).unwrap(), "14/11/2023 22:13:20");
    }

    #[test]
    fn week_label_uses_iso_week() {
        // 2023-11-14 is in ISO week 46
        assert_eq!(week_label(1_700_000_000).unwrap(), "23w46");
        // 1970-01-01 is a Thursday, ISO week 1
        assert_eq!(week_label(0).unwrap(), "70w1");
    }

    #[test]
    fn out_of_range_timestamp_is_an_error() {
        assert!(readable_date(i64::MAX).is_err());
    }
}
