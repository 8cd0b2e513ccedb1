//! Collection timestamps derived from XMRG filenames.
//!
//! XMRG archives encode the observation time in the filename rather than in
//! reliable file metadata. Three naming conventions are in circulation:
//!
//! - `xmrg<MMDDYYYY><HH>z.<ext>` — hourly files
//! - `24hrxmrg<MMDDYYYY>.<ext>` — daily accumulations, no hour digits
//! - `xmrg_<MMDDYYYY>_<H[H]>z_<region>.<ext>` — legacy regional files
//!
//! Parsed times are naive civil times. No timezone conversion is applied;
//! callers that need an instant must attach an offset themselves.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TimeParseError {
    #[error("unrecognized xmrg filename: {0}")]
    UnrecognizedName(String),

    #[error("invalid date digits '{0}' (expected MMDDYYYY)")]
    InvalidDate(String),

    #[error("invalid hour '{0}'")]
    InvalidHour(String),
}

/// Extract the collection timestamp from an XMRG filename.
///
/// Accepts a bare filename or a full path; any directory components and the
/// final extension (e.g. `.gz`) are stripped first. Daily-accumulation
/// (`24hrxmrg`) names carry no hour digits, so those resolve to
/// `daily_default_hour`. Hourly names missing their hour digits resolve to
/// hour 0.
pub fn collection_date_from_filename(
    file_name: &str,
    daily_default_hour: u32,
) -> Result<NaiveDateTime, TimeParseError> {
    let stem = Path::new(file_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| TimeParseError::UnrecognizedName(file_name.to_string()))?;

    // Legacy regional form: xmrg_<MMDDYYYY>_<H[H]>z_<region>
    if let Some(rest) = stem.strip_prefix("xmrg_") {
        let mut parts = rest.split('_');
        let date_part = parts
            .next()
            .ok_or_else(|| TimeParseError::UnrecognizedName(stem.to_string()))?;
        let hour_part = parts
            .next()
            .ok_or_else(|| TimeParseError::UnrecognizedName(stem.to_string()))?
            .trim_end_matches('z');

        let date = parse_mmddyyyy(date_part)?;
        let hour: u32 = hour_part
            .parse()
            .map_err(|_| TimeParseError::InvalidHour(hour_part.to_string()))?;
        return date
            .and_hms_opt(hour, 0, 0)
            .ok_or_else(|| TimeParseError::InvalidHour(hour_part.to_string()));
    }

    // Daily accumulation form: 24hrxmrg<MMDDYYYY>
    if let Some(rest) = stem.strip_prefix("24hrxmrg") {
        let date = parse_mmddyyyy(rest)?;
        return date
            .and_hms_opt(daily_default_hour, 0, 0)
            .ok_or(TimeParseError::InvalidHour(daily_default_hour.to_string()));
    }

    // Hourly form: xmrg<MMDDYYYY><HH>z
    if let Some(rest) = stem.strip_prefix("xmrg") {
        let digits = rest.trim_end_matches('z');
        match digits.len() {
            10 => {
                let date = parse_mmddyyyy(&digits[..8])?;
                let hour: u32 = digits[8..]
                    .parse()
                    .map_err(|_| TimeParseError::InvalidHour(digits[8..].to_string()))?;
                return date
                    .and_hms_opt(hour, 0, 0)
                    .ok_or_else(|| TimeParseError::InvalidHour(digits[8..].to_string()));
            }
            // Some archives drop the hour digits entirely; treat as hour 0.
            8 => {
                let date = parse_mmddyyyy(digits)?;
                return date
                    .and_hms_opt(0, 0, 0)
                    .ok_or_else(|| TimeParseError::InvalidDate(digits.to_string()));
            }
            _ => return Err(TimeParseError::UnrecognizedName(stem.to_string())),
        }
    }

    Err(TimeParseError::UnrecognizedName(stem.to_string()))
}

fn parse_mmddyyyy(digits: &str) -> Result<NaiveDate, TimeParseError> {
    if digits.len() != 8 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(TimeParseError::InvalidDate(digits.to_string()));
    }

    let month: u32 = digits[0..2].parse().unwrap_or(0);
    let day: u32 = digits[2..4].parse().unwrap_or(0);
    let year: i32 = digits[4..8].parse().unwrap_or(0);

    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| TimeParseError::InvalidDate(digits.to_string()))
}

/// Build the hourly XMRG filename for a given timestamp.
pub fn build_filename(date_time: NaiveDateTime, extension: &str) -> String {
    format!("xmrg{}z.{}", date_time.format("%m%d%Y%H"), extension)
}

/// Build the list of hourly filenames covering the `hour_count` hours before
/// `end`, most recent first.
pub fn file_list_for_range(
    end: NaiveDateTime,
    hour_count: u32,
    extension: &str,
) -> Vec<String> {
    (1..=hour_count as i64)
        .map(|h| build_filename(end - Duration::hours(h), extension))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn test_hourly_filename() {
        let dt = collection_date_from_filename("xmrg0115202012z.gz", 0).unwrap();
        assert_eq!(dt.to_string(), "2020-01-15 12:00:00");
    }

    #[test]
    fn test_hourly_filename_missing_hour_digits() {
        let dt = collection_date_from_filename("xmrg01152020z.gz", 0).unwrap();
        assert_eq!(dt.to_string(), "2020-01-15 00:00:00");
    }

    #[test]
    fn test_daily_filename_uses_default_hour() {
        let dt = collection_date_from_filename("24hrxmrg01152020.gz", 12).unwrap();
        assert_eq!(dt.date().to_string(), "2020-01-15");
        assert_eq!(dt.hour(), 12);
    }

    #[test]
    fn test_legacy_regional_filename() {
        let dt = collection_date_from_filename("xmrg_01152020_3z_se.gz", 0).unwrap();
        assert_eq!(dt.to_string(), "2020-01-15 03:00:00");
    }

    #[test]
    fn test_full_path_is_accepted() {
        let dt =
            collection_date_from_filename("/data/archive/xmrg0601199906z.gz", 0).unwrap();
        assert_eq!(dt.to_string(), "1999-06-01 06:00:00");
    }

    #[test]
    fn test_unrecognized_names_rejected() {
        assert!(collection_date_from_filename("precip_20200115.dat", 0).is_err());
        assert!(collection_date_from_filename("xmrg123z.gz", 0).is_err());
        assert!(collection_date_from_filename("xmrg13402020z.gz", 0).is_err());
    }

    #[test]
    fn test_build_filename_roundtrip() {
        let dt = NaiveDate::from_ymd_opt(2020, 1, 15)
            .unwrap()
            .and_hms_opt(7, 0, 0)
            .unwrap();
        let name = build_filename(dt, "gz");
        assert_eq!(name, "xmrg0115202007z.gz");
        assert_eq!(collection_date_from_filename(&name, 0).unwrap(), dt);
    }

    #[test]
    fn test_file_list_for_range() {
        let end = NaiveDate::from_ymd_opt(2020, 1, 15)
            .unwrap()
            .and_hms_opt(3, 0, 0)
            .unwrap();
        let files = file_list_for_range(end, 3, "gz");
        assert_eq!(
            files,
            vec![
                "xmrg0115202002z.gz",
                "xmrg0115202001z.gz",
                "xmrg0115202000z.gz",
            ]
        );
    }
}
