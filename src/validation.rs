//! Report validation.
//!
//! The algorithms assume finite, in-range coordinates and confidences.
//! Ingestion code runs reports through here first; anything rejected would
//! otherwise poison scores with NaN.

use chrono::{DateTime, Duration, Utc};
use log::warn;

use crate::error::{HotspotError, Result};
use crate::Report;

/// Oldest accepted report age.
pub const MAX_REPORT_AGE_DAYS: i64 = 365;

/// How far ahead of the clock a report may be timestamped.
pub const MAX_CLOCK_SKEW_HOURS: i64 = 24;

/// Parse an ISO-8601 / RFC 3339 timestamp into UTC.
///
/// # Example
/// ```
/// use skimmer_hotspots::parse_timestamp;
///
/// let ts = parse_timestamp("2024-03-01T12:00:00.000Z").unwrap();
/// assert_eq!(ts.to_rfc3339(), "2024-03-01T12:00:00+00:00");
/// assert!(parse_timestamp("yesterday").is_err());
/// ```
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| HotspotError::InvalidTimestamp {
            value: value.to_string(),
            message: e.to_string(),
        })
}

/// Check a report against the input contract of the algorithms, using the
/// current wall-clock time for the timestamp range.
pub fn validate_report(report: &Report) -> Result<()> {
    validate_report_at(report, Utc::now())
}

/// Check a report as of `now`.
///
/// Timestamps more than [`MAX_CLOCK_SKEW_HOURS`] ahead of `now` or older than
/// [`MAX_REPORT_AGE_DAYS`] are rejected; decay is unbounded for future
/// reports, so one of them would dominate every ranking.
pub fn validate_report_at(report: &Report, now: DateTime<Utc>) -> Result<()> {
    if report.id.trim().is_empty() {
        return Err(HotspotError::MissingId);
    }

    if !report.location.is_valid() {
        return Err(HotspotError::InvalidCoordinates {
            report_id: report.id.clone(),
            latitude: report.location.latitude,
            longitude: report.location.longitude,
        });
    }

    if let Some(value) = report.confidence_score {
        if !(0.0..=1.0).contains(&value) {
            return Err(HotspotError::InvalidConfidence {
                report_id: report.id.clone(),
                value,
            });
        }
    }

    if report.timestamp > now + Duration::hours(MAX_CLOCK_SKEW_HOURS)
        || report.timestamp < now - Duration::days(MAX_REPORT_AGE_DAYS)
    {
        return Err(HotspotError::TimestampOutOfRange {
            report_id: report.id.clone(),
            timestamp: report.timestamp,
        });
    }

    Ok(())
}

/// Split reports into valid ones and rejections, logging each rejection.
pub fn partition_valid(reports: Vec<Report>) -> (Vec<Report>, Vec<(Report, HotspotError)>) {
    partition_valid_at(reports, Utc::now())
}

/// [`partition_valid`] with the timestamp range anchored at `now`.
pub fn partition_valid_at(
    reports: Vec<Report>,
    now: DateTime<Utc>,
) -> (Vec<Report>, Vec<(Report, HotspotError)>) {
    let mut valid = Vec::with_capacity(reports.len());
    let mut rejected = Vec::new();

    for report in reports {
        match validate_report_at(&report, now) {
            Ok(()) => valid.push(report),
            Err(e) => {
                warn!("[Validation] Dropping report: {}", e);
                rejected.push((report, e));
            }
        }
    }

    (valid, rejected)
}
