//! Confirmation evaluation.
//!
//! Decides whether the reports at one site corroborate each other. Reports
//! are grouped by [`SiteKey`] and the group earns:
//!
//! | Rule                                                    | Points |
//! |---------------------------------------------------------|--------|
//! | each report at the site                                 | +1     |
//! | at least 2 reports in the last [`RECENCY_WINDOW_DAYS`]  | +1     |
//! | at least 2 reports share a category                     | +2     |
//!
//! A site is confirmed at [`CONFIRMATION_THRESHOLD`] points. Reports carry no
//! reporter identity, so repeat reports from one person each count.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Duration, Utc};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::site::SiteKey;
use crate::{EvaluationResult, Location, Report, ReportCategory};

/// Score at which a site is confirmed.
pub const CONFIRMATION_THRESHOLD: u32 = 4;

/// Rolling window for the recency rule.
pub const RECENCY_WINDOW_DAYS: i64 = 7;

/// Reason attached to confirmed verdicts.
pub const CONFIRMED_REASON: &str = "Confirmed by multiple independent reports";

/// Evaluate the site containing `target` at the current wall-clock time.
pub fn evaluate(all_reports: &[Report], target: &Location) -> EvaluationResult {
    evaluate_at(all_reports, target, Utc::now())
}

/// Evaluate the site containing `target` as of `now`.
///
/// Never fails: a site with no reports scores 0 and is not confirmed.
///
/// # Example
/// ```
/// use chrono::Utc;
/// use skimmer_hotspots::{evaluate_at, Location, ObservationType, Report, ReportCategory};
///
/// let now = Utc::now();
/// let here = Location::new(10.123456, -20.987654);
/// let reports = vec![
///     Report::new("r1", here, ReportCategory::Atm, ObservationType::Overlay, now),
/// ];
/// let verdict = evaluate_at(&reports, &here, now);
/// assert_eq!(verdict.score, 1.0);
/// assert!(!verdict.confirm);
/// assert!(verdict.reason.is_none());
/// ```
pub fn evaluate_at(all_reports: &[Report], target: &Location, now: DateTime<Utc>) -> EvaluationResult {
    let key = SiteKey::from_location(target);
    let group: Vec<&Report> = all_reports
        .iter()
        .filter(|r| SiteKey::from_location(&r.location) == key)
        .collect();

    let result = score_group(&group, now);
    debug!(
        "[Confirmation] site {}: {} reports, score {}, confirm={}",
        key,
        group.len(),
        result.score,
        result.confirm
    );
    result
}

/// Evaluate every distinct site in the snapshot once.
pub fn evaluate_sites_at(
    all_reports: &[Report],
    now: DateTime<Utc>,
) -> BTreeMap<SiteKey, EvaluationResult> {
    group_by_site(all_reports)
        .into_iter()
        .map(|(key, group)| (key, score_group(&group, now)))
        .collect()
}

/// Parallel version of [`evaluate_sites_at`].
#[cfg(feature = "parallel")]
pub fn evaluate_sites_parallel(
    all_reports: &[Report],
    now: DateTime<Utc>,
) -> BTreeMap<SiteKey, EvaluationResult> {
    use rayon::prelude::*;

    let groups: Vec<(SiteKey, Vec<&Report>)> = group_by_site(all_reports).into_iter().collect();
    groups
        .par_iter()
        .map(|(key, group)| (*key, score_group(group, now)))
        .collect()
}

fn group_by_site(all_reports: &[Report]) -> BTreeMap<SiteKey, Vec<&Report>> {
    let mut groups: BTreeMap<SiteKey, Vec<&Report>> = BTreeMap::new();
    for report in all_reports {
        groups
            .entry(SiteKey::from_location(&report.location))
            .or_default()
            .push(report);
    }
    groups
}

fn score_group(group: &[&Report], now: DateTime<Utc>) -> EvaluationResult {
    let mut score = group.len() as u32;

    let window = Duration::days(RECENCY_WINDOW_DAYS);
    let recent = group.iter().filter(|r| now - r.timestamp < window).count();
    if recent >= 2 {
        score += 1;
    }

    let mut by_category: HashMap<ReportCategory, usize> = HashMap::new();
    for report in group {
        *by_category.entry(report.category).or_insert(0) += 1;
    }
    let same_category_max = by_category.values().copied().max().unwrap_or(0);
    if same_category_max >= 2 {
        score += 2;
    }

    // A trusted-reporter rule would add +3 here once reports carry reporter identity.

    let confirm = score >= CONFIRMATION_THRESHOLD;
    EvaluationResult {
        score: score as f64,
        confirm,
        reason: confirm.then(|| CONFIRMED_REASON.to_string()),
        evaluated_at: now,
    }
}

// ============================================================================
// Status propagation
// ============================================================================

/// Moderation status derived from a site's verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportStatus {
    #[serde(rename = "Under Review")]
    UnderReview,
    #[serde(rename = "Community Supported")]
    CommunitySupported,
}

impl From<&EvaluationResult> for ReportStatus {
    fn from(result: &EvaluationResult) -> Self {
        if result.confirm {
            ReportStatus::CommunitySupported
        } else {
            ReportStatus::UnderReview
        }
    }
}

/// Fields a caller writes back to one stored report after re-evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportStatusUpdate {
    pub report_id: String,
    pub status: ReportStatus,
    /// The site's corroboration score
    pub score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirmation_reason: Option<String>,
    pub last_evaluated_at: DateTime<Utc>,
}

/// Re-evaluate the site containing `location` and produce one update per
/// report stored there.
///
/// Call after saving a new report so every report at the site, not just the
/// new one, carries the current verdict. Applying the same updates twice is
/// harmless: an unchanged snapshot yields the same status and score.
pub fn reevaluate_site(
    all_reports: &[Report],
    location: &Location,
    now: DateTime<Utc>,
) -> Vec<ReportStatusUpdate> {
    let key = SiteKey::from_location(location);
    let result = evaluate_at(all_reports, location, now);
    let status = ReportStatus::from(&result);

    all_reports
        .iter()
        .filter(|r| SiteKey::from_location(&r.location) == key)
        .map(|r| ReportStatusUpdate {
            report_id: r.id.clone(),
            status,
            score: result.score,
            confirmation_reason: result.reason.clone(),
            last_evaluated_at: result.evaluated_at,
        })
        .collect()
}
