//! JSON entry points for hosts that exchange reports as JSON.
//!
//! Reports are validated first; invalid ones are dropped with a warning
//! rather than failing the whole request.

use log::{info, warn};

use crate::confirmation::evaluate;
use crate::error::Result;
use crate::hotspots::{generate_hotspots, HotspotConfig};
use crate::validation::partition_valid;
use crate::{Location, Report};

/// Parse a JSON array of reports, dropping elements that fail to decode or
/// validate. Only a malformed outer array is an error.
fn parse_reports(reports_json: &str) -> Result<Vec<Report>> {
    let items: Vec<serde_json::Value> = serde_json::from_str(reports_json)?;
    let total = items.len();

    let reports: Vec<Report> = items
        .into_iter()
        .enumerate()
        .filter_map(|(idx, item)| match serde_json::from_value::<Report>(item) {
            Ok(report) => Some(report),
            Err(e) => {
                warn!("[Json] Dropping report at index {}: {}", idx, e);
                None
            }
        })
        .collect();

    let (valid, _rejected) = partition_valid(reports);
    if valid.len() < total {
        info!(
            "[Json] Accepted {} of {} reports ({} rejected)",
            valid.len(),
            total,
            total - valid.len()
        );
    }
    Ok(valid)
}

/// Cluster a JSON array of reports and return a JSON array of hotspots.
///
/// `config_json` may omit fields; missing ones take their defaults.
pub fn hotspots_from_json(reports_json: &str, config_json: Option<&str>) -> Result<String> {
    let config: HotspotConfig = match config_json {
        Some(raw) => serde_json::from_str(raw)?,
        None => HotspotConfig::default(),
    };
    config.validate()?;

    let reports = parse_reports(reports_json)?;
    let hotspots = generate_hotspots(&reports, &config);
    Ok(serde_json::to_string(&hotspots)?)
}

/// Evaluate the site at a JSON location against a JSON array of reports.
pub fn evaluate_from_json(reports_json: &str, location_json: &str) -> Result<String> {
    let location: Location = serde_json::from_str(location_json)?;
    let reports = parse_reports(reports_json)?;
    let result = evaluate(&reports, &location);
    Ok(serde_json::to_string(&result)?)
}
