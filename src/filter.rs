//! Report filtering for map and API queries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::geo_utils::haversine_distance;
use crate::{Location, Report, ReportCategory};

/// Optional constraints on a report snapshot. The default filter keeps
/// everything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReportFilter {
    /// Keep reports at or after this time
    pub min_timestamp: Option<DateTime<Utc>>,
    /// Keep only this category
    pub category: Option<ReportCategory>,
    /// Circle center; only applied together with `radius_meters`
    pub center: Option<Location>,
    /// Circle radius in meters
    pub radius_meters: Option<f64>,
}

impl ReportFilter {
    /// Check whether a single report passes the filter.
    pub fn matches(&self, report: &Report) -> bool {
        if let Some(min) = self.min_timestamp {
            if report.timestamp < min {
                return false;
            }
        }

        if let Some(category) = self.category {
            if report.category != category {
                return false;
            }
        }

        if let (Some(center), Some(radius)) = (self.center, self.radius_meters) {
            if haversine_distance(&center, &report.location) > radius {
                return false;
            }
        }

        true
    }

    /// Return the reports that pass the filter, in input order.
    pub fn apply(&self, reports: &[Report]) -> Vec<Report> {
        reports.iter().filter(|r| self.matches(r)).cloned().collect()
    }
}
