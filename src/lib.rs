//! # Skimmer Hotspots
//!
//! Spatial clustering and corroboration scoring for crowdsourced card-skimmer
//! sightings.
//!
//! This library provides:
//! - Hotspot clustering with half-life decayed, severity-weighted risk scores
//! - Per-site confirmation verdicts from volume, recency and category agreement
//! - Report validation and filtering for the callers that feed the algorithms
//!
//! Both algorithms are pure functions of the report snapshot and the clock.
//! Nothing is cached between calls.
//!
//! ## Features
//!
//! - **`parallel`** - Enable parallel processing with rayon
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::{Duration, Utc};
//! use skimmer_hotspots::{
//!     evaluate_at, generate_hotspots_at, HotspotConfig, Location, ObservationType, Report,
//!     ReportCategory,
//! };
//!
//! let now = Utc::now();
//! let reports = vec![
//!     Report::new("r-1", Location::new(40.7128, -74.0060), ReportCategory::Atm,
//!                 ObservationType::Overlay, now),
//!     Report::new("r-2", Location::new(40.7128, -74.0060), ReportCategory::Atm,
//!                 ObservationType::LooseCardSlot, now - Duration::hours(1)),
//! ];
//!
//! let hotspots = generate_hotspots_at(&reports, &HotspotConfig::default(), now);
//! assert_eq!(hotspots.len(), 1);
//! assert_eq!(hotspots[0].report_count, 2);
//!
//! let verdict = evaluate_at(&reports, &Location::new(40.7128, -74.0060), now);
//! assert!(verdict.confirm);
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// Unified error handling
pub mod error;
pub use error::{HotspotError, Result};

// Geographic utilities (distance, centroid)
pub mod geo_utils;

// Site quantization for corroboration grouping
pub mod site;
pub use site::{fuzz_location, SiteKey};

// Hotspot clustering (greedy seed clustering + decayed risk)
pub mod hotspots;
#[cfg(feature = "parallel")]
pub use hotspots::generate_hotspots_parallel;
pub use hotspots::{generate_hotspots, generate_hotspots_at, HotspotConfig};

// Confirmation evaluation per site
pub mod confirmation;
#[cfg(feature = "parallel")]
pub use confirmation::evaluate_sites_parallel;
pub use confirmation::{
    evaluate, evaluate_at, evaluate_sites_at, reevaluate_site, ReportStatus, ReportStatusUpdate,
};

// Upstream validation contract
pub mod validation;
pub use validation::{
    parse_timestamp, partition_valid, partition_valid_at, validate_report, validate_report_at,
};

// Report filtering
pub mod filter;
pub use filter::ReportFilter;

// JSON entry points for serverless hosts
pub mod json;

// Algorithm toolbox - modular access to all algorithms
pub mod algorithms;

// ============================================================================
// Core Types
// ============================================================================

/// A WGS84 coordinate in degrees.
///
/// # Example
/// ```
/// use skimmer_hotspots::Location;
/// let point = Location::new(40.7128, -74.0060); // New York
/// assert!(point.is_valid());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    /// Create a new location.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Check if the location has valid coordinates.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && self.latitude >= -90.0
            && self.latitude <= 90.0
            && self.longitude >= -180.0
            && self.longitude <= 180.0
    }
}

impl From<Location> for geo::Point<f64> {
    fn from(loc: Location) -> Self {
        geo::Point::new(loc.longitude, loc.latitude)
    }
}

impl From<geo::Point<f64>> for Location {
    fn from(point: geo::Point<f64>) -> Self {
        Location::new(point.y(), point.x())
    }
}

/// Kind of card terminal a report refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ReportCategory {
    #[serde(rename = "ATM")]
    Atm,
    #[serde(rename = "Gas pump")]
    GasPump,
    #[serde(rename = "Store POS")]
    StorePos,
}

impl ReportCategory {
    /// Fixed weight applied when summing risk contributions.
    pub fn severity(&self) -> f64 {
        match self {
            ReportCategory::Atm => 1.0,
            ReportCategory::GasPump => 1.0,
            ReportCategory::StorePos => 0.8,
        }
    }
}

/// What the reporter observed at the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObservationType {
    #[serde(rename = "Loose card slot")]
    LooseCardSlot,
    #[serde(rename = "Overlay")]
    Overlay,
    #[serde(rename = "Camera suspected")]
    CameraSuspected,
    #[serde(rename = "Fraud after use")]
    FraudAfterUse,
    #[serde(rename = "Other")]
    Other,
}

/// A single skimmer sighting.
///
/// Reports are never mutated by this crate; derived values are returned for
/// the caller to persist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    /// Unique report identifier
    pub id: String,
    pub location: Location,
    pub category: ReportCategory,
    pub observation_type: ObservationType,
    /// Free-text description (not used by the algorithms)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Observation time (ISO-8601 on the wire)
    pub timestamp: DateTime<Utc>,
    /// Advisory weight in [0, 1]; treated as 1.0 when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence_score: Option<f64>,
}

impl Report {
    /// Create a report without description or confidence score.
    pub fn new(
        id: &str,
        location: Location,
        category: ReportCategory,
        observation_type: ObservationType,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.to_string(),
            location,
            category,
            observation_type,
            description: None,
            timestamp,
            confidence_score: None,
        }
    }

    /// Builder-style setter for the advisory confidence weight.
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence_score = Some(confidence);
        self
    }

    /// Confidence weight used in risk scoring (1.0 when absent).
    pub fn confidence(&self) -> f64 {
        self.confidence_score.unwrap_or(1.0)
    }
}

/// A spatial cluster of reports with an aggregate decayed risk score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hotspot {
    /// Identifier of the seed report that opened this cluster
    pub id: String,
    /// Arithmetic mean of member coordinates
    pub center: Location,
    /// Clustering radius in meters
    pub radius: f64,
    /// Decayed, severity-weighted score rounded to 3 decimals
    pub risk_score: f64,
    pub report_count: u32,
    pub last_report_timestamp: DateTime<Utc>,
    /// Member report IDs in input order
    pub report_ids: Vec<String>,
}

/// Corroboration verdict for one site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationResult {
    pub score: f64,
    pub confirm: bool,
    /// Set only when `confirm` is true
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub evaluated_at: DateTime<Utc>,
}

// ============================================================================
// Tests
// ============================================================================
