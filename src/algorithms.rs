//! # Algorithm Toolbox
//!
//! Direct access to the clustering and scoring building blocks, for callers
//! that want to compose them without the top-level convenience functions.
//!
//! ## Core Algorithms
//!
//! - **Hotspot Clustering**: greedy seed clustering with decayed risk
//! - **Confirmation**: per-site corroboration scoring
//!
//! ## Geographic Utilities
//!
//! - **Haversine Distance**: great-circle distance between locations
//! - **Centroid**: arithmetic mean of a set of locations
//! - **Site Quantization**: 4-decimal site keys and privacy rounding
//!
//! # Example
//!
//! ```rust
//! use skimmer_hotspots::algorithms::{decay_factor, haversine_distance, Location, SiteKey};
//!
//! let a = Location::new(40.71280001, -74.00600002);
//! let b = Location::new(40.71279999, -74.00599998);
//! assert!(haversine_distance(&a, &b) < 0.01);
//! assert_eq!(SiteKey::from_location(&a), SiteKey::from_location(&b));
//! assert_eq!(decay_factor(0.0, 1.0), 1.0);
//! ```

// =============================================================================
// Core Types (re-exported from lib)
// =============================================================================

pub use crate::{EvaluationResult, Hotspot, Location, ObservationType, Report, ReportCategory};

// =============================================================================
// Geographic Utilities
// =============================================================================

pub use crate::geo_utils::{centroid, haversine_distance, EARTH_RADIUS_M};
pub use crate::site::{fuzz_location, SiteKey};

// =============================================================================
// Hotspot Clustering
// =============================================================================

/// Clustering configuration
pub use crate::hotspots::HotspotConfig;
/// Half-life decay factor
pub use crate::hotspots::decay_factor;
/// Single report's decayed, weighted contribution
pub use crate::hotspots::risk_contribution;
/// Clustering with an injected clock
pub use crate::hotspots::generate_hotspots_at;

/// Parallel clustering (identical output to the sequential version).
#[cfg(feature = "parallel")]
pub use crate::hotspots::generate_hotspots_parallel;

// =============================================================================
// Confirmation
// =============================================================================

/// Score at which a site is confirmed
pub use crate::confirmation::CONFIRMATION_THRESHOLD;
/// Recency rule window in days
pub use crate::confirmation::RECENCY_WINDOW_DAYS;
/// Single-site evaluation with an injected clock
pub use crate::confirmation::evaluate_at;
/// Evaluate all sites in a snapshot
pub use crate::confirmation::evaluate_sites_at;

/// Parallel evaluation of all sites.
#[cfg(feature = "parallel")]
pub use crate::confirmation::evaluate_sites_parallel;
