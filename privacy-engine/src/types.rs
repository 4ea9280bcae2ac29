//! Plain data shared between the statistics, aggregation and authorization layers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One location sample, in degrees.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng, timestamp: None }
    }

    pub fn at(lat: f64, lng: f64, timestamp: DateTime<Utc>) -> Self {
        Self { lat, lng, timestamp: Some(timestamp) }
    }
}

/// Integer grid coordinates: `x` indexes longitude, `y` latitude.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridCell {
    pub x: i64,
    pub y: i64,
}

/// A published cell with its noised visit weight. Serializes as `{x, y, weight}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistogramBucket {
    #[serde(flatten)]
    pub cell: GridCell,
    pub weight: f64,
}

/// Outbound histogram publication.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistogramUpload {
    pub anonymous_id: String,
    pub data: Vec<HistogramBucket>,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorkoutStats {
    /// Kilometres.
    pub total_distance: f64,
    /// Minutes per kilometre; 0 when no distance was covered.
    pub average_pace: f64,
    /// Seconds.
    pub duration: u64,
}
