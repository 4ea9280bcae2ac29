use crate::constants::{DISTANCE_DECIMALS, EARTH_RADIUS_M, PACE_DECIMALS};
use crate::errors::PrivacyError;
use crate::round_to;
use crate::types::{GeoPoint, WorkoutStats};
use tracing::debug;

/// Great-circle distance in metres.
pub fn haversine_m(from: &GeoPoint, to: &GeoPoint) -> f64 {
    let d_lat = (to.lat - from.lat).to_radians();
    let d_lng = (to.lng - from.lng).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + from.lat.to_radians().cos() * to.lat.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * a.sqrt().atan2((1.0 - a).sqrt())
}

/// Distance (km, 3 decimals), pace (min/km, 2 decimals) and duration of a run.
///
/// Fewer than two points yields zero distance and pace with `elapsed_seconds`
/// passed through.
pub fn compute_stats(trajectory: &[GeoPoint], elapsed_seconds: u64) -> Result<WorkoutStats, PrivacyError> {
    if let Some(position) = trajectory
        .iter()
        .position(|p| !(p.lat.is_finite() && p.lng.is_finite()))
    {
        return Err(PrivacyError::InvalidCoordinate(format!(
            "trajectory point {position} is not finite"
        )));
    }

    if trajectory.len() < 2 {
        return Ok(WorkoutStats {
            total_distance: 0.0,
            average_pace: 0.0,
            duration: elapsed_seconds,
        });
    }

    let metres: f64 = trajectory.windows(2).map(|w| haversine_m(&w[0], &w[1])).sum();
    let km = metres / 1000.0;
    let pace = if km > 0.0 {
        (elapsed_seconds as f64 / 60.0) / km
    } else {
        0.0
    };

    debug!(points = trajectory.len(), "computed workout stats");
    Ok(WorkoutStats {
        total_distance: round_to(km, DISTANCE_DECIMALS),
        average_pace: round_to(pace, PACE_DECIMALS),
        duration: elapsed_seconds,
    })
}

/// Seconds between the first and last timestamped points.
pub fn elapsed_seconds_from_timestamps(trajectory: &[GeoPoint]) -> Option<u64> {
    let mut stamps = trajectory.iter().filter_map(|p| p.timestamp);
    let first = stamps.next()?;
    let last = stamps.last()?;
    u64::try_from((last - first).num_seconds()).ok()
}
