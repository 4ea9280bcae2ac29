use crate::errors::PrivacyError;
use crate::types::{GeoPoint, GridCell};

fn cell_index(degrees: f64, grid_size: f64, axis: &str) -> Result<i64, PrivacyError> {
    if !degrees.is_finite() {
        return Err(PrivacyError::InvalidCoordinate(format!("{axis} is not finite")));
    }
    let index = (degrees / grid_size).floor();
    // Anything outside i64 would saturate and merge distinct cells.
    if !(index >= i64::MIN as f64 && index < i64::MAX as f64) {
        return Err(PrivacyError::InvalidCoordinate(format!(
            "{axis} overflows the grid at size {grid_size}"
        )));
    }
    Ok(index as i64)
}

/// Map a coordinate to its cell: `x = floor(lng / size)`, `y = floor(lat / size)`.
pub fn to_grid(lat: f64, lng: f64, grid_size: f64) -> Result<GridCell, PrivacyError> {
    if !(grid_size.is_finite() && grid_size > 0.0) {
        return Err(PrivacyError::InvalidGridSize(grid_size));
    }
    Ok(GridCell {
        x: cell_index(lng, grid_size, "longitude")?,
        y: cell_index(lat, grid_size, "latitude")?,
    })
}

pub fn point_to_grid(point: &GeoPoint, grid_size: f64) -> Result<GridCell, PrivacyError> {
    to_grid(point.lat, point.lng, grid_size)
}
