//! Crate-wide constants shared by the signing and aggregation layers.

/// Edge length of one grid cell, in degrees.
///
/// 0.001 degrees is roughly 111 m of latitude.
pub const GRID_SIZE: f64 = 0.001;

/// Mean Earth radius used by the haversine distance, in metres.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Buckets whose noised weight is at or below this value are not published.
pub const PUBLICATION_THRESHOLD: f64 = 0.1;

/// Decimal digits kept on published bucket weights.
pub const WEIGHT_DECIMALS: i32 = 3;

/// Decimal digits kept on the total distance (km).
pub const DISTANCE_DECIMALS: i32 = 3;

/// Decimal digits kept on the average pace (min/km).
pub const PACE_DECIMALS: i32 = 2;

/// A ring needs at least one decoy besides the signer.
pub const MIN_RING_SIZE: usize = 2;

/// Ring size handed out by the ring service when none is requested.
pub const DEFAULT_RING_SIZE: usize = 5;

/// Default privacy budget for one aggregation run.
pub const DEFAULT_EPSILON: f64 = 1.0;

/// One trajectory point changes one cell count by at most one.
pub const DEFAULT_SENSITIVITY: f64 = 1.0;

/// Separator between the fields of the canonical signed message.
///
/// Changing it breaks every verifier that already pinned the format.
pub const MESSAGE_DELIMITER: char = '|';

/// Upper bound on rejection-sampling rounds for a nonzero scalar.
///
/// A uniform 32-byte string is rejected with probability below 2^-127, so this
/// bound is only reached by a broken random source.
pub const MAX_SAMPLING_ATTEMPTS: usize = 64;

/// Encoded sizes on the wire.
pub const SCALAR_BYTES: usize = 32;
pub const COMPRESSED_POINT_BYTES: usize = 33;
