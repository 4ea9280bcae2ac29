//! Anonymous score authorization and private location publishing.
//!
//! This crate contains:
//! - secp256k1 arithmetic and an AOS ring signature over compressed public keys.
//! - A keyed-MAC group signature used as the non-anonymous fallback.
//! - Grid bucketing plus a Laplace-mechanism aggregator for trajectory heat maps.
//! - Great-circle workout statistics and the canonical signed message.

pub mod authorization;
pub mod constants;
pub mod curve;
pub mod dp;
pub mod errors;
pub mod grid;
pub mod group_mac;
pub mod keys;
pub mod message;
pub mod ring_signature;
pub mod types;
pub mod workout;

pub use errors::PrivacyError;

/// Round half away from zero to `decimals` fractional digits.
pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
