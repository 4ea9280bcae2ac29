//! secp256k1 scalar and point arithmetic.
//!
//! Scalars passed in must already be reduced modulo the curve order. Nothing in
//! this module reduces an input silently; the only reduction happens when a hash
//! digest is mapped into the scalar field.

use crate::constants::{COMPRESSED_POINT_BYTES, MAX_SAMPLING_ATTEMPTS, SCALAR_BYTES};
use crate::errors::PrivacyError;
use k256::elliptic_curve::ops::Reduce;
use k256::elliptic_curve::sec1::{FromEncodedPoint, ToEncodedPoint};
use k256::elliptic_curve::PrimeField;
use k256::{AffinePoint, EncodedPoint, FieldBytes, ProjectivePoint, Scalar, U256};
use rand::{CryptoRng, RngCore};
use sha2::{Digest, Sha256};

pub type Point = ProjectivePoint;

/// SEC1 tags for a compressed point with even / odd y.
const TAG_EVEN: u8 = 0x02;
const TAG_ODD: u8 = 0x03;

pub fn scalar_base_mul(k: &Scalar) -> Point {
    ProjectivePoint::GENERATOR * *k
}

pub fn point_add(p: &Point, q: &Point) -> Point {
    *p + *q
}

pub fn point_scalar_mul(p: &Point, k: &Scalar) -> Point {
    *p * *k
}

/// SEC1 compressed encoding (33 bytes; the identity encodes as a single 0x00).
pub fn serialize_compressed(p: &Point) -> Vec<u8> {
    p.to_affine().to_encoded_point(true).as_bytes().to_vec()
}

/// Decode a 33-byte compressed point, rejecting anything that is not on the curve.
pub fn deserialize_compressed(bytes: &[u8]) -> Result<Point, PrivacyError> {
    if bytes.len() != COMPRESSED_POINT_BYTES {
        return Err(PrivacyError::InvalidEncoding(format!(
            "compressed point must be {COMPRESSED_POINT_BYTES} bytes, got {}",
            bytes.len()
        )));
    }
    if bytes[0] != TAG_EVEN && bytes[0] != TAG_ODD {
        return Err(PrivacyError::InvalidEncoding(format!(
            "unexpected point tag 0x{:02x}",
            bytes[0]
        )));
    }

    let encoded = EncodedPoint::from_bytes(bytes)
        .map_err(|e| PrivacyError::InvalidEncoding(format!("{e}")))?;
    let affine = Option::<AffinePoint>::from(AffinePoint::from_encoded_point(&encoded))
        .ok_or_else(|| PrivacyError::InvalidEncoding("point is not on the curve".to_string()))?;

    Ok(ProjectivePoint::from(affine))
}

/// Parse a canonical big-endian scalar. Returns `None` for values >= n.
pub fn scalar_from_bytes(bytes: &[u8]) -> Option<Scalar> {
    if bytes.len() != SCALAR_BYTES {
        return None;
    }
    Option::from(Scalar::from_repr(FieldBytes::from_slice(bytes).clone()))
}

pub fn scalar_to_bytes(s: &Scalar) -> [u8; SCALAR_BYTES] {
    let mut out = [0u8; SCALAR_BYTES];
    out.copy_from_slice(&s.to_bytes());
    out
}

/// SHA-256 over the concatenated parts, read big-endian and reduced mod n.
pub fn hash_to_scalar(parts: &[&[u8]]) -> Scalar {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part);
    }
    let digest = hasher.finalize();
    <Scalar as Reduce<U256>>::reduce_bytes(&digest)
}

/// Uniform scalar in [1, n) by rejection sampling 32-byte strings.
pub fn random_nonzero_scalar(rng: &mut (impl RngCore + CryptoRng)) -> Result<Scalar, PrivacyError> {
    for _ in 0..MAX_SAMPLING_ATTEMPTS {
        let mut buf = [0u8; SCALAR_BYTES];
        rng.fill_bytes(&mut buf);

        let candidate = Option::<Scalar>::from(Scalar::from_repr(FieldBytes::from(buf)));
        if let Some(k) = candidate {
            if !bool::from(k.is_zero()) {
                return Ok(k);
            }
        }
    }
    Err(PrivacyError::RandomnessExhausted(MAX_SAMPLING_ATTEMPTS))
}
