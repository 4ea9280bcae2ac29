//! Key material and its hex wire form.

use crate::constants::{COMPRESSED_POINT_BYTES, SCALAR_BYTES};
use crate::curve::{self, Point};
use crate::errors::PrivacyError;
use k256::Scalar;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// A signer's secret scalar, always in [1, n).
#[derive(Clone)]
pub struct PrivateKey(Scalar);

impl PrivateKey {
    pub fn from_scalar(scalar: Scalar) -> Result<Self, PrivacyError> {
        if bool::from(scalar.is_zero()) {
            return Err(PrivacyError::InvalidPrivateKey);
        }
        Ok(Self(scalar))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PrivacyError> {
        if bytes.len() != SCALAR_BYTES {
            return Err(PrivacyError::InvalidEncoding(format!(
                "private key must be {SCALAR_BYTES} bytes, got {}",
                bytes.len()
            )));
        }
        let scalar = curve::scalar_from_bytes(bytes).ok_or(PrivacyError::InvalidPrivateKey)?;
        Self::from_scalar(scalar)
    }

    pub fn from_hex(s: &str) -> Result<Self, PrivacyError> {
        let bytes = hex::decode(s).map_err(|e| PrivacyError::InvalidEncoding(format!("{e}")))?;
        Self::from_bytes(&bytes)
    }

    pub fn to_hex(&self) -> String {
        hex::encode(curve::scalar_to_bytes(&self.0))
    }

    pub fn scalar(&self) -> &Scalar {
        &self.0
    }

    pub fn public_key(&self) -> PublicKey {
        PublicKey::from_point(curve::scalar_base_mul(&self.0))
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrivateKey(<redacted>)")
    }
}

/// A ring member's public point together with its 33-byte compressed encoding.
#[derive(Clone, Copy, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PublicKey {
    point: Point,
    encoded: [u8; COMPRESSED_POINT_BYTES],
}

impl PublicKey {
    /// Callers must not pass the identity; every key here comes from a nonzero scalar
    /// or from `from_bytes`, which rejects it.
    fn from_point(point: Point) -> Self {
        let mut encoded = [0u8; COMPRESSED_POINT_BYTES];
        encoded.copy_from_slice(&curve::serialize_compressed(&point));
        Self { point, encoded }
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PrivacyError> {
        let point = curve::deserialize_compressed(bytes)?;
        let mut encoded = [0u8; COMPRESSED_POINT_BYTES];
        encoded.copy_from_slice(bytes);
        Ok(Self { point, encoded })
    }

    pub fn from_hex(s: &str) -> Result<Self, PrivacyError> {
        let bytes = hex::decode(s).map_err(|e| PrivacyError::InvalidEncoding(format!("{e}")))?;
        Self::from_bytes(&bytes)
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.encoded)
    }

    pub fn point(&self) -> &Point {
        &self.point
    }

    pub fn as_bytes(&self) -> &[u8; COMPRESSED_POINT_BYTES] {
        &self.encoded
    }
}

impl PartialEq for PublicKey {
    fn eq(&self, other: &Self) -> bool {
        self.encoded == other.encoded
    }
}

impl Eq for PublicKey {}

impl Hash for PublicKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.encoded.hash(state);
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", self.to_hex())
    }
}

impl TryFrom<String> for PublicKey {
    type Error = PrivacyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<PublicKey> for String {
    fn from(value: PublicKey) -> Self {
        value.to_hex()
    }
}

#[derive(Clone, Debug)]
pub struct KeyPair {
    pub private_key: PrivateKey,
    pub public_key: PublicKey,
}
