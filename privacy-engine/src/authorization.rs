//! Score authorization: a ring signature or a group MAC over the canonical message.

use crate::errors::PrivacyError;
use crate::group_mac;
use crate::keys::PrivateKey;
use crate::message::canonical_message;
use crate::ring_signature::{self, Ring, RingSignature};
use crate::types::WorkoutStats;
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// How the caller proves membership.
pub enum SigningStrategy {
    /// Anonymous among `ring`; the signer is appended when missing.
    Ring {
        ring_id: String,
        private_key: PrivateKey,
        ring: Ring,
    },
    /// Shared-secret MAC; identifies the group, not the member.
    GroupSecret { group_name: String, secret_hex: String },
}

impl SigningStrategy {
    fn id(&self) -> &str {
        match self {
            SigningStrategy::Ring { ring_id, .. } => ring_id,
            SigningStrategy::GroupSecret { group_name, .. } => group_name,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Authorization {
    Ring {
        ring_id: String,
        ring_public_keys: Vec<String>,
        signature: RingSignature,
    },
    GroupSecret {
        group_name: String,
        group_signature: String,
    },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoreSubmission {
    pub total_distance: f64,
    pub average_pace: f64,
    pub authorization: Authorization,
}

impl ScoreSubmission {
    pub fn message(&self) -> Result<String, PrivacyError> {
        let id = match &self.authorization {
            Authorization::Ring { ring_id, .. } => ring_id,
            Authorization::GroupSecret { group_name, .. } => group_name,
        };
        canonical_message(id, self.total_distance, self.average_pace)
    }
}

pub fn authorize(
    rng: &mut (impl RngCore + CryptoRng),
    stats: &WorkoutStats,
    strategy: &SigningStrategy,
) -> Result<ScoreSubmission, PrivacyError> {
    let message = canonical_message(strategy.id(), stats.total_distance, stats.average_pace)?;

    let authorization = match strategy {
        SigningStrategy::Ring { ring_id, private_key, ring } => {
            let signed = ring_signature::sign(rng, message.as_bytes(), private_key, ring)?;
            Authorization::Ring {
                ring_id: ring_id.clone(),
                ring_public_keys: signed.ring.to_hex(),
                signature: signed.signature,
            }
        }
        SigningStrategy::GroupSecret { group_name, secret_hex } => Authorization::GroupSecret {
            group_name: group_name.clone(),
            group_signature: group_mac::group_sign(secret_hex, message.as_bytes())?,
        },
    };

    debug!("score authorized");
    Ok(ScoreSubmission {
        total_distance: stats.total_distance,
        average_pace: stats.average_pace,
        authorization,
    })
}

fn verify_ring(message: &str, ring_public_keys: &[String], signature: &RingSignature) -> Result<bool, PrivacyError> {
    let ring = Ring::from_hex(ring_public_keys)?;
    ring_signature::verify(message.as_bytes(), &ring, signature)
}

/// Verify with public information only.
///
/// A group-secret submission cannot be checked without the secret and is
/// reported as not verified.
pub fn verify_submission(submission: &ScoreSubmission) -> Result<bool, PrivacyError> {
    let message = submission.message()?;
    match &submission.authorization {
        Authorization::Ring { ring_public_keys, signature, .. } => {
            verify_ring(&message, ring_public_keys, signature)
        }
        Authorization::GroupSecret { .. } => Ok(false),
    }
}

/// Verify a submission holding the group secret. Ring submissions ignore it.
pub fn verify_submission_with_secret(submission: &ScoreSubmission, secret_hex: &str) -> Result<bool, PrivacyError> {
    let message = submission.message()?;
    match &submission.authorization {
        Authorization::Ring { ring_public_keys, signature, .. } => {
            verify_ring(&message, ring_public_keys, signature)
        }
        Authorization::GroupSecret { group_signature, .. } => {
            group_mac::group_verify(secret_hex, message.as_bytes(), group_signature)
        }
    }
}
