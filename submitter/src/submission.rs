use crate::config::{AuthSource, SubmitConfig};
use crate::errors::SubmitError;
use crate::models::{KeygenOutput, RingFile, SubmissionBundle};
use privacy_engine::authorization::{
    SigningStrategy, authorize, verify_submission, verify_submission_with_secret,
};
use privacy_engine::dp::aggregate;
use privacy_engine::keys::PrivateKey;
use privacy_engine::ring_signature::{Ring, generate_keypair};
use privacy_engine::types::{GeoPoint, HistogramUpload};
use privacy_engine::workout::{compute_stats, elapsed_seconds_from_timestamps};
use rand::{CryptoRng, RngCore};
use std::io::Write;
use std::path::Path;
use tracing::{debug, error, info};

pub fn load_trajectory(path: &Path) -> Result<Vec<GeoPoint>, SubmitError> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

pub fn load_ring(path: &Path) -> Result<RingFile, SubmitError> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

fn signing_strategy(auth: &AuthSource) -> Result<SigningStrategy, SubmitError> {
    match auth {
        AuthSource::Ring { ring_path, private_key_hex } => {
            let ring_file = load_ring(ring_path)?;
            debug!(
                ring_id = %ring_file.ring_id,
                group = %ring_file.group_name,
                ring_size = ring_file.ring_public_keys.len(),
                "ring assignment loaded"
            );
            Ok(SigningStrategy::Ring {
                ring: Ring::from_hex(&ring_file.ring_public_keys)?,
                ring_id: ring_file.ring_id,
                private_key: PrivateKey::from_hex(private_key_hex)?,
            })
        }
        AuthSource::GroupSecret { group_name, secret_hex } => Ok(SigningStrategy::GroupSecret {
            group_name: group_name.clone(),
            secret_hex: secret_hex.clone(),
        }),
    }
}

/// Trajectory in, authorized score and noised histogram out.
///
/// The authorization is verified before anything is returned; a bundle that
/// would not verify is never emitted.
pub fn run(
    rng: &mut (impl RngCore + CryptoRng),
    config: &SubmitConfig,
) -> Result<SubmissionBundle, SubmitError> {
    let trajectory = load_trajectory(&config.trajectory_path)?;
    let elapsed = config
        .elapsed_seconds
        .or_else(|| elapsed_seconds_from_timestamps(&trajectory))
        .unwrap_or(0);

    let stats = compute_stats(&trajectory, elapsed)?;
    let data = aggregate(rng, &trajectory, &config.params)?;

    let strategy = signing_strategy(&config.auth)?;
    let score = authorize(rng, &stats, &strategy)?;

    let verified = match &config.auth {
        AuthSource::Ring { .. } => verify_submission(&score)?,
        AuthSource::GroupSecret { secret_hex, .. } => verify_submission_with_secret(&score, secret_hex)?,
    };
    if !verified {
        error!(anonymous_id = %config.anonymous_id, "authorization failed local verification");
        return Err(SubmitError::VerificationFailed);
    }

    info!(
        anonymous_id = %config.anonymous_id,
        points = trajectory.len(),
        buckets = data.len(),
        epsilon = config.params.epsilon,
        "submission prepared"
    );

    Ok(SubmissionBundle {
        score,
        histogram: HistogramUpload {
            anonymous_id: config.anonymous_id.clone(),
            data,
        },
    })
}

/// Pretty JSON to `output`, or stdout when `None`.
pub fn write_bundle(bundle: &SubmissionBundle, output: Option<&Path>) -> Result<(), SubmitError> {
    let json = serde_json::to_string_pretty(bundle)?;
    match output {
        Some(path) => {
            std::fs::write(path, json)?;
            info!(path = %path.display(), "bundle written");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{json}")?;
        }
    }
    Ok(())
}

pub fn keygen(rng: &mut (impl RngCore + CryptoRng)) -> Result<KeygenOutput, SubmitError> {
    let pair = generate_keypair(rng)?;
    Ok(KeygenOutput {
        private_key: pair.private_key.to_hex(),
        public_key: pair.public_key.to_hex(),
    })
}
