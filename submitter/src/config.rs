use crate::errors::SubmitError;
use privacy_engine::constants::{DEFAULT_EPSILON, GRID_SIZE};
use privacy_engine::dp::AggregationParams;
use std::path::PathBuf;
use std::str::FromStr;
use uuid::Uuid;

/// Where the score authorization comes from.
#[derive(Clone)]
pub enum AuthSource {
    Ring { ring_path: PathBuf, private_key_hex: String },
    GroupSecret { group_name: String, secret_hex: String },
}

#[derive(Clone)]
pub struct SubmitConfig {
    pub trajectory_path: PathBuf,
    /// Overrides the span derived from point timestamps.
    pub elapsed_seconds: Option<u64>,
    pub params: AggregationParams,
    /// Stdout when unset.
    pub output_path: Option<PathBuf>,
    pub anonymous_id: String,
    pub auth: AuthSource,
}

fn parse_var<T: FromStr>(name: &str, value: Option<String>) -> Result<Option<T>, SubmitError>
where
    T::Err: std::fmt::Display,
{
    value
        .map(|v| {
            v.parse::<T>()
                .map_err(|e| SubmitError::Config(format!("{name}={v:?}: {e}")))
        })
        .transpose()
}

impl SubmitConfig {
    pub fn from_env() -> Result<Self, SubmitError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any variable source; empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, SubmitError> {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let trajectory_path = var("TRAJECTORY_PATH")
            .map(PathBuf::from)
            .ok_or_else(|| SubmitError::Config("TRAJECTORY_PATH is required".to_string()))?;

        let params = AggregationParams {
            epsilon: parse_var("EPSILON", var("EPSILON"))?.unwrap_or(DEFAULT_EPSILON),
            grid_size: parse_var("GRID_SIZE", var("GRID_SIZE"))?.unwrap_or(GRID_SIZE),
            ..AggregationParams::default()
        };
        params.validate()?;

        let ring = (var("RING_PATH"), var("PRIVATE_KEY_HEX"));
        let group = (var("GROUP_NAME"), var("GROUP_SECRET_HEX"));
        let auth = match (ring, group) {
            ((Some(ring_path), Some(private_key_hex)), (None, None)) => AuthSource::Ring {
                ring_path: PathBuf::from(ring_path),
                private_key_hex,
            },
            ((None, None), (Some(group_name), Some(secret_hex))) => {
                AuthSource::GroupSecret { group_name, secret_hex }
            }
            ((None, None), (None, None)) => {
                return Err(SubmitError::Config(
                    "set RING_PATH and PRIVATE_KEY_HEX, or GROUP_NAME and GROUP_SECRET_HEX".to_string(),
                ));
            }
            ((Some(_), Some(_)), (Some(_), Some(_))) => {
                return Err(SubmitError::Config(
                    "ring and group-secret authorization are mutually exclusive".to_string(),
                ));
            }
            _ => {
                return Err(SubmitError::Config(
                    "incomplete authorization: RING_PATH/PRIVATE_KEY_HEX and GROUP_NAME/GROUP_SECRET_HEX come in pairs"
                        .to_string(),
                ));
            }
        };

        Ok(Self {
            trajectory_path,
            elapsed_seconds: parse_var("ELAPSED_SECONDS", var("ELAPSED_SECONDS"))?,
            params,
            output_path: var("OUTPUT_PATH").map(PathBuf::from),
            anonymous_id: var("ANONYMOUS_ID").unwrap_or_else(|| Uuid::new_v4().to_string()),
            auth,
        })
    }
}
