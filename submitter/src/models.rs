use privacy_engine::authorization::ScoreSubmission;
use privacy_engine::types::HistogramUpload;
use serde::{Deserialize, Serialize};

/// Ring assignment as handed out by the ring service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RingFile {
    pub ring_id: String,
    pub ring_public_keys: Vec<String>,
    #[serde(default)]
    pub group_name: String,
}

/// Everything the transport layer needs to publish one workout.
#[derive(Debug, Serialize, Deserialize)]
pub struct SubmissionBundle {
    pub score: ScoreSubmission,
    pub histogram: HistogramUpload,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct KeygenOutput {
    pub private_key: String,
    pub public_key: String,
}
