use anyhow::Error;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::utils::image::ImageFrame;

/// A named skeletal keypoint in image pixel coordinates, as produced by the
/// pose estimation model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoseKeypoint {
    pub name: String,
    pub x: f32,
    pub y: f32,
    pub score: f32,
}

/// A single detected pose. The pipeline only handles the single-person case;
/// providers that detect several poses should return the primary one.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PoseRecord {
    pub keypoints: Vec<PoseKeypoint>,
}

impl PoseRecord {
    /// keypoint returns the first keypoint carrying the given model name.
    pub fn keypoint(&self, name: &str) -> Option<&PoseKeypoint> {
        self.keypoints.iter().find(|kp| kp.name == name)
    }
}

/// Collaborator seam for the external pose estimation model.
///
/// The pipeline awaits this once per analysis pass. A returned error or an
/// absent pose are both treated as missing data for fusion, never as a fatal
/// failure of the pass.
#[async_trait]
pub trait PoseProvider: Send + Sync {
    async fn estimate_pose(&self, frame: &ImageFrame) -> Result<Option<PoseRecord>, Error>;
}
