use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::config::FusionConfig;
use crate::modules::clustering::Cluster;
use crate::modules::pose_client::PoseRecord;
use crate::utils::coordinate::Coordinate2D;
use crate::utils::geometry::distance;

/// The photography angle, governing which labels and rules apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ViewType {
    #[serde(rename = "front")]
    Front,
    #[serde(rename = "side")]
    Side,
    #[serde(rename = "foot-top")]
    FootTop,
    #[serde(rename = "foot-back")]
    FootBack,
}

impl ViewType {
    /// next returns the following step in the capture wizard, or `None` once
    /// the foot-back view completes the sequence.
    pub fn next(&self) -> Option<ViewType> {
        match self {
            ViewType::Front => Some(ViewType::Side),
            ViewType::Side => Some(ViewType::FootTop),
            ViewType::FootTop => Some(ViewType::FootBack),
            ViewType::FootBack => None,
        }
    }
}

impl fmt::Display for ViewType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ViewType::Front => "front",
            ViewType::Side => "side",
            ViewType::FootTop => "foot-top",
            ViewType::FootBack => "foot-back",
        };
        write!(f, "{name}")
    }
}

/// Closed vocabulary of anatomical locations the views can expect.
/// Side-view labels are unprefixed: the subject faces left, so the model's
/// left-side keypoints stand in for the whole silhouette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnatomicalLabel {
    LeftShoulder,
    RightShoulder,
    LeftHip,
    RightHip,
    LeftKnee,
    RightKnee,
    LeftAnkle,
    RightAnkle,
    Ear,
    Shoulder,
    Hip,
    Knee,
    Ankle,
}

impl fmt::Display for AnatomicalLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AnatomicalLabel::LeftShoulder => "left_shoulder",
            AnatomicalLabel::RightShoulder => "right_shoulder",
            AnatomicalLabel::LeftHip => "left_hip",
            AnatomicalLabel::RightHip => "right_hip",
            AnatomicalLabel::LeftKnee => "left_knee",
            AnatomicalLabel::RightKnee => "right_knee",
            AnatomicalLabel::LeftAnkle => "left_ankle",
            AnatomicalLabel::RightAnkle => "right_ankle",
            AnatomicalLabel::Ear => "ear",
            AnatomicalLabel::Shoulder => "shoulder",
            AnatomicalLabel::Hip => "hip",
            AnatomicalLabel::Knee => "knee",
            AnatomicalLabel::Ankle => "ankle",
        };
        write!(f, "{name}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LandmarkSource {
    ColorMarker,
    ModelKeypoint,
}

/// Label carried by a fused landmark: either a mapped anatomical location or
/// a sequentially numbered physical marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LandmarkLabel {
    Anatomical(AnatomicalLabel),
    Marker(u32),
}

impl fmt::Display for LandmarkLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LandmarkLabel::Anatomical(label) => write!(f, "{label}"),
            LandmarkLabel::Marker(n) => write!(f, "Marker {n}"),
        }
    }
}

/// A fused, labeled 2D point representing one anatomical location on the
/// subject. Created once per analysis pass; mutated in place only through
/// manual correction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub id: String,
    pub position: Coordinate2D,
    pub source: LandmarkSource,
    pub label: LandmarkLabel,
    pub confidence: f32,
}

use AnatomicalLabel::*;

const FRONT_KEYPOINT_MAP: &[(AnatomicalLabel, &str)] = &[
    (LeftShoulder, "left_shoulder"),
    (RightShoulder, "right_shoulder"),
    (LeftHip, "left_hip"),
    (RightHip, "right_hip"),
    (LeftKnee, "left_knee"),
    (RightKnee, "right_knee"),
    (LeftAnkle, "left_ankle"),
    (RightAnkle, "right_ankle"),
];

const SIDE_KEYPOINT_MAP: &[(AnatomicalLabel, &str)] = &[
    (Ear, "left_ear"),
    (Shoulder, "left_shoulder"),
    (Hip, "left_hip"),
    (Knee, "left_knee"),
    (Ankle, "left_ankle"),
];

const FRONT_CONNECTIONS: &[(AnatomicalLabel, AnatomicalLabel)] = &[
    (LeftShoulder, RightShoulder),
    (LeftShoulder, LeftHip),
    (RightShoulder, RightHip),
    (LeftHip, RightHip),
    (LeftHip, LeftKnee),
    (RightHip, RightKnee),
    (LeftKnee, LeftAnkle),
    (RightKnee, RightAnkle),
];

const SIDE_CONNECTIONS: &[(AnatomicalLabel, AnatomicalLabel)] = &[
    (Ear, Shoulder),
    (Shoulder, Hip),
    (Hip, Knee),
    (Knee, Ankle),
];

/// keypoint_mapping returns the static table of anatomical labels the view
/// expects, each paired with the model keypoint name that resolves it. Foot
/// views rely on physical markers only.
pub fn keypoint_mapping(view: ViewType) -> &'static [(AnatomicalLabel, &'static str)] {
    match view {
        ViewType::Front => FRONT_KEYPOINT_MAP,
        ViewType::Side => SIDE_KEYPOINT_MAP,
        ViewType::FootTop | ViewType::FootBack => &[],
    }
}

/// connection_pairs returns the skeleton segments a caller should join when
/// rendering an overlay for the view.
pub fn connection_pairs(view: ViewType) -> &'static [(AnatomicalLabel, AnatomicalLabel)] {
    match view {
        ViewType::Front => FRONT_CONNECTIONS,
        ViewType::Side => SIDE_CONNECTIONS,
        ViewType::FootTop | ViewType::FootBack => &[],
    }
}

/// Merges clustered color markers with model keypoints into a single
/// landmark set.
#[derive(Debug, Clone, Default)]
pub struct LandmarkFusion {
    config: FusionConfig,
}

impl LandmarkFusion {
    pub fn new(config: FusionConfig) -> Self {
        LandmarkFusion { config }
    }

    /// fuse builds the landmark set for one analysis pass.
    ///
    /// Color markers take precedence: every retained cluster becomes a
    /// landmark with fixed confidence and a sequential `Marker N` label.
    /// Model keypoints fill in the remaining anatomical labels of the view,
    /// but a keypoint is suppressed when a color marker already lies strictly
    /// within the suppression radius. Low-score and unmapped keypoints are
    /// dropped; a missing pose simply yields a partial set.
    ///
    /// # Arguments
    /// * `view` - active view type, selecting the keypoint mapping table
    /// * `clusters` - retained color marker clusters
    /// * `pose` - pose record from the provider, if any
    ///
    /// # Returns
    /// * `Vec<Landmark>`
    pub fn fuse(
        &self,
        view: ViewType,
        clusters: &[Cluster],
        pose: Option<&PoseRecord>,
    ) -> Vec<Landmark> {
        let mut landmarks: Vec<Landmark> = Vec::with_capacity(clusters.len());

        for (idx, cluster) in clusters.iter().enumerate() {
            landmarks.push(Landmark {
                id: format!("marker_{idx}"),
                position: cluster.centroid,
                source: LandmarkSource::ColorMarker,
                label: LandmarkLabel::Marker(idx as u32 + 1),
                confidence: self.config.marker_confidence,
            });
        }

        if let Some(pose) = pose {
            for &(label, keypoint_name) in keypoint_mapping(view) {
                let Some(kp) = pose.keypoint(keypoint_name) else {
                    continue;
                };
                if kp.score <= self.config.min_keypoint_score {
                    continue;
                }
                let position = Coordinate2D::new(kp.x, kp.y);
                let has_nearby_marker = clusters
                    .iter()
                    .any(|c| distance(&c.centroid, &position) < self.config.suppression_radius);
                if has_nearby_marker {
                    continue;
                }
                landmarks.push(Landmark {
                    id: format!("pose_{keypoint_name}"),
                    position,
                    source: LandmarkSource::ModelKeypoint,
                    label: LandmarkLabel::Anatomical(label),
                    confidence: kp.score,
                });
            }
        }

        debug!(view = %view, count = landmarks.len(), "landmark fusion complete");
        landmarks
    }
}
