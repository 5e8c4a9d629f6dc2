use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MarkerColorConfig {
    pub min_red: u8,
    pub max_green: u8,
    pub max_blue: u8,
    pub scan_step: u32,
}

impl Default for MarkerColorConfig {
    fn default() -> Self {
        MarkerColorConfig {
            min_red: 150,
            max_green: 100,
            max_blue: 100,
            scan_step: 2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClusteringConfig {
    pub neighbor_radius: f32,
    pub min_cluster_size: usize,
}

impl Default for ClusteringConfig {
    fn default() -> Self {
        ClusteringConfig {
            neighbor_radius: 20.0,
            min_cluster_size: 5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FusionConfig {
    pub marker_confidence: f32,
    pub min_keypoint_score: f32,
    pub suppression_radius: f32,
}

impl Default for FusionConfig {
    fn default() -> Self {
        FusionConfig {
            marker_confidence: 0.9,
            min_keypoint_score: 0.3,
            suppression_radius: 50.0,
        }
    }
}

/// Grading thresholds for the posture rules, in degrees except where noted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalysisThresholds {
    pub shoulder_good: f32,
    pub shoulder_warning: f32,
    pub pelvis_good: f32,
    pub pelvis_warning: f32,
    /// Knee/ankle distance ratio above which a bow-leg tendency is flagged.
    pub leg_ratio_bow: f32,
    /// Knee/ankle distance ratio below which a knock-knee tendency is flagged.
    pub leg_ratio_knock: f32,
    /// Forward head offset as percent of image width.
    pub head_good: f32,
    pub head_warning: f32,
    pub kyphosis_good: f32,
    pub kyphosis_warning: f32,
    /// Minimum number of color markers required for the arch-type rule.
    pub arch_min_markers: usize,
}

impl Default for AnalysisThresholds {
    fn default() -> Self {
        AnalysisThresholds {
            shoulder_good: 2.0,
            shoulder_warning: 5.0,
            pelvis_good: 2.0,
            pelvis_warning: 4.0,
            leg_ratio_bow: 1.2,
            leg_ratio_knock: 0.8,
            head_good: 2.0,
            head_warning: 5.0,
            kyphosis_good: 10.0,
            kyphosis_warning: 20.0,
            arch_min_markers: 3,
        }
    }
}
