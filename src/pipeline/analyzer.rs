use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::config::AnalysisThresholds;
use crate::helper::landmark_helper::{
    AnatomicalLabel, Landmark, LandmarkLabel, LandmarkSource, ViewType,
};
use crate::utils::geometry::{segment_angle_deg, tilt_angle_deg};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKey {
    ShoulderTilt,
    PelvisTilt,
    LegAlignment,
    ForwardHead,
    Kyphosis,
    PelvisPosture,
    ArchType,
    HeelAlignment,
}

impl fmt::Display for MetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MetricKey::ShoulderTilt => "shoulder_tilt",
            MetricKey::PelvisTilt => "pelvis_tilt",
            MetricKey::LegAlignment => "leg_alignment",
            MetricKey::ForwardHead => "forward_head",
            MetricKey::Kyphosis => "kyphosis",
            MetricKey::PelvisPosture => "pelvis_posture",
            MetricKey::ArchType => "arch_type",
            MetricKey::HeelAlignment => "heel_alignment",
        };
        write!(f, "{name}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingStatus {
    Good,
    Warning,
    Bad,
    Unknown,
}

/// A single graded postural metric result. Read-only once produced; a
/// re-analysis replaces the whole set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    pub metric: MetricKey,
    pub status: FindingStatus,
    pub value: Option<String>,
    pub message: String,
}

impl Finding {
    fn unknown(metric: MetricKey, message: &str) -> Self {
        Finding {
            metric,
            status: FindingStatus::Unknown,
            value: None,
            message: message.to_string(),
        }
    }
}

/// Pure rule engine turning a landmark set into graded findings for the
/// active view. Absent landmarks grade as `Unknown`, never as an error.
#[derive(Debug, Clone, Default)]
pub struct PostureAnalyzer {
    thresholds: AnalysisThresholds,
}

impl PostureAnalyzer {
    pub fn new(thresholds: AnalysisThresholds) -> Self {
        PostureAnalyzer { thresholds }
    }

    /// analyze runs every rule defined for the view, in declaration order.
    ///
    /// # Arguments
    /// * `view` - active view type
    /// * `landmarks` - fused landmark set for the pass
    /// * `image_width` - frame width, used to normalize the forward head offset
    ///
    /// # Returns
    /// * `Vec<Finding>` - one finding per metric of the view
    pub fn analyze(&self, view: ViewType, landmarks: &[Landmark], image_width: u32) -> Vec<Finding> {
        match view {
            ViewType::Front => vec![
                self.shoulder_tilt(landmarks),
                self.pelvis_tilt(landmarks),
                self.leg_alignment(landmarks),
            ],
            ViewType::Side => vec![
                self.forward_head(landmarks, image_width),
                self.kyphosis(landmarks),
                self.pelvis_posture(),
            ],
            ViewType::FootTop => vec![self.arch_type(landmarks)],
            ViewType::FootBack => vec![self.heel_alignment()],
        }
    }

    fn shoulder_tilt(&self, landmarks: &[Landmark]) -> Finding {
        let (Some(left), Some(right)) = (
            find_label(landmarks, AnatomicalLabel::LeftShoulder),
            find_label(landmarks, AnatomicalLabel::RightShoulder),
        ) else {
            return Finding::unknown(MetricKey::ShoulderTilt, "shoulder landmarks not detected");
        };

        let angle = tilt_angle_deg(&left.position, &right.position);
        let (status, message) = if angle.abs() < self.thresholds.shoulder_good {
            (FindingStatus::Good, "shoulders are close to level")
        } else if angle.abs() < self.thresholds.shoulder_warning {
            (FindingStatus::Warning, "slight difference in shoulder height")
        } else {
            (FindingStatus::Bad, "clear difference in shoulder height")
        };

        Finding {
            metric: MetricKey::ShoulderTilt,
            status,
            value: Some(format!("{:.1}°", angle.abs())),
            message: message.to_string(),
        }
    }

    fn pelvis_tilt(&self, landmarks: &[Landmark]) -> Finding {
        let (Some(left), Some(right)) = (
            find_label(landmarks, AnatomicalLabel::LeftHip),
            find_label(landmarks, AnatomicalLabel::RightHip),
        ) else {
            return Finding::unknown(MetricKey::PelvisTilt, "hip landmarks not detected");
        };

        let angle = tilt_angle_deg(&left.position, &right.position);
        let (status, message) = if angle.abs() < self.thresholds.pelvis_good {
            (FindingStatus::Good, "pelvis height is level")
        } else if angle.abs() < self.thresholds.pelvis_warning {
            (FindingStatus::Warning, "slight pelvic tilt")
        } else {
            (FindingStatus::Bad, "pronounced pelvic tilt")
        };

        Finding {
            metric: MetricKey::PelvisTilt,
            status,
            value: Some(format!("{:.1}°", angle.abs())),
            message: message.to_string(),
        }
    }

    fn leg_alignment(&self, landmarks: &[Landmark]) -> Finding {
        let (Some(lk), Some(rk), Some(la), Some(ra)) = (
            find_label(landmarks, AnatomicalLabel::LeftKnee),
            find_label(landmarks, AnatomicalLabel::RightKnee),
            find_label(landmarks, AnatomicalLabel::LeftAnkle),
            find_label(landmarks, AnatomicalLabel::RightAnkle),
        ) else {
            return Finding::unknown(MetricKey::LegAlignment, "leg landmarks are incomplete");
        };

        let knee_distance = (lk.position.x - rk.position.x).abs();
        let ankle_distance = (la.position.x - ra.position.x).abs();
        let ratio = knee_distance / ankle_distance;

        // Bounds are exclusive: a ratio of exactly 1.2 or 0.8 grades as good.
        let (status, value, message) = if ratio > self.thresholds.leg_ratio_bow {
            (
                FindingStatus::Warning,
                "bow-leg tendency",
                "knees spread wider than the ankles",
            )
        } else if ratio < self.thresholds.leg_ratio_knock {
            (
                FindingStatus::Warning,
                "knock-knee tendency",
                "knees sit closer together than the ankles",
            )
        } else {
            (FindingStatus::Good, "normal", "leg alignment is within the normal range")
        };

        Finding {
            metric: MetricKey::LegAlignment,
            status,
            value: Some(value.to_string()),
            message: message.to_string(),
        }
    }

    fn forward_head(&self, landmarks: &[Landmark], image_width: u32) -> Finding {
        let (Some(ear), Some(shoulder)) = (
            find_label(landmarks, AnatomicalLabel::Ear),
            find_label(landmarks, AnatomicalLabel::Shoulder),
        ) else {
            return Finding::unknown(MetricKey::ForwardHead, "ear or shoulder landmark not detected");
        };

        let offset = ear.position.x - shoulder.position.x;
        let normalized = offset / image_width as f32 * 100.0;
        let (status, message) = if normalized.abs() < self.thresholds.head_good {
            (FindingStatus::Good, "head position is neutral")
        } else if normalized.abs() < self.thresholds.head_warning {
            (FindingStatus::Warning, "head sits slightly forward")
        } else {
            (FindingStatus::Bad, "pronounced forward head posture")
        };

        Finding {
            metric: MetricKey::ForwardHead,
            status,
            value: Some(format!("{:.1}%", normalized.abs())),
            message: message.to_string(),
        }
    }

    fn kyphosis(&self, landmarks: &[Landmark]) -> Finding {
        let (Some(shoulder), Some(hip)) = (
            find_label(landmarks, AnatomicalLabel::Shoulder),
            find_label(landmarks, AnatomicalLabel::Hip),
        ) else {
            return Finding::unknown(MetricKey::Kyphosis, "shoulder or hip landmark not detected");
        };

        let back_angle = segment_angle_deg(&shoulder.position, &hip.position);
        let deviation = (90.0 - back_angle.abs()).abs();
        let (status, message) = if deviation < self.thresholds.kyphosis_good {
            (FindingStatus::Good, "upper back posture is good")
        } else if deviation < self.thresholds.kyphosis_warning {
            (FindingStatus::Warning, "slight rounding of the upper back")
        } else {
            (FindingStatus::Bad, "pronounced rounding of the upper back")
        };

        Finding {
            metric: MetricKey::Kyphosis,
            status,
            value: Some(format!("{:.1}°", deviation)),
            message: message.to_string(),
        }
    }

    // TODO: grade anterior/posterior pelvic tilt once a sacrum marker is part
    // of the side-view protocol.
    fn pelvis_posture(&self) -> Finding {
        Finding {
            metric: MetricKey::PelvisPosture,
            status: FindingStatus::Warning,
            value: Some("needs review".to_string()),
            message: "detailed pelvic assessment needs additional markers".to_string(),
        }
    }

    fn arch_type(&self, landmarks: &[Landmark]) -> Finding {
        let marker_count = landmarks
            .iter()
            .filter(|l| l.source == LandmarkSource::ColorMarker)
            .count();
        if marker_count < self.thresholds.arch_min_markers {
            return Finding::unknown(MetricKey::ArchType, "not enough foot markers detected");
        }

        // Classification beyond the marker-count gate is not implemented.
        Finding {
            metric: MetricKey::ArchType,
            status: FindingStatus::Good,
            value: Some("normal arch".to_string()),
            message: "arch shape is within the normal range".to_string(),
        }
    }

    // Heel varus/valgus classification is not implemented.
    fn heel_alignment(&self) -> Finding {
        Finding {
            metric: MetricKey::HeelAlignment,
            status: FindingStatus::Good,
            value: Some("normal".to_string()),
            message: "heel alignment is normal".to_string(),
        }
    }
}

fn find_label(landmarks: &[Landmark], label: AnatomicalLabel) -> Option<&Landmark> {
    landmarks
        .iter()
        .find(|l| l.label == LandmarkLabel::Anatomical(label))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::coordinate::Coordinate2D;

    fn anatomical(label: AnatomicalLabel, x: f32, y: f32) -> Landmark {
        Landmark {
            id: format!("pose_{label}"),
            position: Coordinate2D::new(x, y),
            source: LandmarkSource::ModelKeypoint,
            label: LandmarkLabel::Anatomical(label),
            confidence: 0.8,
        }
    }

    fn marker(n: u32, x: f32, y: f32) -> Landmark {
        Landmark {
            id: format!("marker_{}", n - 1),
            position: Coordinate2D::new(x, y),
            source: LandmarkSource::ColorMarker,
            label: LandmarkLabel::Marker(n),
            confidence: 0.9,
        }
    }

    fn finding<'a>(findings: &'a [Finding], metric: MetricKey) -> &'a Finding {
        findings.iter().find(|f| f.metric == metric).unwrap()
    }

    #[test]
    fn test_empty_landmark_set_grades_unknown() {
        let analyzer = PostureAnalyzer::default();
        let findings = analyzer.analyze(ViewType::Front, &[], 800);
        assert_eq!(findings.len(), 3);
        assert!(findings
            .iter()
            .all(|f| f.status == FindingStatus::Unknown && f.value.is_none()));
    }

    #[test]
    fn test_shoulder_tilt_level_is_good() {
        let analyzer = PostureAnalyzer::default();
        let landmarks = vec![
            anatomical(AnatomicalLabel::LeftShoulder, 100.0, 100.0),
            anatomical(AnatomicalLabel::RightShoulder, 200.0, 100.0),
        ];
        let findings = analyzer.analyze(ViewType::Front, &landmarks, 800);
        let shoulder = finding(&findings, MetricKey::ShoulderTilt);
        assert_eq!(shoulder.status, FindingStatus::Good);
        assert_eq!(shoulder.value.as_deref(), Some("0.0°"));
    }

    #[test]
    fn test_shoulder_tilt_eleven_degrees_is_bad() {
        let analyzer = PostureAnalyzer::default();
        let landmarks = vec![
            anatomical(AnatomicalLabel::LeftShoulder, 100.0, 120.0),
            anatomical(AnatomicalLabel::RightShoulder, 200.0, 100.0),
        ];
        let findings = analyzer.analyze(ViewType::Front, &landmarks, 800);
        let shoulder = finding(&findings, MetricKey::ShoulderTilt);
        // atan2(20, 100) is roughly 11.3 degrees
        assert_eq!(shoulder.status, FindingStatus::Bad);
        assert_eq!(shoulder.value.as_deref(), Some("11.3°"));
    }

    #[test]
    fn test_pelvis_tilt_uses_tighter_warning_band() {
        let analyzer = PostureAnalyzer::default();
        // atan2(8, 100) is roughly 4.6 degrees: warning for shoulders, bad for pelvis.
        let landmarks = vec![
            anatomical(AnatomicalLabel::LeftHip, 100.0, 108.0),
            anatomical(AnatomicalLabel::RightHip, 200.0, 100.0),
        ];
        let findings = analyzer.analyze(ViewType::Front, &landmarks, 800);
        assert_eq!(
            finding(&findings, MetricKey::PelvisTilt).status,
            FindingStatus::Bad
        );
    }

    #[test]
    fn test_leg_alignment_boundary_ratio_exactly_at_bound_is_good() {
        let analyzer = PostureAnalyzer::default();
        // knee distance 120, ankle distance 100: ratio exactly 1.2
        let landmarks = vec![
            anatomical(AnatomicalLabel::LeftKnee, 0.0, 300.0),
            anatomical(AnatomicalLabel::RightKnee, 120.0, 300.0),
            anatomical(AnatomicalLabel::LeftAnkle, 10.0, 500.0),
            anatomical(AnatomicalLabel::RightAnkle, 110.0, 500.0),
        ];
        let findings = analyzer.analyze(ViewType::Front, &landmarks, 800);
        let leg = finding(&findings, MetricKey::LegAlignment);
        assert_eq!(leg.status, FindingStatus::Good);
        assert_eq!(leg.value.as_deref(), Some("normal"));
    }

    #[test]
    fn test_leg_alignment_tendencies() {
        let analyzer = PostureAnalyzer::default();
        let mut landmarks = vec![
            anatomical(AnatomicalLabel::LeftKnee, 0.0, 300.0),
            anatomical(AnatomicalLabel::RightKnee, 130.0, 300.0),
            anatomical(AnatomicalLabel::LeftAnkle, 10.0, 500.0),
            anatomical(AnatomicalLabel::RightAnkle, 110.0, 500.0),
        ];
        let findings = analyzer.analyze(ViewType::Front, &landmarks, 800);
        assert_eq!(
            finding(&findings, MetricKey::LegAlignment).value.as_deref(),
            Some("bow-leg tendency")
        );

        landmarks[1].position.x = 70.0; // knee distance 70, ratio 0.7
        let findings = analyzer.analyze(ViewType::Front, &landmarks, 800);
        assert_eq!(
            finding(&findings, MetricKey::LegAlignment).value.as_deref(),
            Some("knock-knee tendency")
        );
    }

    #[test]
    fn test_forward_head_normalizes_by_image_width() {
        let analyzer = PostureAnalyzer::default();
        // offset 24 on an 800-wide image: 3 percent, warning band
        let landmarks = vec![
            anatomical(AnatomicalLabel::Ear, 124.0, 50.0),
            anatomical(AnatomicalLabel::Shoulder, 100.0, 150.0),
            anatomical(AnatomicalLabel::Hip, 100.0, 300.0),
        ];
        let findings = analyzer.analyze(ViewType::Side, &landmarks, 800);
        let head = finding(&findings, MetricKey::ForwardHead);
        assert_eq!(head.status, FindingStatus::Warning);
        assert_eq!(head.value.as_deref(), Some("3.0%"));
    }

    #[test]
    fn test_kyphosis_vertical_back_is_good() {
        let analyzer = PostureAnalyzer::default();
        let landmarks = vec![
            anatomical(AnatomicalLabel::Shoulder, 100.0, 150.0),
            anatomical(AnatomicalLabel::Hip, 100.0, 300.0),
        ];
        let findings = analyzer.analyze(ViewType::Side, &landmarks, 800);
        let kyphosis = finding(&findings, MetricKey::Kyphosis);
        assert_eq!(kyphosis.status, FindingStatus::Good);
        assert_eq!(kyphosis.value.as_deref(), Some("0.0°"));
    }

    #[test]
    fn test_kyphosis_leaning_back_grades_bad() {
        let analyzer = PostureAnalyzer::default();
        // hip displaced 100 units horizontally over 150 vertically:
        // back angle around 56 degrees, deviation around 34 degrees
        let landmarks = vec![
            anatomical(AnatomicalLabel::Shoulder, 100.0, 150.0),
            anatomical(AnatomicalLabel::Hip, 200.0, 300.0),
        ];
        let findings = analyzer.analyze(ViewType::Side, &landmarks, 800);
        assert_eq!(
            finding(&findings, MetricKey::Kyphosis).status,
            FindingStatus::Bad
        );
    }

    #[test]
    fn test_pelvis_posture_is_fixed_warning() {
        let analyzer = PostureAnalyzer::default();
        let findings = analyzer.analyze(ViewType::Side, &[], 800);
        let pelvis = finding(&findings, MetricKey::PelvisPosture);
        assert_eq!(pelvis.status, FindingStatus::Warning);
        assert_eq!(pelvis.value.as_deref(), Some("needs review"));
    }

    #[test]
    fn test_arch_type_requires_three_color_markers() {
        let analyzer = PostureAnalyzer::default();
        let two = vec![marker(1, 10.0, 10.0), marker(2, 40.0, 10.0)];
        let findings = analyzer.analyze(ViewType::FootTop, &two, 800);
        assert_eq!(findings[0].status, FindingStatus::Unknown);

        let three = vec![
            marker(1, 10.0, 10.0),
            marker(2, 40.0, 10.0),
            marker(3, 70.0, 10.0),
        ];
        let findings = analyzer.analyze(ViewType::FootTop, &three, 800);
        assert_eq!(findings[0].status, FindingStatus::Good);
        assert_eq!(findings[0].value.as_deref(), Some("normal arch"));
    }

    #[test]
    fn test_heel_alignment_is_fixed_good() {
        let analyzer = PostureAnalyzer::default();
        let findings = analyzer.analyze(ViewType::FootBack, &[], 800);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].status, FindingStatus::Good);
    }

    #[test]
    fn test_analysis_is_idempotent() {
        let analyzer = PostureAnalyzer::default();
        let landmarks = vec![
            anatomical(AnatomicalLabel::LeftShoulder, 100.0, 104.0),
            anatomical(AnatomicalLabel::RightShoulder, 200.0, 100.0),
            anatomical(AnatomicalLabel::LeftHip, 100.0, 200.0),
            anatomical(AnatomicalLabel::RightHip, 200.0, 200.0),
        ];
        let first = analyzer.analyze(ViewType::Front, &landmarks, 800);
        let second = analyzer.analyze(ViewType::Front, &landmarks, 800);
        assert_eq!(first, second);
    }
}
