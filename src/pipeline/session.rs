use serde::{Deserialize, Serialize};

use crate::config::config::AnalysisThresholds;
use crate::errors::AnalysisError;
use crate::helper::landmark_helper::{Landmark, ViewType};
use crate::pipeline::analyzer::{Finding, PostureAnalyzer};
use crate::utils::coordinate::Coordinate2D;
use crate::utils::geometry::distance;

/// The state of one analysis pass: the fused landmark set, the findings
/// computed from it, and the frame metadata the rules need.
///
/// The session exclusively owns its landmarks; `update_position` is the only
/// mutation path after fusion, and a new pass replaces the session wholesale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisSession {
    pub view_type: ViewType,
    pub image_width: u32,
    pub image_height: u32,
    /// Generation of the pipeline that produced this session. A reset bumps
    /// the pipeline counter, which orphans sessions from earlier passes.
    pub generation: u64,
    pub landmarks: Vec<Landmark>,
    pub findings: Vec<Finding>,
}

impl AnalysisSession {
    /// find_nearest returns the landmark strictly closest to `point` among
    /// those strictly within `threshold`, or `None` when no landmark
    /// qualifies. Exact-distance ties resolve to the first landmark in
    /// iteration order.
    pub fn find_nearest(&self, point: Coordinate2D, threshold: f32) -> Option<&Landmark> {
        let mut nearest: Option<&Landmark> = None;
        let mut min_dist = threshold;

        for landmark in &self.landmarks {
            let dist = distance(&landmark.position, &point);
            if dist < min_dist {
                min_dist = dist;
                nearest = Some(landmark);
            }
        }
        nearest
    }

    /// update_position moves one landmark during manual correction.
    pub fn update_position(&mut self, landmark_id: &str, x: f32, y: f32) -> Result<(), AnalysisError> {
        let landmark = self
            .landmarks
            .iter_mut()
            .find(|l| l.id == landmark_id)
            .ok_or_else(|| AnalysisError::UnknownLandmark(landmark_id.to_string()))?;
        landmark.position = Coordinate2D::new(x, y);
        Ok(())
    }

    /// reanalyze recomputes every finding for the current view from the
    /// (possibly corrected) landmark set. The previous findings are replaced
    /// wholesale; nothing is recomputed incrementally.
    pub fn reanalyze(&mut self, thresholds: &AnalysisThresholds) {
        let analyzer = PostureAnalyzer::new(thresholds.clone());
        self.findings = analyzer.analyze(self.view_type, &self.landmarks, self.image_width);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helper::landmark_helper::{AnatomicalLabel, LandmarkLabel, LandmarkSource};
    use crate::pipeline::analyzer::{FindingStatus, MetricKey};

    fn session_with(landmarks: Vec<Landmark>) -> AnalysisSession {
        AnalysisSession {
            view_type: ViewType::Front,
            image_width: 800,
            image_height: 600,
            generation: 0,
            landmarks,
            findings: vec![],
        }
    }

    fn shoulder(label: AnatomicalLabel, id: &str, x: f32, y: f32) -> Landmark {
        Landmark {
            id: id.to_string(),
            position: Coordinate2D::new(x, y),
            source: LandmarkSource::ModelKeypoint,
            label: LandmarkLabel::Anatomical(label),
            confidence: 0.8,
        }
    }

    #[test]
    fn test_find_nearest_respects_threshold() {
        let session = session_with(vec![shoulder(
            AnatomicalLabel::LeftShoulder,
            "pose_left_shoulder",
            100.0,
            100.0,
        )]);
        assert!(session
            .find_nearest(Coordinate2D::new(130.0, 100.0), 20.0)
            .is_none());
        // Distance exactly at the threshold does not qualify.
        assert!(session
            .find_nearest(Coordinate2D::new(120.0, 100.0), 20.0)
            .is_none());
        let hit = session
            .find_nearest(Coordinate2D::new(110.0, 100.0), 20.0)
            .unwrap();
        assert_eq!(hit.id, "pose_left_shoulder");
    }

    #[test]
    fn test_find_nearest_prefers_strictly_closest_with_first_found_ties() {
        let session = session_with(vec![
            shoulder(AnatomicalLabel::LeftShoulder, "a", 90.0, 100.0),
            shoulder(AnatomicalLabel::RightShoulder, "b", 110.0, 100.0),
            shoulder(AnatomicalLabel::LeftHip, "c", 104.0, 100.0),
        ]);
        // "a" and "b" are both 10 away; "c" is 4 away and wins outright.
        let hit = session
            .find_nearest(Coordinate2D::new(100.0, 100.0), 20.0)
            .unwrap();
        assert_eq!(hit.id, "c");

        // With only the equidistant pair, the first in iteration order wins.
        let session = session_with(vec![
            shoulder(AnatomicalLabel::LeftShoulder, "a", 90.0, 100.0),
            shoulder(AnatomicalLabel::RightShoulder, "b", 110.0, 100.0),
        ]);
        let hit = session
            .find_nearest(Coordinate2D::new(100.0, 100.0), 20.0)
            .unwrap();
        assert_eq!(hit.id, "a");
    }

    #[test]
    fn test_update_position_unknown_id_errors() {
        let mut session = session_with(vec![]);
        let err = session.update_position("missing", 1.0, 2.0).unwrap_err();
        assert!(matches!(err, AnalysisError::UnknownLandmark(id) if id == "missing"));
    }

    #[test]
    fn test_correction_then_reanalyze_replaces_findings() {
        let mut session = session_with(vec![
            shoulder(AnatomicalLabel::LeftShoulder, "pose_left_shoulder", 100.0, 120.0),
            shoulder(AnatomicalLabel::RightShoulder, "pose_right_shoulder", 200.0, 100.0),
        ]);
        let thresholds = AnalysisThresholds::default();
        session.reanalyze(&thresholds);
        assert_eq!(session.findings[0].metric, MetricKey::ShoulderTilt);
        assert_eq!(session.findings[0].status, FindingStatus::Bad);

        session
            .update_position("pose_left_shoulder", 100.0, 100.0)
            .unwrap();
        session.reanalyze(&thresholds);
        assert_eq!(session.findings[0].status, FindingStatus::Good);
    }
}
