use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{debug, warn};

use crate::config::config::{
    AnalysisThresholds, ClusteringConfig, FusionConfig, MarkerColorConfig,
};
use crate::errors::AnalysisError;
use crate::helper::landmark_helper::{LandmarkFusion, ViewType};
use crate::modules::clustering::SpatialClusterer;
use crate::modules::marker_extraction::ColorMarkerExtractor;
use crate::modules::pose_client::{PoseProvider, PoseRecord};
use crate::pipeline::analyzer::PostureAnalyzer;
use crate::pipeline::session::AnalysisSession;
use crate::utils::image::ImageFrame;

/// End-to-end posture analysis pipeline: marker extraction, clustering, pose
/// fusion and rule evaluation, in that order, for one frame at a time.
///
/// The caller is responsible for serializing `analyze` calls; the pipeline
/// itself holds no mutable state beyond the generation counter used to
/// discard stale provider results after a `reset`.
#[derive(Debug)]
pub struct PosturePipeline<P> {
    pose_provider: P,
    extractor: ColorMarkerExtractor,
    clusterer: SpatialClusterer,
    fusion: LandmarkFusion,
    thresholds: AnalysisThresholds,
    generation: AtomicU64,
}

impl<P: PoseProvider> PosturePipeline<P> {
    /// new initializes the pipeline with default tuning for every stage.
    pub fn new(pose_provider: P) -> Self {
        Self::with_config(
            pose_provider,
            MarkerColorConfig::default(),
            ClusteringConfig::default(),
            FusionConfig::default(),
            AnalysisThresholds::default(),
        )
    }

    pub fn with_config(
        pose_provider: P,
        marker_config: MarkerColorConfig,
        clustering_config: ClusteringConfig,
        fusion_config: FusionConfig,
        thresholds: AnalysisThresholds,
    ) -> Self {
        PosturePipeline {
            pose_provider,
            extractor: ColorMarkerExtractor::new(marker_config),
            clusterer: SpatialClusterer::new(clustering_config),
            fusion: LandmarkFusion::new(fusion_config),
            thresholds,
            generation: AtomicU64::new(0),
        }
    }

    /// reset invalidates any in-flight analysis pass. Call it when a new
    /// image is loaded or the capture wizard restarts; a pass whose pose
    /// estimation call is still outstanding will then discard its result.
    pub fn reset(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    pub fn thresholds(&self) -> &AnalysisThresholds {
        &self.thresholds
    }

    /// analyze runs one full analysis pass over the frame.
    ///
    /// The pose provider is awaited exactly once; a provider error degrades
    /// to a color-marker-only pass. Partial or empty landmark sets flow
    /// through to the analyzer, which grades missing inputs as `Unknown`.
    ///
    /// # Arguments
    /// * `frame` - RGBA frame from the image surface
    /// * `view` - active view type for this pass
    ///
    /// # Returns
    /// * `Result<AnalysisSession, AnalysisError>` - `NoImage` for an empty
    ///   frame, `StaleAnalysis` when `reset` superseded this pass
    pub async fn analyze(
        &self,
        frame: &ImageFrame,
        view: ViewType,
    ) -> Result<AnalysisSession, AnalysisError> {
        if frame.is_empty() {
            return Err(AnalysisError::NoImage);
        }
        let generation = self.generation.load(Ordering::SeqCst);

        let candidates = self.extractor.extract(frame);
        let clusters = self.clusterer.cluster(&candidates);

        let pose: Option<PoseRecord> = match self.pose_provider.estimate_pose(frame).await {
            Ok(pose) => pose,
            Err(e) => {
                warn!(error = %e, "pose provider failed; continuing with color markers only");
                None
            }
        };

        if self.generation.load(Ordering::SeqCst) != generation {
            debug!("discarding stale analysis pass");
            return Err(AnalysisError::StaleAnalysis);
        }

        let landmarks = self.fusion.fuse(view, &clusters, pose.as_ref());
        let analyzer = PostureAnalyzer::new(self.thresholds.clone());
        let findings = analyzer.analyze(view, &landmarks, frame.width());

        debug!(
            view = %view,
            landmarks = landmarks.len(),
            findings = findings.len(),
            "analysis pass complete"
        );

        Ok(AnalysisSession {
            view_type: view,
            image_width: frame.width(),
            image_height: frame.height(),
            generation,
            landmarks,
            findings,
        })
    }
}
