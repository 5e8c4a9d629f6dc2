use tracing::debug;

use crate::config::config::MarkerColorConfig;
use crate::utils::coordinate::PixelCandidate;
use crate::utils::image::ImageFrame;

/// Scans raw RGBA data for pixels matching the physical marker color.
#[derive(Debug, Clone, Default)]
pub struct ColorMarkerExtractor {
    config: MarkerColorConfig,
}

impl ColorMarkerExtractor {
    pub fn new(config: MarkerColorConfig) -> Self {
        ColorMarkerExtractor { config }
    }

    /// extract returns every sampled pixel satisfying the red-marker
    /// threshold, in row-major scan order.
    ///
    /// The scan subsamples by `scan_step` in each axis as a recall/cost
    /// tradeoff. An image with no matching pixels yields an empty set; this
    /// never fails.
    ///
    /// # Arguments
    /// * `frame` - RGBA frame supplied by the image surface
    ///
    /// # Returns
    /// * `Vec<PixelCandidate>`
    pub fn extract(&self, frame: &ImageFrame) -> Vec<PixelCandidate> {
        let step = self.config.scan_step.max(1);
        let mut candidates: Vec<PixelCandidate> = Vec::new();

        for y in (0..frame.height()).step_by(step as usize) {
            for x in (0..frame.width()).step_by(step as usize) {
                let Some([r, g, b, _]) = frame.rgba_at(x, y) else {
                    continue;
                };
                if r > self.config.min_red
                    && g < self.config.max_green
                    && b < self.config.max_blue
                {
                    candidates.push(PixelCandidate { x, y });
                }
            }
        }

        debug!(count = candidates.len(), "marker color extraction complete");
        candidates
    }
}
