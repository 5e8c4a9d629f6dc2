use thiserror::Error;

/// Failures the analysis core surfaces to the caller.
///
/// Missing landmarks are never an error: the analyzer reports them as
/// `FindingStatus::Unknown`. Pose provider failures are swallowed by the
/// pipeline and degrade to a color-marker-only pass.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("no image loaded for analysis")]
    NoImage,

    #[error("analysis pass superseded by a newer session")]
    StaleAnalysis,

    #[error("unknown landmark id: {0}")]
    UnknownLandmark(String),
}
