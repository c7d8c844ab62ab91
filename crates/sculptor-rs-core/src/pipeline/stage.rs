//! Run stages and the per-run progress tracker.

use log::{debug, error};
use std::fmt;
use uuid::Uuid;

/// Stage of a single pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineStage {
    Enhancing,
    GeneratingImage,
    GeneratingModel,
    Persisting,
    Done,
    Failed,
}

impl PipelineStage {
    /// `Done` and `Failed` end a run.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }

    /// Stage that follows on success, `None` once terminal.
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Enhancing => Some(Self::GeneratingImage),
            Self::GeneratingImage => Some(Self::GeneratingModel),
            Self::GeneratingModel => Some(Self::Persisting),
            Self::Persisting => Some(Self::Done),
            Self::Done | Self::Failed => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Enhancing => "enhancing",
            Self::GeneratingImage => "generating_image",
            Self::GeneratingModel => "generating_model",
            Self::Persisting => "persisting",
            Self::Done => "done",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tracks one run through its stages and logs each transition.
#[derive(Debug)]
pub(crate) struct RunTracker {
    run_id: Uuid,
    stage: PipelineStage,
}

impl RunTracker {
    pub(crate) fn start(run_id: Uuid) -> Self {
        debug!("pipeline run started (run_id={run_id})");
        Self {
            run_id,
            stage: PipelineStage::Enhancing,
        }
    }

    pub(crate) fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub(crate) fn stage(&self) -> PipelineStage {
        self.stage
    }

    /// Move to the next stage in order; no-op once terminal.
    pub(crate) fn advance(&mut self) {
        if let Some(next) = self.stage.next() {
            debug!(
                "pipeline stage (run_id={}, from={}, to={})",
                self.run_id, self.stage, next
            );
            self.stage = next;
        }
    }

    /// Terminate the run from its current stage.
    pub(crate) fn fail(&mut self, reason: &dyn fmt::Display) {
        if self.stage.is_terminal() {
            return;
        }
        error!(
            "pipeline run failed (run_id={}, stage={}): {}",
            self.run_id, self.stage, reason
        );
        self.stage = PipelineStage::Failed;
    }
}
