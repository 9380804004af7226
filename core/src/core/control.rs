// cartflow/src/core/control.rs

//! Flow signals returned by step handlers and the outcome of a whole run.

/// Returned by every step handler to tell the runner what to do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineControl {
  /// Keep going: remaining handlers of this step, then the next step.
  Continue,
  /// Halt the run here. Nothing after this handler executes.
  ///
  /// Cart operations use this for legitimate early exits, e.g. clearing a
  /// cart that is already empty or refreshing with nobody signed in.
  Stop,
}

/// How a run ended when no handler failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineResult {
  /// Every step that was not skipped ran to completion.
  Completed,
  /// A handler returned [`PipelineControl::Stop`].
  Stopped,
}

impl PipelineResult {
  pub fn is_completed(self) -> bool {
    matches!(self, PipelineResult::Completed)
  }
}
