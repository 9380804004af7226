// cartflow/src/pipeline/execution.rs

//! `Pipeline::run()`: walks the steps and their handler phases.

use crate::core::context_data::ContextData;
use crate::core::control::{PipelineControl, PipelineResult};
use crate::error::FlowError;
use crate::pipeline::definition::{Phase, Pipeline};
use tracing::{event, info_span, instrument, Instrument, Level};

impl<TData, Err> Pipeline<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  /// Runs every step against `ctx_data`.
  ///
  /// Stops at the first handler that returns `Stop` (yielding
  /// [`PipelineResult::Stopped`]) or an error (returned as is). A required
  /// step with no handlers at all fails with [`FlowError::HandlerMissing`].
  #[instrument(
    name = "Pipeline::run",
    skip_all,
    fields(
      pipeline_data_type = %std::any::type_name::<TData>(),
      num_steps = self.steps.len(),
    ),
    err(Display)
  )]
  pub async fn run(&self, ctx_data: ContextData<TData>) -> Result<PipelineResult, Err> {
    event!(Level::DEBUG, "Pipeline execution starting.");

    for (step_index, step_def) in self.steps.iter().enumerate() {
      let step_name = step_def.name.as_str();

      if step_def.should_skip(&ctx_data) {
        event!(Level::DEBUG, step_name, "Step skipped by its skip condition.");
        continue;
      }

      if !self.has_any_handler(step_name) {
        if step_def.optional {
          event!(Level::TRACE, step_name, "Optional step has no handlers, skipping.");
          continue;
        }
        event!(Level::ERROR, step_name, "Required step has no handlers.");
        return Err(Err::from(FlowError::HandlerMissing {
          step_name: step_def.name.clone(),
        }));
      }

      let step_span = info_span!("pipeline_step", step_name, step_index, optional = step_def.optional);
      let control = self
        .run_step(step_name, &ctx_data)
        .instrument(step_span)
        .await?;

      if control == PipelineControl::Stop {
        event!(Level::DEBUG, step_name, "Pipeline stopped by a handler.");
        return Ok(PipelineResult::Stopped);
      }
    }

    event!(Level::DEBUG, "Pipeline execution completed.");
    Ok(PipelineResult::Completed)
  }

  async fn run_step(&self, step_name: &str, ctx_data: &ContextData<TData>) -> Result<PipelineControl, Err> {
    for phase in Phase::ALL {
      for (handler_index, handler_fn) in self.handlers_for(step_name, phase).iter().enumerate() {
        match handler_fn(ctx_data.clone()).await {
          Ok(PipelineControl::Continue) => {}
          Ok(PipelineControl::Stop) => return Ok(PipelineControl::Stop),
          Err(e) => {
            event!(
              Level::WARN,
              phase = phase.as_str(),
              handler_index,
              error = %e,
              "Step handler failed."
            );
            return Err(e);
          }
        }
      }
    }
    Ok(PipelineControl::Continue)
  }
}
