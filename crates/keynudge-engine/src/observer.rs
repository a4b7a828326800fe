//! Optional diagnostics hook for the decision pipeline.

use crate::engine::{Outcome, Stage};
use tracing::{debug, info};

/// Receives per-stage candidate counts and final outcomes. Both methods
/// default to doing nothing.
pub trait EngineObserver: Send + Sync {
    fn on_stage(&self, _tag: &str, _stage: Stage, _before: usize, _after: usize) {}

    fn on_outcome(&self, _tag: &str, _outcome: &Outcome) {}
}

/// Logs every stage and outcome through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl EngineObserver for TracingObserver {
    fn on_stage(&self, tag: &str, stage: Stage, before: usize, after: usize) {
        debug!(event = tag, ?stage, before, after, "Narrowed candidates");
    }

    fn on_outcome(&self, tag: &str, outcome: &Outcome) {
        match outcome {
            Outcome::Skipped(reason) => debug!(event = tag, ?reason, "No suggestion"),
            Outcome::Presented {
                suggestion,
                response,
                learned,
            } => info!(
                event = tag,
                shortcut = %suggestion.identity,
                ?response,
                learned,
                "Presented suggestion"
            ),
        }
    }
}
