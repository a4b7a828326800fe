//! The recommendation engine: turns one interaction into zero or one
//! shortcut suggestion.
//!
//! Pipeline, in order:
//! 1. cooldown gate
//! 2. catalog lookup by event tag
//! 3. context filter
//! 4. learned exclusion
//! 5. session budget
//! 6. selection
//! 7. commit state (before presenting)
//! 8. present, and learn on acknowledge
//!
//! Steps 1-7 run under one lock so concurrent events cannot both pass the
//! gates. The lock is released before the presentation sink is awaited.

pub mod filter;
pub mod selection;
pub mod state;

use crate::catalog::Catalog;
use crate::clock::{Clock, RandomSource, SystemClock, ThreadRandom};
use crate::config::RecommendationConfig;
use crate::ledger::{LearnedLedger, LedgerError};
use crate::observer::{EngineObserver, TracingObserver};
use crate::presenter::PresentationSink;
use keynudge_common::{EventContext, InteractionEvent, Response, ShortcutRecord, Suggestion};
use std::sync::{Arc, Mutex, PoisonError};

pub use filter::{EditorShortcutGroup, filter_candidates};
pub use state::EngineState;

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),
}

/// Why an interaction produced no suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Cooldown,
    NoShortcuts,
    FilteredOut,
    AllLearned,
    SessionLimit,
}

/// Narrowing stages reported to the observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    ContextFilter,
    LearnedExclusion,
    SessionBudget,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Skipped(SkipReason),
    Presented {
        suggestion: Suggestion,
        response: Option<Response>,
        learned: bool,
    },
}

impl Outcome {
    pub fn suggestion(&self) -> Option<&Suggestion> {
        match self {
            Outcome::Presented { suggestion, .. } => Some(suggestion),
            Outcome::Skipped(_) => None,
        }
    }

    pub fn skip_reason(&self) -> Option<SkipReason> {
        match self {
            Outcome::Skipped(reason) => Some(*reason),
            Outcome::Presented { .. } => None,
        }
    }
}

struct EngineCore {
    state: EngineState,
    rng: Box<dyn RandomSource>,
}

pub struct RecommendationEngine {
    catalog: Arc<Catalog>,
    ledger: Arc<LearnedLedger>,
    sink: Arc<dyn PresentationSink>,
    clock: Arc<dyn Clock>,
    observer: Arc<dyn EngineObserver>,
    config: RecommendationConfig,
    core: Mutex<EngineCore>,
}

impl RecommendationEngine {
    pub fn new(
        catalog: Arc<Catalog>,
        ledger: Arc<LearnedLedger>,
        sink: Arc<dyn PresentationSink>,
        mut config: RecommendationConfig,
    ) -> Self {
        config.first_candidate_bias = if config.first_candidate_bias.is_nan() {
            RecommendationConfig::default().first_candidate_bias
        } else {
            config.first_candidate_bias.clamp(0.0, 1.0)
        };
        Self {
            catalog,
            ledger,
            sink,
            clock: Arc::new(SystemClock),
            observer: Arc::new(TracingObserver),
            config,
            core: Mutex::new(EngineCore {
                state: EngineState::new(),
                rng: Box::new(ThreadRandom),
            }),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_random(self, rng: Box<dyn RandomSource>) -> Self {
        self.lock_core().rng = rng;
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn EngineObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn ledger(&self) -> &Arc<LearnedLedger> {
        &self.ledger
    }

    pub fn config(&self) -> &RecommendationConfig {
        &self.config
    }

    /// Copy of the current session state.
    pub fn state(&self) -> EngineState {
        self.lock_core().state.clone()
    }

    /// Handle one interaction. Presents at most one suggestion.
    ///
    /// The only error is a failure to persist an acknowledged shortcut.
    pub async fn on_interaction(&self, event: &InteractionEvent) -> Result<Outcome, EngineError> {
        let tag = event.tag();

        let record = match self.decide(&event.context, tag) {
            Ok(record) => record,
            Err(reason) => {
                let outcome = Outcome::Skipped(reason);
                self.observer.on_outcome(tag, &outcome);
                return Ok(outcome);
            }
        };

        let suggestion = Suggestion::from_record(record);
        let response = self.sink.present(&suggestion).await;

        let learned = if response == Some(Response::Acknowledge) {
            self.ledger.mark_learned(&suggestion.identity).await?;
            true
        } else {
            false
        };

        let outcome = Outcome::Presented {
            suggestion,
            response,
            learned,
        };
        self.observer.on_outcome(tag, &outcome);
        Ok(outcome)
    }

    /// Steps 1-7. State is committed before this returns a record.
    fn decide(&self, context: &EventContext, tag: &str) -> Result<&ShortcutRecord, SkipReason> {
        let mut core = self.lock_core();
        let core = &mut *core;
        let now = self.clock.now();

        if core.state.in_cooldown(now, self.config.cooldown()) {
            return Err(SkipReason::Cooldown);
        }

        let shortcuts = self.catalog.shortcuts_for_type(tag);
        if shortcuts.is_empty() {
            return Err(SkipReason::NoShortcuts);
        }

        let mut candidates =
            filter_candidates(context, shortcuts, self.config.editor_change_policy);
        self.observer
            .on_stage(tag, Stage::ContextFilter, shortcuts.len(), candidates.len());
        if candidates.is_empty() {
            return Err(SkipReason::FilteredOut);
        }

        let before = candidates.len();
        candidates.retain(|record| !self.ledger.is_learned(&record.identity()));
        self.observer
            .on_stage(tag, Stage::LearnedExclusion, before, candidates.len());
        if candidates.is_empty() {
            return Err(SkipReason::AllLearned);
        }

        if core.state.session_limit_reached(self.config.session_limit) {
            let before = candidates.len();
            let shown = &core.state.shown_this_session;
            candidates.retain(|record| shown.contains(&record.identity()));
            self.observer
                .on_stage(tag, Stage::SessionBudget, before, candidates.len());
            if candidates.is_empty() {
                return Err(SkipReason::SessionLimit);
            }
        }

        let chosen = selection::select(
            context,
            &candidates,
            core.rng.as_mut(),
            self.config.first_candidate_bias,
        );

        core.state.commit(now, chosen.identity());
        Ok(chosen)
    }

    fn lock_core(&self) -> std::sync::MutexGuard<'_, EngineCore> {
        self.core.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
