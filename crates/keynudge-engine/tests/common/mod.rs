#![allow(dead_code)]

use async_trait::async_trait;
use keynudge_engine::catalog::Catalog;
use keynudge_engine::clock::{ManualClock, RandomSource};
use keynudge_engine::common::{Response, ShortcutRecord, Suggestion};
use keynudge_engine::config::RecommendationConfig;
use keynudge_engine::engine::RecommendationEngine;
use keynudge_engine::ledger::{LearnedLedger, MemoryLedgerStore};
use keynudge_engine::presenter::PresentationSink;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Records every suggestion and answers with a fixed response.
#[derive(Default)]
pub struct RecordingSink {
    pub response: Option<Response>,
    pub presented: Mutex<Vec<Suggestion>>,
}

impl RecordingSink {
    pub fn answering(response: Option<Response>) -> Arc<Self> {
        Arc::new(Self {
            response,
            presented: Mutex::new(Vec::new()),
        })
    }

    pub fn presented(&self) -> Vec<Suggestion> {
        self.presented.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.presented.lock().unwrap().len()
    }
}

#[async_trait]
impl PresentationSink for RecordingSink {
    async fn present(&self, suggestion: &Suggestion) -> Option<Response> {
        self.presented.lock().unwrap().push(suggestion.clone());
        self.response
    }
}

/// Returns queued answers, then index 0 / `false` once exhausted.
#[derive(Default)]
pub struct ScriptedRandom {
    pub picks: VecDeque<usize>,
    pub chances: VecDeque<bool>,
}

impl ScriptedRandom {
    pub fn new(picks: &[usize], chances: &[bool]) -> Box<Self> {
        Box::new(Self {
            picks: picks.iter().copied().collect(),
            chances: chances.iter().copied().collect(),
        })
    }
}

impl RandomSource for ScriptedRandom {
    fn pick_index(&mut self, len: usize) -> usize {
        self.picks.pop_front().unwrap_or(0) % len
    }

    fn chance(&mut self, _p: f64) -> bool {
        self.chances.pop_front().unwrap_or(false)
    }
}

pub fn config(cooldown_secs: u64, session_limit: usize) -> RecommendationConfig {
    RecommendationConfig {
        cooldown_ms: cooldown_secs * 1000,
        session_limit,
        ..Default::default()
    }
}

pub struct Harness {
    pub engine: RecommendationEngine,
    pub clock: ManualClock,
    pub sink: Arc<RecordingSink>,
    pub ledger: Arc<LearnedLedger>,
    pub store: MemoryLedgerStore,
}

impl Harness {
    pub fn advance(&self, secs: u64) {
        self.clock.advance(Duration::from_secs(secs));
    }
}

pub async fn harness(
    records: Vec<ShortcutRecord>,
    config: RecommendationConfig,
    response: Option<Response>,
    rng: Box<dyn RandomSource>,
) -> Harness {
    let store = MemoryLedgerStore::new();
    let ledger = Arc::new(
        LearnedLedger::open(Box::new(store.clone()))
            .await
            .expect("memory ledger opens"),
    );
    let clock = ManualClock::default();
    let sink = RecordingSink::answering(response);
    let engine = RecommendationEngine::new(
        Arc::new(Catalog::from_records(records)),
        ledger.clone(),
        sink.clone(),
        config,
    )
    .with_clock(Arc::new(clock.clone()))
    .with_random(rng);

    Harness {
        engine,
        clock,
        sink,
        ledger,
        store,
    }
}
