pub mod catalog;
pub mod cli;
pub mod clock;
pub mod config;
pub mod engine;
pub mod ledger;
pub mod manage;
pub mod observer;
pub mod presenter;

pub use catalog::{Catalog, CatalogError};
pub use engine::{EngineError, Outcome, RecommendationEngine, SkipReason};
pub use keynudge_common as common;
pub use ledger::{LearnedEntry, LearnedLedger, LedgerError};
pub use presenter::PresentationSink;
