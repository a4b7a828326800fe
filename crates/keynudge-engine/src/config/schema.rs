use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KeynudgeConfig {
    #[serde(default)]
    pub recommendations: RecommendationConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

/// How editor-change events narrow their candidates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditorChangePolicy {
    /// Per shortcut-group rules keyed on the shortcut keys.
    #[default]
    GroupRules,
    /// Markdown files get only markdown-preview shortcuts, everything else
    /// gets everything but those.
    MarkdownSplit,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationConfig {
    #[serde(default = "default_cooldown_ms")]
    pub cooldown_ms: u64,
    #[serde(default = "default_session_limit")]
    pub session_limit: usize,
    #[serde(default)]
    pub editor_change_policy: EditorChangePolicy,
    /// Probability of suggesting the first editor-change candidate rather
    /// than a random one.
    #[serde(default = "default_first_candidate_bias")]
    pub first_candidate_bias: f64,
    #[serde(default = "default_tip_on_startup")]
    pub tip_on_startup: bool,
}

impl RecommendationConfig {
    pub fn cooldown(&self) -> Duration {
        Duration::from_millis(self.cooldown_ms)
    }
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self {
            cooldown_ms: default_cooldown_ms(),
            session_limit: default_session_limit(),
            editor_change_policy: EditorChangePolicy::default(),
            first_candidate_bias: default_first_candidate_bias(),
            tip_on_startup: default_tip_on_startup(),
        }
    }
}

fn default_cooldown_ms() -> u64 {
    5 * 60 * 1000
}

fn default_session_limit() -> usize {
    3
}

fn default_first_candidate_bias() -> f64 {
    0.75
}

fn default_tip_on_startup() -> bool {
    true
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// `None` uses the bundled catalog.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub ledger_path: Option<PathBuf>,
}

impl StorageConfig {
    pub fn ledger_path(&self) -> PathBuf {
        self.ledger_path
            .clone()
            .unwrap_or_else(default_ledger_path)
    }
}

pub fn default_ledger_path() -> PathBuf {
    config_dir().join("learned.yaml")
}

/// `~/.keynudge`, or `./.keynudge` when there is no home directory.
pub fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".keynudge")
}
