use keynudge_common::ShortcutIdentity;
use std::collections::HashSet;
use std::time::{Duration, SystemTime};

/// Mutable state for one engine over one process run.
#[derive(Debug, Default, Clone)]
pub struct EngineState {
    /// `None` until the first suggestion, which behaves like the epoch.
    pub last_recommendation: Option<SystemTime>,
    pub shown_this_session: HashSet<ShortcutIdentity>,
}

impl EngineState {
    pub fn new() -> Self {
        Self::default()
    }

    /// A clock that went backwards counts as no time elapsed.
    pub fn in_cooldown(&self, now: SystemTime, cooldown: Duration) -> bool {
        match self.last_recommendation {
            Some(last) => now.duration_since(last).unwrap_or(Duration::ZERO) < cooldown,
            None => false,
        }
    }

    pub fn session_limit_reached(&self, limit: usize) -> bool {
        self.shown_this_session.len() >= limit
    }

    pub fn commit(&mut self, now: SystemTime, identity: ShortcutIdentity) {
        self.last_recommendation = Some(now);
        self.shown_this_session.insert(identity);
    }
}
