use crate::clock::RandomSource;
use keynudge_common::event::EventContext;
use keynudge_common::ShortcutRecord;
use regex::Regex;
use std::sync::LazyLock;

static SWITCH_WINDOW_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bswitch(es|ing)?\b.*\bwindows?\b").unwrap());
static OPEN_TERMINAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(open|focus)\b.*\bterminal\b").unwrap());

/// Pick one candidate. `candidates` must not be empty.
pub fn select<'a>(
    context: &EventContext,
    candidates: &[&'a ShortcutRecord],
    rng: &mut dyn RandomSource,
    first_candidate_bias: f64,
) -> &'a ShortcutRecord {
    let preferred = match context {
        EventContext::WindowStateChange(_) => canonical(candidates, &SWITCH_WINDOW_RE),
        EventContext::TerminalChange(_) => canonical(candidates, &OPEN_TERMINAL_RE),
        EventContext::EditorChange(_) if rng.chance(first_candidate_bias) => {
            candidates.first().copied()
        }
        _ => None,
    };

    // Wrap so a source that ignores `len` cannot index out of bounds.
    preferred.unwrap_or_else(|| candidates[rng.pick_index(candidates.len()) % candidates.len()])
}

/// First candidate whose description names the canonical action.
fn canonical<'a>(candidates: &[&'a ShortcutRecord], re: &Regex) -> Option<&'a ShortcutRecord> {
    candidates
        .iter()
        .copied()
        .find(|record| re.is_match(&record.action_description))
}
