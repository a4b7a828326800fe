//! Context filters: which catalog candidates are plausibly relevant to the
//! concrete event that just happened.

use crate::config::EditorChangePolicy;
use keynudge_common::ShortcutRecord;
use keynudge_common::event::{EditorChangeContext, EditorInfo, EventContext};
use regex::Regex;
use std::sync::LazyLock;

/// Shortcut groups that editor-change rules are keyed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorShortcutGroup {
    SplitEditor,
    NewFile,
    OpenFile,
    Navigation,
    MarkdownPreview,
}

static SPLIT_EDITOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(ctrl|cmd)\+\\$").unwrap());
static NEW_FILE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(ctrl|cmd)\+n$").unwrap());
static OPEN_FILE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(ctrl|cmd)\+[op]$").unwrap());
static NAVIGATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^((ctrl|cmd)\+(shift\+)?(tab|-)|alt\+(left|right)|(ctrl|cmd)\+page(up|down))$",
    )
    .unwrap()
});
static MARKDOWN_PREVIEW_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(ctrl|cmd)\+(shift\+v|k v)$").unwrap());

impl EditorShortcutGroup {
    /// The group a shortcut belongs to, judged by its keys. Groups are tried
    /// in declaration order and the first match wins.
    pub fn classify(keys: &str) -> Option<Self> {
        let keys = keys.trim();
        [
            (Self::SplitEditor, &*SPLIT_EDITOR_RE),
            (Self::NewFile, &*NEW_FILE_RE),
            (Self::OpenFile, &*OPEN_FILE_RE),
            (Self::Navigation, &*NAVIGATION_RE),
            (Self::MarkdownPreview, &*MARKDOWN_PREVIEW_RE),
        ]
        .into_iter()
        .find(|(_, re)| re.is_match(keys))
        .map(|(group, _)| group)
    }
}

/// Narrow `candidates` to those relevant to `context`, keeping source order.
pub fn filter_candidates<'a>(
    context: &EventContext,
    candidates: &'a [ShortcutRecord],
    policy: EditorChangePolicy,
) -> Vec<&'a ShortcutRecord> {
    let all = || candidates.iter().collect::<Vec<_>>();

    match context {
        EventContext::EditorChange(ctx) => match &ctx.editor {
            Some(editor) => candidates
                .iter()
                .filter(|record| editor_change_keeps(policy, ctx, editor, record))
                .collect(),
            None => Vec::new(),
        },
        EventContext::TerminalChange(ctx) => {
            if ctx.terminal.is_some() {
                all()
            } else {
                Vec::new()
            }
        }
        EventContext::FileSave(ctx) | EventContext::DocumentClose(ctx) => {
            if ctx.document.is_some() {
                all()
            } else {
                Vec::new()
            }
        }
        EventContext::SelectionChange(ctx) => {
            if ctx.editor.is_some() && !ctx.selections.is_empty() {
                all()
            } else {
                Vec::new()
            }
        }
        EventContext::TextChange(ctx) => {
            if ctx.content_changes.is_empty() {
                Vec::new()
            } else {
                all()
            }
        }
        EventContext::WindowStateChange(ctx) => {
            if ctx.state.is_some() {
                all()
            } else {
                Vec::new()
            }
        }
        EventContext::CommandExecution(_)
        | EventContext::PanelVisibilityChange(_)
        | EventContext::IntelliSense
        | EventContext::PeekDefinition
        | EventContext::QuickFix
        | EventContext::References
        | EventContext::DebugStart
        | EventContext::DebugStop
        | EventContext::TipOfTheDay
        | EventContext::Unknown { .. } => all(),
    }
}

fn editor_change_keeps(
    policy: EditorChangePolicy,
    ctx: &EditorChangeContext,
    editor: &EditorInfo,
    record: &ShortcutRecord,
) -> bool {
    let group = EditorShortcutGroup::classify(&record.shortcut_keys);
    match policy {
        EditorChangePolicy::GroupRules => match group {
            Some(EditorShortcutGroup::SplitEditor) => ctx.tab_group_count_increased,
            Some(EditorShortcutGroup::NewFile) => editor.is_untitled && ctx.tab_count_increased,
            Some(EditorShortcutGroup::OpenFile) => !editor.is_untitled && ctx.tab_count_increased,
            Some(EditorShortcutGroup::Navigation) => ctx.tab_count_unchanged,
            Some(EditorShortcutGroup::MarkdownPreview) => editor.is_markdown(),
            None => true,
        },
        EditorChangePolicy::MarkdownSplit => {
            let is_preview = group == Some(EditorShortcutGroup::MarkdownPreview);
            is_preview == editor.is_markdown()
        }
    }
}
