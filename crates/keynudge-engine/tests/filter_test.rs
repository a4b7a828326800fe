use keynudge_engine::common::event::{
    CommandContext, ContentChange, DocumentContext, DocumentInfo, EditorChangeContext,
    EditorInfo, SelectionChangeContext, SelectionRange, TerminalContext, TerminalInfo,
    TextChangeContext, WindowState, WindowStateContext,
};
use keynudge_engine::common::{EventContext, ShortcutRecord};
use keynudge_engine::config::EditorChangePolicy;
use keynudge_engine::engine::filter_candidates;

fn editor_records() -> Vec<ShortcutRecord> {
    vec![
        ShortcutRecord::new("editorChange", "Ctrl+\\", "split the editor"),
        ShortcutRecord::new("editorChange", "Ctrl+N", "new file"),
        ShortcutRecord::new("editorChange", "Ctrl+O", "open file"),
        ShortcutRecord::new("editorChange", "Ctrl+Tab", "cycle editors"),
        ShortcutRecord::new("editorChange", "Ctrl+Shift+V", "open the markdown preview"),
        ShortcutRecord::new("editorChange", "Ctrl+1", "focus the first group"),
    ]
}

fn editor_ctx(editor: EditorInfo, f: impl FnOnce(&mut EditorChangeContext)) -> EventContext {
    let mut ctx = EditorChangeContext {
        editor: Some(editor),
        ..Default::default()
    };
    f(&mut ctx);
    EventContext::EditorChange(ctx)
}

fn untitled() -> EditorInfo {
    EditorInfo {
        is_untitled: true,
        ..Default::default()
    }
}

fn rust_file() -> EditorInfo {
    EditorInfo {
        language_id: Some("rust".into()),
        file_name: Some("main.rs".into()),
        is_untitled: false,
    }
}

fn markdown_file() -> EditorInfo {
    EditorInfo {
        language_id: None,
        file_name: Some("README.md".into()),
        is_untitled: false,
    }
}

fn keys(kept: &[&ShortcutRecord]) -> Vec<String> {
    kept.iter().map(|r| r.shortcut_keys.clone()).collect()
}

#[test]
fn test_new_file_requires_untitled_and_new_tab() {
    let records = editor_records();

    let ctx = editor_ctx(untitled(), |c| c.tab_count_increased = true);
    let kept = keys(&filter_candidates(&ctx, &records, EditorChangePolicy::GroupRules));
    assert!(kept.contains(&"Ctrl+N".to_string()));
    assert!(!kept.contains(&"Ctrl+O".to_string()));

    let ctx = editor_ctx(rust_file(), |c| c.tab_count_increased = true);
    let kept = keys(&filter_candidates(&ctx, &records, EditorChangePolicy::GroupRules));
    assert!(!kept.contains(&"Ctrl+N".to_string()));
    assert!(kept.contains(&"Ctrl+O".to_string()));
}

#[test]
fn test_group_rules_full_table() {
    let records = editor_records();

    // Nothing changed in the tab strip.
    let ctx = editor_ctx(rust_file(), |_| {});
    let kept = keys(&filter_candidates(&ctx, &records, EditorChangePolicy::GroupRules));
    assert_eq!(kept, vec!["Ctrl+1"]);

    let ctx = editor_ctx(rust_file(), |c| {
        c.tab_group_count_increased = true;
        c.tab_count_unchanged = true;
    });
    let kept = keys(&filter_candidates(&ctx, &records, EditorChangePolicy::GroupRules));
    assert_eq!(kept, vec!["Ctrl+\\", "Ctrl+Tab", "Ctrl+1"]);

    let ctx = editor_ctx(markdown_file(), |c| c.tab_count_unchanged = true);
    let kept = keys(&filter_candidates(&ctx, &records, EditorChangePolicy::GroupRules));
    assert_eq!(kept, vec!["Ctrl+Tab", "Ctrl+Shift+V", "Ctrl+1"]);
}

#[test]
fn test_markdown_by_language_id() {
    let records = editor_records();
    let md = EditorInfo {
        language_id: Some("markdown".into()),
        file_name: Some("notes.txt".into()),
        is_untitled: false,
    };
    let ctx = editor_ctx(md, |_| {});
    let kept = keys(&filter_candidates(&ctx, &records, EditorChangePolicy::GroupRules));
    assert!(kept.contains(&"Ctrl+Shift+V".to_string()));
}

#[test]
fn test_markdown_split_policy() {
    let records = editor_records();

    let ctx = editor_ctx(markdown_file(), |_| {});
    let kept = keys(&filter_candidates(&ctx, &records, EditorChangePolicy::MarkdownSplit));
    assert_eq!(kept, vec!["Ctrl+Shift+V"]);

    let ctx = editor_ctx(rust_file(), |_| {});
    let kept = keys(&filter_candidates(&ctx, &records, EditorChangePolicy::MarkdownSplit));
    assert_eq!(
        kept,
        vec!["Ctrl+\\", "Ctrl+N", "Ctrl+O", "Ctrl+Tab", "Ctrl+1"]
    );
}

#[test]
fn test_editor_change_without_editor_keeps_nothing() {
    let records = editor_records();
    let ctx = EventContext::EditorChange(EditorChangeContext {
        editor: None,
        tab_count_increased: true,
        ..Default::default()
    });
    for policy in [EditorChangePolicy::GroupRules, EditorChangePolicy::MarkdownSplit] {
        assert!(filter_candidates(&ctx, &records, policy).is_empty());
    }
}

fn one(kind: &str) -> Vec<ShortcutRecord> {
    vec![ShortcutRecord::new(kind, "F1", "do something")]
}

fn passes(ctx: EventContext, kind: &str) -> bool {
    !filter_candidates(&ctx, &one(kind), EditorChangePolicy::GroupRules).is_empty()
}

#[test]
fn test_presence_filters() {
    assert!(!passes(
        EventContext::TerminalChange(TerminalContext::default()),
        "terminalChange"
    ));
    assert!(passes(
        EventContext::TerminalChange(TerminalContext {
            terminal: Some(TerminalInfo::default())
        }),
        "terminalChange"
    ));

    let doc = DocumentContext {
        document: Some(DocumentInfo::default()),
    };
    assert!(passes(EventContext::FileSave(doc.clone()), "fileSave"));
    assert!(passes(EventContext::DocumentClose(doc), "documentClose"));
    assert!(!passes(
        EventContext::DocumentClose(DocumentContext::default()),
        "documentClose"
    ));

    assert!(!passes(
        EventContext::WindowStateChange(WindowStateContext::default()),
        "windowStateChange"
    ));
    assert!(passes(
        EventContext::WindowStateChange(WindowStateContext {
            state: Some(WindowState { focused: false })
        }),
        "windowStateChange"
    ));
}

#[test]
fn test_selection_needs_editor_and_selection() {
    let with_both = SelectionChangeContext {
        editor: Some(EditorInfo::default()),
        selections: vec![SelectionRange { start: 0, end: 4 }],
    };
    assert!(passes(
        EventContext::SelectionChange(with_both.clone()),
        "selectionChange"
    ));

    let no_selection = SelectionChangeContext {
        selections: vec![],
        ..with_both.clone()
    };
    assert!(!passes(
        EventContext::SelectionChange(no_selection),
        "selectionChange"
    ));

    let no_editor = SelectionChangeContext {
        editor: None,
        ..with_both
    };
    assert!(!passes(
        EventContext::SelectionChange(no_editor),
        "selectionChange"
    ));
}

#[test]
fn test_text_change_needs_changes() {
    assert!(!passes(
        EventContext::TextChange(TextChangeContext::default()),
        "textChange"
    ));
    assert!(passes(
        EventContext::TextChange(TextChangeContext {
            content_changes: vec![ContentChange {
                range_length: 0,
                text: "x".into()
            }]
        }),
        "textChange"
    ));
}

#[test]
fn test_unfiltered_kinds() {
    assert!(passes(
        EventContext::CommandExecution(CommandContext::default()),
        "commandExecution"
    ));
    for ctx in [
        EventContext::IntelliSense,
        EventContext::PeekDefinition,
        EventContext::QuickFix,
        EventContext::References,
        EventContext::DebugStart,
        EventContext::DebugStop,
        EventContext::TipOfTheDay,
        EventContext::Unknown {
            kind: "somethingNew".into(),
        },
    ] {
        assert!(passes(ctx, "any"));
    }
}

#[test]
fn test_filter_keeps_source_order() {
    let records = vec![
        ShortcutRecord::new("debugStart", "F5", "start"),
        ShortcutRecord::new("debugStart", "F9", "breakpoint"),
        ShortcutRecord::new("debugStart", "F10", "step over"),
    ];
    let kept = keys(&filter_candidates(
        &EventContext::DebugStart,
        &records,
        EditorChangePolicy::GroupRules,
    ));
    assert_eq!(kept, vec!["F5", "F9", "F10"]);
}
