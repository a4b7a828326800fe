use keynudge_common::event::{EditorChangeContext, EditorInfo, TextChangeContext};
use keynudge_common::{EventContext, InteractionKind};

fn parse(json: &str) -> EventContext {
    serde_json::from_str(json).expect("event should parse")
}

#[test]
fn test_parse_file_save_with_document() {
    let ctx = parse(r#"{"type":"fileSave","context":{"document":{"fileName":"main.rs"}}}"#);
    match ctx {
        EventContext::FileSave(doc) => {
            assert_eq!(
                doc.document.and_then(|d| d.file_name).as_deref(),
                Some("main.rs")
            );
        }
        other => panic!("Expected FileSave, got {:?}", other),
    }
}

#[test]
fn test_missing_context_is_empty() {
    let ctx = parse(r#"{"type":"selectionChange"}"#);
    match ctx {
        EventContext::SelectionChange(sel) => {
            assert!(sel.editor.is_none());
            assert!(sel.selections.is_empty());
        }
        other => panic!("Expected SelectionChange, got {:?}", other),
    }
}

#[test]
fn test_editor_change_flags_default_to_false() {
    let ctx = parse(
        r#"{"type":"editorChange","context":{"editor":{"isUntitled":true},"tabCountIncreased":true}}"#,
    );
    let EventContext::EditorChange(editor) = ctx else {
        panic!("Expected EditorChange");
    };
    assert!(editor.tab_count_increased);
    assert!(!editor.tab_group_count_increased);
    assert!(!editor.tab_count_unchanged);
    assert!(editor.editor.unwrap().is_untitled);
}

#[test]
fn test_unknown_kind_is_preserved() {
    let ctx = parse(r#"{"type":"notebookCellRun","context":{"cell":3}}"#);
    assert_eq!(ctx.kind(), None);
    assert_eq!(ctx.tag(), "notebookCellRun");
}

#[test]
fn test_unit_kinds_ignore_context() {
    let ctx = parse(r#"{"type":"debugStart","context":{"anything":true}}"#);
    assert_eq!(ctx, EventContext::DebugStart);
    assert_eq!(ctx.kind(), Some(InteractionKind::DebugStart));
}

#[test]
fn test_type_mismatch_in_payload_decodes_as_empty_context() {
    let ctx: EventContext =
        serde_json::from_str(r#"{"type":"textChange","context":{"contentChanges":"oops"}}"#)
            .unwrap();
    assert_eq!(ctx, EventContext::TextChange(TextChangeContext::default()));
}

#[test]
fn test_non_object_context_is_error() {
    let result: Result<EventContext, _> =
        serde_json::from_str(r#"{"type":"fileSave","context":"main.rs"}"#);
    assert!(result.is_err());
}

#[test]
fn test_null_fields_count_as_absent() {
    let ctx: EventContext =
        serde_json::from_str(r#"{"type":"textChange","context":{"contentChanges":null}}"#)
            .unwrap();
    assert_eq!(ctx, EventContext::TextChange(TextChangeContext::default()));

    let ctx: EventContext = serde_json::from_str(
        r#"{"type":"selectionChange","context":{"editor":{"fileName":"a.rs"},"selections":null}}"#,
    )
    .unwrap();
    let EventContext::SelectionChange(selection) = ctx else {
        panic!("expected selectionChange, got {:?}", ctx);
    };
    assert!(selection.editor.is_some());
    assert!(selection.selections.is_empty());

    let ctx: EventContext = serde_json::from_str(
        r#"{"type":"editorChange","context":{"editor":{"isUntitled":null,"languageId":null},"tabCountIncreased":null,"tabCountUnchanged":true}}"#,
    )
    .unwrap();
    let EventContext::EditorChange(change) = ctx else {
        panic!("expected editorChange, got {:?}", ctx);
    };
    assert_eq!(change.editor, Some(EditorInfo::default()));
    assert!(!change.tab_count_increased);
    assert!(change.tab_count_unchanged);
}

#[test]
fn test_tags_round_trip() {
    for kind in InteractionKind::ALL {
        assert_eq!(InteractionKind::from_tag(kind.as_str()), Some(kind));
    }
    assert_eq!(InteractionKind::from_tag("FileSave"), None);
}

#[test]
fn test_serialize_uses_wire_shape() {
    let ctx = EventContext::EditorChange(EditorChangeContext {
        editor: Some(EditorInfo {
            language_id: Some("markdown".into()),
            ..Default::default()
        }),
        ..Default::default()
    });
    let value = serde_json::to_value(&ctx).unwrap();
    assert_eq!(value["type"], "editorChange");
    assert_eq!(value["context"]["editor"]["languageId"], "markdown");

    let back: EventContext = serde_json::from_value(value).unwrap();
    assert_eq!(back, ctx);
}

#[test]
fn test_markdown_detection() {
    let by_lang = EditorInfo {
        language_id: Some("Markdown".into()),
        ..Default::default()
    };
    let by_name = EditorInfo {
        file_name: Some("/docs/README.MD".into()),
        ..Default::default()
    };
    let neither = EditorInfo {
        language_id: Some("rust".into()),
        file_name: Some("lib.rs".into()),
        is_untitled: false,
    };
    assert!(by_lang.is_markdown());
    assert!(by_name.is_markdown());
    assert!(!neither.is_markdown());
}
