use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::SystemTime;

/// The closed set of interaction kinds the engine knows about.
///
/// The tag strings are shared by the catalog's `interactionType` column and
/// the JSON event stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InteractionKind {
    EditorChange,
    TextChange,
    SelectionChange,
    FileSave,
    DocumentClose,
    TerminalChange,
    WindowStateChange,
    CommandExecution,
    PanelVisibilityChange,
    IntelliSense,
    PeekDefinition,
    QuickFix,
    References,
    DebugStart,
    DebugStop,
    TipOfTheDay,
}

impl InteractionKind {
    pub const ALL: [InteractionKind; 16] = [
        Self::EditorChange,
        Self::TextChange,
        Self::SelectionChange,
        Self::FileSave,
        Self::DocumentClose,
        Self::TerminalChange,
        Self::WindowStateChange,
        Self::CommandExecution,
        Self::PanelVisibilityChange,
        Self::IntelliSense,
        Self::PeekDefinition,
        Self::QuickFix,
        Self::References,
        Self::DebugStart,
        Self::DebugStop,
        Self::TipOfTheDay,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EditorChange => "editorChange",
            Self::TextChange => "textChange",
            Self::SelectionChange => "selectionChange",
            Self::FileSave => "fileSave",
            Self::DocumentClose => "documentClose",
            Self::TerminalChange => "terminalChange",
            Self::WindowStateChange => "windowStateChange",
            Self::CommandExecution => "commandExecution",
            Self::PanelVisibilityChange => "panelVisibilityChange",
            Self::IntelliSense => "intelliSense",
            Self::PeekDefinition => "peekDefinition",
            Self::QuickFix => "quickFix",
            Self::References => "references",
            Self::DebugStart => "debugStart",
            Self::DebugStop => "debugStop",
            Self::TipOfTheDay => "tipOfTheDay",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == tag)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorInfo {
    pub language_id: Option<String>,
    pub file_name: Option<String>,
    pub is_untitled: bool,
}

impl EditorInfo {
    pub fn is_markdown(&self) -> bool {
        let by_language = self
            .language_id
            .as_deref()
            .is_some_and(|id| id.eq_ignore_ascii_case("markdown"));
        let by_extension = self.file_name.as_deref().is_some_and(|name| {
            let lower = name.to_ascii_lowercase();
            lower.ends_with(".md") || lower.ends_with(".markdown")
        });
        by_language || by_extension
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DocumentInfo {
    pub file_name: Option<String>,
    pub language_id: Option<String>,
    pub is_dirty: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TerminalInfo {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WindowState {
    pub focused: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ContentChange {
    pub range_length: usize,
    pub text: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SelectionRange {
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorChangeContext {
    pub editor: Option<EditorInfo>,
    pub tab_group_count_increased: bool,
    pub tab_count_increased: bool,
    pub tab_count_unchanged: bool,
    pub became_non_preview: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TextChangeContext {
    pub content_changes: Vec<ContentChange>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SelectionChangeContext {
    pub editor: Option<EditorInfo>,
    pub selections: Vec<SelectionRange>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DocumentContext {
    pub document: Option<DocumentInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TerminalContext {
    pub terminal: Option<TerminalInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WindowStateContext {
    pub state: Option<WindowState>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CommandContext {
    pub command: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PanelContext {
    pub panel: Option<String>,
}

/// Per-kind context payload of an interaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "WireEvent", into = "WireEvent")]
pub enum EventContext {
    EditorChange(EditorChangeContext),
    TextChange(TextChangeContext),
    SelectionChange(SelectionChangeContext),
    FileSave(DocumentContext),
    DocumentClose(DocumentContext),
    TerminalChange(TerminalContext),
    WindowStateChange(WindowStateContext),
    CommandExecution(CommandContext),
    PanelVisibilityChange(PanelContext),
    IntelliSense,
    PeekDefinition,
    QuickFix,
    References,
    DebugStart,
    DebugStop,
    TipOfTheDay,
    /// A kind this build does not know. Catalog rows with a matching tag are
    /// still recommended, without filtering.
    Unknown { kind: String },
}

impl EventContext {
    pub fn kind(&self) -> Option<InteractionKind> {
        let kind = match self {
            Self::EditorChange(_) => InteractionKind::EditorChange,
            Self::TextChange(_) => InteractionKind::TextChange,
            Self::SelectionChange(_) => InteractionKind::SelectionChange,
            Self::FileSave(_) => InteractionKind::FileSave,
            Self::DocumentClose(_) => InteractionKind::DocumentClose,
            Self::TerminalChange(_) => InteractionKind::TerminalChange,
            Self::WindowStateChange(_) => InteractionKind::WindowStateChange,
            Self::CommandExecution(_) => InteractionKind::CommandExecution,
            Self::PanelVisibilityChange(_) => InteractionKind::PanelVisibilityChange,
            Self::IntelliSense => InteractionKind::IntelliSense,
            Self::PeekDefinition => InteractionKind::PeekDefinition,
            Self::QuickFix => InteractionKind::QuickFix,
            Self::References => InteractionKind::References,
            Self::DebugStart => InteractionKind::DebugStart,
            Self::DebugStop => InteractionKind::DebugStop,
            Self::TipOfTheDay => InteractionKind::TipOfTheDay,
            Self::Unknown { .. } => return None,
        };
        Some(kind)
    }

    /// Tag used to look the event up in the catalog.
    pub fn tag(&self) -> &str {
        match self {
            Self::Unknown { kind } => kind,
            other => other.kind().map(|k| k.as_str()).unwrap_or_default(),
        }
    }
}

/// One interaction delivered by the host.
#[derive(Debug, Clone, PartialEq)]
pub struct InteractionEvent {
    pub timestamp: SystemTime,
    pub context: EventContext,
}

impl InteractionEvent {
    pub fn new(context: EventContext) -> Self {
        Self {
            timestamp: SystemTime::now(),
            context,
        }
    }

    pub fn at(timestamp: SystemTime, context: EventContext) -> Self {
        Self { timestamp, context }
    }

    pub fn tag(&self) -> &str {
        self.context.tag()
    }
}

/// `{"type": "...", "context": {...}}` as it appears on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct WireEvent {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    context: Value,
}

/// Decode a context payload. Null fields count as absent, and a payload
/// whose fields have the wrong types decodes as the empty context, which
/// every filter treats as non-matching. Only a payload that is not an
/// object at all is an error.
fn payload<T>(context: Value) -> Result<T, serde_json::Error>
where
    T: serde::de::DeserializeOwned + Default,
{
    let context = match context {
        Value::Null => return Ok(T::default()),
        Value::Object(_) => without_nulls(context),
        other => {
            return Err(serde::de::Error::custom(format!(
                "context must be an object, got {}",
                other
            )));
        }
    };
    Ok(serde_json::from_value(context).unwrap_or_default())
}

fn without_nulls(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .filter(|(_, v)| !v.is_null())
                .map(|(k, v)| (k, without_nulls(v)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(without_nulls).collect()),
        other => other,
    }
}

impl TryFrom<WireEvent> for EventContext {
    type Error = serde_json::Error;

    fn try_from(wire: WireEvent) -> Result<Self, Self::Error> {
        let Some(kind) = InteractionKind::from_tag(&wire.kind) else {
            return Ok(Self::Unknown { kind: wire.kind });
        };
        let context = wire.context;
        Ok(match kind {
            InteractionKind::EditorChange => Self::EditorChange(payload(context)?),
            InteractionKind::TextChange => Self::TextChange(payload(context)?),
            InteractionKind::SelectionChange => Self::SelectionChange(payload(context)?),
            InteractionKind::FileSave => Self::FileSave(payload(context)?),
            InteractionKind::DocumentClose => Self::DocumentClose(payload(context)?),
            InteractionKind::TerminalChange => Self::TerminalChange(payload(context)?),
            InteractionKind::WindowStateChange => Self::WindowStateChange(payload(context)?),
            InteractionKind::CommandExecution => Self::CommandExecution(payload(context)?),
            InteractionKind::PanelVisibilityChange => {
                Self::PanelVisibilityChange(payload(context)?)
            }
            InteractionKind::IntelliSense => Self::IntelliSense,
            InteractionKind::PeekDefinition => Self::PeekDefinition,
            InteractionKind::QuickFix => Self::QuickFix,
            InteractionKind::References => Self::References,
            InteractionKind::DebugStart => Self::DebugStart,
            InteractionKind::DebugStop => Self::DebugStop,
            InteractionKind::TipOfTheDay => Self::TipOfTheDay,
        })
    }
}

impl From<EventContext> for WireEvent {
    fn from(context: EventContext) -> Self {
        let kind = context.tag().to_string();
        let context = match context {
            EventContext::EditorChange(c) => serde_json::to_value(c),
            EventContext::TextChange(c) => serde_json::to_value(c),
            EventContext::SelectionChange(c) => serde_json::to_value(c),
            EventContext::FileSave(c) | EventContext::DocumentClose(c) => serde_json::to_value(c),
            EventContext::TerminalChange(c) => serde_json::to_value(c),
            EventContext::WindowStateChange(c) => serde_json::to_value(c),
            EventContext::CommandExecution(c) => serde_json::to_value(c),
            EventContext::PanelVisibilityChange(c) => serde_json::to_value(c),
            _ => Ok(Value::Null),
        };
        Self {
            kind,
            context: context.unwrap_or(Value::Null),
        }
    }
}
