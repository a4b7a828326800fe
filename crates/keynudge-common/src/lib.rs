pub mod event;
pub mod formatter;
pub mod shortcut;

pub use event::{EventContext, InteractionEvent, InteractionKind};
pub use formatter::{Response, Suggestion};
pub use shortcut::{IdentityError, ShortcutIdentity, ShortcutRecord};
