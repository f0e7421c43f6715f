use crate::domain::{DomainError, DomainResult};

/// Somewhere pasted text comes from.
pub trait ClipboardSource {
    fn read_text(&mut self) -> DomainResult<String>;
}

/// The operating system clipboard.
///
/// The handle is opened lazily on first paste so the app still starts on
/// machines without a clipboard (headless sessions, bare ttys).
#[derive(Default)]
pub struct SystemClipboard {
    inner: Option<arboard::Clipboard>,
}

impl ClipboardSource for SystemClipboard {
    fn read_text(&mut self) -> DomainResult<String> {
        if self.inner.is_none() {
            let clipboard = arboard::Clipboard::new().map_err(|e| DomainError::Clipboard(e.to_string()))?;
            self.inner = Some(clipboard);
        }

        match self.inner.as_mut() {
            Some(clipboard) => clipboard.get_text().map_err(|e| DomainError::Clipboard(e.to_string())),
            None => Err(DomainError::Clipboard("not initialized".to_string())),
        }
    }
}

/// In-memory clipboard, for tests and scripted input.
#[derive(Debug, Default)]
pub struct StaticClipboard {
    pub text: Option<String>,
}

impl StaticClipboard {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
        }
    }
}

impl ClipboardSource for StaticClipboard {
    fn read_text(&mut self) -> DomainResult<String> {
        self.text
            .clone()
            .ok_or_else(|| DomainError::Clipboard("clipboard is empty".to_string()))
    }
}
