//! Clipboard contract consumed when opening an empty note.

/// Read-only clipboard access.
pub trait ClipboardSource {
    fn read(&self) -> Option<String>;
}

/// Clipboard that never has content.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoClipboard;

impl ClipboardSource for NoClipboard {
    fn read(&self) -> Option<String> {
        None
    }
}

/// Clipboard text already read by the host app.
impl ClipboardSource for Option<String> {
    fn read(&self) -> Option<String> {
        self.clone()
    }
}
