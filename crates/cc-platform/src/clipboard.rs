//! Clipboard API
//!
//! Asynchronous text writes (`navigator.clipboard.writeText`).

use std::cell::{Cell, RefCell};

use crate::{PlatformError, PlatformFuture};

/// System clipboard access
pub trait Clipboard {
    /// Write text; resolves once the platform accepted or refused it
    fn write_text(&self, text: &str) -> PlatformFuture<()>;
}

/// In-process clipboard
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    text: RefCell<Option<String>>,
    writes: Cell<usize>,
    reject: Cell<bool>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clipboard that refuses every write (permission denied)
    pub fn rejecting() -> Self {
        let clipboard = Self::default();
        clipboard.reject.set(true);
        clipboard
    }

    pub fn set_rejecting(&self, reject: bool) {
        self.reject.set(reject);
    }

    /// Read text from clipboard
    pub fn read_text(&self) -> Option<String> {
        self.text.borrow().clone()
    }

    /// Number of write attempts, accepted or not
    pub fn write_count(&self) -> usize {
        self.writes.get()
    }
}

impl Clipboard for MemoryClipboard {
    fn write_text(&self, text: &str) -> PlatformFuture<()> {
        self.writes.set(self.writes.get() + 1);
        let result = if self.reject.get() {
            Err(PlatformError::ClipboardRejected("write permission denied".to_string()))
        } else {
            *self.text.borrow_mut() = Some(text.to_string());
            Ok(())
        };
        Box::pin(smol::future::ready(result))
    }
}
