//! Navigator
//!
//! The capabilities a page can reach. Clipboard and share are optional,
//! mirroring browsers where `navigator.clipboard` or `navigator.share`
//! may be missing.

use std::rc::Rc;

use crate::{AudioBackend, Clipboard, KeyValueStore, MemoryAudioBackend, ShareSheet, Storage};

/// Bundle of platform capabilities
#[derive(Clone)]
pub struct Navigator {
    pub clipboard: Option<Rc<dyn Clipboard>>,
    pub share: Option<Rc<dyn ShareSheet>>,
    pub audio: Rc<dyn AudioBackend>,
    pub local_storage: Rc<dyn KeyValueStore>,
}

impl Navigator {
    /// No clipboard, no share sheet, in-memory audio and storage
    pub fn minimal() -> Self {
        Self {
            clipboard: None,
            share: None,
            audio: Rc::new(MemoryAudioBackend::new()),
            local_storage: Rc::new(Storage::session()),
        }
    }

    pub fn with_clipboard(mut self, clipboard: Rc<dyn Clipboard>) -> Self {
        self.clipboard = Some(clipboard);
        self
    }

    pub fn with_share(mut self, share: Rc<dyn ShareSheet>) -> Self {
        self.share = Some(share);
        self
    }

    pub fn with_audio(mut self, audio: Rc<dyn AudioBackend>) -> Self {
        self.audio = audio;
        self
    }

    pub fn with_local_storage(mut self, storage: Rc<dyn KeyValueStore>) -> Self {
        self.local_storage = storage;
        self
    }
}

impl std::fmt::Debug for Navigator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Navigator")
            .field("clipboard", &self.clipboard.is_some())
            .field("share", &self.share.is_some())
            .finish_non_exhaustive()
    }
}
