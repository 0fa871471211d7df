//! Shared fixtures for the integration suites

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::io;
use std::rc::Rc;
use std::sync::{Arc, Mutex};

use cc_actions::{Dispatcher, Page};
use cc_dom::{DOMRect, Document, NodeId, SelectorList};
use cc_platform::{
    AudioBackend, AudioHandle, Clipboard, Config, MemoryAudioBackend, MemoryClipboard, Navigator, PlatformError,
    PlatformFuture, Storage,
};
use smol::channel::{self, Sender};
use tracing_subscriber::fmt::MakeWriter;

/// A page with the dispatcher installed and handles on its mocks
pub struct Harness {
    pub page: Rc<Page>,
    pub actions: Rc<Dispatcher>,
    pub clipboard: Rc<MemoryClipboard>,
    pub audio: Rc<MemoryAudioBackend>,
    pub storage: Rc<Storage>,
}

/// Build a document with `build`, then install button actions on it
pub fn harness(build: impl FnOnce(&mut Document)) -> Harness {
    let mut doc = Document::new("https://cifras.example/song/42");
    doc.set_title("Garota de Ipanema");
    build(&mut doc);

    let clipboard = Rc::new(MemoryClipboard::new());
    let audio = Rc::new(MemoryAudioBackend::new());
    let storage = Rc::new(Storage::session());
    let navigator = Navigator::minimal()
        .with_clipboard(clipboard.clone())
        .with_audio(audio.clone())
        .with_local_storage(storage.clone());
    let page = Page::new(doc, navigator, Config::default());
    let actions = Dispatcher::install(&page).unwrap();
    Harness {
        page,
        actions,
        clipboard,
        audio,
        storage,
    }
}

/// Append a laid-out `<button>` with the given attributes to `<body>`
pub fn add_button(doc: &mut Document, attrs: &[(&str, &str)]) -> NodeId {
    let button = doc.create_element("button");
    for (name, value) in attrs {
        doc.set_attribute(button, name, value).unwrap();
    }
    doc.append_child(doc.body(), button).unwrap();
    doc.set_rect(button, DOMRect::from_xywh(0.0, 0.0, 80.0, 30.0)).unwrap();
    button
}

/// Texts of the feedback messages currently attached under `node`
pub fn messages_on(page: &Page, node: NodeId) -> Vec<String> {
    let selector = SelectorList::parse(".cc-temp-msg").unwrap();
    let doc = page.document();
    doc.tree()
        .query_selector_all(node, &selector)
        .into_iter()
        .map(|tip| doc.text_content(tip))
        .collect()
}

pub fn ripples_on(page: &Page, node: NodeId) -> usize {
    let selector = SelectorList::parse(".cc-ripple").unwrap();
    page.document().tree().query_selector_all(node, &selector).len()
}

// ============================================================================
// LOG CAPTURE
// ============================================================================

/// In-memory log sink for `tracing_subscriber::fmt`
#[derive(Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }

    /// Lines containing `needle`
    pub fn count(&self, needle: &str) -> usize {
        self.contents().lines().filter(|line| line.contains(needle)).count()
    }
}

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogBuffer {
    type Writer = LogBuffer;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Capture this thread's logs until the guard drops
pub fn capture_logs() -> (LogBuffer, tracing::subscriber::DefaultGuard) {
    let buffer = LogBuffer::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(buffer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .finish();
    let guard = tracing::subscriber::set_default(subscriber);
    (buffer, guard)
}

// ============================================================================
// DEFERRED CLIPBOARD
// ============================================================================

/// Clipboard whose writes settle only when the test says so
#[derive(Default)]
pub struct DeferredClipboard {
    pending: RefCell<Vec<(String, Option<Sender<Result<(), PlatformError>>>)>>,
}

impl DeferredClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Texts of all writes so far, in call order
    pub fn requests(&self) -> Vec<String> {
        self.pending.borrow().iter().map(|(text, _)| text.clone()).collect()
    }

    /// Settle write number `index`
    pub fn settle(&self, index: usize, accept: bool) {
        let sender = self.pending.borrow_mut()[index].1.take().expect("write already settled");
        let result = if accept {
            Ok(())
        } else {
            Err(PlatformError::ClipboardRejected("denied".to_string()))
        };
        // the page may already be gone
        let _ = sender.try_send(result);
    }

    /// Whether nobody is waiting for write number `index` any more
    pub fn is_abandoned(&self, index: usize) -> bool {
        self.pending.borrow()[index].1.as_ref().is_none_or(|sender| sender.is_closed())
    }
}

impl Clipboard for DeferredClipboard {
    fn write_text(&self, text: &str) -> PlatformFuture<()> {
        let (tx, rx) = channel::bounded(1);
        self.pending.borrow_mut().push((text.to_string(), Some(tx)));
        Box::pin(async move {
            rx.recv()
                .await
                .unwrap_or(Err(PlatformError::Unavailable("clipboard")))
        })
    }
}

// ============================================================================
// DEFERRED AUDIO
// ============================================================================

/// Audio whose playback never confirms; only the `paused` flag moves
#[derive(Default)]
pub struct DeferredAudio {
    src: String,
    paused: Cell<bool>,
    plays: Cell<usize>,
    pauses: Cell<usize>,
    pending: RefCell<Vec<Sender<Result<(), PlatformError>>>>,
}

impl DeferredAudio {
    pub fn plays(&self) -> usize {
        self.plays.get()
    }

    pub fn pauses(&self) -> usize {
        self.pauses.get()
    }
}

impl AudioHandle for DeferredAudio {
    fn src(&self) -> String {
        self.src.clone()
    }

    fn is_paused(&self) -> bool {
        self.paused.get()
    }

    fn play(&self) -> PlatformFuture<()> {
        self.plays.set(self.plays.get() + 1);
        self.paused.set(false);
        let (tx, rx) = channel::bounded(1);
        self.pending.borrow_mut().push(tx);
        Box::pin(async move {
            rx.recv()
                .await
                .unwrap_or(Err(PlatformError::Playback("abandoned".to_string())))
        })
    }

    fn pause(&self) {
        self.pauses.set(self.pauses.get() + 1);
        self.paused.set(true);
    }
}

/// Backend handing out `DeferredAudio` handles
#[derive(Default)]
pub struct DeferredAudioBackend {
    created: RefCell<Vec<Rc<DeferredAudio>>>,
}

impl DeferredAudioBackend {
    pub fn created(&self) -> Vec<Rc<DeferredAudio>> {
        self.created.borrow().clone()
    }
}

impl AudioBackend for DeferredAudioBackend {
    fn create(&self, src: &str) -> Rc<dyn AudioHandle> {
        let audio = Rc::new(DeferredAudio {
            src: src.to_string(),
            paused: Cell::new(true),
            ..Default::default()
        });
        self.created.borrow_mut().push(audio.clone());
        audio
    }
}
