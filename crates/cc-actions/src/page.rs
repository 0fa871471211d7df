//! Page runtime
//!
//! A `Page` owns the document plus everything the button runtime needs
//! around it: platform capabilities, configuration, the listener table,
//! virtual timers and a single-threaded executor for async tails.
//!
//! Nothing here blocks. Clipboard, share and audio futures are spawned and
//! only make progress when the host calls [`Page::run_until_idle`] or
//! [`Page::advance`], the way a browser runs continuations after the
//! current task.

use std::cell::{Ref, RefCell, RefMut};
use std::collections::HashMap;
use std::future::Future;
use std::rc::{Rc, Weak};

use cc_dom::{Document, EventPhase, EventType, KeyboardEvent, ListenerOptions, MouseEvent, NodeId};
use cc_platform::{AudioHandle, Config, Navigator, TimerId, TimerQueue};
use smol::LocalExecutor;

use crate::dispatch::Dispatcher;
use crate::listeners::{ListenerFn, ListenerId, ListenerTable, PhaseFilter};
use crate::modal::ModalTriggers;

/// An event travelling through the document
pub enum Event<'a> {
    Mouse(&'a mut MouseEvent),
    Keyboard(&'a mut KeyboardEvent),
}

impl Event<'_> {
    pub fn event_type(&self) -> EventType {
        match self {
            Self::Mouse(e) => e.event_type,
            Self::Keyboard(e) => e.event_type,
        }
    }

    pub fn target(&self) -> NodeId {
        match self {
            Self::Mouse(e) => e.target(),
            Self::Keyboard(e) => e.target(),
        }
    }

    pub fn current_target(&self) -> NodeId {
        match self {
            Self::Mouse(e) => e.current_target(),
            Self::Keyboard(e) => e.current_target(),
        }
    }

    pub fn prevent_default(&mut self) {
        match self {
            Self::Mouse(e) => e.prevent_default(),
            Self::Keyboard(e) => e.prevent_default(),
        }
    }

    pub fn stop_propagation(&mut self) {
        match self {
            Self::Mouse(e) => e.stop_propagation(),
            Self::Keyboard(e) => e.stop_propagation(),
        }
    }

    fn bubbles(&self) -> bool {
        match self {
            Self::Mouse(e) => e.bubbles(),
            Self::Keyboard(e) => e.bubbles(),
        }
    }

    fn is_propagation_stopped(&self) -> bool {
        match self {
            Self::Mouse(e) => e.is_propagation_stopped(),
            Self::Keyboard(e) => e.is_propagation_stopped(),
        }
    }

    fn set_current(&mut self, node: NodeId, phase: EventPhase) {
        match self {
            Self::Mouse(e) => e.set_current(node, phase),
            Self::Keyboard(e) => e.set_current(node, phase),
        }
    }

    /// The mouse event, for click listeners
    pub fn as_mouse(&mut self) -> Option<&mut MouseEvent> {
        match self {
            Self::Mouse(e) => Some(&mut **e),
            Self::Keyboard(_) => None,
        }
    }

    /// The keyboard event, for key listeners
    pub fn as_keyboard(&self) -> Option<&KeyboardEvent> {
        match self {
            Self::Keyboard(e) => Some(&**e),
            Self::Mouse(_) => None,
        }
    }
}

/// Per-button state kept beside the DOM
#[derive(Default)]
pub struct ButtonState {
    /// Set by the startup scan, never cleared
    pub explicit_handler: bool,
    /// Preview audio, created on first play
    pub audio: Option<Rc<dyn AudioHandle>>,
}

/// A loaded page and its runtime
pub struct Page {
    this: Weak<Page>,
    document: RefCell<Document>,
    navigator: Navigator,
    config: Config,
    timers: RefCell<TimerQueue>,
    executor: LocalExecutor<'static>,
    listeners: RefCell<ListenerTable>,
    buttons: RefCell<HashMap<NodeId, ButtonState>>,
    pub(crate) modals: RefCell<HashMap<NodeId, ModalTriggers>>,
    actions: RefCell<Option<Rc<Dispatcher>>>,
}

impl Page {
    /// Create a page around an already built document
    pub fn new(document: Document, navigator: Navigator, config: Config) -> Rc<Self> {
        Rc::new_cyclic(|this| Self {
            this: this.clone(),
            document: RefCell::new(document),
            navigator,
            config,
            timers: RefCell::new(TimerQueue::new()),
            executor: LocalExecutor::new(),
            listeners: RefCell::new(ListenerTable::default()),
            buttons: RefCell::new(HashMap::new()),
            modals: RefCell::new(HashMap::new()),
            actions: RefCell::new(None),
        })
    }

    /// Weak handle for continuations that must not keep the page alive
    pub fn weak(&self) -> Weak<Page> {
        self.this.clone()
    }

    /// Borrow the document. Do not hold the guard across listener or handler calls.
    pub fn document(&self) -> Ref<'_, Document> {
        self.document.borrow()
    }

    pub fn document_mut(&self) -> RefMut<'_, Document> {
        self.document.borrow_mut()
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The installed action dispatcher (`window.CCButtonActions`)
    pub fn button_actions(&self) -> Option<Rc<Dispatcher>> {
        self.actions.borrow().clone()
    }

    pub(crate) fn set_button_actions(&self, dispatcher: Rc<Dispatcher>) {
        *self.actions.borrow_mut() = Some(dispatcher);
    }

    pub(crate) fn clear_button_actions(&self, dispatcher: &Dispatcher) {
        let mut actions = self.actions.borrow_mut();
        if actions.as_deref().is_some_and(|current| std::ptr::eq(current, dispatcher)) {
            *actions = None;
        }
    }

    // ---- Listeners and dispatch ----

    pub fn add_event_listener<F>(&self, node: NodeId, event_type: EventType, options: ListenerOptions, callback: F) -> ListenerId
    where
        F: Fn(&Page, &mut Event<'_>) + 'static,
    {
        let callback: ListenerFn = Rc::new(callback);
        self.listeners.borrow_mut().add(node, event_type, options, callback)
    }

    pub fn remove_event_listener(&self, id: ListenerId) -> bool {
        self.listeners.borrow_mut().remove(id)
    }

    pub fn listener_count(&self, node: NodeId, event_type: EventType) -> usize {
        self.listeners.borrow().count(node, event_type)
    }

    /// Run capture, target and bubble phases for an event
    pub fn dispatch_event(&self, event: &mut Event<'_>) {
        let target = event.target();
        // target first, document last
        let path: Vec<NodeId> = self.document().tree().ancestors_inclusive(target).collect();

        for &node in path.iter().skip(1).rev() {
            if self.invoke_listeners(node, event, EventPhase::Capturing, PhaseFilter::Capture) {
                return;
            }
        }
        if self.invoke_listeners(target, event, EventPhase::AtTarget, PhaseFilter::Target) {
            return;
        }
        if event.bubbles() {
            for &node in path.iter().skip(1) {
                if self.invoke_listeners(node, event, EventPhase::Bubbling, PhaseFilter::Bubble) {
                    return;
                }
            }
        }
        event.set_current(NodeId::NONE, EventPhase::None);
    }

    /// Returns true once propagation was stopped
    fn invoke_listeners(&self, node: NodeId, event: &mut Event<'_>, phase: EventPhase, filter: PhaseFilter) -> bool {
        let entries = self.listeners.borrow().snapshot(node, event.event_type(), filter);
        if entries.is_empty() {
            return event.is_propagation_stopped();
        }
        event.set_current(node, phase);
        for entry in entries {
            if entry.removed.get() {
                continue;
            }
            if entry.options.once {
                self.listeners.borrow_mut().remove(entry.id);
            }
            (entry.callback)(self, event);
        }
        event.is_propagation_stopped()
    }

    /// Click the center of an element's box
    pub fn click(&self, target: NodeId) -> MouseEvent {
        let (x, y) = self
            .document()
            .bounding_client_rect(target)
            .map(|r| (r.x + r.width / 2.0, r.y + r.height / 2.0))
            .unwrap_or((0.0, 0.0));
        self.click_at(target, x, y)
    }

    /// Click at viewport coordinates; returns the event after dispatch
    pub fn click_at(&self, target: NodeId, x: f64, y: f64) -> MouseEvent {
        let mut event = MouseEvent::click(target, x, y);
        self.dispatch_event(&mut Event::Mouse(&mut event));
        event
    }

    /// Press a key on the focused element (or `<body>`)
    pub fn key_down(&self, key: &str) -> KeyboardEvent {
        let target = self.document().active_element();
        let mut event = KeyboardEvent::key_down(target, key);
        self.dispatch_event(&mut Event::Keyboard(&mut event));
        event
    }

    // ---- Async tails ----

    /// Spawn a fire-and-forget continuation
    pub fn spawn(&self, future: impl Future<Output = ()> + 'static) {
        self.executor.spawn(future).detach();
    }

    /// Run every continuation that can make progress; returns the number of polls
    pub fn run_until_idle(&self) -> usize {
        let mut polls = 0;
        while self.executor.try_tick() {
            polls += 1;
        }
        polls
    }

    // ---- Timers ----

    pub fn set_timeout<F>(&self, delay_ms: u64, callback: F) -> TimerId
    where
        F: FnOnce(&Page) + 'static,
    {
        let page = self.weak();
        self.timers.borrow_mut().set_timeout(
            delay_ms,
            Box::new(move || {
                if let Some(page) = page.upgrade() {
                    callback(&page);
                }
            }),
        )
    }

    pub fn request_animation_frame<F>(&self, callback: F) -> TimerId
    where
        F: FnOnce(&Page) + 'static,
    {
        let page = self.weak();
        self.timers.borrow_mut().request_animation_frame(Box::new(move || {
            if let Some(page) = page.upgrade() {
                callback(&page);
            }
        }))
    }

    pub fn now_ms(&self) -> u64 {
        self.timers.borrow().now_ms()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.borrow().pending()
    }

    /// Move virtual time forward, firing due timers and draining continuations
    pub fn advance(&self, ms: u64) {
        let until = self.now_ms() + ms;
        loop {
            self.run_until_idle();
            let next = self.timers.borrow_mut().pop_due(until);
            match next {
                Some(timer) => (timer.callback)(),
                None => break,
            }
        }
        self.timers.borrow_mut().advance_clock(until);
        self.run_until_idle();
    }

    // ---- Node lifetime ----

    /// Remove a node for good: free its subtree and forget the button state,
    /// listeners and modal triggers of every freed node. Returns the number
    /// of nodes freed.
    pub fn release(&self, node: NodeId) -> usize {
        let freed = self.document_mut().free(node);
        if freed == 0 {
            return 0;
        }

        let doc = self.document();
        let alive = |id: NodeId| doc.tree().get(id).is_some();
        self.buttons.borrow_mut().retain(|&id, _| alive(id));
        let dead_modals: Vec<NodeId> = self.modals.borrow().keys().copied().filter(|&id| !alive(id)).collect();
        let mut listeners = self.listeners.borrow_mut();
        for modal in dead_modals {
            if let Some(triggers) = self.modals.borrow_mut().remove(&modal) {
                for id in triggers.listeners() {
                    listeners.remove(id);
                }
            }
        }
        let dropped = listeners.retain_nodes(alive);
        tracing::debug!(node = %node, freed, listeners = dropped, "node released");
        freed
    }

    // ---- Button state ----

    pub fn is_explicit_handler(&self, button: NodeId) -> bool {
        self.buttons
            .borrow()
            .get(&button)
            .is_some_and(|state| state.explicit_handler)
    }

    /// Flag a button as having its own handler; returns false if it already was
    pub(crate) fn mark_explicit_handler(&self, button: NodeId) -> bool {
        let mut buttons = self.buttons.borrow_mut();
        let state = buttons.entry(button).or_default();
        !std::mem::replace(&mut state.explicit_handler, true)
    }

    /// Cached preview audio for a button, created on first use
    pub(crate) fn preview_audio_or_create(&self, button: NodeId, src: &str) -> Rc<dyn AudioHandle> {
        let mut buttons = self.buttons.borrow_mut();
        let state = buttons.entry(button).or_default();
        state
            .audio
            .get_or_insert_with(|| self.navigator.audio.create(src))
            .clone()
    }

    pub fn preview_audio(&self, button: NodeId) -> Option<Rc<dyn AudioHandle>> {
        self.buttons.borrow().get(&button).and_then(|state| state.audio.clone())
    }
}

impl std::fmt::Debug for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Page")
            .field("url", &self.document.borrow().url())
            .field("navigator", &self.navigator)
            .field("now_ms", &self.now_ms())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn page_with_button() -> (Rc<Page>, NodeId, NodeId) {
        let mut doc = Document::new("https://cifras.example/");
        let section = doc.create_element("section");
        let button = doc.create_element("button");
        doc.append_child(doc.body(), section).unwrap();
        doc.append_child(section, button).unwrap();
        (Page::new(doc, Navigator::minimal(), Config::default()), section, button)
    }

    #[test]
    fn test_capture_target_bubble_order() {
        let (page, section, button) = page_with_button();
        let log = Rc::new(RefCell::new(Vec::new()));

        for (node, options, name) in [
            (section, ListenerOptions::default(), "section-bubble"),
            (NodeId::ROOT, ListenerOptions::capture(), "document-capture"),
            (button, ListenerOptions::default(), "target"),
            (NodeId::ROOT, ListenerOptions::default(), "document-bubble"),
        ] {
            let log = log.clone();
            page.add_event_listener(node, EventType::Click, options, move |_, _| log.borrow_mut().push(name));
        }

        page.click(button);
        assert_eq!(
            *log.borrow(),
            ["document-capture", "target", "section-bubble", "document-bubble"]
        );
    }

    #[test]
    fn test_stop_propagation() {
        let (page, section, button) = page_with_button();
        let reached = Rc::new(Cell::new(false));

        page.add_event_listener(section, EventType::Click, ListenerOptions::default(), |_, event| {
            event.stop_propagation()
        });
        let flag = reached.clone();
        page.add_event_listener(NodeId::ROOT, EventType::Click, ListenerOptions::default(), move |_, _| {
            flag.set(true)
        });

        page.click(button);
        assert!(!reached.get());
    }

    #[test]
    fn test_once_listener() {
        let (page, _, button) = page_with_button();
        let count = Rc::new(Cell::new(0));
        let c = count.clone();
        page.add_event_listener(button, EventType::Click, ListenerOptions::once(), move |_, _| c.set(c.get() + 1));

        page.click(button);
        page.click(button);
        assert_eq!(count.get(), 1);
        assert_eq!(page.listener_count(button, EventType::Click), 0);
    }

    #[test]
    fn test_listener_removed_during_dispatch_does_not_run() {
        let (page, _, button) = page_with_button();
        let ran = Rc::new(Cell::new(false));
        let second: Rc<Cell<Option<ListenerId>>> = Rc::new(Cell::new(None));

        let victim = second.clone();
        page.add_event_listener(button, EventType::Click, ListenerOptions::default(), move |page, _| {
            if let Some(id) = victim.get() {
                page.remove_event_listener(id);
            }
        });
        let flag = ran.clone();
        let id = page.add_event_listener(button, EventType::Click, ListenerOptions::default(), move |_, _| flag.set(true));
        second.set(Some(id));

        page.click(button);
        assert!(!ran.get());
    }

    #[test]
    fn test_key_down_targets_focus() {
        let (page, _, button) = page_with_button();
        let seen = Rc::new(Cell::new(NodeId::NONE));
        let s = seen.clone();
        page.add_event_listener(NodeId::ROOT, EventType::KeyDown, ListenerOptions::default(), move |_, event| {
            s.set(event.target())
        });

        page.key_down("a");
        assert_eq!(seen.get(), page.document().body());

        page.document_mut().focus(button).unwrap();
        page.key_down("Escape");
        assert_eq!(seen.get(), button);
    }

    #[test]
    fn test_timers_and_nested_scheduling() {
        let (page, _, _) = page_with_button();
        let log = Rc::new(RefCell::new(Vec::new()));

        let l = log.clone();
        page.set_timeout(100, move |page| {
            l.borrow_mut().push(page.now_ms());
            let l = l.clone();
            page.set_timeout(50, move |page| l.borrow_mut().push(page.now_ms()));
        });

        page.advance(120);
        assert_eq!(*log.borrow(), [100]);
        page.advance(100);
        assert_eq!(*log.borrow(), [100, 150]);
        assert_eq!(page.now_ms(), 220);
        assert_eq!(page.pending_timers(), 0);
    }

    #[test]
    fn test_spawned_tasks_wait_for_host() {
        let (page, _, _) = page_with_button();
        let done = Rc::new(Cell::new(false));
        let d = done.clone();
        page.spawn(async move { d.set(true) });

        assert!(!done.get());
        assert!(page.run_until_idle() > 0);
        assert!(done.get());
    }

    #[test]
    fn test_preview_audio_is_cached() {
        let (page, _, button) = page_with_button();
        let first = page.preview_audio_or_create(button, "a.mp3");
        let second = page.preview_audio_or_create(button, "b.mp3");

        assert!(Rc::ptr_eq(&first, &second));
        assert_eq!(second.src(), "a.mp3");
    }

    #[test]
    fn test_explicit_flag_is_sticky() {
        let (page, _, button) = page_with_button();
        assert!(!page.is_explicit_handler(button));
        assert!(page.mark_explicit_handler(button));
        assert!(!page.mark_explicit_handler(button));
        assert!(page.is_explicit_handler(button));
    }

    #[test]
    fn test_release_forgets_freed_nodes() {
        let (page, section, button) = page_with_button();
        page.add_event_listener(button, EventType::Click, ListenerOptions::default(), |_, _| {});
        page.add_event_listener(section, EventType::Click, ListenerOptions::default(), |_, _| {});
        page.mark_explicit_handler(button);
        page.preview_audio_or_create(button, "a.mp3");
        let before = page.document().tree().len();

        assert_eq!(page.release(section), 2);
        assert_eq!(page.document().tree().len(), before - 2);
        assert_eq!(page.listener_count(button, EventType::Click), 0);
        assert_eq!(page.listener_count(section, EventType::Click), 0);
        assert!(!page.is_explicit_handler(button));
        assert!(page.preview_audio(button).is_none());
        assert_eq!(page.release(section), 0);
    }
}
