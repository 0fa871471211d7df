//! Delegated action dispatch
//!
//! One capturing click listener on the document routes clicks on
//! button-like elements:
//!
//! 1. no button around the target: ignored
//! 2. button flagged as having its own handler: skipped
//! 3. `data-action` names a registered action: default prevented, handler runs
//! 4. anything else: default prevented, ripple and a hint message
//!
//! Buttons are flagged once, by the scan at install time and by explicit
//! [`Dispatcher::rescan`] calls. A button counts as handled elsewhere when it
//! has an `onclick` attribute, `data-listener="true"` or `data-has-listener`.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;

use cc_dom::{Document, EventType, ListenerOptions, MouseEvent, NodeId, SelectorList};

use crate::feedback::{ripple, show_temp_message};
use crate::listeners::ListenerId;
use crate::{ActionError, Page, actions};

/// Action handler: page, clicked button, click event
pub type ActionHandler = Rc<dyn Fn(&Page, NodeId, &mut MouseEvent) -> Result<(), ActionError>>;

/// Name to handler table
#[derive(Clone, Default)]
pub struct ActionRegistry {
    handlers: HashMap<String, ActionHandler>,
}

impl ActionRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in actions
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for (name, handler) in actions::builtins() {
            registry.insert(name, handler);
        }
        registry
    }

    /// Add or replace a handler, returning the replaced one
    pub fn insert(&mut self, name: &str, handler: ActionHandler) -> Option<ActionHandler> {
        self.handlers.insert(name.to_string(), handler)
    }

    pub fn register<F>(&mut self, name: &str, handler: F) -> Option<ActionHandler>
    where
        F: Fn(&Page, NodeId, &mut MouseEvent) -> Result<(), ActionError> + 'static,
    {
        self.insert(name, Rc::new(handler))
    }

    pub fn get(&self, name: &str) -> Option<ActionHandler> {
        self.handlers.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.handlers.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl std::fmt::Debug for ActionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.names()).finish()
    }
}

/// What a click turned into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Not inside a button
    Ignored,
    /// Button has its own handler
    Skipped,
    /// Registered action ran
    Handled,
    /// Registered action returned an error or panicked
    Failed,
    /// No usable action; ripple and hint shown
    Fallback,
}

/// Page-wide button action dispatcher (`window.CCButtonActions`)
pub struct Dispatcher {
    registry: RefCell<ActionRegistry>,
    buttons: SelectorList,
    listener: Cell<Option<ListenerId>>,
    last_outcome: Cell<Option<DispatchOutcome>>,
}

impl Dispatcher {
    /// Install with the built-in actions
    pub fn install(page: &Page) -> Result<Rc<Self>, ActionError> {
        Self::install_with(page, ActionRegistry::with_builtins())
    }

    /// Scan the page's buttons and subscribe to clicks on the document.
    ///
    /// A page has at most one dispatcher; installing again returns the
    /// existing one and ignores `registry`.
    pub fn install_with(page: &Page, registry: ActionRegistry) -> Result<Rc<Self>, ActionError> {
        if let Some(existing) = page.button_actions() {
            tracing::warn!("button actions already installed");
            return Ok(existing);
        }

        let dispatcher = Rc::new(Self {
            registry: RefCell::new(registry),
            buttons: SelectorList::parse(&page.config().button_selector)?,
            listener: Cell::new(None),
            last_outcome: Cell::new(None),
        });
        let flagged = dispatcher.rescan(page);

        let routed = dispatcher.clone();
        let id = page.add_event_listener(NodeId::ROOT, EventType::Click, ListenerOptions::capture(), move |page, event| {
            if let Some(click) = event.as_mouse() {
                routed.dispatch_click(page, click);
            }
        });
        dispatcher.listener.set(Some(id));
        page.set_button_actions(dispatcher.clone());

        tracing::info!(actions = dispatcher.registry.borrow().len(), flagged, "button actions installed");
        Ok(dispatcher)
    }

    /// Stop routing clicks and detach from the page; returns false if
    /// this dispatcher was not installed. Flags on buttons stay.
    pub fn uninstall(&self, page: &Page) -> bool {
        let Some(id) = self.listener.take() else {
            return false;
        };
        page.remove_event_listener(id);
        page.clear_button_actions(self);
        tracing::info!("button actions uninstalled");
        true
    }

    /// Add or replace an action; later clicks use the newest handler
    pub fn register<F>(&self, name: &str, handler: F)
    where
        F: Fn(&Page, NodeId, &mut MouseEvent) -> Result<(), ActionError> + 'static,
    {
        self.register_handler(name, Some(Rc::new(handler)));
    }

    /// Registration entry point for dynamically supplied handlers.
    ///
    /// `None` is ignored; returns whether a handler was stored.
    pub fn register_handler(&self, name: &str, handler: Option<ActionHandler>) -> bool {
        let Some(handler) = handler else {
            tracing::debug!(action = name, "ignoring registration without a handler");
            return false;
        };
        let replaced = self.registry.borrow_mut().insert(name, handler).is_some();
        tracing::debug!(action = name, replaced, "action registered");
        true
    }

    pub fn has_action(&self, name: &str) -> bool {
        self.registry.borrow().contains(name)
    }

    pub fn action_names(&self) -> Vec<String> {
        self.registry.borrow().names()
    }

    /// Flag buttons that carry their own handler; returns how many were newly flagged
    pub fn rescan(&self, page: &Page) -> usize {
        let candidates: Vec<NodeId> = {
            let doc = page.document();
            doc.tree()
                .query_selector_all(NodeId::ROOT, &self.buttons)
                .into_iter()
                .filter(|&button| has_own_handler(&doc, button))
                .collect()
        };

        let mut flagged = 0;
        for button in candidates {
            if page.mark_explicit_handler(button) {
                tracing::debug!(node = %button, "button has its own handler");
                flagged += 1;
            }
        }
        flagged
    }

    /// Outcome of the most recent click
    pub fn last_outcome(&self) -> Option<DispatchOutcome> {
        self.last_outcome.get()
    }

    /// Route one click
    pub fn dispatch_click(&self, page: &Page, event: &mut MouseEvent) -> DispatchOutcome {
        let outcome = self.route(page, event);
        self.last_outcome.set(Some(outcome));
        outcome
    }

    fn route(&self, page: &Page, event: &mut MouseEvent) -> DispatchOutcome {
        let (button, action) = {
            let doc = page.document();
            let Some(button) = doc.closest(event.target(), &self.buttons) else {
                return DispatchOutcome::Ignored;
            };
            (button, doc.data(button, "action").map(str::to_string))
        };

        if page.is_explicit_handler(button) {
            tracing::trace!(node = %button, "click left to the button's own handler");
            return DispatchOutcome::Skipped;
        }

        let registered = action
            .as_deref()
            .and_then(|name| self.registry.borrow().get(name));
        let (Some(name), Some(handler)) = (action.as_deref(), registered) else {
            self.fallback(page, button, event, action.as_deref());
            return DispatchOutcome::Fallback;
        };

        event.prevent_default();
        match panic::catch_unwind(AssertUnwindSafe(|| handler(page, button, event))) {
            Ok(Ok(())) => DispatchOutcome::Handled,
            Ok(Err(err)) => {
                tracing::error!(action = name, node = %button, error = %err, "action failed");
                DispatchOutcome::Failed
            }
            Err(payload) => {
                tracing::error!(action = name, node = %button, panic = panic_message(payload.as_ref()), "action panicked");
                DispatchOutcome::Failed
            }
        }
    }

    fn fallback(&self, page: &Page, button: NodeId, event: &mut MouseEvent, action: Option<&str>) {
        event.prevent_default();
        ripple(page, button, event);
        show_temp_message(page, button, &page.config().messages.no_action);
        tracing::info!(node = %button, action, "button without action clicked");
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("actions", &self.registry.borrow())
            .field("listener", &self.listener.get())
            .field("last_outcome", &self.last_outcome.get())
            .finish()
    }
}

fn has_own_handler(doc: &Document, button: NodeId) -> bool {
    doc.get_attribute(button, "onclick").is_some_and(|code| !code.is_empty())
        || doc.data(button, "listener") == Some("true")
        || doc.has_attribute(button, "data-has-listener")
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload")
}
