//! Modal controller
//!
//! A modal is any element toggled between `display: block` and
//! `display: none`, with `aria-hidden` kept in step. While open it listens
//! for a click on its own root (the backdrop) and for `Escape` anywhere in
//! the document; closing removes both listeners.

use cc_dom::{EventType, ListenerOptions, NodeId, SelectorList};

use crate::listeners::ListenerId;
use crate::{ActionError, Page};

/// Listeners armed while a modal is open
#[derive(Debug, Clone, Copy)]
pub(crate) struct ModalTriggers {
    backdrop: ListenerId,
    escape: ListenerId,
}

impl ModalTriggers {
    pub(crate) fn listeners(self) -> [ListenerId; 2] {
        [self.backdrop, self.escape]
    }
}

/// Show a modal, focus its first focusable descendant and arm dismissal.
///
/// Opening an open modal only moves focus again.
pub fn open_modal(page: &Page, modal: NodeId) -> Result<(), ActionError> {
    let focusable = SelectorList::parse(&page.config().focusable_selector)?;
    {
        let mut doc = page.document_mut();
        doc.set_style(modal, "display", "block")?;
        doc.set_attribute(modal, "aria-hidden", "false")?;
        let target = doc.tree().query_selector(modal, &focusable).unwrap_or(modal);
        if let Err(err) = doc.focus(target) {
            tracing::debug!(node = %target, error = %err, "modal focus skipped");
        }
    }

    if page.modals.borrow().contains_key(&modal) {
        return Ok(());
    }

    // Not `once`: clicks inside the dialog leave the backdrop trigger armed
    let backdrop = page.add_event_listener(modal, EventType::Click, ListenerOptions::default(), move |page, event| {
        if event.target() == modal {
            dismiss(page, modal);
        }
    });
    let escape = page.add_event_listener(NodeId::ROOT, EventType::KeyDown, ListenerOptions::default(), move |page, event| {
        if event.as_keyboard().is_some_and(|key| key.key == "Escape") {
            dismiss(page, modal);
        }
    });
    page.modals.borrow_mut().insert(modal, ModalTriggers { backdrop, escape });
    tracing::debug!(node = %modal, "modal opened");
    Ok(())
}

/// Hide a modal and disarm its listeners. Closing a hidden modal does nothing.
pub fn close_modal(page: &Page, modal: NodeId) -> Result<(), ActionError> {
    let triggers = page.modals.borrow_mut().remove(&modal);
    if let Some(triggers) = triggers {
        for id in triggers.listeners() {
            page.remove_event_listener(id);
        }
    } else if !is_modal_open(page, modal) {
        return Ok(());
    }

    let mut doc = page.document_mut();
    doc.set_style(modal, "display", "none")?;
    doc.set_attribute(modal, "aria-hidden", "true")?;
    tracing::debug!(node = %modal, "modal closed");
    Ok(())
}

/// Visible and not hidden from assistive technology
pub fn is_modal_open(page: &Page, modal: NodeId) -> bool {
    let doc = page.document();
    let displayed = doc.style(modal).is_some_and(|s| s.computed("display") != "none");
    displayed && doc.get_attribute(modal, "aria-hidden") != Some("true")
}

fn dismiss(page: &Page, modal: NodeId) {
    if let Err(err) = close_modal(page, modal) {
        tracing::warn!(node = %modal, error = %err, "modal close failed");
    }
}
