//! Built-in actions
//!
//! Each action reads its parameters from `data-*` attributes of the clicked
//! button. Soft failures become feedback messages; only DOM and storage
//! errors are returned.

mod copy;
mod favorite;
mod open_modal;
mod preview;
mod share;

use std::rc::Rc;

use cc_dom::{MouseEvent, NodeId};

use crate::dispatch::ActionHandler;
use crate::feedback::show_temp_message;
use crate::{ActionError, Page};

/// Action names and handlers installed on every page
pub(crate) fn builtins() -> Vec<(&'static str, ActionHandler)> {
    vec![
        ("play-preview", handler(preview::play_preview)),
        ("copy", handler(copy::copy)),
        ("share", handler(share::share)),
        ("favorite", handler(favorite::favorite)),
        ("open-modal", handler(open_modal::open_modal_target)),
    ]
}

fn handler<F>(f: F) -> ActionHandler
where
    F: Fn(&Page, NodeId, &mut MouseEvent) -> Result<(), ActionError> + 'static,
{
    Rc::new(f)
}

fn set_aria_pressed(page: &Page, button: NodeId, pressed: bool) -> Result<(), ActionError> {
    page.document_mut()
        .set_attribute(button, "aria-pressed", if pressed { "true" } else { "false" })?;
    Ok(())
}

/// Non-empty `data-*` value
fn data_param(page: &Page, button: NodeId, key: &str) -> Option<String> {
    page.document()
        .data(button, key)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// Write `text` to the clipboard and report the outcome on `button` once it settles
fn copy_to_clipboard(page: &Page, button: NodeId, text: &str, success: &str, failure: &str) {
    let Some(clipboard) = page.navigator().clipboard.clone() else {
        tracing::warn!(node = %button, "clipboard unavailable");
        show_temp_message(page, button, failure);
        return;
    };

    let write = clipboard.write_text(text);
    let (success, failure) = (success.to_string(), failure.to_string());
    let weak = page.weak();
    page.spawn(async move {
        let result = write.await;
        let Some(page) = weak.upgrade() else { return };
        match result {
            Ok(()) => {
                show_temp_message(&page, button, &success);
            }
            Err(err) => {
                tracing::warn!(node = %button, error = %err, "clipboard write failed");
                show_temp_message(&page, button, &failure);
            }
        }
    });
}
