//! `copy`: put `data-copy`, the button label or its `value` on the clipboard

use cc_dom::{MouseEvent, NodeId};

use super::copy_to_clipboard;
use crate::feedback::show_temp_message;
use crate::{ActionError, Page};

pub(crate) fn copy(page: &Page, button: NodeId, _event: &mut MouseEvent) -> Result<(), ActionError> {
    let text = text_to_copy(page, button);
    let messages = &page.config().messages;
    if text.is_empty() {
        show_temp_message(page, button, &messages.nothing_to_copy);
        return Ok(());
    }
    copy_to_clipboard(page, button, &text, &messages.copied, &messages.copy_failed);
    Ok(())
}

fn text_to_copy(page: &Page, button: NodeId) -> String {
    let doc = page.document();
    [
        doc.data(button, "copy").map(str::to_string),
        Some(doc.inner_text(button)),
        doc.get_attribute(button, "value").map(str::to_string),
    ]
    .into_iter()
    .flatten()
    .find(|text| !text.is_empty())
    .unwrap_or_default()
}
