//! `open-modal`: open the element matched by `data-target`

use cc_dom::{MouseEvent, NodeId};

use super::data_param;
use crate::feedback::show_temp_message;
use crate::modal::open_modal;
use crate::{ActionError, Page};

pub(crate) fn open_modal_target(page: &Page, button: NodeId, _event: &mut MouseEvent) -> Result<(), ActionError> {
    let messages = &page.config().messages;
    let Some(selector) = data_param(page, button, "target") else {
        show_temp_message(page, button, &messages.modal_unspecified);
        return Ok(());
    };

    let found = page.document().query_selector(&selector);
    match found {
        Ok(Some(modal)) => open_modal(page, modal),
        Ok(None) => {
            show_temp_message(page, button, &messages.modal_not_found);
            Ok(())
        }
        Err(err) => {
            tracing::debug!(node = %button, %selector, error = %err, "unusable modal selector");
            show_temp_message(page, button, &messages.modal_not_found);
            Ok(())
        }
    }
}
