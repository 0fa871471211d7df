//! `share`: native share sheet, or copy the link when there is none

use cc_dom::{MouseEvent, NodeId};
use cc_platform::ShareData;
use url::Url;

use super::{copy_to_clipboard, data_param};
use crate::feedback::show_temp_message;
use crate::{ActionError, Page};

pub(crate) fn share(page: &Page, button: NodeId, _event: &mut MouseEvent) -> Result<(), ActionError> {
    let (url, title) = {
        let doc = page.document();
        let url = resolve_url(doc.url(), data_param(page, button, "url").as_deref());
        let title = data_param(page, button, "title").unwrap_or_else(|| doc.title().to_string());
        (url, title)
    };
    let messages = &page.config().messages;

    let Some(sheet) = page.navigator().share.clone() else {
        copy_to_clipboard(page, button, &url, &messages.link_copied, &messages.share_failed);
        return Ok(());
    };

    let request = sheet.share(ShareData {
        title: Some(title),
        text: None,
        url: Some(url),
    });
    let cancelled = messages.share_cancelled.clone();
    let weak = page.weak();
    page.spawn(async move {
        if let Err(err) = request.await {
            tracing::debug!(node = %button, error = %err, "share dismissed");
            if let Some(page) = weak.upgrade() {
                show_temp_message(&page, button, &cancelled);
            }
        }
    });
    Ok(())
}

/// `data-url` relative to the document, or the document URL itself
fn resolve_url(document_url: &str, target: Option<&str>) -> String {
    let Some(target) = target else {
        return document_url.to_string();
    };
    match Url::parse(document_url).and_then(|base| base.join(target)) {
        Ok(url) => url.into(),
        Err(err) => {
            tracing::debug!(target, error = %err, "share url left unresolved");
            target.to_string()
        }
    }
}
