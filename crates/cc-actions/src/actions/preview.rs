//! `play-preview`: toggle a short audio preview from `data-src`

use cc_dom::{MouseEvent, NodeId};

use super::{data_param, set_aria_pressed};
use crate::feedback::show_temp_message;
use crate::{ActionError, Page};

pub(crate) fn play_preview(page: &Page, button: NodeId, _event: &mut MouseEvent) -> Result<(), ActionError> {
    let Some(src) = data_param(page, button, "src") else {
        show_temp_message(page, button, &page.config().messages.preview_unavailable);
        return Ok(());
    };

    let audio = page.preview_audio_or_create(button, &src);
    if !audio.is_paused() {
        audio.pause();
        return set_aria_pressed(page, button, false);
    }

    let playback = audio.play();
    set_aria_pressed(page, button, true)?;
    let failure = page.config().messages.preview_error.clone();
    let weak = page.weak();
    page.spawn(async move {
        if let Err(err) = playback.await {
            tracing::warn!(node = %button, %src, error = %err, "preview playback failed");
            if let Some(page) = weak.upgrade() {
                show_temp_message(&page, button, &failure);
            }
        }
    });
    Ok(())
}
