//! Feedback utilities
//!
//! Transient message bubbles and click ripples. Both are plain child
//! elements that free themselves on a timer; freeing one that is already
//! gone is harmless.

use cc_dom::{DOMRect, Document, DomError, MouseEvent, NodeId};

use crate::Page;

const MESSAGE_CLASS: &str = "cc-temp-msg";
const RIPPLE_CLASS: &str = "cc-ripple";

const MESSAGE_STYLE: &[(&str, &str)] = &[
    ("position", "absolute"),
    ("top", "-2.4em"),
    ("left", "50%"),
    ("transform", "translateX(-50%)"),
    ("background", "#222"),
    ("color", "#fff"),
    ("padding", "4px 8px"),
    ("border-radius", "4px"),
    ("font-size", "12px"),
    ("pointer-events", "none"),
    ("z-index", "9999"),
    ("opacity", "0"),
    ("transition", "opacity 150ms"),
];

/// Show `text` above `anchor` for the configured duration
pub fn show_temp_message(page: &Page, anchor: NodeId, text: &str) -> Option<NodeId> {
    show_temp_message_for(page, anchor, text, page.config().message_duration_ms)
}

/// Show `text` above `anchor` for `duration_ms`, then fade it out and remove it.
///
/// Returns the message element, or `None` if `anchor` is not an element.
pub fn show_temp_message_for(page: &Page, anchor: NodeId, text: &str, duration_ms: u64) -> Option<NodeId> {
    let built = build_message(&mut page.document_mut(), anchor, text);
    let tip = match built {
        Ok(tip) => tip,
        Err(err) => {
            tracing::warn!(node = %anchor, error = %err, "cannot attach feedback message");
            return None;
        }
    };
    tracing::debug!(node = %anchor, text, duration_ms, "feedback message");

    page.request_animation_frame(move |page| set_style_or_skip(page, tip, "opacity", "1"));
    let fade_ms = page.config().message_fade_ms;
    page.set_timeout(duration_ms, move |page| {
        set_style_or_skip(page, tip, "opacity", "0");
        page.set_timeout(fade_ms, move |page| {
            page.release(tip);
        });
    });
    Some(tip)
}

fn build_message(doc: &mut Document, anchor: NodeId, text: &str) -> Result<NodeId, DomError> {
    doc.tree().element(anchor)?;
    let tip = doc.create_element("div");
    doc.set_attribute(tip, "class", MESSAGE_CLASS)?;
    doc.set_text_content(tip, text)?;
    for (property, value) in MESSAGE_STYLE {
        doc.set_style(tip, property, value)?;
    }
    ensure_positioned(doc, anchor)?;
    doc.append_child(anchor, tip)?;
    Ok(tip)
}

/// Ripple from the click point; any failure is ignored
pub fn ripple(page: &Page, button: NodeId, event: &MouseEvent) {
    let scale = page.config().ripple_scale;
    let built = build_ripple(&mut page.document_mut(), button, event, scale);
    let wave = match built {
        Ok(wave) => wave,
        Err(err) => {
            tracing::debug!(node = %button, error = %err, "ripple skipped");
            return;
        }
    };

    page.request_animation_frame(move |page| {
        set_style_or_skip(page, wave, "transform", "scale(1)");
        set_style_or_skip(page, wave, "opacity", "0");
    });
    page.set_timeout(page.config().ripple_duration_ms, move |page| {
        page.release(wave);
    });
}

fn build_ripple(doc: &mut Document, button: NodeId, event: &MouseEvent, scale: f64) -> Result<NodeId, DomError> {
    let rect: DOMRect = doc.bounding_client_rect(button)?;
    let size = rect.width.max(rect.height) * scale;
    let x = event.client_x - rect.left() - size / 2.0;
    let y = event.client_y - rect.top() - size / 2.0;

    let wave = doc.create_element("span");
    doc.set_attribute(wave, "class", RIPPLE_CLASS)?;
    for (property, value) in [
        ("position", "absolute".to_string()),
        ("pointer-events", "none".to_string()),
        ("width", px(size)),
        ("height", px(size)),
        ("left", px(x)),
        ("top", px(y)),
        ("border-radius", "50%".to_string()),
        ("background", "rgba(0,0,0,0.15)".to_string()),
        ("transform", "scale(0)".to_string()),
        ("transition", "transform 500ms, opacity 500ms".to_string()),
    ] {
        doc.set_style(wave, property, &value)?;
    }
    ensure_positioned(doc, button)?;
    doc.append_child(button, wave)?;
    Ok(wave)
}

fn px(value: f64) -> String {
    format!("{value}px")
}

/// Positioned children need a non-static parent
fn ensure_positioned(doc: &mut Document, node: NodeId) -> Result<(), DomError> {
    let is_static = doc.style(node).is_some_and(|s| s.computed("position") == "static");
    if is_static {
        doc.set_style(node, "position", "relative")?;
    }
    Ok(())
}

fn set_style_or_skip(page: &Page, node: NodeId, property: &str, value: &str) {
    // the element may have been removed by the page meanwhile
    let _ = page.document_mut().set_style(node, property, value);
}
