//! Async tails settle in resolution order and never block dispatch

mod common;

use std::rc::Rc;

use cc_actions::{Dispatcher, NodeId, Page};
use cc_dom::Document;
use cc_platform::{Config, MemoryShareSheet, Navigator};
use common::{DeferredAudioBackend, DeferredClipboard, add_button, messages_on};

fn deferred_page(build: impl FnOnce(&mut Document)) -> (Rc<Page>, Rc<DeferredClipboard>) {
    let mut doc = Document::new("https://cifras.example/song/42");
    build(&mut doc);
    let clipboard = Rc::new(DeferredClipboard::new());
    let page = Page::new(doc, Navigator::minimal().with_clipboard(clipboard.clone()), Config::default());
    Dispatcher::install(&page).unwrap();
    (page, clipboard)
}

#[test]
fn test_tails_follow_resolution_order() {
    let mut first = NodeId::NONE;
    let mut second = NodeId::NONE;
    let (page, clipboard) = deferred_page(|doc| {
        first = add_button(doc, &[("data-action", "copy"), ("data-copy", "verse")]);
        second = add_button(doc, &[("data-action", "copy"), ("data-copy", "chorus")]);
    });

    page.click(first);
    page.click(second);
    page.run_until_idle();
    assert_eq!(clipboard.requests(), ["verse", "chorus"]);
    assert!(messages_on(&page, first).is_empty());
    assert!(messages_on(&page, second).is_empty());

    clipboard.settle(1, true);
    page.run_until_idle();
    assert!(messages_on(&page, first).is_empty());
    assert_eq!(messages_on(&page, second), ["Copiado"]);

    clipboard.settle(0, false);
    page.run_until_idle();
    assert_eq!(messages_on(&page, first), ["Falha ao copiar"]);
}

#[test]
fn test_clicks_keep_flowing_while_tails_pend() {
    let mut copy = NodeId::NONE;
    let mut favorite = NodeId::NONE;
    let (page, clipboard) = deferred_page(|doc| {
        copy = add_button(doc, &[("data-action", "copy"), ("data-copy", "Am")]);
        favorite = add_button(doc, &[("data-action", "favorite")]);
    });

    page.click(copy);
    page.click(favorite);
    assert_eq!(page.document().get_attribute(favorite, "aria-pressed"), Some("true"));

    clipboard.settle(0, true);
    page.advance(16);
    assert_eq!(messages_on(&page, copy), ["Copiado"]);
}

#[test]
fn test_dropping_the_page_abandons_tails() {
    let mut button = NodeId::NONE;
    let (page, clipboard) = deferred_page(|doc| button = add_button(doc, &[("data-action", "copy"), ("data-copy", "Am")]));

    page.click(button);
    page.run_until_idle();
    assert!(!clipboard.is_abandoned(0));

    drop(page);
    assert!(clipboard.is_abandoned(0));
    clipboard.settle(0, true);
}

#[test]
fn test_share_rejection_arrives_later() {
    let mut doc = Document::new("https://cifras.example/song/42");
    let button = add_button(&mut doc, &[("data-action", "share"), ("data-url", "?key=G")]);
    let sheet = Rc::new(MemoryShareSheet::cancelling());
    let page = Page::new(doc, Navigator::minimal().with_share(sheet), Config::default());
    Dispatcher::install(&page).unwrap();

    page.click(button);
    assert!(messages_on(&page, button).is_empty());
    page.run_until_idle();
    assert_eq!(messages_on(&page, button), ["Compartilhamento cancelado"]);
}

#[test]
fn test_preview_toggles_before_playback_confirms() {
    let mut doc = Document::new("https://cifras.example/song/42");
    let button = add_button(&mut doc, &[("data-action", "play-preview"), ("data-src", "intro.mp3")]);
    let backend = Rc::new(DeferredAudioBackend::default());
    let page = Page::new(doc, Navigator::minimal().with_audio(backend.clone()), Config::default());
    Dispatcher::install(&page).unwrap();

    page.click(button);
    page.run_until_idle();
    assert_eq!(page.document().get_attribute(button, "aria-pressed"), Some("true"));

    page.click(button);
    page.run_until_idle();
    let created = backend.created();
    assert_eq!(created.len(), 1);
    assert_eq!((created[0].plays(), created[0].pauses()), (1, 1));
    assert_eq!(page.document().get_attribute(button, "aria-pressed"), Some("false"));
}
