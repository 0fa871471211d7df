//! Demo: a song page with every built-in action, driven by simulated clicks
//!
//! Usage: `cc-demo [config.json] [local-storage.json]`
//!
//! Set `RUST_LOG=debug` to see listener and timer plumbing.

use std::rc::Rc;

use anyhow::{Context, Result};
use cc_actions::{ContentSwitcher, Dispatcher, Page, PageContent, toggle_dark_mode};
use cc_dom::{DOMRect, Document, NodeId};
use cc_platform::{Config, MemoryClipboard, Navigator, Storage};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => Config::load(&path).with_context(|| format!("loading config from {path}"))?,
        None => Config::default(),
    };
    let storage = match args.next() {
        Some(path) => Storage::local(&path).with_context(|| format!("opening local storage at {path}"))?,
        None => Storage::session(),
    };

    let clipboard = Rc::new(MemoryClipboard::new());
    let navigator = Navigator::minimal()
        .with_clipboard(clipboard.clone())
        .with_local_storage(Rc::new(storage));

    let (document, ids) = build_song_page().context("building demo page")?;
    let page = Page::new(document, navigator, config);
    let actions = Dispatcher::install(&page)?;
    actions.register("print", |page, button, _event| {
        println!("print requested for {}", page.document().title());
        page.document_mut().set_attribute(button, "aria-busy", "true")?;
        Ok(())
    });
    let switcher = ContentSwitcher::new(ids.main)
        .with_page("song", PageContent::new("Chords").paragraph("Am F C G"))
        .with_page("about", PageContent::new("About").paragraph("Chord sheets for everyone"))
        .install(&page)?;
    switcher.show(&page, "song")?;

    println!("cc-actions v{}", cc_actions::VERSION);
    for (label, button) in [
        ("copy", ids.copy),
        ("preview", ids.preview),
        ("favorite", ids.favorite),
        ("share", ids.share),
        ("print", ids.print),
        ("plain", ids.plain),
        ("inline", ids.inline),
        ("open modal", ids.open_modal),
    ] {
        page.click(button);
        page.run_until_idle();
        println!("{label:>10}: {:?}", actions.last_outcome());
    }

    page.key_down("Escape");
    page.click(ids.about_link);
    toggle_dark_mode(&page)?;

    let doc = page.document();
    println!("clipboard: {:?}", clipboard.read_text());
    println!("visible messages: {}", doc.query_selector_all(".cc-temp-msg")?.len());
    println!("current page: {:?}", switcher.current());
    drop(doc);

    page.advance(2_000);
    println!("messages after 2s: {}", page.document().query_selector_all(".cc-temp-msg")?.len());
    Ok(())
}

struct DemoIds {
    main: NodeId,
    about_link: NodeId,
    copy: NodeId,
    preview: NodeId,
    favorite: NodeId,
    share: NodeId,
    print: NodeId,
    plain: NodeId,
    inline: NodeId,
    open_modal: NodeId,
}

fn build_song_page() -> Result<(Document, DemoIds)> {
    let mut doc = Document::new("https://cifras.example/song/42");
    doc.set_title("Garota de Ipanema");
    let body = doc.body();

    let nav = doc.create_element("nav");
    doc.append_child(body, nav)?;
    let mut about_link = NodeId::NONE;
    for id in ["song", "about"] {
        let link = doc.create_element("a");
        doc.set_attribute(link, "data-page", id)?;
        doc.append_child(nav, link)?;
        if id == "about" {
            about_link = link;
        }
    }
    let main = doc.create_element("main");
    doc.append_child(body, main)?;

    let toolbar = doc.create_element("div");
    doc.append_child(body, toolbar)?;
    let mut button = |label: &str, attrs: &[(&str, &str)]| -> Result<NodeId> {
        let button = doc.create_element("button");
        for (name, value) in attrs {
            doc.set_attribute(button, name, value)?;
        }
        let text = doc.create_text(label);
        doc.append_child(button, text)?;
        doc.append_child(toolbar, button)?;
        doc.set_rect(button, DOMRect::from_xywh(0.0, 0.0, 96.0, 32.0))?;
        Ok(button)
    };

    let copy = button("Copy chords", &[("data-action", "copy"), ("data-copy", "Am F C G")])?;
    let preview = button("Preview", &[("data-action", "play-preview"), ("data-src", "ipanema.mp3")])?;
    let favorite = button("Favorite", &[("data-action", "favorite"), ("data-key", "song-42")])?;
    let share = button("Share", &[("data-action", "share")])?;
    let print = button("Print", &[("data-action", "print")])?;
    let plain = button("Transpose", &[])?;
    let inline = button("Inline", &[("onclick", "transpose(+1)"), ("data-action", "copy")])?;
    let open_modal = button("Lyrics", &[("data-action", "open-modal"), ("data-target", "#lyrics")])?;

    let modal = doc.create_element("div");
    doc.set_attribute(modal, "id", "lyrics")?;
    doc.set_attribute(modal, "aria-hidden", "true")?;
    doc.set_style(modal, "display", "none")?;
    doc.append_child(body, modal)?;
    let close = doc.create_element("button");
    doc.set_attribute(close, "data-has-listener", "")?;
    doc.append_child(modal, close)?;

    Ok((
        doc,
        DemoIds {
            main,
            about_link,
            copy,
            preview,
            favorite,
            share,
            print,
            plain,
            inline,
            open_modal,
        },
    ))
}
