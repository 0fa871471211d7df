//! Cifras Button Actions
//!
//! Declarative button behaviors for the song pages. A single capturing
//! click listener on the document routes every button click to a named
//! action from `data-action`, or falls back to a ripple and a hint when the
//! button has no action.
//!
//! Features:
//! - Delegated click dispatch with a public action registry
//! - Built-in actions: preview playback, copy, share, favorite, open modal
//! - Modal open/close with escape and backdrop dismissal
//! - Transient feedback messages and ripples
//! - Content switcher for the in-page menu
//!
//! # Example
//!
//! ```rust,no_run
//! use cc_actions::{Dispatcher, Page};
//! use cc_dom::Document;
//! use cc_platform::{Config, Navigator};
//!
//! let mut doc = Document::new("https://cifras.example/song/42");
//! let button = doc.create_element("button");
//! doc.set_attribute(button, "data-action", "copy").unwrap();
//! doc.set_attribute(button, "data-copy", "Am F C G").unwrap();
//! doc.append_child(doc.body(), button).unwrap();
//!
//! let page = Page::new(doc, Navigator::minimal(), Config::default());
//! Dispatcher::install(&page).unwrap();
//! page.click(button);
//! page.run_until_idle();
//! ```

mod actions;
mod content;
mod dispatch;
mod favorites;
mod feedback;
mod listeners;
mod modal;
mod page;

pub use content::{ContentSwitcher, PageContent, toggle_dark_mode, toggle_sidebar};
pub use dispatch::{ActionHandler, ActionRegistry, DispatchOutcome, Dispatcher};
pub use favorites::Favorites;
pub use feedback::{ripple, show_temp_message, show_temp_message_for};
pub use listeners::{ListenerFn, ListenerId};
pub use modal::{close_modal, is_modal_open, open_modal};
pub use page::{ButtonState, Event, Page};

pub use cc_dom::{DomError, NodeId};
pub use cc_platform::PlatformError;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Action handler error
#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    #[error("DOM error: {0}")]
    Dom(#[from] DomError),

    #[error(transparent)]
    Platform(#[from] PlatformError),

    #[error("Favorites record is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Handler(String),
}

impl ActionError {
    /// Error from a user-registered handler
    pub fn handler(message: impl Into<String>) -> Self {
        Self::Handler(message.into())
    }
}
