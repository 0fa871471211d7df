//! Web Share API
//!
//! Native sharing functionality (`navigator.share`).

use std::cell::{Cell, RefCell};

use crate::{PlatformError, PlatformFuture};

/// Share data
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShareData {
    pub title: Option<String>,
    pub text: Option<String>,
    pub url: Option<String>,
}

impl ShareData {
    /// Must have at least one of title, text or url
    pub fn is_shareable(&self) -> bool {
        self.title.is_some() || self.text.is_some() || self.url.is_some()
    }
}

/// Native share sheet
pub trait ShareSheet {
    /// Present the sheet; rejects when the user dismisses it
    fn share(&self, data: ShareData) -> PlatformFuture<()>;
}

/// Share sheet that records requests instead of showing UI
#[derive(Debug, Default)]
pub struct MemoryShareSheet {
    shared: RefCell<Vec<ShareData>>,
    cancel: Cell<bool>,
}

impl MemoryShareSheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sheet whose user always dismisses it
    pub fn cancelling() -> Self {
        let sheet = Self::default();
        sheet.cancel.set(true);
        sheet
    }

    /// Completed shares
    pub fn shared(&self) -> Vec<ShareData> {
        self.shared.borrow().clone()
    }
}

impl ShareSheet for MemoryShareSheet {
    fn share(&self, data: ShareData) -> PlatformFuture<()> {
        let result = if !data.is_shareable() {
            Err(PlatformError::InvalidShareData)
        } else if self.cancel.get() {
            Err(PlatformError::ShareCancelled)
        } else {
            self.shared.borrow_mut().push(data);
            Ok(())
        };
        Box::pin(smol::future::ready(result))
    }
}
