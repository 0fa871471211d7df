//! Cifras platform capabilities
//!
//! Browser services the button runtime consumes, expressed as traits so a
//! host can plug in a webview bridge, the OS, or test doubles.
//!
//! Features:
//! - Clipboard text writes
//! - Native share sheet
//! - Audio preview playback
//! - Key-value storage (session and file-backed local storage)
//! - Virtual-clock timers and animation frames
//! - Runtime configuration

mod audio;
mod clipboard;
mod config;
mod navigator;
mod share;
mod storage;
mod timers;

pub use audio::{AudioBackend, AudioHandle, MediaElement, MemoryAudio, MemoryAudioBackend, PlaybackState};
pub use clipboard::{Clipboard, MemoryClipboard};
pub use config::{Config, Messages};
pub use navigator::Navigator;
pub use share::{MemoryShareSheet, ShareData, ShareSheet};
pub use storage::{KeyValueStore, Storage};
pub use timers::{Timer, TimerCallback, TimerId, TimerQueue, FRAME_INTERVAL_MS};

/// Future returned by asynchronous capabilities. Single-threaded, so not `Send`.
pub type PlatformFuture<T> = smol::future::BoxedLocal<Result<T, PlatformError>>;

/// Platform error
#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    #[error("{0} is not available")]
    Unavailable(&'static str),

    #[error("Clipboard write rejected: {0}")]
    ClipboardRejected(String),

    #[error("Share cancelled")]
    ShareCancelled,

    #[error("Nothing to share")]
    InvalidShareData,

    #[error("Playback failed: {0}")]
    Playback(String),

    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
