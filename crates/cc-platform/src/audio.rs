//! Audio playback
//!
//! `new Audio(src)` style handles used for song previews.

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use crate::{PlatformError, PlatformFuture};

/// A playable audio resource
pub trait AudioHandle {
    fn src(&self) -> String;

    /// The `paused` flag: cleared by `play` as soon as it is called, set
    /// again by `pause` or when playback fails
    fn is_paused(&self) -> bool;

    /// Request playback. The flag flips before this returns; the future
    /// resolves once playback actually began or failed.
    fn play(&self) -> PlatformFuture<()>;

    fn pause(&self);
}

/// Creates audio handles
pub trait AudioBackend {
    fn create(&self, src: &str) -> Rc<dyn AudioHandle>;
}

/// Playback state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    #[default]
    Idle,
    Loading,
    Ready,
    Playing,
    Paused,
    Error,
}

/// Media element state machine
#[derive(Debug)]
pub struct MediaElement {
    pub state: PlaybackState,
    pub src: String,
    /// Whether playback is requested; independent of whether data arrived
    pub paused: bool,
}

impl Default for MediaElement {
    fn default() -> Self {
        Self {
            state: PlaybackState::Idle,
            src: String::new(),
            paused: true,
        }
    }
}

impl MediaElement {
    pub fn audio(src: &str) -> Self {
        let mut element = Self::default();
        element.set_src(src);
        element
    }

    pub fn set_src(&mut self, src: &str) {
        self.src = src.to_string();
        self.state = PlaybackState::Loading;
    }

    /// Data arrived; starts playback if it was already requested
    pub fn on_can_play(&mut self) {
        if self.state == PlaybackState::Loading {
            self.state = if self.paused { PlaybackState::Ready } else { PlaybackState::Playing };
        }
    }

    /// Request playback. While loading the request stays pending until `on_can_play`.
    pub fn play(&mut self) -> Result<(), PlatformError> {
        match self.state {
            PlaybackState::Ready | PlaybackState::Paused => {
                self.paused = false;
                self.state = PlaybackState::Playing;
                Ok(())
            }
            PlaybackState::Loading | PlaybackState::Playing => {
                self.paused = false;
                Ok(())
            }
            state => {
                self.paused = true;
                Err(PlatformError::Playback(format!("cannot play from {state:?}")))
            }
        }
    }

    pub fn pause(&mut self) {
        self.paused = true;
        if self.state == PlaybackState::Playing {
            self.state = PlaybackState::Paused;
        }
    }

    pub fn on_error(&mut self) {
        self.state = PlaybackState::Error;
        self.paused = true;
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }
}

/// In-process audio handle; sources "load" instantly
#[derive(Debug)]
pub struct MemoryAudio {
    element: RefCell<MediaElement>,
    broken: bool,
}

impl MemoryAudio {
    pub fn new(src: &str, broken: bool) -> Self {
        Self {
            element: RefCell::new(MediaElement::audio(src)),
            broken,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.element.borrow().state
    }
}

impl AudioHandle for MemoryAudio {
    fn src(&self) -> String {
        self.element.borrow().src.clone()
    }

    fn is_paused(&self) -> bool {
        self.element.borrow().paused
    }

    fn play(&self) -> PlatformFuture<()> {
        let mut element = self.element.borrow_mut();
        let result = element.play().and_then(|()| {
            if self.broken {
                element.on_error();
                Err(PlatformError::Playback(format!("unsupported source {}", element.src)))
            } else {
                element.on_can_play();
                Ok(())
            }
        });
        Box::pin(smol::future::ready(result))
    }

    fn pause(&self) {
        self.element.borrow_mut().pause();
    }
}

/// Backend handing out `MemoryAudio` handles and remembering them
#[derive(Debug, Default)]
pub struct MemoryAudioBackend {
    created: RefCell<Vec<Rc<MemoryAudio>>>,
    broken_sources: RefCell<HashSet<String>>,
}

impl MemoryAudioBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every handle created for `src` fail to play
    pub fn break_source(&self, src: &str) {
        self.broken_sources.borrow_mut().insert(src.to_string());
    }

    /// Every handle created so far, oldest first
    pub fn created(&self) -> Vec<Rc<MemoryAudio>> {
        self.created.borrow().clone()
    }
}

impl AudioBackend for MemoryAudioBackend {
    fn create(&self, src: &str) -> Rc<dyn AudioHandle> {
        let broken = self.broken_sources.borrow().contains(src);
        let audio = Rc::new(MemoryAudio::new(src, broken));
        self.created.borrow_mut().push(audio.clone());
        tracing::debug!(src, broken, "audio handle created");
        audio
    }
}
