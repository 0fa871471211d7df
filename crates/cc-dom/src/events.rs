//! Events
//!
//! Mouse and keyboard event values plus listener options. Propagation
//! itself is driven by whoever owns the listeners.

use crate::NodeId;

/// Event type identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    Click,
    KeyDown,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Click => "click",
            Self::KeyDown => "keydown",
        }
    }
}

/// Propagation phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EventPhase {
    #[default]
    None,
    Capturing,
    AtTarget,
    Bubbling,
}

/// Listener registration options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListenerOptions {
    pub capture: bool,
    pub once: bool,
}

impl ListenerOptions {
    pub fn capture() -> Self {
        Self { capture: true, ..Default::default() }
    }

    pub fn once() -> Self {
        Self { once: true, ..Default::default() }
    }
}

/// State shared by every event kind
#[derive(Debug, Clone)]
struct EventState {
    target: NodeId,
    current_target: NodeId,
    phase: EventPhase,
    bubbles: bool,
    cancelable: bool,
    default_prevented: bool,
    propagation_stopped: bool,
}

impl EventState {
    fn new(target: NodeId) -> Self {
        Self {
            target,
            current_target: NodeId::NONE,
            phase: EventPhase::None,
            bubbles: true,
            cancelable: true,
            default_prevented: false,
            propagation_stopped: false,
        }
    }
}

macro_rules! event_state_accessors {
    ($ty:ty) => {
        impl $ty {
            /// Node the event was dispatched to
            pub fn target(&self) -> NodeId {
                self.state.target
            }

            /// Node whose listener is currently running
            pub fn current_target(&self) -> NodeId {
                self.state.current_target
            }

            pub fn phase(&self) -> EventPhase {
                self.state.phase
            }

            pub fn bubbles(&self) -> bool {
                self.state.bubbles
            }

            /// Prevent default action (ignored for non-cancelable events)
            pub fn prevent_default(&mut self) {
                if self.state.cancelable {
                    self.state.default_prevented = true;
                }
            }

            pub fn is_default_prevented(&self) -> bool {
                self.state.default_prevented
            }

            pub fn stop_propagation(&mut self) {
                self.state.propagation_stopped = true;
            }

            pub fn is_propagation_stopped(&self) -> bool {
                self.state.propagation_stopped
            }

            /// Update the propagation cursor
            pub fn set_current(&mut self, node: NodeId, phase: EventPhase) {
                self.state.current_target = node;
                self.state.phase = phase;
            }
        }
    };
}

/// Mouse event
#[derive(Debug, Clone)]
pub struct MouseEvent {
    pub event_type: EventType,

    // Viewport coordinates
    pub client_x: f64,
    pub client_y: f64,

    state: EventState,
}

event_state_accessors!(MouseEvent);

impl MouseEvent {
    /// Create a click at viewport coordinates
    pub fn click(target: NodeId, x: f64, y: f64) -> Self {
        Self {
            event_type: EventType::Click,
            client_x: x,
            client_y: y,
            state: EventState::new(target),
        }
    }
}

/// Keyboard event
#[derive(Debug, Clone)]
pub struct KeyboardEvent {
    pub event_type: EventType,
    /// Key value, e.g. `"Escape"` or `"a"`
    pub key: String,
    state: EventState,
}

event_state_accessors!(KeyboardEvent);

impl KeyboardEvent {
    pub fn key_down(target: NodeId, key: &str) -> Self {
        Self {
            event_type: EventType::KeyDown,
            key: key.to_string(),
            state: EventState::new(target),
        }
    }
}
