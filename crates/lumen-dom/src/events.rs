//! UI Events
//!
//! Focus, keyboard and click events forwarded by the host.

use crate::NodeId;

/// Event types a listener can register for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    FocusIn,
    KeyDown,
    Click,
}

/// Registered listener handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub(crate) u32);

/// Keyboard event data
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyboardEvent {
    /// `KeyboardEvent.key`
    pub key: String,
    pub alt_key: bool,
    pub ctrl_key: bool,
    pub shift_key: bool,
    pub meta_key: bool,
}

impl KeyboardEvent {
    pub fn new(key: &str) -> Self {
        Self {
            key: key.to_string(),
            ..Default::default()
        }
    }

    /// `Alt` + `key`
    pub fn alt(key: &str) -> Self {
        Self {
            key: key.to_string(),
            alt_key: true,
            ..Default::default()
        }
    }

    /// Case-insensitive key comparison
    pub fn is_key(&self, key: &str) -> bool {
        self.key.eq_ignore_ascii_case(key)
    }

    /// Only Alt is held
    pub fn alt_only(&self) -> bool {
        self.alt_key && !self.ctrl_key && !self.meta_key
    }
}

/// An event dispatched at a node
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    FocusIn { target: NodeId },
    KeyDown { target: NodeId, event: KeyboardEvent },
    Click { target: NodeId },
}

impl UiEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::FocusIn { .. } => EventKind::FocusIn,
            Self::KeyDown { .. } => EventKind::KeyDown,
            Self::Click { .. } => EventKind::Click,
        }
    }

    pub fn target(&self) -> NodeId {
        match self {
            Self::FocusIn { target } | Self::KeyDown { target, .. } | Self::Click { target } => {
                *target
            }
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Listener {
    pub(crate) id: ListenerId,
    pub(crate) target: NodeId,
    pub(crate) kind: EventKind,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_kind_and_target() {
        let event = UiEvent::KeyDown {
            target: NodeId(3),
            event: KeyboardEvent::alt("r"),
        };
        assert_eq!(event.kind(), EventKind::KeyDown);
        assert_eq!(event.target(), NodeId(3));
    }

    #[test]
    fn test_keyboard_modifiers() {
        let event = KeyboardEvent::alt("R");
        assert!(event.is_key("r"));
        assert!(event.alt_only());

        let event = KeyboardEvent {
            ctrl_key: true,
            ..KeyboardEvent::alt("r")
        };
        assert!(!event.alt_only());
        assert!(!KeyboardEvent::new("r").alt_only());
    }
}
