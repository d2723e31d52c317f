//! DOM Events
//!
//! Input, form and lifecycle events delivered to page controllers.
//! Window-level events (scroll, resize, load) target the document node.

use crate::NodeId;

/// DOM event types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventType {
    Click,
    MouseDown,
    MouseUp,
    MouseLeave,
    TouchEnd,
    KeyDown,
    Submit,
    Scroll,
    Resize,
    DOMContentLoaded,
    Load,
}

/// DOM event
#[derive(Debug, Clone)]
pub struct Event {
    pub event_type: EventType,
    pub target: NodeId,
    /// Node whose listeners are currently running
    pub current_target: NodeId,
    /// `KeyboardEvent.key` for key events
    pub key: Option<String>,
    pub bubbles: bool,
    pub cancelable: bool,
    pub timestamp: f64,
    default_prevented: bool,
    propagation_stopped: bool,
}

impl Event {
    /// Create an event with the browser's default bubbling/cancelable flags
    pub fn new(event_type: EventType, target: NodeId) -> Self {
        let (bubbles, cancelable) = match event_type {
            EventType::Click | EventType::MouseDown | EventType::MouseUp => (true, true),
            EventType::TouchEnd | EventType::KeyDown | EventType::Submit => (true, true),
            EventType::DOMContentLoaded => (true, false),
            EventType::MouseLeave | EventType::Scroll | EventType::Resize | EventType::Load => {
                (false, false)
            }
        };
        Self {
            event_type,
            target,
            current_target: target,
            key: None,
            bubbles,
            cancelable,
            timestamp: 0.0,
            default_prevented: false,
            propagation_stopped: false,
        }
    }

    pub fn click(target: NodeId) -> Self {
        Self::new(EventType::Click, target)
    }

    pub fn key_down(target: NodeId, key: &str) -> Self {
        let mut event = Self::new(EventType::KeyDown, target);
        event.key = Some(key.to_string());
        event
    }

    pub fn submit(form: NodeId) -> Self {
        Self::new(EventType::Submit, form)
    }

    pub fn scroll() -> Self {
        Self::new(EventType::Scroll, NodeId::ROOT)
    }

    pub fn resize() -> Self {
        Self::new(EventType::Resize, NodeId::ROOT)
    }

    pub fn content_loaded() -> Self {
        Self::new(EventType::DOMContentLoaded, NodeId::ROOT)
    }

    pub fn load() -> Self {
        Self::new(EventType::Load, NodeId::ROOT)
    }

    pub fn with_timestamp(mut self, timestamp: f64) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// True if the event is of `event_type` and currently at `node`
    pub fn is_at(&self, event_type: EventType, node: NodeId) -> bool {
        self.event_type == event_type && self.current_target == node
    }

    /// Prevent default action
    pub fn prevent_default(&mut self) {
        if self.cancelable {
            self.default_prevented = true;
        }
    }

    /// Stop propagation to further nodes on the path
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }

    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }
}
