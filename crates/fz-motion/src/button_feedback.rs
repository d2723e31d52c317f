//! Button press feedback

use std::collections::BTreeSet;

use fz_dom::{Event, EventType, NodeId};
use fz_runtime::Context;

use crate::error::query_all;
use crate::{Effect, MotionConfig, MotionError};

/// Scales buttons down while pressed
#[derive(Debug)]
pub struct ButtonFeedback {
    lane: u32,
    selector: String,
    transition: String,
    transform: String,
    bound: BTreeSet<NodeId>,
}

impl ButtonFeedback {
    pub fn new(config: &MotionConfig, lane: u32) -> Self {
        Self {
            lane,
            selector: config.button_selector.clone(),
            transition: config.press_transition.clone(),
            transform: config.press_transform.clone(),
            bound: BTreeSet::new(),
        }
    }

    pub fn bound_count(&self) -> usize {
        self.bound.len()
    }
}

impl Effect for ButtonFeedback {
    fn name(&self) -> &'static str {
        "button-feedback"
    }

    fn lane(&self) -> u32 {
        self.lane
    }

    fn init(&mut self, ctx: &mut Context<'_>) -> Result<(), MotionError> {
        let before = self.bound.len();
        self.bound.extend(query_all(&ctx.document, &self.selector)?);
        tracing::debug!("Button feedback bound {} new buttons", self.bound.len() - before);
        Ok(())
    }

    fn handle_event(&mut self, ctx: &mut Context<'_>, event: &mut Event) {
        let button = event.current_target;
        if !self.bound.contains(&button) {
            return;
        }
        match event.event_type {
            EventType::MouseDown => {
                ctx.document.set_style(button, "transition", &self.transition);
                ctx.document.set_style(button, "transform", &self.transform);
            }
            EventType::MouseUp | EventType::MouseLeave | EventType::TouchEnd => {
                ctx.document.set_style(button, "transform", "");
            }
            EventType::KeyDown if event.key.as_deref() == Some("Enter") => {
                ctx.document.set_style(button, "transform", "");
            }
            _ => {}
        }
    }
}
