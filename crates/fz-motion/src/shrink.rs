//! Navbar shrink

use fz_dom::{Event, EventType, NodeId};
use fz_runtime::Context;

use crate::error::query_one;
use crate::{Effect, MotionConfig, MotionError};

pub const SHRINK_CLASS: &str = "shrink";

/// Toggles `shrink` on the page header once the page scrolls past a
/// threshold
#[derive(Debug)]
pub struct NavbarShrink {
    lane: u32,
    selectors: Vec<String>,
    threshold: f64,
    header: Option<NodeId>,
}

impl NavbarShrink {
    pub fn new(config: &MotionConfig, lane: u32) -> Self {
        Self {
            lane,
            selectors: config.header_selectors.clone(),
            threshold: config.shrink_threshold,
            header: None,
        }
    }

    pub fn header(&self) -> Option<NodeId> {
        self.header
    }

    fn update(&self, ctx: &mut Context<'_>) {
        if let Some(header) = self.header {
            let shrink = ctx.window.scroll_y() > self.threshold;
            ctx.document.toggle_class(header, SHRINK_CLASS, Some(shrink));
        }
    }
}

impl Effect for NavbarShrink {
    fn name(&self) -> &'static str {
        "navbar-shrink"
    }

    fn lane(&self) -> u32 {
        self.lane
    }

    fn init(&mut self, ctx: &mut Context<'_>) -> Result<(), MotionError> {
        let mut header = None;
        for selector in &self.selectors {
            header = query_one(&ctx.document, selector)?;
            if header.is_some() {
                break;
            }
        }
        let Some(header) = header else {
            return Ok(());
        };
        self.header = Some(header);
        self.update(ctx);
        Ok(())
    }

    fn handle_event(&mut self, ctx: &mut Context<'_>, event: &mut Event) {
        if event.is_at(EventType::Scroll, NodeId::ROOT) {
            self.update(ctx);
        }
    }
}
