//! Smooth anchor scrolling

use std::collections::BTreeSet;

use fz_dom::{Event, EventType, NodeId};
use fz_runtime::{Context, ScrollBehavior};

use crate::error::query_all;
use crate::{Effect, MotionConfig, MotionError};

/// In-page links scroll smoothly to their target instead of jumping
#[derive(Debug)]
pub struct AnchorScroll {
    lane: u32,
    selector: String,
    bound: BTreeSet<NodeId>,
}

impl AnchorScroll {
    pub fn new(config: &MotionConfig, lane: u32) -> Self {
        Self {
            lane,
            selector: config.anchor_selector.clone(),
            bound: BTreeSet::new(),
        }
    }

    pub fn is_bound(&self, anchor: NodeId) -> bool {
        self.bound.contains(&anchor)
    }
}

impl Effect for AnchorScroll {
    fn name(&self) -> &'static str {
        "anchor-smooth"
    }

    fn lane(&self) -> u32 {
        self.lane
    }

    fn init(&mut self, ctx: &mut Context<'_>) -> Result<(), MotionError> {
        for anchor in query_all(&ctx.document, &self.selector)? {
            let href = ctx.document.get_attr(anchor, "href").unwrap_or("");
            if href.is_empty() || href == "#" {
                continue;
            }
            if self.bound.insert(anchor) {
                tracing::debug!("Smooth scroll bound to {}", href);
            }
        }
        Ok(())
    }

    fn handle_event(&mut self, ctx: &mut Context<'_>, event: &mut Event) {
        if event.event_type != EventType::Click || !self.bound.contains(&event.current_target) {
            return;
        }
        let Some(href) = ctx.document.get_attr(event.current_target, "href").map(str::to_string) else {
            return;
        };
        // A malformed fragment is not an error, the browser just jumps
        let target = match ctx.document.query_selector(&href) {
            Ok(Some(target)) => target,
            Ok(None) => return,
            Err(err) => {
                tracing::debug!("Ignoring anchor {:?}: {}", href, err);
                return;
            }
        };
        event.prevent_default();
        ctx.scroll_into_view(target, ScrollBehavior::Smooth);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fz_dom::{DOMRect, Document};
    use fz_runtime::{Host, Storage, Window};

    fn page() -> (Host, Vec<NodeId>) {
        let mut document = Document::default();
        let body = document.body();
        let nav = document.append_element(body, "nav", &[]);
        let good = document.append_element(nav, "a", &[("href", "#contact")]);
        let empty = document.append_element(nav, "a", &[("href", "#")]);
        let broken = document.append_element(nav, "a", &[("href", "#1st")]);
        let missing = document.append_element(nav, "a", &[("href", "#nowhere")]);
        let contact = document.append_element(body, "section", &[("id", "contact")]);
        document.set_rect(contact, DOMRect::from_xywh(0.0, 2400.0, 1280.0, 600.0));
        let host = Host::new(document, Window::default(), Storage::session());
        (host, vec![good, empty, broken, missing])
    }

    fn click(host: &mut Host, anchors: &mut AnchorScroll, anchor: NodeId) -> Event {
        let mut event = Event::click(anchor);
        anchors.handle_event(&mut Context::new(host, 0), &mut event);
        event
    }

    #[test]
    fn test_binds_real_fragments_only() {
        let (mut host, links) = page();
        let mut anchors = AnchorScroll::new(&MotionConfig::default(), 3);
        anchors.init(&mut Context::new(&mut host, 0)).unwrap();
        assert!(anchors.is_bound(links[0]));
        assert!(!anchors.is_bound(links[1]));
        assert!(anchors.is_bound(links[2]));
    }

    #[test]
    fn test_click_smooth_scrolls() {
        let (mut host, links) = page();
        let mut anchors = AnchorScroll::new(&MotionConfig::default(), 3);
        anchors.init(&mut Context::new(&mut host, 0)).unwrap();

        let event = click(&mut host, &mut anchors, links[0]);
        assert!(event.is_default_prevented());
        assert!(host.window.is_smooth_scrolling());
    }

    #[test]
    fn test_unresolvable_targets_keep_default() {
        let (mut host, links) = page();
        let mut anchors = AnchorScroll::new(&MotionConfig::default(), 3);
        anchors.init(&mut Context::new(&mut host, 0)).unwrap();

        assert!(!click(&mut host, &mut anchors, links[2]).is_default_prevented());
        assert!(!click(&mut host, &mut anchors, links[3]).is_default_prevented());
        assert!(!host.window.is_smooth_scrolling());
    }
}
