//! Visibility observer
//!
//! One-shot visibility: each watched element is reported the first time
//! it intersects the (margin-adjusted) viewport, then it is unwatched.

use std::collections::BTreeSet;

use fz_dom::NodeId;
use fz_runtime::{Context, IntersectionObserverEntry, IntersectionObserverOptions, ObserverId};

use crate::MotionError;

#[derive(Debug)]
pub struct VisibilityObserver {
    id: ObserverId,
    watched: BTreeSet<NodeId>,
}

impl VisibilityObserver {
    /// Create the underlying intersection observer. Fails if the window has
    /// no intersection support or the margin does not parse.
    pub fn install(
        ctx: &mut Context<'_>,
        root_margin: &str,
        threshold: f64,
    ) -> Result<Self, MotionError> {
        let options = IntersectionObserverOptions::new(root_margin, &[threshold])?;
        let id = ctx.create_intersection_observer(options)?;
        Ok(Self { id, watched: BTreeSet::new() })
    }

    pub fn id(&self) -> ObserverId {
        self.id
    }

    /// Start watching `target`. Returns false if it is already watched.
    pub fn watch(&mut self, ctx: &mut Context<'_>, target: NodeId) -> Result<bool, MotionError> {
        if self.watched.contains(&target) {
            return Ok(false);
        }
        ctx.observe(self.id, target)?;
        self.watched.insert(target);
        Ok(true)
    }

    pub fn is_watching(&self, target: NodeId) -> bool {
        self.watched.contains(&target)
    }

    pub fn watched_count(&self) -> usize {
        self.watched.len()
    }

    /// Elements that became visible in this batch. Each is returned once and
    /// unwatched.
    pub fn take_visible(
        &mut self,
        ctx: &mut Context<'_>,
        entries: &[IntersectionObserverEntry],
    ) -> Vec<NodeId> {
        let mut visible = Vec::new();
        for entry in entries.iter().filter(|e| e.is_intersecting) {
            if self.watched.remove(&entry.target) {
                ctx.unobserve(self.id, entry.target);
                visible.push(entry.target);
            }
        }
        visible
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fz_dom::{DOMRect, Document};
    use fz_runtime::{Host, RuntimeError, Storage, Window};

    fn host_with_card(top: f64) -> (Host, NodeId) {
        let mut document = Document::default();
        let body = document.body();
        let card = document.append_element(body, "div", &[("class", "reveal")]);
        document.set_rect(card, DOMRect::from_xywh(0.0, top, 300.0, 200.0));
        (Host::new(document, Window::new(800.0, 600.0), Storage::session()), card)
    }

    #[test]
    fn test_reports_once_then_unwatches() {
        let (mut host, card) = host_with_card(100.0);
        let mut ctx = Context::new(&mut host, 0);
        let mut observer = VisibilityObserver::install(&mut ctx, "0px", 0.0).unwrap();
        assert!(observer.watch(&mut ctx, card).unwrap());
        assert!(!observer.watch(&mut ctx, card).unwrap());

        let batches = host.collect_intersections();
        let mut ctx = Context::new(&mut host, 0);
        assert_eq!(observer.take_visible(&mut ctx, &batches[0].2), vec![card]);
        assert!(!observer.is_watching(card));
        assert!(observer.take_visible(&mut ctx, &batches[0].2).is_empty());

        // Unobserved in the runtime too
        host.window.scroll_to(10.0);
        assert!(host.collect_intersections().is_empty());
    }

    #[test]
    fn test_offscreen_element_stays_watched() {
        let (mut host, card) = host_with_card(2000.0);
        let mut ctx = Context::new(&mut host, 0);
        let mut observer = VisibilityObserver::install(&mut ctx, "0px", 0.0).unwrap();
        observer.watch(&mut ctx, card).unwrap();

        let batches = host.collect_intersections();
        let mut ctx = Context::new(&mut host, 0);
        assert!(observer.take_visible(&mut ctx, &batches[0].2).is_empty());
        assert_eq!(observer.watched_count(), 1);
    }

    #[test]
    fn test_install_without_support() {
        let (mut host, _) = host_with_card(0.0);
        host.window = Window::new(800.0, 600.0).without_intersection_observer();
        let mut ctx = Context::new(&mut host, 0);
        let err = VisibilityObserver::install(&mut ctx, "0px", 0.0).unwrap_err();
        assert!(matches!(
            err,
            MotionError::Runtime(RuntimeError::IntersectionObserverUnsupported)
        ));
    }
}
