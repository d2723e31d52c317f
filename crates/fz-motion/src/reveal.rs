//! Scroll reveal
//!
//! `Reveal` adds `revealed` to `.reveal` / `.reveal-stagger` elements the
//! first time they scroll into view. The class lands on the frame after
//! the intersection so a `--reveal-delay` copied from `data-reveal-delay`
//! is already in place when the transition starts. Without intersection
//! support the elements are polled on scroll and resize instead.
//!
//! `RebuildReveal` does the same for dynamically rebuilt content, without
//! the delay or the frame hop.

use std::collections::BTreeSet;

use fz_dom::{Event, EventType, NodeId};
use fz_runtime::{Context, IntersectionObserverEntry, ObserverId, TaskToken};

use crate::error::query_all;
use crate::{Effect, MotionConfig, MotionError, VisibilityObserver};

pub const REVEALED_CLASS: &str = "revealed";
const DELAY_ATTR: &str = "data-reveal-delay";
const DELAY_PROPERTY: &str = "--reveal-delay";

#[derive(Debug)]
pub struct Reveal {
    lane: u32,
    selector: String,
    root_margin: String,
    threshold: f64,
    fallback_ratio: f64,
    observer: Option<VisibilityObserver>,
    /// Every element ever bound, observed or polled
    bound: BTreeSet<NodeId>,
    /// Fallback mode: elements still waiting to be revealed
    polled: Vec<NodeId>,
    /// Revealed on the next frame
    queued: Vec<NodeId>,
}

impl Reveal {
    pub fn new(config: &MotionConfig, lane: u32) -> Self {
        Self {
            lane,
            selector: config.reveal_selector.clone(),
            root_margin: config.reveal_root_margin.clone(),
            threshold: config.reveal_threshold,
            fallback_ratio: config.reveal_fallback_ratio,
            observer: None,
            bound: BTreeSet::new(),
            polled: Vec::new(),
            queued: Vec::new(),
        }
    }

    pub fn bound_count(&self) -> usize {
        self.bound.len()
    }

    /// Reveal polled elements whose top edge is high enough in the viewport
    fn poll(&mut self, ctx: &mut Context<'_>) {
        let line = ctx.window.inner_height() * self.fallback_ratio;
        let mut revealed = 0;
        self.polled.retain(|&el| {
            let above = ctx.client_rect(el).is_some_and(|r| r.top() < line);
            if above {
                ctx.document.add_class(el, REVEALED_CLASS);
                revealed += 1;
            }
            !above
        });
        if revealed > 0 {
            tracing::debug!("Reveal fallback revealed {} elements", revealed);
        }
    }
}

impl Effect for Reveal {
    fn name(&self) -> &'static str {
        "reveal"
    }

    fn lane(&self) -> u32 {
        self.lane
    }

    fn init(&mut self, ctx: &mut Context<'_>) -> Result<(), MotionError> {
        let fresh: Vec<NodeId> = query_all(&ctx.document, &self.selector)?
            .into_iter()
            .filter(|n| !self.bound.contains(n))
            .collect();
        if fresh.is_empty() {
            return Ok(());
        }

        if ctx.window.supports_intersection_observer() {
            if self.observer.is_none() {
                self.observer = Some(VisibilityObserver::install(
                    ctx,
                    &self.root_margin,
                    self.threshold,
                )?);
            }
            if let Some(observer) = self.observer.as_mut() {
                for &el in &fresh {
                    observer.watch(ctx, el)?;
                }
            }
        } else {
            self.polled.extend(&fresh);
        }
        tracing::debug!("Reveal bound {} elements", fresh.len());
        self.bound.extend(fresh);

        if !self.polled.is_empty() {
            self.poll(ctx);
        }
        Ok(())
    }

    fn handle_event(&mut self, ctx: &mut Context<'_>, event: &mut Event) {
        if self.polled.is_empty() {
            return;
        }
        if event.is_at(EventType::Scroll, NodeId::ROOT) || event.is_at(EventType::Resize, NodeId::ROOT) {
            self.poll(ctx);
        }
    }

    fn on_intersection(
        &mut self,
        ctx: &mut Context<'_>,
        observer: ObserverId,
        entries: &[IntersectionObserverEntry],
    ) {
        let Some(visibility) = self.observer.as_mut().filter(|o| o.id() == observer) else {
            return;
        };
        let visible = visibility.take_visible(ctx, entries);
        if visible.is_empty() {
            return;
        }
        for el in visible {
            if let Some(delay) = ctx.document.get_attr(el, DELAY_ATTR).map(str::to_string) {
                if !delay.is_empty() {
                    ctx.document.set_style(el, DELAY_PROPERTY, &delay);
                }
            }
            self.queued.push(el);
        }
        ctx.request_animation_frame(TaskToken::new(self.lane, 0));
    }

    fn on_frame(&mut self, ctx: &mut Context<'_>, _seq: u32, _now: f64) {
        for el in self.queued.drain(..) {
            ctx.document.add_class(el, REVEALED_CLASS);
        }
    }
}

#[derive(Debug)]
pub struct RebuildReveal {
    lane: u32,
    selector: String,
    threshold: f64,
    observer: Option<VisibilityObserver>,
    bound: BTreeSet<NodeId>,
}

impl RebuildReveal {
    pub fn new(config: &MotionConfig, lane: u32) -> Self {
        Self {
            lane,
            selector: config.rebuild_selector.clone(),
            threshold: config.rebuild_threshold,
            observer: None,
            bound: BTreeSet::new(),
        }
    }
}

impl Effect for RebuildReveal {
    fn name(&self) -> &'static str {
        "rebuild-reveal"
    }

    fn lane(&self) -> u32 {
        self.lane
    }

    fn init(&mut self, ctx: &mut Context<'_>) -> Result<(), MotionError> {
        let fresh: Vec<NodeId> = query_all(&ctx.document, &self.selector)?
            .into_iter()
            .filter(|n| !self.bound.contains(n))
            .collect();
        if fresh.is_empty() {
            return Ok(());
        }

        if !ctx.window.supports_intersection_observer() {
            for &el in &fresh {
                ctx.document.add_class(el, REVEALED_CLASS);
            }
        } else {
            if self.observer.is_none() {
                self.observer = Some(VisibilityObserver::install(ctx, "0px", self.threshold)?);
            }
            if let Some(observer) = self.observer.as_mut() {
                for &el in &fresh {
                    observer.watch(ctx, el)?;
                }
            }
        }
        self.bound.extend(fresh);
        Ok(())
    }

    fn on_intersection(
        &mut self,
        ctx: &mut Context<'_>,
        observer: ObserverId,
        entries: &[IntersectionObserverEntry],
    ) {
        let Some(visibility) = self.observer.as_mut().filter(|o| o.id() == observer) else {
            return;
        };
        for el in visibility.take_visible(ctx, entries) {
            ctx.document.add_class(el, REVEALED_CLASS);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fz_dom::{DOMRect, Document};
    use fz_runtime::{Host, Storage, Window};

    fn page(window: Window) -> (Host, NodeId, NodeId) {
        let mut document = Document::default();
        let body = document.body();
        let near = document.append_element(
            body,
            "section",
            &[("class", "reveal"), ("data-reveal-delay", "150ms")],
        );
        let far = document.append_element(body, "section", &[("class", "reveal-stagger")]);
        document.set_rect(near, DOMRect::from_xywh(0.0, 100.0, 800.0, 300.0));
        document.set_rect(far, DOMRect::from_xywh(0.0, 1800.0, 800.0, 300.0));
        (Host::new(document, window, Storage::session()), near, far)
    }

    fn deliver(host: &mut Host, reveal: &mut Reveal) {
        for (_, observer, entries) in host.collect_intersections() {
            reveal.on_intersection(&mut Context::new(host, 0), observer, &entries);
        }
    }

    fn run_frames(host: &mut Host, reveal: &mut Reveal) {
        for task in host.scheduler_mut().take_frames() {
            reveal.on_frame(&mut Context::new(host, 0), task.token.seq, 0.0);
        }
    }

    #[test]
    fn test_reveal_waits_for_frame() {
        let (mut host, near, far) = page(Window::new(800.0, 600.0));
        let mut reveal = Reveal::new(&MotionConfig::default(), 0);
        reveal.init(&mut Context::new(&mut host, 0)).unwrap();

        deliver(&mut host, &mut reveal);
        assert_eq!(host.document.style(near, "--reveal-delay"), Some("150ms"));
        assert!(!host.document.has_class(near, REVEALED_CLASS));

        run_frames(&mut host, &mut reveal);
        assert!(host.document.has_class(near, REVEALED_CLASS));
        assert!(!host.document.has_class(far, REVEALED_CLASS));

        host.window.scroll_to(1500.0);
        deliver(&mut host, &mut reveal);
        run_frames(&mut host, &mut reveal);
        assert!(host.document.has_class(far, REVEALED_CLASS));
        assert_eq!(host.document.style(far, "--reveal-delay"), None);
    }

    #[test]
    fn test_repeated_init_binds_new_elements_only() {
        let (mut host, _, _) = page(Window::new(800.0, 600.0));
        let mut reveal = Reveal::new(&MotionConfig::default(), 0);
        reveal.init(&mut Context::new(&mut host, 0)).unwrap();
        reveal.init(&mut Context::new(&mut host, 0)).unwrap();
        assert_eq!(reveal.bound_count(), 2);
        assert_eq!(host.observers().get(reveal.observer.as_ref().unwrap().id()).unwrap().observed_count(), 2);

        let body = host.document.body();
        let late = host.document.append_element(body, "div", &[("class", "reveal")]);
        reveal.init(&mut Context::new(&mut host, 0)).unwrap();
        assert_eq!(reveal.bound_count(), 3);
        assert!(reveal.observer.as_ref().unwrap().is_watching(late));
    }

    #[test]
    fn test_fallback_polls_on_scroll() {
        let (mut host, near, far) = page(Window::new(800.0, 600.0).without_intersection_observer());
        let mut reveal = Reveal::new(&MotionConfig::default(), 0);
        reveal.init(&mut Context::new(&mut host, 0)).unwrap();
        assert!(host.document.has_class(near, REVEALED_CLASS));
        assert!(!host.document.has_class(far, REVEALED_CLASS));

        // 1800 - 1300 = 500 < 600 * 0.88
        host.window.scroll_to(1300.0);
        reveal.handle_event(&mut Context::new(&mut host, 0), &mut Event::scroll());
        assert!(host.document.has_class(far, REVEALED_CLASS));
    }

    #[test]
    fn test_rebuild_without_observer_reveals_immediately() {
        let mut document = Document::default();
        let body = document.body();
        let el = document.append_element(body, "div", &[("class", "animated-element")]);
        let mut host = Host::new(
            document,
            Window::new(800.0, 600.0).without_intersection_observer(),
            Storage::session(),
        );
        let mut rebuild = RebuildReveal::new(&MotionConfig::default(), 6);
        rebuild.init(&mut Context::new(&mut host, 0)).unwrap();
        assert!(host.document.has_class(el, REVEALED_CLASS));
    }
}
