//! Page host
//!
//! `Host` owns the document, window, storage, scheduler and observers.
//! Controllers are driven through the `Controller` trait and reach the
//! host via a `Context` that remembers which controller is running, so
//! every timer, frame and observer it creates is tagged with its owner.

use std::ops::{Deref, DerefMut};

use chrono::NaiveDate;
use fz_dom::{DOMRect, Document, Event, NodeId};

use crate::{
    Clock, ControllerId, IntersectionObserverEntry, IntersectionObserverManager,
    IntersectionObserverOptions, ObserverId, RuntimeError, ScrollBehavior, Scheduler, Storage,
    SystemClock, TaskToken, TimerId, Window,
};

/// Everything a page script can touch
#[derive(Debug)]
pub struct Host {
    pub document: Document,
    pub window: Window,
    pub local_storage: Storage,
    scheduler: Scheduler,
    observers: IntersectionObserverManager,
    clock: Box<dyn Clock>,
}

impl Host {
    pub fn new(document: Document, window: Window, local_storage: Storage) -> Self {
        Self {
            document,
            window,
            local_storage,
            scheduler: Scheduler::new(),
            observers: IntersectionObserverManager::new(),
            clock: Box::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Current calendar date
    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// `performance.now()`
    pub fn now(&self) -> f64 {
        self.scheduler.now()
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut Scheduler {
        &mut self.scheduler
    }

    pub fn observers(&self) -> &IntersectionObserverManager {
        &self.observers
    }

    /// Element box in viewport coordinates
    pub fn client_rect(&self, node: NodeId) -> Option<DOMRect> {
        if !self.document.tree().is_connected(node) {
            return None;
        }
        self.document
            .rect(node)
            .map(|r| r.translate(0.0, -self.window.scroll_y()))
    }

    /// Scroll so the element's top edge aligns with the viewport top.
    /// Returns false if the element has no layout box.
    pub fn scroll_into_view(&mut self, node: NodeId, behavior: ScrollBehavior) -> bool {
        let Some(rect) = self.document.rect(node) else {
            tracing::debug!("scroll_into_view: {:?} has no layout box", node);
            return false;
        };
        match behavior {
            ScrollBehavior::Instant => {
                self.window.scroll_to(rect.top());
            }
            ScrollBehavior::Smooth => self.window.smooth_scroll_to(rect.top()),
        }
        true
    }

    /// Run every observer against the current viewport
    pub fn collect_intersections(
        &mut self,
    ) -> Vec<(ControllerId, ObserverId, Vec<IntersectionObserverEntry>)> {
        let viewport = self.window.viewport();
        let now = self.scheduler.now();
        let Self { observers, document, window, .. } = self;
        let scroll_y = window.scroll_y();
        observers.process(
            viewport,
            |node| {
                if !document.tree().is_connected(node) {
                    return None;
                }
                document.rect(node).map(|r| r.translate(0.0, -scroll_y))
            },
            now,
        )
    }
}

/// A controller's view of the host during one callback
#[derive(Debug)]
pub struct Context<'a> {
    host: &'a mut Host,
    owner: ControllerId,
}

impl<'a> Context<'a> {
    pub fn new(host: &'a mut Host, owner: ControllerId) -> Self {
        Self { host, owner }
    }

    pub fn owner(&self) -> ControllerId {
        self.owner
    }

    pub fn request_animation_frame(&mut self, token: TaskToken) {
        self.host.scheduler.request_animation_frame(self.owner, token);
    }

    pub fn set_timeout(&mut self, token: TaskToken, delay_ms: f64) -> TimerId {
        self.host.scheduler.set_timeout(self.owner, token, delay_ms)
    }

    pub fn clear_timeout(&mut self, id: TimerId) -> bool {
        self.host.scheduler.clear_timeout(id)
    }

    /// `new IntersectionObserver(...)`
    pub fn create_intersection_observer(
        &mut self,
        options: IntersectionObserverOptions,
    ) -> Result<ObserverId, RuntimeError> {
        if !self.host.window.supports_intersection_observer() {
            return Err(RuntimeError::IntersectionObserverUnsupported);
        }
        Ok(self.host.observers.create(self.owner, options))
    }

    pub fn observe(&mut self, observer: ObserverId, target: NodeId) -> Result<(), RuntimeError> {
        self.host
            .observers
            .get_mut(observer)
            .ok_or(RuntimeError::UnknownObserver(observer))?
            .observe(target);
        Ok(())
    }

    pub fn unobserve(&mut self, observer: ObserverId, target: NodeId) {
        if let Some(o) = self.host.observers.get_mut(observer) {
            o.unobserve(target);
        }
    }
}

impl Deref for Context<'_> {
    type Target = Host;

    fn deref(&self) -> &Host {
        self.host
    }
}

impl DerefMut for Context<'_> {
    fn deref_mut(&mut self) -> &mut Host {
        self.host
    }
}

/// A page script: reacts to events, observer entries, frames and timers.
/// All callbacks default to no-ops.
pub trait Controller {
    fn name(&self) -> &'static str;

    fn handle_event(&mut self, _ctx: &mut Context<'_>, _event: &mut Event) {}

    fn on_intersection(
        &mut self,
        _ctx: &mut Context<'_>,
        _observer: ObserverId,
        _entries: &[IntersectionObserverEntry],
    ) {
    }

    fn on_frame(&mut self, _ctx: &mut Context<'_>, _token: TaskToken, _now: f64) {}

    fn on_timer(&mut self, _ctx: &mut Context<'_>, _token: TaskToken) {}
}
