//! Site
//!
//! Owns the host and every page controller. Drives the page lifecycle,
//! dispatches events along their propagation path, applies the browser's
//! default actions and runs the frame loop on a virtual clock.

use chrono::NaiveDate;
use fz_booking::{BookingConfig, BookingWidget};
use fz_dom::{Document, Event, EventType, NodeId, ReadyState};
use fz_motion::FzAnimations;
use fz_runtime::{
    Context, Controller, ControllerId, FixedClock, Host, ScrollBehavior, Storage, Window,
};

use crate::{MobileNav, SiteConfig, SiteError, layout};

/// Controller ids
pub const ANIMATIONS: ControllerId = 0;
pub const NAV: ControllerId = 1;
pub const BOOKING: ControllerId = 2;

pub struct Site {
    host: Host,
    animations: FzAnimations,
    nav: MobileNav,
    booking: Option<BookingWidget>,
    booking_config: BookingConfig,
    frame_interval: f64,
    last_frame: f64,
}

impl Site {
    /// Lay out the document, open storage and install the animation
    /// namespace. The document stays `loading` until `content_loaded`.
    pub fn new(mut document: Document, config: &SiteConfig) -> Result<Self, SiteError> {
        let storage = match &config.storage_path {
            Some(path) => Storage::local(path)?,
            None => Storage::session(),
        };

        let mut window = Window::new(config.viewport_width, config.viewport_height)
            .with_smooth_speed(config.smooth_scroll_speed);
        if !config.intersection_observer {
            window = window.without_intersection_observer();
        }
        let height = layout(&mut document, config.viewport_width);
        window.set_document_height(height);

        let mut host = Host::new(document, window, storage);
        if let Some(today) = &config.today {
            let date = NaiveDate::parse_from_str(today, "%Y-%m-%d")
                .map_err(|_| SiteError::InvalidDate(today.clone()))?;
            host = host.with_clock(FixedClock(date));
        }

        let mut animations = FzAnimations::new(&config.motion);
        animations.install(&mut Context::new(&mut host, ANIMATIONS));

        Ok(Self {
            host,
            animations,
            nav: MobileNav::new(config.nav.clone()),
            booking: None,
            booking_config: config.booking.clone(),
            frame_interval: config.frame_interval_ms.max(1.0),
            last_frame: 0.0,
        })
    }

    pub fn from_html(html: &str, config: &SiteConfig) -> Result<Self, SiteError> {
        Self::new(fz_html::parse(html)?, config)
    }

    // === Lifecycle ===

    /// `DOMContentLoaded`: mount the drawer and the booking widget
    pub fn content_loaded(&mut self) {
        self.host.document.set_ready_state(ReadyState::Interactive);

        self.nav.mount(&mut Context::new(&mut self.host, NAV));

        let mut widget = BookingWidget::new(self.booking_config.clone());
        match widget.mount(&mut Context::new(&mut self.host, BOOKING)) {
            Ok(()) => self.booking = Some(widget),
            Err(err) => {
                tracing::warn!("Booking widget not started: {}", err);
                self.booking = None;
            }
        }

        tracing::info!("DOMContentLoaded");
        self.dispatch(Event::content_loaded());
    }

    /// `load`: the animation namespace starts here
    pub fn load(&mut self) {
        self.host.document.set_ready_state(ReadyState::Complete);
        tracing::info!("load");
        self.dispatch(Event::load());
    }

    pub fn boot(&mut self) {
        self.content_loaded();
        self.load();
    }

    /// Re-run `FzAnimations.init_all`
    pub fn init_animations(&mut self) {
        self.animations
            .init_all(&mut Context::new(&mut self.host, ANIMATIONS));
    }

    // === Events ===

    /// Deliver an event to every controller along its path, then run the
    /// default action unless a listener prevented it.
    pub fn dispatch(&mut self, mut event: Event) -> Event {
        event.timestamp = self.host.now();
        for node in self.host.document.event_path(event.target) {
            event.current_target = node;
            self.each_controller(|controller, ctx| controller.handle_event(ctx, &mut event));
            if !event.bubbles || event.is_propagation_stopped() {
                break;
            }
        }
        if event.event_type == EventType::Click && !event.is_default_prevented() {
            self.activate(event.target);
        }
        event
    }

    /// Click an element. Disabled controls receive no click.
    pub fn click(&mut self, node: NodeId) -> Option<Event> {
        if self.host.document.is_disabled(node) {
            tracing::debug!("Click on disabled {:?} ignored", node);
            return None;
        }
        Some(self.dispatch(Event::click(node)))
    }

    pub fn click_selector(&mut self, selector: &str) -> Result<Option<Event>, SiteError> {
        let node = self
            .host
            .document
            .query_selector(selector)?
            .ok_or_else(|| SiteError::NoMatch(selector.to_string()))?;
        Ok(self.click(node))
    }

    /// Key press with the page body focused
    pub fn key_down(&mut self, key: &str) -> Event {
        let body = self.host.document.body();
        self.dispatch(Event::key_down(body, key))
    }

    pub fn key_down_on(&mut self, node: NodeId, key: &str) -> Event {
        self.dispatch(Event::key_down(node, key))
    }

    pub fn fire(&mut self, event_type: EventType, node: NodeId) -> Event {
        self.dispatch(Event::new(event_type, node))
    }

    pub fn submit(&mut self, form: NodeId) -> Event {
        self.dispatch(Event::submit(form))
    }

    /// Jump to `y`; fires `scroll` if the position changed
    pub fn scroll_to(&mut self, y: f64) -> bool {
        let changed = self.host.window.scroll_to(y);
        if changed {
            self.dispatch(Event::scroll());
        }
        changed
    }

    /// Resize the viewport, re-run layout and fire `resize`
    pub fn resize(&mut self, width: f64, height: f64) {
        let before = self.host.window.scroll_y();
        let doc_height = layout(&mut self.host.document, width);
        self.host.window.set_document_height(doc_height);
        self.host.window.resize(width, height);
        self.dispatch(Event::resize());
        if self.host.window.scroll_y() != before {
            self.dispatch(Event::scroll());
        }
    }

    /// Default actions of an un-prevented click
    fn activate(&mut self, target: NodeId) {
        let document = &self.host.document;
        if let Ok(Some(anchor)) = document.closest(target, r##"a[href^="#"]"##) {
            let jump = document
                .get_attr(anchor, "href")
                .filter(|href| *href != "#")
                .and_then(|href| document.query_selector(href).ok().flatten());
            if let Some(destination) = jump {
                let before = self.host.window.scroll_y();
                self.host.scroll_into_view(destination, ScrollBehavior::Instant);
                if self.host.window.scroll_y() != before {
                    self.dispatch(Event::scroll());
                }
            }
            return;
        }

        let form = document
            .closest(target, r#"button[type="submit"], input[type="submit"]"#)
            .ok()
            .flatten()
            .and_then(|button| document.closest(button, "form").ok().flatten());
        if let Some(form) = form {
            self.submit(form);
        }
    }

    // === Frame loop ===

    /// Move the clock forward `ms`, running every frame that falls inside
    pub fn advance(&mut self, ms: f64) {
        let end = self.host.now() + ms.max(0.0);
        while self.last_frame + self.frame_interval <= end {
            let now = self.last_frame + self.frame_interval;
            self.last_frame = now;
            self.run_timers(now);
            self.run_frame(now);
        }
        self.run_timers(end);
    }

    /// One animation frame: rAF callbacks, smooth scroll, then observers
    fn run_frame(&mut self, now: f64) {
        for task in self.host.scheduler_mut().take_frames() {
            self.with_controller(task.owner, |controller, ctx| {
                controller.on_frame(ctx, task.token, now)
            });
        }
        if self.host.window.step_smooth_scroll() {
            self.dispatch(Event::scroll());
        }
        for (owner, observer, entries) in self.host.collect_intersections() {
            self.with_controller(owner, |controller, ctx| {
                controller.on_intersection(ctx, observer, &entries)
            });
        }
    }

    fn run_timers(&mut self, now: f64) {
        self.host.scheduler_mut().advance_to(now);
        loop {
            let due = self.host.scheduler_mut().take_due_timers();
            if due.is_empty() {
                break;
            }
            for task in due {
                self.with_controller(task.owner, |controller, ctx| {
                    controller.on_timer(ctx, task.token)
                });
            }
        }
    }

    fn each_controller(&mut self, mut f: impl FnMut(&mut dyn Controller, &mut Context<'_>)) {
        let Self { host, animations, nav, booking, .. } = self;
        f(animations, &mut Context::new(host, ANIMATIONS));
        f(nav, &mut Context::new(host, NAV));
        if let Some(widget) = booking {
            f(widget, &mut Context::new(host, BOOKING));
        }
    }

    fn with_controller(
        &mut self,
        owner: ControllerId,
        f: impl FnOnce(&mut dyn Controller, &mut Context<'_>),
    ) {
        let Self { host, animations, nav, booking, .. } = self;
        let controller: &mut dyn Controller = match owner {
            ANIMATIONS => animations,
            NAV => nav,
            BOOKING => match booking {
                Some(widget) => widget,
                None => return,
            },
            _ => {
                tracing::warn!("Task for unknown controller {}", owner);
                return;
            }
        };
        f(controller, &mut Context::new(host, owner));
    }

    // === Accessors ===

    pub fn host(&self) -> &Host {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut Host {
        &mut self.host
    }

    pub fn document(&self) -> &Document {
        &self.host.document
    }

    pub fn window(&self) -> &Window {
        &self.host.window
    }

    pub fn element(&self, id: &str) -> Option<NodeId> {
        self.host.document.get_element_by_id(id)
    }

    pub fn animations(&self) -> &FzAnimations {
        &self.animations
    }

    pub fn nav(&self) -> &MobileNav {
        &self.nav
    }

    pub fn booking(&self) -> Option<&BookingWidget> {
        self.booking.as_ref()
    }

    /// Run a closure against the booking widget, if it mounted
    pub fn with_booking<R>(
        &mut self,
        f: impl FnOnce(&mut BookingWidget, &mut Context<'_>) -> R,
    ) -> Option<R> {
        let widget = self.booking.as_mut()?;
        Some(f(widget, &mut Context::new(&mut self.host, BOOKING)))
    }
}

impl std::fmt::Debug for Site {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Site")
            .field("ready_state", &self.host.document.ready_state())
            .field("now", &self.host.now())
            .field("scroll_y", &self.host.window.scroll_y())
            .field("drawer_open", &self.nav.is_open())
            .field("booking", &self.booking.is_some())
            .finish()
    }
}
