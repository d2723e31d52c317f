//! fz Motion - page animation controllers
//!
//! `FzAnimations` is the single entry point. It owns one effect per
//! behaviour and starts them all with `init_all`:
//!
//! - Scroll reveal (with a polling fallback)
//! - Navbar shrink
//! - Hero parallax
//! - Smooth anchor scrolling
//! - Button press feedback
//! - Counter animation
//! - Rebuild reveal for dynamic content
//!
//! Each effect initialises under its own guard, so a failing one is
//! logged and the rest still start. `init_all` can be called again after
//! the page changes; only elements not seen before get bound.

mod anchor;
mod button_feedback;
mod config;
mod counter;
mod error;
mod parallax;
mod reveal;
mod shrink;
mod visibility;

pub use anchor::AnchorScroll;
pub use button_feedback::ButtonFeedback;
pub use config::MotionConfig;
pub use counter::{CounterAnimator, ParsedCounter, ease_out_cubic, format_grouped, parse_counter};
pub use error::MotionError;
pub use parallax::Parallax;
pub use reveal::{REVEALED_CLASS, RebuildReveal, Reveal};
pub use shrink::{NavbarShrink, SHRINK_CLASS};
pub use visibility::VisibilityObserver;

use fz_dom::{Event, EventType, NodeId, ReadyState};
use fz_runtime::{Context, Controller, IntersectionObserverEntry, ObserverId, TaskToken};

/// One behaviour managed by `FzAnimations`. Frames are routed by the
/// token lane the effect was given.
pub(crate) trait Effect {
    fn name(&self) -> &'static str;

    fn lane(&self) -> u32;

    /// Bind elements not bound before
    fn init(&mut self, ctx: &mut Context<'_>) -> Result<(), MotionError>;

    fn handle_event(&mut self, _ctx: &mut Context<'_>, _event: &mut Event) {}

    fn on_intersection(
        &mut self,
        _ctx: &mut Context<'_>,
        _observer: ObserverId,
        _entries: &[IntersectionObserverEntry],
    ) {
    }

    fn on_frame(&mut self, _ctx: &mut Context<'_>, _seq: u32, _now: f64) {}
}

const REVEAL_LANE: u32 = 0;
const SHRINK_LANE: u32 = 1;
const PARALLAX_LANE: u32 = 2;
const ANCHOR_LANE: u32 = 3;
const BUTTON_LANE: u32 = 4;
const COUNTER_LANE: u32 = 5;
const REBUILD_LANE: u32 = 6;

/// The page's animation namespace
#[derive(Debug)]
pub struct FzAnimations {
    ready_class: String,
    reveal: Reveal,
    shrink: NavbarShrink,
    parallax: Parallax,
    anchors: AnchorScroll,
    buttons: ButtonFeedback,
    counters: CounterAnimator,
    rebuild: RebuildReveal,
    waiting_for_load: bool,
    init_count: usize,
}

impl FzAnimations {
    pub fn new(config: &MotionConfig) -> Self {
        Self {
            ready_class: config.ready_class.clone(),
            reveal: Reveal::new(config, REVEAL_LANE),
            shrink: NavbarShrink::new(config, SHRINK_LANE),
            parallax: Parallax::new(config, PARALLAX_LANE),
            anchors: AnchorScroll::new(config, ANCHOR_LANE),
            buttons: ButtonFeedback::new(config, BUTTON_LANE),
            counters: CounterAnimator::new(config, COUNTER_LANE),
            rebuild: RebuildReveal::new(config, REBUILD_LANE),
            waiting_for_load: false,
            init_count: 0,
        }
    }

    /// Start now if the page already finished loading, otherwise on `load`
    pub fn install(&mut self, ctx: &mut Context<'_>) {
        if ctx.document.ready_state() == ReadyState::Complete {
            self.init_all(ctx);
        } else {
            self.waiting_for_load = true;
        }
    }

    /// Initialise every effect, then flag the document element
    pub fn init_all(&mut self, ctx: &mut Context<'_>) {
        for effect in self.effects_mut() {
            if let Err(err) = effect.init(ctx) {
                tracing::error!("{} init error: {}", effect.name(), err);
            }
        }
        let root = ctx.document.document_element();
        ctx.document.add_class(root, &self.ready_class);
        self.init_count += 1;
        tracing::info!("Animations initialised (run {})", self.init_count);
    }

    /// Number of completed `init_all` runs
    pub fn init_count(&self) -> usize {
        self.init_count
    }

    pub fn reveal(&self) -> &Reveal {
        &self.reveal
    }

    pub fn counters(&self) -> &CounterAnimator {
        &self.counters
    }

    pub fn buttons(&self) -> &ButtonFeedback {
        &self.buttons
    }

    fn effects_mut(&mut self) -> [&mut dyn Effect; 7] {
        [
            &mut self.reveal,
            &mut self.shrink,
            &mut self.parallax,
            &mut self.anchors,
            &mut self.buttons,
            &mut self.counters,
            &mut self.rebuild,
        ]
    }
}

impl Default for FzAnimations {
    fn default() -> Self {
        Self::new(&MotionConfig::default())
    }
}

impl Controller for FzAnimations {
    fn name(&self) -> &'static str {
        "fz-animations"
    }

    fn handle_event(&mut self, ctx: &mut Context<'_>, event: &mut Event) {
        if self.waiting_for_load && event.is_at(EventType::Load, NodeId::ROOT) {
            self.waiting_for_load = false;
            self.init_all(ctx);
            return;
        }
        for effect in self.effects_mut() {
            effect.handle_event(ctx, event);
        }
    }

    fn on_intersection(
        &mut self,
        ctx: &mut Context<'_>,
        observer: ObserverId,
        entries: &[IntersectionObserverEntry],
    ) {
        for effect in self.effects_mut() {
            effect.on_intersection(ctx, observer, entries);
        }
    }

    fn on_frame(&mut self, ctx: &mut Context<'_>, token: TaskToken, now: f64) {
        if let Some(effect) = self.effects_mut().into_iter().find(|e| e.lane() == token.lane) {
            effect.on_frame(ctx, token.seq, now);
        }
    }
}
