//! fz Runtime
//!
//! The page host the controllers run against:
//! - Window viewport, scroll position and smooth scrolling
//! - Cooperative scheduler for timers and animation frames
//! - Intersection observers
//! - localStorage / sessionStorage
//! - An injectable clock for "today"
//!
//! Everything runs on one thread. Controllers never hold references into
//! the host; they receive a `Context` for the duration of each callback.

mod clock;
mod host;
mod intersection_observer;
mod scheduler;
mod storage;
mod window;

pub use clock::{Clock, FixedClock, SystemClock};
pub use host::{Context, Controller, Host};
pub use intersection_observer::{
    IntersectionObserver, IntersectionObserverEntry, IntersectionObserverManager,
    IntersectionObserverOptions, ObserverId, RootMargin,
};
pub use scheduler::{ControllerId, ScheduledTask, Scheduler, TaskKind, TaskToken, TimerId};
pub use storage::{Storage, StorageError};
pub use window::{ScrollBehavior, SmoothScroll, Window};

/// Runtime errors
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error("IntersectionObserver is not supported by this window")]
    IntersectionObserverUnsupported,

    #[error("invalid root margin: {0:?}")]
    InvalidRootMargin(String),

    #[error("unknown intersection observer {0:?}")]
    UnknownObserver(ObserverId),

    #[error(transparent)]
    Storage(#[from] StorageError),
}
