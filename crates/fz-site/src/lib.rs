//! fz Site
//!
//! Headless model of the studio website. `Site` owns the page host and
//! every controller:
//! - `FzAnimations` (reveal, shrink, parallax, anchors, buttons, counters)
//! - `MobileNav`, the navigation drawer
//! - `BookingWidget`, started on `DOMContentLoaded`
//!
//! Events bubble from target to document; time advances through
//! `Site::advance` in fixed animation frames.

mod config;
mod error;
mod layout;
mod mobile_nav;
mod site;

pub use config::SiteConfig;
pub use error::SiteError;
pub use layout::{LINE_HEIGHT, layout};
pub use mobile_nav::{MobileNav, NavConfig};
pub use site::{ANIMATIONS, BOOKING, NAV, Site};
