//! fz Booking - appointment booking widget
//!
//! A month calendar, hourly time slots and a submit button backed by a
//! booked-slots store in localStorage.
//!
//! The pure pieces (`render_month`, `generate_slots`, `submit_state`, the
//! store) are usable without a document. `BookingWidget` binds them to the
//! booking form as a page controller.

mod calendar;
mod config;
mod error;
mod locale;
mod slots;
mod state;
mod store;
mod widget;

pub use calendar::{CalendarCursor, DayCell, MonthGrid, render_month};
pub use config::{BookingConfig, CorruptStorePolicy, SeedConfig};
pub use error::BookingError;
pub use locale::Locale;
pub use slots::{Slot, generate_slots, slot_label};
pub use state::{Selection, SubmitState, submit_state};
pub use store::{BookedSlots, BookedSlotsStore};
pub use widget::BookingWidget;
