//! Booking widget scenarios against real form markup

use chrono::NaiveDate;
use fz_booking::{BookingConfig, BookingError, BookingWidget, CorruptStorePolicy};
use fz_dom::{DOMRect, Event, NodeId};
use fz_runtime::{Context, Controller, FixedClock, Host, Storage, Window};

const FORM: &str = r#"<!DOCTYPE html>
<html><body>
<section id="booking">
  <div class="calendar">
    <div class="calendar-nav">
      <button id="prev-month-btn" type="button">&lt;</button>
      <h3 id="month-year-display"></h3>
      <button id="next-month-btn" type="button">&gt;</button>
    </div>
    <div id="calendar-weekdays"></div>
    <div id="calendar-days"></div>
  </div>
  <p id="selected-date-display"></p>
  <div id="time-slots"><p class="initial-prompt">Odaberite datum</p></div>
  <form id="booking-form">
    <input type="text" name="name" id="name">
    <input type="hidden" id="hidden-date" name="date">
    <input type="hidden" id="hidden-time" name="time">
    <button type="submit" id="booking-submit-btn">Zakaži</button>
  </form>
  <div id="confirmation" style="display: none">Hvala!</div>
</section>
</body></html>"#;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

struct Page {
    host: Host,
    widget: BookingWidget,
}

impl Page {
    fn with_storage(storage: Storage, config: BookingConfig) -> Self {
        let mut document = fz_html::parse(FORM).unwrap();
        let confirmation = document.get_element_by_id("confirmation").unwrap();
        document.set_rect(confirmation, DOMRect::from_xywh(0.0, 1600.0, 1280.0, 80.0));
        let mut host = Host::new(document, Window::default(), storage)
            .with_clock(FixedClock(date(2025, 6, 10)));
        let mut widget = BookingWidget::new(config);
        widget.mount(&mut Context::new(&mut host, 2)).unwrap();
        Self { host, widget }
    }

    fn new() -> Self {
        Self::with_storage(Storage::session(), BookingConfig::default())
    }

    fn id(&self, id: &str) -> NodeId {
        self.host.document.get_element_by_id(id).unwrap()
    }

    fn fire(&mut self, mut event: Event) -> Event {
        for node in self.host.document.event_path(event.target) {
            event.current_target = node;
            self.widget.handle_event(&mut Context::new(&mut self.host, 2), &mut event);
            if !event.bubbles || event.is_propagation_stopped() {
                break;
            }
        }
        event
    }

    fn click_id(&mut self, id: &str) {
        let node = self.id(id);
        self.fire(Event::click(node));
    }

    fn day(&self, iso: &str) -> NodeId {
        let selector = format!(r#"[data-date="{}"]"#, iso);
        self.host.document.query_selector(&selector).unwrap().unwrap()
    }

    fn slot(&self, time: &str) -> NodeId {
        let slots = self.id("time-slots");
        self.host
            .document
            .tree()
            .element_children(slots)
            .find(|&s| self.host.document.text_content(s) == time)
            .unwrap()
    }

    fn text(&self, id: &str) -> String {
        self.host.document.text_content(self.id(id))
    }

    fn submit_enabled(&self) -> bool {
        !self.host.document.is_disabled(self.id("booking-submit-btn"))
    }

    fn advance(&mut self, ms: f64) {
        let now = self.host.now() + ms;
        self.host.scheduler_mut().advance_to(now);
        for task in self.host.scheduler_mut().take_due_timers() {
            self.widget.on_timer(&mut Context::new(&mut self.host, 2), task.token);
        }
    }
}

#[test]
fn test_mount_renders_current_month() {
    let page = Page::new();
    assert_eq!(page.text("month-year-display"), "Jun 2025");
    assert!(page.host.document.is_disabled(page.id("prev-month-btn")));
    assert_eq!(page.text("booking-submit-btn"), "Odaberite datum i vrijeme za zakazivanje");
    assert!(!page.submit_enabled());

    let header = page.id("calendar-weekdays");
    let names: Vec<String> = page
        .host
        .document
        .tree()
        .element_children(header)
        .map(|n| page.host.document.text_content(n))
        .collect();
    assert_eq!(names, ["Ned", "Pon", "Uto", "Sri", "Čet", "Pet", "Sub"]);

    // June 2025 starts on Sunday: no placeholders, 30 days
    let days = page.host.document.query_selector_all("#calendar-days > div").unwrap();
    assert_eq!(days.len(), 30);
    let today = page.day("2025-06-10");
    assert!(page.host.document.has_class(today, "today"));
    assert!(page.host.document.has_class(today, "disabled"));
}

#[test]
fn test_month_navigation_from_june_2025() {
    let mut page = Page::new();
    page.click_id("next-month-btn");
    page.click_id("next-month-btn");
    assert_eq!(page.text("month-year-display"), "Avgust 2025");
    assert!(!page.host.document.is_disabled(page.id("prev-month-btn")));

    // August 2025 starts on Friday
    let placeholders = page
        .host
        .document
        .query_selector_all("#calendar-days > .inactive")
        .unwrap();
    assert_eq!(placeholders.len(), 5);

    page.click_id("prev-month-btn");
    page.click_id("prev-month-btn");
    assert_eq!(page.text("month-year-display"), "Jun 2025");
    assert!(page.host.document.is_disabled(page.id("prev-month-btn")));

    // Disabled previous button ignores clicks
    page.click_id("prev-month-btn");
    assert_eq!(page.text("month-year-display"), "Jun 2025");
}

#[test]
fn test_past_and_today_cannot_be_selected() {
    let mut page = Page::new();
    for iso in ["2025-06-03", "2025-06-10"] {
        let cell = page.day(iso);
        page.fire(Event::click(cell));
        assert!(!page.host.document.has_class(cell, "selected"));
    }
    assert_eq!(page.widget.selection().date(), None);

    let mut ctx = Context::new(&mut page.host, 2);
    assert!(!page.widget.select_date(&mut ctx, date(2025, 6, 1)).unwrap());
}

#[test]
fn test_select_date_then_time() {
    let mut page = Page::new();
    let cell = page.day("2025-06-11");
    page.fire(Event::click(cell));

    assert!(page.host.document.has_class(cell, "selected"));
    assert_eq!(page.text("selected-date-display"), "11. jun 2025.");
    assert_eq!(page.host.document.value(page.id("hidden-date")), "2025-06-11");
    assert_eq!(page.text("booking-submit-btn"), "Zakažite termin za 11. jun 2025. (izaberite vrijeme)");
    assert!(!page.submit_enabled());

    let slots = page.host.document.query_selector_all(".slot.available-slot").unwrap();
    assert_eq!(slots.len(), 8);

    let slot = page.slot("09:00");
    page.fire(Event::click(slot));
    assert!(page.host.document.has_class(slot, "selected-slot"));
    assert_eq!(page.host.document.value(page.id("hidden-time")), "09:00");
    assert_eq!(page.text("booking-submit-btn"), "Zakaži termin za 11. jun 2025. u 09:00");
    assert!(page.submit_enabled());

    // Picking another date drops the time
    let other = page.day("2025-06-12");
    page.fire(Event::click(other));
    assert!(!page.host.document.has_class(cell, "selected"));
    assert_eq!(page.widget.selection().time(), None);
    assert_eq!(page.host.document.value(page.id("hidden-time")), "");
    assert!(!page.submit_enabled());
}

#[test]
fn test_seeded_date_shows_two_booked_slots() {
    let mut page = Page::new();
    for _ in 0..5 {
        page.click_id("next-month-btn");
    }
    assert_eq!(page.text("month-year-display"), "Novembar 2025");
    let cell = page.day("2025-11-12");
    page.fire(Event::click(cell));

    let booked = page.host.document.query_selector_all(".slot.booked-slot").unwrap();
    let available = page.host.document.query_selector_all(".slot.available-slot").unwrap();
    assert_eq!(booked.len(), 2);
    assert_eq!(available.len(), 6);
    assert_eq!(page.host.document.get_attr(booked[0], "data-time"), None);

    // Booked slots are not selectable
    page.fire(Event::click(page.slot("10:00")));
    assert_eq!(page.widget.selection().time(), None);
    assert_eq!(
        page.host.local_storage.get_item("bookedSlots"),
        Some(r#"{"2025-11-12":["10:00","13:00"]}"#)
    );
}

#[test]
fn test_commit_books_and_resets() {
    let mut page = Page::new();
    page.fire(Event::click(page.day("2025-06-11")));
    page.fire(Event::click(page.slot("14:00")));

    let form = page.id("booking-form");
    let event = page.fire(Event::submit(form));
    assert!(event.is_default_prevented());

    assert_eq!(
        page.host.local_storage.get_item("bookedSlots"),
        Some(r#"{"2025-06-11":["14:00"]}"#)
    );
    assert_eq!(page.widget.selection().date(), None);
    assert_eq!(page.widget.selection().time(), None);
    assert_eq!(page.host.document.value(page.id("hidden-date")), "");
    assert_eq!(page.text("booking-submit-btn"), "Odaberite datum i vrijeme za zakazivanje");
    assert!(page.host.document.query_selector(".calendar-day-cell.selected").unwrap().is_none());

    let confirmation = page.id("confirmation");
    assert_eq!(page.host.document.style(confirmation, "display"), Some("block"));
    assert!(page.host.window.is_smooth_scrolling());

    page.advance(4999.0);
    assert_eq!(page.host.document.style(confirmation, "display"), Some("block"));
    page.advance(1.0);
    assert_eq!(page.host.document.style(confirmation, "display"), Some("none"));

    // Booking the same day again shows the slot as taken
    page.fire(Event::click(page.day("2025-06-11")));
    assert!(page.host.document.has_class(page.slot("14:00"), "booked-slot"));
}

#[test]
fn test_submit_without_time_is_a_no_op() {
    let mut page = Page::new();
    page.fire(Event::click(page.day("2025-06-11")));
    let form = page.id("booking-form");
    page.fire(Event::submit(form));
    assert_eq!(page.host.local_storage.get_item("bookedSlots"), None);
    assert!(page.widget.selection().date().is_some());
}

#[test]
fn test_write_failure_leaves_selection() {
    let mut page = Page::with_storage(Storage::session().with_quota(10), BookingConfig::default());
    page.fire(Event::click(page.day("2025-06-11")));
    page.fire(Event::click(page.slot("08:00")));

    let mut ctx = Context::new(&mut page.host, 2);
    let err = page.widget.commit(&mut ctx).unwrap_err();
    assert!(matches!(err, BookingError::Storage(_)));
    assert!(page.widget.selection().is_complete());
    let confirmation = page.id("confirmation");
    assert_eq!(page.host.document.style(confirmation, "display"), Some("none"));
}

#[test]
fn test_corrupt_store_is_reset_by_default() {
    let mut storage = Storage::session();
    storage.set_item("bookedSlots", "not json").unwrap();
    let mut page = Page::with_storage(storage, BookingConfig::default());
    page.fire(Event::click(page.day("2025-06-11")));
    page.fire(Event::click(page.slot("08:00")));
    page.fire(Event::submit(page.id("booking-form")));
    assert_eq!(
        page.host.local_storage.get_item("bookedSlots"),
        Some(r#"{"2025-06-11":["08:00"]}"#)
    );
}

#[test]
fn test_corrupt_store_can_fail() {
    let mut storage = Storage::session();
    storage.set_item("bookedSlots", "not json").unwrap();
    let config = BookingConfig { corrupt_store: CorruptStorePolicy::Fail, ..Default::default() };
    let mut page = Page::with_storage(storage, config);

    let mut ctx = Context::new(&mut page.host, 2);
    let err = page.widget.select_date(&mut ctx, date(2025, 6, 11)).unwrap_err();
    assert!(matches!(err, BookingError::CorruptStore { .. }));
}

#[test]
fn test_store_error_on_date_change_keeps_page_consistent() {
    let config = BookingConfig { corrupt_store: CorruptStorePolicy::Fail, ..Default::default() };
    let mut page = Page::with_storage(Storage::session(), config);
    page.fire(Event::click(page.day("2025-06-11")));
    page.fire(Event::click(page.slot("09:00")));
    assert!(page.submit_enabled());

    page.host.local_storage.set_item("bookedSlots", "{oops").unwrap();
    page.fire(Event::click(page.day("2025-06-12")));

    assert_eq!(page.widget.selection().date(), Some(date(2025, 6, 11)));
    assert_eq!(page.widget.selection().time(), Some("09:00"));
    assert!(page.host.document.has_class(page.day("2025-06-11"), "selected"));
    assert!(!page.host.document.has_class(page.day("2025-06-12"), "selected"));
    assert_eq!(page.text("selected-date-display"), "11. jun 2025.");
    assert_eq!(page.host.document.value(page.id("hidden-date")), "2025-06-11");
    assert_eq!(page.host.document.value(page.id("hidden-time")), "09:00");
    assert!(page.host.document.has_class(page.slot("09:00"), "selected-slot"));
    assert!(page.submit_enabled());
    assert_eq!(page.text("booking-submit-btn"), "Zakaži termin za 11. jun 2025. u 09:00");
}

#[test]
fn test_submit_label_reads_form_date() {
    let mut page = Page::new();
    page.fire(Event::click(page.day("2025-06-11")));
    let hidden = page.id("hidden-date");
    page.host.document.set_value(hidden, "sutra");
    page.fire(Event::click(page.slot("09:00")));
    assert_eq!(page.text("booking-submit-btn"), "Zakaži termin za sutra u 09:00");
}

#[test]
fn test_rerenders_reuse_dom_nodes() {
    let mut page = Page::new();
    page.click_id("next-month-btn");
    page.click_id("prev-month-btn");
    page.fire(Event::click(page.day("2025-06-11")));
    page.fire(Event::click(page.day("2025-06-12")));
    let size = page.host.document.tree().len();

    for _ in 0..500 {
        page.click_id("next-month-btn");
        page.click_id("prev-month-btn");
        page.fire(Event::click(page.day("2025-06-11")));
        page.fire(Event::click(page.slot("09:00")));
        page.fire(Event::click(page.day("2025-06-12")));
    }
    assert_eq!(page.host.document.tree().len(), size);
    assert_eq!(page.text("month-year-display"), "Jun 2025");
    assert_eq!(page.host.document.query_selector_all(".slot.available-slot").unwrap().len(), 8);
}

#[test]
fn test_missing_element_fails_mount() {
    let document = fz_html::parse("<html><body><div id=\"time-slots\"></div></body></html>").unwrap();
    let mut host = Host::new(document, Window::default(), Storage::session());
    let mut widget = BookingWidget::default();
    let err = widget.mount(&mut Context::new(&mut host, 2)).unwrap_err();
    assert!(matches!(err, BookingError::MissingElement("booking-form")));
    assert!(!widget.is_mounted());
}
