//! Booking widget
//!
//! Binds the calendar, time slots and submit button of the booking form.
//! The widget is mounted once the document is parsed; until then it
//! ignores every event.

use chrono::{Datelike, NaiveDate};
use fz_dom::{Event, EventType, NodeId};
use fz_runtime::{Context, Controller, ScrollBehavior, TaskToken, TimerId};

use crate::{
    BookedSlots, BookedSlotsStore, BookingConfig, BookingError, CalendarCursor, DayCell, Selection, generate_slots,
    render_month, submit_state,
};

const HIDE_CONFIRMATION: TaskToken = TaskToken::new(0, 0);

/// Element handles, looked up by id at mount time
#[derive(Debug, Clone, Copy)]
struct Elements {
    slots: NodeId,
    form: NodeId,
    confirmation: NodeId,
    date_display: NodeId,
    month_year: NodeId,
    days: NodeId,
    prev: NodeId,
    next: NodeId,
    hidden_date: NodeId,
    hidden_time: NodeId,
    submit: NodeId,
    weekdays: Option<NodeId>,
}

impl Elements {
    fn locate(ctx: &Context<'_>) -> Result<Self, BookingError> {
        let find = |id: &'static str| {
            ctx.document
                .get_element_by_id(id)
                .ok_or(BookingError::MissingElement(id))
        };
        Ok(Self {
            slots: find("time-slots")?,
            form: find("booking-form")?,
            confirmation: find("confirmation")?,
            date_display: find("selected-date-display")?,
            month_year: find("month-year-display")?,
            days: find("calendar-days")?,
            prev: find("prev-month-btn")?,
            next: find("next-month-btn")?,
            hidden_date: find("hidden-date")?,
            hidden_time: find("hidden-time")?,
            submit: find("booking-submit-btn")?,
            weekdays: ctx.document.get_element_by_id("calendar-weekdays"),
        })
    }
}

#[derive(Debug)]
pub struct BookingWidget {
    config: BookingConfig,
    store: BookedSlotsStore,
    elements: Option<Elements>,
    cursor: Option<CalendarCursor>,
    selection: Selection,
    hide_timer: Option<TimerId>,
}

impl BookingWidget {
    pub fn new(config: BookingConfig) -> Self {
        let store = BookedSlotsStore::new(&config.storage_key, config.corrupt_store);
        Self {
            config,
            store,
            elements: None,
            cursor: None,
            selection: Selection::default(),
            hide_timer: None,
        }
    }

    /// Locate the form and draw the current month. Fails if a required
    /// element is missing; the widget then stays inert.
    pub fn mount(&mut self, ctx: &mut Context<'_>) -> Result<(), BookingError> {
        let elements = Elements::locate(ctx)?;
        self.elements = Some(elements);
        self.cursor = Some(CalendarCursor::containing(ctx.today()));

        if let Some(header) = elements.weekdays {
            ctx.document.clear_children(header);
            for day in &self.config.locale.weekdays_short {
                let span = ctx.document.append_element(header, "span", &[]);
                ctx.document.set_text(span, day);
            }
        }

        self.render_calendar(ctx);
        self.update_submit(ctx);
        tracing::info!("Booking widget mounted");
        Ok(())
    }

    pub fn is_mounted(&self) -> bool {
        self.elements.is_some()
    }

    pub fn cursor(&self) -> Option<CalendarCursor> {
        self.cursor
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn store(&self) -> &BookedSlotsStore {
        &self.store
    }

    pub fn next_month(&mut self, ctx: &mut Context<'_>) {
        if let Some(cursor) = self.cursor {
            self.cursor = Some(cursor.next());
            self.render_calendar(ctx);
        }
    }

    pub fn prev_month(&mut self, ctx: &mut Context<'_>) {
        if let Some(cursor) = self.cursor {
            self.cursor = Some(cursor.prev());
            self.render_calendar(ctx);
        }
    }

    /// Select a date strictly after today. Returns false for today, past
    /// dates, or an unmounted widget.
    pub fn select_date(&mut self, ctx: &mut Context<'_>, date: NaiveDate) -> Result<bool, BookingError> {
        let Some(el) = self.elements else {
            return Ok(false);
        };
        if date <= ctx.today() {
            return Ok(false);
        }
        let iso = date.format("%Y-%m-%d").to_string();
        // Read the store first so a failure leaves the page unchanged
        let booked = self.booked_slots(ctx, &iso)?;

        let cells: Vec<NodeId> = ctx.document.tree().element_children(el.days).collect();
        for cell in cells {
            let is_target = ctx.document.get_attr(cell, "data-date") == Some(iso.as_str());
            ctx.document.toggle_class(cell, "selected", Some(is_target));
        }

        self.selection.select_date(date);
        ctx.document.set_value(el.hidden_time, "");
        let label = self.config.locale.format_date(date);
        ctx.document.set_text(el.date_display, &label);
        ctx.document.set_value(el.hidden_date, &iso);

        self.render_slots(ctx, &iso, &booked);
        self.update_submit(ctx);
        tracing::debug!("Selected {}", iso);
        Ok(true)
    }

    /// Select an available slot by its time. Ignored without a date or when
    /// the slot is booked or absent.
    pub fn select_time(&mut self, ctx: &mut Context<'_>, time: &str) -> bool {
        let Some(el) = self.elements else {
            return false;
        };
        if self.selection.date().is_none() {
            return false;
        }
        let slots: Vec<NodeId> = ctx.document.tree().element_children(el.slots).collect();
        let Some(chosen) = slots.iter().copied().find(|&s| {
            ctx.document.has_class(s, "available-slot") && ctx.document.get_attr(s, "data-time") == Some(time)
        }) else {
            return false;
        };

        for slot in slots {
            ctx.document.toggle_class(slot, "selected-slot", Some(slot == chosen));
        }
        self.selection.select_time(time);
        ctx.document.set_value(el.hidden_time, time);
        self.update_submit(ctx);
        true
    }

    /// Book the current selection. Returns false when the selection is
    /// incomplete. Storage failures leave the page untouched.
    pub fn commit(&mut self, ctx: &mut Context<'_>) -> Result<bool, BookingError> {
        let Some(el) = self.elements else {
            return Ok(false);
        };
        let (Some(date), Some(time)) = (self.selection.date_iso(), self.selection.time().map(str::to_string))
        else {
            return Ok(false);
        };

        self.store.append(&mut ctx.local_storage, &date, &time)?;

        ctx.document.set_style(el.confirmation, "display", "block");
        ctx.document.reset_form(el.form);
        self.selection.clear();
        self.render_calendar(ctx);
        self.update_submit(ctx);
        ctx.scroll_into_view(el.confirmation, ScrollBehavior::Smooth);

        if let Some(previous) = self.hide_timer.take() {
            ctx.clear_timeout(previous);
        }
        self.hide_timer = Some(ctx.set_timeout(HIDE_CONFIRMATION, self.config.confirmation_hide_ms));
        Ok(true)
    }

    fn render_calendar(&self, ctx: &mut Context<'_>) {
        let (Some(el), Some(cursor)) = (self.elements, self.cursor) else {
            return;
        };
        let grid = render_month(cursor, ctx.today(), self.selection.date());

        ctx.document.clear_children(el.days);
        let title = self.config.locale.month_title(cursor);
        ctx.document.set_text(el.month_year, &title);

        for cell in &grid.cells {
            match *cell {
                DayCell::Placeholder => {
                    ctx.document
                        .append_element(el.days, "div", &[("class", "calendar-day-cell inactive")]);
                }
                DayCell::Day { date, disabled, today, selected } => {
                    let iso = date.format("%Y-%m-%d").to_string();
                    let node = ctx.document.append_element(
                        el.days,
                        "div",
                        &[("class", "calendar-day-cell"), ("data-date", iso.as_str())],
                    );
                    ctx.document.set_text(node, &date.day().to_string());
                    if disabled {
                        ctx.document.add_class(node, "disabled");
                    }
                    if today {
                        ctx.document.add_class(node, "today");
                    }
                    if selected {
                        ctx.document.add_class(node, "selected");
                    }
                }
            }
        }
        ctx.document.set_disabled(el.prev, !grid.prev_enabled);
        tracing::debug!("Rendered {}", title);
    }

    /// Seed the demo date if it is the one shown, then read the store
    fn booked_slots(&self, ctx: &mut Context<'_>, iso: &str) -> Result<BookedSlots, BookingError> {
        if let Some(seed) = self.config.seed.as_ref().filter(|s| s.date == iso) {
            self.store.seed_if_empty(&mut ctx.local_storage, seed)?;
        }
        self.store.load(&ctx.local_storage)
    }

    fn render_slots(&self, ctx: &mut Context<'_>, iso: &str, booked: &BookedSlots) {
        let Some(el) = self.elements else {
            return;
        };
        ctx.document.clear_children(el.slots);
        let slots = generate_slots(self.config.first_hour, self.config.last_hour, booked.times_for(iso));

        for slot in &slots {
            let node = if slot.is_available() {
                ctx.document.append_element(
                    el.slots,
                    "div",
                    &[("class", "slot available-slot"), ("data-time", slot.time.as_str())],
                )
            } else {
                ctx.document.append_element(el.slots, "div", &[("class", "slot booked-slot")])
            };
            ctx.document.set_text(node, &slot.time);
        }

        if slots.is_empty() {
            let prompt = ctx
                .document
                .append_element(el.slots, "p", &[("class", "initial-prompt")]);
            ctx.document.set_text(prompt, &self.config.locale.no_slots);
        }
    }

    fn update_submit(&self, ctx: &mut Context<'_>) {
        let Some(el) = self.elements else {
            return;
        };
        let date_value = ctx.document.value(el.hidden_date).to_string();
        let state = submit_state(&self.selection, &date_value, &self.config.locale);
        ctx.document.set_disabled(el.submit, !state.enabled);
        ctx.document.set_text(el.submit, &state.label);
    }

    fn handle_click(&mut self, ctx: &mut Context<'_>, el: Elements, node: NodeId) -> Result<(), BookingError> {
        // Disabled buttons swallow clicks
        if node == el.prev {
            if !ctx.document.is_disabled(el.prev) {
                self.prev_month(ctx);
            }
        } else if node == el.next {
            self.next_month(ctx);
        } else if ctx.document.tree().parent(node) == Some(el.days) {
            if ctx.document.has_class(node, "disabled") {
                return Ok(());
            }
            let date = ctx
                .document
                .get_attr(node, "data-date")
                .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok());
            if let Some(date) = date {
                self.select_date(ctx, date)?;
            }
        } else if ctx.document.tree().parent(node) == Some(el.slots) {
            if let Some(time) = ctx.document.get_attr(node, "data-time").map(str::to_string) {
                if !self.select_time(ctx, &time) {
                    tracing::debug!("Ignoring slot {} without a selected date", time);
                }
            }
        }
        Ok(())
    }
}

impl Default for BookingWidget {
    fn default() -> Self {
        Self::new(BookingConfig::default())
    }
}

impl Controller for BookingWidget {
    fn name(&self) -> &'static str {
        "booking"
    }

    fn handle_event(&mut self, ctx: &mut Context<'_>, event: &mut Event) {
        let Some(el) = self.elements else {
            return;
        };
        let node = event.current_target;
        let result = match event.event_type {
            EventType::Click => self.handle_click(ctx, el, node),
            EventType::Submit if node == el.form => {
                event.prevent_default();
                self.commit(ctx).map(|_| ())
            }
            _ => Ok(()),
        };
        if let Err(err) = result {
            tracing::error!("Booking widget error: {}", err);
        }
    }

    fn on_timer(&mut self, ctx: &mut Context<'_>, token: TaskToken) {
        if token != HIDE_CONFIRMATION {
            return;
        }
        self.hide_timer = None;
        if let Some(el) = self.elements {
            ctx.document.set_style(el.confirmation, "display", "none");
        }
    }
}
