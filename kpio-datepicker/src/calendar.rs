//! Calendar widget
//!
//! A calendar owns two independent pieces of state: the displayed month
//! (navigation cursor) and the selection (commitment). Every mutation funnels
//! through [`Calendar::rebuild`], which clears and regenerates the header,
//! day grid and (optionally) input regions from that state. The DOM is a
//! projection only; nothing is ever read back from rendered text.
//!
//! Region listeners are registered once on the shell regions and resolve
//! their target through the button map of the latest build, so they survive
//! every rebuild.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use hashbrown::HashMap;
use kpio_calendar::{
    CalendarDate, CellContext, CellFlags, DateFormatter, DayCell, DisplayedMonth, MonthGrid,
    ParseError, SelectionState,
};
use kpio_dom::{Document, Event, EventType, ListenerOptions, NodeId};

use crate::config::{CalendarOptions, NavEvent};
use crate::connector::{CalendarConnector, LinkedCalendar};
use crate::error::PickerError;
use crate::page::Page;
use crate::shell::{self, ShellHandles, ShellSpec, DARK_CLASS, DAY_CLASS};

pub const PREV_CLASS: &str = "datepicker__calendar_prev";
pub const NEXT_CLASS: &str = "datepicker__calendar_next";
pub const TITLE_CLASS: &str = "datepicker__calendar_title";
pub const INPUTS_WRAP_CLASS: &str = "datepicker__calendar_inputs-wrap";
pub const TODAY_CLASS: &str = "datepicker__calendar_today";
pub const INPUT_ERROR_CLASS: &str = "error";

pub const INVALID_DATE_MESSAGE: &str = "The entered date is invalid";

const CHEVRON_PREV: &str = r#"<svg viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round"><path d="M15 18l-6-6 6-6"/></svg>"#;
const CHEVRON_NEXT: &str = r#"<svg viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round"><path d="M9 18l6-6-6-6"/></svg>"#;

/// Day cell classes, in the order they are applied.
const CELL_CLASSES: [(CellFlags, &str); 8] = [
    (CellFlags::ACTIVE, "active"),
    (CellFlags::HIGHLIGHTED, "highlight"),
    (CellFlags::DISABLED, "disabled"),
    (CellFlags::OUTSIDE, "outside"),
    (CellFlags::TODAY, "today"),
    (CellFlags::RANGE_START, "range-start"),
    (CellFlags::RANGE_END, "range-end"),
    (CellFlags::PLACEHOLDER, "placeholder"),
];

/// Navigation direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Prev,
    Next,
}

impl Direction {
    pub(crate) fn delta(self) -> i32 {
        match self {
            Direction::Prev => -1,
            Direction::Next => 1,
        }
    }
}

/// Day button to focus after a rebuild.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusEdge {
    First,
    Last,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InputError,
}

/// A user-visible error, shown until the next rebuild.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorEntry {
    pub kind: ErrorKind,
    pub message: String,
}

impl ErrorEntry {
    pub fn invalid_input() -> Self {
        ErrorEntry {
            kind: ErrorKind::InputError,
            message: INVALID_DATE_MESSAGE.into(),
        }
    }
}

struct CalendarState {
    displayed: DisplayedMonth,
    /// Own selection. Range calendars with a connector read the connector's.
    selection: SelectionState,
    grid: MonthGrid,
    cells: Vec<DayCell>,
    /// Pushed since the last render of the error region.
    pending_errors: Vec<ErrorEntry>,
    /// Currently on screen.
    rendered_errors: Vec<ErrorEntry>,
    /// Day button -> grid index, for the current build only.
    day_buttons: HashMap<NodeId, usize>,
    button_at: Vec<Option<NodeId>>,
    prev_button: Option<NodeId>,
    next_button: Option<NodeId>,
    date_input: Option<NodeId>,
    today_button: Option<NodeId>,
    dark: bool,
}

struct CalendarInner {
    self_ref: Weak<CalendarInner>,
    page: Page,
    options: CalendarOptions,
    formatter: DateFormatter,
    connector: Option<CalendarConnector>,
    handles: ShellHandles,
    icon_prev: String,
    icon_next: String,
    state: RefCell<CalendarState>,
}

/// A mounted calendar.
///
/// Cheap to clone; clones share one widget.
#[derive(Clone)]
pub struct Calendar {
    inner: Rc<CalendarInner>,
}

/// Use `markup` if it parses, the built-in chevron otherwise.
fn checked_icon(markup: Option<&str>, fallback: &str, which: &str) -> String {
    match markup {
        Some(markup) => match Document::new().parse_fragment(markup) {
            Ok(_) => markup.into(),
            Err(e) => {
                log::warn!(
                    "[KPIO Calendar] {} icon is not valid markup ({}), using default",
                    which,
                    e
                );
                fallback.into()
            }
        },
        None => fallback.into(),
    }
}

fn nav_button(doc: &mut Document, parent: NodeId, class: &str, label: &str, icon: &str) -> NodeId {
    let button = doc.create_element("button");
    doc.add_class(button, class);
    doc.set_attribute(button, "type", "button");
    doc.set_attribute(button, "aria-label", label);
    if let Err(e) = doc.append_markup(button, icon) {
        log::error!("[KPIO Calendar] icon markup rejected: {}", e);
    }
    doc.append_child(parent, button);
    button
}

impl Calendar {
    /// Build a calendar and mount it.
    ///
    /// The mount target and the initial date are checked before anything is
    /// created; on error the document is left untouched.
    pub fn new(page: &Page, options: CalendarOptions) -> Result<Calendar, PickerError> {
        let parent = shell::resolve(&page.document(), &options.element)
            .map_err(|e| e.logged("Calendar"))?;
        let formatter = options.formatter();
        let initial = match &options.selected_date {
            Some(date) => date.resolve(&formatter).map_err(|e| e.logged("Calendar"))?,
            None => options.clock.today(),
        };

        let connector = match (&options.connector, options.range_mode) {
            (Some(connector), true) => Some(connector.clone()),
            (Some(_), false) => {
                log::warn!("[KPIO Calendar] connector given without range mode, ignoring it");
                None
            }
            (None, _) => None,
        };
        let selection = if options.range_mode {
            SelectionState::empty_range()
        } else {
            SelectionState::single(Some(initial))
        };

        let dark = options.dark_mode || (options.dark_mode_auto && page.prefers_dark());
        let spec = ShellSpec {
            theme: options.theme,
            custom_css: options.styles.clone(),
            dark_mode: dark,
            dark_capable: dark || options.dark_mode_auto,
            weekday_labels: options
                .locale
                .weekday_header(options.week_start)
                .into_iter()
                .map(String::from)
                .collect(),
        };
        let handles = shell::render_calendar_shell(&mut page.document_mut(), &spec);

        let icon_prev = checked_icon(options.icon_prev.as_deref(), CHEVRON_PREV, "previous");
        let icon_next = checked_icon(options.icon_next.as_deref(), CHEVRON_NEXT, "next");
        let displayed = DisplayedMonth::of(initial);
        let grid = MonthGrid::compute(displayed, options.week_start);

        let inner = Rc::new_cyclic(|self_ref| CalendarInner {
            self_ref: self_ref.clone(),
            page: page.clone(),
            formatter,
            connector,
            handles,
            icon_prev,
            icon_next,
            state: RefCell::new(CalendarState {
                displayed,
                selection,
                grid,
                cells: Vec::new(),
                pending_errors: Vec::new(),
                rendered_errors: Vec::new(),
                day_buttons: HashMap::new(),
                button_at: Vec::new(),
                prev_button: None,
                next_button: None,
                date_input: None,
                today_button: None,
                dark,
            }),
            options,
        });

        inner.listen();
        inner.rebuild(true, None);
        page.document_mut().append_child(parent, handles.host);

        if let Some(connector) = &inner.connector {
            let weak = Rc::downgrade(&inner);
            let linked: Weak<dyn LinkedCalendar> = weak;
            connector.subscribe(linked);
        }
        if inner.options.dark_mode_auto {
            let weak = Rc::downgrade(&inner);
            page.on_color_scheme_change(Rc::new(move |dark| {
                if let Some(inner) = weak.upgrade() {
                    inner.set_dark_mode(dark);
                }
            }));
        }

        log::debug!(
            "[KPIO Calendar] mounted at node {} showing {} (range mode: {})",
            parent,
            displayed,
            inner.options.range_mode
        );

        let calendar = Calendar { inner };
        if let Some(callback) = calendar.inner.options.on_render.clone() {
            callback(&calendar);
        }
        Ok(calendar)
    }

    /// Show the previous or next month.
    ///
    /// With `focus_edge`, the first or last day of the new month takes focus.
    pub fn navigate(&self, direction: Direction, focus_edge: Option<FocusEdge>) {
        self.inner.navigate(direction, focus_edge);
    }

    /// Select day `day` of the displayed month.
    pub fn handle_day_activate(&self, day: u32) {
        self.inner.handle_day_activate(day);
    }

    /// Handle `key` pressed on the button of `day`. Returns whether the key
    /// was consumed.
    pub fn handle_keyboard_navigation(&self, key: &str, day: u32) -> bool {
        self.inner.handle_keyboard_navigation(key, day)
    }

    /// Commit the text typed into the date field.
    pub fn handle_text_input_commit(&self, raw: &str) {
        self.inner.handle_text_input_commit(raw);
    }

    /// Select today and show its month.
    ///
    /// In range mode this only moves this calendar; a [`RangePicker`]
    /// re-pairs both months through
    /// [`RangePicker::jump_to_today`](crate::range::RangePicker::jump_to_today).
    ///
    /// [`RangePicker`]: crate::range::RangePicker
    pub fn jump_to_today(&self) {
        let today = self.inner.options.clock.today();
        self.inner.select(today, true);
    }

    pub fn rebuild(&self, rebuild_inputs: bool, focus_edge: Option<FocusEdge>) {
        self.inner.rebuild(rebuild_inputs, focus_edge);
    }

    /// Select `date` and show its month.
    pub fn set_date(&self, date: CalendarDate) {
        self.inner.select(date, true);
    }

    /// Parse `text` with the widget's pattern and select it. A parse failure
    /// is shown like bad typed input and returned.
    pub fn set_date_str(&self, text: &str) -> Result<CalendarDate, ParseError> {
        match self.inner.formatter.parse(text) {
            Ok(date) => {
                self.inner.select(date, true);
                Ok(date)
            }
            Err(err) => {
                self.inner.reject_input(text, &err);
                Err(err)
            }
        }
    }

    /// Show `month` without touching the selection or firing nav callbacks.
    pub fn set_displayed_month(&self, month: DisplayedMonth) {
        self.inner.state.borrow_mut().displayed = month;
        self.inner.rebuild(true, None);
    }

    /// Move the cursor only; the caller rebuilds.
    pub(crate) fn show_month(&self, month: DisplayedMonth) {
        self.inner.state.borrow_mut().displayed = month;
    }

    pub fn set_dark_mode(&self, dark: bool) {
        self.inner.set_dark_mode(dark);
    }

    pub fn is_dark(&self) -> bool {
        self.inner.state.borrow().dark
    }

    pub fn selection(&self) -> SelectionState {
        self.inner.current_selection()
    }

    /// Selected date in single mode.
    pub fn selected_date(&self) -> Option<CalendarDate> {
        match self.selection() {
            SelectionState::Single { date } => date,
            SelectionState::Range { .. } => None,
        }
    }

    /// Selected date formatted with the widget's pattern.
    pub fn formatted_value(&self) -> Option<String> {
        self.selected_date().map(|d| self.inner.formatter.format(d))
    }

    pub fn displayed_month(&self) -> DisplayedMonth {
        self.inner.state.borrow().displayed
    }

    /// Errors currently rendered.
    pub fn errors(&self) -> Vec<ErrorEntry> {
        self.inner.state.borrow().rendered_errors.clone()
    }

    pub fn day_cells(&self) -> Vec<DayCell> {
        self.inner.state.borrow().cells.clone()
    }

    pub fn handles(&self) -> ShellHandles {
        self.inner.handles
    }

    pub fn formatter(&self) -> &DateFormatter {
        &self.inner.formatter
    }

    pub fn connector(&self) -> Option<&CalendarConnector> {
        self.inner.connector.as_ref()
    }

    pub fn is_range_mode(&self) -> bool {
        self.inner.options.range_mode
    }

    pub fn page(&self) -> &Page {
        &self.inner.page
    }

    pub fn date_input(&self) -> Option<NodeId> {
        self.inner.state.borrow().date_input
    }

    pub fn today_button(&self) -> Option<NodeId> {
        self.inner.state.borrow().today_button
    }

    pub fn prev_button(&self) -> Option<NodeId> {
        self.inner.state.borrow().prev_button
    }

    pub fn next_button(&self) -> Option<NodeId> {
        self.inner.state.borrow().next_button
    }

    /// Button of a day of the displayed month.
    pub fn day_button(&self, day: u32) -> Option<NodeId> {
        let state = self.inner.state.borrow();
        state
            .grid
            .index_of_day(day)
            .and_then(|i| state.button_at.get(i).copied().flatten())
    }

    /// Whether both handles refer to one widget.
    pub fn same_as(&self, other: &Calendar) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl CalendarInner {
    fn handle(&self) -> Option<Calendar> {
        self.self_ref.upgrade().map(|inner| Calendar { inner })
    }

    fn current_selection(&self) -> SelectionState {
        match &self.connector {
            Some(connector) => connector.selection(),
            None => self.state.borrow().selection,
        }
    }

    // ── Event wiring ─────────────────────────────────────────────────

    fn listen(&self) {
        let h = self.handles;
        self.on(h.header, EventType::Click, Self::on_header_click);
        self.on(h.days, EventType::Click, Self::on_day_click);
        self.on(h.days, EventType::KeyDown, Self::on_day_key_down);
        self.on(h.inputs, EventType::Click, Self::on_inputs_click);
        self.on(h.inputs, EventType::KeyUp, Self::on_input_key_up);
    }

    fn on(&self, node: NodeId, event_type: EventType, handler: fn(&CalendarInner, &mut Event)) {
        let weak = self.self_ref.clone();
        self.page.add_event_listener(
            node,
            event_type,
            Rc::new(move |event: &mut Event| {
                if let Some(inner) = weak.upgrade() {
                    handler(&inner, event);
                }
            }),
            ListenerOptions::default(),
        );
    }

    fn on_header_click(&self, event: &mut Event) {
        let (prev, next) = {
            let state = self.state.borrow();
            (state.prev_button, state.next_button)
        };
        if prev.is_some_and(|b| event.path_contains(b)) {
            self.navigate(Direction::Prev, None);
        } else if next.is_some_and(|b| event.path_contains(b)) {
            self.navigate(Direction::Next, None);
        }
    }

    fn on_day_click(&self, event: &mut Event) {
        let day = {
            let state = self.state.borrow();
            event
                .path
                .iter()
                .find_map(|node| state.day_buttons.get(node).copied())
                .and_then(|index| state.grid.day_at(index))
        };
        if let Some(day) = day {
            self.handle_day_activate(day);
        }
    }

    fn on_day_key_down(&self, event: &mut Event) {
        let day = {
            let state = self.state.borrow();
            state
                .day_buttons
                .get(&event.target)
                .and_then(|&index| state.grid.day_at(index))
        };
        let key = event.key().map(String::from);
        if let (Some(day), Some(key)) = (day, key) {
            if self.handle_keyboard_navigation(&key, day) {
                event.prevent_default();
            }
        }
    }

    fn on_inputs_click(&self, event: &mut Event) {
        let today_button = self.state.borrow().today_button;
        if today_button.is_some_and(|b| event.path_contains(b)) {
            let today = self.options.clock.today();
            self.select(today, true);
        }
    }

    fn on_input_key_up(&self, event: &mut Event) {
        let input = self.state.borrow().date_input;
        if input != Some(event.target) || event.key() == Some("Tab") {
            return;
        }
        let raw = self
            .page
            .document()
            .value(event.target)
            .map(String::from)
            .unwrap_or_default();
        self.handle_text_input_commit(&raw);
    }

    // ── Operations ───────────────────────────────────────────────────

    fn navigate(&self, direction: Direction, focus_edge: Option<FocusEdge>) {
        let shifted = self.state.borrow().displayed.shifted(direction.delta());
        let month = match shifted {
            Some(month) => month,
            None => {
                log::warn!("[KPIO Calendar] cannot navigate {:?}: out of range", direction);
                return;
            }
        };
        self.state.borrow_mut().displayed = month;
        log::debug!("[KPIO Calendar] navigate {:?} to {}", direction, month);
        self.rebuild(true, focus_edge);

        let callback = match direction {
            Direction::Prev => self.options.on_prev_nav.clone(),
            Direction::Next => self.options.on_next_nav.clone(),
        };
        if let (Some(callback), Some(calendar)) = (callback, self.handle()) {
            callback(&NavEvent {
                displayed_month: month,
                calendar,
            });
        }
    }

    fn handle_day_activate(&self, day: u32) {
        let date = self.state.borrow().displayed.day(day);
        match date {
            Some(date) => self.select(date, true),
            None => log::debug!("[KPIO Calendar] no day {} in the displayed month", day),
        }
    }

    fn handle_keyboard_navigation(&self, key: &str, day: u32) -> bool {
        let (index, days_in_month, first, last) = {
            let state = self.state.borrow();
            let grid = &state.grid;
            match grid.index_of_day(day) {
                Some(index) => (
                    index,
                    grid.days_in_month(),
                    grid.first_enabled(),
                    grid.last_enabled(),
                ),
                None => return false,
            }
        };
        let step = |delta: isize| self.state.borrow().grid.step(index, delta);

        match key {
            "ArrowLeft" => {
                if day > 1 {
                    self.focus_index(step(-1));
                } else {
                    self.navigate(Direction::Prev, Some(FocusEdge::Last));
                }
            }
            "ArrowRight" => {
                if day < days_in_month {
                    self.focus_index(step(1));
                } else {
                    self.navigate(Direction::Next, Some(FocusEdge::First));
                }
            }
            "ArrowUp" => {
                if day > 7 {
                    self.focus_index(step(-7));
                } else {
                    self.navigate(Direction::Prev, Some(FocusEdge::Last));
                }
            }
            "ArrowDown" => {
                if day + 7 <= days_in_month {
                    self.focus_index(step(7));
                } else {
                    self.navigate(Direction::Next, Some(FocusEdge::First));
                }
            }
            "Enter" | " " => self.handle_day_activate(day),
            "Home" => self.focus_index(first),
            "End" => self.focus_index(last),
            _ => return false,
        }
        true
    }

    fn handle_text_input_commit(&self, raw: &str) {
        match self.formatter.parse(raw) {
            Ok(date) => self.select(date, false),
            Err(err) => self.reject_input(raw, &err),
        }
    }

    fn reject_input(&self, raw: &str, err: &ParseError) {
        log::debug!("[KPIO Calendar] rejected input {:?}: {}", raw, err);
        self.state
            .borrow_mut()
            .pending_errors
            .push(ErrorEntry::invalid_input());
        self.render_errors();
    }

    /// Commit `date` as the user's choice and show its month.
    ///
    /// Range calendars hand the date to their connector, which rebuilds
    /// every linked calendar and reports the change. Without a connector the
    /// click is dropped.
    fn select(&self, date: CalendarDate, rebuild_inputs: bool) {
        if self.options.range_mode {
            match &self.connector {
                Some(connector) => {
                    self.state.borrow_mut().displayed = DisplayedMonth::of(date);
                    connector.register_click(date);
                }
                None => log::debug!(
                    "[KPIO Calendar] range mode without connector, ignoring {}",
                    date
                ),
            }
            return;
        }

        {
            let mut state = self.state.borrow_mut();
            state.selection = SelectionState::single(Some(date));
            state.displayed = DisplayedMonth::of(date);
        }
        self.rebuild(rebuild_inputs, None);

        if let Some(callback) = self.options.on_change.clone() {
            callback(&self.formatter.format(date));
        }
    }

    fn set_dark_mode(&self, dark: bool) {
        self.state.borrow_mut().dark = dark;
        self.page
            .document_mut()
            .toggle_class(self.handles.calendar, DARK_CLASS, Some(dark));
    }

    fn focus_index(&self, index: Option<usize>) {
        let button = {
            let state = self.state.borrow();
            index.and_then(|i| state.button_at.get(i).copied().flatten())
        };
        if let Some(button) = button {
            self.page.focus(button);
        }
    }

    /// Day number whose button holds focus, if focus is in this grid.
    fn focused_day(&self) -> Option<u32> {
        let focused = self.page.focused()?;
        let state = self.state.borrow();
        state
            .day_buttons
            .get(&focused)
            .and_then(|&index| state.grid.day_at(index))
    }

    // ── Rendering ────────────────────────────────────────────────────

    fn rebuild(&self, rebuild_inputs: bool, focus_edge: Option<FocusEdge>) {
        let focused_day = self.focused_day();
        let selection = self.current_selection();
        let ctx = CellContext {
            hide_other_month_days: self.options.hide_other_month_days,
            today: Some(self.options.clock.today()),
        };
        {
            let mut state = self.state.borrow_mut();
            state.grid = MonthGrid::compute(state.displayed, self.options.week_start);
            state.cells = state.grid.decorate(&selection, &ctx);
        }

        self.page.clear_children(self.handles.header);
        self.page.clear_children(self.handles.days);
        if rebuild_inputs {
            self.page.clear_children(self.handles.inputs);
        }
        {
            let mut doc = self.page.document_mut();
            let mut state = self.state.borrow_mut();
            self.render_header(&mut doc, &mut state);
            self.render_days(&mut doc, &mut state);
            if rebuild_inputs {
                state.date_input = None;
                state.today_button = None;
                if !self.options.hide_inputs {
                    self.render_inputs(&mut doc, &mut state, &selection);
                }
            }
        }
        self.render_errors();

        let target = {
            let state = self.state.borrow();
            let index = match focus_edge {
                Some(FocusEdge::First) => state.grid.first_enabled(),
                Some(FocusEdge::Last) => state.grid.last_enabled(),
                None => focused_day.and_then(|day| {
                    state.grid.index_of_day(day).or_else(|| {
                        state
                            .cells
                            .iter()
                            .find(|c| c.is_active() && !c.is_disabled())
                            .map(|c| c.index)
                    })
                }),
            };
            index.and_then(|i| state.button_at.get(i).copied().flatten())
        };
        if let Some(button) = target {
            self.page.focus(button);
        }

        log::trace!(
            "[KPIO Calendar] rebuilt {} (inputs: {}, focus: {:?})",
            self.state.borrow().displayed,
            rebuild_inputs,
            target
        );
    }

    fn render_header(&self, doc: &mut Document, state: &mut CalendarState) {
        let header = self.handles.header;
        state.prev_button = None;
        state.next_button = None;

        if !self.options.hide_prev_nav {
            state.prev_button = Some(nav_button(doc, header, PREV_CLASS, "Previous", &self.icon_prev));
        }
        let title = doc.create_element("span");
        doc.add_class(title, TITLE_CLASS);
        doc.append_text(title, &self.options.locale.title(state.displayed));
        doc.append_child(header, title);
        if !self.options.hide_next_nav {
            state.next_button = Some(nav_button(doc, header, NEXT_CLASS, "Next", &self.icon_next));
        }
    }

    fn render_days(&self, doc: &mut Document, state: &mut CalendarState) {
        let days = self.handles.days;
        state.day_buttons.clear();
        state.button_at.clear();
        state.button_at.resize(state.cells.len(), None);

        for cell in &state.cells {
            let slot = doc.create_element("div");
            doc.add_class(slot, DAY_CLASS);
            for (flag, class) in CELL_CLASSES {
                if cell.flags.contains(flag) {
                    doc.add_class(slot, class);
                }
            }
            doc.append_child(days, slot);
            if cell.is_placeholder() {
                continue;
            }

            let button = doc.create_element("button");
            doc.set_attribute(button, "type", "button");
            if cell.is_disabled() {
                doc.set_attribute(button, "disabled", "true");
            }
            doc.append_text(button, &cell.day_number.to_string());
            doc.append_child(slot, button);
            state.day_buttons.insert(button, cell.index);
            state.button_at[cell.index] = Some(button);
        }
    }

    fn render_inputs(&self, doc: &mut Document, state: &mut CalendarState, selection: &SelectionState) {
        let inputs = self.handles.inputs;
        let id = format!("datepicker-input-{}", self.handles.host);

        let label = doc.create_element("label");
        doc.set_attribute(label, "for", &id);
        doc.append_text(label, &self.options.input_label);
        doc.append_child(inputs, label);

        let wrap = doc.create_element("div");
        doc.add_class(wrap, INPUTS_WRAP_CLASS);
        doc.append_child(inputs, wrap);

        let input = doc.create_element("input");
        doc.set_attribute(input, "type", "text");
        doc.set_attribute(input, "id", &id);
        doc.set_attribute(input, "title", &self.options.input_label);
        doc.set_attribute(input, "placeholder", &self.options.input_placeholder);
        let value = selection
            .selected()
            .map(|d| self.formatter.format(d))
            .unwrap_or_default();
        doc.set_value(input, &value);
        doc.append_child(wrap, input);

        let today = doc.create_element("button");
        doc.add_class(today, TODAY_CLASS);
        doc.set_attribute(today, "type", "button");
        doc.append_text(today, "Today");
        doc.append_child(wrap, today);

        state.date_input = Some(input);
        state.today_button = Some(today);
    }

    /// Render pending errors; whatever was shown before is cleared.
    fn render_errors(&self) {
        self.page.clear_children(self.handles.errors);
        let mut doc = self.page.document_mut();
        let mut state = self.state.borrow_mut();

        let pending = std::mem::take(&mut state.pending_errors);
        if let Some(input) = state.date_input {
            doc.remove_class(input, INPUT_ERROR_CLASS);
        }
        for entry in &pending {
            let span = doc.create_element("span");
            doc.append_text(span, &entry.message);
            doc.append_child(self.handles.errors, span);
            if entry.kind == ErrorKind::InputError {
                if let Some(input) = state.date_input {
                    doc.add_class(input, INPUT_ERROR_CLASS);
                }
            }
        }
        state.rendered_errors = pending;
    }
}

impl LinkedCalendar for CalendarInner {
    fn rebuild_linked(&self) {
        self.rebuild(false, None);
    }
}
