use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use tui_input::{backend::crossterm::EventHandler, Input};

use forms::{
    validate, FieldKind, FieldSchema, FieldValue, FileRef, FormSchema, FormState, Notice,
    ValidationFailure,
};

use crate::{
    action::{Action, SubmitOutcome},
    components::Component,
    tui::{EventResponse, Frame},
};

/// One focusable position in the rendered form: a header field, a field
/// inside one row of the repeating section, or the add-row affordance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Slot {
    Header(usize),
    Row(usize, usize),
    AddRow,
}

/// Interactive form screen: one schema bound to one state store.
///
/// Logic and state only; rendering lives in `render.rs`. The view owns its
/// `FormState` exclusively and drops it when the view goes away — nothing
/// persists across navigation by design.
pub struct FormView {
    schema: FormSchema,
    state: FormState,
    endpoint: String,

    // UI / navigation state
    focused: usize,
    scroll: usize,
    editing: bool,
    input: Input,
    submitting: bool,
    last_inner_height: u16,
}

impl FormView {
    /// Create a view with empty state. A schema with a repeating section
    /// starts with one blank row so the user has something to type into.
    pub fn new(schema: FormSchema, endpoint: impl Into<String>) -> Self {
        let mut state = FormState::empty(&schema);
        if schema.section.is_some() {
            state.add_row(&schema);
        }
        Self {
            schema,
            state,
            endpoint: endpoint.into(),
            focused: 0,
            scroll: 0,
            editing: false,
            input: Input::default(),
            submitting: false,
            last_inner_height: 0,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn schema(&self) -> &FormSchema {
        &self.schema
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut FormState {
        &mut self.state
    }

    // --- Accessors used by the renderer --------------------------------------------------------

    pub(crate) fn focused_index(&self) -> usize {
        self.focused
    }

    pub(crate) fn scroll(&self) -> usize {
        self.scroll
    }

    pub(crate) fn is_editing(&self) -> bool {
        self.editing
    }

    pub(crate) fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub(crate) fn input_value(&self) -> &str {
        self.input.value()
    }

    pub(crate) fn set_last_inner_height(&mut self, h: u16) {
        self.last_inner_height = h;
    }

    // --- Slot bookkeeping ----------------------------------------------------------------------

    /// All focusable positions, in display order: header fields, then each
    /// row's fields, then the add-row affordance.
    pub(crate) fn slots(&self) -> Vec<Slot> {
        let mut slots: Vec<Slot> = (0..self.schema.fields.len()).map(Slot::Header).collect();
        if let Some(section) = &self.schema.section {
            for row in 0..self.state.row_count() {
                for idx in 0..section.fields.len() {
                    slots.push(Slot::Row(row, idx));
                }
            }
            slots.push(Slot::AddRow);
        }
        slots
    }

    pub(crate) fn slot_count(&self) -> usize {
        let mut count = self.schema.fields.len();
        if let Some(section) = &self.schema.section {
            count += self.state.row_count() * section.fields.len() + 1;
        }
        count
    }

    pub(crate) fn field_for(&self, slot: Slot) -> Option<(&FieldSchema, Option<usize>)> {
        match slot {
            Slot::Header(i) => self.schema.fields.get(i).map(|f| (f, None)),
            Slot::Row(row, i) => self
                .schema
                .section
                .as_ref()
                .and_then(|s| s.fields.get(i))
                .map(|f| (f, Some(row))),
            Slot::AddRow => None,
        }
    }

    fn value_for(&self, slot: Slot) -> Option<&FieldValue> {
        let (field, row) = self.field_for(slot)?;
        match row {
            None => self.state.get_value(&field.name),
            Some(r) => self.state.row_value(r, &field.name),
        }
    }

    fn set_value(&mut self, slot: Slot, value: FieldValue) {
        let Some((field, row)) = self.field_for(slot) else {
            return;
        };
        let name = field.name.clone();
        match row {
            None => self.state.set_value(&name, value),
            Some(r) => self.state.set_row_value(r, &name, value),
        }
    }

    fn current_slot(&self) -> Option<Slot> {
        self.slots().get(self.focused).copied()
    }

    fn current_field(&self) -> Option<(&FieldSchema, Option<usize>)> {
        self.current_slot().and_then(|s| self.field_for(s))
    }

    // --- Navigation ----------------------------------------------------------------------------

    fn focus_next(&mut self) {
        let count = self.slot_count();
        if count == 0 {
            return;
        }
        self.focused = (self.focused + 1) % count;
    }

    fn focus_prev(&mut self) {
        let count = self.slot_count();
        if count == 0 {
            return;
        }
        if self.focused == 0 {
            self.focused = count - 1;
        } else {
            self.focused -= 1;
        }
    }

    /// Compute visible slot bounds (start, end) given the inner height.
    pub(crate) fn visible_bounds(&self, inner_height: u16) -> (usize, usize) {
        let reserve = if inner_height > 8 { 4 } else { 2 };
        let max_visible = inner_height.saturating_sub(reserve).max(3) as usize;

        let total = self.slot_count();
        if total == 0 {
            return (0, 0);
        }
        let start = self.scroll.min(self.focused).min(total.saturating_sub(1));
        let end = (start + max_visible).min(total);
        (start, end)
    }

    /// Ensure the focused slot is within the current visible window.
    pub(crate) fn ensure_visible(&mut self, inner_height: u16) {
        let reserve = if inner_height > 8 { 4 } else { 2 };
        let max_visible = inner_height.saturating_sub(reserve).max(3) as usize;
        if self.focused < self.scroll {
            self.scroll = self.focused;
        } else if self.focused >= self.scroll + max_visible {
            self.scroll = self.focused + 1 - max_visible;
        }
    }

    // --- Editing -------------------------------------------------------------------------------

    fn start_editing(&mut self) {
        let Some(slot) = self.current_slot() else {
            return;
        };
        let Some((field, _)) = self.field_for(slot) else {
            return;
        };
        if !field.kind.is_textual() {
            return;
        }
        let existing = match self.value_for(slot) {
            Some(FieldValue::Text(s)) => s.clone(),
            Some(FieldValue::Number(Some(n))) => format_number(*n),
            Some(FieldValue::File(Some(f))) => f.path.display().to_string(),
            _ => String::new(),
        };
        self.editing = true;
        self.input = Input::default().with_value(existing);
    }

    fn cancel_editing(&mut self) {
        self.editing = false;
        self.input = Input::default();
    }

    fn commit_editing(&mut self) {
        let Some(slot) = self.current_slot() else {
            self.cancel_editing();
            return;
        };
        let Some((field, row)) = self.field_for(slot) else {
            self.cancel_editing();
            return;
        };
        let kind = field.kind.clone();
        let name = field.name.clone();
        let text = self.input.value().to_string();

        // Re-editing a field supersedes its previous inline parse error.
        self.state
            .failures
            .retain(|f| !(f.field == name && f.row == row));

        let value = match kind {
            FieldKind::Number => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    FieldValue::Number(None)
                } else {
                    match trimmed.parse::<f64>() {
                        Ok(n) => FieldValue::Number(Some(n)),
                        Err(_) => {
                            self.state.failures.push(ValidationFailure {
                                field: name.clone(),
                                row,
                                message: "Must be a number".into(),
                            });
                            FieldValue::Number(None)
                        }
                    }
                }
            }
            FieldKind::File => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    FieldValue::File(None)
                } else {
                    FieldValue::File(Some(FileRef::from_path(trimmed)))
                }
            }
            _ => FieldValue::Text(text),
        };
        self.set_value(slot, value);
        self.editing = false;
        self.input = Input::default();
    }

    // --- Toggles -------------------------------------------------------------------------------

    fn toggle_checkbox(&mut self, slot: Slot) {
        let next = match self.value_for(slot) {
            Some(FieldValue::Bool(b)) => !b,
            _ => true,
        };
        self.set_value(slot, FieldValue::Bool(next));
    }

    fn cycle_select(&mut self, slot: Slot, options: &[String], dir: i32) {
        if options.is_empty() {
            return;
        }
        let len = options.len() as i32;
        let next = match self.value_for(slot) {
            Some(FieldValue::Text(s)) if !s.is_empty() => {
                let idx = options.iter().position(|o| o == s).unwrap_or(0) as i32;
                (idx + dir).rem_euclid(len) as usize
            }
            // Unset displays as empty, so the first press enters the list
            // at the near end and every option stays one cycle away.
            _ => {
                if dir < 0 {
                    options.len() - 1
                } else {
                    0
                }
            }
        };
        self.set_value(slot, FieldValue::Text(options[next].clone()));
    }

    // --- Display -------------------------------------------------------------------------------

    /// Produce a display string for a slot's current value.
    pub(crate) fn display_value(&self, slot: Slot) -> String {
        match slot {
            Slot::AddRow => "[ + add entry ]".to_string(),
            _ => match self.value_for(slot) {
                Some(FieldValue::Text(s)) => s.clone(),
                Some(FieldValue::Number(Some(n))) => format_number(*n),
                Some(FieldValue::Number(None)) => String::new(),
                Some(FieldValue::Bool(true)) => "[x]".to_string(),
                Some(FieldValue::Bool(false)) => "[ ]".to_string(),
                Some(FieldValue::File(Some(f))) => f.path.display().to_string(),
                Some(FieldValue::File(None)) | None => String::new(),
            },
        }
    }

    /// The failure recorded for a slot, if any.
    pub(crate) fn failure_for(&self, slot: Slot) -> Option<&ValidationFailure> {
        let (field, row) = self.field_for(slot)?;
        match row {
            None => self.state.failure_for(&field.name),
            Some(r) => self.state.row_failure_for(r, &field.name),
        }
    }

    // --- Validation & submission ---------------------------------------------------------------

    /// Validate the current state; on success hand a snapshot upward for
    /// serialization. No request is fired until this reports zero failures.
    fn submit(&mut self) -> Option<Action> {
        if self.submitting {
            return Some(Action::Update);
        }
        self.state.notice = None;
        let snapshot = self.state.snapshot();
        let failures = validate(&self.schema, &snapshot);
        if !failures.is_empty() {
            self.state.failures = failures;
            return Some(Action::Update);
        }
        self.state.failures.clear();
        self.submitting = true;
        Some(Action::SnapshotReady(snapshot))
    }

    fn finish_submission(&mut self, outcome: SubmitOutcome) {
        self.submitting = false;
        match outcome {
            SubmitOutcome::Accepted(_) => {
                self.state.reset(&self.schema);
                if self.schema.section.is_some() {
                    self.state.add_row(&self.schema);
                }
                self.state.notice = Some(Notice::success("Submitted successfully"));
                self.focused = 0;
                self.scroll = 0;
            }
            SubmitOutcome::Rejected(message) => {
                // State untouched: the user corrects and resubmits.
                self.state.notice = Some(Notice::error(message));
            }
        }
    }
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

impl Component for FormView {
    fn handle_key_events(&mut self, key: KeyEvent) -> Result<Option<EventResponse<Action>>> {
        // Editing mode: route to the line editor
        if self.editing {
            match key.code {
                KeyCode::Enter => {
                    self.commit_editing();
                    return Ok(Some(EventResponse::Stop(Action::Update)));
                }
                KeyCode::Esc => {
                    self.cancel_editing();
                    return Ok(Some(EventResponse::Stop(Action::Update)));
                }
                _ => {
                    self.input.handle_event(&crossterm::event::Event::Key(key));
                    return Ok(Some(EventResponse::Stop(Action::Update)));
                }
            }
        }

        // Navigation / interaction
        match key.code {
            KeyCode::Up => {
                self.focus_prev();
                Ok(Some(EventResponse::Stop(Action::Update)))
            }
            KeyCode::Down | KeyCode::Tab => {
                self.focus_next();
                Ok(Some(EventResponse::Stop(Action::Update)))
            }
            KeyCode::BackTab => {
                self.focus_prev();
                Ok(Some(EventResponse::Stop(Action::Update)))
            }
            KeyCode::PageDown => {
                let reserve = if self.last_inner_height > 8 { 4 } else { 2 };
                let visible = self.last_inner_height.saturating_sub(reserve).max(3) as usize;
                let jump = visible.saturating_sub(1).max(1);
                for _ in 0..jump {
                    self.focus_next();
                }
                Ok(Some(EventResponse::Stop(Action::Update)))
            }
            KeyCode::PageUp => {
                let reserve = if self.last_inner_height > 8 { 4 } else { 2 };
                let visible = self.last_inner_height.saturating_sub(reserve).max(3) as usize;
                let jump = visible.saturating_sub(1).max(1);
                for _ in 0..jump {
                    self.focus_prev();
                }
                Ok(Some(EventResponse::Stop(Action::Update)))
            }
            KeyCode::Home => {
                self.focused = 0;
                Ok(Some(EventResponse::Stop(Action::Update)))
            }
            KeyCode::End => {
                if self.slot_count() > 0 {
                    self.focused = self.slot_count() - 1;
                }
                Ok(Some(EventResponse::Stop(Action::Update)))
            }
            KeyCode::Left | KeyCode::Right | KeyCode::Char(' ') => {
                if let Some(slot) = self.current_slot() {
                    if let Some((field, _)) = self.field_for(slot) {
                        match &field.kind {
                            FieldKind::Checkbox => {
                                self.toggle_checkbox(slot);
                                return Ok(Some(EventResponse::Stop(Action::Update)));
                            }
                            FieldKind::Select { options } => {
                                let opts = options.clone();
                                let dir = if matches!(key.code, KeyCode::Left) { -1 } else { 1 };
                                self.cycle_select(slot, &opts, dir);
                                return Ok(Some(EventResponse::Stop(Action::Update)));
                            }
                            _ => {}
                        }
                    }
                }
                Ok(None)
            }
            KeyCode::Enter => match self.current_slot() {
                Some(Slot::AddRow) => {
                    self.state.add_row(&self.schema);
                    Ok(Some(EventResponse::Stop(Action::Update)))
                }
                Some(slot)
                    if self
                        .field_for(slot)
                        .map(|(f, _)| f.kind.is_textual())
                        .unwrap_or(false) =>
                {
                    self.start_editing();
                    Ok(Some(EventResponse::Stop(Action::Update)))
                }
                _ => Ok(Some(EventResponse::Stop(Action::Submit))),
            },
            KeyCode::Esc => {
                if self.state.notice.is_some() || !self.state.failures.is_empty() {
                    self.state.notice = None;
                    self.state.failures.clear();
                    Ok(Some(EventResponse::Stop(Action::Update)))
                } else {
                    Ok(None)
                }
            }
            _ => Ok(None),
        }
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action {
            Action::Submit => Ok(self.submit()),
            Action::SubmissionFinished(outcome) => {
                self.finish_submission(outcome);
                Ok(Some(Action::Update))
            }
            Action::Error(message) => {
                self.state.notice = Some(Notice::error(message));
                Ok(Some(Action::Update))
            }
            _ => Ok(None),
        }
    }

    fn draw(&mut self, f: &mut Frame<'_>, area: ratatui::layout::Rect) -> Result<()> {
        crate::render::render_form(self, f, area)?;
        Ok(())
    }
}
