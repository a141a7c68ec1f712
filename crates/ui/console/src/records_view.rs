use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table},
};
use serde_json::Value as JsonValue;

use crate::{
    action::Action,
    components::Component,
    tui::{EventResponse, Frame},
};

/// Read-only table over the full record set behind one form's endpoint.
/// Columns come from the first record's keys; values are stringified as-is.
pub struct RecordsView {
    title: String,
    records: Option<Vec<JsonValue>>,
    offset: usize,
}

impl RecordsView {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            records: None,
            offset: 0,
        }
    }

    pub fn set_records(&mut self, records: Vec<JsonValue>) {
        self.records = Some(records);
        self.offset = 0;
    }

    fn columns(&self) -> Vec<String> {
        match self.records.as_ref().and_then(|r| r.first()) {
            Some(JsonValue::Object(map)) => map.keys().cloned().collect(),
            _ => Vec::new(),
        }
    }

    fn row_count(&self) -> usize {
        self.records.as_ref().map(|r| r.len()).unwrap_or(0)
    }
}

fn cell_text(value: Option<&JsonValue>) -> String {
    match value {
        Some(JsonValue::String(s)) => s.clone(),
        Some(JsonValue::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

impl Component for RecordsView {
    fn handle_key_events(&mut self, key: KeyEvent) -> Result<Option<EventResponse<Action>>> {
        match key.code {
            KeyCode::Up => {
                self.offset = self.offset.saturating_sub(1);
                Ok(Some(EventResponse::Stop(Action::Update)))
            }
            KeyCode::Down => {
                if self.offset + 1 < self.row_count() {
                    self.offset += 1;
                }
                Ok(Some(EventResponse::Stop(Action::Update)))
            }
            KeyCode::Home => {
                self.offset = 0;
                Ok(Some(EventResponse::Stop(Action::Update)))
            }
            KeyCode::Esc => Ok(Some(EventResponse::Stop(Action::ToggleRecords))),
            _ => Ok(None),
        }
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action {
            Action::RecordsLoaded(records) => {
                self.set_records(records);
                Ok(Some(Action::Update))
            }
            _ => Ok(None),
        }
    }

    fn draw(&mut self, f: &mut Frame<'_>, area: Rect) -> Result<()> {
        let block = Block::default()
            .title(format!(" {} — records ", self.title))
            .borders(Borders::ALL)
            .border_set(symbols::border::ROUNDED)
            .style(Style::default().fg(Color::White));
        let inner = block.inner(area);
        f.render_widget(Clear, area);
        f.render_widget(block, area);

        let Some(records) = &self.records else {
            let loading = Paragraph::new(Line::from(Span::styled(
                "Loading…",
                Style::default().fg(Color::Gray),
            )));
            f.render_widget(loading, inner);
            return Ok(());
        };

        if records.is_empty() {
            let empty = Paragraph::new(Line::from(Span::styled(
                "No records yet",
                Style::default().fg(Color::Gray),
            )));
            f.render_widget(empty, inner);
            return Ok(());
        }

        let columns = self.columns();
        let header = Row::new(
            columns
                .iter()
                .map(|c| Cell::from(c.clone()))
                .collect::<Vec<_>>(),
        )
        .style(Style::default().add_modifier(Modifier::BOLD));

        let rows: Vec<Row> = records
            .iter()
            .skip(self.offset)
            .map(|record| {
                Row::new(
                    columns
                        .iter()
                        .map(|c| Cell::from(cell_text(record.get(c))))
                        .collect::<Vec<_>>(),
                )
            })
            .collect();

        let width = (100 / columns.len().max(1)) as u16;
        let widths: Vec<Constraint> = columns.iter().map(|_| Constraint::Percentage(width)).collect();
        let table = Table::new(rows, widths)
            .header(header)
            .row_highlight_style(Style::default().bg(Color::White).fg(Color::Black));
        f.render_widget(table, inner);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn columns_come_from_first_record() {
        let mut view = RecordsView::new("Delegates");
        view.set_records(vec![
            json!({ "name": "Ada", "region": "North" }),
            json!({ "name": "Grace", "region": "South" }),
        ]);
        assert_eq!(view.columns(), vec!["name".to_string(), "region".to_string()]);
    }

    #[test]
    fn scrolling_is_clamped() {
        let mut view = RecordsView::new("Delegates");
        view.set_records(vec![json!({ "name": "Ada" }), json!({ "name": "Grace" })]);

        view.handle_key_events(KeyEvent::from(KeyCode::Down)).unwrap();
        assert_eq!(view.offset, 1);
        view.handle_key_events(KeyEvent::from(KeyCode::Down)).unwrap();
        assert_eq!(view.offset, 1);
        view.handle_key_events(KeyEvent::from(KeyCode::Up)).unwrap();
        assert_eq!(view.offset, 0);
    }

    #[test]
    fn stringified_cells() {
        assert_eq!(cell_text(Some(&json!("x"))), "x");
        assert_eq!(cell_text(Some(&json!(3))), "3");
        assert_eq!(cell_text(Some(&json!(null))), "");
        assert_eq!(cell_text(None), "");
    }
}
