use color_eyre::Result;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style, Stylize},
    symbols,
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use forms::NoticeKind;

use crate::form_view::{FormView, Slot};
use crate::tui::Frame;

/// Diagnostic data produced during rendering; the pure window/scroll
/// calculations are testable without a terminal.
#[derive(Debug, Clone)]
pub struct FormRenderMetrics {
    pub total_slots: usize,
    pub visible_start: usize,
    pub visible_end: usize,
    pub focused_index: usize,
    pub scroll: usize,
    pub thumb_y: Option<usize>,
}

/// Compute the vertical thumb position for the scrollbar-like indicator.
///
/// Returns `Some(y)` with `0 <= y < track_height`, or `None` when no
/// scrollbar is needed (everything fits, or degenerate sizes).
pub fn compute_scrollbar_thumb(
    total: usize,
    visible: usize,
    scroll: usize,
    track_height: u16,
) -> Option<usize> {
    if track_height == 0 {
        return None;
    }
    if total == 0 || visible == 0 || total <= visible {
        return None;
    }

    let max_thumb_y = track_height.saturating_sub(1) as usize;
    let denom = total.saturating_sub(visible).max(1);
    let ratio = (scroll as f32) / (denom as f32);
    let thumb_y = (ratio * (max_thumb_y as f32)).round() as usize;
    Some(thumb_y.min(max_thumb_y))
}

/// Deterministic projection of schema + state into the frame. Mutates only
/// the view's scroll bookkeeping (`ensure_visible`, remembered height).
pub fn render_form(view: &mut FormView, f: &mut Frame<'_>, area: Rect) -> Result<FormRenderMetrics> {
    if area.width < 5 || area.height < 5 {
        return Ok(FormRenderMetrics {
            total_slots: view.slot_count(),
            visible_start: 0,
            visible_end: 0,
            focused_index: view.focused_index(),
            scroll: view.scroll(),
            thumb_y: None,
        });
    }

    let block = Block::default()
        .title(format!(" {} ", view.schema().name))
        .borders(Borders::ALL)
        .border_set(symbols::border::ROUNDED)
        .style(Style::default().fg(Color::White));
    let inner = block.inner(area);
    f.render_widget(Clear, area);
    f.render_widget(block, area);

    view.set_last_inner_height(inner.height);

    let mut lines: Vec<Line> = Vec::new();

    // Description
    if let Some(desc) = &view.schema().description {
        for l in desc.lines() {
            lines.push(Line::from(Span::styled(
                l.to_string(),
                Style::default().fg(Color::Gray),
            )));
        }
        lines.push(Line::raw(""));
    }

    // Submission notice
    if let Some(notice) = &view.state().notice {
        let style = match notice.kind {
            NoticeKind::Success => Style::default().fg(Color::Green),
            NoticeKind::Error => Style::default().fg(Color::Red),
        };
        lines.push(Line::from(Span::styled(notice.text.clone(), style)));
        lines.push(Line::raw(""));
    }

    // Ensure focused slot is visible; compute window
    view.ensure_visible(inner.height);
    let (start, end) = view.visible_bounds(inner.height);
    let slots = view.slots();

    for (offset, slot) in slots[start..end].iter().enumerate() {
        let slot = *slot;
        let absolute_idx = start + offset;
        let focused = absolute_idx == view.focused_index();

        match slot {
            Slot::AddRow => {
                let style = if focused {
                    Style::default().fg(Color::Black).bg(Color::White)
                } else {
                    Style::default().fg(Color::Cyan)
                };
                lines.push(Line::from(Span::styled(view.display_value(slot), style)));
                lines.push(Line::raw(""));
            }
            Slot::Header(_) | Slot::Row(..) => {
                let Some((field, row)) = view.field_for(slot) else {
                    continue;
                };
                let indent = if row.is_some() { "  " } else { "" };
                let label = field.label.clone();
                let required = field.required;
                let help = field.help.clone();

                // Row group heading before the first field of each entry
                if let Slot::Row(r, 0) = slot {
                    lines.push(Line::from(Span::styled(
                        format!("Entry {}", r + 1),
                        Style::default().fg(Color::DarkGray),
                    )));
                }

                let mut spans = vec![Span::styled(
                    format!("{indent}{label}{}:", if required { " *" } else { "" }),
                    Style::default().fg(Color::White).add_modifier(if focused {
                        Modifier::BOLD
                    } else {
                        Modifier::empty()
                    }),
                )];

                let value = if focused && view.is_editing() {
                    view.input_value().to_string()
                } else {
                    view.display_value(slot)
                };
                let value_style = if focused {
                    Style::default().fg(Color::Black).bg(Color::White)
                } else {
                    Style::default().fg(Color::Cyan)
                };
                spans.push(Span::raw(" "));
                spans.push(Span::styled(value, value_style));
                lines.push(Line::from(spans));

                if let Some(h) = help {
                    lines.push(Line::from(Span::styled(
                        format!("{indent}{h}"),
                        Style::default().fg(Color::DarkGray),
                    )));
                }

                // Inline failure directly beneath the offending control
                if let Some(failure) = view.failure_for(slot) {
                    lines.push(Line::from(Span::styled(
                        format!("{indent}{}", failure.message),
                        Style::default().fg(Color::Red),
                    )));
                }

                lines.push(Line::raw(""));
            }
        }
    }

    // Footer hints
    lines.push(Line::raw(""));
    let footer = Line::from(vec![
        Span::styled("Up/Down", Style::default().fg(Color::White)),
        Span::raw(": navigate   "),
        Span::styled("Enter", Style::default().fg(Color::White)),
        if view.is_editing() {
            Span::raw(": confirm edit   ")
        } else {
            Span::raw(": edit/submit   ")
        },
        Span::styled("Space", Style::default().fg(Color::White)),
        Span::raw(": toggle   "),
        Span::styled("F2", Style::default().fg(Color::White)),
        Span::raw(": records   "),
        if view.is_submitting() {
            Span::styled("submitting…", Style::default().fg(Color::Yellow))
        } else {
            Span::raw("")
        },
    ])
    .fg(Color::DarkGray);
    lines.push(footer);

    let para = Paragraph::new(Text::from(lines)).wrap(Wrap { trim: true });
    f.render_widget(para, inner);

    // Scrollbar-like indicator on the right edge
    let total = slots.len();
    let reserve = if inner.height > 8 { 4 } else { 2 };
    let visible = inner.height.saturating_sub(reserve).max(3) as usize;

    let thumb_y = if total > visible && inner.width >= 1 {
        let track_rect = Rect {
            x: inner.x + inner.width.saturating_sub(1),
            y: inner.y,
            width: 1,
            height: inner.height,
        };
        let thumb = compute_scrollbar_thumb(total, visible, view.scroll(), track_rect.height);
        if let Some(thumb) = thumb {
            let mut track_lines: Vec<Line> = Vec::new();
            for i in 0..track_rect.height {
                if i as usize == thumb {
                    track_lines.push(Line::from(Span::styled(
                        "█",
                        Style::default().fg(Color::Gray),
                    )));
                } else {
                    track_lines.push(Line::from(Span::styled(
                        "│",
                        Style::default().fg(Color::DarkGray),
                    )));
                }
            }
            let track_para = Paragraph::new(Text::from(track_lines)).wrap(Wrap { trim: false });
            f.render_widget(track_para, track_rect);
        }
        thumb
    } else {
        None
    };

    Ok(FormRenderMetrics {
        total_slots: total,
        visible_start: start,
        visible_end: end,
        focused_index: view.focused_index(),
        scroll: view.scroll(),
        thumb_y,
    })
}
