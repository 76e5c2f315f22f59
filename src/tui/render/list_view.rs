use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::model::{DATE_FORMAT, Record};
use crate::tui::app::App;
use crate::view::{NO_CONTEXT_LABEL, Row};

use super::{display_width, truncate_to_width};

/// Render the visible slice of rows: group headings and records
pub fn render_list_view(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;

    if app.view.rows().is_empty() {
        let message = if app.collection.is_empty() {
            " No records. Press n to add one."
        } else {
            " Nothing to show: every record is hidden or waiting for its threshold date."
        };
        let line = Line::from(Span::styled(
            truncate_to_width(message, width),
            Style::default().fg(app.theme.dim).bg(bg),
        ));
        frame.render_widget(Paragraph::new(line).style(Style::default().bg(bg)), area);
        return;
    }

    let selected = app.view.selected();
    let index_width = digit_count(app.collection.len());
    let lines: Vec<Line> = app
        .view
        .visible_rows()
        .map(|(index, row)| match row {
            Row::Group { label, count } => group_line(app, label, *count, width),
            Row::Record(id) => match (app.collection.get(*id), app.collection.position(*id)) {
                (Some(record), Some(position)) => record_line(
                    app,
                    record,
                    position,
                    index_width,
                    index == selected,
                    width,
                ),
                _ => Line::default(),
            },
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).style(Style::default().bg(bg)), area);
}

fn group_line(app: &App, label: &str, count: usize, width: usize) -> Line<'static> {
    let name = if label == NO_CONTEXT_LABEL {
        label.to_string()
    } else {
        format!("@{}", label)
    };
    let style = Style::default()
        .fg(app.theme.cyan)
        .bg(app.theme.background)
        .add_modifier(Modifier::BOLD);
    let count_style = Style::default().fg(app.theme.dim).bg(app.theme.background);

    let heading = truncate_to_width(&format!(" {}", name), width);
    let rest = width.saturating_sub(display_width(&heading));
    Line::from(vec![
        Span::styled(heading, style),
        Span::styled(truncate_to_width(&format!(" ({})", count), rest), count_style),
    ])
}

/// Decimal digits needed to print `n`
fn digit_count(n: usize) -> usize {
    n.checked_ilog10().map_or(1, |d| d as usize + 1)
}

/// One record row. The number column is the record's index in the file, the
/// same number the CLI takes as a reference, right-aligned to `index_width`.
fn record_line(
    app: &App,
    record: &Record,
    position: usize,
    index_width: usize,
    selected: bool,
    width: usize,
) -> Line<'static> {
    let theme = &app.theme;
    let bg = if selected {
        theme.selection_bg
    } else {
        theme.background
    };
    let base = Style::default().bg(bg);

    let text_style = if record.is_completed() {
        base.fg(theme.dim).add_modifier(Modifier::CROSSED_OUT)
    } else if record.is_overdue(app.today) {
        base.fg(theme.red)
    } else if selected {
        base.fg(theme.text_bright)
    } else {
        base.fg(theme.text)
    };

    let marker = if selected { "\u{258C} " } else { "  " };
    let mut parts: Vec<(String, Style)> = vec![
        (marker.to_string(), base.fg(theme.highlight)),
        (format!("{:>index_width$} ", position), base.fg(theme.dim)),
    ];
    if record.is_completed() {
        parts.push(("x ".to_string(), base.fg(theme.green)));
    }
    if let Some(priority) = record.priority {
        parts.push((
            format!("({}) ", priority),
            base.fg(theme.priority_color(priority))
                .add_modifier(Modifier::BOLD),
        ));
    }
    if app.show_creation_date
        && let Some(created) = record.creation_date
    {
        parts.push((format!("{} ", created.format(DATE_FORMAT)), base.fg(theme.dim)));
    }
    if let Some(completed) = record.completion_date() {
        parts.push((format!("{} ", completed.format(DATE_FORMAT)), base.fg(theme.dim)));
    }
    parts.push((record.editable_text(), text_style));

    // Fit to width, then pad so the selection background spans the row
    let mut spans = Vec::with_capacity(parts.len() + 1);
    let mut used = 0;
    for (text, style) in parts {
        let room = width.saturating_sub(used);
        if room == 0 {
            break;
        }
        let text = truncate_to_width(&text, room);
        used += display_width(&text);
        spans.push(Span::styled(text, style));
    }
    if used < width {
        spans.push(Span::styled(" ".repeat(width - used), base));
    }
    Line::from(spans)
}
