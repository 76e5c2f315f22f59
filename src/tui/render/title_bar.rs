use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::App;

use super::display_width;

/// Top line: app name, file name, open and done counts
pub fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;

    let file_name = app
        .store
        .path()
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let done = app.collection.iter().filter(|r| r.is_completed()).count();
    let open = app.collection.len() - done;

    let mut spans = vec![
        Span::styled(
            " tally ",
            Style::default()
                .fg(app.theme.highlight)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(file_name, Style::default().fg(app.theme.text).bg(bg)),
    ];

    let counts = format!("{} open  {} done ", open, done);
    let content_width: usize = spans.iter().map(|s| display_width(&s.content)).sum();
    let counts_width = display_width(&counts);
    if content_width + counts_width < width {
        let padding = width - content_width - counts_width;
        spans.push(Span::styled(" ".repeat(padding), Style::default().bg(bg)));
        spans.push(Span::styled(counts, Style::default().fg(app.theme.dim).bg(bg)));
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}
