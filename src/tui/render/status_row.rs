use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::{App, ConfirmAction, Mode, PromptKind};

use super::{display_width, truncate_to_width};

const NAVIGATE_HINT: &str = "spc done  A-F pri  n new  e edit  d/t/r date  h hide  c copy  a archive  q quit";

/// Render the status row (bottom of screen)
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;

    let (mut spans, hint) = match &app.mode {
        Mode::Navigate => match &app.status {
            Some(message) => {
                let color = if message.is_error {
                    app.theme.red
                } else {
                    app.theme.green
                };
                (
                    vec![Span::styled(
                        format!(" {}", message.text),
                        Style::default().fg(color).bg(bg),
                    )],
                    "",
                )
            }
            None => (Vec::new(), NAVIGATE_HINT),
        },
        Mode::Prompt(prompt) => (
            vec![
                Span::styled(
                    format!(" {}: {}", prompt.kind.label(), prompt.input),
                    Style::default().fg(app.theme.text_bright).bg(bg),
                ),
                Span::styled("\u{258C}", Style::default().fg(app.theme.highlight).bg(bg)), // ▌ cursor
            ],
            prompt_hint(prompt.kind),
        ),
        Mode::Confirm(action) => (
            vec![Span::styled(
                format!(" {}", confirm_question(app, *action)),
                Style::default().fg(app.theme.yellow).bg(bg),
            )],
            "y yes  n no",
        ),
    };

    let content_width: usize = spans.iter().map(|s| display_width(&s.content)).sum();
    let hint_width = display_width(hint);
    if !hint.is_empty() && content_width + hint_width < width {
        let padding = width - content_width - hint_width;
        spans.push(Span::styled(" ".repeat(padding), Style::default().bg(bg)));
        spans.push(Span::styled(hint, Style::default().fg(app.theme.dim).bg(bg)));
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}

fn prompt_hint(kind: PromptKind) -> &'static str {
    match kind {
        PromptKind::New | PromptKind::Edit => "Enter save  Esc cancel",
        PromptKind::Due | PromptKind::Threshold => "YYYY-MM-DD or +3d/2w/1m/1y, empty clears",
        PromptKind::Recurrence => "3d/2w/1m/1y, empty clears",
    }
}

fn confirm_question(app: &App, action: ConfirmAction) -> String {
    let quoted = |id| {
        app.collection
            .get(id)
            .map(|r| format!("\"{}\"", truncate_to_width(&r.text, 40)))
            .unwrap_or_else(|| "record".to_string())
    };
    match action {
        ConfirmAction::Delete(id) => format!("delete {}?", quoted(id)),
        ConfirmAction::Hide(id) => format!("hide {}?", quoted(id)),
        ConfirmAction::Archive => {
            let count = app.collection.iter().filter(|r| r.is_completed()).count();
            format!(
                "archive {} completed record{} to {}?",
                count,
                if count == 1 { "" } else { "s" },
                app.store
                    .done_path()
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default()
            )
        }
    }
}
