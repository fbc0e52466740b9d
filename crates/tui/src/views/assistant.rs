use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::app::App;
use crate::theme::{Theme, priority_color};

/// Assistant tab: simulated voice capture plus the suggestion list.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let [voice_area, list_area] =
        Layout::vertical([Constraint::Length(4), Constraint::Fill(1)]).areas(area);

    render_voice(frame, app, voice_area);
    render_suggestions(frame, app, list_area);
}

fn render_voice(frame: &mut Frame, app: &App, area: Rect) {
    let block = Theme::block().title(" Voice ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if let Some(started) = app.voice_started {
        // Fake level meter, animated off the listening clock.
        let phase = started.elapsed().as_millis() as usize / 90;
        let bars: String = (0..16).map(|i| ['▁', '▃', '▅', '▇'][(phase + i * 3) % 4]).collect();
        let lines = vec![
            Line::from(vec![
                Span::styled(" Listening ", Style::new().fg(Theme::ACCENT_RED).bold()),
                Span::styled(bars, Style::new().fg(Theme::ACCENT_PURPLE)),
            ]),
            Line::from(Span::styled(
                " The transcript will open a prefilled task.",
                Style::new().fg(Theme::TEXT_MUTED),
            )),
        ];
        frame.render_widget(Paragraph::new(lines), inner);
        return;
    }

    let lines = match app.assistant_heard {
        Some(ref heard) => vec![
            Line::from(vec![
                Span::styled(" Heard: ", Style::new().fg(Theme::TEXT_SECONDARY)),
                Span::styled(heard.clone(), Style::new().fg(Theme::ACCENT_PURPLE)),
            ]),
            Line::from(Span::styled(
                " Review the prefilled task with Esc or save it.",
                Style::new().fg(Theme::TEXT_MUTED),
            )),
        ],
        None => vec![Line::from(vec![
            Span::styled(" v ", Style::new().fg(Theme::TEXT_KEY)),
            Span::styled(
                "capture a voice command (simulated)",
                Style::new().fg(Theme::TEXT_KEY_DESC),
            ),
        ])],
    };
    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_suggestions(frame: &mut Frame, app: &App, area: Rect) {
    let block = Theme::block().title(" Suggestions ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if app.session.identity().is_none() {
        let p = Paragraph::new(Span::styled(
            " Sign in to see suggestions.",
            Style::new().fg(Theme::TEXT_MUTED),
        ));
        frame.render_widget(p, inner);
        return;
    }

    let suggestions = app.suggestions();
    let mut lines = Vec::new();
    for (row, suggestion) in suggestions.iter().enumerate() {
        let is_cursor = row == app.assistant_index;
        let pointer = if is_cursor { ">" } else { " " };
        let title_style = if is_cursor {
            Style::new().fg(Theme::TEXT_PRIMARY).bold()
        } else {
            Style::new().fg(Theme::TEXT_PRIMARY)
        };

        let mut spans = vec![
            Span::styled(format!("{pointer} "), Style::new().fg(Theme::ACCENT_BLUE)),
            Span::styled(
                format!("[{}] ", suggestion.category),
                Style::new().fg(Theme::ACCENT_PURPLE),
            ),
            Span::styled(suggestion.title.clone(), title_style),
            Span::styled(
                format!("  {}", suggestion.priority.as_str()),
                Style::new().fg(priority_color(suggestion.priority)),
            ),
        ];
        if let Some(ref estimate) = suggestion.estimated_time {
            spans.push(Span::styled(
                format!("  ~{estimate}"),
                Style::new().fg(Theme::TEXT_SECONDARY),
            ));
        }
        if let Some(ref due) = suggestion.due_date {
            spans.push(Span::styled(
                format!("  due {due}"),
                Style::new().fg(Theme::TEXT_SECONDARY),
            ));
        }
        lines.push(Line::from(spans));

        if is_cursor && !suggestion.description.is_empty() {
            lines.push(Line::from(Span::styled(
                format!("     {}", suggestion.description),
                Style::new().fg(Theme::TEXT_MUTED),
            )));
        }
    }

    lines.push(Line::raw(""));
    lines.push(Line::from(vec![
        Span::styled(" Enter ", Style::new().fg(Theme::TEXT_KEY)),
        Span::styled(
            "turn the selected suggestion into a task",
            Style::new().fg(Theme::TEXT_KEY_DESC),
        ),
    ]));

    frame.render_widget(Paragraph::new(lines), inner);
}
