use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use taskdeck_session::{GateDecision, SessionState};

use crate::app::App;
use crate::theme::Theme;

/// Developer panel: raw session and gate state plus recent auth activity.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let [state_area, log_area] =
        Layout::vertical([Constraint::Length(9), Constraint::Fill(1)]).areas(area);

    render_state(frame, app, state_area);
    render_log(frame, app, log_area);
}

fn state_name(state: &SessionState) -> &'static str {
    match state {
        SessionState::Uninitialized => "uninitialized",
        SessionState::Initializing => "initializing",
        SessionState::Authenticated { .. } => "authenticated",
        SessionState::Anonymous => "anonymous",
    }
}

fn render_state(frame: &mut Frame, app: &App, area: Rect) {
    let block = Theme::block().title(" Session ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let gate = match app.gate.decide(&app.session, "/") {
        GateDecision::Loading => "loading".to_string(),
        GateDecision::Render => "render".to_string(),
        GateDecision::Redirect { from } => format!("redirect (from {from})"),
    };

    let label = Style::new().fg(Theme::TEXT_SECONDARY);
    let value = Style::new().fg(Theme::TEXT_PRIMARY);
    let lines = vec![
        Line::from(vec![
            Span::styled(" state      ", label),
            Span::styled(state_name(app.session.state()), value),
        ]),
        Line::from(vec![
            Span::styled(" last seq   ", label),
            Span::styled(app.session.last_seq().to_string(), value),
        ]),
        Line::from(vec![
            Span::styled(" identity   ", label),
            Span::styled(
                app.session
                    .identity()
                    .map(|i| format!("{} <{}>", i.id, i.email))
                    .unwrap_or_else(|| "none".to_string()),
                value,
            ),
        ]),
        Line::from(vec![
            Span::styled(" profile    ", label),
            Span::styled(
                app.session
                    .profile()
                    .map(|p| p.name.clone())
                    .unwrap_or_else(|| "none".to_string()),
                value,
            ),
        ]),
        Line::from(vec![
            Span::styled(" gate       ", label),
            Span::styled(gate, value),
        ]),
        Line::from(vec![
            Span::styled(" backend    ", label),
            Span::styled(
                if app.config.backend.url.is_empty() {
                    "(not configured)".to_string()
                } else {
                    app.config.backend.url.clone()
                },
                Style::new().fg(Theme::FIELD_VALUE),
            ),
        ]),
        Line::from(vec![
            Span::styled(" queued ops ", label),
            Span::styled(app.pending_commands.len().to_string(), value),
        ]),
    ];

    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_log(frame: &mut Frame, app: &App, area: Rect) {
    let block = Theme::block_dim().title(" Auth activity ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if app.debug_log.is_empty() {
        let p = Paragraph::new(Span::styled(
            " No auth activity yet.",
            Style::new().fg(Theme::TEXT_MUTED),
        ));
        frame.render_widget(p, inner);
        return;
    }

    // Newest entries at the bottom, clipped to the panel height.
    let visible = inner.height as usize;
    let skip = app.debug_log.len().saturating_sub(visible);
    let lines: Vec<Line> = app
        .debug_log
        .iter()
        .skip(skip)
        .map(|entry| {
            Line::from(Span::styled(
                format!(" {entry}"),
                Style::new().fg(Theme::TEXT_SECONDARY),
            ))
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), inner);
}

#[cfg(test)]
mod tests {
    use super::render;
    use crate::app::App;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use ratatui::buffer::Buffer;
    use taskdeck_api::Identity;
    use taskdeck_api_client::AuthChange;
    use taskdeck_core::AppConfig;

    fn buffer_to_string(buffer: &Buffer) -> String {
        let area = *buffer.area();
        let mut out = String::new();
        for y in area.top()..area.bottom() {
            for x in area.left()..area.right() {
                out.push_str(buffer[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    fn render_debug(app: &App) -> String {
        let backend = TestBackend::new(100, 24);
        let mut terminal = Terminal::new(backend).expect("terminal");
        terminal
            .draw(|frame| render(frame, app, frame.area()))
            .expect("draw");
        buffer_to_string(terminal.backend().buffer())
    }

    #[test]
    fn shows_the_session_state_and_sequence() {
        let app = App::new(AppConfig::default(), None);
        let text = render_debug(&app);
        assert!(text.contains("uninitialized"));
        assert!(text.contains("last seq"));
    }

    #[test]
    fn authenticated_state_shows_the_identity() {
        let mut config = AppConfig::default();
        config.dev_panel = true;
        let mut app = App::new(config, None);
        app.on_auth_change(AuthChange {
            seq: 3,
            identity: Some(Identity {
                id: "u-1".to_string(),
                email: "u@example.com".to_string(),
            }),
        });
        let text = render_debug(&app);
        assert!(text.contains("authenticated"));
        assert!(text.contains("u-1 <u@example.com>"));
        assert!(text.contains("seq=3"));
    }
}
