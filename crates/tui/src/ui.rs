use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use taskdeck_session::GateDecision;

use crate::app::{App, FlashLevel, Route, Tab};
use crate::theme::Theme;
use crate::views;

/// Top-level draw: route dispatch, then tab chrome, then any modal on top.
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    match app.route {
        Route::Auth { .. } => {
            views::auth::render(frame, app, area);
            return;
        }
        Route::Dashboard => match app.gate.decide(&app.session, "/") {
            GateDecision::Render => render_dashboard_chrome(frame, app, area),
            // A redirect decision flips the route on the next tick; both
            // transient states draw the same placeholder.
            GateDecision::Loading | GateDecision::Redirect { .. } => {
                render_loading(frame, area);
                return;
            }
        },
    }

    if let Some(ref form) = app.task_form {
        views::task_form::render(frame, form, area);
    }
}

fn render_loading(frame: &mut Frame, area: Rect) {
    let y = area.height / 2;
    let line = Line::from(Span::styled(
        "Resolving session...",
        Style::new().fg(Theme::ACCENT_YELLOW).italic(),
    ))
    .centered();
    frame.render_widget(Paragraph::new(line), Rect::new(0, y, area.width, 1));
}

fn render_dashboard_chrome(frame: &mut Frame, app: &App, area: Rect) {
    let [tab_area, header_area, body_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .areas(area);

    views::tab_bar::render(frame, app.tab, app.config.dev_panel, tab_area);
    render_header(frame, app, header_area);

    match app.tab {
        Tab::Tasks => views::dashboard::render(frame, app, body_area),
        Tab::Assistant => views::assistant::render(frame, app, body_area),
        Tab::Settings => views::settings::render(frame, app, body_area),
        Tab::Debug => views::debug::render(frame, app, body_area),
    }

    render_footer(frame, app, footer_area);
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![Span::styled(
        " taskdeck ",
        Style::new().fg(Theme::ACCENT_BLUE).bold(),
    )];
    if let Some(identity) = app.session.identity() {
        let who = app
            .session
            .profile()
            .map(|p| p.name.clone())
            .unwrap_or_else(|| identity.email.clone());
        spans.push(Span::styled(
            format!(" {who} "),
            Style::new().fg(Theme::TEXT_SECONDARY),
        ));
        let total = app.board.tasks().len();
        let open = app.board.tasks().iter().filter(|t| !t.completed).count();
        spans.push(Span::styled(
            format!(" {open} open / {total} tasks"),
            Style::new().fg(Theme::TEXT_MUTED),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    // A pending delete confirmation takes over the whole footer.
    if app.confirm_delete.is_some() {
        let line = Line::from(vec![
            Span::styled(
                " Delete this task? ",
                Style::new().fg(Theme::ACCENT_RED).bold(),
            ),
            Span::styled("y ", Style::new().fg(Theme::TEXT_KEY)),
            Span::styled("confirm  ", Style::new().fg(Theme::TEXT_KEY_DESC)),
            Span::styled("any other key ", Style::new().fg(Theme::TEXT_KEY)),
            Span::styled("cancel", Style::new().fg(Theme::TEXT_KEY_DESC)),
        ]);
        frame.render_widget(Paragraph::new(line), area);
        return;
    }

    let mut spans = Vec::new();
    if let Some((ref msg, level)) = app.flash_message {
        let color = match level {
            FlashLevel::Success => Theme::ACCENT_GREEN,
            FlashLevel::Error => Theme::ACCENT_RED,
            FlashLevel::Info => Theme::ACCENT_BLUE,
        };
        spans.push(Span::styled(
            format!(" {msg}  "),
            Style::new().fg(color).bold(),
        ));
    }

    let hints: &[(&str, &str)] = match app.tab {
        Tab::Tasks => &[
            ("j/k", "move"),
            ("space", "toggle"),
            ("n", "new"),
            ("e", "edit"),
            ("d", "delete"),
            ("f", "filter"),
            ("s", "sort"),
            ("r", "refresh"),
            ("q", "quit"),
        ],
        Tab::Assistant => &[
            ("j/k", "move"),
            ("Enter", "to task"),
            ("v", "voice"),
            ("q", "quit"),
        ],
        Tab::Settings => &[
            ("j/k", "move"),
            ("Enter", "edit"),
            ("s", "save"),
            ("p/h/l/b", "profile"),
            ("o", "sign out"),
            ("q", "quit"),
        ],
        Tab::Debug => &[("q", "quit")],
    };
    for (key, desc) in hints {
        spans.push(Span::styled(
            format!(" {key} "),
            Style::new().fg(Theme::TEXT_KEY),
        ));
        spans.push(Span::styled(
            format!("{desc} "),
            Style::new().fg(Theme::TEXT_KEY_DESC),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

#[cfg(test)]
mod tests {
    use super::render;
    use crate::app::{App, Route, Tab};
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

    fn render_ui(app: &App) -> String {
        let backend = TestBackend::new(110, 30);
        let mut terminal = Terminal::new(backend).expect("terminal");
        terminal
            .draw(|frame| render(frame, app))
            .expect("draw");
        buffer_to_string(terminal.backend().buffer())
    }

    fn signed_in_app() -> App {
        let mut app = App::new(AppConfig::default(), None);
        app.on_auth_change(AuthChange {
            seq: 1,
            identity: Some(Identity {
                id: "u-1".to_string(),
                email: "u@example.com".to_string(),
            }),
        });
        app.board.set_tasks(Vec::new());
        app
    }

    #[test]
    fn unresolved_session_draws_the_placeholder() {
        let app = App::new(AppConfig::default(), None);
        let text = render_ui(&app);
        assert!(text.contains("Resolving session..."));
    }

    #[test]
    fn auth_route_draws_the_sign_in_card() {
        let mut app = App::new(AppConfig::default(), None);
        app.route = Route::Auth {
            return_to: "/".to_string(),
        };
        let text = render_ui(&app);
        assert!(text.contains("sign in"));
        assert!(text.contains("Password"));
    }

    #[test]
    fn authenticated_dashboard_draws_tabs_and_footer() {
        let app = signed_in_app();
        let text = render_ui(&app);
        assert!(text.contains("1:Tasks"));
        assert!(text.contains("u@example.com"));
        assert!(text.contains("toggle"));
    }

    #[test]
    fn delete_confirmation_takes_over_the_footer() {
        let mut app = signed_in_app();
        app.confirm_delete = Some("t-1".to_string());
        let text = render_ui(&app);
        assert!(text.contains("Delete this task?"));
    }

    #[test]
    fn task_form_modal_draws_on_top_of_the_tasks_tab() {
        let mut app = signed_in_app();
        app.tab = Tab::Tasks;
        app.task_form = Some(crate::app::TaskForm::blank());
        let text = render_ui(&app);
        assert!(text.contains("New task"));
    }
}
