use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::app::{App, AuthField, AuthMode};
use crate::theme::Theme;

/// Full-screen sign-in / sign-up card.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let card_width = 52u16.min(area.width.saturating_sub(4));
    let card_height = match app.auth_form.mode {
        AuthMode::SignIn => 16u16,
        AuthMode::SignUp => 19u16,
    }
    .min(area.height.saturating_sub(2));
    let x = (area.width.saturating_sub(card_width)) / 2;
    let y = (area.height.saturating_sub(card_height)) / 2;
    let card = Rect::new(x, y, card_width, card_height);

    let title = match app.auth_form.mode {
        AuthMode::SignIn => " taskdeck · sign in ",
        AuthMode::SignUp => " taskdeck · create account ",
    };
    let block = Theme::block_accent()
        .title(title)
        .padding(Theme::PADDING_CARD);
    let inner = block.inner(card);
    frame.render_widget(block, card);

    let form = &app.auth_form;
    let focused = form.focused();
    let mut lines = Vec::new();

    if form.mode == AuthMode::SignUp {
        lines.push(field_line("Name", &form.name, focused == AuthField::Name));
    }
    lines.push(field_line("Email", &form.email, focused == AuthField::Email));
    let masked = "*".repeat(form.password.len());
    lines.push(field_line(
        "Password",
        &masked,
        focused == AuthField::Password,
    ));
    if form.mode == AuthMode::SignUp {
        lines.push(field_line("Phone", &form.phone, focused == AuthField::Phone));
        lines.push(field_line(
            "Location",
            &form.location,
            focused == AuthField::Location,
        ));
        lines.push(field_line("Bio", &form.bio, focused == AuthField::Bio));
    }
    lines.push(Line::raw(""));

    let submit_label = match form.mode {
        AuthMode::SignIn => "[ Sign in ]",
        AuthMode::SignUp => "[ Create account ]",
    };
    lines.push(button_line(submit_label, focused == AuthField::Submit));
    let toggle_label = match form.mode {
        AuthMode::SignIn => "[ Switch to sign up ]",
        AuthMode::SignUp => "[ Switch to sign in ]",
    };
    lines.push(button_line(toggle_label, focused == AuthField::ToggleMode));
    if form.mode == AuthMode::SignIn {
        lines.push(button_line(
            "[ Forgot password ]",
            focused == AuthField::Forgot,
        ));
    }

    if form.busy {
        lines.push(Line::raw(""));
        lines.push(Line::from(Span::styled(
            "Working...",
            Style::new().fg(Theme::ACCENT_YELLOW).italic(),
        )));
    }
    if let Some(ref error) = form.error {
        lines.push(Line::raw(""));
        lines.push(Line::from(Span::styled(
            error.as_str(),
            Style::new().fg(Theme::ACCENT_RED),
        )));
    }
    if let Some(ref info) = form.info {
        lines.push(Line::raw(""));
        lines.push(Line::from(Span::styled(
            info.as_str(),
            Style::new().fg(Theme::ACCENT_GREEN),
        )));
    }

    frame.render_widget(Paragraph::new(lines), inner);

    // Key hints along the bottom of the screen.
    let hints = Line::from(vec![
        Span::styled(" Tab ", Style::new().fg(Theme::TEXT_KEY)),
        Span::styled("next field  ", Style::new().fg(Theme::TEXT_KEY_DESC)),
        Span::styled("Enter ", Style::new().fg(Theme::TEXT_KEY)),
        Span::styled("select", Style::new().fg(Theme::TEXT_KEY_DESC)),
    ]);
    let hint_area = Rect::new(0, area.height.saturating_sub(1), area.width, 1);
    frame.render_widget(Paragraph::new(hints), hint_area);
}

fn field_line<'a>(label: &'a str, value: &'a str, focused: bool) -> Line<'a> {
    let marker = if focused { "> " } else { "  " };
    let label_style = if focused {
        Style::new().fg(Theme::TEXT_PRIMARY).bold()
    } else {
        Style::new().fg(Theme::TEXT_SECONDARY)
    };
    let cursor = if focused { "_" } else { "" };
    Line::from(vec![
        Span::styled(marker, Style::new().fg(Theme::ACCENT_BLUE)),
        Span::styled(format!("{label:<9}"), label_style),
        Span::styled(value, Style::new().fg(Theme::TEXT_PRIMARY)),
        Span::styled(cursor, Style::new().fg(Theme::ACCENT_YELLOW)),
    ])
}

fn button_line(label: &str, focused: bool) -> Line<'_> {
    let marker = if focused { "> " } else { "  " };
    let style = if focused {
        Style::new().fg(Color::Black).bg(Theme::ACCENT_BLUE).bold()
    } else {
        Style::new().fg(Theme::TEXT_SECONDARY)
    };
    Line::from(vec![
        Span::styled(marker, Style::new().fg(Theme::ACCENT_BLUE)),
        Span::styled(label.to_string(), style),
    ])
}

#[cfg(test)]
mod tests {
    use super::render;
    use crate::app::{App, AuthMode, Route};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use ratatui::buffer::Buffer;
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

    fn render_auth(app: &App) -> String {
        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).expect("terminal");
        terminal
            .draw(|frame| render(frame, app, frame.area()))
            .expect("draw");
        buffer_to_string(terminal.backend().buffer())
    }

    fn auth_app() -> App {
        let mut app = App::new(AppConfig::default(), None);
        app.route = Route::Auth {
            return_to: "/".to_string(),
        };
        app
    }

    #[test]
    fn sign_in_mode_shows_credentials_and_actions() {
        let app = auth_app();
        let text = render_auth(&app);
        assert!(text.contains("sign in"));
        assert!(text.contains("Email"));
        assert!(text.contains("Password"));
        assert!(text.contains("[ Forgot password ]"));
        assert!(!text.contains("Name"));
    }

    #[test]
    fn sign_up_mode_adds_the_name_field() {
        let mut app = auth_app();
        app.auth_form.mode = AuthMode::SignUp;
        let text = render_auth(&app);
        assert!(text.contains("create account"));
        assert!(text.contains("Name"));
        assert!(text.contains("Phone"));
        assert!(text.contains("Location"));
        assert!(text.contains("Bio"));
        assert!(!text.contains("[ Forgot password ]"));
    }

    #[test]
    fn password_input_is_masked() {
        let mut app = auth_app();
        app.auth_form.password = "hunter22".to_string();
        let text = render_auth(&app);
        assert!(text.contains("********"));
        assert!(!text.contains("hunter22"));
    }

    #[test]
    fn validation_errors_are_shown_inline() {
        let mut app = auth_app();
        app.auth_form.error = Some("Invalid login credentials".to_string());
        let text = render_auth(&app);
        assert!(text.contains("Invalid login credentials"));
    }
}
