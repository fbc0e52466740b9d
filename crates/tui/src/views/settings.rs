use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::app::{App, ProfileField};
use crate::config::{SETTINGS_LAYOUT, SettingItem, nth_selectable_field};
use crate::theme::Theme;

const PROFILE_FIELDS: [(ProfileField, char); 4] = [
    (ProfileField::Name, 'p'),
    (ProfileField::Phone, 'h'),
    (ProfileField::Location, 'l'),
    (ProfileField::Bio, 'b'),
];

/// Settings tab: account section on top, editable config fields below.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let [account_area, fields_area] =
        Layout::vertical([Constraint::Length(9), Constraint::Fill(1)]).areas(area);

    render_account(frame, app, account_area);
    render_fields(frame, app, fields_area);
}

fn render_account(frame: &mut Frame, app: &App, area: Rect) {
    let block = Theme::block().title(" Account ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(identity) = app.session.identity() else {
        let p = Paragraph::new(Span::styled(
            " Not signed in.",
            Style::new().fg(Theme::TEXT_MUTED),
        ));
        frame.render_widget(p, inner);
        return;
    };

    let label_style = Style::new().fg(Theme::TEXT_SECONDARY);
    let mut lines = vec![Line::from(vec![
        Span::styled(format!(" {:<10}", "Email"), label_style),
        Span::styled(identity.email.clone(), Style::new().fg(Theme::TEXT_PRIMARY)),
    ])];

    match app.session.profile() {
        Some(profile) => {
            for (field, _) in PROFILE_FIELDS {
                if app.editing_profile == Some(field) {
                    lines.push(Line::from(vec![
                        Span::styled(format!(" {:<10}", field.label()), label_style),
                        Span::styled(
                            app.edit_buffer.clone(),
                            Style::new().fg(Theme::ACCENT_YELLOW),
                        ),
                        Span::styled("_", Style::new().fg(Theme::ACCENT_YELLOW)),
                    ]));
                } else {
                    let value = field.current(profile);
                    let (value, style) = if value.is_empty() {
                        ("(not set)".to_string(), Style::new().fg(Theme::TEXT_MUTED))
                    } else {
                        (value, Style::new().fg(Theme::TEXT_PRIMARY))
                    };
                    lines.push(Line::from(vec![
                        Span::styled(format!(" {:<10}", field.label()), label_style),
                        Span::styled(value, style),
                    ]));
                }
            }
        }
        None => {
            lines.push(Line::from(Span::styled(
                " Profile loading...",
                Style::new().fg(Theme::TEXT_MUTED),
            )));
        }
    }

    let mut hints = Vec::new();
    for (field, key) in PROFILE_FIELDS {
        hints.push(Span::styled(
            format!(" {key} "),
            Style::new().fg(Theme::TEXT_KEY),
        ));
        hints.push(Span::styled(
            format!("{} ", field.label().to_lowercase()),
            Style::new().fg(Theme::TEXT_KEY_DESC),
        ));
    }
    hints.push(Span::styled(" o ", Style::new().fg(Theme::TEXT_KEY)));
    hints.push(Span::styled(
        "sign out",
        Style::new().fg(Theme::TEXT_KEY_DESC),
    ));
    lines.push(Line::raw(""));
    lines.push(Line::from(hints));

    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_fields(frame: &mut Frame, app: &App, area: Rect) {
    let title = if app.config_dirty {
        " Settings * "
    } else {
        " Settings "
    };
    let block = Theme::block().title(title);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let selected = nth_selectable_field(app.settings_index);
    let mut lines = Vec::new();
    for item in SETTINGS_LAYOUT {
        match item {
            SettingItem::Header(name) => {
                lines.push(Line::from(Span::styled(
                    format!(" {name}"),
                    Style::new().fg(Theme::TAB_DIM).bold(),
                )));
            }
            SettingItem::Field {
                field,
                label,
                description,
            } => {
                let is_selected = selected == Some(*field);
                let is_editing = app.editing == Some(*field);
                let marker = if is_selected { ">" } else { " " };
                let label_style = if is_selected {
                    Style::new().fg(Theme::TEXT_PRIMARY).bold()
                } else {
                    Style::new().fg(Theme::TEXT_SECONDARY)
                };
                let value = if is_editing {
                    format!("{}_", app.edit_buffer)
                } else {
                    field.display_value(&app.config)
                };
                let value_style = if is_editing {
                    Style::new().fg(Theme::ACCENT_YELLOW)
                } else {
                    Style::new().fg(Theme::FIELD_VALUE)
                };
                lines.push(Line::from(vec![
                    Span::styled(format!(" {marker} "), Style::new().fg(Theme::ACCENT_BLUE)),
                    Span::styled(format!("{label:<22}"), label_style),
                    Span::styled(value, value_style),
                ]));
                if is_selected {
                    lines.push(Line::from(Span::styled(
                        format!("     {description}"),
                        Style::new().fg(Theme::TEXT_MUTED),
                    )));
                }
            }
        }
    }

    lines.push(Line::raw(""));
    lines.push(Line::from(vec![
        Span::styled(" Enter ", Style::new().fg(Theme::TEXT_KEY)),
        Span::styled("edit/toggle  ", Style::new().fg(Theme::TEXT_KEY_DESC)),
        Span::styled("s ", Style::new().fg(Theme::TEXT_KEY)),
        Span::styled("save to disk", Style::new().fg(Theme::TEXT_KEY_DESC)),
    ]));

    frame.render_widget(Paragraph::new(lines), inner);
}

#[cfg(test)]
mod tests {
    use super::render;
    use crate::app::App;
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

    fn render_settings(app: &App) -> String {
        let backend = TestBackend::new(90, 24);
        let mut terminal = Terminal::new(backend).expect("terminal");
        terminal
            .draw(|frame| render(frame, app, frame.area()))
            .expect("draw");
        buffer_to_string(terminal.backend().buffer())
    }

    #[test]
    fn shows_section_headers_and_fields() {
        let app = App::new(AppConfig::default(), None);
        let text = render_settings(&app);
        assert!(text.contains("Backend"));
        assert!(text.contains("Routing"));
        assert!(text.contains("Backend URL"));
        assert!(text.contains("Gate Timeout"));
    }

    #[test]
    fn anon_key_is_masked_in_the_list() {
        let mut config = AppConfig::default();
        config.backend.anon_key = "sb-public-anon-key-123456".to_string();
        let app = App::new(config, None);
        let text = render_settings(&app);
        assert!(text.contains("sb-publi..."));
        assert!(!text.contains("sb-public-anon-key-123456"));
    }

    #[test]
    fn unsaved_changes_mark_the_title() {
        let mut app = App::new(AppConfig::default(), None);
        app.config_dirty = true;
        let text = render_settings(&app);
        assert!(text.contains("Settings *"));
    }

    #[test]
    fn signed_out_account_section_says_so() {
        let app = App::new(AppConfig::default(), None);
        let text = render_settings(&app);
        assert!(text.contains("Not signed in"));
    }

    #[test]
    fn profile_fields_render_with_placeholders_for_unset_values() {
        use chrono::Utc;
        use taskdeck_api::Identity;
        use taskdeck_api_client::AuthChange;
        use taskdeck_core::Profile;

        let mut app = App::new(AppConfig::default(), None);
        app.on_auth_change(AuthChange {
            seq: 1,
            identity: Some(Identity {
                id: "u-1".to_string(),
                email: "ana@example.com".to_string(),
            }),
        });
        app.session.apply_profile(
            1,
            Some(Profile {
                id: "u-1".to_string(),
                name: "Ana".to_string(),
                email: "ana@example.com".to_string(),
                avatar: None,
                phone: None,
                location: Some("Lisbon".to_string()),
                bio: None,
                join_date: Utc::now(),
            }),
        );
        let text = render_settings(&app);
        assert!(text.contains("Ana"));
        assert!(text.contains("Lisbon"));
        assert!(text.contains("(not set)"));
    }
}
