use chrono::Utc;
use ratatui::prelude::*;
use ratatui::widgets::{Gauge, Paragraph};

use taskdeck_core::{ProgressSnapshot, builtin_badges};

use crate::app::App;
use crate::theme::Theme;

/// Progress side panel: completion gauge, counters, badges, unlock history.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let block = Theme::block().title(" Progress ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let snapshot = ProgressSnapshot::compute(app.board.tasks(), Utc::now());

    let [gauge_area, stats_area, badge_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(4),
        Constraint::Fill(1),
    ])
    .areas(inner);

    let gauge = Gauge::default()
        .ratio(f64::from(snapshot.completion_rate) / 100.0)
        .label(format!("{}%", snapshot.completion_rate))
        .gauge_style(Style::new().fg(Theme::ACCENT_GREEN).bg(Theme::TEXT_HINT));
    frame.render_widget(gauge, gauge_area);

    let value_style = Style::new().fg(Theme::TEXT_PRIMARY);
    let label_style = Style::new().fg(Theme::TEXT_SECONDARY);
    let stats = vec![
        Line::from(vec![
            Span::styled(format!("{:>3} ", snapshot.completed), value_style),
            Span::styled(format!("of {} completed", snapshot.total), label_style),
        ]),
        Line::from(vec![
            Span::styled(format!("{:>3} ", snapshot.completed_today), value_style),
            Span::styled("completed today", label_style),
        ]),
        Line::from(vec![
            Span::styled(format!("{:>3} ", snapshot.completed_this_week), value_style),
            Span::styled("completed this week", label_style),
        ]),
        Line::raw(""),
    ];
    frame.render_widget(Paragraph::new(stats), stats_area);

    let mut lines = vec![Line::from(Span::styled(
        "Badges",
        Style::new().fg(Theme::TEXT_PRIMARY).bold(),
    ))];
    for badge in builtin_badges(&snapshot) {
        let (marker, style) = if badge.unlocked {
            ("*", Style::new().fg(Theme::BADGE_UNLOCKED))
        } else {
            ("·", Style::new().fg(Theme::BADGE_LOCKED))
        };
        lines.push(Line::from(vec![
            Span::styled(format!(" {marker} "), style),
            Span::styled(badge.title.clone(), style),
        ]));
        lines.push(Line::from(Span::styled(
            format!("   {}", badge.description),
            Style::new().fg(Theme::TEXT_MUTED),
        )));
    }

    if !app.achievements.is_empty() {
        lines.push(Line::raw(""));
        lines.push(Line::from(Span::styled(
            "Unlocked",
            Style::new().fg(Theme::TEXT_PRIMARY).bold(),
        )));
        for achievement in &app.achievements {
            lines.push(Line::from(vec![
                Span::styled(" * ", Style::new().fg(Theme::BADGE_UNLOCKED)),
                Span::styled(
                    achievement.title.clone(),
                    Style::new().fg(Theme::TEXT_SECONDARY),
                ),
                Span::styled(
                    format!("  {}", achievement.date.format("%Y-%m-%d")),
                    Style::new().fg(Theme::TEXT_MUTED),
                ),
            ]));
        }
    }

    frame.render_widget(Paragraph::new(lines), badge_area);
}

#[cfg(test)]
mod tests {
    use super::render;
    use crate::app::App;
    use chrono::Utc;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use ratatui::buffer::Buffer;
    use taskdeck_core::{AppConfig, Priority, Task};

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

    fn task(id: &str, completed: bool) -> Task {
        Task {
            id: id.to_string(),
            title: format!("task {id}"),
            description: String::new(),
            due_date: Utc::now(),
            priority: Priority::Medium,
            completed,
            user_id: "u-1".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn render_progress(app: &App) -> String {
        let backend = TestBackend::new(48, 24);
        let mut terminal = Terminal::new(backend).expect("terminal");
        terminal
            .draw(|frame| render(frame, app, frame.area()))
            .expect("draw");
        buffer_to_string(terminal.backend().buffer())
    }

    #[test]
    fn completion_rate_is_shown_as_a_rounded_percentage() {
        let mut app = App::new(AppConfig::default(), None);
        app.board.set_tasks(vec![
            task("t-1", true),
            task("t-2", true),
            task("t-3", true),
            task("t-4", false),
        ]);
        let text = render_progress(&app);
        assert!(text.contains("75%"));
        assert!(text.contains("3 of 4 completed"));
    }

    #[test]
    fn empty_board_reads_zero_percent() {
        let app = App::new(AppConfig::default(), None);
        let text = render_progress(&app);
        assert!(text.contains("0%"));
        assert!(text.contains("0 of 0 completed"));
    }

    #[test]
    fn badges_are_listed_with_their_requirements() {
        let app = App::new(AppConfig::default(), None);
        let text = render_progress(&app);
        assert!(text.contains("Early Bird"));
        assert!(text.contains("Productivity Master"));
    }
}
