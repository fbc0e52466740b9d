use chrono::Utc;
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::app::App;
use crate::theme::{Theme, priority_color, priority_marker};
use crate::views::progress;

/// Task list plus the progress side panel.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let [list_area, side_area] =
        Layout::horizontal([Constraint::Percentage(62), Constraint::Percentage(38)]).areas(area);

    render_task_list(frame, app, list_area);
    progress::render(frame, app, side_area);
}

fn render_task_list(frame: &mut Frame, app: &App, area: Rect) {
    let title = format!(
        " Tasks · {} · sort: {} ",
        app.filter.label(),
        app.sort.label()
    );
    let block = Theme::block().title(title);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if app.board.loading {
        let p = Paragraph::new(Span::styled(
            " Loading tasks...",
            Style::new().fg(Theme::ACCENT_YELLOW).italic(),
        ));
        frame.render_widget(p, inner);
        return;
    }

    let visible = app.visible_tasks();
    if visible.is_empty() {
        let message = if app.board.is_empty() {
            " No tasks yet. Press n to add one."
        } else {
            " Nothing matches this filter."
        };
        let p = Paragraph::new(Span::styled(message, Style::new().fg(Theme::TEXT_MUTED)));
        frame.render_widget(p, inner);
        return;
    }

    let now = Utc::now();
    let mut lines = Vec::new();
    for (row, &task_index) in visible.iter().enumerate() {
        let Some(task) = app.board.get(task_index) else {
            continue;
        };
        let is_cursor = row == app.selected;
        let pointer = if is_cursor { ">" } else { " " };
        let check = if task.completed { "[x]" } else { "[ ]" };
        let overdue = !task.completed && task.due_date < now;

        let title_style = if task.completed {
            Style::new().fg(Theme::TEXT_MUTED).crossed_out()
        } else if is_cursor {
            Style::new().fg(Theme::TEXT_PRIMARY).bold()
        } else {
            Style::new().fg(Theme::TEXT_PRIMARY)
        };
        let due_style = if overdue {
            Style::new().fg(Theme::OVERDUE)
        } else {
            Style::new().fg(Theme::TEXT_SECONDARY)
        };
        let check_style = if task.completed {
            Style::new().fg(Theme::DONE)
        } else {
            Style::new().fg(Theme::TEXT_SECONDARY)
        };

        lines.push(Line::from(vec![
            Span::styled(format!("{pointer} "), Style::new().fg(Theme::ACCENT_BLUE)),
            Span::styled(format!("{check} "), check_style),
            Span::styled(
                format!("{} ", priority_marker(task.priority)),
                Style::new().fg(priority_color(task.priority)),
            ),
            Span::styled(format!("{:<34} ", truncate(&task.title, 34)), title_style),
            Span::styled(task.due_date.format("%Y-%m-%d").to_string(), due_style),
        ]));
        if is_cursor && !task.description.is_empty() {
            lines.push(Line::from(Span::styled(
                format!("        {}", truncate(&task.description, 56)),
                Style::new().fg(Theme::TEXT_SECONDARY),
            )));
        }
    }

    frame.render_widget(Paragraph::new(lines), inner);
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max.saturating_sub(1)).collect();
        format!("{cut}…")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration as ChronoDuration, Utc};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use ratatui::buffer::Buffer;
    use taskdeck_core::{AppConfig, Priority, Task, TaskFilter};

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

    fn task(id: &str, title: &str, completed: bool) -> Task {
        Task {
            id: id.to_string(),
            title: title.to_string(),
            description: String::new(),
            due_date: Utc::now() + ChronoDuration::days(1),
            priority: Priority::Medium,
            completed,
            user_id: "u-1".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn render_dashboard(app: &App) -> String {
        let backend = TestBackend::new(110, 24);
        let mut terminal = Terminal::new(backend).expect("terminal");
        terminal
            .draw(|frame| render(frame, app, frame.area()))
            .expect("draw");
        buffer_to_string(terminal.backend().buffer())
    }

    #[test]
    fn renders_tasks_with_completion_markers() {
        let mut app = App::new(AppConfig::default(), None);
        app.board
            .set_tasks(vec![task("t-1", "Water the plants", false), task("t-2", "File taxes", true)]);
        let text = render_dashboard(&app);
        assert!(text.contains("Water the plants"));
        assert!(text.contains("File taxes"));
        assert!(text.contains("[ ]"));
        assert!(text.contains("[x]"));
    }

    #[test]
    fn title_names_the_active_filter_and_sort() {
        let mut app = App::new(AppConfig::default(), None);
        app.filter = TaskFilter::Active;
        let text = render_dashboard(&app);
        assert!(text.contains("active"));
        assert!(text.contains("sort: priority"));
    }

    #[test]
    fn empty_board_shows_a_hint() {
        let app = App::new(AppConfig::default(), None);
        let text = render_dashboard(&app);
        assert!(text.contains("No tasks yet"));
    }

    #[test]
    fn filtered_out_tasks_show_the_filter_message() {
        let mut app = App::new(AppConfig::default(), None);
        app.board.set_tasks(vec![task("t-1", "Only active", false)]);
        app.filter = TaskFilter::Completed;
        let text = render_dashboard(&app);
        assert!(text.contains("Nothing matches this filter"));
        assert!(!text.contains("Only active"));
    }
}
