use ratatui::prelude::*;
use ratatui::widgets::{Clear, Paragraph};

use crate::app::{TaskForm, TaskFormField};
use crate::theme::{Theme, priority_color};

/// Modal overlay for creating or editing a task. Drawn last so it sits on top
/// of whatever tab is underneath.
pub fn render(frame: &mut Frame, form: &TaskForm, area: Rect) {
    let card_width = 56u16.min(area.width.saturating_sub(4));
    let card_height = 14u16.min(area.height.saturating_sub(2));
    let x = (area.width.saturating_sub(card_width)) / 2;
    let y = (area.height.saturating_sub(card_height)) / 2;
    let card = Rect::new(x, y, card_width, card_height);

    let title = if form.editing_id.is_some() {
        " Edit task "
    } else {
        " New task "
    };
    let block = Theme::block_accent()
        .title(title)
        .padding(Theme::PADDING_CARD);
    let inner = block.inner(card);
    frame.render_widget(Clear, card);
    frame.render_widget(block, card);

    let mut lines = vec![
        text_field("Title", &form.title, form.focus == TaskFormField::Title),
        text_field(
            "Notes",
            &form.description,
            form.focus == TaskFormField::Description,
        ),
        text_field(
            "Due",
            &form.due_date,
            form.focus == TaskFormField::DueDate,
        ),
        priority_field(form),
        Line::raw(""),
    ];

    let submit_label = if form.editing_id.is_some() {
        "[ Save changes ]"
    } else {
        "[ Add task ]"
    };
    let submit_focused = form.focus == TaskFormField::Submit;
    let submit_style = if submit_focused {
        Style::new().fg(Color::Black).bg(Theme::ACCENT_BLUE).bold()
    } else {
        Style::new().fg(Theme::TEXT_SECONDARY)
    };
    lines.push(Line::from(vec![
        Span::styled(
            if submit_focused { "> " } else { "  " },
            Style::new().fg(Theme::ACCENT_BLUE),
        ),
        Span::styled(submit_label, submit_style),
    ]));

    if form.busy {
        lines.push(Line::raw(""));
        lines.push(Line::from(Span::styled(
            "Saving...",
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

    lines.push(Line::raw(""));
    lines.push(Line::from(vec![
        Span::styled("Esc ", Style::new().fg(Theme::TEXT_KEY)),
        Span::styled("cancel  ", Style::new().fg(Theme::TEXT_KEY_DESC)),
        Span::styled("Tab ", Style::new().fg(Theme::TEXT_KEY)),
        Span::styled("next field", Style::new().fg(Theme::TEXT_KEY_DESC)),
    ]));

    frame.render_widget(Paragraph::new(lines), inner);
}

fn text_field<'a>(label: &'a str, value: &'a str, focused: bool) -> Line<'a> {
    let marker = if focused { "> " } else { "  " };
    let label_style = if focused {
        Style::new().fg(Theme::TEXT_PRIMARY).bold()
    } else {
        Style::new().fg(Theme::TEXT_SECONDARY)
    };
    let cursor = if focused { "_" } else { "" };
    Line::from(vec![
        Span::styled(marker, Style::new().fg(Theme::ACCENT_BLUE)),
        Span::styled(format!("{label:<10}"), label_style),
        Span::styled(value, Style::new().fg(Theme::TEXT_PRIMARY)),
        Span::styled(cursor, Style::new().fg(Theme::ACCENT_YELLOW)),
    ])
}

fn priority_field(form: &TaskForm) -> Line<'_> {
    let focused = form.focus == TaskFormField::Priority;
    let marker = if focused { "> " } else { "  " };
    let label_style = if focused {
        Style::new().fg(Theme::TEXT_PRIMARY).bold()
    } else {
        Style::new().fg(Theme::TEXT_SECONDARY)
    };
    let hint = if focused { "  (space to cycle)" } else { "" };
    Line::from(vec![
        Span::styled(marker, Style::new().fg(Theme::ACCENT_BLUE)),
        Span::styled(format!("{:<10}", "Priority"), label_style),
        Span::styled(
            form.priority.as_str(),
            Style::new().fg(priority_color(form.priority)).bold(),
        ),
        Span::styled(hint, Style::new().fg(Theme::TEXT_MUTED)),
    ])
}

#[cfg(test)]
mod tests {
    use super::render;
    use crate::app::TaskForm;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use ratatui::buffer::Buffer;
    use taskdeck_core::Priority;

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

    fn render_form(form: &TaskForm) -> String {
        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).expect("terminal");
        terminal
            .draw(|frame| render(frame, form, frame.area()))
            .expect("draw");
        buffer_to_string(terminal.backend().buffer())
    }

    #[test]
    fn blank_form_offers_the_add_action() {
        let form = TaskForm::blank();
        let text = render_form(&form);
        assert!(text.contains("New task"));
        assert!(text.contains("[ Add task ]"));
        assert!(text.contains("Priority"));
    }

    #[test]
    fn prefilled_form_shows_its_values() {
        let form = TaskForm::prefilled("Complete project proposal", "", Priority::High);
        let text = render_form(&form);
        assert!(text.contains("Complete project proposal"));
        assert!(text.contains("high"));
    }

    #[test]
    fn editing_an_existing_task_changes_the_labels() {
        let mut form = TaskForm::blank();
        form.editing_id = Some("t-1".to_string());
        let text = render_form(&form);
        assert!(text.contains("Edit task"));
        assert!(text.contains("[ Save changes ]"));
    }

    #[test]
    fn errors_are_shown_inline() {
        let mut form = TaskForm::blank();
        form.error = Some("Due date must be YYYY-MM-DD".to_string());
        let text = render_form(&form);
        assert!(text.contains("Due date must be YYYY-MM-DD"));
    }
}
