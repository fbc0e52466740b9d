use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::app::Tab;
use crate::theme::Theme;

pub fn render(frame: &mut Frame, active: Tab, dev_panel: bool, area: Rect) {
    let mut tabs = vec![
        (Tab::Tasks, "1:Tasks"),
        (Tab::Assistant, "2:Assistant"),
        (Tab::Settings, "3:Settings"),
    ];
    if dev_panel {
        tabs.push((Tab::Debug, "4:Debug"));
    }

    let mut spans = vec![Span::styled(" ", Style::new())];
    for (tab, label) in &tabs {
        let style = if *tab == active {
            Style::new()
                .fg(Color::Black)
                .bg(Theme::ACCENT_BLUE)
                .bold()
                .add_modifier(Modifier::UNDERLINED)
        } else {
            Style::new().fg(Theme::TAB_INACTIVE)
        };
        spans.push(Span::styled(format!(" {} ", label), style));
        spans.push(Span::styled(" ", Style::new()));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

#[cfg(test)]
mod tests {
    use super::render;
    use crate::app::Tab;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use ratatui::buffer::Buffer;

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

    fn render_tab_text(active: Tab, dev_panel: bool) -> String {
        let backend = TestBackend::new(80, 1);
        let mut terminal = Terminal::new(backend).expect("terminal");
        terminal
            .draw(|frame| render(frame, active, dev_panel, frame.area()))
            .expect("draw");
        buffer_to_string(terminal.backend().buffer())
    }

    #[test]
    fn shows_the_three_main_tabs() {
        let text = render_tab_text(Tab::Tasks, false);
        assert!(text.contains("1:Tasks"));
        assert!(text.contains("2:Assistant"));
        assert!(text.contains("3:Settings"));
        assert!(!text.contains("4:Debug"));
    }

    #[test]
    fn debug_tab_appears_only_with_the_dev_panel() {
        let text = render_tab_text(Tab::Debug, true);
        assert!(text.contains("4:Debug"));
    }
}
