//! Import prompt overlay.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Widget},
};

use super::help::centered_rect;
use crate::import_prompt::ImportPrompt;

const PROMPT_WIDTH: u16 = 60;
const PROMPT_HEIGHT: u16 = 5;

/// Renders the import prompt centered in `area`.
pub fn render_import_prompt(prompt: &ImportPrompt, area: Rect, buf: &mut Buffer) {
    let popup_area = centered_rect(PROMPT_WIDTH, PROMPT_HEIGHT, area);
    Clear.render(popup_area, buf);

    let block = Block::default()
        .title(Span::styled(
            " Import layout ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Cyan));

    let (before, after) = prompt.value().split_at(prompt.cursor());
    let lines = vec![
        Line::from(vec![
            Span::styled(" Path: ", Style::default().fg(Color::Yellow)),
            Span::raw(before.to_string()),
            Span::styled("▏", Style::default().fg(Color::Cyan)),
            Span::raw(after.to_string()),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            " Enter to import, Esc to cancel",
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )),
    ];

    Paragraph::new(lines).block(block).render(popup_area, buf);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::buffer_to_string;

    #[test]
    fn shows_typed_path_with_cursor() {
        let mut prompt = ImportPrompt::new();
        for ch in "layout.json".chars() {
            prompt.insert_char(ch);
        }
        let area = Rect::new(0, 0, 80, 20);
        let mut buf = Buffer::empty(area);

        render_import_prompt(&prompt, area, &mut buf);

        let text = buffer_to_string(&buf);
        assert!(text.contains("Import layout"));
        assert!(text.contains("Path: layout.json▏"));
        assert!(text.contains("Enter to import"));
    }
}
