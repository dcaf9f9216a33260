//! Help overlay widget.
//!
//! Lists every keybinding, grouped by what it acts on. Opened with `?`.

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Widget},
};

/// The width of the help overlay panel.
const HELP_WIDTH: u16 = 40;

/// Renders a centered help overlay displaying all keybindings.
///
/// # Examples
///
/// ```
/// use ratatui::buffer::Buffer;
/// use ratatui::layout::Rect;
/// use cardgrid_tui::widgets::render_help_overlay;
///
/// let area = Rect::new(0, 0, 80, 30);
/// let mut buf = Buffer::empty(area);
///
/// render_help_overlay(area, &mut buf);
/// ```
pub fn render_help_overlay(area: Rect, buf: &mut Buffer) {
    let lines = build_help_lines();
    let height = u16::try_from(lines.len()).unwrap_or(u16::MAX).saturating_add(2);
    let popup_area = centered_rect(HELP_WIDTH, height, area);

    Clear.render(popup_area, buf);

    let help_block = Block::default()
        .title(Span::styled(
            " Help ",
            Style::default()
                .fg(Color::LightYellow)
                .add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::LightYellow));

    Paragraph::new(lines)
        .block(help_block)
        .alignment(Alignment::Left)
        .render(popup_area, buf);
}

fn build_help_lines() -> Vec<Line<'static>> {
    let header_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);
    let key_style = Style::default().fg(Color::Green);
    let text_style = Style::default().fg(Color::White);
    let hint_style = Style::default()
        .fg(Color::DarkGray)
        .add_modifier(Modifier::ITALIC);

    let binding = |key: &'static str, text: &'static str| {
        Line::from(vec![
            Span::styled(format!("  {key:<11}"), key_style),
            Span::styled(text, text_style),
        ])
    };

    vec![
        Line::from(""),
        Line::from(Span::styled("  Arrange", header_style)),
        binding("←↑↓→", "Move focus / drop target"),
        binding("Enter", "Pick up or drop card"),
        binding("Esc", "Cancel drag"),
        binding("Mouse", "Drag a card to move it"),
        Line::from(""),
        Line::from(Span::styled("  Cards", header_style)),
        binding("c", "Toggle compact"),
        binding("p", "Cycle priority"),
        binding("m", "Minimize now"),
        binding("u", "Undo minimize"),
        binding("a", "Auto-collapse on/off"),
        binding("+ / -", "More / fewer columns"),
        Line::from(""),
        Line::from(Span::styled("  Layout", header_style)),
        binding("e", "Export to file"),
        binding("i", "Import from file"),
        binding("Shift+R", "Reset saved layout"),
        binding("Ctrl+C", "Quit"),
        binding("?", "Toggle help"),
        Line::from(""),
        Line::from(Span::styled("  Press any key to close", hint_style)),
    ]
}

/// Centers a `width`×`height` box in `area`, shrinking it to fit.
pub(crate) fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let [band] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    let [popup] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(band);
    popup
}
