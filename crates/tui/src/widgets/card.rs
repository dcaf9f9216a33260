//! Card widget.
//!
//! Renders one card as a rounded box: title in the top border, priority badge
//! on the right, and the summary inside when expanded.

use cardgrid_protocol::deck::CardContent;
use cardgrid_protocol::{Card, CardMode, Priority};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Widget, Wrap},
};

/// How a card is highlighted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CardHighlight {
    /// Not highlighted.
    #[default]
    None,
    /// Has keyboard focus.
    Focused,
    /// Is being dragged.
    Dragging,
    /// Is the current drop target.
    DropTarget,
}

impl CardHighlight {
    fn border_style(self) -> Style {
        match self {
            Self::None => Style::default().fg(Color::DarkGray),
            Self::Focused => Style::default().fg(Color::Cyan),
            Self::Dragging => Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
            Self::DropTarget => Style::default().fg(Color::Green),
        }
    }

    fn border_type(self) -> BorderType {
        match self {
            Self::None => BorderType::Rounded,
            Self::Focused | Self::DropTarget => BorderType::Thick,
            Self::Dragging => BorderType::Double,
        }
    }
}

/// Returns the badge color for a priority.
#[must_use]
pub fn priority_color(priority: Priority) -> Color {
    match priority {
        Priority::Low => Color::DarkGray,
        Priority::Normal => Color::Gray,
        Priority::High => Color::Yellow,
        Priority::Pinned => Color::Magenta,
    }
}

/// Renders a card into `area`.
///
/// `content` supplies the title and summary; without it the card id is
/// used as the title.
///
/// # Examples
///
/// ```
/// use ratatui::buffer::Buffer;
/// use ratatui::layout::Rect;
/// use cardgrid_protocol::Card;
/// use cardgrid_tui::widgets::{CardHighlight, render_card};
///
/// let area = Rect::new(0, 0, 30, 6);
/// let mut buf = Buffer::empty(area);
/// render_card(&Card::new("faq", 0), None, CardHighlight::Focused, area, &mut buf);
/// ```
pub fn render_card(
    card: &Card,
    content: Option<&CardContent>,
    highlight: CardHighlight,
    area: Rect,
    buf: &mut Buffer,
) {
    if area.width < 4 || area.height < 2 {
        return;
    }
    Clear.render(area, buf);

    let title = content.map_or_else(|| card.id.as_str(), |c| c.title.as_str());
    let badge = Line::from(Span::styled(
        format!(" {} ", card.priority.label()),
        Style::default().fg(priority_color(card.priority)),
    ))
    .right_aligned();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(highlight.border_type())
        .border_style(highlight.border_style())
        .title(Span::styled(
            format!(" {title} "),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ))
        .title(badge);

    let body = match card.mode {
        CardMode::Expanded => {
            let summary = content.map_or("", |c| c.summary.as_str());
            Paragraph::new(summary)
                .style(Style::default().fg(Color::Gray))
                .wrap(Wrap { trim: true })
        }
        CardMode::Compact => Paragraph::new(Span::styled(
            "compact",
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )),
    };

    body.block(block).render(area, buf);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::buffer_to_string;

    fn content() -> CardContent {
        CardContent {
            title: "Pricing".to_string(),
            summary: "Transparent packages".to_string(),
        }
    }

    #[test]
    fn expanded_card_shows_title_badge_and_summary() {
        let card = Card::new("pricing", 0).with_priority(Priority::High);
        let area = Rect::new(0, 0, 32, 5);
        let mut buf = Buffer::empty(area);

        render_card(&card, Some(&content()), CardHighlight::None, area, &mut buf);

        let text = buffer_to_string(&buf);
        assert!(text.contains("Pricing"));
        assert!(text.contains("high"));
        assert!(text.contains("Transparent packages"));
    }

    #[test]
    fn compact_card_hides_summary() {
        let card = Card::new("pricing", 0).with_mode(CardMode::Compact);
        let area = Rect::new(0, 0, 32, 3);
        let mut buf = Buffer::empty(area);

        render_card(&card, Some(&content()), CardHighlight::None, area, &mut buf);

        let text = buffer_to_string(&buf);
        assert!(text.contains("Pricing"));
        assert!(text.contains("compact"));
        assert!(!text.contains("Transparent"));
    }

    #[test]
    fn missing_content_falls_back_to_id() {
        let card = Card::new("mystery", 0);
        let area = Rect::new(0, 0, 24, 4);
        let mut buf = Buffer::empty(area);

        render_card(&card, None, CardHighlight::Focused, area, &mut buf);
        assert!(buffer_to_string(&buf).contains("mystery"));
    }

    #[test]
    fn highlight_changes_border() {
        let card = Card::new("a", 0);
        let area = Rect::new(0, 0, 12, 3);

        let mut plain = Buffer::empty(area);
        render_card(&card, None, CardHighlight::None, area, &mut plain);
        let mut dragging = Buffer::empty(area);
        render_card(&card, None, CardHighlight::Dragging, area, &mut dragging);

        assert_eq!(plain.cell((0, 0)).map(|c| c.symbol()), Some("╭"));
        assert_eq!(dragging.cell((0, 0)).map(|c| c.symbol()), Some("╔"));
    }

    #[test]
    fn tiny_area_is_skipped() {
        let card = Card::new("a", 0);
        let area = Rect::new(0, 0, 3, 1);
        let mut buf = Buffer::empty(area);
        render_card(&card, None, CardHighlight::None, area, &mut buf);
        assert_eq!(buffer_to_string(&buf), "\n");
    }
}
