//! Card grid widget.

use cardgrid_protocol::deck::Deck;
use cardgrid_protocol::{Card, CardId};
use ratatui::{buffer::Buffer, layout::Rect};

use super::card::{CardHighlight, render_card};
use crate::layout::{GridLayout, to_cells};

/// Everything needed to draw the grid for one frame.
#[derive(Debug, Clone, Copy)]
pub struct GridView<'a> {
    /// Display content.
    pub deck: &'a Deck,
    /// Cards in display order.
    pub cards: &'a [Card],
    /// Pixel rectangles for `cards`.
    pub layout: &'a GridLayout,
    /// The focused card.
    pub focused: Option<&'a CardId>,
    /// The card being dragged.
    pub dragging: Option<&'a CardId>,
    /// The current drop target.
    pub drop_target: Option<&'a CardId>,
    /// Rows scrolled off the top.
    pub scroll: u16,
}

impl GridView<'_> {
    fn highlight(&self, id: &CardId) -> CardHighlight {
        if self.dragging == Some(id) {
            CardHighlight::Dragging
        } else if self.drop_target == Some(id) {
            CardHighlight::DropTarget
        } else if self.focused == Some(id) {
            CardHighlight::Focused
        } else {
            CardHighlight::None
        }
    }
}

/// Renders every visible card of the grid into `area`.
///
/// Cards that start above the scrolled area or below it are skipped, so a
/// card straddling the top edge is hidden. Cards overflowing the bottom or
/// right edge are clipped.
pub fn render_grid(view: &GridView<'_>, area: Rect, buf: &mut Buffer) {
    for card in view.cards {
        let Some(rect) = view.layout.rect_of(&card.id) else {
            continue;
        };
        let Some(cells) = to_cells(rect, area, view.scroll) else {
            continue;
        };
        render_card(
            card,
            view.deck.content(card.id.as_str()),
            view.highlight(&card.id),
            cells,
            buf,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::buffer_to_string;
    use cardgrid_protocol::deck::{SiteMode, sample_deck};

    #[test]
    fn renders_visible_cards_in_layout_positions() {
        let deck = sample_deck(SiteMode::Institutional);
        let cards = deck.cards.clone();
        let layout = GridLayout::compute(&cards, 2, 640.0, 16.0);
        let area = Rect::new(0, 0, 80, 12);
        let mut buf = Buffer::empty(area);

        let view = GridView {
            deck: &deck,
            cards: &cards,
            layout: &layout,
            focused: Some(&cards[0].id),
            dragging: None,
            drop_target: None,
            scroll: 0,
        };
        render_grid(&view, area, &mut buf);

        let text = buffer_to_string(&buf);
        assert!(text.contains(deck.title(&cards[0].id)));
        assert!(text.contains(deck.title(&cards[1].id)));
        // The third card sits on the second row, below this area
        assert!(!text.contains(deck.title(&cards[2].id)));
    }

    #[test]
    fn scrolling_reveals_later_rows() {
        let deck = sample_deck(SiteMode::Creator);
        let cards = deck.cards.clone();
        let layout = GridLayout::compute(&cards, 2, 640.0, 16.0);
        let area = Rect::new(0, 0, 80, 12);
        let mut buf = Buffer::empty(area);

        let view = GridView {
            deck: &deck,
            cards: &cards,
            layout: &layout,
            focused: None,
            dragging: None,
            drop_target: None,
            scroll: 11,
        };
        render_grid(&view, area, &mut buf);

        let text = buffer_to_string(&buf);
        assert!(text.contains(deck.title(&cards[2].id)));
        assert!(!text.contains(deck.title(&cards[0].id)));
    }

    #[test]
    fn card_straddling_the_top_edge_is_hidden() {
        let deck = sample_deck(SiteMode::Creator);
        let cards = deck.cards.clone();
        let layout = GridLayout::compute(&cards, 2, 640.0, 16.0);
        let area = Rect::new(0, 0, 80, 12);
        let mut buf = Buffer::empty(area);

        let view = GridView {
            deck: &deck,
            cards: &cards,
            layout: &layout,
            focused: None,
            dragging: None,
            drop_target: None,
            scroll: 3,
        };
        render_grid(&view, area, &mut buf);

        let text = buffer_to_string(&buf);
        assert!(!text.contains(deck.title(&cards[0].id)));
        assert!(!text.contains(deck.title(&cards[1].id)));
    }

    #[test]
    fn highlight_prefers_drag_over_focus() {
        let deck = sample_deck(SiteMode::Institutional);
        let a = CardId::from("a");
        let b = CardId::from("b");
        let layout = GridLayout::default();
        let view = GridView {
            deck: &deck,
            cards: &[],
            layout: &layout,
            focused: Some(&a),
            dragging: Some(&a),
            drop_target: Some(&b),
            scroll: 0,
        };
        assert_eq!(view.highlight(&a), CardHighlight::Dragging);
        assert_eq!(view.highlight(&b), CardHighlight::DropTarget);
        assert_eq!(view.highlight(&CardId::from("c")), CardHighlight::None);
    }
}
