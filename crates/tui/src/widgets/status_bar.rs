//! Status bar widget.
//!
//! One line at the bottom of the screen: layout facts on the left, the latest
//! toast (or a help cue) on the right.

use cardgrid_protocol::NotificationAction;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::state::Toast;

/// What the status bar reports.
#[derive(Debug, Clone, Copy)]
pub struct StatusInfo<'a> {
    /// Columns in effect.
    pub columns: u32,
    /// Whether automatic collapsing is on.
    pub auto_collapse: bool,
    /// Whether a collapse just ran.
    pub collapsing: bool,
    /// Whether an autosave is pending.
    pub saving: bool,
    /// Whether a card is being dragged.
    pub dragging: bool,
    /// The toast to show, if any.
    pub toast: Option<&'a Toast>,
}

/// Builds the left-hand facts.
fn facts_line(info: &StatusInfo<'_>) -> Line<'static> {
    let dim = Style::default().fg(Color::DarkGray);
    let mut spans = vec![
        Span::styled(format!(" {} cols", info.columns), dim),
        Span::styled(" │ ", dim),
        if info.auto_collapse {
            Span::styled("auto-collapse on", Style::default().fg(Color::Green))
        } else {
            Span::styled("auto-collapse off", dim)
        },
    ];
    if info.collapsing {
        spans.push(Span::styled(" │ ", dim));
        spans.push(Span::styled(
            "collapsing",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::ITALIC),
        ));
    }
    if info.dragging {
        spans.push(Span::styled(" │ ", dim));
        spans.push(Span::styled("dragging", Style::default().fg(Color::Yellow)));
    }
    if info.saving {
        spans.push(Span::styled(" │ ", dim));
        spans.push(Span::styled("saving…", dim));
    }
    Line::from(spans)
}

/// Builds the right-hand message.
fn message_line(info: &StatusInfo<'_>) -> Line<'static> {
    match info.toast {
        Some(toast) => {
            let mut spans = vec![Span::styled(
                toast.notification.message.clone(),
                Style::default().fg(Color::White),
            )];
            if toast.notification.action == Some(NotificationAction::UndoCollapse) {
                spans.push(Span::styled(" (u to undo)", Style::default().fg(Color::Cyan)));
            }
            spans.push(Span::raw(" "));
            Line::from(spans)
        }
        None => Line::from(vec![
            Span::styled("Press ", Style::default().fg(Color::DarkGray)),
            Span::styled("?", Style::default().fg(Color::Yellow)),
            Span::styled(" for help ", Style::default().fg(Color::DarkGray)),
        ]),
    }
}

/// Renders the status bar.
pub fn render_status_bar(info: &StatusInfo<'_>, area: Rect, buf: &mut Buffer) {
    let message = message_line(info);
    let message_width = u16::try_from(message.width()).unwrap_or(u16::MAX);
    let [left, right] =
        Layout::horizontal([Constraint::Min(0), Constraint::Length(message_width)]).areas(area);

    Paragraph::new(facts_line(info)).render(left, buf);
    Paragraph::new(message)
        .alignment(Alignment::Right)
        .render(right, buf);
}
