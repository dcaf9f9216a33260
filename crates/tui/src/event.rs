//! Event handling and key mappings.
//!
//! This module provides event polling and conversion from terminal events
//! to application messages.

use std::time::Duration;

use cardgrid_protocol::Message;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEventKind};

/// Default poll timeout for events.
///
/// Also the tick period: debounced work runs at least this often.
pub const POLL_TIMEOUT: Duration = Duration::from_millis(50);

/// Polls for a terminal event with the default timeout.
///
/// Returns `Some(Event)` if an event is available within the timeout,
/// or `None` if the timeout expires without an event.
///
/// # Errors
///
/// Returns an error if polling the terminal fails.
pub fn poll_event() -> std::io::Result<Option<Event>> {
    if event::poll(POLL_TIMEOUT)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

/// Converts an event (keyboard, mouse, or resize) to an application message.
///
/// Returns `Some(Message)` if the event maps to an action,
/// or `None` if the event is not handled.
#[must_use]
pub fn event_to_message(event: &Event) -> Option<Message> {
    match event {
        Event::Key(key) => key_to_message(*key),
        Event::Mouse(mouse) => mouse_to_message(mouse),
        Event::Resize(width, height) => Some(Message::Resize {
            width: *width,
            height: *height,
        }),
        _ => None,
    }
}

/// Converts a mouse event to a pointer message.
///
/// Only the left button is tracked: press, drag, and release.
#[must_use]
fn mouse_to_message(mouse: &crossterm::event::MouseEvent) -> Option<Message> {
    let (column, row) = (mouse.column, mouse.row);
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => Some(Message::PointerDown { column, row }),
        MouseEventKind::Drag(MouseButton::Left) => Some(Message::PointerMove { column, row }),
        MouseEventKind::Up(MouseButton::Left) => Some(Message::PointerUp { column, row }),
        _ => None,
    }
}

/// Converts a terminal key event to an application message.
///
/// # Key Bindings
///
/// | Key | Action |
/// |-----|--------|
/// | `Ctrl+C` | Quit |
/// | `Esc` | Cancel drag or close overlay |
/// | Arrows | Move focus, or the drop target while dragging |
/// | `Enter` or `Space` | Pick up / drop the focused card |
/// | `c` | Toggle compact mode |
/// | `p` | Cycle priority |
/// | `m` | Minimize now |
/// | `u` | Undo auto-collapse |
/// | `a` | Toggle auto-collapse |
/// | `+` / `-` | More / fewer columns |
/// | `e` | Export layout |
/// | `i` | Import layout |
/// | `Shift+R` | Reset stored layout |
/// | `?` | Toggle help |
#[must_use]
pub fn key_to_message(key: KeyEvent) -> Option<Message> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Message::Quit);
    }

    match key.code {
        KeyCode::Esc => Some(Message::Escape),

        KeyCode::Left => Some(Message::NavigateLeft),
        KeyCode::Right => Some(Message::NavigateRight),
        KeyCode::Up => Some(Message::NavigateUp),
        KeyCode::Down => Some(Message::NavigateDown),

        KeyCode::Enter | KeyCode::Char(' ') => Some(Message::Select),

        KeyCode::Char('c') => Some(Message::ToggleMode),
        KeyCode::Char('p') => Some(Message::CyclePriority),
        KeyCode::Char('m') => Some(Message::MinimizeNow),
        KeyCode::Char('u') => Some(Message::Undo),
        KeyCode::Char('a') => Some(Message::ToggleAutoCollapse),
        KeyCode::Char('+' | '=') => Some(Message::ColumnsUp),
        KeyCode::Char('-') => Some(Message::ColumnsDown),
        KeyCode::Char('e') => Some(Message::Export),
        KeyCode::Char('i') => Some(Message::OpenImport),
        KeyCode::Char('R') => Some(Message::ResetLayout),
        KeyCode::Char('?') => Some(Message::ToggleHelp),

        _ => None,
    }
}

/// Converts a key event to an import prompt message.
///
/// Used while the import prompt is open: characters go into the path.
#[must_use]
pub fn key_to_import_message(key: KeyEvent) -> Option<Message> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Message::Quit);
    }

    match key.code {
        KeyCode::Enter => Some(Message::ImportConfirm),
        KeyCode::Esc => Some(Message::ImportCancel),
        KeyCode::Backspace => Some(Message::ImportBackspace),
        KeyCode::Char(ch) => Some(Message::ImportInput { ch }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventKind, MouseEvent};

    fn make_key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn make_key_with_modifiers(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: event::KeyEventState::NONE,
        }
    }

    fn make_mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn ctrl_c_quits() {
        assert_eq!(
            key_to_message(make_key_with_modifiers(
                KeyCode::Char('c'),
                KeyModifiers::CONTROL
            )),
            Some(Message::Quit)
        );
        // Plain 'c' toggles the card mode instead
        assert_eq!(
            key_to_message(make_key(KeyCode::Char('c'))),
            Some(Message::ToggleMode)
        );
    }

    #[test]
    fn navigation_keys() {
        assert_eq!(
            key_to_message(make_key(KeyCode::Left)),
            Some(Message::NavigateLeft)
        );
        assert_eq!(
            key_to_message(make_key(KeyCode::Right)),
            Some(Message::NavigateRight)
        );
        assert_eq!(
            key_to_message(make_key(KeyCode::Up)),
            Some(Message::NavigateUp)
        );
        assert_eq!(
            key_to_message(make_key(KeyCode::Down)),
            Some(Message::NavigateDown)
        );
    }

    #[test]
    fn pick_up_keys() {
        assert_eq!(
            key_to_message(make_key(KeyCode::Enter)),
            Some(Message::Select)
        );
        assert_eq!(
            key_to_message(make_key(KeyCode::Char(' '))),
            Some(Message::Select)
        );
        assert_eq!(
            key_to_message(make_key(KeyCode::Esc)),
            Some(Message::Escape)
        );
    }

    #[test]
    fn layout_action_keys() {
        let cases = [
            ('p', Message::CyclePriority),
            ('m', Message::MinimizeNow),
            ('u', Message::Undo),
            ('a', Message::ToggleAutoCollapse),
            ('+', Message::ColumnsUp),
            ('=', Message::ColumnsUp),
            ('-', Message::ColumnsDown),
            ('e', Message::Export),
            ('i', Message::OpenImport),
            ('R', Message::ResetLayout),
            ('?', Message::ToggleHelp),
        ];
        for (ch, expected) in cases {
            assert_eq!(
                key_to_message(make_key(KeyCode::Char(ch))),
                Some(expected),
                "key {ch}"
            );
        }
    }

    #[test]
    fn lowercase_r_does_not_reset() {
        assert_eq!(key_to_message(make_key(KeyCode::Char('r'))), None);
    }

    #[test]
    fn unmapped_keys_return_none() {
        assert_eq!(key_to_message(make_key(KeyCode::Char('x'))), None);
        assert_eq!(key_to_message(make_key(KeyCode::F(1))), None);
    }

    #[test]
    fn mouse_left_button_maps_to_pointer_messages() {
        assert_eq!(
            mouse_to_message(&make_mouse(MouseEventKind::Down(MouseButton::Left), 10, 5)),
            Some(Message::PointerDown { column: 10, row: 5 })
        );
        assert_eq!(
            mouse_to_message(&make_mouse(MouseEventKind::Drag(MouseButton::Left), 12, 5)),
            Some(Message::PointerMove { column: 12, row: 5 })
        );
        assert_eq!(
            mouse_to_message(&make_mouse(MouseEventKind::Up(MouseButton::Left), 12, 6)),
            Some(Message::PointerUp { column: 12, row: 6 })
        );
    }

    #[test]
    fn other_mouse_events_ignored() {
        assert_eq!(
            mouse_to_message(&make_mouse(MouseEventKind::Down(MouseButton::Right), 1, 1)),
            None
        );
        assert_eq!(
            mouse_to_message(&make_mouse(MouseEventKind::Moved, 1, 1)),
            None
        );
    }

    #[test]
    fn resize_events_become_resize_messages() {
        assert_eq!(
            event_to_message(&Event::Resize(120, 40)),
            Some(Message::Resize {
                width: 120,
                height: 40
            })
        );
    }

    #[test]
    fn import_prompt_captures_text() {
        assert_eq!(
            key_to_import_message(make_key(KeyCode::Char('e'))),
            Some(Message::ImportInput { ch: 'e' })
        );
        assert_eq!(
            key_to_import_message(make_key(KeyCode::Backspace)),
            Some(Message::ImportBackspace)
        );
        assert_eq!(
            key_to_import_message(make_key(KeyCode::Enter)),
            Some(Message::ImportConfirm)
        );
        assert_eq!(
            key_to_import_message(make_key(KeyCode::Esc)),
            Some(Message::ImportCancel)
        );
        assert_eq!(
            key_to_import_message(make_key_with_modifiers(
                KeyCode::Char('c'),
                KeyModifiers::CONTROL
            )),
            Some(Message::Quit)
        );
    }
}
