//! TUI message types for event handling.
//!
//! This module defines the message enum used for communication between
//! the TUI input handler and the application state.

use serde::{Deserialize, Serialize};

/// Messages that represent user actions in the TUI.
///
/// These messages are produced by the input handler and consumed by
/// the application state to update the grid.
///
/// # Examples
///
/// ```
/// use cardgrid_protocol::Message;
///
/// let msg = Message::NavigateRight;
/// assert!(msg.is_navigation());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Message {
    /// Move focus to the previous card.
    NavigateLeft,
    /// Move focus to the next card.
    NavigateRight,
    /// Move focus one grid row up.
    NavigateUp,
    /// Move focus one grid row down.
    NavigateDown,
    /// Pick up or drop the focused card (keyboard reordering).
    Select,
    /// Escape: cancel a drag, close an overlay, or clear focus (contextual).
    Escape,
    /// Quit the application.
    Quit,
    /// Toggle help overlay.
    ToggleHelp,
    /// Toggle the focused card between expanded and compact.
    ToggleMode,
    /// Cycle the focused card's priority.
    CyclePriority,
    /// Run auto-collapse immediately.
    MinimizeNow,
    /// Undo the most recent auto-collapse.
    Undo,
    /// Enable or disable automatic collapsing.
    ToggleAutoCollapse,
    /// Use one more grid column.
    ColumnsUp,
    /// Use one fewer grid column.
    ColumnsDown,
    /// Export the layout to a file.
    Export,
    /// Delete the stored layout.
    ResetLayout,
    /// Terminal resized to the given size in cells.
    Resize {
        /// Width in columns.
        width: u16,
        /// Height in rows.
        height: u16,
    },
    /// Left mouse button pressed at coordinates (column, row).
    PointerDown {
        /// Column (x coordinate).
        column: u16,
        /// Row (y coordinate).
        row: u16,
    },
    /// Mouse dragged to coordinates (column, row).
    PointerMove {
        /// Column (x coordinate).
        column: u16,
        /// Row (y coordinate).
        row: u16,
    },
    /// Left mouse button released at coordinates (column, row).
    PointerUp {
        /// Column (x coordinate).
        column: u16,
        /// Row (y coordinate).
        row: u16,
    },

    // --- Import prompt messages ---
    /// Open the import prompt.
    OpenImport,
    /// Input a character into the import path.
    ImportInput {
        /// The character that was input.
        ch: char,
    },
    /// Delete the last character of the import path.
    ImportBackspace,
    /// Import the entered path.
    ImportConfirm,
    /// Close the import prompt without importing.
    ImportCancel,
}

impl Message {
    /// Returns `true` if this message is a navigation action.
    ///
    /// # Examples
    ///
    /// ```
    /// use cardgrid_protocol::Message;
    ///
    /// assert!(Message::NavigateLeft.is_navigation());
    /// assert!(Message::NavigateUp.is_navigation());
    /// assert!(!Message::Select.is_navigation());
    /// ```
    #[must_use]
    pub fn is_navigation(&self) -> bool {
        matches!(
            self,
            Self::NavigateLeft | Self::NavigateRight | Self::NavigateUp | Self::NavigateDown
        )
    }

    /// Returns `true` if this message should terminate the application.
    ///
    /// # Examples
    ///
    /// ```
    /// use cardgrid_protocol::Message;
    ///
    /// assert!(Message::Quit.is_terminating());
    /// assert!(!Message::Escape.is_terminating());
    /// ```
    #[must_use]
    pub fn is_terminating(&self) -> bool {
        matches!(self, Self::Quit)
    }

    /// Returns `true` if this message is a pointer event.
    #[must_use]
    pub fn is_pointer(&self) -> bool {
        matches!(
            self,
            Self::PointerDown { .. } | Self::PointerMove { .. } | Self::PointerUp { .. }
        )
    }

    /// Returns `true` if this message belongs to the import prompt.
    ///
    /// # Examples
    ///
    /// ```
    /// use cardgrid_protocol::Message;
    ///
    /// assert!(Message::ImportConfirm.is_import());
    /// assert!(!Message::Export.is_import());
    /// ```
    #[must_use]
    pub fn is_import(&self) -> bool {
        matches!(
            self,
            Self::OpenImport
                | Self::ImportInput { .. }
                | Self::ImportBackspace
                | Self::ImportConfirm
                | Self::ImportCancel
        )
    }
}
