//! Import prompt state.
//!
//! A single-line text field where the user types the path of a layout file.

use std::path::PathBuf;

/// The path being typed into the import prompt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportPrompt {
    value: String,
    cursor: usize,
}

impl ImportPrompt {
    /// Creates an empty prompt.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the text typed so far.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Returns the cursor position, in bytes.
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Inserts a character at the cursor position.
    pub fn insert_char(&mut self, ch: char) {
        self.value.insert(self.cursor, ch);
        self.cursor += ch.len_utf8();
    }

    /// Deletes the character before the cursor.
    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let prev_boundary = self.value[..self.cursor]
            .char_indices()
            .last()
            .map_or(0, |(i, _)| i);
        self.value.remove(prev_boundary);
        self.cursor = prev_boundary;
    }

    /// Returns the entered path, or `None` if only whitespace was typed.
    ///
    /// # Examples
    ///
    /// ```
    /// use cardgrid_tui::import_prompt::ImportPrompt;
    ///
    /// let mut prompt = ImportPrompt::new();
    /// assert!(prompt.path().is_none());
    ///
    /// for ch in " layout.json ".chars() {
    ///     prompt.insert_char(ch);
    /// }
    /// assert_eq!(prompt.path().unwrap().to_str(), Some("layout.json"));
    /// ```
    #[must_use]
    pub fn path(&self) -> Option<PathBuf> {
        let trimmed = self.value.trim();
        (!trimmed.is_empty()).then(|| PathBuf::from(trimmed))
    }
}
