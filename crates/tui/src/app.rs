//! Main application struct and run loop.
//!
//! [`App`] wires the layout components to the terminal. [`AppState`] is the
//! host: every component hands its new card collection to it, and the app
//! persists whatever the state ends up holding.
//!
//! # Frame Cycle
//!
//! Each pass of [`App::run`] draws, handles at most one input event, runs a
//! pending import, then calls [`App::tick`]. The tick is where time-driven
//! work happens: cross-window sync (including layouts written by other
//! processes), the auto-collapse debounce, toast
//! expiry, and autosave scheduling.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use cardgrid_config::{Config, SpaceSettings};
use cardgrid_engine::geometry::{Point, closest_center, hit_test};
use cardgrid_engine::reorder::preview_order;
use cardgrid_engine::sensors::{Direction, KeyboardSensor, PointerSensor};
use cardgrid_engine::{
    AutoCollapseEngine, DragReorderController, Haptics, SpaceConfig, SpaceDetector,
};
use cardgrid_protocol::deck::Deck;
use cardgrid_protocol::{AutoCollapseSettings, Card, CardMode, LayoutHost, Message};
use cardgrid_store::{Autosaver, LayoutStore, LayoutSync};
use chrono::Utc;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};
use tracing::{debug, info, warn};

use crate::{
    AppState,
    event::{event_to_message, key_to_import_message, poll_event},
    import_prompt::ImportPrompt,
    layout::{
        CELL_HEIGHT_PX, CELL_WIDTH_PX, GridLayout, HEADER_HEIGHT, MIN_HEIGHT, MIN_WIDTH,
        STATUS_HEIGHT, cell_to_point, viewport_for,
    },
    terminal::{AppTerminal, TerminalBell},
    widgets::{
        GridView, StatusInfo, render_grid, render_help_overlay, render_import_prompt,
        render_status_bar,
    },
};

/// Terminal size assumed until the first resize arrives.
const INITIAL_SIZE: (u16, u16) = (80, 24);

/// How often storage is checked for layouts written by other processes.
const STORAGE_CHECK_INTERVAL: Duration = Duration::from_millis(500);

/// Splits the screen into header (when there is room), grid, and status bar.
fn split_screen(area: Rect) -> (Option<Rect>, Rect, Rect) {
    let show_header = area.height >= MIN_HEIGHT + HEADER_HEIGHT;
    let header_height = if show_header { HEADER_HEIGHT } else { 0 };

    let [header, grid, status] = Layout::vertical([
        Constraint::Length(header_height),
        Constraint::Min(0),
        Constraint::Length(STATUS_HEIGHT),
    ])
    .areas(area);

    (show_header.then_some(header), grid, status)
}

/// Builds the detector configuration from user settings.
fn space_config(space: &SpaceSettings, auto_collapse: &AutoCollapseSettings) -> SpaceConfig {
    SpaceConfig {
        min_card_width: space.min_card_width,
        min_card_height: space.min_card_height,
        gap: space.gap,
        collapse_threshold: auto_collapse.threshold,
        enabled: space.enabled,
    }
}

/// The main application struct.
///
/// Generic over the haptics sink so tests can record the drag feedback that
/// the terminal turns into a bell.
#[derive(Debug)]
pub struct App<H = TerminalBell> {
    state: AppState,
    space: SpaceSettings,
    detector: SpaceDetector,
    collapse: AutoCollapseEngine,
    drag: DragReorderController<H>,
    pointer: PointerSensor,
    store: Arc<LayoutStore>,
    autosaver: Autosaver,
    autosave_enabled: bool,
    sync: Option<LayoutSync>,
    next_storage_check: Instant,
    import: Option<ImportPrompt>,
    pending_import: Option<PathBuf>,
    export_dir: PathBuf,
    /// Settings to return to on reset.
    defaults: AutoCollapseSettings,
    should_quit: bool,
    /// Grid area of the last layout, used for pointer hit-testing.
    grid_area: Rect,
}

impl App<TerminalBell> {
    /// Creates an application that rings the terminal bell on drops.
    ///
    /// A layout found in `store` is restored before the first frame.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    /// use cardgrid_config::Config;
    /// use cardgrid_protocol::deck::{SiteMode, sample_deck};
    /// use cardgrid_store::{LayoutStore, MemoryStorage};
    /// use cardgrid_tui::App;
    ///
    /// let store = Arc::new(LayoutStore::new(Arc::new(MemoryStorage::new())));
    /// let app = App::new(&Config::default(), sample_deck(SiteMode::Creator), store);
    /// assert_eq!(app.state().cards.len(), 8);
    /// ```
    #[must_use]
    pub fn new(config: &Config, deck: Deck, store: Arc<LayoutStore>) -> Self {
        Self::with_haptics(config, deck, store, TerminalBell::default())
    }
}

impl<H: Haptics> App<H> {
    /// Creates an application with a custom haptics sink.
    #[must_use]
    pub fn with_haptics(config: &Config, deck: Deck, store: Arc<LayoutStore>, haptics: H) -> Self {
        let mut state = AppState::new(deck, config.auto_collapse);
        let mut autosaver = Autosaver::new(Arc::clone(&store), config.autosave.debounce());
        let sync = store.subscribe();

        let (width, height) = INITIAL_SIZE;
        let detector = SpaceDetector::new(
            viewport_for(width, height),
            state.cards.len(),
            space_config(&config.space, &state.auto_collapse),
        );
        state.detected_columns = detector.info().grid_columns;

        if let Some(layout) = store.load_layout() {
            info!(cards = layout.cards.len(), "restoring saved layout");
            state.on_layout_restore(layout);
        }
        autosaver.prime(state.snapshot());

        let mut app = Self {
            collapse: AutoCollapseEngine::new(state.auto_collapse),
            state,
            space: config.space,
            detector,
            drag: DragReorderController::with_haptics(haptics),
            pointer: PointerSensor::default(),
            store,
            autosaver,
            autosave_enabled: config.autosave.enabled,
            sync,
            next_storage_check: Instant::now(),
            import: None,
            pending_import: None,
            export_dir: PathBuf::from("."),
            defaults: config.auto_collapse,
            should_quit: false,
            grid_area: split_screen(Rect::new(0, 0, width, height)).1,
        };
        app.sync_settings();
        app
    }

    /// Sets the directory exports are written to.
    #[must_use]
    pub fn with_export_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.export_dir = dir.into();
        self
    }

    /// Returns a reference to the application state.
    #[must_use]
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Returns the drag controller.
    #[must_use]
    pub fn drag(&self) -> &DragReorderController<H> {
        &self.drag
    }

    /// Returns the auto-collapse engine.
    #[must_use]
    pub fn collapse(&self) -> &AutoCollapseEngine {
        &self.collapse
    }

    /// Returns the layout store.
    #[must_use]
    pub fn store(&self) -> &Arc<LayoutStore> {
        &self.store
    }

    /// Returns whether the import prompt is open.
    #[must_use]
    pub fn is_import_open(&self) -> bool {
        self.import.is_some()
    }

    /// Returns whether the user asked to quit.
    #[must_use]
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Updates the application state based on a message.
    ///
    /// The import prompt takes every message while open. When the help
    /// overlay is visible, any key or click other than `Quit` dismisses it.
    pub fn update(&mut self, msg: Message) {
        if let Some(prompt) = self.import.as_mut() {
            match msg {
                Message::Quit => self.should_quit = true,
                Message::ImportInput { ch } => prompt.insert_char(ch),
                Message::ImportBackspace => prompt.backspace(),
                Message::ImportConfirm => {
                    if let Some(path) = prompt.path() {
                        self.pending_import = Some(path);
                        self.import = None;
                    }
                }
                Message::ImportCancel | Message::Escape => self.import = None,
                Message::Resize { width, height } => self.resize(width, height),
                _ => {}
            }
            return;
        }

        if self.state.help_visible {
            if msg.is_terminating() {
                self.should_quit = true;
            } else if let Message::Resize { width, height } = msg {
                self.resize(width, height);
            } else if !msg.is_pointer() || matches!(msg, Message::PointerDown { .. }) {
                let _ = self.state.dismiss_help();
            }
            return;
        }

        // Arrow keys do not steer a mouse drag.
        if msg.is_navigation() && self.pointer.is_active() {
            return;
        }

        match msg {
            Message::Quit => self.should_quit = true,
            Message::ToggleHelp => self.state.toggle_help(),
            Message::Escape => self.escape(),
            Message::NavigateLeft => self.navigate(Direction::Left),
            Message::NavigateRight => self.navigate(Direction::Right),
            Message::NavigateUp => self.navigate(Direction::Up),
            Message::NavigateDown => self.navigate(Direction::Down),
            Message::Select => self.select(),
            Message::ToggleMode => self.state.toggle_focused_mode(Utc::now()),
            Message::CyclePriority => self.state.cycle_focused_priority(Utc::now()),
            Message::MinimizeNow => {
                if self
                    .collapse
                    .trigger_auto_collapse(&mut self.state, Instant::now())
                    == 0
                {
                    self.state.notify("Nothing left to minimize");
                }
            }
            Message::Undo => {
                if !self.collapse.undo_collapse(&mut self.state) {
                    self.state.notify("Nothing to undo");
                }
            }
            Message::ToggleAutoCollapse => {
                self.state.auto_collapse.enabled = !self.state.auto_collapse.enabled;
                self.sync_settings();
                self.state.notify(if self.state.auto_collapse.enabled {
                    "Auto-collapse on"
                } else {
                    "Auto-collapse off"
                });
            }
            Message::ColumnsUp => self.state.adjust_columns(1),
            Message::ColumnsDown => self.state.adjust_columns(-1),
            Message::Export => self.export(),
            Message::OpenImport => self.import = Some(ImportPrompt::new()),
            Message::ResetLayout => self.reset(),
            Message::Resize { width, height } => self.resize(width, height),
            Message::PointerDown { column, row } => self.pointer_down(column, row),
            Message::PointerMove { column, row } => self.pointer_move(column, row),
            Message::PointerUp { column, row } => self.pointer_up(column, row),
            Message::ImportInput { .. }
            | Message::ImportBackspace
            | Message::ImportConfirm
            | Message::ImportCancel => {}
        }
    }

    /// Cancels a drag, or clears the toast when nothing is being dragged.
    fn escape(&mut self) {
        if self.drag.is_dragging() {
            let _ = self.pointer.release();
            self.drag.drag_cancel();
        } else {
            self.state.toast = None;
        }
    }

    /// Moves focus, or the drop target while a keyboard drag is active.
    fn navigate(&mut self, direction: Direction) {
        if !self.drag.is_dragging() {
            self.state.navigate(direction);
            return;
        }

        let from = self
            .drag
            .over()
            .or(self.drag.active())
            .and_then(|id| self.state.index_of(id))
            .unwrap_or(self.state.focused);
        let sensor = KeyboardSensor::new(self.state.columns() as usize);
        let to = sensor.step(from, direction, self.state.cards.len());
        let target = self.state.cards.get(to).map(|card| card.id.clone());
        self.drag.drag_over(target);
    }

    /// Picks up the focused card, or drops the one being carried.
    fn select(&mut self) {
        if self.drag.is_dragging() {
            let _ = self.pointer.release();
            self.finish_drag();
        } else if let Some(card) = self.state.focused_card() {
            let id = card.id.clone();
            self.drag.drag_start(id);
        }
    }

    fn finish_drag(&mut self) {
        let active = self.drag.active().cloned();
        let moved = self.drag.drag_end(&mut self.state, Utc::now());
        if let Some(id) = active {
            self.state.focus(&id);
        }
        debug!(moved, "drag finished");
    }

    /// Lays out the committed order for hit-testing.
    fn committed_layout(&self) -> GridLayout {
        GridLayout::compute(
            &self.state.cards,
            self.state.columns(),
            f64::from(self.grid_area.width) * CELL_WIDTH_PX,
            self.detector.config().gap,
        )
    }

    fn pointer_point(&self, column: u16, row: u16) -> Point {
        cell_to_point(
            self.grid_area,
            column,
            row,
            f64::from(self.state.scroll) * CELL_HEIGHT_PX,
        )
    }

    fn pointer_down(&mut self, column: u16, row: u16) {
        if self.drag.is_dragging() || !self.grid_area.contains(Position::new(column, row)) {
            return;
        }
        let point = self.pointer_point(column, row);
        let layout = self.committed_layout();
        if let Some(id) = hit_test(point, &layout.rects).cloned() {
            self.state.focus(&id);
            self.pointer.press(id, point);
        }
    }

    fn pointer_move(&mut self, column: u16, row: u16) {
        let point = self.pointer_point(column, row);
        if let Some(id) = self.pointer.move_to(point) {
            self.drag.drag_start(id);
        }
        if self.pointer.is_active() && self.drag.is_dragging() {
            let layout = self.committed_layout();
            self.drag
                .drag_over(closest_center(point, &layout.rects).cloned());
        }
    }

    fn pointer_up(&mut self, column: u16, row: u16) {
        let was_active = self.pointer.is_active();
        if !self.pointer.release() || !was_active || !self.drag.is_dragging() {
            return;
        }
        let point = self.pointer_point(column, row);
        let layout = self.committed_layout();
        self.drag
            .drag_over(closest_center(point, &layout.rects).cloned());
        self.finish_drag();
    }

    fn resize(&mut self, width: u16, height: u16) {
        let info = *self.detector.on_resize(viewport_for(width, height));
        self.state.detected_columns = info.grid_columns;
        self.grid_area = split_screen(Rect::new(0, 0, width, height)).1;
        debug!(width, height, columns = info.grid_columns, "resized");
    }

    /// Pushes the state's auto-collapse settings into the engine and the
    /// detector.
    fn sync_settings(&mut self) {
        let settings = self.state.auto_collapse;
        if *self.collapse.settings() != settings {
            self.collapse.set_settings(settings);
        }
        let config = space_config(&self.space, &settings);
        if *self.detector.config() != config {
            let _ = self.detector.set_config(config);
        }
    }

    fn export(&mut self) {
        match self
            .store
            .export_layout(&self.state.snapshot(), &self.export_dir)
        {
            Ok(path) => self
                .state
                .notify(format!("Exported layout to {}", path.display())),
            Err(e) => {
                warn!(error = %e, "export failed");
                self.state.notify(format!("Export failed: {e}"));
            }
        }
    }

    fn reset(&mut self) {
        self.autosaver.cancel();
        if self.store.reset_layout() {
            self.state.reset_cards();
            self.state.auto_collapse = self.defaults;
            self.sync_settings();
            self.autosaver.prime(self.state.snapshot());
            self.state.notify("Layout reset");
        } else {
            self.state.notify("Could not reset the saved layout");
        }
    }

    /// Runs an import confirmed in the prompt, if any.
    ///
    /// Success and failure both end in a toast; storage is untouched when
    /// the file is rejected.
    pub async fn run_pending_import(&mut self) {
        let Some(path) = self.pending_import.take() else {
            return;
        };

        let store = Arc::clone(&self.store);
        match store.import_layout(&path, &mut self.state).await {
            Ok(layout) => {
                self.sync_settings();
                self.autosaver.prime(self.state.snapshot());
                debug!(cards = layout.cards.len(), "import applied");
                self.state
                    .notify(format!("Imported layout from {}", path.display()));
            }
            Err(e) => {
                warn!(error = %e, path = %path.display(), "import failed");
                self.state.notify(format!("Import failed: {e}"));
            }
        }
    }

    /// Advances time-driven work to `now`.
    ///
    /// Autosave scheduling spawns onto the current tokio runtime, so this
    /// must be called from within one.
    pub fn tick(&mut self, now: Instant) {
        if now >= self.next_storage_check {
            self.next_storage_check = now + STORAGE_CHECK_INTERVAL;
            let _ = self.store.detect_external_change();
        }

        if let Some(sync) = self.sync.as_mut() {
            if sync.poll(&mut self.state) > 0 {
                self.sync_settings();
                self.autosaver.prime(self.state.snapshot());
                self.state.notify("Layout updated from another window");
            }
        }

        let crowded = self
            .detector
            .set_card_count(self.state.cards.len())
            .should_auto_collapse;
        self.collapse.observe(crowded, now);
        let _ = self.collapse.tick(&mut self.state, now);
        self.state.expire_toast(now);

        if self.autosave_enabled {
            let _ = self.autosaver.observe(self.state.snapshot());
        }
    }

    /// Writes any unsaved layout immediately.
    pub fn shutdown(&mut self) {
        if self.autosave_enabled && self.autosaver.flush() {
            info!("saved layout on exit");
        }
    }

    /// Returns the cards in the order to draw them.
    ///
    /// While a drag has a target, this is the order the drop would produce.
    fn display_cards(&self) -> Vec<Card> {
        let Some(active) = self.drag.active() else {
            return self.state.cards.clone();
        };
        preview_order(&self.state.cards, active, self.drag.over())
            .iter()
            .filter_map(|id| self.state.cards.iter().find(|card| &card.id == id).cloned())
            .collect()
    }

    /// Scrolls just enough to keep the focused card on screen.
    fn scroll_to_focus(&mut self, layout: &GridLayout, visible_rows: u16) {
        let Some(rect) = self
            .state
            .focused_card()
            .and_then(|card| layout.rect_of(&card.id))
        else {
            return;
        };
        let top = (rect.y / CELL_HEIGHT_PX).round() as u16;
        let bottom = top.saturating_add((rect.height / CELL_HEIGHT_PX).round() as u16);

        if top < self.state.scroll {
            self.state.scroll = top.saturating_sub(1);
        } else if bottom > self.state.scroll.saturating_add(visible_rows) {
            self.state.scroll = bottom.saturating_sub(visible_rows);
        }
    }

    /// Renders the application to the terminal frame.
    pub fn view(&mut self, frame: &mut Frame) {
        let area = frame.area();
        if area.height < MIN_HEIGHT || area.width < MIN_WIDTH {
            self.render_terminal_too_small(frame, area);
            return;
        }

        let (header, grid_area, status_area) = split_screen(area);
        self.grid_area = grid_area;
        if let Some(header) = header {
            self.render_header(frame, header);
        }

        let cards = self.display_cards();
        let layout = GridLayout::compute(
            &cards,
            self.state.columns(),
            f64::from(grid_area.width) * CELL_WIDTH_PX,
            self.detector.config().gap,
        );
        self.scroll_to_focus(&layout, grid_area.height);

        let dragging = self.drag.active();
        let view = GridView {
            deck: &self.state.deck,
            cards: &cards,
            layout: &layout,
            focused: self.state.focused_card().map(|card| &card.id),
            dragging,
            drop_target: self.drag.over().filter(|over| Some(*over) != dragging),
            scroll: self.state.scroll,
        };
        render_grid(&view, grid_area, frame.buffer_mut());

        let status = StatusInfo {
            columns: self.state.columns(),
            auto_collapse: self.state.auto_collapse.enabled,
            collapsing: self.collapse.is_auto_collapsing(Instant::now()),
            saving: self.autosaver.is_saving(),
            dragging: self.drag.is_dragging(),
            toast: self.state.toast.as_ref(),
        };
        render_status_bar(&status, status_area, frame.buffer_mut());

        if let Some(prompt) = &self.import {
            render_import_prompt(prompt, area, frame.buffer_mut());
        } else if self.state.help_visible {
            render_help_overlay(area, frame.buffer_mut());
        }
    }

    /// Renders a message when the terminal is too small.
    fn render_terminal_too_small(&self, frame: &mut Frame, area: Rect) {
        let message = format!(
            "Terminal too small ({}×{})\nMinimum: {}×{} (w×h)",
            area.width, area.height, MIN_WIDTH, MIN_HEIGHT
        );

        let paragraph = Paragraph::new(message)
            .style(Style::default().fg(Color::Yellow))
            .alignment(Alignment::Center)
            .wrap(ratatui::widgets::Wrap { trim: false });

        let vertical_offset = area.height.saturating_sub(2) / 2;
        let centered_area = Rect {
            x: area.x,
            y: area.y + vertical_offset,
            width: area.width,
            height: area.height.saturating_sub(vertical_offset),
        };

        frame.render_widget(paragraph, centered_area);
    }

    /// Renders the header bar with the deck name and card counts.
    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded);

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let compact = self
            .state
            .cards
            .iter()
            .filter(|card| card.mode == CardMode::Compact)
            .count();
        let counts = format!("{} cards · {} compact", self.state.cards.len(), compact);
        let counts_width = u16::try_from(counts.chars().count()).unwrap_or(u16::MAX);

        let [title_area, counts_area] =
            Layout::horizontal([Constraint::Min(0), Constraint::Length(counts_width)])
                .areas(inner);

        let title = Paragraph::new(Line::from(vec![
            Span::styled(
                "cardgrid",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" - "),
            Span::styled(self.state.deck.mode.name(), Style::default().fg(Color::White)),
        ]));
        frame.render_widget(title, title_area);

        let counts = Paragraph::new(Span::styled(counts, Style::default().fg(Color::DarkGray)))
            .alignment(Alignment::Right);
        frame.render_widget(counts, counts_area);
    }

    /// Runs the main application loop until the user quits.
    ///
    /// The layout is flushed to storage before returning.
    ///
    /// # Errors
    ///
    /// Returns an error if terminal operations fail.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use std::sync::Arc;
    /// use cardgrid_config::Config;
    /// use cardgrid_protocol::deck::{SiteMode, sample_deck};
    /// use cardgrid_store::{LayoutStore, MemoryStorage};
    /// use cardgrid_tui::{App, terminal};
    ///
    /// #[tokio::main]
    /// async fn main() -> anyhow::Result<()> {
    ///     let store = Arc::new(LayoutStore::new(Arc::new(MemoryStorage::new())));
    ///     let mut app = App::new(&Config::default(), sample_deck(SiteMode::Creator), store);
    ///
    ///     let mut terminal = terminal::setup_terminal()?;
    ///     app.run(&mut terminal).await?;
    ///     terminal::restore_terminal(&mut terminal)?;
    ///     Ok(())
    /// }
    /// ```
    pub async fn run(&mut self, terminal: &mut AppTerminal) -> anyhow::Result<()> {
        use crossterm::event::Event;

        let size = terminal.size()?;
        self.resize(size.width, size.height);

        loop {
            terminal.draw(|frame| self.view(frame))?;

            if let Some(event) = poll_event()? {
                let msg = match (&self.import, &event) {
                    (Some(_), Event::Key(key)) => key_to_import_message(*key),
                    _ => event_to_message(&event),
                };
                if let Some(msg) = msg {
                    self.update(msg);
                }
            }

            self.run_pending_import().await;
            self.tick(Instant::now());

            if self.should_quit {
                break;
            }
        }

        self.shutdown();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use cardgrid_engine::haptics::{DRAG_START_PATTERN, DROP_PATTERN, RecordingHaptics};
    use cardgrid_protocol::CardId;
    use cardgrid_protocol::deck::{SiteMode, sample_deck};
    use cardgrid_store::{FileStorage, LayoutSnapshot, MemoryStorage, SyncHub};
    use ratatui::{Terminal, backend::TestBackend};

    use crate::test_utils::buffer_to_string;

    fn memory_store() -> Arc<LayoutStore> {
        Arc::new(LayoutStore::new(Arc::new(MemoryStorage::new())))
    }

    fn app_with(store: Arc<LayoutStore>) -> App<RecordingHaptics> {
        App::with_haptics(
            &Config::default(),
            sample_deck(SiteMode::Institutional),
            store,
            RecordingHaptics::default(),
        )
    }

    fn app() -> App<RecordingHaptics> {
        let mut app = app_with(memory_store());
        app.update(Message::Resize {
            width: 80,
            height: 24,
        });
        app
    }

    fn ids(app: &App<RecordingHaptics>) -> Vec<String> {
        app.state
            .cards
            .iter()
            .map(|card| card.id.as_str().to_string())
            .collect()
    }

    fn compact_count(app: &App<RecordingHaptics>) -> usize {
        app.state
            .cards
            .iter()
            .filter(|card| card.mode == CardMode::Compact)
            .count()
    }

    #[test]
    fn quit_message_sets_should_quit() {
        let mut app = app();
        assert!(!app.should_quit());
        app.update(Message::Quit);
        assert!(app.should_quit());
    }

    #[test]
    fn resize_updates_detected_columns() {
        let mut app = app();
        assert_eq!(app.state.detected_columns, 3);

        app.update(Message::Resize {
            width: 160,
            height: 40,
        });
        assert_eq!(app.state.detected_columns, 4);
        assert_eq!(app.grid_area, Rect::new(0, 3, 160, 36));
    }

    #[test]
    fn help_swallows_the_next_message() {
        let mut app = app();
        app.update(Message::ToggleHelp);
        assert!(app.state.help_visible);

        app.update(Message::NavigateRight);
        assert!(!app.state.help_visible);
        assert_eq!(app.state.focused, 0);

        app.update(Message::NavigateRight);
        assert_eq!(app.state.focused, 1);
    }

    #[test]
    fn keyboard_drag_moves_card_and_plays_feedback() {
        let mut app = app();
        let first = app.state.cards[0].id.clone();
        let second = app.state.cards[1].id.clone();

        app.update(Message::Select);
        assert_eq!(app.drag.active(), Some(&first));

        app.update(Message::NavigateRight);
        assert_eq!(app.drag.over(), Some(&second));

        app.update(Message::Select);
        assert!(!app.drag.is_dragging());
        assert_eq!(app.state.cards[1].id, first);
        assert_eq!(app.state.cards[0].id, second);
        assert_eq!(app.state.focused, 1);
        assert_eq!(
            app.drag.haptics().played,
            vec![DRAG_START_PATTERN.to_vec(), DROP_PATTERN.to_vec()]
        );
    }

    #[test]
    fn escape_cancels_keyboard_drag() {
        let mut app = app();
        let before = ids(&app);

        app.update(Message::Select);
        app.update(Message::NavigateDown);
        app.update(Message::Escape);

        assert!(!app.drag.is_dragging());
        assert_eq!(ids(&app), before);
    }

    #[test]
    fn pointer_drag_reorders_by_closest_center() {
        let mut app = app();
        let first = app.state.cards[0].id.clone();
        let second = app.state.cards[1].id.clone();

        // Inside the first card, then far enough right to activate and land
        // nearest the second card.
        app.update(Message::PointerDown { column: 5, row: 6 });
        assert!(!app.drag.is_dragging());

        app.update(Message::PointerMove { column: 30, row: 6 });
        assert_eq!(app.drag.active(), Some(&first));
        assert_eq!(app.drag.over(), Some(&second));

        app.update(Message::PointerUp { column: 30, row: 6 });
        assert!(!app.drag.is_dragging());
        assert_eq!(app.state.cards[1].id, first);
    }

    #[test]
    fn pointer_click_without_movement_only_focuses() {
        let mut app = app();
        let before = ids(&app);

        app.update(Message::PointerDown { column: 30, row: 6 });
        app.update(Message::PointerUp { column: 30, row: 6 });

        assert_eq!(app.state.focused, 1);
        assert_eq!(ids(&app), before);
        assert!(app.drag.haptics().played.is_empty());
    }

    #[test]
    fn columns_override_is_clamped() {
        let mut app = app();
        app.update(Message::ColumnsDown);
        app.update(Message::ColumnsDown);
        app.update(Message::ColumnsDown);
        assert_eq!(app.state.columns(), 1);

        for _ in 0..10 {
            app.update(Message::ColumnsUp);
        }
        assert_eq!(app.state.columns(), 6);
    }

    #[test]
    fn minimize_now_then_undo() {
        let mut app = app();
        app.update(Message::MinimizeNow);
        assert_eq!(compact_count(&app), 4);
        assert!(app.collapse.can_undo());

        app.update(Message::Undo);
        assert_eq!(compact_count(&app), 0);
        let toast = app.state.toast.as_ref().expect("undo toast");
        assert_eq!(toast.notification.message, "Card layout restored");
    }

    #[tokio::test]
    async fn crowded_grid_collapses_after_debounce() {
        let mut app = app();
        let now = Instant::now();

        app.tick(now);
        assert_eq!(compact_count(&app), 0);
        assert!(app.collapse.is_pending());

        app.tick(now + Duration::from_millis(300));
        assert_eq!(compact_count(&app), 4);
        let toast = app.state.toast.as_ref().expect("collapse toast");
        assert_eq!(toast.notification.message, "Minimized 4 cards to save space");
    }

    #[tokio::test]
    async fn disabling_auto_collapse_stops_the_debounce() {
        let mut app = app();
        app.update(Message::ToggleAutoCollapse);
        assert!(!app.state.auto_collapse.enabled);

        let now = Instant::now();
        app.tick(now);
        app.tick(now + Duration::from_secs(1));
        assert_eq!(compact_count(&app), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn edits_are_autosaved_after_debounce() {
        let store = memory_store();
        let mut app = app_with(Arc::clone(&store));
        app.update(Message::ToggleAutoCollapse);

        app.update(Message::ToggleMode);
        app.tick(Instant::now());
        assert!(app.autosaver.is_saving());
        assert!(!store.has_stored_layout());

        tokio::time::sleep(Duration::from_millis(1001)).await;
        tokio::task::yield_now().await;

        let saved = store.load_layout().expect("autosaved");
        assert_eq!(saved.cards[0].mode, CardMode::Compact);
        assert_eq!(
            saved.auto_collapse_settings.map(|settings| settings.enabled),
            Some(false)
        );
    }

    #[test]
    fn restores_saved_layout_at_startup() {
        let store = memory_store();
        let deck = sample_deck(SiteMode::Institutional);
        let mut cards = deck.cards.clone();
        cards.reverse();
        for (index, card) in cards.iter_mut().enumerate() {
            card.order = u32::try_from(index).unwrap_or(u32::MAX);
        }
        let last = cards[0].id.clone();
        assert!(store.save_layout(&LayoutSnapshot::new(cards, 5, None)));

        let app = app_with(store);
        assert_eq!(app.state.cards[0].id, last);
        assert_eq!(app.state.columns(), 5);
    }

    #[tokio::test]
    async fn reset_clears_storage_and_order() {
        let store = memory_store();
        let mut app = app_with(Arc::clone(&store));
        let first = app.state.cards[0].id.clone();

        app.update(Message::Select);
        app.update(Message::NavigateRight);
        app.update(Message::Select);
        assert!(store.save_layout(&app.state.snapshot()));

        app.update(Message::ResetLayout);
        assert!(!store.has_stored_layout());
        assert_eq!(app.state.cards[0].id, first);

        app.tick(Instant::now());
        assert!(!app.autosaver.is_saving());
    }

    #[test]
    fn export_writes_file_and_notifies() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut app = app().with_export_dir(dir.path());

        app.update(Message::Export);

        let files: Vec<_> = std::fs::read_dir(dir.path())
            .expect("read dir")
            .collect();
        assert_eq!(files.len(), 1);
        let toast = app.state.toast.as_ref().expect("export toast");
        assert!(toast.notification.message.starts_with("Exported layout to"));
    }

    #[tokio::test]
    async fn import_through_prompt() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("layout.json");
        std::fs::write(
            &path,
            r#"{"version":"3.0","cards":[{"id":"pricing","order":0,"mode":"compact","priority":"high"}],"gridColumns":2}"#,
        )
        .expect("write");

        let store = memory_store();
        let mut app = app_with(Arc::clone(&store));
        app.update(Message::OpenImport);
        assert!(app.is_import_open());
        for ch in path.display().to_string().chars() {
            app.update(Message::ImportInput { ch });
        }
        app.update(Message::ImportConfirm);
        assert!(!app.is_import_open());

        app.run_pending_import().await;

        assert_eq!(app.state.cards[0].id, CardId::from("pricing"));
        assert_eq!(app.state.cards[0].mode, CardMode::Compact);
        assert!(store.has_stored_layout());
        let toast = app.state.toast.as_ref().expect("import toast");
        assert!(toast.notification.message.starts_with("Imported layout from"));
    }

    #[tokio::test]
    async fn rejected_import_leaves_storage_alone() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("bad.json");
        std::fs::write(&path, r#"{"cards":[]}"#).expect("write");

        let store = memory_store();
        let mut app = app_with(Arc::clone(&store));
        let before = ids(&app);
        app.pending_import = Some(path);

        app.run_pending_import().await;

        assert!(!store.has_stored_layout());
        assert_eq!(ids(&app), before);
        let toast = app.state.toast.as_ref().expect("error toast");
        assert!(toast.notification.message.starts_with("Import failed"));
    }

    #[test]
    fn escape_closes_import_prompt() {
        let mut app = app();
        app.update(Message::OpenImport);
        app.update(Message::ImportInput { ch: 'x' });
        app.update(Message::NavigateRight);
        assert_eq!(app.state.focused, 0);

        app.update(Message::Escape);
        assert!(!app.is_import_open());
    }

    #[tokio::test]
    async fn adopts_layout_saved_by_another_window() {
        let hub = SyncHub::new(16);
        let storage = Arc::new(MemoryStorage::new());
        let ours = Arc::new(LayoutStore::new(storage.clone()).with_sync(&hub));
        let theirs = LayoutStore::new(storage).with_sync(&hub);

        let mut app = app_with(ours);
        let mut cards = app.state.cards.clone();
        cards.swap(0, 1);
        for (index, card) in cards.iter_mut().enumerate() {
            card.order = u32::try_from(index).unwrap_or(u32::MAX);
        }
        let moved = cards[0].id.clone();
        assert!(theirs.save_layout(&LayoutSnapshot::new(cards, 3, None)));

        app.tick(Instant::now());

        assert_eq!(app.state.cards[0].id, moved);
        let toast = app.state.toast.as_ref().expect("sync toast");
        assert_eq!(toast.notification.message, "Layout updated from another window");
        assert!(!app.autosaver.is_saving());
    }

    #[tokio::test]
    async fn adopts_layout_saved_by_another_process() {
        let dir = tempfile::tempdir().expect("tempdir");
        let open_store = || {
            let storage = FileStorage::with_path(dir.path().to_path_buf()).expect("storage");
            LayoutStore::new(Arc::new(storage)).with_sync(&SyncHub::default())
        };
        let ours = Arc::new(open_store());
        let theirs = open_store();

        let mut app = app_with(ours);
        let mut cards = app.state.cards.clone();
        cards.reverse();
        for (index, card) in cards.iter_mut().enumerate() {
            card.order = u32::try_from(index).unwrap_or(u32::MAX);
        }
        let moved = cards[0].id.clone();
        assert!(theirs.save_layout(&LayoutSnapshot::new(cards, 3, None)));

        let now = Instant::now();
        app.tick(now);

        assert_eq!(app.state.cards[0].id, moved);
        let toast = app.state.toast.as_ref().expect("sync toast");
        assert_eq!(toast.notification.message, "Layout updated from another window");
        assert!(!app.autosaver.is_saving());

        // The next check waits for the interval.
        let first = app.state.cards[0].id.clone();
        let mut cards = app.state.cards.clone();
        cards.swap(0, 1);
        for (index, card) in cards.iter_mut().enumerate() {
            card.order = u32::try_from(index).unwrap_or(u32::MAX);
        }
        assert!(theirs.save_layout(&LayoutSnapshot::new(cards, 3, None)));

        app.tick(now + Duration::from_millis(100));
        assert_eq!(app.state.cards[0].id, first);

        app.tick(now + STORAGE_CHECK_INTERVAL);
        assert_ne!(app.state.cards[0].id, first);
    }

    #[test]
    fn view_renders_header_grid_and_status() {
        let mut app = app();
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).expect("terminal");

        terminal.draw(|frame| app.view(frame)).expect("draw");

        let text = buffer_to_string(terminal.backend().buffer());
        assert!(text.contains("cardgrid - "));
        assert!(text.contains("8 cards · 0 compact"));
        assert!(text.contains("Managed IT"));
        assert!(text.contains("3 cols"));
    }

    #[test]
    fn view_reports_tiny_terminal() {
        let mut app = app();
        let mut terminal = Terminal::new(TestBackend::new(30, 8)).expect("terminal");

        terminal.draw(|frame| app.view(frame)).expect("draw");

        let text = buffer_to_string(terminal.backend().buffer());
        assert!(text.contains("Terminal too small"));
    }

    #[test]
    fn view_scrolls_to_focused_card() {
        let mut app = app();
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).expect("terminal");

        for _ in 0..3 {
            app.update(Message::NavigateDown);
        }
        terminal.draw(|frame| app.view(frame)).expect("draw");

        assert!(app.state.scroll > 0);
    }
}
