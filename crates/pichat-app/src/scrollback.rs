//! Bounded chat history with a scroll window.
//!
//! The buffer holds at most [`CAPACITY`] rows, evicting the oldest once full.
//! The window shows up to [`WINDOW_HEIGHT`] consecutive rows starting at
//! `read_start` and follows the tail as rows arrive until the user scrolls
//! back.

use std::collections::VecDeque;

use pichat_proto::RowSource;

/// Rows kept in history.
pub const CAPACITY: usize = 50;

/// Characters per row.
pub const ROW_WIDTH: usize = 85;

/// Rows shown at once.
pub const WINDOW_HEIGHT: usize = 24;

/// One rendered chat row. Never longer than the buffer width and never
/// contains control characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    text: String,
}

impl Row {
    fn new(text: &str, width: usize) -> Self {
        Self { text: text.chars().filter(|c| !c.is_control()).take(width).collect() }
    }

    /// Row text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Who the row came from, for coloring.
    pub fn source(&self) -> RowSource {
        RowSource::of(&self.text)
    }
}

/// Ring of chat rows plus the visible window.
#[derive(Debug, Clone)]
pub struct Scrollback {
    rows: VecDeque<Row>,
    capacity: usize,
    width: usize,
    window_height: usize,
    read_start: usize,
}

impl Default for Scrollback {
    fn default() -> Self {
        Self::with_dimensions(CAPACITY, ROW_WIDTH, WINDOW_HEIGHT)
    }
}

impl Scrollback {
    /// Create an empty buffer with the standard dimensions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty buffer. The window is clamped to the capacity and
    /// every dimension to at least one.
    pub fn with_dimensions(capacity: usize, width: usize, window_height: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            rows: VecDeque::with_capacity(capacity),
            capacity,
            width: width.max(1),
            window_height: window_height.clamp(1, capacity),
            read_start: 0,
        }
    }

    /// Append one row, truncated to the width.
    ///
    /// With room left, a full window advances by one row. Once the buffer is
    /// full, the oldest row is evicted and the window indices stay put, so the
    /// same positions now show newer rows.
    pub fn append(&mut self, text: &str) {
        let row = Row::new(text, self.width);

        if self.rows.len() == self.capacity {
            self.rows.pop_front();
            self.rows.push_back(row);
            return;
        }

        if self.rows.len() >= self.read_start + self.window_height {
            self.read_start += 1;
        }
        self.rows.push_back(row);
    }

    /// Append text split into as many rows as the width requires.
    /// Empty text appends nothing.
    pub fn append_wrapped(&mut self, text: &str) {
        let chars: Vec<char> = text.chars().filter(|c| !c.is_control()).collect();
        for chunk in chars.chunks(self.width) {
            let row: String = chunk.iter().collect();
            self.append(&row);
        }
    }

    /// Move the window so the newest row is visible.
    pub fn follow_tail(&mut self) {
        if self.rows.len() > self.window_height && self.read_end() < self.rows.len() {
            self.read_start = self.rows.len() - self.window_height;
        }
    }

    /// Move the window one row towards older rows. Returns whether it moved.
    pub fn scroll_up(&mut self) -> bool {
        if self.read_start == 0 {
            return false;
        }
        self.read_start -= 1;
        true
    }

    /// Move the window one row towards newer rows. Returns whether it moved.
    pub fn scroll_down(&mut self) -> bool {
        if self.rows.len() <= self.window_height || self.read_end() >= self.rows.len() {
            return false;
        }
        self.read_start += 1;
        true
    }

    /// Drop every row and reset the window.
    pub fn clear(&mut self) {
        self.rows.clear();
        self.read_start = 0;
    }

    /// Rows inside the window, oldest first.
    pub fn visible_rows(&self) -> Vec<&Row> {
        self.rows.range(self.read_start..self.read_end()).collect()
    }

    /// Every stored row, oldest first.
    pub fn rows(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter()
    }

    /// First row index of the window.
    pub fn read_start(&self) -> usize {
        self.read_start
    }

    /// One past the last row index of the window.
    pub fn read_end(&self) -> usize {
        (self.read_start + self.window_height).min(self.rows.len())
    }

    /// Index the next row will be written to (equal to the row count).
    pub fn write_cursor(&self) -> usize {
        self.rows.len()
    }

    /// Number of stored rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether no rows are stored.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Maximum number of rows.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Maximum characters per row.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Rows shown at once.
    pub fn window_height(&self) -> usize {
        self.window_height
    }
}
