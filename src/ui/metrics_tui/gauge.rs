//! Two-part bar gauge with auto-scaling, never-shrinking axis limits.
//!
//! A gauge owns a fixed 6 × 34 cell region. The upper and lower halves each
//! have a title in the frame border, a formatted value after the title, a
//! 26-cell bar and an axis limit label to the right of the frame:
//!
//! ```text
//!   ┌ CPU Time (0.42)          ─┐ 4
//!   │▒▒▒▒▒▒▒▒▒▒▒                │
//! 0 ├───────────────────────────┤
//!   │▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒        │ 2G
//!   └ Heap (1.40G)             ─┘
//! ```
//!
//! All operations write straight into the gauge's own cell buffer; drawing
//! the gauge on screen copies that buffer.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::symbols::{line, shade};
use ratatui::widgets::Widget;

use super::scale::{limit_and_label, scale_unit, LABEL_WIDTH};

pub const GAUGE_HEIGHT: u16 = 6;
pub const GAUGE_WIDTH: u16 = 34;
/// Number of cells in each bar
pub const TRACK_WIDTH: usize = 26;

const FRAME_LEFT: u16 = 2;
const FRAME_RIGHT: u16 = 29;
const TRACK_LEFT: u16 = 3;
const LABEL_COLUMN: u16 = 31;
const SHARED_LABEL_ROW: u16 = 2;
const TITLE_FIELD: usize = 24;
/// Title text starts after the corner and one blank, the value after the
/// title and one more blank.
const TITLE_BASE_OFFSET: usize = 5;
/// Values are padded up to the frame's last horizontal segment
const VALUE_END: usize = 28;

const FILL: &str = shade::MEDIUM;
const EMPTY: &str = " ";

/// Which bar of a gauge an operation applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Half {
    Upper,
    Lower,
}

impl Half {
    fn title_row(self) -> u16 {
        match self {
            Half::Upper => 0,
            Half::Lower => 4,
        }
    }

    fn bar_row(self) -> u16 {
        match self {
            Half::Upper => 1,
            Half::Lower => 3,
        }
    }
}

/// Per-half state. `current_limit` is only ever set or raised.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GaugeState {
    current_limit: Option<f64>,
    title: String,
    title_offset: usize,
}

impl GaugeState {
    fn new() -> Self {
        Self {
            title_offset: TITLE_BASE_OFFSET,
            ..Default::default()
        }
    }

    fn needs_limit(&self, value: f64) -> bool {
        self.current_limit.map_or(true, |limit| value > limit)
    }
}

/// Number of filled cells for `value` on an axis of `limit`.
///
/// Cell `i` is filled when `i / TRACK_WIDTH < value / limit`. Zero or
/// negative values fill nothing.
pub fn fill_cells(value: f64, limit: f64) -> usize {
    let pct = if value > 0.0 { value / limit } else { 0.0 };
    (0..TRACK_WIDTH)
        .filter(|&i| (i as f64 / TRACK_WIDTH as f64) < pct)
        .count()
}

#[derive(Debug, Clone)]
pub struct GaugeWidget {
    area: Rect,
    cells: Buffer,
    upper: GaugeState,
    lower: GaugeState,
}

impl GaugeWidget {
    /// Create a gauge with its top-left corner at column `x`, row `y`
    pub fn new(x: u16, y: u16) -> Self {
        let area = Rect::new(x, y, GAUGE_WIDTH, GAUGE_HEIGHT);
        let mut gauge = Self {
            area,
            cells: Buffer::empty(area),
            upper: GaugeState::new(),
            lower: GaugeState::new(),
        };
        gauge.draw_frame();
        gauge
    }

    pub fn area(&self) -> Rect {
        self.area
    }

    pub fn cells(&self) -> &Buffer {
        &self.cells
    }

    pub fn limit(&self, half: Half) -> Option<f64> {
        self.state(half).current_limit
    }

    pub fn title(&self, half: Half) -> &str {
        &self.state(half).title
    }

    pub fn title_offset(&self, half: Half) -> usize {
        self.state(half).title_offset
    }

    fn state(&self, half: Half) -> &GaugeState {
        match half {
            Half::Upper => &self.upper,
            Half::Lower => &self.lower,
        }
    }

    fn state_mut(&mut self, half: Half) -> &mut GaugeState {
        match half {
            Half::Upper => &mut self.upper,
            Half::Lower => &mut self.lower,
        }
    }

    fn put_str(&mut self, row: u16, col: u16, text: &str) {
        self.cells.set_string(
            self.area.x + col,
            self.area.y + row,
            text,
            Style::default(),
        );
    }

    fn put_symbol(&mut self, row: u16, col: u16, symbol: &str) {
        let (x, y) = (self.area.x + col, self.area.y + row);
        self.cells[(x, y)].set_symbol(symbol);
    }

    fn hline(&mut self, row: u16) {
        for col in TRACK_LEFT..FRAME_RIGHT {
            self.put_symbol(row, col, line::NORMAL.horizontal);
        }
    }

    fn draw_frame(&mut self) {
        let set = line::NORMAL;

        self.put_symbol(0, FRAME_LEFT, set.top_left);
        self.hline(0);
        self.put_symbol(0, FRAME_RIGHT, set.top_right);

        self.put_symbol(1, FRAME_LEFT, set.vertical);
        self.put_symbol(1, FRAME_RIGHT, set.vertical);

        self.put_str(2, 0, "0");
        self.put_symbol(2, FRAME_LEFT, set.vertical_right);
        self.hline(2);
        self.put_symbol(2, FRAME_RIGHT, set.vertical_left);

        self.put_symbol(3, FRAME_LEFT, set.vertical);
        self.put_symbol(3, FRAME_RIGHT, set.vertical);

        self.put_symbol(4, FRAME_LEFT, set.bottom_left);
        self.hline(4);
        self.put_symbol(4, FRAME_RIGHT, set.bottom_right);
    }

    /// Write the title of one half into the frame border.
    ///
    /// The value field starts right after the title; calling this again
    /// replaces the title instead of shifting the field further.
    pub fn set_title(&mut self, half: Half, title: &str) {
        let title: String = title.chars().take(TITLE_FIELD).collect();
        self.put_str(
            half.title_row(),
            TRACK_LEFT,
            &format!(" {:<width$}", title, width = TITLE_FIELD),
        );

        let state = self.state_mut(half);
        state.title_offset = TITLE_BASE_OFFSET + title.chars().count();
        state.title = title;
    }

    /// Raise the axis limit of one half to cover `value`.
    ///
    /// Nothing happens unless the half has no limit yet or `value` exceeds
    /// the current one. Returns whether the limit changed.
    pub fn set_limit(&mut self, half: Half, value: f64) -> bool {
        if !self.state(half).needs_limit(value) {
            return false;
        }

        let axis = limit_and_label(value);
        self.state_mut(half).current_limit = Some(axis.limit);
        self.put_str(half.bar_row(), LABEL_COLUMN, &axis.label);
        true
    }

    /// Raise both halves to one shared axis limit covering `value`.
    ///
    /// The shared limit also covers whatever either half already had, so
    /// neither half ever shrinks. Its label replaces the per-half labels.
    pub fn set_limit_both(&mut self, value: f64) -> bool {
        if !self.upper.needs_limit(value) && !self.lower.needs_limit(value) {
            return false;
        }

        let target = [self.upper.current_limit, self.lower.current_limit]
            .into_iter()
            .flatten()
            .fold(value, f64::max);
        let axis = limit_and_label(target);

        self.upper.current_limit = Some(axis.limit);
        self.lower.current_limit = Some(axis.limit);

        let blank = " ".repeat(LABEL_WIDTH);
        self.put_str(Half::Upper.bar_row(), LABEL_COLUMN, &blank);
        self.put_str(Half::Lower.bar_row(), LABEL_COLUMN, &blank);
        self.put_str(SHARED_LABEL_ROW, LABEL_COLUMN, &axis.label);
        true
    }

    /// Show `value` on one half: widen the axis if needed, print the value
    /// after the title, and redraw the bar.
    pub fn set_value(&mut self, half: Half, value: f64, precision: usize) {
        self.set_limit(half, value);

        let state = self.state(half);
        let offset = state.title_offset;
        let limit = state.current_limit.unwrap_or(0.0);

        let width = VALUE_END.saturating_sub(offset);
        if width > 0 {
            let text = format!("({})", scale_unit(value, precision));
            self.put_str(
                half.title_row(),
                offset as u16,
                &format!("{:<width$.width$}", text, width = width),
            );
        }

        let filled = fill_cells(value, limit);
        let row = half.bar_row();
        for i in 0..TRACK_WIDTH {
            let symbol = if i < filled { FILL } else { EMPTY };
            self.put_symbol(row, TRACK_LEFT + i as u16, symbol);
        }
    }

    /// Text of one row of the gauge, for inspection
    pub fn row_text(&self, row: u16) -> String {
        (self.area.left()..self.area.right())
            .map(|x| self.cells[(x, self.area.y + row)].symbol())
            .collect()
    }
}

impl Widget for &GaugeWidget {
    /// Copy the gauge's cells onto the target, clipped to `area`
    fn render(self, area: Rect, buf: &mut Buffer) {
        let visible = self.area.intersection(area).intersection(buf.area);
        for y in visible.top()..visible.bottom() {
            for x in visible.left()..visible.right() {
                buf[(x, y)] = self.cells[(x, y)].clone();
            }
        }
    }
}
