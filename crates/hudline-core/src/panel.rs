//! Bounded character regions and the multi-line draw adapter.
//!
//! [`CellGrid`] stands in for the host's character window: a rectangle of
//! styled cells that rendered widget strings are written into. Front-ends
//! translate cells to their own terminal types.

use crate::avatar::AvatarSnapshot;
use crate::color::{markup, WidgetColor};
use crate::registry::WidgetRegistry;
use crate::widget::Widget;

/// One character cell of an output region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub color: Option<WidgetColor>,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            color: None,
        }
    }
}

/// Rectangular region of styled character cells.
#[derive(Debug, Clone)]
pub struct CellGrid {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl CellGrid {
    #[must_use]
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::default(); usize::from(width) * usize::from(height)],
        }
    }

    #[must_use]
    pub const fn width(&self) -> u16 {
        self.width
    }

    #[must_use]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Cell at `(x, y)`; out-of-bounds reads return a blank cell.
    #[must_use]
    pub fn cell(&self, x: u16, y: u16) -> Cell {
        if x < self.width && y < self.height {
            self.cells[usize::from(y) * usize::from(self.width) + usize::from(x)]
        } else {
            Cell::default()
        }
    }

    fn set(&mut self, x: u16, y: u16, cell: Cell) {
        if x < self.width && y < self.height {
            self.cells[usize::from(y) * usize::from(self.width) + usize::from(x)] = cell;
        }
    }

    /// Plain text of one row, colors dropped.
    #[must_use]
    pub fn row_text(&self, y: u16) -> String {
        (0..self.width).map(|x| self.cell(x, y).ch).collect()
    }

    /// Iterate rows as `(ch, color)` cell slices.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(usize::from(self.width).max(1))
    }
}

/// Write a rendered widget string into a grid region.
///
/// The string is split on `'\n'`; each line lands at column `margin`,
/// clipped to `width` columns and to the grid bounds. Returns the row
/// index following the last line written.
pub fn draw_multiline(
    rendered: &str,
    grid: &mut CellGrid,
    margin: u16,
    width: u16,
    start_row: u16,
) -> u16 {
    let mut row = start_row;
    for line in rendered.split('\n') {
        if row >= grid.height() {
            break;
        }
        let mut column: u16 = 0;
        for (color, run) in markup::segments(line) {
            for ch in run.chars() {
                if column >= width {
                    break;
                }
                grid.set(margin.saturating_add(column), row, Cell { ch, color });
                column += 1;
            }
        }
        row += 1;
    }
    row
}

/// A widget wrapped as a fixed-size output pane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowPanel {
    widget_id: String,
    width: u16,
    height: u16,
}

impl Widget {
    /// Wrap this widget as a pane of `width` columns.
    ///
    /// The pane height is the widget's configured height when set,
    /// otherwise `req_height` (at least one row).
    #[must_use]
    pub fn window_panel(&self, width: u16, req_height: u16) -> WindowPanel {
        let height = if self.height() > 0 {
            self.height()
        } else {
            req_height.max(1)
        };
        WindowPanel {
            widget_id: self.id().to_string(),
            width,
            height,
        }
    }
}

impl WindowPanel {
    #[must_use]
    pub fn widget_id(&self) -> &str {
        &self.widget_id
    }

    #[must_use]
    pub const fn width(&self) -> u16 {
        self.width
    }

    #[must_use]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Render the wrapped widget at the pane width.
    ///
    /// Panics if the widget has been removed from the registry, which
    /// cannot happen between finalize and reset.
    #[must_use]
    pub fn render(&self, ava: &AvatarSnapshot, registry: &WidgetRegistry) -> String {
        let widget = match registry.get(&self.widget_id) {
            Some(widget) => widget,
            None => panic!("panel widget '{}' missing from registry", self.widget_id),
        };
        widget.layout(ava, self.width, registry)
    }

    /// Render into a grid region starting at `start_row`; returns the next row.
    pub fn draw_into(
        &self,
        ava: &AvatarSnapshot,
        registry: &WidgetRegistry,
        grid: &mut CellGrid,
        margin: u16,
        start_row: u16,
    ) -> u16 {
        let rendered = self.render(ava, registry);
        draw_multiline(&rendered, grid, margin, self.width, start_row)
    }
}
