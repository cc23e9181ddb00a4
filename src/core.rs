use crate::error::{GridArtError, GridArtResult};

pub use kurbo::{Point, Rect};

/// Square output canvas, `size` x `size` pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Edge length in pixels.
    pub size: u32,
}

impl Canvas {
    pub const DEFAULT_SIZE: u32 = 1024;

    // Avoid pathological pixmap allocations.
    pub const MAX_SIZE: u32 = 16_384;

    /// Create a validated canvas with `0 < size <= MAX_SIZE`.
    pub fn new(size: u32) -> GridArtResult<Self> {
        if size == 0 {
            return Err(GridArtError::invalid_input("canvas size must be > 0"));
        }
        if size > Self::MAX_SIZE {
            return Err(GridArtError::invalid_input(format!(
                "canvas size too large: {size} (max {})",
                Self::MAX_SIZE
            )));
        }
        Ok(Self { size })
    }

    pub fn extent(self) -> f64 {
        f64::from(self.size)
    }

    /// Full-canvas rectangle in pixel space.
    pub fn bounds(self) -> Rect {
        Rect::new(0.0, 0.0, self.extent(), self.extent())
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            size: Self::DEFAULT_SIZE,
        }
    }
}

/// Uniform grid laid over a [`Canvas`].
///
/// Cell sizes are real-valued; they are not rounded to whole pixels.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct Grid {
    pub rows: u32,
    pub cols: u32,
    pub cell_width: f64,
    pub cell_height: f64,
}

impl Grid {
    /// Inclusive bounds for both `rows` and `cols`.
    pub const MIN_DIVISIONS: u32 = 3;
    pub const MAX_DIVISIONS: u32 = 8;

    pub fn new(canvas: Canvas, rows: u32, cols: u32) -> GridArtResult<Self> {
        let range = Self::MIN_DIVISIONS..=Self::MAX_DIVISIONS;
        if !range.contains(&rows) || !range.contains(&cols) {
            return Err(GridArtError::invalid_input(format!(
                "grid must be between {}x{} and {}x{}, got {rows}x{cols}",
                Self::MIN_DIVISIONS,
                Self::MIN_DIVISIONS,
                Self::MAX_DIVISIONS,
                Self::MAX_DIVISIONS
            )));
        }
        Ok(Self {
            rows,
            cols,
            cell_width: canvas.extent() / f64::from(cols),
            cell_height: canvas.extent() / f64::from(rows),
        })
    }

    pub fn cell_count(self) -> usize {
        (self.rows * self.cols) as usize
    }

    /// Bounds of cell `(row, col)`.
    pub fn cell(self, row: u32, col: u32) -> Rect {
        let x = f64::from(col) * self.cell_width;
        let y = f64::from(row) * self.cell_height;
        Rect::new(x, y, x + self.cell_width, y + self.cell_height)
    }

    /// All cells in row-major order.
    pub fn cells(self) -> impl Iterator<Item = (u32, u32, Rect)> {
        (0..self.rows).flat_map(move |r| (0..self.cols).map(move |c| (r, c, self.cell(r, c))))
    }
}
