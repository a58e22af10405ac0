use thiserror::Error;

/// Built-in map, laid out as `MAP[x][y]`.
const DEFAULT_MAP: [[u8; 8]; 8] = [
    [1, 1, 1, 1, 1, 1, 1, 1],
    [1, 0, 0, 0, 0, 0, 0, 1],
    [1, 0, 1, 0, 1, 1, 0, 1],
    [1, 0, 1, 0, 0, 0, 0, 1],
    [1, 0, 0, 0, 0, 1, 0, 1],
    [1, 0, 1, 1, 0, 1, 0, 1],
    [1, 0, 0, 0, 0, 0, 0, 1],
    [1, 1, 1, 1, 1, 1, 1, 1],
];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    #[error("grid has no cells")]
    Empty,

    #[error("grid must be at least 3x3, got {width}x{height}")]
    TooSmall { width: usize, height: usize },

    #[error("column {column} has {found} cells, expected {expected}")]
    RaggedColumn {
        column: usize,
        expected: usize,
        found: usize,
    },

    #[error("border cell ({x}, {y}) is not a wall")]
    OpenBorder { x: usize, y: usize },
}

/// Static occupancy grid. `0` is passable, anything else is a wall id.
///
/// Cells are addressed as `grid[x][y]`: the outer index is the x (column)
/// coordinate. Every border cell is a wall, so any ray cast from inside the
/// grid hits something before it can leave.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridMap {
    width: usize,
    height: usize,
    cells: Vec<u8>, // x * height + y
}

impl GridMap {
    /// Builds a grid from a list of columns, `columns[x][y]`.
    pub fn from_columns(columns: Vec<Vec<u8>>) -> Result<Self, GridError> {
        let width = columns.len();
        let height = columns.first().map_or(0, Vec::len);
        if width == 0 || height == 0 {
            return Err(GridError::Empty);
        }
        if width < 3 || height < 3 {
            return Err(GridError::TooSmall { width, height });
        }

        let mut cells = Vec::with_capacity(width * height);
        for (column, col) in columns.into_iter().enumerate() {
            if col.len() != height {
                return Err(GridError::RaggedColumn {
                    column,
                    expected: height,
                    found: col.len(),
                });
            }
            cells.extend(col);
        }

        let grid = Self {
            width,
            height,
            cells,
        };
        grid.check_border()?;
        Ok(grid)
    }

    fn check_border(&self) -> Result<(), GridError> {
        let on_border = |x: usize, y: usize| {
            x == 0 || y == 0 || x == self.width - 1 || y == self.height - 1
        };
        for x in 0..self.width {
            for y in 0..self.height {
                if on_border(x, y) && self.cells[x * self.height + y] == 0 {
                    return Err(GridError::OpenBorder { x, y });
                }
            }
        }
        Ok(())
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Cell value at `(x, y)`, `None` outside the grid.
    #[inline]
    pub fn cell(&self, x: i32, y: i32) -> Option<u8> {
        if x < 0 || y < 0 {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.cells[x * self.height + y])
    }

    /// True if `(x, y)` is inside the grid and passable.
    #[inline]
    pub fn is_open(&self, x: i32, y: i32) -> bool {
        self.cell(x, y) == Some(0)
    }
}

impl Default for GridMap {
    fn default() -> Self {
        Self {
            width: DEFAULT_MAP.len(),
            height: DEFAULT_MAP[0].len(),
            cells: DEFAULT_MAP.iter().flatten().copied().collect(),
        }
    }
}
