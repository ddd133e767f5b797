use core::fmt;

/// Occupancy of a single board cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cell {
    #[default]
    Empty,
    Player,
    Opponent,
}

impl Cell {
    pub fn is_empty(self) -> bool {
        matches!(self, Cell::Empty)
    }

    pub fn symbol(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Player => 'X',
            Cell::Opponent => 'O',
        }
    }
}

/// Row/column coordinate. Row 0 is the top row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pos {
    pub row: usize,
    pub col: usize,
}

impl Pos {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum BoardError {
    #[error("position {pos} is outside a {rows}x{cols} board")]
    OutOfBounds { pos: Pos, rows: usize, cols: usize },
    #[error("position {0} is already occupied")]
    Occupied(Pos),
}

/// Fixed-size grid of cells.
///
/// Dimensions never change after construction, and a placed cell only goes
/// back to [`Cell::Empty`] through [`Board::undo`].
///
/// ```
/// use quiz_arcade::board::{Board, Cell, Pos};
///
/// let mut board = Board::new(3, 3);
/// board.set(Pos::new(1, 1), Cell::Player).unwrap();
/// assert_eq!(board.get(Pos::new(1, 1)), Some(Cell::Player));
/// assert!(board.set(Pos::new(1, 1), Cell::Opponent).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl Board {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols, cells: vec![Cell::Empty; rows * cols] }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn contains(&self, pos: Pos) -> bool {
        pos.row < self.rows && pos.col < self.cols
    }

    fn index(&self, pos: Pos) -> Result<usize, BoardError> {
        if !self.contains(pos) {
            return Err(BoardError::OutOfBounds { pos, rows: self.rows, cols: self.cols });
        }
        Ok(pos.row * self.cols + pos.col)
    }

    /// Returns the cell at `pos`, or `None` when out of bounds.
    pub fn get(&self, pos: Pos) -> Option<Cell> {
        self.index(pos).ok().map(|i| self.cells[i])
    }

    /// Writes a non-empty cell into an empty position.
    pub fn set(&mut self, pos: Pos, cell: Cell) -> Result<(), BoardError> {
        let i = self.index(pos)?;
        if !self.cells[i].is_empty() {
            return Err(BoardError::Occupied(pos));
        }
        self.cells[i] = cell;
        Ok(())
    }

    /// Reverts a placement. Only the incorrect-answer and question-unavailable
    /// rollback paths call this.
    pub(crate) fn undo(&mut self, pos: Pos) -> Result<Cell, BoardError> {
        let i = self.index(pos)?;
        Ok(std::mem::take(&mut self.cells[i]))
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|c| !c.is_empty())
    }

    pub fn occupied(&self) -> usize {
        self.cells.iter().filter(|c| !c.is_empty()).count()
    }

    /// Empty positions in row-major order.
    pub fn empty_cells(&self) -> Vec<Pos> {
        self.iter().filter(|(_, c)| c.is_empty()).map(|(p, _)| p).collect()
    }

    /// Lowest empty row in `col`, which is where gravity lands a drop.
    pub fn lowest_empty_in(&self, col: usize) -> Option<usize> {
        if col >= self.cols {
            return None;
        }
        (0..self.rows).rev().find(|&row| self.cells[row * self.cols + col].is_empty())
    }

    pub fn is_column_full(&self, col: usize) -> bool {
        self.lowest_empty_in(col).is_none()
    }

    /// Iterates cells in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Pos, Cell)> + '_ {
        let cols = self.cols;
        self.cells.iter().enumerate().map(move |(i, &c)| (Pos::new(i / cols, i % cols), c))
    }

    /// Cells of one row, or `None` past the last row.
    pub fn row(&self, row: usize) -> Option<&[Cell]> {
        if row >= self.rows {
            return None;
        }
        let start = row * self.cols;
        self.cells.get(start..start + self.cols)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.rows {
            let cells = self.row(row).unwrap_or_default();
            let line: String = cells.iter().map(|c| c.symbol()).collect();
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}
