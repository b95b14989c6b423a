//! Board module - manages the playfield grid and the line-clear pipeline
//!
//! The board is a 10x22 grid: 20 visible rows plus 2 hidden buffer rows on
//! top. Uses a flat array for better cache locality and zero-allocation.
//! Coordinates: (x, y) where x ranges 0..9 (left to right), y ranges 0..21
//! (top to bottom). Rows 0 and 1 are the buffer.
//!
//! Full rows are not removed on the spot. Placing a piece marks them with a
//! dissolve countdown; [`Board::tick`] runs the countdown down and, once the
//! whole batch has expired, deletes the rows and reports a [`RowsRemoved`].

use arrayvec::ArrayVec;

use crate::piece::Cosmono;
use crate::rng::RandomSource;
use crate::types::{
    Cell, CellKind, TSpinKind, BOARD_HEIGHT, BOARD_WIDTH, BUFFER_ROWS, LINE_CLEAR_MS,
};

/// Total number of cells on the board
const BOARD_SIZE: usize = (BOARD_WIDTH as usize) * (BOARD_HEIGHT as usize);

/// Upper bound on rows waiting in one batch
const MAX_PENDING: usize = BOARD_HEIGHT as usize;

/// A row marked for removal and its remaining dissolve time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingRow {
    pub row: u8,
    pub remaining_ms: u32,
}

/// Result of a successful placement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlaceOutcome {
    /// Rows newly marked for removal by this placement
    pub rows_marked: u8,
    /// Set once when at least one row started dissolving
    pub dissolve_started: bool,
}

/// Emitted once per batch, after every marked row has been deleted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowsRemoved {
    pub count: u8,
    /// Classification of the lock that produced this batch
    pub t_spin: TSpinKind,
    /// Board was left completely empty
    pub perfect_clear: bool,
}

/// The playfield - 10 columns x 22 rows using flat array storage
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    /// Flat array of cells, row-major order (y * WIDTH + x)
    cells: [Cell; BOARD_SIZE],
    /// Rows waiting to be deleted, in marking order
    pending: ArrayVec<PendingRow, MAX_PENDING>,
    batch_t_spin: TSpinKind,
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Self {
            cells: [None; BOARD_SIZE],
            pending: ArrayVec::new(),
            batch_t_spin: TSpinKind::None,
        }
    }

    /// Calculate flat index from (x, y) coordinates
    #[inline(always)]
    fn index(x: i8, y: i8) -> Option<usize> {
        if x < 0 || x >= BOARD_WIDTH as i8 || y < 0 || y >= BOARD_HEIGHT as i8 {
            return None;
        }
        Some((y as usize) * (BOARD_WIDTH as usize) + (x as usize))
    }

    /// Get width of the board
    pub fn width(&self) -> u8 {
        BOARD_WIDTH
    }

    /// Get height of the board, buffer rows included
    pub fn height(&self) -> u8 {
        BOARD_HEIGHT
    }

    /// Get cell at position (x, y)
    /// Returns None if out of bounds
    pub fn get(&self, x: i8, y: i8) -> Option<Cell> {
        Self::index(x, y).map(|idx| self.cells[idx])
    }

    /// Set cell at position (x, y)
    /// Returns false if out of bounds
    pub fn set(&mut self, x: i8, y: i8, cell: Cell) -> bool {
        match Self::index(x, y) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Within bounds and empty. Placement checks treat anything else as
    /// invalid.
    pub fn is_free(&self, x: i8, y: i8) -> bool {
        matches!(self.get(x, y), Some(None))
    }

    /// Occupied or outside the board. Used by corner probes, where walls
    /// and the floor count as filled.
    pub fn is_blocked(&self, x: i8, y: i8) -> bool {
        !self.is_free(x, y)
    }

    /// Check if position is out of bounds
    pub fn is_out_of_bounds(&self, x: i8, y: i8) -> bool {
        Self::index(x, y).is_none()
    }

    /// All cells free and in bounds
    pub fn fits(&self, cells: &[(i8, i8)]) -> bool {
        cells.iter().all(|&(x, y)| self.is_free(x, y))
    }

    /// Check if a visible row is completely filled. Buffer rows never count.
    pub fn is_row_full(&self, y: usize) -> bool {
        if y < BUFFER_ROWS as usize || y >= BOARD_HEIGHT as usize {
            return false;
        }
        self.row(y).iter().all(|cell| cell.is_some())
    }

    fn row(&self, y: usize) -> &[Cell] {
        let start = y * BOARD_WIDTH as usize;
        &self.cells[start..start + BOARD_WIDTH as usize]
    }

    /// Integrate a piece into the grid.
    ///
    /// Rejects ghosts and any placement with a part out of bounds or on an
    /// occupied cell; nothing is mutated in that case. Every full row the
    /// piece touches joins the pending batch with a fresh countdown.
    pub fn place_piece(&mut self, piece: &Cosmono) -> Option<PlaceOutcome> {
        if piece.is_ghost {
            return None;
        }

        let cells = piece.cells();
        if !self.fits(&cells) {
            return None;
        }

        let fill = Some(CellKind::Piece(piece.kind()));
        let mut touched: ArrayVec<i8, 4> = ArrayVec::new();
        for &(x, y) in &cells {
            self.set(x, y, fill);
            if !touched.contains(&y) {
                touched.push(y);
            }
        }

        let mut outcome = PlaceOutcome::default();
        for y in touched {
            let row = y as u8;
            if !self.is_row_full(row as usize) || self.pending.iter().any(|p| p.row == row) {
                continue;
            }
            if self
                .pending
                .try_push(PendingRow {
                    row,
                    remaining_ms: LINE_CLEAR_MS,
                })
                .is_ok()
            {
                outcome.rows_marked += 1;
            }
        }
        outcome.dissolve_started = outcome.rows_marked > 0;

        Some(outcome)
    }

    /// True while a batch of rows is dissolving
    pub fn is_clearing(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Rows currently dissolving, for the renderer
    pub fn pending_rows(&self) -> &[PendingRow] {
        &self.pending
    }

    /// Attach the lock's T-spin classification to the pending batch
    pub fn set_batch_t_spin(&mut self, t_spin: TSpinKind) {
        if self.is_clearing() {
            self.batch_t_spin = t_spin;
        }
    }

    /// Drop the pending batch without deleting anything
    pub fn discard_pending(&mut self) {
        self.pending.clear();
        self.batch_t_spin = TSpinKind::None;
    }

    /// Advance every row countdown. Once all of them have expired the batch
    /// is deleted and reported.
    pub fn tick(&mut self, elapsed_ms: u32) -> Option<RowsRemoved> {
        if self.pending.is_empty() {
            return None;
        }

        for p in &mut self.pending {
            p.remaining_ms = p.remaining_ms.saturating_sub(elapsed_ms);
        }

        if self.pending.iter().all(|p| p.remaining_ms == 0) {
            Some(self.complete_batch())
        } else {
            None
        }
    }

    /// Delete the pending batch now, whatever its countdowns say
    pub fn flush_pending(&mut self) -> Option<RowsRemoved> {
        if self.pending.is_empty() {
            None
        } else {
            Some(self.complete_batch())
        }
    }

    fn complete_batch(&mut self) -> RowsRemoved {
        let mut rows: ArrayVec<u8, MAX_PENDING> = self.pending.iter().map(|p| p.row).collect();
        rows.sort_unstable_by(|a, b| b.cmp(a));

        // Each deletion pulls the rows above it down by one, so the k-th
        // target (descending) has moved down by k.
        for (rank, &row) in rows.iter().enumerate() {
            self.delete_row(row as usize + rank);
        }

        let removed = RowsRemoved {
            count: rows.len() as u8,
            t_spin: self.batch_t_spin,
            perfect_clear: self.is_empty(),
        };
        self.discard_pending();
        removed
    }

    /// Delete a row and shift all rows above down, leaving row 0 empty.
    /// Returns false (and does nothing) when `y` is out of range.
    pub fn delete_row(&mut self, y: usize) -> bool {
        if y >= BOARD_HEIGHT as usize {
            return false;
        }

        let width = BOARD_WIDTH as usize;

        // copy_within handles overlapping ranges safely
        for row in (1..=y).rev() {
            let src_start = (row - 1) * width;
            let dst_start = row * width;
            self.cells
                .copy_within(src_start..src_start + width, dst_start);
        }

        for cell in &mut self.cells[0..width] {
            *cell = None;
        }

        true
    }

    /// Push everything up by `rows` (the top `rows` rows fall off) and fill
    /// the bottom `rows` rows with garbage, each with one random hole.
    ///
    /// No-op while a batch is dissolving, since marked row indices would go
    /// stale. Returns whether anything was injected.
    pub fn garbage(&mut self, rows: usize, rng: &mut dyn RandomSource) -> bool {
        let height = BOARD_HEIGHT as usize;
        let width = BOARD_WIDTH as usize;
        if rows == 0 || rows > height || self.is_clearing() {
            return false;
        }

        self.cells.copy_within(rows * width.., 0);

        for y in (height - rows)..height {
            let hole = rng.next_int(0, width as i32) as usize;
            for x in 0..width {
                self.cells[y * width + x] = if x == hole {
                    None
                } else {
                    Some(CellKind::Garbage)
                };
            }
        }

        true
    }

    /// Number of occupied cells
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// No occupied cells at all
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|c| c.is_none())
    }

    /// Lowest row holding anything, if any
    pub fn lowest_occupied_row(&self) -> Option<usize> {
        (0..BOARD_HEIGHT as usize)
            .rev()
            .find(|&y| self.row(y).iter().any(|c| c.is_some()))
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Write a compact numeric view (0 empty, see [`CellKind::code`]).
    pub fn write_u8_grid(&self, out: &mut [[u8; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize]) {
        let width = BOARD_WIDTH as usize;
        for (y, row) in out.iter_mut().enumerate() {
            for (x, slot) in row.iter_mut().enumerate() {
                *slot = self.cells[y * width + x].map_or(0, |c| c.code());
            }
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
