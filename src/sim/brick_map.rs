//! Brick map generation
//!
//! A brick map is a row-major occupancy grid covering the top half of the
//! playfield. Procedural maps place `floor(cols * rows * difficulty / 10)`
//! bricks at distinct uniformly random cells; fixed maps are parsed from text.

use std::collections::HashSet;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::{MAX_DIFFICULTY, MIN_DIFFICULTY};
use crate::error::SimError;

/// Contents of one grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Empty,
    Static,
    Moving,
}

impl Cell {
    /// Layout digit: 0 = empty, 1 = static, 2 = moving
    pub fn from_digit(c: char) -> Option<Self> {
        match c {
            '0' | '.' => Some(Cell::Empty),
            '1' => Some(Cell::Static),
            '2' => Some(Cell::Moving),
            _ => None,
        }
    }

    pub fn as_digit(&self) -> char {
        match self {
            Cell::Empty => '0',
            Cell::Static => '1',
            Cell::Moving => '2',
        }
    }
}

/// Number of bricks a procedural map holds at `difficulty`
pub fn target_brick_count(cols: usize, rows: usize, difficulty: f32) -> usize {
    let difficulty = difficulty.clamp(MIN_DIFFICULTY, MAX_DIFFICULTY);
    let total = ((cols * rows) as f32 * difficulty / 10.0).floor() as usize;
    total.min(cols * rows)
}

/// Occupancy grid (row-major)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrickMap {
    cols: usize,
    rows: usize,
    cells: Vec<Cell>,
}

impl BrickMap {
    pub fn empty(cols: usize, rows: usize) -> Self {
        Self {
            cols,
            rows,
            cells: vec![Cell::Empty; cols * rows],
        }
    }

    /// Generate a random map
    ///
    /// `moving_chance` is the per-cell probability of a placed brick becoming a
    /// moving brick; at most one moving brick is placed per row. Pass 0 for an
    /// all-static map.
    pub fn generate(
        cols: usize,
        rows: usize,
        difficulty: f32,
        moving_chance: f64,
        rng: &mut impl Rng,
    ) -> Self {
        let mut map = Self::empty(cols, rows);
        let total = target_brick_count(cols, rows, difficulty);

        // Reject-and-resample until `total` distinct cells are chosen
        let mut chosen = HashSet::with_capacity(total);
        let mut order = Vec::with_capacity(total);
        while order.len() < total {
            let x = rng.random_range(0..cols);
            let y = rng.random_range(0..rows);
            if chosen.insert((x, y)) {
                order.push((x, y));
            }
        }

        let moving_chance = moving_chance.clamp(0.0, 1.0);
        let mut row_has_moving = vec![false; rows];
        for (x, y) in order {
            let cell = if !row_has_moving[y] && moving_chance > 0.0 && rng.random_bool(moving_chance)
            {
                row_has_moving[y] = true;
                Cell::Moving
            } else {
                Cell::Static
            };
            map.set(x, y, cell);
        }

        map
    }

    /// Parse a fixed layout: one line per row, one digit per column
    ///
    /// Blank lines are skipped. All rows must have the same width.
    pub fn parse(text: &str) -> Result<Self, SimError> {
        let mut cols = None;
        let mut cells = Vec::new();
        let mut rows = 0;

        for (i, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let row: Vec<Cell> = line
                .chars()
                .map(|c| {
                    Cell::from_digit(c).ok_or_else(|| SimError::InvalidLayout {
                        line: i + 1,
                        reason: format!("unexpected character '{}'", c),
                    })
                })
                .collect::<Result<_, _>>()?;

            match cols {
                None => cols = Some(row.len()),
                Some(expected) if expected != row.len() => {
                    return Err(SimError::InvalidLayout {
                        line: i + 1,
                        reason: format!("expected {} columns, found {}", expected, row.len()),
                    });
                }
                Some(_) => {}
            }
            cells.extend(row);
            rows += 1;
        }

        let Some(cols) = cols else {
            return Err(SimError::InvalidLayout {
                line: 0,
                reason: "layout has no rows".to_string(),
            });
        };

        Ok(Self { cols, rows, cells })
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn get(&self, x: usize, y: usize) -> Cell {
        if x < self.cols && y < self.rows {
            self.cells[y * self.cols + x]
        } else {
            Cell::Empty
        }
    }

    pub fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if x < self.cols && y < self.rows {
            self.cells[y * self.cols + x] = cell;
        }
    }

    /// Occupied cells as (col, row, cell), row by row
    pub fn occupied(&self) -> impl Iterator<Item = (usize, usize, Cell)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| **cell != Cell::Empty)
            .map(|(i, cell)| (i % self.cols, i / self.cols, *cell))
    }

    pub fn brick_count(&self) -> usize {
        self.occupied().count()
    }

    /// Render back to layout text
    pub fn to_layout(&self) -> String {
        self.cells
            .chunks(self.cols.max(1))
            .map(|row| row.iter().map(Cell::as_digit).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }
}
