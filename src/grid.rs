//! Fixed-size crafting grid and cell positions

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Error when constructing a grid.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum GridError {
    /// Width or height was zero
    #[error("Grid dimensions must be positive, got {width}x{height}")]
    ZeroDimension { width: u32, height: u32 },
}

/// A cell coordinate. `x` grows to the right, `y` grows upwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: u32,
    pub y: u32,
}

impl Position {
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Shift by `(dx, dy)`, returning `None` if either coordinate would go negative
    /// or overflow.
    pub fn offset(self, dx: i64, dy: i64) -> Option<Self> {
        let x = u32::try_from(i64::from(self.x) + dx).ok()?;
        let y = u32::try_from(i64::from(self.y) + dy).ok()?;
        Some(Self { x, y })
    }
}

impl From<(u32, u32)> for Position {
    fn from((x, y): (u32, u32)) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A `width` x `height` coordinate space.
///
/// The grid holds no cells itself; it only answers whether a position is in bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Grid {
    width: u32,
    height: u32,
}

impl Grid {
    /// The classic 3x3 crafting table.
    pub const CRAFTING_TABLE: Grid = Grid { width: 3, height: 3 };

    /// Create a grid, rejecting zero-sized dimensions.
    pub fn new(width: u32, height: u32) -> Result<Self, GridError> {
        if width == 0 || height == 0 {
            return Err(GridError::ZeroDimension { width, height });
        }
        Ok(Self { width, height })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of cells in the grid.
    pub fn area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    /// True iff `0 <= x < width` and `0 <= y < height`.
    pub fn contains(&self, position: Position) -> bool {
        position.x < self.width && position.y < self.height
    }

    /// Iterate every position, top row first, left to right.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.height)
            .rev()
            .flat_map(move |y| (0..self.width).map(move |x| Position { x, y }))
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::CRAFTING_TABLE
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_corners() {
        let grid = Grid::new(3, 3).unwrap();
        assert!(grid.contains(Position::new(0, 0)));
        assert!(grid.contains(Position::new(2, 2)));
        assert!(!grid.contains(Position::new(3, 0)));
        assert!(!grid.contains(Position::new(0, 3)));
    }

    #[test]
    fn test_non_square_grid() {
        let grid = Grid::new(4, 2).unwrap();
        assert!(grid.contains(Position::new(3, 1)));
        assert!(!grid.contains(Position::new(1, 2)));
        assert_eq!(grid.area(), 8);
    }

    #[test]
    fn test_zero_dimension_rejected() {
        assert_eq!(Grid::new(0, 3), Err(GridError::ZeroDimension { width: 0, height: 3 }));
        assert!(Grid::new(3, 0).is_err());
    }

    #[test]
    fn test_positions_top_row_first() {
        let grid = Grid::new(2, 2).unwrap();
        let positions: Vec<_> = grid.positions().collect();
        assert_eq!(
            positions,
            vec![
                Position::new(0, 1),
                Position::new(1, 1),
                Position::new(0, 0),
                Position::new(1, 0),
            ]
        );
    }

    #[test]
    fn test_offset() {
        let p = Position::new(1, 1);
        assert_eq!(p.offset(1, -1), Some(Position::new(2, 0)));
        assert_eq!(p.offset(-2, 0), None);
    }

    #[test]
    fn test_default_is_crafting_table() {
        assert_eq!(Grid::default().to_string(), "3x3");
    }
}
