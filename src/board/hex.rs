//! Axial hex coordinates and the fixed board outline.
//!
//! ## Coordinates
//!
//! A hex is `(q, r)` in axial coordinates; the implicit third cube
//! coordinate is `s = -q - r`. Two hexes are adjacent when their distance
//! is exactly 1.
//!
//! ## Board outline
//!
//! The board is seven columns wide (`q` in `-3..=3`). The middle column is
//! short (5 hexes), the others hold `7 - |q|` hexes, shifted so the layout
//! matches the printed board. Searches for vacant hexes and corners are
//! bounded by this outline.

use serde::{Deserialize, Serialize};

/// Axial offsets of the six neighbours.
const DIRECTIONS: [(i32, i32); 6] = [(1, 0), (1, -1), (0, -1), (-1, 0), (-1, 1), (0, 1)];

/// Board hex in axial coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Hex {
    pub q: i32,
    pub r: i32,
}

impl Hex {
    #[must_use]
    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    /// Third cube coordinate.
    #[must_use]
    pub const fn s(self) -> i32 {
        -self.q - self.r
    }

    /// Number of steps between two hexes.
    #[must_use]
    pub fn distance(self, other: Hex) -> u32 {
        let dq = (self.q - other.q).abs();
        let dr = (self.r - other.r).abs();
        let ds = (self.s() - other.s()).abs();
        ((dq + dr + ds) / 2) as u32
    }

    #[must_use]
    pub fn is_adjacent(self, other: Hex) -> bool {
        self.distance(other) == 1
    }

    /// The six surrounding hexes, whether or not they are on the board.
    #[must_use]
    pub fn neighbors(self) -> [Hex; 6] {
        DIRECTIONS.map(|(dq, dr)| Hex::new(self.q + dq, self.r + dr))
    }

    /// Whether the hex lies inside the board outline.
    #[must_use]
    pub fn is_on_board(self) -> bool {
        column_rows(self.q).is_some_and(|rows| rows.contains(&self.r))
    }
}

impl std::fmt::Display for Hex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{})", self.q, self.r)
    }
}

/// Row range of a board column, if the column exists.
fn column_rows(q: i32) -> Option<std::ops::RangeInclusive<i32>> {
    if !(-3..=3).contains(&q) {
        return None;
    }

    let size = if q == 0 { 5 } else { 7 - q.abs() };
    let first = match q {
        0 => -2,
        q if q < 0 => -(size - 3) + 1,
        _ => -3,
    };

    Some(first..=first + size - 1)
}

/// Every hex of the board outline, column by column.
pub fn board_hexes() -> impl Iterator<Item = Hex> {
    (-3..=3).flat_map(|q| {
        column_rows(q)
            .into_iter()
            .flatten()
            .map(move |r| Hex::new(q, r))
    })
}
