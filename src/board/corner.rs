//! Corners: the points where three hexes meet.
//!
//! Elements sit on corners. A corner is an unordered triple of pairwise
//! adjacent hexes; the triple is stored sorted so that equality, ordering
//! and hashing do not depend on the order the hexes were given in.

use serde::{Deserialize, Serialize};

use super::hex::Hex;
use crate::core::{DominantSpeciesError, Result};

/// Meeting point of three mutually adjacent hexes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "[Hex; 3]", into = "[Hex; 3]")]
pub struct Corner {
    hexes: [Hex; 3],
}

impl Corner {
    /// Build a corner, failing with `InvalidCorner` unless the three hexes
    /// are distinct and pairwise adjacent.
    pub fn new(a: Hex, b: Hex, c: Hex) -> Result<Self> {
        if !(a.is_adjacent(b) && b.is_adjacent(c) && a.is_adjacent(c)) {
            return Err(DominantSpeciesError::InvalidCorner);
        }

        let mut hexes = [a, b, c];
        hexes.sort_unstable();
        Ok(Self { hexes })
    }

    #[must_use]
    pub fn hexes(&self) -> [Hex; 3] {
        self.hexes
    }

    /// Whether `hex` is one of the three hexes of this corner.
    #[must_use]
    pub fn is_adjacent(&self, hex: Hex) -> bool {
        self.hexes.contains(&hex)
    }

    /// Whether all three hexes lie inside the board outline.
    #[must_use]
    pub fn is_on_board(&self) -> bool {
        self.hexes.iter().all(|h| h.is_on_board())
    }

    /// The six corners around a hex.
    #[must_use]
    pub fn around(hex: Hex) -> Vec<Corner> {
        let n = hex.neighbors();
        (0..6)
            .filter_map(|i| Corner::new(hex, n[i], n[(i + 1) % 6]).ok())
            .collect()
    }
}

impl TryFrom<[Hex; 3]> for Corner {
    type Error = DominantSpeciesError;

    fn try_from(hexes: [Hex; 3]) -> Result<Self> {
        Corner::new(hexes[0], hexes[1], hexes[2])
    }
}

impl From<Corner> for [Hex; 3] {
    fn from(corner: Corner) -> Self {
        corner.hexes
    }
}

impl std::fmt::Display for Corner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let [a, b, c] = self.hexes;
        write!(f, "{a}/{b}/{c}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_independent() {
        let a = Hex::new(-1, 0);
        let b = Hex::new(0, -1);
        let c = Hex::new(0, 0);

        let x = Corner::new(a, b, c).unwrap();
        let y = Corner::new(c, a, b).unwrap();
        assert_eq!(x, y);
        assert!(x.is_adjacent(a));
        assert!(!x.is_adjacent(Hex::new(1, 0)));
    }

    #[test]
    fn test_invalid_corner() {
        let sea = Hex::new(0, 0);
        assert_eq!(
            Corner::new(sea, Hex::new(1, 0), Hex::new(-1, 0)),
            Err(DominantSpeciesError::InvalidCorner)
        );
        assert_eq!(Corner::new(sea, sea, Hex::new(1, 0)), Err(DominantSpeciesError::InvalidCorner));
    }

    #[test]
    fn test_corners_around_hex() {
        let sea = Hex::new(0, 0);
        let corners = Corner::around(sea);
        assert_eq!(corners.len(), 6);
        assert!(corners.iter().all(|c| c.is_adjacent(sea)));
    }

    #[test]
    fn test_serde_validates() {
        let corner = Corner::new(Hex::new(0, 1), Hex::new(1, 0), Hex::new(1, 1)).unwrap();
        let json = serde_json::to_string(&corner).unwrap();
        let back: Corner = serde_json::from_str(&json).unwrap();
        assert_eq!(corner, back);

        let bad = r#"[{"q":0,"r":0},{"q":3,"r":0},{"q":0,"r":1}]"#;
        assert!(serde_json::from_str::<Corner>(bad).is_err());
    }
}
