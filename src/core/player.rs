//! Player identification.
//!
//! Players are opaque to the rules: the engine only needs to know which
//! player controls which animal, and compares ids to authorize commands.

use serde::{Deserialize, Serialize};

/// Player identifier.
///
/// Ordering is by raw id; random animal assignment hands out animals in
/// this order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(pub u8);

impl PlayerId {
    /// Create a new player ID.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Get the raw player index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Iterate over `count` player IDs starting at 0.
    ///
    /// ```
    /// use dominant_species::core::PlayerId;
    ///
    /// let players: Vec<_> = PlayerId::all(4).collect();
    /// assert_eq!(players.len(), 4);
    /// assert_eq!(players[3], PlayerId::new(3));
    /// ```
    pub fn all(count: usize) -> impl Iterator<Item = PlayerId> {
        (0..count.min(u8::MAX as usize) as u8).map(PlayerId)
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_id_order() {
        let mut players = vec![PlayerId::new(3), PlayerId::new(0), PlayerId::new(2)];
        players.sort();
        assert_eq!(players, vec![PlayerId::new(0), PlayerId::new(2), PlayerId::new(3)]);
    }

    #[test]
    fn test_display() {
        assert_eq!(PlayerId::new(5).to_string(), "Player 5");
    }
}
