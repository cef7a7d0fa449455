use std::fmt;

/// Contents of a board cell, doubling as the turn marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Player {
    #[default]
    Empty,
    PlayerOne,
    PlayerTwo,
}

impl Player {
    /// Get the other player.
    ///
    /// `Empty` maps to itself; it never holds the turn during play, so
    /// calling this on it is a caller error.
    pub fn other(self) -> Player {
        match self {
            Player::PlayerOne => Player::PlayerTwo,
            Player::PlayerTwo => Player::PlayerOne,
            Player::Empty => Player::Empty,
        }
    }

    /// Digit used in state keys.
    pub fn code(self) -> char {
        match self {
            Player::Empty => '0',
            Player::PlayerOne => '1',
            Player::PlayerTwo => '2',
        }
    }

    /// Get player name for display
    pub fn name(self) -> &'static str {
        match self {
            Player::Empty => "Empty",
            Player::PlayerOne => "Player 1",
            Player::PlayerTwo => "Player 2",
        }
    }

    pub fn is_empty(self) -> bool {
        self == Player::Empty
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_other_player() {
        assert_eq!(Player::PlayerOne.other(), Player::PlayerTwo);
        assert_eq!(Player::PlayerTwo.other(), Player::PlayerOne);
        assert_eq!(Player::Empty.other(), Player::Empty);
    }

    #[test]
    fn test_player_name() {
        assert_eq!(Player::PlayerOne.name(), "Player 1");
        assert_eq!(Player::PlayerTwo.to_string(), "Player 2");
        assert_eq!(Player::Empty.name(), "Empty");
    }

    #[test]
    fn test_codes_are_distinct() {
        let codes = [
            Player::Empty.code(),
            Player::PlayerOne.code(),
            Player::PlayerTwo.code(),
        ];
        assert_ne!(codes[0], codes[1]);
        assert_ne!(codes[1], codes[2]);
        assert_ne!(codes[0], codes[2]);
    }
}
