use serde::{Deserialize, Serialize};
use std::fmt;

/// Exposure held during the interval after a decision.
///
/// The signed unit value is what multiplies the next price change, so
/// `Long` earns on a rise and `Short` earns on a fall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    Long,
    Short,
    #[default]
    Flat,
}

impl Position {
    /// Signed exposure: +1, -1 or 0
    pub fn exposure(self) -> f64 {
        match self {
            Position::Long => 1.0,
            Position::Short => -1.0,
            Position::Flat => 0.0,
        }
    }

    /// Magnitude of moving from `self` to `next` (0, 1 or 2)
    pub fn change_magnitude(self, next: Position) -> f64 {
        (self.exposure() - next.exposure()).abs()
    }

    pub fn is_flat(self) -> bool {
        self == Position::Flat
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Position::Long => write!(f, "Long"),
            Position::Short => write!(f, "Short"),
            Position::Flat => write!(f, "Flat"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exposure_values() {
        assert_eq!(Position::Long.exposure(), 1.0);
        assert_eq!(Position::Short.exposure(), -1.0);
        assert_eq!(Position::Flat.exposure(), 0.0);
    }

    #[test]
    fn test_default_is_flat() {
        assert_eq!(Position::default(), Position::Flat);
        assert!(Position::default().is_flat());
    }

    #[test]
    fn test_change_magnitude() {
        assert_eq!(Position::Long.change_magnitude(Position::Short), 2.0);
        assert_eq!(Position::Short.change_magnitude(Position::Long), 2.0);
        assert_eq!(Position::Flat.change_magnitude(Position::Long), 1.0);
        assert_eq!(Position::Short.change_magnitude(Position::Flat), 1.0);
        assert_eq!(Position::Long.change_magnitude(Position::Long), 0.0);
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&Position::Short).unwrap();
        assert_eq!(json, "\"short\"");
        let back: Position = serde_json::from_str("\"long\"").unwrap();
        assert_eq!(back, Position::Long);
    }
}
