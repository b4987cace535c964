//! Character identifiers and the read-only attribute snapshot contract.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CharacterId(pub Uuid);

impl CharacterId {
    /// Create a new random character ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a character ID from a specific UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Create a nil/empty character ID (useful for defaults).
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }
}

impl Default for CharacterId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for CharacterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Read-only view of a character's current attributes, supplied by the
/// external character service. The engine never stores or mutates these.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AttributeSnapshot {
    pub might: f32,
    pub intellect: f32,
    pub will: f32,
    pub shadow: f32,
    pub level: u32,
    /// Corruption from 0.0 to 1.0.
    pub corruption: f32,
}

impl AttributeSnapshot {
    /// Create a snapshot with the four core attributes; level 1, no corruption.
    pub fn new(might: f32, intellect: f32, will: f32, shadow: f32) -> Self {
        Self {
            might,
            intellect,
            will,
            shadow,
            level: 1,
            corruption: 0.0,
        }
    }

    /// Set the character level.
    pub fn with_level(mut self, level: u32) -> Self {
        self.level = level;
        self
    }

    /// Set the corruption value (clamped to 0.0 - 1.0).
    pub fn with_corruption(mut self, corruption: f32) -> Self {
        self.corruption = corruption.clamp(0.0, 1.0);
        self
    }

    /// Sum of the four core attributes.
    pub fn total(&self) -> f32 {
        self.might + self.intellect + self.will + self.shadow
    }
}

impl Default for AttributeSnapshot {
    fn default() -> Self {
        Self::new(10.0, 10.0, 10.0, 10.0)
    }
}

/// Flag value types for narrative flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FlagValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl FlagValue {
    /// Interpret the flag as a boolean. Numeric flags are truthy when
    /// non-zero; text flags when non-empty.
    pub fn is_truthy(&self) -> bool {
        match self {
            FlagValue::Bool(b) => *b,
            FlagValue::Int(i) => *i != 0,
            FlagValue::Float(f) => *f != 0.0,
            FlagValue::Text(s) => !s.is_empty(),
        }
    }
}

/// Boundary trait for the external character service. The engine reads
/// attribute snapshots through this and nothing else.
pub trait CharacterService: Send + Sync {
    /// Fetch the current attribute snapshot for a character, if it exists.
    fn snapshot(&self, id: CharacterId) -> Option<AttributeSnapshot>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_builder() {
        let snap = AttributeSnapshot::new(15.0, 5.0, 5.0, 5.0)
            .with_level(7)
            .with_corruption(0.4);

        assert_eq!(snap.level, 7);
        assert!((snap.corruption - 0.4).abs() < 0.001);
        assert!((snap.total() - 30.0).abs() < 0.001);
    }

    #[test]
    fn test_corruption_clamped() {
        let snap = AttributeSnapshot::default().with_corruption(2.5);
        assert_eq!(snap.corruption, 1.0);

        let snap = AttributeSnapshot::default().with_corruption(-1.0);
        assert_eq!(snap.corruption, 0.0);
    }

    #[test]
    fn test_flag_truthiness() {
        assert!(FlagValue::Bool(true).is_truthy());
        assert!(!FlagValue::Bool(false).is_truthy());
        assert!(FlagValue::Int(3).is_truthy());
        assert!(!FlagValue::Int(0).is_truthy());
        assert!(FlagValue::Text("set".into()).is_truthy());
        assert!(!FlagValue::Text(String::new()).is_truthy());
    }
}
