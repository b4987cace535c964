//! # Game Model
//!
//! Shared data contracts for the Questweave engine. This crate defines the
//! vocabulary both sides of the boundary speak: character identifiers and
//! attribute snapshots, narrative themes, play-style archetypes, and quest
//! trigger events. It contains no generation or lifecycle logic.

pub mod archetype;
pub mod character;
pub mod theme;
pub mod trigger;

pub use archetype::*;
pub use character::*;
pub use theme::*;
pub use trigger::*;
