//! Aggregate roots - domain objects that own their related data
//!
//! The character is rebuilt from scratch on every edit, so its derived
//! block can never drift from the state it was computed from.

pub mod character;

pub use character::{AbilityScores, Character, CreateCharacterOptions};
