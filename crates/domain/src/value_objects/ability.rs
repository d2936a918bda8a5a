//! Ability scores and the append-only adjustment log.
//!
//! Provides type safety for ability references instead of magic strings like "STR", "DEX".

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;

/// One of the six character abilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AbilityId {
    /// Strength - physical power
    Str,
    /// Dexterity - agility and reflexes
    Dex,
    /// Constitution - endurance and health
    Con,
    /// Intelligence - reasoning and memory
    Int,
    /// Wisdom - perception and insight
    Wis,
    /// Charisma - force of personality
    Cha,
}

impl AbilityId {
    /// All six abilities in sheet order.
    pub const ALL: [AbilityId; 6] = [
        Self::Str,
        Self::Dex,
        Self::Con,
        Self::Int,
        Self::Wis,
        Self::Cha,
    ];

    /// Returns the short uppercase string representation (e.g., "STR", "DEX").
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Str => "STR",
            Self::Dex => "DEX",
            Self::Con => "CON",
            Self::Int => "INT",
            Self::Wis => "WIS",
            Self::Cha => "CHA",
        }
    }

    /// Returns the full name of the ability (e.g., "Strength").
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Str => "Strength",
            Self::Dex => "Dexterity",
            Self::Con => "Constitution",
            Self::Int => "Intelligence",
            Self::Wis => "Wisdom",
            Self::Cha => "Charisma",
        }
    }
}

impl fmt::Display for AbilityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Parses the exact short ids used in content ("STR".."CHA").
///
/// Choice selections arrive as raw strings, so this is strict: lowercase or
/// long-form names are rejected.
impl FromStr for AbilityId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "STR" => Ok(Self::Str),
            "DEX" => Ok(Self::Dex),
            "CON" => Ok(Self::Con),
            "INT" => Ok(Self::Int),
            "WIS" => Ok(Self::Wis),
            "CHA" => Ok(Self::Cha),
            _ => Err(DomainError::parse(format!("Unknown ability id: {}", s))),
        }
    }
}

/// `floor((score - 10) / 2)`. No bounds checking.
pub fn ability_modifier(score: i32) -> i32 {
    (score - 10).div_euclid(2)
}

/// The six ability scores. All six are always present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub struct AbilityScoreBlock {
    pub str: i32,
    pub dex: i32,
    pub con: i32,
    pub int: i32,
    pub wis: i32,
    pub cha: i32,
}

impl AbilityScoreBlock {
    /// Every ability at the same score.
    pub fn uniform(score: i32) -> Self {
        Self {
            str: score,
            dex: score,
            con: score,
            int: score,
            wis: score,
            cha: score,
        }
    }

    pub fn get(&self, ability: AbilityId) -> i32 {
        match ability {
            AbilityId::Str => self.str,
            AbilityId::Dex => self.dex,
            AbilityId::Con => self.con,
            AbilityId::Int => self.int,
            AbilityId::Wis => self.wis,
            AbilityId::Cha => self.cha,
        }
    }

    pub fn get_mut(&mut self, ability: AbilityId) -> &mut i32 {
        match ability {
            AbilityId::Str => &mut self.str,
            AbilityId::Dex => &mut self.dex,
            AbilityId::Con => &mut self.con,
            AbilityId::Int => &mut self.int,
            AbilityId::Wis => &mut self.wis,
            AbilityId::Cha => &mut self.cha,
        }
    }

    /// Modifier for a single ability.
    pub fn modifier(&self, ability: AbilityId) -> i32 {
        ability_modifier(self.get(ability))
    }
}

impl Default for AbilityScoreBlock {
    fn default() -> Self {
        Self::uniform(10)
    }
}

/// Whether an adjustment raises or lowers its abilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdjustmentKind {
    Boost,
    Flaw,
}

/// One entry of the character's ability-adjustment log.
///
/// Entries are never mutated or removed once logged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbilityAdjustment {
    #[serde(rename = "type")]
    pub kind: AdjustmentKind,
    pub abilities: Vec<AbilityId>,
    pub value: i32,
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<u8>,
}

impl AbilityAdjustment {
    pub fn boost(abilities: Vec<AbilityId>, value: i32, source: impl Into<String>) -> Self {
        Self {
            kind: AdjustmentKind::Boost,
            abilities,
            value,
            source: source.into(),
            level: None,
        }
    }

    pub fn flaw(abilities: Vec<AbilityId>, value: i32, source: impl Into<String>) -> Self {
        Self {
            kind: AdjustmentKind::Flaw,
            abilities,
            value,
            source: source.into(),
            level: None,
        }
    }

    pub fn at_level(self, level: u8) -> Self {
        Self {
            level: Some(level),
            ..self
        }
    }

    /// Signed change this entry applies to each of its abilities.
    pub fn signed_delta(&self) -> i32 {
        let magnitude = self.value.abs();
        match self.kind {
            AdjustmentKind::Boost => magnitude,
            AdjustmentKind::Flaw => -magnitude,
        }
    }
}

/// Folds the adjustment log over a base block.
///
/// Stacking is plain addition with no caps; each entry adds its delta once
/// per listed ability.
pub fn apply_ability_adjustments(
    base: &AbilityScoreBlock,
    adjustments: &[AbilityAdjustment],
) -> AbilityScoreBlock {
    let mut result = *base;
    for adjustment in adjustments {
        let delta = adjustment.signed_delta();
        for ability in &adjustment.abilities {
            *result.get_mut(*ability) += delta;
        }
    }
    result
}
