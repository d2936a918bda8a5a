//! Proficiency ranks and the character's proficiency summary.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::ability::AbilityId;
use super::modifier::ModifierBreakdown;

/// Pathfinder-style proficiency ranks, ordered from worst to best.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ProficiencyRank {
    /// Not trained
    #[default]
    Untrained,
    /// Basic training (+2 + level)
    Trained,
    /// Advanced training (+4 + level)
    Expert,
    /// Mastery (+6 + level)
    Master,
    /// Ultimate mastery (+8 + level)
    Legendary,
}

impl ProficiencyRank {
    pub const ALL: [ProficiencyRank; 5] = [
        Self::Untrained,
        Self::Trained,
        Self::Expert,
        Self::Master,
        Self::Legendary,
    ];

    /// Position in the rank order, starting at 0 for untrained.
    pub fn ordinal(&self) -> u8 {
        match self {
            Self::Untrained => 0,
            Self::Trained => 1,
            Self::Expert => 2,
            Self::Master => 3,
            Self::Legendary => 4,
        }
    }

    /// Get the rank bonus (before adding level).
    pub fn rank_bonus(&self) -> i32 {
        match self {
            Self::Untrained => 0,
            Self::Trained => 2,
            Self::Expert => 4,
            Self::Master => 6,
            Self::Legendary => 8,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Untrained => "untrained",
            Self::Trained => "trained",
            Self::Expert => "expert",
            Self::Master => "master",
            Self::Legendary => "legendary",
        }
    }
}

impl fmt::Display for ProficiencyRank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Full proficiency bonus: rank bonus plus level for anything above untrained.
///
/// `level` is not range-checked here.
pub fn proficiency_bonus(level: u8, rank: ProficiencyRank) -> i32 {
    match rank {
        ProficiencyRank::Untrained => 0,
        _ => rank.rank_bonus() + i32::from(level),
    }
}

/// The higher of two ranks. Proficiency grants go through this so they never lower a rank.
pub fn max_rank(a: ProficiencyRank, b: ProficiencyRank) -> ProficiencyRank {
    if a.ordinal() >= b.ordinal() {
        a
    } else {
        b
    }
}

/// The three saving throws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaveKind {
    Fortitude,
    Reflex,
    Will,
}

impl SaveKind {
    pub const ALL: [SaveKind; 3] = [Self::Fortitude, Self::Reflex, Self::Will];

    /// Ability keyed to this save.
    pub fn ability(&self) -> AbilityId {
        match self {
            Self::Fortitude => AbilityId::Con,
            Self::Reflex => AbilityId::Dex,
            Self::Will => AbilityId::Wis,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fortitude => "fortitude",
            Self::Reflex => "reflex",
            Self::Will => "will",
        }
    }

    /// Matches the proficiency-update keys "fortitude", "reflex" and "will".
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "fortitude" => Some(Self::Fortitude),
            "reflex" => Some(Self::Reflex),
            "will" => Some(Self::Will),
            _ => None,
        }
    }
}

/// Save ranks, one per save.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveRanks {
    pub fortitude: ProficiencyRank,
    pub reflex: ProficiencyRank,
    pub will: ProficiencyRank,
}

impl SaveRanks {
    pub fn uniform(rank: ProficiencyRank) -> Self {
        Self {
            fortitude: rank,
            reflex: rank,
            will: rank,
        }
    }

    pub fn get(&self, save: SaveKind) -> ProficiencyRank {
        match save {
            SaveKind::Fortitude => self.fortitude,
            SaveKind::Reflex => self.reflex,
            SaveKind::Will => self.will,
        }
    }

    pub fn get_mut(&mut self, save: SaveKind) -> &mut ProficiencyRank {
        match save {
            SaveKind::Fortitude => &mut self.fortitude,
            SaveKind::Reflex => &mut self.reflex,
            SaveKind::Will => &mut self.will,
        }
    }
}

/// Every proficiency the character holds.
///
/// Keys missing from the open-ended maps count as untrained.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProficiencySummary {
    pub perception: ProficiencyRank,
    pub saves: SaveRanks,
    #[serde(default)]
    pub skills: BTreeMap<String, ProficiencyRank>,
    #[serde(default)]
    pub lores: BTreeMap<String, ProficiencyRank>,
    #[serde(default)]
    pub weapons: BTreeMap<String, ProficiencyRank>,
    #[serde(default)]
    pub armor: BTreeMap<String, ProficiencyRank>,
    #[serde(default)]
    pub spellcasting: BTreeMap<String, ProficiencyRank>,
    #[serde(rename = "classDC")]
    pub class_dc: ProficiencyRank,
    #[serde(default)]
    pub perception_modifiers: Vec<ModifierBreakdown>,
}

impl ProficiencySummary {
    pub fn skill_rank(&self, skill: &str) -> ProficiencyRank {
        self.skills.get(skill).copied().unwrap_or_default()
    }

    pub fn weapon_rank(&self, category: &str) -> ProficiencyRank {
        self.weapons.get(category).copied().unwrap_or_default()
    }

    pub fn armor_rank(&self, category: &str) -> ProficiencyRank {
        self.armor.get(category).copied().unwrap_or_default()
    }

    /// Ratchet a single update into the summary.
    ///
    /// Key routing: `perception`, `classDC`, the three save names, `weapon:` and
    /// `armor:` prefixes (prefix stripped), keys ending in "lore" in any case go
    /// to lores, everything else is a skill. The stored rank never goes down.
    pub fn ratchet(&mut self, key: &str, rank: ProficiencyRank) {
        if key == "perception" {
            self.perception = max_rank(self.perception, rank);
            return;
        }
        if key == "classDC" {
            self.class_dc = max_rank(self.class_dc, rank);
            return;
        }
        if let Some(save) = SaveKind::from_key(key) {
            let current = self.saves.get_mut(save);
            *current = max_rank(*current, rank);
            return;
        }

        let (map, entry_key) = if let Some(rest) = key.strip_prefix("weapon:") {
            (&mut self.weapons, rest)
        } else if let Some(rest) = key.strip_prefix("armor:") {
            (&mut self.armor, rest)
        } else if is_lore_key(key) {
            (&mut self.lores, key)
        } else {
            (&mut self.skills, key)
        };

        let current = map.entry(entry_key.to_string()).or_default();
        *current = max_rank(*current, rank);
    }
}

/// Keys ending in "lore" (case-insensitive) name lore skills.
pub fn is_lore_key(key: &str) -> bool {
    key.to_lowercase().ends_with("lore")
}
