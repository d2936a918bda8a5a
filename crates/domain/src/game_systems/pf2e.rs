//! Pathfinder 2nd Edition derived statistics.
//!
//! PF2e proficiency is level-dependent: any rank above untrained adds the
//! character's level on top of the rank bonus. Everything here is a pure
//! function of level, final ability scores, proficiencies and the
//! per-selection [`DerivedContext`].
//!
//! Modifier breakdowns are summed as-is. Typed bonus stacking (only the
//! highest circumstance bonus applies, and so on) is not modelled.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::entities::ContentEntity;
use crate::value_objects::{
    ability_modifier, is_lore_key, proficiency_bonus, sum_modifiers, AbilityId, AbilityScoreBlock,
    ModifierBreakdown, ProficiencyRank, ProficiencySummary, SaveKind, SpeedType,
};

/// Default ancestry hit points when the caller supplies no context.
pub const DEFAULT_ANCESTRY_HIT_POINTS: i32 = 8;
/// Default class hit points per level.
pub const DEFAULT_CLASS_HIT_POINTS: i32 = 10;
/// Default base land speed in feet.
pub const DEFAULT_BASE_SPEED: i32 = 25;

/// Armor categories a character can have equipped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArmorCategory {
    #[default]
    Unarmored,
    Light,
    Medium,
    Heavy,
}

impl ArmorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unarmored => "unarmored",
            Self::Light => "light",
            Self::Medium => "medium",
            Self::Heavy => "heavy",
        }
    }
}

/// Flat modifier breakdowns per statistic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedModifiers {
    #[serde(default)]
    pub armor_class: Vec<ModifierBreakdown>,
    #[serde(default, rename = "classDC")]
    pub class_dc: Vec<ModifierBreakdown>,
    #[serde(default)]
    pub perception: Vec<ModifierBreakdown>,
    #[serde(default)]
    pub saves: BTreeMap<SaveKind, Vec<ModifierBreakdown>>,
    #[serde(default)]
    pub skills: BTreeMap<String, Vec<ModifierBreakdown>>,
}

impl DerivedModifiers {
    fn save(&self, save: SaveKind) -> Vec<ModifierBreakdown> {
        self.saves.get(&save).cloned().unwrap_or_default()
    }

    fn skill(&self, skill: &str) -> Vec<ModifierBreakdown> {
        self.skills.get(skill).cloned().unwrap_or_default()
    }
}

/// Inputs to derivation that are not stored on the character.
///
/// Supplied fresh by the caller at each selection step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedContext {
    pub ancestry_hit_points: i32,
    pub class_hit_points: i32,
    pub key_ability: AbilityId,
    pub base_speed: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_hit_points: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temporary_hit_points: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equipped_armor_category: Option<ArmorCategory>,
    #[serde(default)]
    pub modifiers: DerivedModifiers,
    /// Per-type speed overrides. A land entry replaces `base_speed`.
    #[serde(default)]
    pub speeds: BTreeMap<SpeedType, i32>,
}

impl Default for DerivedContext {
    fn default() -> Self {
        Self {
            ancestry_hit_points: DEFAULT_ANCESTRY_HIT_POINTS,
            class_hit_points: DEFAULT_CLASS_HIT_POINTS,
            key_ability: AbilityId::Str,
            base_speed: DEFAULT_BASE_SPEED,
            additional_hit_points: None,
            temporary_hit_points: None,
            equipped_armor_category: None,
            modifiers: DerivedModifiers::default(),
            speeds: BTreeMap::new(),
        }
    }
}

impl DerivedContext {
    /// Takes hit points, speed and key ability from the selected ancestry and
    /// class, falling back field by field. Entities of the wrong type are ignored.
    pub fn from_entities(
        ancestry: Option<&ContentEntity>,
        class: Option<&ContentEntity>,
        fallback: &DerivedContext,
    ) -> Self {
        let mut context = fallback.clone();
        if let Some(ancestry) = ancestry.and_then(ContentEntity::as_ancestry) {
            context.ancestry_hit_points = ancestry.hit_points;
            context.base_speed = ancestry.speed;
        }
        if let Some(class) = class.and_then(ContentEntity::as_class) {
            context.class_hit_points = class.hit_points_per_level;
            if let Some(key) = class.key_ability.first() {
                context.key_ability = *key;
            }
        }
        context
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HitPoints {
    pub max: i32,
    pub current: i32,
    #[serde(default)]
    pub temporary: i32,
}

/// A fixed value such as AC, a DC or a save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefenseStat {
    pub value: i32,
    #[serde(default)]
    pub breakdown: Vec<ModifierBreakdown>,
}

/// A rolled modifier together with the rank behind it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedStat {
    pub modifier: i32,
    pub rank: ProficiencyRank,
    #[serde(default)]
    pub breakdown: Vec<ModifierBreakdown>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveStats {
    pub fortitude: DefenseStat,
    pub reflex: DefenseStat,
    pub will: DefenseStat,
}

impl SaveStats {
    pub fn get(&self, save: SaveKind) -> &DefenseStat {
        match save {
            SaveKind::Fortitude => &self.fortitude,
            SaveKind::Reflex => &self.reflex,
            SaveKind::Will => &self.will,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttackProfile {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weapon_id: Option<String>,
    pub attack_bonus: i32,
    pub damage: String,
    #[serde(default)]
    pub traits: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resistance {
    #[serde(rename = "type")]
    pub damage_type: String,
    pub value: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Everything derived from the character's state.
///
/// Attacks, resistances, weaknesses and immunities are not populated yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedStats {
    pub hit_points: HitPoints,
    pub armor_class: DefenseStat,
    #[serde(default, rename = "classDC", skip_serializing_if = "Option::is_none")]
    pub class_dc: Option<DefenseStat>,
    pub perception: RankedStat,
    pub saves: SaveStats,
    pub skills: BTreeMap<String, RankedStat>,
    #[serde(default)]
    pub speeds: BTreeMap<SpeedType, i32>,
    #[serde(default)]
    pub attacks: Vec<AttackProfile>,
    #[serde(default)]
    pub resistances: Vec<Resistance>,
    #[serde(default)]
    pub weaknesses: Vec<Resistance>,
    #[serde(default)]
    pub immunities: Vec<String>,
}

/// Borrowed inputs for [`compute_derived_stats`].
#[derive(Debug, Clone, Copy)]
pub struct DerivedInput<'a> {
    pub level: u8,
    pub ability_scores: &'a AbilityScoreBlock,
    pub proficiencies: &'a ProficiencySummary,
    pub context: &'a DerivedContext,
}

/// Ability keyed to one of the sixteen standard skills.
///
/// Unknown names ending in "lore" use INT, anything else unknown uses STR.
pub fn skill_ability(skill: &str) -> AbilityId {
    match skill {
        "Acrobatics" | "Stealth" | "Thievery" => AbilityId::Dex,
        "Arcana" | "Crafting" | "Occultism" | "Society" => AbilityId::Int,
        "Athletics" => AbilityId::Str,
        "Deception" | "Diplomacy" | "Intimidation" | "Performance" => AbilityId::Cha,
        "Medicine" | "Nature" | "Religion" | "Survival" => AbilityId::Wis,
        _ if is_lore_key(skill) => AbilityId::Int,
        _ => AbilityId::Str,
    }
}

pub fn compute_derived_stats(input: &DerivedInput<'_>) -> DerivedStats {
    let DerivedInput {
        level,
        ability_scores,
        proficiencies,
        context,
    } = *input;
    let modifier = |ability: AbilityId| ability_modifier(ability_scores.get(ability));
    let level_i = i32::from(level);

    let max_hit_points = (context.ancestry_hit_points
        + context.class_hit_points * level_i
        + modifier(AbilityId::Con) * level_i
        + context.additional_hit_points.unwrap_or(0))
    .max(0);

    let perception_breakdown = context.modifiers.perception.clone();
    let perception = RankedStat {
        modifier: modifier(AbilityId::Wis)
            + proficiency_bonus(level, proficiencies.perception)
            + sum_modifiers(&perception_breakdown),
        rank: proficiencies.perception,
        breakdown: perception_breakdown,
    };

    let save = |kind: SaveKind| {
        let breakdown = context.modifiers.save(kind);
        DefenseStat {
            value: modifier(kind.ability())
                + proficiency_bonus(level, proficiencies.saves.get(kind))
                + sum_modifiers(&breakdown),
            breakdown,
        }
    };
    let saves = SaveStats {
        fortitude: save(SaveKind::Fortitude),
        reflex: save(SaveKind::Reflex),
        will: save(SaveKind::Will),
    };

    let skills = proficiencies
        .skills
        .iter()
        .map(|(skill, rank)| {
            let breakdown = context.modifiers.skill(skill);
            let stat = RankedStat {
                modifier: modifier(skill_ability(skill))
                    + proficiency_bonus(level, *rank)
                    + sum_modifiers(&breakdown),
                rank: *rank,
                breakdown,
            };
            (skill.clone(), stat)
        })
        .collect();

    let armor_category = context.equipped_armor_category.unwrap_or_default();
    let armor_rank = proficiencies
        .armor
        .get(armor_category.as_str())
        .or_else(|| proficiencies.armor.get(ArmorCategory::Unarmored.as_str()))
        .copied()
        .unwrap_or_default();
    let armor_breakdown = context.modifiers.armor_class.clone();
    let armor_class = DefenseStat {
        value: 10
            + modifier(AbilityId::Dex)
            + proficiency_bonus(level, armor_rank)
            + sum_modifiers(&armor_breakdown),
        breakdown: armor_breakdown,
    };

    let class_dc_breakdown = context.modifiers.class_dc.clone();
    let class_dc = DefenseStat {
        value: 10
            + modifier(context.key_ability)
            + proficiency_bonus(level, proficiencies.class_dc)
            + sum_modifiers(&class_dc_breakdown),
        breakdown: class_dc_breakdown,
    };

    let speeds = SpeedType::ALL
        .iter()
        .filter_map(|speed_type| match speed_type {
            SpeedType::Land => Some((
                SpeedType::Land,
                context
                    .speeds
                    .get(&SpeedType::Land)
                    .copied()
                    .unwrap_or(context.base_speed),
            )),
            other => context.speeds.get(other).map(|value| (*other, *value)),
        })
        .collect();

    DerivedStats {
        hit_points: HitPoints {
            max: max_hit_points,
            current: max_hit_points,
            temporary: context.temporary_hit_points.unwrap_or(0),
        },
        armor_class,
        class_dc: Some(class_dc),
        perception,
        saves,
        skills,
        speeds,
        attacks: Vec::new(),
        resistances: Vec::new(),
        weaknesses: Vec::new(),
        immunities: Vec::new(),
    }
}
