//! Declarative effects attached to content entities.

use serde::{Deserialize, Serialize};

use super::choice::{deserialize_count, ChoiceDefinition};
use crate::value_objects::{AbilityId, ModifierType, ProficiencyRank, SpeedType};

/// Default ability-boost magnitude.
pub const STANDARD_BOOST: i32 = 2;

/// Magnitude of an `abilityFlaw`, which carries no value on the wire.
pub const STANDARD_FLAW: i32 = 2;

fn default_boost_value() -> i32 {
    STANDARD_BOOST
}

/// How an ability boost picks its abilities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum AbilityBoostMode {
    /// Boost every listed ability
    Fixed {
        abilities: Vec<AbilityId>,
        #[serde(default = "default_boost_value")]
        value: i32,
    },
    /// Player picks `count` of the listed options
    Choice {
        #[serde(deserialize_with = "deserialize_count")]
        count: u32,
        options: Vec<AbilityId>,
        #[serde(default = "default_boost_value")]
        value: i32,
    },
    /// Player picks `count` of all six abilities
    Any {
        #[serde(deserialize_with = "deserialize_count")]
        count: u32,
        #[serde(default = "default_boost_value")]
        value: i32,
    },
}

impl AbilityBoostMode {
    pub fn fixed(abilities: Vec<AbilityId>) -> Self {
        Self::Fixed {
            abilities,
            value: STANDARD_BOOST,
        }
    }

    pub fn choice(count: u32, options: Vec<AbilityId>) -> Self {
        Self::Choice {
            count,
            options,
            value: STANDARD_BOOST,
        }
    }

    pub fn any(count: u32) -> Self {
        Self::Any {
            count,
            value: STANDARD_BOOST,
        }
    }
}

/// How an `addModifier` effect combines with others of its type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StackingRule {
    #[default]
    Max,
    Stack,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpellTradition {
    Arcane,
    Divine,
    Occult,
    Primal,
    Focus,
}

/// Character resources a `modifyResource` effect can touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResourceKind {
    FocusPoints,
    HitPoints,
    Resolve,
    ClassDc,
    HeroPoints,
}

/// A single state change described by content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Effect {
    #[serde(rename_all = "camelCase")]
    GrantFeat {
        feat_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        level: Option<u8>,
        #[serde(default)]
        required: bool,
    },
    /// Raise `target` to at least `rank`
    GrantProficiency {
        target: String,
        rank: ProficiencyRank,
    },
    /// Set `target` to exactly `rank`
    SetProficiency {
        target: String,
        rank: ProficiencyRank,
    },
    AbilityBoost {
        mode: AbilityBoostMode,
    },
    AbilityFlaw {
        abilities: Vec<AbilityId>,
    },
    #[serde(rename_all = "camelCase")]
    AddModifier {
        target: String,
        modifier_type: ModifierType,
        value: i32,
        label: String,
        #[serde(default)]
        stacking: StackingRule,
    },
    #[serde(rename_all = "camelCase")]
    GrantTrait {
        trait_id: String,
    },
    #[serde(rename_all = "camelCase")]
    GrantLanguage {
        language_id: String,
    },
    #[serde(rename_all = "camelCase")]
    GrantSense {
        sense_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        range: Option<u32>,
    },
    GrantChoice {
        choice: ChoiceDefinition,
    },
    #[serde(rename_all = "camelCase")]
    AddSpeed {
        speed_type: SpeedType,
        value: i32,
    },
    #[serde(rename_all = "camelCase")]
    GrantSpell {
        spell_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        tradition: Option<SpellTradition>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        rank: Option<u8>,
    },
    GrantSpellSlot {
        rank: u8,
        count: u32,
    },
    ModifyResource {
        resource: ResourceKind,
        value: i32,
    },
    GrantFlag {
        flag: String,
    },
    RemoveFlag {
        flag: String,
    },
}

impl Effect {
    /// The wire tag of this effect.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::GrantFeat { .. } => "grantFeat",
            Self::GrantProficiency { .. } => "grantProficiency",
            Self::SetProficiency { .. } => "setProficiency",
            Self::AbilityBoost { .. } => "abilityBoost",
            Self::AbilityFlaw { .. } => "abilityFlaw",
            Self::AddModifier { .. } => "addModifier",
            Self::GrantTrait { .. } => "grantTrait",
            Self::GrantLanguage { .. } => "grantLanguage",
            Self::GrantSense { .. } => "grantSense",
            Self::GrantChoice { .. } => "grantChoice",
            Self::AddSpeed { .. } => "addSpeed",
            Self::GrantSpell { .. } => "grantSpell",
            Self::GrantSpellSlot { .. } => "grantSpellSlot",
            Self::ModifyResource { .. } => "modifyResource",
            Self::GrantFlag { .. } => "grantFlag",
            Self::RemoveFlag { .. } => "removeFlag",
        }
    }

    pub fn grant_proficiency(target: impl Into<String>, rank: ProficiencyRank) -> Self {
        Self::GrantProficiency {
            target: target.into(),
            rank,
        }
    }

    pub fn set_proficiency(target: impl Into<String>, rank: ProficiencyRank) -> Self {
        Self::SetProficiency {
            target: target.into(),
            rank,
        }
    }

    pub fn ability_boost(mode: AbilityBoostMode) -> Self {
        Self::AbilityBoost { mode }
    }

    pub fn add_speed(speed_type: SpeedType, value: i32) -> Self {
        Self::AddSpeed { speed_type, value }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effect_tagged_by_kind() {
        let json = r#"[
            { "kind": "abilityBoost", "mode": { "type": "fixed", "abilities": ["STR", "CON"] } },
            { "kind": "abilityFlaw", "abilities": ["INT"] },
            { "kind": "grantProficiency", "target": "Athletics", "rank": "trained" },
            { "kind": "grantSense", "senseId": "darkvision" },
            { "kind": "addSpeed", "speedType": "climb", "value": 10 },
            { "kind": "grantFeat", "featId": "pf2e.feat.toughness" },
            { "kind": "modifyResource", "resource": "focusPoints", "value": 1 }
        ]"#;
        let effects: Vec<Effect> = serde_json::from_str(json).unwrap();
        assert_eq!(
            effects[0],
            Effect::ability_boost(AbilityBoostMode::fixed(vec![AbilityId::Str, AbilityId::Con]))
        );
        assert_eq!(
            effects[3],
            Effect::GrantSense {
                sense_id: "darkvision".into(),
                range: None
            }
        );
        assert_eq!(effects[4].kind_name(), "addSpeed");
        assert_eq!(
            effects[5],
            Effect::GrantFeat {
                feat_id: "pf2e.feat.toughness".into(),
                level: None,
                required: false
            }
        );
    }

    #[test]
    fn test_boost_value_defaults_to_two() {
        let json = r#"{ "type": "choice", "count": 2, "options": ["STR", "DEX", "CON"] }"#;
        let mode: AbilityBoostMode = serde_json::from_str(json).unwrap();
        assert_eq!(mode, AbilityBoostMode::choice(2, vec![AbilityId::Str, AbilityId::Dex, AbilityId::Con]));
    }

    #[test]
    fn test_zero_count_boost_is_rejected() {
        for json in [
            r#"{ "type": "any", "count": 0 }"#,
            r#"{ "type": "choice", "count": 0, "options": ["STR"] }"#,
        ] {
            assert!(serde_json::from_str::<AbilityBoostMode>(json).is_err());
        }
        let mode: AbilityBoostMode = serde_json::from_str(r#"{ "type": "any", "count": 1 }"#).unwrap();
        assert_eq!(mode, AbilityBoostMode::any(1));
    }

    #[test]
    fn test_kind_name_matches_wire_tag() {
        let effect = Effect::GrantSpellSlot { rank: 1, count: 2 };
        let json = serde_json::to_value(&effect).unwrap();
        assert_eq!(json["kind"], effect.kind_name());
    }

    #[test]
    fn test_unknown_kind_is_rejected() {
        let json = r#"{ "kind": "grantDeity", "deityId": "x" }"#;
        assert!(serde_json::from_str::<Effect>(json).is_err());
    }
}
