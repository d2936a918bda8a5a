//! Catalog content entities and the id lookup the engine reads them through.
//!
//! Entities arrive already validated; loading and validating content packs is
//! somebody else's job. Every entity shares a common base and carries
//! type-specific details discriminated by the `type` field.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

use super::character_content::SpellcastingType;
use super::choice::ChoiceDefinition;
use super::effect::{AbilityBoostMode, Effect, SpellTradition};
use crate::error::DomainError;
use crate::game_systems::Predicate;
use crate::value_objects::{AbilityId, ProficiencyRank, SaveRanks};

/// Discriminator of a content entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    Ancestry,
    Heritage,
    Background,
    Class,
    Archetype,
    Feat,
    Spell,
    Item,
    Condition,
    Rule,
}

impl EntityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ancestry => "ancestry",
            Self::Heritage => "heritage",
            Self::Background => "background",
            Self::Class => "class",
            Self::Archetype => "archetype",
            Self::Feat => "feat",
            Self::Spell => "spell",
            Self::Item => "item",
            Self::Condition => "condition",
            Self::Rule => "rule",
        }
    }

    /// Capitalized name used in error messages.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Ancestry => "Ancestry",
            Self::Heritage => "Heritage",
            Self::Background => "Background",
            Self::Class => "Class",
            Self::Archetype => "Archetype",
            Self::Feat => "Feat",
            Self::Spell => "Spell",
            Self::Item => "Item",
            Self::Condition => "Condition",
            Self::Rule => "Rule",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    #[default]
    Common,
    Uncommon,
    Rare,
    Unique,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Size {
    Tiny,
    Small,
    #[default]
    Medium,
    Large,
    Huge,
    Gargantuan,
}

/// Book or pack an entity was published in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceReference {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionInfo {
    #[serde(default = "default_major")]
    pub major: u32,
    #[serde(default)]
    pub minor: u32,
    #[serde(default)]
    pub patch: u32,
}

fn default_major() -> u32 {
    1
}

/// Languages an ancestry starts with, plus its bonus-language pool.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AncestryLanguages {
    #[serde(default)]
    pub granted: Vec<String>,
    #[serde(default)]
    pub choices: LanguageChoices,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageChoices {
    #[serde(default)]
    pub count: u32,
    #[serde(default)]
    pub options: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AncestryDetails {
    pub hit_points: i32,
    pub size: Size,
    pub speed: i32,
    /// Legacy boost representation, applied alongside `effects`.
    #[serde(default)]
    pub boosts: Vec<AbilityBoostMode>,
    #[serde(default)]
    pub flaws: Vec<AbilityId>,
    #[serde(default)]
    pub languages: AncestryLanguages,
    #[serde(default)]
    pub features: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeritageDetails {
    pub ancestry_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackgroundDetails {
    /// Legacy boost representation, applied alongside `effects`.
    #[serde(default)]
    pub boosts: Vec<AbilityBoostMode>,
    #[serde(default)]
    pub skill_training: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feat: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassSkillTraining {
    #[serde(default)]
    pub trained: u32,
    #[serde(default)]
    pub additional_choices: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassAttackRanks {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub simple: Option<ProficiencyRank>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub martial: Option<ProficiencyRank>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub advanced: Option<ProficiencyRank>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unarmed: Option<ProficiencyRank>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassDefenseRanks {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unarmored: Option<ProficiencyRank>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub light: Option<ProficiencyRank>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medium: Option<ProficiencyRank>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heavy: Option<ProficiencyRank>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shields: Option<ProficiencyRank>,
}

/// Starting proficiencies listed on a class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassProficiencies {
    pub perception: ProficiencyRank,
    pub saving_throws: SaveRanks,
    #[serde(default)]
    pub skills: ClassSkillTraining,
    #[serde(default)]
    pub attacks: ClassAttackRanks,
    #[serde(default)]
    pub defense: ClassDefenseRanks,
    #[serde(default, rename = "classDC", skip_serializing_if = "Option::is_none")]
    pub class_dc: Option<ProficiencyRank>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProficiencyBump {
    pub target: String,
    pub rank: ProficiencyRank,
}

/// What a class grants at one level.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassLevel {
    #[serde(default)]
    pub grants: Vec<Effect>,
    #[serde(default)]
    pub choices: Vec<ChoiceDefinition>,
    #[serde(default)]
    pub proficiency_bumps: Vec<ProficiencyBump>,
    #[serde(default)]
    pub feature_refs: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassSpellcasting {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tradition: Option<SpellTradition>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub casting_type: Option<SpellcastingType>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassDetails {
    /// Key ability options; the first one is the default.
    pub key_ability: Vec<AbilityId>,
    pub hit_points_per_level: i32,
    pub proficiencies: ClassProficiencies,
    /// Keyed by level, "1" through "20".
    #[serde(default)]
    pub progression: BTreeMap<String, ClassLevel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spellcasting: Option<ClassSpellcasting>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchetypeDetails {
    pub dedication_feat_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatCategory {
    Ancestry,
    Class,
    Skill,
    General,
    Archetype,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    One,
    Two,
    Three,
    Free,
    Reaction,
    Varies,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionCost {
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<ActionKind>,
    #[serde(default, rename = "trait", skip_serializing_if = "Option::is_none")]
    pub trait_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatDetails {
    pub level: u8,
    pub category: FeatCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_cost: Option<ActionCost>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpellDetails {
    pub rank: u8,
    #[serde(default)]
    pub traditions: Vec<SpellTradition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub targets: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saving_throw: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemDetails {
    pub level: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bulk: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionDetails {
    #[serde(default)]
    pub levels: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleDetails {
    pub category: String,
}

/// Type-specific part of an entity, discriminated by `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum EntityDetails {
    Ancestry(AncestryDetails),
    Heritage(HeritageDetails),
    Background(BackgroundDetails),
    Class(ClassDetails),
    Archetype(ArchetypeDetails),
    Feat(FeatDetails),
    Spell(SpellDetails),
    Item(ItemDetails),
    Condition(ConditionDetails),
    Rule(RuleDetails),
}

/// A catalog entity: common base fields plus its typed details.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentEntity {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub source: SourceReference,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<VersionInfo>,
    #[serde(default)]
    pub rarity: Rarity,
    #[serde(default)]
    pub traits: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prerequisites: Option<Predicate>,
    #[serde(default)]
    pub effects: Vec<Effect>,
    #[serde(flatten)]
    pub details: EntityDetails,
}

impl ContentEntity {
    /// Entity with no effects or optional metadata.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        source_id: impl Into<String>,
        details: EntityDetails,
    ) -> Self {
        Self {
            id: id.into(),
            slug: None,
            name: name.into(),
            summary: None,
            description: None,
            source: SourceReference {
                id: source_id.into(),
                page: None,
                license: None,
            },
            version: None,
            rarity: Rarity::Common,
            traits: Vec::new(),
            tags: Vec::new(),
            prerequisites: None,
            effects: Vec::new(),
            details,
        }
    }

    pub fn with_effects(self, effects: Vec<Effect>) -> Self {
        Self { effects, ..self }
    }

    pub fn entity_type(&self) -> EntityType {
        match &self.details {
            EntityDetails::Ancestry(_) => EntityType::Ancestry,
            EntityDetails::Heritage(_) => EntityType::Heritage,
            EntityDetails::Background(_) => EntityType::Background,
            EntityDetails::Class(_) => EntityType::Class,
            EntityDetails::Archetype(_) => EntityType::Archetype,
            EntityDetails::Feat(_) => EntityType::Feat,
            EntityDetails::Spell(_) => EntityType::Spell,
            EntityDetails::Item(_) => EntityType::Item,
            EntityDetails::Condition(_) => EntityType::Condition,
            EntityDetails::Rule(_) => EntityType::Rule,
        }
    }

    /// Provenance label stamped on everything this entity grants, e.g. `ancestry:Dwarf`.
    pub fn source_label(&self) -> String {
        format!("{}:{}", self.entity_type(), self.name)
    }

    /// Legacy `boosts` entries. Only ancestries and backgrounds carry them.
    pub fn legacy_boosts(&self) -> &[AbilityBoostMode] {
        match &self.details {
            EntityDetails::Ancestry(ancestry) => &ancestry.boosts,
            EntityDetails::Background(background) => &background.boosts,
            _ => &[],
        }
    }

    pub fn as_ancestry(&self) -> Option<&AncestryDetails> {
        match &self.details {
            EntityDetails::Ancestry(ancestry) => Some(ancestry),
            _ => None,
        }
    }

    pub fn as_class(&self) -> Option<&ClassDetails> {
        match &self.details {
            EntityDetails::Class(class) => Some(class),
            _ => None,
        }
    }
}

/// A validated entity plus the pack it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogIndexEntry {
    pub entity: ContentEntity,
    pub pack_id: String,
    pub hash: String,
}

impl CatalogIndexEntry {
    pub fn new(entity: ContentEntity, pack_id: impl Into<String>, hash: impl Into<String>) -> Self {
        Self {
            entity,
            pack_id: pack_id.into(),
            hash: hash.into(),
        }
    }
}

/// Read-only id index over catalog entries.
#[derive(Debug, Clone, Default)]
pub struct CatalogLookup {
    by_id: HashMap<String, CatalogIndexEntry>,
}

impl CatalogLookup {
    /// Indexes entries by entity id. A later entry with the same id replaces an earlier one.
    pub fn from_entries(entries: impl IntoIterator<Item = CatalogIndexEntry>) -> Self {
        let by_id = entries
            .into_iter()
            .map(|entry| (entry.entity.id.clone(), entry))
            .collect();
        Self { by_id }
    }

    pub fn get(&self, id: &str) -> Option<&CatalogIndexEntry> {
        self.by_id.get(id)
    }

    /// Looks up an entity that must exist with the given type.
    ///
    /// An entity present under a different type counts as not found.
    pub fn require(&self, id: &str, entity_type: EntityType) -> Result<&ContentEntity, DomainError> {
        self.by_id
            .get(id)
            .map(|entry| &entry.entity)
            .filter(|entity| entity.entity_type() == entity_type)
            .ok_or_else(|| DomainError::not_found(entity_type.display_name(), id))
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = &CatalogIndexEntry> {
        self.by_id.values()
    }
}

pub fn build_catalog_lookup(entries: impl IntoIterator<Item = CatalogIndexEntry>) -> CatalogLookup {
    CatalogLookup::from_entries(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DWARF: &str = r#"{
        "id": "pf2e.ancestry.dwarf",
        "type": "ancestry",
        "name": "Dwarf",
        "source": { "id": "core", "page": 34 },
        "traits": ["dwarf", "humanoid"],
        "hitPoints": 10,
        "size": "medium",
        "speed": 20,
        "boosts": [
            { "type": "fixed", "abilities": ["CON", "WIS"] },
            { "type": "any", "count": 1 }
        ],
        "flaws": ["CHA"],
        "languages": { "granted": ["common", "dwarven"] },
        "effects": [{ "kind": "grantSense", "senseId": "darkvision" }]
    }"#;

    fn background() -> ContentEntity {
        ContentEntity::new(
            "pf2e.background.farmhand",
            "Farmhand",
            "core",
            EntityDetails::Background(BackgroundDetails {
                boosts: vec![AbilityBoostMode::any(1)],
                skill_training: vec!["Athletics".into()],
                feat: None,
            }),
        )
    }

    #[test]
    fn test_ancestry_parses_with_defaults() {
        let entity: ContentEntity = serde_json::from_str(DWARF).unwrap();
        assert_eq!(entity.entity_type(), EntityType::Ancestry);
        assert_eq!(entity.rarity, Rarity::Common);
        assert_eq!(entity.effects.len(), 1);
        let ancestry = entity.as_ancestry().unwrap();
        assert_eq!(ancestry.hit_points, 10);
        assert_eq!(ancestry.flaws, vec![AbilityId::Cha]);
        assert_eq!(ancestry.languages.granted, vec!["common", "dwarven"]);
        assert_eq!(ancestry.languages.choices.count, 0);
        assert_eq!(entity.legacy_boosts().len(), 2);
    }

    #[test]
    fn test_entity_round_trips_type_tag() {
        let entity = background();
        let json = serde_json::to_value(&entity).unwrap();
        assert_eq!(json["type"], "background");
        assert_eq!(json["skillTraining"][0], "Athletics");
        let back: ContentEntity = serde_json::from_value(json).unwrap();
        assert_eq!(back, entity);
    }

    #[test]
    fn test_source_label_uses_type_and_name() {
        let entity: ContentEntity = serde_json::from_str(DWARF).unwrap();
        assert_eq!(entity.source_label(), "ancestry:Dwarf");
        assert_eq!(background().source_label(), "background:Farmhand");
    }

    #[test]
    fn test_legacy_boosts_only_on_ancestry_and_background() {
        let feat = ContentEntity::new(
            "pf2e.feat.toughness",
            "Toughness",
            "core",
            EntityDetails::Feat(FeatDetails {
                level: 1,
                category: FeatCategory::General,
                action_cost: None,
            }),
        );
        assert!(feat.legacy_boosts().is_empty());
        assert_eq!(background().legacy_boosts().len(), 1);
    }

    #[test]
    fn test_require_checks_type() {
        let lookup = build_catalog_lookup(vec![CatalogIndexEntry::new(background(), "core", "h1")]);
        assert!(lookup
            .require("pf2e.background.farmhand", EntityType::Background)
            .is_ok());

        let err = lookup
            .require("pf2e.background.farmhand", EntityType::Ancestry)
            .unwrap_err();
        assert_eq!(
            err,
            DomainError::not_found("Ancestry", "pf2e.background.farmhand")
        );
        assert!(lookup.require("missing", EntityType::Class).is_err());
    }

    #[test]
    fn test_later_duplicate_wins() {
        let mut renamed = background();
        renamed.name = "Field Hand".into();
        let lookup = CatalogLookup::from_entries(vec![
            CatalogIndexEntry::new(background(), "core", "h1"),
            CatalogIndexEntry::new(renamed, "homebrew", "h2"),
        ]);
        assert_eq!(lookup.len(), 1);
        let entry = lookup.get("pf2e.background.farmhand").unwrap();
        assert_eq!(entry.pack_id, "homebrew");
        assert_eq!(entry.entity.name, "Field Hand");
    }

    #[test]
    fn test_unknown_entity_type_is_rejected() {
        let json = r#"{ "id": "x", "type": "deity", "name": "X", "source": { "id": "core" } }"#;
        assert!(serde_json::from_str::<ContentEntity>(json).is_err());
    }
}
