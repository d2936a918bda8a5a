//! Domain entities - catalog content, effects, choices and character content

mod catalog;
mod character_content;
mod choice;
mod effect;

pub use catalog::{
    build_catalog_lookup, ActionCost, ActionKind, AncestryDetails, AncestryLanguages,
    ArchetypeDetails, BackgroundDetails, CatalogIndexEntry, CatalogLookup, ClassAttackRanks,
    ClassDefenseRanks, ClassDetails, ClassLevel, ClassProficiencies, ClassSkillTraining,
    ClassSpellcasting, ConditionDetails, ContentEntity, EntityDetails, EntityType, FeatCategory,
    FeatDetails, HeritageDetails, ItemDetails, LanguageChoices, ProficiencyBump, Rarity,
    RuleDetails, Size, SourceReference, SpellDetails, VersionInfo,
};
pub use character_content::{
    Bulk, CharacterFeatSelection, CharacterIdentity, CharacterItem, CharacterMetadata,
    CharacterNotes, CharacterSpell, CharacterSpellcastingEntry, HistoryEntry, HistoryOperation,
    SourceHash, SpellcastingType, CHARACTER_SCHEMA_VERSION,
};
pub use choice::{ChoiceDefinition, ChoiceResolution, ChoiceScope};
pub use effect::{
    AbilityBoostMode, Effect, ResourceKind, SpellTradition, StackingRule, STANDARD_BOOST,
    STANDARD_FLAW,
};
