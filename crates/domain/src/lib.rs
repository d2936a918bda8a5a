//! Penpaper domain - character data model and pure rules functions.
//!
//! Nothing in this crate logs or performs I/O. The engine crate drives these
//! types through the selection pipeline.

pub mod aggregates;
pub mod entities;
pub mod error;
pub mod game_systems;
pub mod ids;
pub mod value_objects;

pub use aggregates::{AbilityScores, Character, CreateCharacterOptions};

pub use entities::{
    build_catalog_lookup, AbilityBoostMode, AncestryDetails, BackgroundDetails, CatalogIndexEntry,
    CatalogLookup, CharacterFeatSelection, CharacterIdentity, CharacterItem, CharacterMetadata,
    CharacterNotes, CharacterSpellcastingEntry, ChoiceDefinition, ChoiceResolution, ChoiceScope,
    ClassDetails, ContentEntity, Effect, EntityDetails, EntityType, HistoryEntry, SourceReference,
    STANDARD_BOOST, STANDARD_FLAW,
};

pub use error::DomainError;

pub use game_systems::{
    build_predicate_context, compute_derived_stats, evaluate_predicate, skill_ability,
    ArmorCategory, DerivedContext, DerivedInput, DerivedModifiers, DerivedStats, Predicate,
    PredicateContext,
};

pub use ids::{CharacterId, HistoryEntryId};

pub use value_objects::{
    ability_modifier, apply_ability_adjustments, max_rank, proficiency_bonus, sum_modifiers,
    AbilityAdjustment, AbilityId, AbilityScoreBlock, AdjustmentKind, ModifierBreakdown,
    ModifierType, ProficiencyRank, ProficiencySummary, SaveKind, SaveRanks, SpeedType,
};
