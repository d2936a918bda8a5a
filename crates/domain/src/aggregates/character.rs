//! Character aggregate - a player character under construction
//!
//! # Immutable Reconstruction
//!
//! A `Character` is only ever produced by [`Character::create`]. Fields are
//! private and there are no `&mut` methods: every edit builds a fresh
//! [`CreateCharacterOptions`] (usually via [`Character::to_options`]) and
//! calls `create` again, which recomputes final ability scores and derived
//! statistics from scratch.
//!
//! Deserializing a stored character trusts its `derived` block as written.

use serde::{Deserialize, Serialize};

use crate::entities::{
    CharacterFeatSelection, CharacterIdentity, CharacterItem, CharacterMetadata, CharacterNotes,
    CharacterSpellcastingEntry, HistoryEntry,
};
use crate::game_systems::{compute_derived_stats, DerivedContext, DerivedInput, DerivedStats};
use crate::value_objects::{
    ability_modifier, apply_ability_adjustments, AbilityAdjustment, AbilityId, AbilityScoreBlock,
    ProficiencySummary,
};

/// Base scores, the adjustment log, and the final scores computed from both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbilityScores {
    pub base: AbilityScoreBlock,
    #[serde(default)]
    pub boosts: Vec<AbilityAdjustment>,
    #[serde(rename = "final")]
    pub final_scores: AbilityScoreBlock,
}

/// Everything needed to build a character.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateCharacterOptions {
    pub metadata: CharacterMetadata,
    pub identity: CharacterIdentity,
    pub base_abilities: AbilityScoreBlock,
    pub ability_adjustments: Vec<AbilityAdjustment>,
    pub proficiencies: ProficiencySummary,
    pub languages: Vec<String>,
    pub senses: Vec<String>,
    pub feats: Vec<CharacterFeatSelection>,
    pub spellcasting: Vec<CharacterSpellcastingEntry>,
    pub equipment: Vec<CharacterItem>,
    pub history: Vec<HistoryEntry>,
    pub notes: Option<CharacterNotes>,
    pub derived_context: DerivedContext,
}

impl CreateCharacterOptions {
    /// Options with every optional collection empty.
    pub fn new(
        metadata: CharacterMetadata,
        identity: CharacterIdentity,
        base_abilities: AbilityScoreBlock,
        proficiencies: ProficiencySummary,
        derived_context: DerivedContext,
    ) -> Self {
        Self {
            metadata,
            identity,
            base_abilities,
            ability_adjustments: Vec::new(),
            proficiencies,
            languages: Vec::new(),
            senses: Vec::new(),
            feats: Vec::new(),
            spellcasting: Vec::new(),
            equipment: Vec::new(),
            history: Vec::new(),
            notes: None,
            derived_context,
        }
    }
}

/// A player character.
///
/// # Invariants
///
/// - `ability_scores.final_scores` is `base` with every `boosts` entry applied
/// - `derived` was computed from the level, final scores and proficiencies held
///   here (for characters built through [`Character::create`])
/// - `boosts` and `history` only ever grow across rebuilds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Character {
    metadata: CharacterMetadata,
    identity: CharacterIdentity,
    ability_scores: AbilityScores,
    proficiencies: ProficiencySummary,
    #[serde(default)]
    languages: Vec<String>,
    #[serde(default)]
    senses: Vec<String>,
    #[serde(default)]
    feats: Vec<CharacterFeatSelection>,
    #[serde(default)]
    spellcasting: Vec<CharacterSpellcastingEntry>,
    #[serde(default)]
    equipment: Vec<CharacterItem>,
    derived: DerivedStats,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    notes: Option<CharacterNotes>,
    #[serde(default)]
    history: Vec<HistoryEntry>,
}

impl Character {
    // =========================================================================
    // Constructor
    // =========================================================================

    /// Builds a character, computing final scores and derived statistics.
    pub fn create(options: CreateCharacterOptions) -> Self {
        let CreateCharacterOptions {
            metadata,
            identity,
            base_abilities,
            ability_adjustments,
            proficiencies,
            languages,
            senses,
            feats,
            spellcasting,
            equipment,
            history,
            notes,
            derived_context,
        } = options;

        let final_scores = apply_ability_adjustments(&base_abilities, &ability_adjustments);
        let derived = compute_derived_stats(&DerivedInput {
            level: identity.level,
            ability_scores: &final_scores,
            proficiencies: &proficiencies,
            context: &derived_context,
        });

        Self {
            metadata,
            identity,
            ability_scores: AbilityScores {
                base: base_abilities,
                boosts: ability_adjustments,
                final_scores,
            },
            proficiencies,
            languages,
            senses,
            feats,
            spellcasting,
            equipment,
            derived,
            notes,
            history,
        }
    }

    /// Options that rebuild this character unchanged under `derived_context`.
    pub fn to_options(&self, derived_context: DerivedContext) -> CreateCharacterOptions {
        CreateCharacterOptions {
            metadata: self.metadata.clone(),
            identity: self.identity.clone(),
            base_abilities: self.ability_scores.base,
            ability_adjustments: self.ability_scores.boosts.clone(),
            proficiencies: self.proficiencies.clone(),
            languages: self.languages.clone(),
            senses: self.senses.clone(),
            feats: self.feats.clone(),
            spellcasting: self.spellcasting.clone(),
            equipment: self.equipment.clone(),
            history: self.history.clone(),
            notes: self.notes.clone(),
            derived_context,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn metadata(&self) -> &CharacterMetadata {
        &self.metadata
    }

    pub fn identity(&self) -> &CharacterIdentity {
        &self.identity
    }

    pub fn level(&self) -> u8 {
        self.identity.level
    }

    pub fn ability_scores(&self) -> &AbilityScores {
        &self.ability_scores
    }

    pub fn final_scores(&self) -> &AbilityScoreBlock {
        &self.ability_scores.final_scores
    }

    pub fn ability_modifier(&self, ability: AbilityId) -> i32 {
        ability_modifier(self.ability_scores.final_scores.get(ability))
    }

    pub fn proficiencies(&self) -> &ProficiencySummary {
        &self.proficiencies
    }

    pub fn languages(&self) -> &[String] {
        &self.languages
    }

    pub fn senses(&self) -> &[String] {
        &self.senses
    }

    pub fn feats(&self) -> &[CharacterFeatSelection] {
        &self.feats
    }

    pub fn spellcasting(&self) -> &[CharacterSpellcastingEntry] {
        &self.spellcasting
    }

    pub fn equipment(&self) -> &[CharacterItem] {
        &self.equipment
    }

    pub fn derived(&self) -> &DerivedStats {
        &self.derived
    }

    pub fn notes(&self) -> Option<&CharacterNotes> {
        self.notes.as_ref()
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }
}
