//! Effect application use case.
//!
//! Applies the effects of one content entity, in order, into an
//! [`EffectApplicationResult`] that the selection pipeline merges into the
//! character. Effects that need player input become pending choices instead
//! of changing state.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use penpaper_domain::value_objects::max_rank;
use penpaper_domain::{
    AbilityAdjustment, AbilityBoostMode, AbilityId, ChoiceDefinition, ChoiceScope, ContentEntity,
    Effect, Predicate, ProficiencyRank, SpeedType, STANDARD_FLAW,
};

// =============================================================================
// Result Types
// =============================================================================

/// Something content asked for that the engine recognised but did not apply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Diagnostic {
    #[serde(rename_all = "camelCase")]
    UnimplementedEffect { source: String, kind: &'static str },
    #[serde(rename_all = "camelCase")]
    UnimplementedChoiceScope {
        source: String,
        choice_id: String,
        scope: ChoiceScope,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnimplementedEffect { source, kind } => {
                write!(f, "{source}: effect kind '{kind}' is not applied yet")
            }
            Self::UnimplementedChoiceScope {
                source,
                choice_id,
                scope,
            } => write!(
                f,
                "{source}: choice '{choice_id}' with scope '{scope}' is not resolved yet"
            ),
        }
    }
}

/// Running state shared by every effect of the entity being applied.
///
/// Lives only for one entity's application and is never persisted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EffectApplicationContext {
    pub traits: Vec<String>,
    pub languages: Vec<String>,
    pub senses: BTreeMap<String, Option<u32>>,
    pub speeds: BTreeMap<SpeedType, i32>,
    pub proficiencies: BTreeMap<String, ProficiencyRank>,
    pub ability_adjustments: Vec<AbilityAdjustment>,
    pub flags: Vec<String>,
}

/// The changes an entity (or a resolved choice) contributes.
///
/// `traits`, `languages` and `flags` keep first-insertion order without duplicates.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectApplicationResult {
    pub ability_adjustments: Vec<AbilityAdjustment>,
    pub proficiency_updates: BTreeMap<String, ProficiencyRank>,
    pub languages: Vec<String>,
    /// Sense id to range in feet; `None` means the sense has no range.
    pub senses: BTreeMap<String, Option<u32>>,
    /// Accumulated speed deltas per type.
    pub speeds: BTreeMap<SpeedType, i32>,
    pub traits: Vec<String>,
    pub flags: Vec<String>,
    pub choices: Vec<ChoiceDefinition>,
    pub diagnostics: Vec<Diagnostic>,
}

impl EffectApplicationResult {
    /// Folds a resolved choice into this result.
    ///
    /// Adjustments and diagnostics are appended, proficiency updates ratchet,
    /// languages are unioned.
    pub fn absorb(&mut self, other: EffectApplicationResult) {
        self.ability_adjustments.extend(other.ability_adjustments);
        for (target, rank) in other.proficiency_updates {
            let entry = self.proficiency_updates.entry(target).or_insert(rank);
            *entry = max_rank(*entry, rank);
        }
        for language in &other.languages {
            insert_unique(&mut self.languages, language);
        }
        self.diagnostics.extend(other.diagnostics);
    }

    pub fn choice(&self, choice_id: &str) -> Option<&ChoiceDefinition> {
        self.choices.iter().find(|choice| choice.id == choice_id)
    }
}

pub(crate) fn insert_unique(set: &mut Vec<String>, value: &str) {
    if !set.iter().any(|existing| existing == value) {
        set.push(value.to_string());
    }
}

// =============================================================================
// Application
// =============================================================================

/// Applies one effect, writing the same delta to `context` and `result`.
///
/// Kinds the engine does not apply yet leave both untouched and record a
/// [`Diagnostic`].
pub fn apply_effect(
    effect: &Effect,
    context: &mut EffectApplicationContext,
    source_label: &str,
    result: &mut EffectApplicationResult,
) {
    match effect {
        Effect::AbilityBoost { mode } => apply_ability_boost(mode, context, source_label, result),

        Effect::AbilityFlaw { abilities } => {
            let adjustment = AbilityAdjustment::flaw(abilities.clone(), STANDARD_FLAW, source_label);
            context.ability_adjustments.push(adjustment.clone());
            result.ability_adjustments.push(adjustment);
        }

        Effect::GrantProficiency { target, rank } => {
            let next = context
                .proficiencies
                .get(target)
                .map_or(*rank, |current| max_rank(*current, *rank));
            context.proficiencies.insert(target.clone(), next);
            result.proficiency_updates.insert(target.clone(), next);
        }

        Effect::SetProficiency { target, rank } => {
            context.proficiencies.insert(target.clone(), *rank);
            result.proficiency_updates.insert(target.clone(), *rank);
        }

        Effect::GrantTrait { trait_id } => {
            insert_unique(&mut context.traits, trait_id);
            insert_unique(&mut result.traits, trait_id);
        }

        Effect::GrantLanguage { language_id } => {
            insert_unique(&mut context.languages, language_id);
            insert_unique(&mut result.languages, language_id);
        }

        Effect::GrantSense { sense_id, range } => {
            context.senses.insert(sense_id.clone(), *range);
            result.senses.insert(sense_id.clone(), *range);
        }

        Effect::AddSpeed { speed_type, value } => {
            let next = context.speeds.get(speed_type).copied().unwrap_or(0) + value;
            context.speeds.insert(*speed_type, next);
            result.speeds.insert(*speed_type, next);
        }

        Effect::GrantFlag { flag } => {
            insert_unique(&mut context.flags, flag);
            insert_unique(&mut result.flags, flag);
        }

        Effect::RemoveFlag { flag } => {
            context.flags.retain(|existing| existing != flag);
            result.flags.retain(|existing| existing != flag);
        }

        Effect::GrantChoice { choice } => result.choices.push(choice.clone()),

        Effect::GrantFeat { .. }
        | Effect::AddModifier { .. }
        | Effect::GrantSpell { .. }
        | Effect::GrantSpellSlot { .. }
        | Effect::ModifyResource { .. } => {
            tracing::warn!(
                source = %source_label,
                kind = effect.kind_name(),
                "Effect kind not applied yet, skipping"
            );
            result.diagnostics.push(Diagnostic::UnimplementedEffect {
                source: source_label.to_string(),
                kind: effect.kind_name(),
            });
        }
    }
}

fn apply_ability_boost(
    mode: &AbilityBoostMode,
    context: &mut EffectApplicationContext,
    source_label: &str,
    result: &mut EffectApplicationResult,
) {
    match mode {
        AbilityBoostMode::Fixed { abilities, value } => {
            let adjustment = AbilityAdjustment::boost(abilities.clone(), *value, source_label);
            context.ability_adjustments.push(adjustment.clone());
            result.ability_adjustments.push(adjustment);
        }
        AbilityBoostMode::Choice { count, options, .. } => {
            // Placeholder filter: any score passes, so it narrows nothing.
            let filter = Predicate::all(
                options
                    .iter()
                    .map(|ability| Predicate::ability_at_least(*ability, 0))
                    .collect(),
            );
            let choice = ChoiceDefinition::new(
                format!("{source_label}-ability-boost"),
                boost_label(*count, ""),
                *count,
                ChoiceScope::AbilityBoost,
            )
            .with_filter(filter);
            result.choices.push(choice);
        }
        AbilityBoostMode::Any { count, .. } => {
            result.choices.push(ChoiceDefinition::new(
                format!("{source_label}-ability-boost-any"),
                boost_label(*count, " from any ability"),
                *count,
                ChoiceScope::AbilityBoost,
            ));
        }
    }
}

fn boost_label(count: u32, suffix: &str) -> String {
    let plural = if count > 1 { "s" } else { "" };
    format!("Choose {count} ability boost{plural}{suffix}")
}

/// Owns the context and result for one entity's application.
pub struct EffectApplication {
    source_label: String,
    context: EffectApplicationContext,
    result: EffectApplicationResult,
}

impl EffectApplication {
    pub fn new(source_label: impl Into<String>) -> Self {
        Self {
            source_label: source_label.into(),
            context: EffectApplicationContext::default(),
            result: EffectApplicationResult::default(),
        }
    }

    pub fn apply(&mut self, effect: &Effect) {
        apply_effect(effect, &mut self.context, &self.source_label, &mut self.result);
    }

    pub fn source_label(&self) -> &str {
        &self.source_label
    }

    pub fn context(&self) -> &EffectApplicationContext {
        &self.context
    }

    pub fn result(&self) -> &EffectApplicationResult {
        &self.result
    }

    pub fn into_result(self) -> EffectApplicationResult {
        self.result
    }
}

/// Applies every effect of `entity`, then its legacy `boosts` entries.
///
/// Everything is stamped with the entity's `"{type}:{name}"` label.
pub fn apply_entity_effects(entity: &ContentEntity) -> EffectApplicationResult {
    let mut application = EffectApplication::new(entity.source_label());

    for effect in &entity.effects {
        application.apply(effect);
    }
    for mode in entity.legacy_boosts() {
        application.apply(&Effect::AbilityBoost { mode: mode.clone() });
    }

    let result = application.into_result();
    tracing::debug!(
        entity_id = %entity.id,
        source = %entity.source_label(),
        adjustments = result.ability_adjustments.len(),
        choices = result.choices.len(),
        diagnostics = result.diagnostics.len(),
        "Applied entity effects"
    );
    result
}

/// The choices selecting `entity` would ask the player to make.
pub fn pending_choices(entity: &ContentEntity) -> Vec<ChoiceDefinition> {
    apply_entity_effects(entity).choices
}

/// Abilities a pending ability-boost choice may pick from.
///
/// Read from the `abilityAtLeast` entries of an `all` filter. Any other
/// filter, or none, allows all six.
pub fn ability_boost_options(choice: &ChoiceDefinition) -> Vec<AbilityId> {
    let listed: Vec<AbilityId> = match &choice.filter {
        Some(Predicate::All { predicates }) => predicates
            .iter()
            .filter_map(|predicate| match predicate {
                Predicate::AbilityAtLeast { ability, .. } => Some(*ability),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    };
    if listed.is_empty() {
        AbilityId::ALL.to_vec()
    } else {
        listed
    }
}
