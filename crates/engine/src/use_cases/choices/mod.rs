//! Choice resolution use case - turns a player's answer into effect deltas.

mod error;

pub use error::ChoiceError;

use penpaper_domain::{
    AbilityAdjustment, AbilityId, ChoiceDefinition, ChoiceResolution, ChoiceScope,
    ProficiencyRank, STANDARD_BOOST,
};

use crate::use_cases::effects::{
    ability_boost_options, insert_unique, Diagnostic, EffectApplicationResult,
};

/// Resolves `resolution` against `choice`.
///
/// Fails before producing anything when the id, the selection count or a
/// selected ability does not fit. Ability picks must be among the choice's
/// offered options, and a choice asking for zero selections is always
/// rejected. Feat, class feature and spell scopes are accepted but only
/// recorded as diagnostics.
pub fn resolve_choice(
    choice: &ChoiceDefinition,
    resolution: &ChoiceResolution,
    source_label: &str,
) -> Result<EffectApplicationResult, ChoiceError> {
    if resolution.choice_id != choice.id {
        return Err(ChoiceError::ChoiceIdMismatch {
            expected: choice.id.clone(),
            actual: resolution.choice_id.clone(),
        });
    }

    if choice.count == 0 {
        return Err(ChoiceError::EmptyChoice {
            choice_id: choice.id.clone(),
        });
    }

    if resolution.selected_ids.len() != choice.count as usize {
        return Err(ChoiceError::SelectionCount {
            choice_id: choice.id.clone(),
            expected: choice.count,
            actual: resolution.selected_ids.len(),
        });
    }

    if !choice.allow_duplicates {
        for (index, selected) in resolution.selected_ids.iter().enumerate() {
            if resolution.selected_ids[..index].contains(selected) {
                return Err(ChoiceError::DuplicateSelection {
                    choice_id: choice.id.clone(),
                    selected: selected.clone(),
                });
            }
        }
    }

    let mut result = EffectApplicationResult::default();

    match choice.scope {
        ChoiceScope::AbilityBoost => {
            let options = ability_boost_options(choice);
            for selected in &resolution.selected_ids {
                let ability: AbilityId = selected
                    .parse()
                    .map_err(|_| ChoiceError::InvalidAbility(selected.clone()))?;
                if !options.contains(&ability) {
                    return Err(ChoiceError::NotAnOption {
                        choice_id: choice.id.clone(),
                        selected: selected.clone(),
                    });
                }
                result.ability_adjustments.push(AbilityAdjustment::boost(
                    vec![ability],
                    STANDARD_BOOST,
                    source_label,
                ));
            }
        }

        // Always trained; the selection merge ratchets, so nothing regresses.
        ChoiceScope::Skill | ChoiceScope::Proficiency => {
            for selected in &resolution.selected_ids {
                result
                    .proficiency_updates
                    .insert(selected.clone(), ProficiencyRank::Trained);
            }
        }

        ChoiceScope::Language => {
            for selected in &resolution.selected_ids {
                insert_unique(&mut result.languages, selected);
            }
        }

        ChoiceScope::SkillFeat
        | ChoiceScope::ClassFeat
        | ChoiceScope::GeneralFeat
        | ChoiceScope::AncestryFeat
        | ChoiceScope::ClassFeature
        | ChoiceScope::Spell => {
            tracing::warn!(
                source = %source_label,
                choice_id = %choice.id,
                scope = %choice.scope,
                "Choice scope not resolved yet, skipping"
            );
            result.diagnostics.push(Diagnostic::UnimplementedChoiceScope {
                source: source_label.to_string(),
                choice_id: choice.id.clone(),
                scope: choice.scope,
            });
        }
    }

    Ok(result)
}
