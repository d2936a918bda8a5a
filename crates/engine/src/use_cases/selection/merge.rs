//! Folding an entity's effect result into the character's existing state.

use std::collections::BTreeMap;

use penpaper_domain::{DerivedContext, ProficiencyRank, ProficiencySummary, SpeedType};

use crate::use_cases::effects::insert_unique;

/// Ratchets every update into a copy of `existing`; no rank goes down.
pub fn merge_proficiencies(
    existing: &ProficiencySummary,
    updates: &BTreeMap<String, ProficiencyRank>,
) -> ProficiencySummary {
    let mut merged = existing.clone();
    for (key, rank) in updates {
        merged.ratchet(key, *rank);
    }
    merged
}

/// Union keeping first occurrence order.
pub fn merge_languages(existing: &[String], additions: &[String]) -> Vec<String> {
    let mut merged = existing.to_vec();
    for language in additions {
        insert_unique(&mut merged, language);
    }
    merged
}

/// Renders a sense for the character's flat sense list.
pub fn format_sense(name: &str, range: Option<u32>) -> String {
    match range {
        Some(feet) => format!("{name} ({feet} ft)"),
        None => name.to_string(),
    }
}

pub fn merge_senses(existing: &[String], additions: &BTreeMap<String, Option<u32>>) -> Vec<String> {
    let mut merged = existing.to_vec();
    for (name, range) in additions {
        insert_unique(&mut merged, &format_sense(name, *range));
    }
    merged
}

/// Adds speed deltas onto the context's overrides.
///
/// A land delta starts from `base_speed` when no land override exists yet;
/// other types start from 0.
pub fn merge_speed_deltas(
    context: DerivedContext,
    deltas: &BTreeMap<SpeedType, i32>,
) -> DerivedContext {
    if deltas.is_empty() {
        return context;
    }

    let mut merged = context;
    for (speed_type, delta) in deltas {
        let current = merged.speeds.get(speed_type).copied().unwrap_or(match speed_type {
            SpeedType::Land => merged.base_speed,
            _ => 0,
        });
        merged.speeds.insert(*speed_type, current + delta);
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn proficiency_merge_routes_and_never_regresses() {
        let mut existing = ProficiencySummary::default();
        existing
            .skills
            .insert("Athletics".into(), ProficiencyRank::Expert);

        let updates = BTreeMap::from([
            ("Athletics".to_string(), ProficiencyRank::Trained),
            ("perception".to_string(), ProficiencyRank::Trained),
            ("reflex".to_string(), ProficiencyRank::Expert),
            ("weapon:martial".to_string(), ProficiencyRank::Trained),
            ("armor:light".to_string(), ProficiencyRank::Trained),
            ("Mining Lore".to_string(), ProficiencyRank::Trained),
            ("classDC".to_string(), ProficiencyRank::Trained),
        ]);
        let merged = merge_proficiencies(&existing, &updates);

        assert_eq!(merged.skills["Athletics"], ProficiencyRank::Expert);
        assert_eq!(merged.perception, ProficiencyRank::Trained);
        assert_eq!(merged.saves.reflex, ProficiencyRank::Expert);
        assert_eq!(merged.weapons["martial"], ProficiencyRank::Trained);
        assert_eq!(merged.armor["light"], ProficiencyRank::Trained);
        assert_eq!(merged.lores["Mining Lore"], ProficiencyRank::Trained);
        assert!(!merged.skills.contains_key("Mining Lore"));
        assert_eq!(merged.class_dc, ProficiencyRank::Trained);
        assert_eq!(existing.perception, ProficiencyRank::Untrained);
    }

    #[test]
    fn language_merge_is_ordered_union() {
        let existing = vec!["common".to_string(), "dwarven".to_string()];
        let merged = merge_languages(&existing, &["gnomish".into(), "common".into()]);
        assert_eq!(merged, vec!["common", "dwarven", "gnomish"]);
        assert_eq!(merge_languages(&existing, &[]), existing);
    }

    #[test]
    fn senses_render_range_in_feet() {
        let additions = BTreeMap::from([
            ("darkvision".to_string(), None),
            ("scent".to_string(), Some(30)),
        ]);
        let merged = merge_senses(&["darkvision".to_string()], &additions);
        assert_eq!(merged, vec!["darkvision", "scent (30 ft)"]);
    }

    #[test]
    fn speed_merge_is_additive() {
        let context = DerivedContext::default();
        assert_eq!(merge_speed_deltas(context.clone(), &BTreeMap::new()), context);

        let merged = merge_speed_deltas(
            context,
            &BTreeMap::from([(SpeedType::Land, 5), (SpeedType::Climb, 10)]),
        );
        assert_eq!(merged.speeds[&SpeedType::Land], 30);
        assert_eq!(merged.speeds[&SpeedType::Climb], 10);

        let again = merge_speed_deltas(merged, &BTreeMap::from([(SpeedType::Climb, 5)]));
        assert_eq!(again.speeds[&SpeedType::Climb], 15);
        assert_eq!(again.speeds[&SpeedType::Land], 30);
    }

    #[test]
    fn speed_delta_adds_onto_caller_override() {
        let mut context = DerivedContext::default();
        context.speeds.insert(SpeedType::Climb, 20);
        context.speeds.insert(SpeedType::Land, 35);

        let merged = merge_speed_deltas(
            context,
            &BTreeMap::from([(SpeedType::Climb, 10), (SpeedType::Land, 5)]),
        );
        assert_eq!(merged.speeds[&SpeedType::Climb], 30);
        // An existing land override wins over base_speed as the starting point.
        assert_eq!(merged.speeds[&SpeedType::Land], 40);
        assert_eq!(merged.base_speed, 25);
    }
}
