//! Prerequisite predicates and their evaluation.
//!
//! Predicates gate feats, choices and effects. Evaluation never fails: a
//! lookup that finds nothing makes the predicate false.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

use crate::aggregates::Character;
use crate::value_objects::{AbilityId, AbilityScoreBlock, ProficiencyRank};

/// A boolean prerequisite expression.
///
/// `All` and `Any` are expected to carry at least one child; content
/// validation enforces that, the evaluator does not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Predicate {
    All {
        predicates: Vec<Predicate>,
    },
    Any {
        predicates: Vec<Predicate>,
    },
    Not {
        predicate: Box<Predicate>,
    },
    MinLevel {
        level: u8,
    },
    HasTrait {
        #[serde(rename = "trait")]
        trait_id: String,
    },
    #[serde(rename_all = "camelCase")]
    HasFeat {
        feat_id: String,
    },
    #[serde(rename_all = "camelCase")]
    HasAncestry {
        ancestry_id: String,
    },
    #[serde(rename_all = "camelCase")]
    HasHeritage {
        heritage_id: String,
    },
    #[serde(rename_all = "camelCase")]
    HasBackground {
        background_id: String,
    },
    #[serde(rename_all = "camelCase")]
    HasClass {
        class_id: String,
    },
    #[serde(rename_all = "camelCase")]
    HasArchetype {
        archetype_id: String,
    },
    #[serde(rename_all = "camelCase")]
    HasSkillRank {
        skill_id: String,
        rank: ProficiencyRank,
    },
    ProficiencyAtLeast {
        target: String,
        rank: ProficiencyRank,
    },
    #[serde(rename_all = "camelCase")]
    HasSpell {
        spell_id: String,
    },
    HasFlag {
        flag: String,
    },
    AbilityAtLeast {
        ability: AbilityId,
        score: i32,
    },
}

impl Predicate {
    pub fn all(predicates: Vec<Predicate>) -> Self {
        Self::All { predicates }
    }

    pub fn any(predicates: Vec<Predicate>) -> Self {
        Self::Any { predicates }
    }

    pub fn negate(predicate: Predicate) -> Self {
        Self::Not {
            predicate: Box::new(predicate),
        }
    }

    pub fn ability_at_least(ability: AbilityId, score: i32) -> Self {
        Self::AbilityAtLeast { ability, score }
    }
}

/// Snapshot of the character facts predicates can test.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PredicateContext {
    pub level: u8,
    pub ancestry_id: Option<String>,
    pub heritage_id: Option<String>,
    pub background_id: Option<String>,
    pub class_id: Option<String>,
    pub archetype_ids: HashSet<String>,
    /// Nothing populates traits yet.
    pub trait_ids: HashSet<String>,
    pub feat_ids: HashSet<String>,
    /// Nothing populates flags yet.
    pub flags: HashSet<String>,
    pub skills: BTreeMap<String, ProficiencyRank>,
    /// Weapon and armor entries (keys as stored) plus `perception` and `classDC`.
    pub proficiencies: HashMap<String, ProficiencyRank>,
    pub spells: HashSet<String>,
    pub ability_scores: AbilityScoreBlock,
}

/// Builds the predicate snapshot from a character.
pub fn build_predicate_context(character: &Character) -> PredicateContext {
    let identity = character.identity();
    let summary = character.proficiencies();

    let mut proficiencies: HashMap<String, ProficiencyRank> = summary
        .weapons
        .iter()
        .chain(summary.armor.iter())
        .map(|(key, rank)| (key.clone(), *rank))
        .collect();
    proficiencies.insert("perception".to_string(), summary.perception);
    proficiencies.insert("classDC".to_string(), summary.class_dc);

    PredicateContext {
        level: identity.level,
        ancestry_id: identity.ancestry_id.clone(),
        heritage_id: identity.heritage_id.clone(),
        background_id: identity.background_id.clone(),
        class_id: identity.class_id.clone(),
        archetype_ids: identity.archetype_ids.iter().cloned().collect(),
        trait_ids: HashSet::new(),
        feat_ids: character.feats().iter().map(|feat| feat.id.clone()).collect(),
        flags: HashSet::new(),
        skills: summary.skills.clone(),
        proficiencies,
        spells: character
            .spellcasting()
            .iter()
            .flat_map(|entry| entry.spells.iter().map(|spell| spell.id.clone()))
            .collect(),
        ability_scores: *character.final_scores(),
    }
}

/// Recursively evaluates a predicate. `All`/`Any` short-circuit.
pub fn evaluate_predicate(predicate: &Predicate, context: &PredicateContext) -> bool {
    match predicate {
        Predicate::All { predicates } => predicates
            .iter()
            .all(|child| evaluate_predicate(child, context)),
        Predicate::Any { predicates } => predicates
            .iter()
            .any(|child| evaluate_predicate(child, context)),
        Predicate::Not { predicate } => !evaluate_predicate(predicate, context),
        Predicate::MinLevel { level } => context.level >= *level,
        Predicate::HasTrait { trait_id } => context.trait_ids.contains(trait_id),
        Predicate::HasFeat { feat_id } => context.feat_ids.contains(feat_id),
        Predicate::HasAncestry { ancestry_id } => matches_id(&context.ancestry_id, ancestry_id),
        Predicate::HasHeritage { heritage_id } => matches_id(&context.heritage_id, heritage_id),
        Predicate::HasBackground { background_id } => {
            matches_id(&context.background_id, background_id)
        }
        Predicate::HasClass { class_id } => matches_id(&context.class_id, class_id),
        Predicate::HasArchetype { archetype_id } => context.archetype_ids.contains(archetype_id),
        Predicate::HasSkillRank { skill_id, rank } => context
            .skills
            .get(skill_id)
            .is_some_and(|current| current >= rank),
        Predicate::ProficiencyAtLeast { target, rank } => context
            .proficiencies
            .get(target)
            .is_some_and(|current| current >= rank),
        Predicate::HasSpell { spell_id } => context.spells.contains(spell_id),
        Predicate::HasFlag { flag } => context.flags.contains(flag),
        Predicate::AbilityAtLeast { ability, score } => {
            context.ability_scores.get(*ability) >= *score
        }
    }
}

fn matches_id(current: &Option<String>, expected: &str) -> bool {
    current.as_deref() == Some(expected)
}
