//! Entity selection use case - ancestry, background and class steps.
//!
//! Every step follows the same pipeline: look the entity up, apply its
//! effects, resolve any answered choices, merge the result into the
//! character's state and rebuild a fresh `Character`. The input character is
//! never touched.

mod error;
mod merge;

pub use error::SelectionError;
pub use merge::{
    format_sense, merge_languages, merge_proficiencies, merge_senses, merge_speed_deltas,
};

use std::sync::Arc;

use penpaper_domain::{
    CatalogLookup, Character, CharacterIdentity, ChoiceResolution, DerivedContext, EntityType,
};

use crate::config::EngineConfig;
use crate::infrastructure::ports::ClockPort;
use crate::use_cases::choices::resolve_choice;
use crate::use_cases::effects::apply_entity_effects;

/// Per-call inputs to a selection step.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionOptions {
    /// Context used for the rebuild. `None` means the builder's configured default.
    pub derived_context: Option<DerivedContext>,
    /// Answers to choices the selected entity emits. Answers to other
    /// choices are ignored.
    pub choice_resolutions: Vec<ChoiceResolution>,
}

impl SelectionOptions {
    pub fn with_resolutions(choice_resolutions: Vec<ChoiceResolution>) -> Self {
        Self {
            derived_context: None,
            choice_resolutions,
        }
    }

    pub fn with_derived_context(self, derived_context: DerivedContext) -> Self {
        Self {
            derived_context: Some(derived_context),
            ..self
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SelectionSlot {
    Ancestry,
    Background,
    Class,
}

impl SelectionSlot {
    fn entity_type(self) -> EntityType {
        match self {
            Self::Ancestry => EntityType::Ancestry,
            Self::Background => EntityType::Background,
            Self::Class => EntityType::Class,
        }
    }

    fn assign(self, identity: &mut CharacterIdentity, id: &str) {
        let slot = match self {
            Self::Ancestry => &mut identity.ancestry_id,
            Self::Background => &mut identity.background_id,
            Self::Class => &mut identity.class_id,
        };
        *slot = Some(id.to_string());
    }
}

/// Runs selection steps against a catalog.
pub struct CharacterBuilder {
    clock: Arc<dyn ClockPort>,
    config: EngineConfig,
}

impl CharacterBuilder {
    pub fn new(clock: Arc<dyn ClockPort>) -> Self {
        Self {
            clock,
            config: EngineConfig::default(),
        }
    }

    pub fn with_config(self, config: EngineConfig) -> Self {
        Self { config, ..self }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn select_ancestry(
        &self,
        character: &Character,
        ancestry_id: &str,
        catalog: &CatalogLookup,
        options: SelectionOptions,
    ) -> Result<Character, SelectionError> {
        self.select(SelectionSlot::Ancestry, character, ancestry_id, catalog, options)
    }

    pub fn select_background(
        &self,
        character: &Character,
        background_id: &str,
        catalog: &CatalogLookup,
        options: SelectionOptions,
    ) -> Result<Character, SelectionError> {
        self.select(SelectionSlot::Background, character, background_id, catalog, options)
    }

    pub fn select_class(
        &self,
        character: &Character,
        class_id: &str,
        catalog: &CatalogLookup,
        options: SelectionOptions,
    ) -> Result<Character, SelectionError> {
        self.select(SelectionSlot::Class, character, class_id, catalog, options)
    }

    fn select(
        &self,
        slot: SelectionSlot,
        character: &Character,
        id: &str,
        catalog: &CatalogLookup,
        options: SelectionOptions,
    ) -> Result<Character, SelectionError> {
        let entity_type = slot.entity_type();
        let entity = catalog
            .require(id, entity_type)
            .map_err(|_| SelectionError::NotFound {
                entity_type,
                id: id.to_string(),
            })?;
        let source_label = entity.source_label();

        let mut result = apply_entity_effects(entity);

        // Only choices emitted by this entity can be answered here.
        for resolution in &options.choice_resolutions {
            let Some(choice) = result.choice(&resolution.choice_id).cloned() else {
                tracing::debug!(
                    choice_id = %resolution.choice_id,
                    entity_id = %id,
                    "Ignoring resolution for a choice this entity did not emit"
                );
                continue;
            };
            let resolved = resolve_choice(&choice, resolution, &source_label)?;
            result.absorb(resolved);
        }

        let proficiencies = merge_proficiencies(character.proficiencies(), &result.proficiency_updates);
        let languages = merge_languages(character.languages(), &result.languages);
        let senses = merge_senses(character.senses(), &result.senses);
        let derived_context = merge_speed_deltas(
            options
                .derived_context
                .unwrap_or_else(|| self.config.default_derived_context.clone()),
            &result.speeds,
        );

        let mut next = character.to_options(derived_context);
        next.metadata = character.metadata().touched(self.clock.now());
        slot.assign(&mut next.identity, id);
        next.ability_adjustments.extend(result.ability_adjustments);
        next.proficiencies = proficiencies;
        next.languages = languages;
        next.senses = senses;

        tracing::debug!(
            entity_type = %entity_type,
            entity_id = %id,
            adjustments = next.ability_adjustments.len(),
            diagnostics = result.diagnostics.len(),
            "Selection applied"
        );

        Ok(Character::create(next))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use penpaper_domain::entities::{ClassProficiencies, Size};
    use penpaper_domain::{
        AbilityBoostMode, AbilityId, AbilityScoreBlock, AncestryDetails, BackgroundDetails,
        CatalogIndexEntry, CharacterMetadata, ChoiceDefinition, ChoiceScope, ClassDetails,
        ContentEntity, CreateCharacterOptions, Effect, EntityDetails, ProficiencyRank,
        ProficiencySummary, SaveRanks, SpeedType,
    };

    use crate::infrastructure::ports::MockClockPort;
    use crate::use_cases::choices::ChoiceError;

    fn created_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    fn selected_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap()
    }

    fn builder() -> CharacterBuilder {
        let mut clock = MockClockPort::new();
        let now = selected_at();
        clock.expect_now().returning(move || now);
        CharacterBuilder::new(Arc::new(clock))
    }

    fn dwarf() -> ContentEntity {
        ContentEntity::new(
            "pf2e.ancestry.dwarf",
            "Dwarf",
            "core",
            EntityDetails::Ancestry(AncestryDetails {
                hit_points: 10,
                size: Size::Medium,
                speed: 20,
                boosts: vec![AbilityBoostMode::fixed(vec![AbilityId::Con, AbilityId::Wis])],
                flaws: vec![AbilityId::Cha],
                languages: Default::default(),
                features: Vec::new(),
            }),
        )
        .with_effects(vec![
            Effect::ability_boost(AbilityBoostMode::any(1)),
            Effect::GrantLanguage {
                language_id: "dwarven".into(),
            },
            Effect::GrantSense {
                sense_id: "darkvision".into(),
                range: None,
            },
            Effect::GrantChoice {
                choice: ChoiceDefinition::new("dwarf-language", "Choose a language", 1, ChoiceScope::Language),
            },
        ])
    }

    fn acolyte() -> ContentEntity {
        ContentEntity::new(
            "pf2e.background.acolyte",
            "Acolyte",
            "core",
            EntityDetails::Background(BackgroundDetails {
                boosts: vec![AbilityBoostMode::choice(1, vec![AbilityId::Int, AbilityId::Wis])],
                skill_training: vec!["Religion".into()],
                feat: None,
            }),
        )
        .with_effects(vec![
            Effect::grant_proficiency("Religion", ProficiencyRank::Trained),
            Effect::grant_proficiency("Scribing Lore", ProficiencyRank::Trained),
        ])
    }

    fn fighter() -> ContentEntity {
        ContentEntity::new(
            "pf2e.class.fighter",
            "Fighter",
            "core",
            EntityDetails::Class(ClassDetails {
                key_ability: vec![AbilityId::Str, AbilityId::Dex],
                hit_points_per_level: 10,
                proficiencies: ClassProficiencies {
                    perception: ProficiencyRank::Expert,
                    saving_throws: SaveRanks {
                        fortitude: ProficiencyRank::Expert,
                        reflex: ProficiencyRank::Expert,
                        will: ProficiencyRank::Trained,
                    },
                    skills: Default::default(),
                    attacks: Default::default(),
                    defense: Default::default(),
                    class_dc: Some(ProficiencyRank::Trained),
                },
                progression: Default::default(),
                spellcasting: None,
            }),
        )
        .with_effects(vec![
            Effect::grant_proficiency("perception", ProficiencyRank::Expert),
            Effect::grant_proficiency("fortitude", ProficiencyRank::Expert),
            Effect::grant_proficiency("weapon:martial", ProficiencyRank::Trained),
            Effect::grant_proficiency("armor:unarmored", ProficiencyRank::Trained),
            Effect::grant_proficiency("classDC", ProficiencyRank::Trained),
            Effect::add_speed(SpeedType::Land, 5),
            Effect::GrantFeat {
                feat_id: "pf2e.feat.attack-of-opportunity".into(),
                level: Some(1),
                required: true,
            },
        ])
    }

    fn catalog() -> CatalogLookup {
        CatalogLookup::from_entries(
            [dwarf(), acolyte(), fighter()]
                .into_iter()
                .map(|entity| CatalogIndexEntry::new(entity, "core", "abc123")),
        )
    }

    fn blank_character() -> Character {
        Character::create(CreateCharacterOptions::new(
            CharacterMetadata::new("Harsk", created_at()),
            CharacterIdentity::default(),
            AbilityScoreBlock::default(),
            ProficiencySummary::default(),
            DerivedContext::default(),
        ))
    }

    #[test]
    fn select_ancestry_applies_effects_and_legacy_boosts() {
        let character = blank_character();
        let options = SelectionOptions::with_resolutions(vec![
            ChoiceResolution::new("ancestry:Dwarf-ability-boost-any", ["STR"]),
            ChoiceResolution::new("dwarf-language", ["gnomish"]),
        ]);

        let next = builder()
            .select_ancestry(&character, "pf2e.ancestry.dwarf", &catalog(), options)
            .unwrap();

        assert_eq!(next.identity().ancestry_id.as_deref(), Some("pf2e.ancestry.dwarf"));
        assert_eq!(next.final_scores().str, 12);
        assert_eq!(next.final_scores().con, 12);
        assert_eq!(next.final_scores().wis, 12);
        // Flaws on the ancestry record are data only.
        assert_eq!(next.final_scores().cha, 10);
        assert_eq!(next.ability_scores().boosts.len(), 2);
        assert_eq!(next.languages(), ["dwarven", "gnomish"]);
        assert_eq!(next.senses(), ["darkvision"]);
        assert_eq!(next.metadata().updated_at, selected_at());
        assert_eq!(next.metadata().created_at, created_at());
        assert_eq!(next.metadata().id, character.metadata().id);

        // Input is untouched.
        assert!(character.identity().ancestry_id.is_none());
        assert!(character.languages().is_empty());
    }

    #[test]
    fn choice_boost_is_counted_once() {
        let options = SelectionOptions::with_resolutions(vec![ChoiceResolution::new(
            "background:Acolyte-ability-boost",
            ["WIS"],
        )]);
        let next = builder()
            .select_background(&blank_character(), "pf2e.background.acolyte", &catalog(), options)
            .unwrap();

        assert_eq!(next.final_scores().wis, 12);
        assert_eq!(next.ability_scores().boosts.len(), 1);
        assert_eq!(next.proficiencies().skills["Religion"], ProficiencyRank::Trained);
        assert_eq!(next.proficiencies().lores["Scribing Lore"], ProficiencyRank::Trained);
        assert_eq!(next.identity().background_id.as_deref(), Some("pf2e.background.acolyte"));
    }

    #[test]
    fn unanswered_choices_leave_scores_alone() {
        let next = builder()
            .select_background(
                &blank_character(),
                "pf2e.background.acolyte",
                &catalog(),
                SelectionOptions::default(),
            )
            .unwrap();
        assert_eq!(next.final_scores(), &AbilityScoreBlock::default());
        assert!(next.ability_scores().boosts.is_empty());
    }

    #[test]
    fn resolutions_for_other_entities_are_ignored() {
        let options = SelectionOptions::with_resolutions(vec![ChoiceResolution::new(
            "ancestry:Dwarf-ability-boost-any",
            ["STR"],
        )]);
        let next = builder()
            .select_background(&blank_character(), "pf2e.background.acolyte", &catalog(), options)
            .unwrap();
        assert_eq!(next.final_scores().str, 10);
    }

    #[test]
    fn bad_resolution_fails_the_whole_step() {
        let options = SelectionOptions::with_resolutions(vec![ChoiceResolution::new(
            "background:Acolyte-ability-boost",
            ["WIS", "INT"],
        )]);
        let err = builder()
            .select_background(&blank_character(), "pf2e.background.acolyte", &catalog(), options)
            .unwrap_err();
        assert!(matches!(
            err,
            SelectionError::Choice(ChoiceError::SelectionCount {
                expected: 1,
                actual: 2,
                ..
            })
        ));
    }

    #[test]
    fn missing_or_mistyped_entity_is_not_found() {
        let character = blank_character();
        let catalog = catalog();
        let builder = builder();

        let err = builder
            .select_ancestry(&character, "pf2e.ancestry.elf", &catalog, SelectionOptions::default())
            .unwrap_err();
        assert_eq!(
            err,
            SelectionError::NotFound {
                entity_type: EntityType::Ancestry,
                id: "pf2e.ancestry.elf".into()
            }
        );
        assert_eq!(err.to_string(), "Ancestry not found: pf2e.ancestry.elf");

        let err = builder
            .select_class(&character, "pf2e.ancestry.dwarf", &catalog, SelectionOptions::default())
            .unwrap_err();
        assert!(matches!(
            err,
            SelectionError::NotFound {
                entity_type: EntityType::Class,
                ..
            }
        ));
    }

    #[test]
    fn select_class_merges_proficiencies_and_speed() {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();

        let context = DerivedContext::from_entities(Some(&dwarf()), Some(&fighter()), &DerivedContext::default());
        let next = builder()
            .select_class(
                &blank_character(),
                "pf2e.class.fighter",
                &catalog(),
                SelectionOptions::default().with_derived_context(context),
            )
            .unwrap();

        let proficiencies = next.proficiencies();
        assert_eq!(proficiencies.perception, ProficiencyRank::Expert);
        assert_eq!(proficiencies.saves.fortitude, ProficiencyRank::Expert);
        assert_eq!(proficiencies.weapons["martial"], ProficiencyRank::Trained);
        assert_eq!(proficiencies.class_dc, ProficiencyRank::Trained);

        let derived = next.derived();
        // 10 (dwarf) + 10 (fighter) at level 1, CON 10.
        assert_eq!(derived.hit_points.max, 20);
        // Dwarf base 20 plus the +5 delta.
        assert_eq!(derived.speeds[&SpeedType::Land], 25);
        // Expert at level 1: 1 + 4.
        assert_eq!(derived.perception.modifier, 5);
        assert_eq!(derived.armor_class.value, 13);
    }

    #[test]
    fn steps_accumulate_and_carry_content() {
        let builder = builder();
        let catalog = catalog();
        let ancestry = builder
            .select_ancestry(
                &blank_character(),
                "pf2e.ancestry.dwarf",
                &catalog,
                SelectionOptions::with_resolutions(vec![ChoiceResolution::new(
                    "ancestry:Dwarf-ability-boost-any",
                    ["DEX"],
                )]),
            )
            .unwrap();
        let background = builder
            .select_background(
                &ancestry,
                "pf2e.background.acolyte",
                &catalog,
                SelectionOptions::with_resolutions(vec![ChoiceResolution::new(
                    "background:Acolyte-ability-boost",
                    ["WIS"],
                )]),
            )
            .unwrap();
        let class = builder
            .select_class(&background, "pf2e.class.fighter", &catalog, SelectionOptions::default())
            .unwrap();

        let identity = class.identity();
        assert_eq!(identity.ancestry_id.as_deref(), Some("pf2e.ancestry.dwarf"));
        assert_eq!(identity.background_id.as_deref(), Some("pf2e.background.acolyte"));
        assert_eq!(identity.class_id.as_deref(), Some("pf2e.class.fighter"));
        assert_eq!(class.final_scores().wis, 14);
        assert_eq!(class.final_scores().dex, 12);
        assert_eq!(class.ability_scores().boosts.len(), 3);
        assert_eq!(class.languages(), ["dwarven"]);
        assert_eq!(class.senses(), ["darkvision"]);
        assert_eq!(class.proficiencies().skills["Religion"], ProficiencyRank::Trained);
    }

    #[test]
    fn builder_default_context_comes_from_config() {
        let mut config = EngineConfig::default();
        config.default_derived_context.class_hit_points = 12;
        let builder = builder().with_config(config);

        let next = builder
            .select_background(
                &blank_character(),
                "pf2e.background.acolyte",
                &catalog(),
                SelectionOptions::default(),
            )
            .unwrap();
        assert_eq!(next.derived().hit_points.max, 20);
        assert_eq!(builder.config().default_derived_context.class_hit_points, 12);
    }
}
