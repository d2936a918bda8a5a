//! Player choices emitted by effects and the selections that resolve them.

use serde::de::{self, Unexpected};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use crate::game_systems::Predicate;

/// What kind of thing a choice selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChoiceScope {
    Skill,
    SkillFeat,
    ClassFeat,
    GeneralFeat,
    AncestryFeat,
    ClassFeature,
    Spell,
    AbilityBoost,
    Proficiency,
    Language,
}

impl ChoiceScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Skill => "skill",
            Self::SkillFeat => "skillFeat",
            Self::ClassFeat => "classFeat",
            Self::GeneralFeat => "generalFeat",
            Self::AncestryFeat => "ancestryFeat",
            Self::ClassFeature => "classFeature",
            Self::Spell => "spell",
            Self::AbilityBoost => "abilityBoost",
            Self::Proficiency => "proficiency",
            Self::Language => "language",
        }
    }
}

impl fmt::Display for ChoiceScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn default_count() -> u32 {
    1
}

/// Selection counts on the wire must be at least 1.
pub(crate) fn deserialize_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let count = u32::deserialize(deserializer)?;
    if count == 0 {
        return Err(de::Error::invalid_value(
            Unexpected::Unsigned(0),
            &"a selection count of at least 1",
        ));
    }
    Ok(count)
}

/// An open choice the player must resolve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChoiceDefinition {
    pub id: String,
    pub label: String,
    /// Number of selections required, at least 1.
    #[serde(default = "default_count", deserialize_with = "deserialize_count")]
    pub count: u32,
    pub scope: ChoiceScope,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<Predicate>,
    #[serde(default)]
    pub allow_duplicates: bool,
}

impl ChoiceDefinition {
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        count: u32,
        scope: ChoiceScope,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            count,
            scope,
            filter: None,
            allow_duplicates: false,
        }
    }

    pub fn with_filter(self, filter: Predicate) -> Self {
        Self {
            filter: Some(filter),
            ..self
        }
    }
}

/// The player's answer to a previously emitted choice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChoiceResolution {
    pub choice_id: String,
    pub selected_ids: Vec<String>,
}

impl ChoiceResolution {
    pub fn new<I, S>(choice_id: impl Into<String>, selected_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            choice_id: choice_id.into(),
            selected_ids: selected_ids.into_iter().map(Into::into).collect(),
        }
    }
}
