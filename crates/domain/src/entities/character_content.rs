//! Character content - identity, feats, spellcasting, equipment, notes and history.
//!
//! These structs are carried through every selection step unchanged unless a
//! step explicitly replaces them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use super::effect::SpellTradition;
use crate::ids::{CharacterId, HistoryEntryId};
use crate::value_objects::AbilityId;

/// Schema version stamped on newly created characters.
pub const CHARACTER_SCHEMA_VERSION: &str = "1.0.0";

/// A catalog pack the character was built against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceHash {
    pub id: String,
    pub hash: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterMetadata {
    pub id: CharacterId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub campaign: Option<String>,
    pub schema_version: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub sources: Vec<SourceHash>,
}

impl CharacterMetadata {
    /// Fresh metadata with a new id, both timestamps set to `now`.
    pub fn new(name: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: CharacterId::new(),
            name: name.into(),
            player: None,
            campaign: None,
            schema_version: CHARACTER_SCHEMA_VERSION.to_string(),
            created_at: now,
            updated_at: now,
            sources: Vec::new(),
        }
    }

    pub fn touched(&self, now: DateTime<Utc>) -> Self {
        Self {
            updated_at: now,
            ..self.clone()
        }
    }
}

/// Who the character is: level and the catalog ids it was built from.
///
/// Selection ids stay `None` until the matching selection step has run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterIdentity {
    pub level: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ancestry_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heritage_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_id: Option<String>,
    #[serde(default)]
    pub archetype_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deity_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alignment: Option<String>,
}

impl CharacterIdentity {
    pub fn at_level(level: u8) -> Self {
        Self {
            level,
            ancestry_id: None,
            heritage_id: None,
            background_id: None,
            class_id: None,
            archetype_ids: Vec::new(),
            deity_id: None,
            alignment: None,
        }
    }
}

impl Default for CharacterIdentity {
    fn default() -> Self {
        Self::at_level(1)
    }
}

/// A feat the character holds and what granted it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterFeatSelection {
    pub id: String,
    pub granted_by: String,
    pub level: u8,
    #[serde(default)]
    pub replaced: bool,
    /// Free-form answers to the feat's own choices.
    #[serde(default)]
    pub choices: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpellcastingType {
    Prepared,
    Spontaneous,
    Focus,
    Innate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterSpell {
    pub id: String,
    pub rank: u8,
    #[serde(default)]
    pub prepared: bool,
    #[serde(default)]
    pub slots: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterSpellcastingEntry {
    pub id: String,
    pub tradition: SpellTradition,
    pub casting_type: SpellcastingType,
    pub ability: AbilityId,
    #[serde(default)]
    pub focus_points: u32,
    #[serde(default)]
    pub max_focus_points: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dc: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attack: Option<i32>,
    /// Slot counts keyed by spell rank, "0" through "10".
    #[serde(default)]
    pub slots: BTreeMap<String, u32>,
    #[serde(default)]
    pub spells: Vec<CharacterSpell>,
}

/// Bulk is written either as a number or as a rating such as "L".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Bulk {
    Value(f64),
    Rating(String),
}

fn default_quantity() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterItem {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_id: Option<String>,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bulk: Option<Bulk>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invested: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub runes: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_id: Option<String>,
    #[serde(default)]
    pub metadata: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterNotes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub appearance: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backstory: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allies: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub campaigns: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryOperation {
    #[serde(rename = "type")]
    pub operation_type: String,
    #[serde(default)]
    pub payload: BTreeMap<String, Value>,
}

/// One append-only entry in the character's advancement log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: HistoryEntryId,
    pub level: u8,
    pub timestamp: DateTime<Utc>,
    pub description: String,
    #[serde(default)]
    pub operations: Vec<HistoryOperation>,
}
