//! Flat modifier breakdown entries.

use serde::{Deserialize, Serialize};

/// Bonus category tag. Carried for display only; it does not change stacking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModifierType {
    Status,
    Item,
    Circumstance,
    Untyped,
}

/// One labelled contribution to a statistic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModifierBreakdown {
    #[serde(rename = "type")]
    pub modifier_type: ModifierType,
    pub label: String,
    pub value: i32,
    pub source: String,
}

impl ModifierBreakdown {
    pub fn new(
        modifier_type: ModifierType,
        label: impl Into<String>,
        value: i32,
        source: impl Into<String>,
    ) -> Self {
        Self {
            modifier_type,
            label: label.into(),
            value,
            source: source.into(),
        }
    }
}

/// Plain additive fold. Every entry counts regardless of its type tag.
pub fn sum_modifiers(modifiers: &[ModifierBreakdown]) -> i32 {
    modifiers.iter().map(|m| m.value).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sum_ignores_type_stacking_rules() {
        let mods = vec![
            ModifierBreakdown::new(ModifierType::Circumstance, "Cover", 2, "terrain"),
            ModifierBreakdown::new(ModifierType::Circumstance, "Raised shield", 2, "shield"),
            ModifierBreakdown::new(ModifierType::Status, "Frightened", -1, "condition"),
        ];
        assert_eq!(sum_modifiers(&mods), 3);
        assert_eq!(sum_modifiers(&[]), 0);
    }

    #[test]
    fn test_breakdown_wire_shape() {
        let m = ModifierBreakdown::new(ModifierType::Item, "Armor potency", 1, "item:armor");
        let json = serde_json::to_value(&m).unwrap();
        assert_eq!(json["type"], "item");
        assert_eq!(json["value"], 1);
    }
}
