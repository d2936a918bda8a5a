//! Value objects shared by the rules engine.

mod ability;
mod modifier;
mod proficiency;
mod speed;

pub use ability::{
    ability_modifier, apply_ability_adjustments, AbilityAdjustment, AbilityId, AbilityScoreBlock,
    AdjustmentKind,
};
pub use modifier::{sum_modifiers, ModifierBreakdown, ModifierType};
pub use proficiency::{
    is_lore_key, max_rank, proficiency_bonus, ProficiencyRank, ProficiencySummary, SaveKind,
    SaveRanks,
};
pub use speed::SpeedType;
