//! Rules systems.
//!
//! `pf2e` derives combat statistics from a character's state; `predicate`
//! evaluates the prerequisite expressions attached to content.

mod pf2e;
mod predicate;

pub use pf2e::{
    compute_derived_stats, skill_ability, ArmorCategory, AttackProfile, DefenseStat,
    DerivedContext, DerivedInput, DerivedModifiers, DerivedStats, HitPoints, RankedStat,
    Resistance, SaveStats, DEFAULT_ANCESTRY_HIT_POINTS, DEFAULT_BASE_SPEED,
    DEFAULT_CLASS_HIT_POINTS,
};
pub use predicate::{build_predicate_context, evaluate_predicate, Predicate, PredicateContext};
