//! Engine configuration.
//!
//! The only tunable today is the derived context used when a selection step
//! is called without one. Values come from defaults, a serialized config, or
//! environment variable overrides.

use serde::{Deserialize, Serialize};

use penpaper_domain::{AbilityId, DerivedContext};

pub const ENV_ANCESTRY_HP: &str = "PENPAPER_ANCESTRY_HP";
pub const ENV_CLASS_HP: &str = "PENPAPER_CLASS_HP";
pub const ENV_KEY_ABILITY: &str = "PENPAPER_KEY_ABILITY";
pub const ENV_BASE_SPEED: &str = "PENPAPER_BASE_SPEED";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineConfig {
    #[serde(default)]
    pub default_derived_context: DerivedContext,
}

impl EngineConfig {
    /// Defaults with any `PENPAPER_*` environment overrides applied.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults with overrides read through `lookup`.
    ///
    /// Unset keys keep the default. Values that do not parse, or negative
    /// numbers, are logged and ignored.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut context = DerivedContext::default();

        if let Some(hp) = non_negative(&lookup, ENV_ANCESTRY_HP) {
            context.ancestry_hit_points = hp;
        }
        if let Some(hp) = non_negative(&lookup, ENV_CLASS_HP) {
            context.class_hit_points = hp;
        }
        if let Some(speed) = non_negative(&lookup, ENV_BASE_SPEED) {
            context.base_speed = speed;
        }
        if let Some(val) = lookup(ENV_KEY_ABILITY) {
            match val.trim().parse::<AbilityId>() {
                Ok(ability) => {
                    context.key_ability = ability;
                    tracing::info!(ability = %ability, "Applied {} environment variable", ENV_KEY_ABILITY);
                }
                Err(_) => {
                    tracing::warn!(val = %val, "{} is not a valid ability id, ignoring", ENV_KEY_ABILITY);
                }
            }
        }

        Self {
            default_derived_context: context,
        }
    }
}

fn non_negative(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<i32> {
    let val = lookup(key)?;
    match val.trim().parse::<i32>() {
        Ok(value) if value >= 0 => {
            tracing::info!(value, "Applied {} environment variable", key);
            Some(value)
        }
        Ok(value) => {
            tracing::warn!(value, "{} must not be negative, ignoring", key);
            None
        }
        Err(_) => {
            tracing::warn!(val = %val, "{} is not a valid integer, ignoring", key);
            None
        }
    }
}
