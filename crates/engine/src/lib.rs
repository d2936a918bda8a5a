//! Penpaper engine - character creation on top of the domain rules.
//!
//! ## Structure
//!
//! - `use_cases/effects` - applying an entity's effects into a result
//! - `use_cases/choices` - resolving player answers to pending choices
//! - `use_cases/selection` - ancestry, background and class selection steps
//! - `infrastructure/` - clock port and its system implementation
//! - `config` - engine defaults and environment overrides

pub mod config;
pub mod infrastructure;
pub mod use_cases;

pub use config::EngineConfig;
pub use infrastructure::clock::SystemClock;
pub use infrastructure::ports::ClockPort;
pub use use_cases::choices::{resolve_choice, ChoiceError};
pub use use_cases::effects::{
    apply_effect, apply_entity_effects, pending_choices, Diagnostic, EffectApplication,
    EffectApplicationContext, EffectApplicationResult,
};
pub use use_cases::selection::{CharacterBuilder, SelectionError, SelectionOptions};
