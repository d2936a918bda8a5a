//! Use cases - the character creation pipeline.
//!
//! `selection` drives `effects` and `choices`; the latter two are also usable
//! on their own by callers that show pending choices before committing.

pub mod choices;
pub mod effects;
pub mod selection;
