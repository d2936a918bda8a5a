//! Selection pipeline errors.

use penpaper_domain::EntityType;

use crate::use_cases::choices::ChoiceError;

/// Errors that can occur while selecting an ancestry, background or class.
///
/// The input character is never modified; on error no replacement exists.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    #[error("{} not found: {id}", entity_type.display_name())]
    NotFound { entity_type: EntityType, id: String },

    #[error("Choice resolution failed: {0}")]
    Choice(#[from] ChoiceError),
}
