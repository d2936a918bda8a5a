//! Choice resolution errors.

/// A resolution that does not fit the choice it answers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChoiceError {
    #[error("Choice id mismatch: expected '{expected}', got '{actual}'")]
    ChoiceIdMismatch { expected: String, actual: String },

    #[error("Choice '{choice_id}' requires {expected} selection(s), got {actual}")]
    SelectionCount {
        choice_id: String,
        expected: u32,
        actual: usize,
    },

    #[error("Choice '{choice_id}' asks for zero selections")]
    EmptyChoice { choice_id: String },

    #[error("Invalid ability id: {0}")]
    InvalidAbility(String),

    #[error("Choice '{choice_id}' does not allow '{selected}' to be picked twice")]
    DuplicateSelection { choice_id: String, selected: String },

    #[error("'{selected}' is not one of the options for choice '{choice_id}'")]
    NotAnOption { choice_id: String, selected: String },
}
