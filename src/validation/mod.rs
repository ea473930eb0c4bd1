//! Profile Validation Module
//!
//! Pure, side-effect-free rules over a candidate profile and the current
//! collection. Nothing here reaches the network.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::profile::{Profile, ProfileField};

/// Lowest accepted age
pub const AGE_MIN: i64 = 0;

/// Highest accepted age
pub const AGE_MAX: i64 = 119;

/// Advisory minimum name length enforced by the form surface
pub const NAME_MIN_LENGTH: usize = 3;

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
        .expect("email pattern is a valid regex")
});

/// Validation error types
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationError {
    #[error("Please fill in all required fields (Name and Email).")]
    RequiredField { field: ProfileField },

    #[error("This name is already used by another profile. Please use a different name.")]
    DuplicateName { name: String, existing_id: String },

    #[error("Please enter a valid email address.")]
    EmailFormat { value: String },
}

impl ValidationError {
    pub fn field(&self) -> ProfileField {
        match self {
            Self::RequiredField { field } => *field,
            Self::DuplicateName { .. } => ProfileField::Name,
            Self::EmailFormat { .. } => ProfileField::Email,
        }
    }
}

/// Validation result type
pub type ValidationResult<T> = std::result::Result<T, ValidationError>;

/// Check the `local-part@domain.tld` shape
pub fn validate_email_format(value: &str) -> bool {
    EMAIL_REGEX.is_match(value.trim())
}

/// Name and email must contain something other than whitespace
pub fn validate_required(draft: &Profile) -> ValidationResult<()> {
    if draft.name.trim().is_empty() {
        return Err(ValidationError::RequiredField {
            field: ProfileField::Name,
        });
    }
    if draft.email.trim().is_empty() {
        return Err(ValidationError::RequiredField {
            field: ProfileField::Email,
        });
    }
    Ok(())
}

/// Reject a draft whose name exactly matches another profile's name.
///
/// The draft's own entry (same `id`) never counts as a duplicate.
pub fn validate_unique_name(draft: &Profile, collection: &[Profile]) -> ValidationResult<()> {
    match collection
        .iter()
        .find(|profile| profile.name == draft.name && profile.id != draft.id)
    {
        Some(existing) => Err(ValidationError::DuplicateName {
            name: draft.name.clone(),
            existing_id: existing.id.clone(),
        }),
        None => Ok(()),
    }
}

/// Accept an age only inside `[AGE_MIN, AGE_MAX]`.
///
/// `None` means the input is rejected and the caller keeps its previous value.
pub fn clamp_age(raw: i64) -> Option<u8> {
    if (AGE_MIN..=AGE_MAX).contains(&raw) {
        u8::try_from(raw).ok()
    } else {
        None
    }
}

/// Whether a name satisfies the form's minimum length
pub fn meets_name_min_length(name: &str) -> bool {
    name.trim().chars().count() >= NAME_MIN_LENGTH
}

/// Run the save-time rules in order: required fields, duplicate name, then
/// email format when the email is still editable.
///
/// The first failing rule wins.
pub fn validate_draft(draft: &Profile, is_new: bool, collection: &[Profile]) -> ValidationResult<()> {
    validate_required(draft)?;
    validate_unique_name(draft, collection)?;
    if is_new && !validate_email_format(&draft.email) {
        return Err(ValidationError::EmailFormat {
            value: draft.email.clone(),
        });
    }
    Ok(())
}
