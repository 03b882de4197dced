//! Input validation utilities for the service layer.
//!
//! Every check returns `Error::Validation` naming the offending form field,
//! so handlers can render the message next to the form.

use crate::error::{Error, Result};
use crate::models::ojous::NewOjou;

/// Column width of `ojous.name`
pub const MAX_NAME_LENGTH: usize = 255;

/// Validates that a field is not empty after trimming
///
/// # Arguments
/// * `input` - The value to validate
/// * `field` - Form field name, used in the error
/// * `label` - Human label, used in the message
pub fn validate_required(input: &str, field: &str, label: &str) -> Result<()> {
    if input.trim().is_empty() {
        return Err(Error::validation(field, &format!("{} is required", label)));
    }
    Ok(())
}

/// Validates persona name: required, at most `MAX_NAME_LENGTH` characters,
/// no control characters.
pub fn validate_ojou_name(name: &str) -> Result<()> {
    validate_required(name, "name", "Name")?;

    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(Error::validation(
            "name",
            &format!("Name must be at most {} characters", MAX_NAME_LENGTH),
        ));
    }

    if name.chars().any(|c| c.is_control()) {
        return Err(Error::validation("name", "Name cannot contain control characters"));
    }

    Ok(())
}

/// Validates a persona before insert. Name is checked first.
pub fn validate_new_ojou(new_ojou: &NewOjou) -> Result<()> {
    validate_ojou_name(&new_ojou.name)?;
    validate_required(&new_ojou.description, "description", "Description")?;
    Ok(())
}
