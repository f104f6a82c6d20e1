use std::sync::LazyLock;

use regex::Regex;

use crate::entities::health_declaration;
use crate::error::ValidationError;
use crate::payload::{DeclarationPatch, NewDeclaration};

pub const NAME_MIN_LEN: usize = 2;
pub const NAME_MAX_LEN: usize = 100;
pub const TEMPERATURE_MIN: f64 = 30.0;
pub const TEMPERATURE_MAX: f64 = 45.0;
pub const TEMPERATURE_MAX_DECIMALS: usize = 2;
pub const SYMPTOMS_MAX_LEN: usize = 500;
pub const CONTACT_DETAILS_MAX_LEN: usize = 1000;

static NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z\s\-',.]+$").expect("name pattern is valid"));

/// Checks a full submission. Expects free text to be trimmed already.
pub fn validate_new(input: &NewDeclaration) -> Result<(), ValidationError> {
    validate_name(&input.name)?;
    validate_temperature(input.temperature)?;
    validate_details_length(input.symptoms.as_deref(), input.contact_details.as_deref())?;

    if input.has_symptoms && is_blank(input.symptoms.as_deref()) {
        return Err(symptoms_required());
    }
    if input.has_contact && is_blank(input.contact_details.as_deref()) {
        return Err(contact_details_required());
    }

    Ok(())
}

/// Checks a partial update against the record it will be merged into.
///
/// A flag set to `true` only needs a detail when neither the patch nor the
/// stored record carries a non-blank one.
pub fn validate_patch(
    patch: &DeclarationPatch,
    existing: &health_declaration::Model,
) -> Result<(), ValidationError> {
    if let Some(name) = &patch.name {
        validate_name(name)?;
    }
    if let Some(temperature) = patch.temperature {
        validate_temperature(temperature)?;
    }
    validate_details_length(patch.symptoms.as_deref(), patch.contact_details.as_deref())?;

    if patch.has_symptoms == Some(true)
        && is_blank(patch.symptoms.as_deref())
        && is_blank(existing.symptoms.as_deref())
    {
        return Err(symptoms_required());
    }
    if patch.has_contact == Some(true)
        && is_blank(patch.contact_details.as_deref())
        && is_blank(existing.contact_details.as_deref())
    {
        return Err(contact_details_required());
    }

    Ok(())
}

fn validate_name(name: &str) -> Result<(), ValidationError> {
    let len = name.chars().count();
    if len == 0 {
        return Err(ValidationError::new("name", "name should not be empty"));
    }
    if len < NAME_MIN_LEN {
        return Err(ValidationError::new(
            "name",
            format!("name must be longer than or equal to {NAME_MIN_LEN} characters"),
        ));
    }
    if len > NAME_MAX_LEN {
        return Err(ValidationError::new(
            "name",
            format!("name must be shorter than or equal to {NAME_MAX_LEN} characters"),
        ));
    }
    if !NAME_PATTERN.is_match(name) {
        return Err(ValidationError::new(
            "name",
            "Name can only contain letters, spaces, hyphens, apostrophes, commas, and periods",
        ));
    }
    Ok(())
}

fn validate_temperature(temperature: f64) -> Result<(), ValidationError> {
    if !temperature.is_finite() {
        return Err(ValidationError::new("temperature", "temperature must be a number"));
    }
    if decimal_places(temperature) > TEMPERATURE_MAX_DECIMALS {
        return Err(ValidationError::new(
            "temperature",
            format!("temperature must have at most {TEMPERATURE_MAX_DECIMALS} decimal places"),
        ));
    }
    if temperature < TEMPERATURE_MIN {
        return Err(ValidationError::new(
            "temperature",
            "Temperature must be at least 30°C",
        ));
    }
    if temperature > TEMPERATURE_MAX {
        return Err(ValidationError::new(
            "temperature",
            "Temperature must not exceed 45°C",
        ));
    }
    Ok(())
}

fn validate_details_length(
    symptoms: Option<&str>,
    contact_details: Option<&str>,
) -> Result<(), ValidationError> {
    if symptoms.is_some_and(|s| s.chars().count() > SYMPTOMS_MAX_LEN) {
        return Err(ValidationError::new(
            "symptoms",
            format!("symptoms must be shorter than or equal to {SYMPTOMS_MAX_LEN} characters"),
        ));
    }
    if contact_details.is_some_and(|s| s.chars().count() > CONTACT_DETAILS_MAX_LEN) {
        return Err(ValidationError::new(
            "contactDetails",
            format!(
                "contactDetails must be shorter than or equal to {CONTACT_DETAILS_MAX_LEN} characters"
            ),
        ));
    }
    Ok(())
}

/// Digits after the decimal point in the shortest round-trip representation.
fn decimal_places(value: f64) -> usize {
    let repr = value.to_string();
    repr.split_once('.').map_or(0, |(_, frac)| frac.len())
}

fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}

fn symptoms_required() -> ValidationError {
    ValidationError::new(
        "symptoms",
        "Symptoms must be provided when hasSymptoms is true",
    )
}

fn contact_details_required() -> ValidationError {
    ValidationError::new(
        "contactDetails",
        "Contact details must be provided when hasContact is true",
    )
}
