//! Request bodies accepted by the declaration endpoints.
//!
//! The public form posts flags and temperature either as JSON primitives or
//! as strings, so both shapes are decoded here.

use serde::{Deserialize, Deserializer};

use crate::entities::health_declaration::DeclarationStatus;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewDeclaration {
    pub name: String,
    #[serde(deserialize_with = "lenient_f64")]
    pub temperature: f64,
    #[serde(deserialize_with = "lenient_bool")]
    pub has_symptoms: bool,
    #[serde(default)]
    pub symptoms: Option<String>,
    #[serde(deserialize_with = "lenient_bool")]
    pub has_contact: bool,
    #[serde(default)]
    pub contact_details: Option<String>,
}

impl NewDeclaration {
    /// Strips surrounding whitespace from the free-text fields.
    pub fn trimmed(mut self) -> Self {
        self.name = self.name.trim().to_string();
        self.symptoms = trim_opt(self.symptoms);
        self.contact_details = trim_opt(self.contact_details);
        self
    }
}

/// Partial update. Absent (or `null`) fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DeclarationPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64_opt")]
    pub temperature: Option<f64>,
    #[serde(default, deserialize_with = "lenient_bool_opt")]
    pub has_symptoms: Option<bool>,
    #[serde(default)]
    pub symptoms: Option<String>,
    #[serde(default, deserialize_with = "lenient_bool_opt")]
    pub has_contact: Option<bool>,
    #[serde(default)]
    pub contact_details: Option<String>,
    #[serde(default)]
    pub status: Option<DeclarationStatus>,
}

impl DeclarationPatch {
    pub fn trimmed(mut self) -> Self {
        self.name = trim_opt(self.name);
        self.symptoms = trim_opt(self.symptoms);
        self.contact_details = trim_opt(self.contact_details);
        self
    }

    pub fn is_status_only(&self) -> bool {
        self.status.is_some()
            && self.name.is_none()
            && self.temperature.is_none()
            && self.has_symptoms.is_none()
            && self.symptoms.is_none()
            && self.has_contact.is_none()
            && self.contact_details.is_none()
    }
}

fn trim_opt(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum BoolLike {
    Bool(bool),
    Text(String),
    Number(f64),
}

impl BoolLike {
    fn into_bool(self) -> bool {
        match self {
            BoolLike::Bool(b) => b,
            BoolLike::Text(s) => s.eq_ignore_ascii_case("true"),
            BoolLike::Number(n) => n != 0.0,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberLike {
    Number(f64),
    Text(String),
}

impl NumberLike {
    fn into_f64<E: serde::de::Error>(self) -> Result<f64, E> {
        match self {
            NumberLike::Number(n) => Ok(n),
            NumberLike::Text(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| E::custom("temperature must be a number")),
        }
    }
}

fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(BoolLike::deserialize(deserializer)?.into_bool())
}

fn lenient_bool_opt<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<BoolLike>::deserialize(deserializer)?.map(BoolLike::into_bool))
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    NumberLike::deserialize(deserializer)?.into_f64()
}

fn lenient_f64_opt<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<NumberLike>::deserialize(deserializer)?
        .map(NumberLike::into_f64)
        .transpose()
}
