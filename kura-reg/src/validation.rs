//! Registration request validation
//!
//! Request bodies are deserialised leniently (every field optional) so that a
//! missing field is reported as a 400 with a readable message rather than an
//! extractor rejection.
//!
//! Validation runs in two steps. [`RegistrationPayload::into_form`] checks
//! field presence and the position without touching the catalog;
//! [`check_location`] then validates the location triple once the catalog has
//! been loaded.

use kura_common::db::{Position, RecordKind, RegistrationForm};
use kura_common::location::{validate_triple, LocationCatalog};
use serde::Deserialize;
use serde_json::Value;

use crate::error::ApiError;

pub const MISSING_FIELDS: &str = "All fields are required";

/// Raw registration body as submitted by a client
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationPayload {
    pub id: Option<String>,
    pub name: Option<String>,
    pub national_id: Option<String>,
    pub mobile: Option<String>,
    pub email: Option<String>,
    pub county: Option<String>,
    pub constituency: Option<String>,
    pub ward: Option<String>,
    /// Any JSON value; members ignore it
    pub position: Option<Value>,
}

/// Present and not blank; the value itself is kept untrimmed
fn required(field: Option<String>) -> Result<String, ApiError> {
    match field {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ApiError::BadRequest(MISSING_FIELDS.to_string())),
    }
}

/// Text of a submitted position; `null` counts as absent
fn position_text(value: Option<Value>) -> Option<String> {
    match value {
        None | Some(Value::Null) => None,
        Some(Value::String(text)) => Some(text),
        Some(other) => Some(other.to_string()),
    }
}

impl RegistrationPayload {
    /// Check required fields and the position, producing an unvalidated form
    ///
    /// The location triple is not checked here; see [`check_location`].
    pub fn into_form(self, kind: RecordKind) -> Result<RegistrationForm, ApiError> {
        let name = required(self.name)?;
        let national_id = required(self.national_id)?;
        let mobile = required(self.mobile)?;
        let email = required(self.email)?;
        let county = required(self.county)?;
        let constituency = required(self.constituency)?;
        let ward = required(self.ward)?;

        let position = if kind.requires_position() {
            let raw = required(position_text(self.position))?;
            Some(raw.parse::<Position>()?)
        } else {
            None
        };

        Ok(RegistrationForm {
            name,
            national_id,
            mobile,
            email,
            county,
            constituency,
            ward,
            position,
        })
    }

    /// Split an update body into its record id and checked form
    pub fn into_update(mut self, kind: RecordKind) -> Result<(String, RegistrationForm), ApiError> {
        let id = required(self.id.take())?;
        let form = self.into_form(kind)?;
        Ok((id, form))
    }
}

/// Validate a form's county, constituency and ward against the catalog
pub fn check_location(form: &RegistrationForm, catalog: &LocationCatalog) -> Result<(), ApiError> {
    validate_triple(catalog, &form.county, &form.constituency, &form.ward)?;
    Ok(())
}
