//! Field and form validation.
//!
//! Validation does not look at visibility. Callers pass the fields they want
//! validated, normally the output of
//! [`get_visible_fields`](super::get_visible_fields).

use std::collections::BTreeMap;

use super::types::{FieldValidationResult, FormValidationResult, NormalizedField};
use crate::value::{field_value, FormData, Value};

/// Runs `field`'s rules in order against `value`.
///
/// Stops at the first failing rule and reports its message; later rules are
/// not evaluated.
#[must_use]
pub fn validate_field(
    field: &NormalizedField,
    value: Option<&Value>,
    form_data: &FormData,
) -> FieldValidationResult {
    match field
        .rules
        .iter()
        .try_for_each(|rule| rule.check(value, form_data))
    {
        Ok(()) => FieldValidationResult::valid(),
        Err(message) => FieldValidationResult::invalid(message),
    }
}

/// Validates exactly the given fields against `form_data`.
#[must_use]
pub fn validate_form(fields: &[&NormalizedField], form_data: &FormData) -> FormValidationResult {
    let result: FormValidationResult = fields
        .iter()
        .map(|field| {
            let value = field_value(form_data, &field.key);
            (field.key.clone(), validate_field(field, value, form_data))
        })
        .collect();
    tracing::trace!(
        fields = result.len(),
        invalid = result.values().filter(|r| !r.valid).count(),
        "validated form"
    );
    result
}

/// Whether every validated field passed. An empty result is valid.
#[must_use]
pub fn is_form_valid(result: &FormValidationResult) -> bool {
    result.values().all(|r| r.valid)
}

/// Messages of the failed fields, keyed by field key.
///
/// Failures with an empty message are left out.
#[must_use]
pub fn extract_errors(result: &FormValidationResult) -> BTreeMap<String, String> {
    result
        .iter()
        .filter(|(_, r)| !r.valid)
        .filter_map(|(key, r)| match r.message.as_deref() {
            Some(message) if !message.is_empty() => Some((key.clone(), message.to_string())),
            _ => None,
        })
        .collect()
}
