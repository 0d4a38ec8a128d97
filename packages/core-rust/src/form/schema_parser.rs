//! Form schema normalization.
//!
//! Turns consumer-written [`FieldSchema`]s into [`NormalizedField`]s: every
//! optional property gets its default and every rule becomes a plain
//! [`ValidationFn`], so the validator never has to look at shorthand again.

use std::sync::LazyLock;

use regex::Regex;

use super::types::{BuiltinRules, FieldSchema, NormalizedField, ValidationFn, ValidationRule};
use crate::value::{is_blank, FormData, Value};

/// Failure message of the required rule.
pub const REQUIRED_MESSAGE: &str = "此欄位為必填";
/// Failure message of the pattern rule.
pub const PATTERN_MESSAGE: &str = "格式不正確";
/// Failure message of the email rule.
pub const EMAIL_MESSAGE: &str = "請輸入有效的 Email 格式";

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is a valid regex")
});

// ---------------------------------------------------------------------------
// Built-in rule expansion
// ---------------------------------------------------------------------------

fn required_rule() -> ValidationFn {
    ValidationFn::new(|value, _| {
        if is_blank(value) {
            Err(REQUIRED_MESSAGE.to_string())
        } else {
            Ok(())
        }
    })
}

/// Runs `check` on string values; every other value (missing included) fails.
fn string_rule<F>(message: String, check: F) -> ValidationFn
where
    F: Fn(&str) -> bool + Send + Sync + 'static,
{
    ValidationFn::new(move |value: Option<&Value>, _: &FormData| {
        match value.and_then(Value::as_str) {
            Some(s) if check(s) => Ok(()),
            _ => Err(message.clone()),
        }
    })
}

/// Length as counted by the length rules: UTF-16 code units, so a character
/// outside the Basic Multilingual Plane counts as 2.
fn text_length(s: &str) -> usize {
    s.encode_utf16().count()
}

/// Expands shorthand into predicates, in the fixed order
/// required, minLength, maxLength, pattern, email.
fn expand_builtin_rules(rules: &BuiltinRules) -> Vec<ValidationFn> {
    let mut fns = Vec::new();

    if rules.required == Some(true) {
        fns.push(required_rule());
    }

    if let Some(min) = rules.min_length {
        fns.push(string_rule(format!("至少需要 {min} 個字元"), move |s| {
            text_length(s) >= min
        }));
    }

    if let Some(max) = rules.max_length {
        fns.push(string_rule(format!("最多 {max} 個字元"), move |s| {
            text_length(s) <= max
        }));
    }

    if let Some(pattern) = &rules.pattern {
        let pattern = pattern.clone();
        fns.push(string_rule(PATTERN_MESSAGE.to_string(), move |s| {
            pattern.is_match(s)
        }));
    }

    if rules.email == Some(true) {
        fns.push(string_rule(EMAIL_MESSAGE.to_string(), |s| EMAIL_RE.is_match(s)));
    }

    fns
}

fn normalize_rule(rule: &ValidationRule) -> Vec<ValidationFn> {
    match rule {
        ValidationRule::Predicate(f) => vec![f.clone()],
        ValidationRule::Shorthand(rules) => expand_builtin_rules(rules),
    }
}

// ---------------------------------------------------------------------------
// Schema normalization
// ---------------------------------------------------------------------------

fn normalize_field(field: &FieldSchema) -> NormalizedField {
    let required = field.required.unwrap_or(false);

    let mut rules = Vec::with_capacity(field.rules.len() + 1);
    if required {
        rules.push(required_rule());
    }
    rules.extend(field.rules.iter().flat_map(normalize_rule));

    NormalizedField {
        key: field.key.clone(),
        field_type: field.field_type,
        label: field.label.clone(),
        placeholder: field.placeholder.clone().unwrap_or_default(),
        required,
        rules,
        condition: field.condition.clone(),
        options: field.options.clone().unwrap_or_default(),
        // A null default reads back the same as no default.
        default_value: field
            .default_value
            .clone()
            .filter(|v| !matches!(v, Value::Null)),
        disabled: field.disabled.unwrap_or(false),
    }
}

/// Normalizes a whole schema, preserving field order.
///
/// Never fails: unset optional properties take their defaults.
#[must_use]
pub fn parse_schema(schema: &[FieldSchema]) -> Vec<NormalizedField> {
    let fields: Vec<NormalizedField> = schema.iter().map(normalize_field).collect();
    tracing::debug!(
        fields = fields.len(),
        rules = fields.iter().map(|f| f.rules.len()).sum::<usize>(),
        "parsed form schema"
    );
    fields
}

/// Seeds a form's data from the schema's default values.
///
/// Fields without a default are left out; looking them up yields `None`,
/// the same as a field the user has not touched.
#[must_use]
pub fn build_initial_values(schema: &[NormalizedField]) -> FormData {
    schema
        .iter()
        .filter_map(|field| {
            field
                .default_value
                .clone()
                .map(|value| (field.key.clone(), value))
        })
        .collect()
}
