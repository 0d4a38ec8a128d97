//! Form engine types: raw field schemas, normalized fields, conditions, and
//! validation results.
//!
//! Raw types (`FieldSchema`, `BuiltinRules`, `FieldCondition`) deserialize
//! from the camelCase JSON shape consumers already write by hand. Rule
//! predicates cannot come from a file; they are attached in code with
//! [`FieldSchema::predicate`].

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::value::{FormData, Value};

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Supported field input kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Input,
    Textarea,
    Select,
    Checkbox,
    Radio,
    Toggle,
    Date,
}

/// Comparison operator of a [`FieldCondition`].
///
/// (De)serializes as a bare lowercase string. Strings other than the four
/// known operators land in `Unknown` instead of failing to load; such a
/// condition always hides its field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ConditionOperator {
    /// Strict equality.
    #[default]
    Eq,
    /// Strict inequality.
    Neq,
    /// Membership in an array target.
    In,
    /// Non-membership in an array target.
    Nin,
    /// Any other operator string.
    Unknown(String),
}

impl From<String> for ConditionOperator {
    fn from(op: String) -> Self {
        match op.as_str() {
            "eq" => ConditionOperator::Eq,
            "neq" => ConditionOperator::Neq,
            "in" => ConditionOperator::In,
            "nin" => ConditionOperator::Nin,
            _ => ConditionOperator::Unknown(op),
        }
    }
}

impl From<ConditionOperator> for String {
    fn from(op: ConditionOperator) -> Self {
        match op {
            ConditionOperator::Eq => "eq".to_string(),
            ConditionOperator::Neq => "neq".to_string(),
            ConditionOperator::In => "in".to_string(),
            ConditionOperator::Nin => "nin".to_string(),
            ConditionOperator::Unknown(other) => other,
        }
    }
}

// ---------------------------------------------------------------------------
// Validation rules
// ---------------------------------------------------------------------------

type RuleFn = dyn Fn(Option<&Value>, &FormData) -> Result<(), String> + Send + Sync;

/// A validation predicate.
///
/// Receives the field's own value (`None` when the key is missing from the
/// form data) and the whole form data, so custom rules can validate across
/// fields. Returns `Err(message)` on failure.
///
/// Cloning shares the underlying closure; equality is identity.
#[derive(Clone)]
pub struct ValidationFn(Arc<RuleFn>);

impl ValidationFn {
    /// Wraps a closure as a validation predicate.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(Option<&Value>, &FormData) -> Result<(), String> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Runs the predicate.
    ///
    /// # Errors
    ///
    /// Returns the rule's failure message when the value is rejected.
    pub fn check(&self, value: Option<&Value>, form_data: &FormData) -> Result<(), String> {
        (self.0)(value, form_data)
    }
}

impl fmt::Debug for ValidationFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ValidationFn(..)")
    }
}

impl PartialEq for ValidationFn {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// Built-in validation shorthand.
///
/// Each set constraint expands into one predicate, in the order
/// required, minLength, maxLength, pattern, email.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuiltinRules {
    /// Rejects missing, null, and empty-string values.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub required: Option<bool>,
    /// Minimum length in UTF-16 code units.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub min_length: Option<usize>,
    /// Maximum length in UTF-16 code units.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub max_length: Option<usize>,
    /// Unanchored pattern; serialized as its source string.
    #[serde(
        skip_serializing_if = "Option::is_none",
        default,
        serialize_with = "serialize_pattern",
        deserialize_with = "deserialize_pattern"
    )]
    pub pattern: Option<Regex>,
    /// Requires a `local@domain.tld` shaped string.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub email: Option<bool>,
}

#[allow(clippy::ref_option)]
fn serialize_pattern<S>(pattern: &Option<Regex>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match pattern {
        Some(re) => serializer.serialize_some(re.as_str()),
        None => serializer.serialize_none(),
    }
}

fn deserialize_pattern<'de, D>(deserializer: D) -> Result<Option<Regex>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer)?
        .map(|source| Regex::new(&source).map_err(serde::de::Error::custom))
        .transpose()
}

/// One entry of a field's `rules` list.
#[derive(Debug, Clone)]
pub enum ValidationRule {
    /// A custom predicate, kept as-is by the schema parser.
    Predicate(ValidationFn),
    /// Built-in shorthand, expanded by the schema parser.
    Shorthand(BuiltinRules),
}

impl From<BuiltinRules> for ValidationRule {
    fn from(rules: BuiltinRules) -> Self {
        ValidationRule::Shorthand(rules)
    }
}

impl From<ValidationFn> for ValidationRule {
    fn from(f: ValidationFn) -> Self {
        ValidationRule::Predicate(f)
    }
}

/// Only the shorthand form has a data representation.
impl<'de> Deserialize<'de> for ValidationRule {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        BuiltinRules::deserialize(deserializer).map(ValidationRule::Shorthand)
    }
}

// ---------------------------------------------------------------------------
// Conditions and options
// ---------------------------------------------------------------------------

/// Shows a field only while another field's value satisfies a comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldCondition {
    /// Key of the observed field.
    pub field: String,
    /// Comparison operator, `eq` when omitted.
    #[serde(default)]
    pub operator: ConditionOperator,
    /// Value compared against. `None` when omitted, which only equals a
    /// missing form value.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub value: Option<Value>,
}

impl FieldCondition {
    /// An `eq` condition on `field`.
    pub fn new(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            operator: ConditionOperator::Eq,
            value: Some(value.into()),
        }
    }

    /// Replaces the operator.
    #[must_use]
    pub fn with_operator(mut self, operator: ConditionOperator) -> Self {
        self.operator = operator;
        self
    }
}

/// A selectable option of a select, radio, or checkbox field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldOption {
    /// Display text.
    pub label: String,
    /// Value stored in the form data when chosen.
    pub value: Value,
    /// Shown but not selectable.
    #[serde(default)]
    pub disabled: bool,
}

impl FieldOption {
    pub fn new(label: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            disabled: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Field schemas
// ---------------------------------------------------------------------------

/// A field declaration as written by the consumer.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSchema {
    /// Key of this field's value in the form data.
    pub key: String,
    /// Input widget kind.
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Display label.
    pub label: String,
    /// Empty when unset.
    #[serde(default)]
    pub placeholder: Option<String>,
    /// Shorthand for a leading required rule.
    #[serde(default)]
    pub required: Option<bool>,
    /// Checked in order after the required rule.
    #[serde(default)]
    pub rules: Vec<ValidationRule>,
    /// Visibility condition; the field is always visible without one.
    #[serde(default)]
    pub condition: Option<FieldCondition>,
    /// Choices for select, radio, and checkbox fields.
    #[serde(default)]
    pub options: Option<Vec<FieldOption>>,
    /// Seeds the initial form data; `null` counts as unset.
    #[serde(default)]
    pub default_value: Option<Value>,
    /// Read-only input when set.
    #[serde(default)]
    pub disabled: Option<bool>,
}

impl FieldSchema {
    /// A field with every optional property unset.
    pub fn new(key: impl Into<String>, field_type: FieldType, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            field_type,
            label: label.into(),
            placeholder: None,
            required: None,
            rules: Vec::new(),
            condition: None,
            options: None,
            default_value: None,
            disabled: None,
        }
    }

    #[must_use]
    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = Some(true);
        self
    }

    /// Appends a rule (shorthand or predicate).
    #[must_use]
    pub fn rule(mut self, rule: impl Into<ValidationRule>) -> Self {
        self.rules.push(rule.into());
        self
    }

    /// Appends a custom predicate rule.
    #[must_use]
    pub fn predicate<F>(self, f: F) -> Self
    where
        F: Fn(Option<&Value>, &FormData) -> Result<(), String> + Send + Sync + 'static,
    {
        self.rule(ValidationFn::new(f))
    }

    #[must_use]
    pub fn condition(mut self, condition: FieldCondition) -> Self {
        self.condition = Some(condition);
        self
    }

    #[must_use]
    pub fn options(mut self, options: Vec<FieldOption>) -> Self {
        self.options = Some(options);
        self
    }

    #[must_use]
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    #[must_use]
    pub fn disabled(mut self) -> Self {
        self.disabled = Some(true);
        self
    }
}

/// A field with every optional property resolved.
///
/// Produced by [`parse_schema`](super::parse_schema); never mutated
/// afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedField {
    /// Key of this field's value in the form data.
    pub key: String,
    /// Input widget kind.
    pub field_type: FieldType,
    /// Display label.
    pub label: String,
    /// Placeholder text, empty when unset.
    pub placeholder: String,
    /// Whether the field must be filled in.
    pub required: bool,
    /// Declaration order, with the implicit required rule first when
    /// `required` is set.
    pub rules: Vec<ValidationFn>,
    /// Visibility condition; `None` means always visible.
    pub condition: Option<FieldCondition>,
    /// Choices for select, radio, and checkbox fields; empty otherwise.
    pub options: Vec<FieldOption>,
    /// Initial value; `None` leaves the field out of the initial data.
    pub default_value: Option<Value>,
    /// Whether the input is read-only.
    pub disabled: bool,
}

/// Re-expresses a normalized field as raw input.
///
/// The implicit required predicate is not emitted as an explicit rule, so
/// parsing the result again yields the same shape.
impl From<&NormalizedField> for FieldSchema {
    fn from(field: &NormalizedField) -> Self {
        let explicit = usize::from(field.required);
        Self {
            key: field.key.clone(),
            field_type: field.field_type,
            label: field.label.clone(),
            placeholder: Some(field.placeholder.clone()),
            required: Some(field.required),
            rules: field
                .rules
                .iter()
                .skip(explicit)
                .cloned()
                .map(ValidationRule::Predicate)
                .collect(),
            condition: field.condition.clone(),
            options: Some(field.options.clone()),
            default_value: field.default_value.clone(),
            disabled: Some(field.disabled),
        }
    }
}

// ---------------------------------------------------------------------------
// Validation results
// ---------------------------------------------------------------------------

/// Outcome of validating one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldValidationResult {
    /// Whether every rule passed.
    pub valid: bool,
    /// Message of the first failing rule.
    pub message: Option<String>,
}

impl FieldValidationResult {
    #[must_use]
    pub fn valid() -> Self {
        Self {
            valid: true,
            message: None,
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            message: Some(message.into()),
        }
    }
}

/// Validation outcome per field key.
pub type FormValidationResult = BTreeMap<String, FieldValidationResult>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operator_parses_known_and_unknown_strings() {
        let ops: Vec<ConditionOperator> =
            serde_json::from_str(r#"["eq","neq","in","nin","gt"]"#).expect("deserialize");
        assert_eq!(
            ops,
            vec![
                ConditionOperator::Eq,
                ConditionOperator::Neq,
                ConditionOperator::In,
                ConditionOperator::Nin,
                ConditionOperator::Unknown("gt".to_string()),
            ]
        );
    }

    #[test]
    fn operator_serializes_as_bare_string() {
        let json = serde_json::to_string(&ConditionOperator::Nin).expect("serialize");
        assert_eq!(json, r#""nin""#);
        let json = serde_json::to_string(&ConditionOperator::Unknown("like".into()))
            .expect("serialize");
        assert_eq!(json, r#""like""#);
    }

    #[test]
    fn condition_operator_defaults_to_eq() {
        let cond: FieldCondition =
            serde_json::from_str(r#"{"field":"role","value":"admin"}"#).expect("deserialize");
        assert_eq!(cond.operator, ConditionOperator::Eq);
        assert_eq!(cond.value, Some(Value::from("admin")));
    }

    #[test]
    fn condition_without_value_is_none() {
        let cond: FieldCondition = serde_json::from_str(r#"{"field":"x"}"#).expect("deserialize");
        assert_eq!(cond.value, None);
    }

    #[test]
    fn field_schema_deserializes_camel_case() {
        let json = r#"{
            "key": "email",
            "type": "input",
            "label": "Email",
            "required": true,
            "rules": [{"email": true}, {"minLength": 3, "pattern": "^a"}],
            "defaultValue": "a@b.co"
        }"#;
        let field: FieldSchema = serde_json::from_str(json).expect("deserialize");
        assert_eq!(field.key, "email");
        assert_eq!(field.field_type, FieldType::Input);
        assert_eq!(field.required, Some(true));
        assert_eq!(field.rules.len(), 2);
        let ValidationRule::Shorthand(second) = &field.rules[1] else {
            panic!("expected shorthand rule");
        };
        assert_eq!(second.min_length, Some(3));
        assert_eq!(second.pattern.as_ref().map(Regex::as_str), Some("^a"));
        assert_eq!(field.default_value, Some(Value::from("a@b.co")));
        assert!(field.placeholder.is_none());
    }

    #[test]
    fn invalid_pattern_fails_to_load() {
        let result: Result<BuiltinRules, _> = serde_json::from_str(r#"{"pattern":"("}"#);
        assert!(result.is_err());
    }

    #[test]
    fn unknown_field_type_fails_to_load() {
        let result: Result<FieldSchema, _> =
            serde_json::from_str(r#"{"key":"k","type":"slider","label":"K"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn validation_fn_equality_is_identity() {
        let a = ValidationFn::new(|_, _| Ok(()));
        let b = ValidationFn::new(|_, _| Ok(()));
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }

    #[test]
    fn validation_result_serializes_camel_case() {
        let json = serde_json::to_string(&FieldValidationResult::invalid("bad")).expect("serialize");
        assert_eq!(json, r#"{"valid":false,"message":"bad"}"#);
    }
}
