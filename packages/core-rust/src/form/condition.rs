//! Field visibility: which fields are shown for the current form data.

use super::types::{ConditionOperator, NormalizedField};
use crate::value::{field_value, strict_eq_opt, FormData, Value};

fn contains(target: Option<&Value>, current: Option<&Value>) -> Option<bool> {
    let items = target?.as_array()?;
    Some(items.iter().any(|item| strict_eq_opt(Some(item), current)))
}

/// Applies one operator.
///
/// `In` and `Nin` both evaluate to `false` when the target is not an array,
/// and an unknown operator always evaluates to `false`.
fn evaluate_operator(
    operator: &ConditionOperator,
    current: Option<&Value>,
    target: Option<&Value>,
) -> bool {
    match operator {
        ConditionOperator::Eq => strict_eq_opt(current, target),
        ConditionOperator::Neq => !strict_eq_opt(current, target),
        ConditionOperator::In => contains(target, current).unwrap_or(false),
        ConditionOperator::Nin => contains(target, current).is_some_and(|found| !found),
        ConditionOperator::Unknown(op) => {
            tracing::trace!(operator = %op, "unknown condition operator, hiding field");
            false
        }
    }
}

/// Whether `field` should be shown for `form_data`.
///
/// Fields without a condition are always visible.
#[must_use]
pub fn is_field_visible(field: &NormalizedField, form_data: &FormData) -> bool {
    let Some(condition) = &field.condition else {
        return true;
    };
    let current = field_value(form_data, &condition.field);
    evaluate_operator(&condition.operator, current, condition.value.as_ref())
}

/// The fields currently shown, in schema order.
#[must_use]
pub fn get_visible_fields<'a>(
    fields: &'a [NormalizedField],
    form_data: &FormData,
) -> Vec<&'a NormalizedField> {
    fields
        .iter()
        .filter(|field| is_field_visible(field, form_data))
        .collect()
}

/// Keys of the fields currently hidden, in schema order.
///
/// Callers use this to drop hidden fields' values before submitting; this
/// function does not touch the form data.
#[must_use]
pub fn get_hidden_field_keys(fields: &[NormalizedField], form_data: &FormData) -> Vec<String> {
    fields
        .iter()
        .filter(|field| !is_field_visible(field, form_data))
        .map(|field| field.key.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::schema_parser::parse_schema;
    use crate::form::types::{FieldCondition, FieldSchema, FieldType};

    fn field_with(condition: Option<FieldCondition>) -> NormalizedField {
        let mut schema = FieldSchema::new("target", FieldType::Input, "Target");
        schema.condition = condition;
        parse_schema(&[schema]).remove(0)
    }

    fn data(pairs: &[(&str, Value)]) -> FormData {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), v.clone()))
            .collect()
    }

    fn cond(op: ConditionOperator, value: Value) -> Option<FieldCondition> {
        Some(FieldCondition::new("role", value).with_operator(op))
    }

    fn list(items: &[&str]) -> Value {
        Value::Array(items.iter().map(|s| Value::from(*s)).collect())
    }

    #[test]
    fn no_condition_is_always_visible() {
        assert!(is_field_visible(&field_with(None), &FormData::new()));
    }

    #[test]
    fn eq_and_neq() {
        let eq = field_with(cond(ConditionOperator::Eq, Value::from("eng")));
        let neq = field_with(cond(ConditionOperator::Neq, Value::from("eng")));
        let eng = data(&[("role", Value::from("eng"))]);
        let pm = data(&[("role", Value::from("pm"))]);
        assert!(is_field_visible(&eq, &eng));
        assert!(!is_field_visible(&eq, &pm));
        assert!(!is_field_visible(&neq, &eng));
        assert!(is_field_visible(&neq, &pm));
    }

    #[test]
    fn eq_is_strict() {
        let field = field_with(cond(ConditionOperator::Eq, Value::Int(1)));
        assert!(!is_field_visible(&field, &data(&[("role", Value::from("1"))])));
        assert!(is_field_visible(&field, &data(&[("role", Value::Float(1.0))])));
    }

    #[test]
    fn missing_value_is_not_null() {
        let field = field_with(cond(ConditionOperator::Eq, Value::Null));
        assert!(!is_field_visible(&field, &FormData::new()));
        assert!(is_field_visible(&field, &data(&[("role", Value::Null)])));

        let no_target = field_with(Some(FieldCondition {
            field: "role".to_string(),
            operator: ConditionOperator::Eq,
            value: None,
        }));
        assert!(is_field_visible(&no_target, &FormData::new()));
    }

    #[test]
    fn in_and_nin_with_array_target() {
        let is_in = field_with(cond(ConditionOperator::In, list(&["a", "b"])));
        let not_in = field_with(cond(ConditionOperator::Nin, list(&["a", "b"])));
        let a = data(&[("role", Value::from("a"))]);
        let c = data(&[("role", Value::from("c"))]);
        assert!(is_field_visible(&is_in, &a));
        assert!(!is_field_visible(&is_in, &c));
        assert!(!is_field_visible(&not_in, &a));
        assert!(is_field_visible(&not_in, &c));
        assert!(is_field_visible(&not_in, &FormData::new()));
    }

    #[test]
    fn in_and_nin_hide_on_non_array_target() {
        let is_in = field_with(cond(ConditionOperator::In, Value::from("a")));
        let not_in = field_with(cond(ConditionOperator::Nin, Value::from("a")));
        for form in [data(&[("role", Value::from("a"))]), data(&[("role", Value::from("z"))])] {
            assert!(!is_field_visible(&is_in, &form));
            assert!(!is_field_visible(&not_in, &form));
        }
    }

    #[test]
    fn unknown_operator_hides() {
        let field = field_with(cond(
            ConditionOperator::Unknown("gt".to_string()),
            Value::from("a"),
        ));
        assert!(!is_field_visible(&field, &data(&[("role", Value::from("a"))])));
    }

    #[test]
    fn visible_and_hidden_partition_preserves_order() {
        let schema = vec![
            FieldSchema::new("role", FieldType::Select, "Role"),
            FieldSchema::new("stack", FieldType::Input, "Stack")
                .condition(FieldCondition::new("role", "eng")),
            FieldSchema::new("portfolio", FieldType::Input, "Portfolio")
                .condition(FieldCondition::new("role", "design")),
            FieldSchema::new("note", FieldType::Textarea, "Note"),
        ];
        let fields = parse_schema(&schema);
        let form = data(&[("role", Value::from("eng"))]);

        let visible: Vec<&str> = get_visible_fields(&fields, &form)
            .iter()
            .map(|f| f.key.as_str())
            .collect();
        assert_eq!(visible, vec!["role", "stack", "note"]);
        assert_eq!(get_hidden_field_keys(&fields, &form), vec!["portfolio".to_string()]);
    }
}
