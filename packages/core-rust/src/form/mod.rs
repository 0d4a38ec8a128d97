//! Form engine: schema normalization, conditional visibility, and validation.
//!
//! A typical update cycle re-derives everything from the current data:
//!
//! ```
//! use liquid_logic_core::form::{
//!     get_visible_fields, is_form_valid, parse_schema, validate_form, FieldCondition,
//!     FieldSchema, FieldType,
//! };
//! use liquid_logic_core::{FormData, Value};
//!
//! let fields = parse_schema(&[
//!     FieldSchema::new("role", FieldType::Select, "Role").required(),
//!     FieldSchema::new("stack", FieldType::Input, "Stack")
//!         .required()
//!         .condition(FieldCondition::new("role", "eng")),
//! ]);
//!
//! let mut data = FormData::new();
//! data.insert("role".to_string(), Value::from("pm"));
//!
//! let visible = get_visible_fields(&fields, &data);
//! assert_eq!(visible.len(), 1);
//! assert!(is_form_valid(&validate_form(&visible, &data)));
//! ```

pub mod condition;
pub mod schema_parser;
pub mod types;
pub mod validator;

pub use condition::{get_hidden_field_keys, get_visible_fields, is_field_visible};
pub use schema_parser::{build_initial_values, parse_schema};
pub use types::{
    BuiltinRules, ConditionOperator, FieldCondition, FieldOption, FieldSchema, FieldType,
    FieldValidationResult, FormValidationResult, NormalizedField, ValidationFn, ValidationRule,
};
pub use validator::{extract_errors, is_form_valid, validate_field, validate_form};
