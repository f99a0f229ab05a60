//! Structured form validation failures.
//!
//! A [`FormValidationError`] carries one [`FieldError`] per violated
//! constraint. Each field error lists candidate message codes from the most
//! specific to the most generic, so a message resolver can fall back from
//! `NotEmpty.todo.title` to `NotEmpty.title` to `NotEmpty`.

use serde_json::Value;
use validator::ValidationErrors;

/// Parameters of a constraint that become message arguments, in order
const ARGUMENT_PARAMS: [&str; 2] = ["max", "min"];

/// A single validation violation tied to one input field
#[derive(Debug, Clone, PartialEq)]
pub struct FieldError {
    pub object_name: String,
    pub field: String,
    pub codes: Vec<String>,
    pub arguments: Vec<Value>,
}

impl FieldError {
    /// Build a field error for `constraint`, deriving the candidate codes
    pub fn new(object_name: &str, field: &str, constraint: &str, arguments: Vec<Value>) -> Self {
        Self {
            object_name: object_name.to_string(),
            field: field.to_string(),
            codes: message_codes(object_name, field, constraint),
            arguments,
        }
    }

    /// Build a field error with explicit candidate codes
    pub fn with_codes(object_name: &str, field: &str, codes: Vec<String>) -> Self {
        Self {
            object_name: object_name.to_string(),
            field: field.to_string(),
            codes,
            arguments: Vec::new(),
        }
    }
}

/// Candidate message codes for a constraint, most specific first
pub fn message_codes(object_name: &str, field: &str, constraint: &str) -> Vec<String> {
    vec![
        format!("{constraint}.{object_name}.{field}"),
        format!("{constraint}.{field}"),
        constraint.to_string(),
    ]
}

/// Ordered collection of field errors raised when a form fails validation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormValidationError {
    field_errors: Vec<FieldError>,
}

impl FormValidationError {
    pub fn new(field_errors: Vec<FieldError>) -> Self {
        Self { field_errors }
    }

    pub fn field_errors(&self) -> &[FieldError] {
        &self.field_errors
    }

    /// Convert `validator` errors into an ordered form validation error.
    ///
    /// Fields are emitted in `field_order`; fields missing from it come last,
    /// sorted by name.
    pub fn from_validation_errors(
        object_name: &str,
        errors: &ValidationErrors,
        field_order: &[&str],
    ) -> Self {
        let mut fields: Vec<(String, Vec<FieldError>)> = errors
            .field_errors()
            .into_iter()
            .map(|(field, violations)| {
                let field = field.to_string();
                let field_errors = violations
                    .iter()
                    .map(|violation| {
                        let arguments = ARGUMENT_PARAMS
                            .iter()
                            .filter_map(|param| violation.params.get(*param).cloned())
                            .collect();
                        FieldError::new(object_name, &field, &violation.code, arguments)
                    })
                    .collect();
                (field, field_errors)
            })
            .collect();

        fields.sort_by(|(a, _), (b, _)| {
            let position = |name: &str| {
                field_order
                    .iter()
                    .position(|candidate| *candidate == name)
                    .unwrap_or(field_order.len())
            };
            position(a).cmp(&position(b)).then_with(|| a.cmp(b))
        });

        Self {
            field_errors: fields.into_iter().flat_map(|(_, errors)| errors).collect(),
        }
    }
}

impl std::fmt::Display for FormValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let fields: Vec<&str> = self
            .field_errors
            .iter()
            .map(|error| error.field.as_str())
            .collect();
        write!(f, "invalid fields: {}", fields.join(", "))
    }
}
