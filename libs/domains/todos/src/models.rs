use serde::{Deserialize, Deserializer, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Maximum number of characters in a todo title
pub const MAX_LENGTH_TITLE: u64 = 100;

/// Maximum number of characters in a todo description
pub const MAX_LENGTH_DESCRIPTION: u64 = 500;

/// Object name used when building message codes for todo field errors
pub const OBJECT_NAME: &str = "todo";

/// Validator for required text fields, reported under the `NotEmpty` code
fn validate_not_empty(value: &str) -> Result<(), validator::ValidationError> {
    if value.is_empty() {
        return Err(validator::ValidationError::new("NotEmpty"));
    }
    Ok(())
}

/// Read a string that may be `null`, treating `null` like a missing value
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Todo entity - a persisted todo item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Todo {
    /// Identifier, `None` until the todo has been persisted
    pub id: Option<i64>,
    /// Todo title
    pub title: String,
    /// Optional free-form description
    pub description: Option<String>,
}

impl Todo {
    /// Create a new, not yet persisted todo
    pub fn new(title: String, description: Option<String>) -> Self {
        Self {
            id: None,
            title,
            description,
        }
    }

    /// Apply the editable fields of a DTO
    pub fn apply_update(&mut self, input: TodoDto) {
        self.title = input.title;
        self.description = input.description;
    }
}

/// Transport representation of a todo, used for request and response bodies
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
pub struct TodoDto {
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "null_as_empty")]
    #[validate(
        custom(function = "validate_not_empty"),
        length(max = MAX_LENGTH_TITLE, code = "Length")
    )]
    pub title: String,
    #[validate(length(max = MAX_LENGTH_DESCRIPTION, code = "Length"))]
    pub description: Option<String>,
}

impl TodoDto {
    /// Declaration order of validated fields; field errors are reported in this order
    pub const FIELDS: [&'static str; 2] = ["title", "description"];
}

impl From<Todo> for TodoDto {
    fn from(model: Todo) -> Self {
        Self {
            id: model.id,
            title: model.title,
            description: model.description,
        }
    }
}

/// Search index projection of a todo. The index does not store descriptions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TodoDocument {
    pub id: i64,
    pub title: String,
}

impl From<TodoDocument> for TodoDto {
    fn from(document: TodoDocument) -> Self {
        Self {
            id: Some(document.id),
            title: document.title,
            description: None,
        }
    }
}

/// Paging request for search results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageRequest {
    /// Zero-based page number
    #[serde(default)]
    pub page: usize,
    /// Page size
    #[serde(default = "default_page_size")]
    pub size: usize,
}

fn default_page_size() -> usize {
    PageRequest::DEFAULT_SIZE
}

impl PageRequest {
    pub const DEFAULT_SIZE: usize = 10;
    pub const MAX_SIZE: usize = 100;

    pub fn new(page: usize, size: usize) -> Self {
        Self { page, size }
    }

    /// Page size clamped to `1..=MAX_SIZE`
    pub fn limit(&self) -> usize {
        self.size.clamp(1, Self::MAX_SIZE)
    }

    /// Number of results skipped before this page
    pub fn offset(&self) -> usize {
        self.page.saturating_mul(self.limit())
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 0,
            size: Self::DEFAULT_SIZE,
        }
    }
}

/// A single localized field error
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FieldValidationErrorDto {
    /// Path of the invalid field
    pub path: String,
    /// Localized message, `null` when no message could be resolved
    pub message: Option<String>,
}

/// Response body for a failed form validation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FormValidationErrorDto {
    pub field_errors: Vec<FieldValidationErrorDto>,
}
