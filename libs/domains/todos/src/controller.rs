//! Request handler for todo operations.
//!
//! [`TodoController`] validates input, delegates to the persistence and
//! search services, and turns form validation failures into localized
//! [`FormValidationErrorDto`]s.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use validator::Validate;

use crate::error::{TodoError, TodoResult};
use crate::i18n::{Locale, LocaleResolver, MessageResolver};
use crate::models::{
    FieldValidationErrorDto, FormValidationErrorDto, OBJECT_NAME, PageRequest, TodoDto,
};
use crate::service::{TodoSearchService, TodoService};
use crate::validation::{FieldError, FormValidationError};

#[derive(Clone)]
pub struct TodoController {
    service: Arc<dyn TodoService>,
    search_service: Arc<dyn TodoSearchService>,
    locale_resolver: Arc<dyn LocaleResolver>,
    message_resolver: Arc<dyn MessageResolver>,
}

impl TodoController {
    pub fn new(
        service: Arc<dyn TodoService>,
        search_service: Arc<dyn TodoSearchService>,
        locale_resolver: Arc<dyn LocaleResolver>,
        message_resolver: Arc<dyn MessageResolver>,
    ) -> Self {
        Self {
            service,
            search_service,
            locale_resolver,
            message_resolver,
        }
    }

    /// Validate and add a new todo
    pub async fn add(&self, dto: TodoDto) -> TodoResult<TodoDto> {
        validate(&dto)?;

        let added = self.service.add(dto).await?;
        Ok(added.into())
    }

    /// Validate and update the todo identified by `id`.
    ///
    /// The path id always wins over any id in the body.
    pub async fn update(&self, mut dto: TodoDto, id: i64) -> TodoResult<TodoDto> {
        validate(&dto)?;

        dto.id = Some(id);
        let updated = self.service.update(dto).await?;
        Ok(updated.into())
    }

    /// Delete a todo and return it as it was before deletion
    pub async fn delete_by_id(&self, id: i64) -> TodoResult<TodoDto> {
        let deleted = self.service.delete_by_id(id).await?;
        Ok(deleted.into())
    }

    pub async fn find_by_id(&self, id: i64) -> TodoResult<TodoDto> {
        let found = self.service.find_by_id(id).await?;
        Ok(found.into())
    }

    pub async fn find_all(&self) -> TodoResult<Vec<TodoDto>> {
        let models = self.service.find_all().await?;
        Ok(models.into_iter().map(TodoDto::from).collect())
    }

    pub async fn count_search_results(&self, search_term: &str) -> TodoResult<u64> {
        self.search_service.count_search_results(search_term).await
    }

    /// Search todos; results carry the id and title only
    pub async fn search(&self, search_term: &str, page: PageRequest) -> TodoResult<Vec<TodoDto>> {
        let documents = self.search_service.search(search_term, page).await?;
        Ok(documents.into_iter().map(TodoDto::from).collect())
    }

    /// Translate a form validation failure into localized field messages.
    ///
    /// The locale is resolved once. For each field error the candidate codes
    /// are tried in order until one resolves to a message other than the code
    /// itself; otherwise the last lookup result is used.
    pub fn handle_form_validation_error(
        &self,
        error: &FormValidationError,
    ) -> FormValidationErrorDto {
        let locale = self.locale_resolver.current_locale();

        let field_errors = error
            .field_errors()
            .iter()
            .map(|field_error| FieldValidationErrorDto {
                path: field_error.field.clone(),
                message: self.resolve_message(field_error, &locale),
            })
            .collect();

        FormValidationErrorDto { field_errors }
    }

    fn resolve_message(&self, field_error: &FieldError, locale: &Locale) -> Option<String> {
        let mut message = None;
        for code in &field_error.codes {
            message = self
                .message_resolver
                .get_message(code, &field_error.arguments, locale);
            if message.as_deref().is_some_and(|resolved| resolved != code) {
                break;
            }
        }
        message
    }

    /// Render a handler failure; validation failures become a localized 400
    pub fn error_response(&self, error: TodoError) -> Response {
        match error {
            TodoError::FormValidation(validation_error) => {
                tracing::warn!(error = %validation_error, "Rejected invalid todo");
                let body = self.handle_form_validation_error(&validation_error);
                (StatusCode::BAD_REQUEST, Json(body)).into_response()
            }
            other => other.into_response(),
        }
    }
}

fn validate(dto: &TodoDto) -> TodoResult<()> {
    dto.validate().map_err(|errors| {
        FormValidationError::from_validation_errors(OBJECT_NAME, &errors, &TodoDto::FIELDS).into()
    })
}
