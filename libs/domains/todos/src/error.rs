use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;

use crate::validation::FormValidationError;

#[derive(Debug, Error)]
pub enum TodoError {
    #[error("Todo not found: {0}")]
    NotFound(i64),

    #[error("Form validation failed: {0}")]
    FormValidation(FormValidationError),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type TodoResult<T> = Result<T, TodoError>;

impl From<FormValidationError> for TodoError {
    fn from(error: FormValidationError) -> Self {
        TodoError::FormValidation(error)
    }
}

/// Convert TodoError to AppError for standardized error responses.
///
/// Form validation errors are normally localized by the controller before
/// they reach this conversion.
impl From<TodoError> for AppError {
    fn from(err: TodoError) -> Self {
        match err {
            TodoError::NotFound(id) => AppError::NotFound(format!("Todo {} not found", id)),
            TodoError::FormValidation(error) => AppError::BadRequest(error.to_string()),
            TodoError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for TodoError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_not_found_maps_to_404() {
        let response = TodoError::NotFound(42).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_untranslated_validation_error_maps_to_400() {
        let response = TodoError::FormValidation(FormValidationError::default()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_internal_maps_to_500() {
        let response = TodoError::Internal("index unavailable".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
