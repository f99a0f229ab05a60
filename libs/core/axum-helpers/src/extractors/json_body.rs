//! JSON body extractor with structured rejections.

use crate::errors::AppError;
use axum::{
    extract::{FromRequest, Json, Request},
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;

/// JSON extractor that renders rejections as [`AppError`] responses.
///
/// Unlike a validating extractor it only deserializes the body; validation
/// is left to the handler so failures can be reported in a domain format.
///
/// # Example
/// ```ignore
/// use axum::Router;
/// use axum::routing::post;
/// use axum_helpers::extractors::JsonBody;
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct CreateTodo {
///     title: String,
/// }
///
/// async fn create_todo(JsonBody(payload): JsonBody<CreateTodo>) -> String {
///     format!("Creating todo: {}", payload.title)
/// }
///
/// let app = Router::new().route("/todo", post(create_todo));
/// ```
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(data) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::from(e).into_response())?;

        Ok(JsonBody(data))
    }
}
