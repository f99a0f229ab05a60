use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::get,
};
use axum_helpers::{
    IdPath, JsonBody,
    errors::responses::{
        BadRequestIdResponse, BadRequestJsonResponse, InternalServerErrorResponse,
        NotFoundResponse,
    },
};
use std::sync::Arc;
use utoipa::OpenApi;

use core_config::i18n::I18nConfig;

use crate::controller::TodoController;
use crate::error::TodoResult;
use crate::i18n::{
    I18nError, LocaleNegotiator, MessageBundle, RequestLocaleResolver, locale_middleware,
};
use crate::models::{FieldValidationErrorDto, FormValidationErrorDto, PageRequest, TodoDto};
use crate::repository::InMemoryTodoRepository;
use crate::search::InMemoryTodoIndex;
use crate::service::RepositoryTodoService;

const TAG: &str = "todo";

/// OpenAPI documentation for the Todo API
#[derive(OpenApi)]
#[openapi(
    paths(
        find_all,
        add,
        find_by_id,
        update,
        delete_by_id,
        count_search_results,
        search,
    ),
    components(
        schemas(TodoDto, PageRequest, FormValidationErrorDto, FieldValidationErrorDto),
        responses(
            NotFoundResponse,
            BadRequestIdResponse,
            BadRequestJsonResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = TAG, description = "Todo management and search endpoints")
    )
)]
pub struct ApiDoc;

type SharedController = Arc<TodoController>;

/// Create the todo router with all HTTP endpoints.
///
/// Every request runs inside the locale negotiated from its
/// `Accept-Language` header.
pub fn router(controller: TodoController, negotiator: Arc<LocaleNegotiator>) -> Router {
    Router::new()
        .route("/", get(find_all).post(add))
        .route("/{id}", get(find_by_id).put(update).delete(delete_by_id))
        .route("/search/count/{searchTerm}", get(count_search_results))
        .route("/search/{searchTerm}", get(search))
        .with_state(Arc::new(controller))
        .layer(middleware::from_fn_with_state(negotiator, locale_middleware))
}

/// Build the router backed by the in-memory repository and search index,
/// localizing messages with the embedded bundles.
pub fn in_memory_router(config: &I18nConfig) -> Result<Router, I18nError> {
    let service = Arc::new(RepositoryTodoService::new(
        InMemoryTodoRepository::new(),
        InMemoryTodoIndex::new(),
    ));
    let negotiator = Arc::new(LocaleNegotiator::from_config(config)?);
    let locale_resolver = RequestLocaleResolver::new(negotiator.default_locale().clone());

    let controller = TodoController::new(
        service.clone(),
        service,
        Arc::new(locale_resolver),
        Arc::new(MessageBundle::embedded(config)?),
    );

    Ok(router(controller, negotiator))
}

/// Render the controller result, localizing validation failures
fn respond<T: IntoResponse>(controller: &TodoController, result: TodoResult<T>) -> Response {
    match result {
        Ok(body) => body.into_response(),
        Err(error) => controller.error_response(error),
    }
}

/// List all todos
#[utoipa::path(
    get,
    path = "",
    tag = TAG,
    responses(
        (status = 200, description = "All todos", body = Vec<TodoDto>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn find_all(State(controller): State<SharedController>) -> Response {
    let result = controller.find_all().await.map(Json);
    respond(&controller, result)
}

/// Add a new todo
#[utoipa::path(
    post,
    path = "",
    tag = TAG,
    request_body = TodoDto,
    responses(
        (status = 201, description = "Todo added", body = TodoDto),
        (status = 400, description = "Form validation failed", body = FormValidationErrorDto),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn add(
    State(controller): State<SharedController>,
    JsonBody(dto): JsonBody<TodoDto>,
) -> Response {
    let result = controller
        .add(dto)
        .await
        .map(|added| (StatusCode::CREATED, Json(added)));
    respond(&controller, result)
}

/// Get a todo by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = i64, Path, description = "Todo ID")
    ),
    responses(
        (status = 200, description = "Todo found", body = TodoDto),
        (status = 400, response = BadRequestIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn find_by_id(State(controller): State<SharedController>, IdPath(id): IdPath) -> Response {
    let result = controller.find_by_id(id).await.map(Json);
    respond(&controller, result)
}

/// Update a todo
#[utoipa::path(
    put,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = i64, Path, description = "Todo ID")
    ),
    request_body = TodoDto,
    responses(
        (status = 200, description = "Todo updated", body = TodoDto),
        (status = 400, description = "Form validation failed", body = FormValidationErrorDto),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update(
    State(controller): State<SharedController>,
    IdPath(id): IdPath,
    JsonBody(dto): JsonBody<TodoDto>,
) -> Response {
    let result = controller.update(dto, id).await.map(Json);
    respond(&controller, result)
}

/// Delete a todo, returning the deleted entry
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = i64, Path, description = "Todo ID")
    ),
    responses(
        (status = 200, description = "Todo deleted", body = TodoDto),
        (status = 400, response = BadRequestIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_by_id(State(controller): State<SharedController>, IdPath(id): IdPath) -> Response {
    let result = controller.delete_by_id(id).await.map(Json);
    respond(&controller, result)
}

/// Count todos matching a search term
#[utoipa::path(
    get,
    path = "/search/count/{searchTerm}",
    tag = TAG,
    params(
        ("searchTerm" = String, Path, description = "Words matched against title and description")
    ),
    responses(
        (status = 200, description = "Number of matching todos", body = u64),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn count_search_results(
    State(controller): State<SharedController>,
    Path(search_term): Path<String>,
) -> Response {
    let result = controller.count_search_results(&search_term).await.map(Json);
    respond(&controller, result)
}

/// Search todos, newest first
#[utoipa::path(
    get,
    path = "/search/{searchTerm}",
    tag = TAG,
    params(
        ("searchTerm" = String, Path, description = "Words matched against title and description"),
        PageRequest
    ),
    responses(
        (status = 200, description = "One page of matching todos without descriptions", body = Vec<TodoDto>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn search(
    State(controller): State<SharedController>,
    Path(search_term): Path<String>,
    Query(page): Query<PageRequest>,
) -> Response {
    let result = controller.search(&search_term, page).await.map(Json);
    respond(&controller, result)
}
