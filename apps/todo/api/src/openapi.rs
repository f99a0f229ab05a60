use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    components(
        schemas(axum_helpers::ErrorResponse)
    ),
    info(
        title = "Todo API",
        version = "0.1.0",
        description = "API for managing and searching todos with localized validation errors"
    ),
    servers(
        (url = "/api", description = "API base path")
    ),
    nest(
        (path = crate::api::TODO_PATH, api = domain_todos::handlers::ApiDoc)
    )
)]
pub struct ApiDoc;
