use axum::Router;
use core_config::i18n::I18nConfig;
use domain_todos::handlers;

/// Mount point of the todo routes below `/api`
pub const TODO_PATH: &str = "/todo";

/// Creates the API routes without the `/api` prefix.
/// The `/api` prefix will be added by the `create_router` helper.
///
/// Returns a stateless Router (all sub-routers have state already applied).
pub fn routes(i18n: &I18nConfig) -> eyre::Result<Router> {
    let todos = handlers::in_memory_router(i18n)
        .map_err(|e| eyre::eyre!("Failed to initialize todo routes: {}", e))?;

    Ok(Router::new().nest(TODO_PATH, todos))
}
