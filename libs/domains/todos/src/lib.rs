//! Todos Domain
//!
//! Todo management with full-text search and localized validation messages.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints, locale middleware
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐     ┌─────────────┐
//! │ Controller  │ ──▶ │    i18n     │  ← Locale + message resolution
//! └──────┬──────┘     └─────────────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Persistence + search index sync
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐     ┌─────────────┐
//! │ Repository  │     │   Search    │  ← Storage and index (trait + in-memory)
//! └──────┬──────┘     └──────┬──────┘
//!        │                   │
//! ┌──────▼───────────────────▼──────┐
//! │             Models              │  ← Entity, DTOs, documents
//! └─────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use core_config::i18n::I18nConfig;
//! use domain_todos::{
//!     handlers,
//!     i18n::{LocaleNegotiator, MessageBundle, RequestLocaleResolver},
//!     InMemoryTodoIndex, InMemoryTodoRepository, RepositoryTodoService, TodoController,
//! };
//!
//! let config = I18nConfig::default();
//! let service = Arc::new(RepositoryTodoService::new(
//!     InMemoryTodoRepository::new(),
//!     InMemoryTodoIndex::new(),
//! ));
//! let negotiator = Arc::new(LocaleNegotiator::from_config(&config).unwrap());
//! let controller = TodoController::new(
//!     service.clone(),
//!     service,
//!     Arc::new(RequestLocaleResolver::new(negotiator.default_locale().clone())),
//!     Arc::new(MessageBundle::embedded(&config).unwrap()),
//! );
//!
//! // Create Axum router
//! let router = handlers::router(controller, negotiator);
//! ```

pub mod controller;
pub mod error;
pub mod handlers;
pub mod i18n;
pub mod models;
pub mod repository;
pub mod search;
pub mod service;
pub mod validation;

// Re-export commonly used types
pub use controller::TodoController;
pub use error::{TodoError, TodoResult};
pub use models::{
    FieldValidationErrorDto, FormValidationErrorDto, PageRequest, Todo, TodoDocument, TodoDto,
};
pub use repository::{InMemoryTodoRepository, TodoRepository};
pub use search::{InMemoryTodoIndex, TodoIndex};
pub use service::{RepositoryTodoService, TodoSearchService, TodoService};
pub use validation::{FieldError, FormValidationError};
