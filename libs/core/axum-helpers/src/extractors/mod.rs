//! Custom extractors for Axum handlers.
//!
//! These extractors reject malformed input with a structured
//! [`AppError`](crate::errors::AppError) response instead of axum's plain
//! text rejections.

pub mod id_path;
pub mod json_body;

pub use id_path::IdPath;
pub use json_body::JsonBody;
