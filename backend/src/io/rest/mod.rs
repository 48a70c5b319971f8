//! # REST API Interface Layer
//!
//! HTTP endpoints for the attendance tracker. Handlers log the request,
//! call one domain service and translate the outcome:
//!
//! - success bodies are the `shared` types serialized as JSON
//! - failures are `{"error": "..."}` with a status derived from
//!   [`DomainError`](crate::domain::DomainError)
//! - the calling user comes from the `X-User-Id` header
//!   ([`identity::CurrentUser`])

pub mod attendance_apis;
pub mod errors;
pub mod export_apis;
pub mod holiday_apis;
pub mod identity;
pub mod target_apis;
pub mod user_apis;

pub use identity::{CurrentUser, USER_ID_HEADER};
