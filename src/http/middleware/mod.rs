//! Request middleware applied ahead of the handlers.

pub mod auth;

pub use auth::jwt_validation_middleware;
