/*
 * Responsibility
 * - v1 public surface (routes() and the pieces tests reach into)
 */
pub mod dto;
pub mod extractors;
pub mod handlers;
mod routes;

pub use routes::routes;
