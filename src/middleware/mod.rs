/*
 * Responsibility
 * - auth: bearer authentication + role guard (route-scoped)
 * - bearer_auth: Authorization header parsing
 * - cors / http: router-wide layers
 */
pub mod auth;
pub mod bearer_auth;
pub mod cors;
pub mod http;
