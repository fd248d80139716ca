/*!
 * Request identity
 *
 * Responsibility:
 * - Provide the verified caller (Identity) to middleware and handlers
 * - axum glue lives in core, the type itself in types
 */

mod core;
mod types;

pub use types::{Identity, IdentityError};
