/*
 * Responsibility
 * - v1 URL structure
 * - Which routes need a bearer token (route_layer) and which role (RequiredRole)
 *
 * Notes
 * - route_layer order matters: the role guard must sit *inside* authentication,
 *   so it is layered first and wrapped by `authenticated()` afterwards
 */
use axum::{
    Router, middleware,
    routing::{delete, get, post},
};

use crate::api::v1::handlers::{
    health::health,
    users::{create_user, delete_user, get_me, get_user, get_user_by_email, update_user},
};
use crate::domain::user::ADMIN_ROLE;
use crate::middleware::auth::{RequiredRole, access, role};
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    let authenticated = || middleware::from_fn_with_state(state.clone(), access::authenticate);
    let admin_only =
        middleware::from_fn_with_state(RequiredRole::new(ADMIN_ROLE), role::require_role);

    Router::new()
        .route("/health", get(health))
        // POST is public (sign-up); lookup by email is not.
        .route(
            "/users",
            post(create_user).merge(get(get_user_by_email).route_layer(authenticated())),
        )
        .route("/users/me", get(get_me).route_layer(authenticated()))
        .route(
            "/users/{user_id}",
            get(get_user)
                .put(update_user)
                .merge(delete(delete_user).route_layer(admin_only))
                .route_layer(authenticated()),
        )
}
