use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Pages Router Module
///
/// Defines the server-rendered page endpoints, both public (root, sign-in,
/// sign-up) and protected (dashboard, schedule). No access logic lives here:
/// the `route_guard` middleware classifies each request path against the
/// static prefix lists in the `guard` module and redirects before any of
/// these handlers run.
///
/// The path set must stay in agreement with `guard::PUBLIC_ROUTES` and
/// `guard::PROTECTED_ROUTES`; the guard tests assert the decision table
/// against exactly these paths.
pub fn page_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // A simple, unauthenticated endpoint used for monitoring and load balancer checks.
        // Returns "ok" immediately to verify the service is running and responsive.
        // Matched by neither guard list, so it is never redirected.
        .route("/health", get(|| async { "ok" }))
        // Public pages: reachable without a session; a signed-in user is
        // steered from these to the dashboard by the guard.
        .route("/", get(handlers::index_page))
        .route("/sign-in", get(handlers::sign_in_page))
        .route("/sign-up", get(handlers::sign_up_page))
        // Protected pages: the guard redirects sessionless requests to /sign-in.
        .route("/dashboard", get(handlers::dashboard_page))
        .route("/schedule", get(handlers::schedule_page))
}
