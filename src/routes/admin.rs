use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Admin Router Module
///
/// Defines the endpoints exclusively accessible to users with the Admin role.
/// Member invitation is the one capability the policy reserves for
/// administrators alone (`can_invite_users`), so it gets its own module.
///
/// Access Control:
/// Each handler authenticates through the `CurrentUser` extractor and then
/// explicitly checks `can_invite_users` before touching the directory,
/// returning the structured 403 payload to any other tier.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        // GET /api/invites — list pending invitations.
        // POST /api/invites — issue an invitation for a new member.
        .route(
            "/invites",
            get(handlers::get_invites).post(handlers::invite_user),
        )
}
