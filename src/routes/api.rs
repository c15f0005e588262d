use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{delete, get, post, put},
};

/// API Router Module
///
/// Defines the member-facing JSON API, nested under `/api` by the main router.
/// The `/api` prefix is matched by neither of the guard's path lists, so the
/// route-guard middleware always passes these requests through; access control
/// is the `CurrentUser` extractor (401 without a session) plus the per-handler
/// `policy` predicate (structured 403 on an insufficient role).
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // GET /api/me
        // The authenticated user's own profile, resolved from the session.
        .route("/me", get(handlers::get_me))
        // --- Patient Registry ---
        // GET: any member. POST/PUT: assistant-extended tier. DELETE: full tier
        // only — destroying a record is withheld from the front desk.
        .route(
            "/patients",
            get(handlers::get_patients).post(handlers::create_patient),
        )
        .route(
            "/patients/{id}",
            put(handlers::update_patient).delete(handlers::delete_patient),
        )
        // PUT /api/patients/{id}/treatment-plan
        // Clinical data: full tier only.
        .route(
            "/patients/{id}/treatment-plan",
            put(handlers::update_treatment_plan),
        )
        // --- Scheduling ---
        // Booking is the assistant-extended tier's core capability.
        .route(
            "/appointments",
            get(handlers::get_appointments).post(handlers::create_appointment),
        )
        // --- Clinic Settings ---
        // Read: any member. Write: full tier.
        .route(
            "/settings",
            get(handlers::get_settings).put(handlers::update_settings),
        )
        // --- Finance ---
        // Full tier only, reads included: assistants never see money.
        .route("/finance/summary", get(handlers::get_finance_summary))
        .route("/payments", post(handlers::record_payment))
}
