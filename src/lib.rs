use axum::{Router, extract::FromRef, http::HeaderName, middleware};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

// Core application services and components.
pub mod config;
pub mod directory;
pub mod error;
pub mod guard;
pub mod handlers;
pub mod models;
pub mod policy;
pub mod session;

// Module for routing segregation (Pages, API, Admin).
pub mod routes;
use routes::{admin, api, pages};

// --- Public Re-exports ---

// Makes core state types easily accessible to the main application entry point (main.rs).
pub use config::AppConfig;
pub use directory::{DirectoryState, InMemoryDirectory};
pub use session::{JwtSessionResolver, SessionState};

/// ApiDoc
///
/// This struct auto-generates the OpenAPI documentation (Swagger JSON) for the application.
/// It aggregates all API paths and data schemas that have been decorated with
/// the `#[utoipa::path]` and `#[derive(utoipa::ToSchema)]` macros.
/// The resulting JSON is served at `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    // List all public handler functions here for documentation generation.
    paths(
        handlers::get_me, handlers::invite_user, handlers::get_invites,
        handlers::get_settings, handlers::update_settings,
        handlers::get_finance_summary, handlers::record_payment,
        handlers::get_patients, handlers::create_patient, handlers::update_patient,
        handlers::delete_patient, handlers::update_treatment_plan,
        handlers::get_appointments, handlers::create_appointment
    ),
    // List all models (schemas) used in the request/response bodies.
    components(
        schemas(
            policy::Role, error::ErrorBody,
            models::UserProfile, models::Invite, models::InviteUserRequest,
            models::Patient, models::TreatmentPlan, models::UpdateTreatmentPlanRequest,
            models::CreatePatientRequest, models::UpdatePatientRequest,
            models::Appointment, models::CreateAppointmentRequest,
            models::Payment, models::RecordPaymentRequest, models::FinanceSummary,
            models::ClinicSettings, models::UpdateSettingsRequest,
        )
    ),
    tags(
        (name = "clinic-portal", description = "Clinic Portal Access API")
    )
)]
struct ApiDoc;

/// AppState
///
/// Implements the **Unified State Pattern**. This is the single, thread-safe, and immutable
/// container holding all essential application services and configuration.
/// The application state is shared across all incoming requests.
#[derive(Clone)]
pub struct AppState {
    /// Data Layer: the clinic's working records behind the `Directory` trait.
    pub directory: DirectoryState,
    /// Session Layer: the injected auth collaborator. Both the route guard and
    /// the `CurrentUser` extractor resolve sessions exclusively through this
    /// handle — no ambient auth state anywhere.
    pub sessions: SessionState,
    /// Configuration: The loaded, immutable environment configuration.
    pub config: AppConfig,
}

// --- Axum FromRef Extractor Implementations ---

// These implementations allow handlers and extractors to selectively pull
// components from the shared AppState. This is critical for dependency
// injection: `CurrentUser` needs only the session layer, never the whole state.

impl FromRef<AppState> for DirectoryState {
    fn from_ref(app_state: &AppState) -> DirectoryState {
        app_state.directory.clone()
    }
}

impl FromRef<AppState> for SessionState {
    fn from_ref(app_state: &AppState) -> SessionState {
        app_state.sessions.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// create_router
///
/// Assembles the application's entire routing structure, applies global and scoped middleware,
/// and registers the application state.
pub fn create_router(state: AppState) -> Router {
    // 1. CORS Configuration
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    // Header name constant for Request Correlation.
    let x_request_id = HeaderName::from_static("x-request-id");

    // 2. Base Router Assembly
    let base_router = Router::new()
        // Documentation: Serve the auto-generated Swagger UI.
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Pages: public and protected, gated by the route guard below.
        .merge(pages::page_routes())
        // API: JSON endpoints under /api. The guard classifies /api as neither
        // public nor protected and passes it through; the `CurrentUser`
        // extractor and the policy predicates take over from there.
        .nest("/api", api::api_routes().merge(admin::admin_routes()))
        // Route Guard: evaluated once per inbound request, before any handler
        // logic. Resolves the session via the injected collaborator and applies
        // the public/protected decision table.
        .layer(middleware::from_fn_with_state(
            state.clone(),
            guard::route_guard,
        ))
        // Apply the Unified State to all routes.
        .with_state(state);

    // 3. Observability and Correlation Layers (Applied outermost/first)
    base_router
        .layer(
            ServiceBuilder::new()
                // 3a. Request ID Generation: Generates a unique UUID for every incoming request.
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                // 3b. Request Tracing: Wraps the entire request/response lifecycle in a tracing span.
                // Uses the `trace_span_logger` to include the generated request ID.
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                // 3c. Request ID Propagation: Ensures the generated x-request-id header is
                // returned to the client and injected into subsequent service calls.
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        // 4. CORS Layer (Applied last, allowing all traffic in/out after processing)
        .layer(cors)
}

/// trace_span_logger
///
/// Helper function used by `TraceLayer` to customize the tracing span creation.
/// It extracts the `x-request-id` header (if present) and includes it in the
/// structured logging metadata alongside the HTTP method and URI.
///
/// *Goal*: Ensure every log line for a single request is correlated by a unique ID.
/// The session contents are deliberately never part of the span.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    // The structured log format used by the tracing macros.
    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
