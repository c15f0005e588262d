use crate::{
    AppState,
    error::ApiError,
    models::{
        Appointment, ClinicSettings, CreateAppointmentRequest, CreatePatientRequest,
        FinanceSummary, Invite, InviteUserRequest, Patient, Payment, RecordPaymentRequest,
        UpdatePatientRequest, UpdateSettingsRequest, UpdateTreatmentPlanRequest, UserProfile,
    },
    policy,
    session::CurrentUser,
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::Html,
};
use uuid::Uuid;

// --- Page Handlers (gated by the route guard) ---
//
// The real application renders these server-side; here they are minimal
// placeholders so the guard's redirect behavior has concrete targets.
// Access control for this whole group lives in the `route_guard` middleware,
// not in the handlers.

pub async fn index_page() -> Html<&'static str> {
    Html("<h1>Clinic Portal</h1>")
}

pub async fn sign_in_page() -> Html<&'static str> {
    // Credential verification belongs to the external auth collaborator; this
    // page only hosts its form.
    Html("<h1>Sign in</h1>")
}

pub async fn sign_up_page() -> Html<&'static str> {
    Html("<h1>Sign up</h1>")
}

pub async fn dashboard_page() -> Html<&'static str> {
    Html("<h1>Dashboard</h1>")
}

pub async fn schedule_page() -> Html<&'static str> {
    Html("<h1>Schedule</h1>")
}

// --- API Handlers ---

/// get_me
///
/// [Authenticated Route] Provides the authenticated user's profile information.
///
/// *Note*: This handler fabricates the email dynamically from the resolved
/// session ID, simulating data that would typically come from the Auth layer
/// or a profile service.
#[utoipa::path(
    get,
    path = "/api/me",
    responses((status = 200, description = "Profile", body = UserProfile))
)]
pub async fn get_me(CurrentUser { id, role }: CurrentUser) -> Json<UserProfile> {
    Json(UserProfile {
        id,
        email: format!(
            "member_{}@clinic.example",
            id.simple().to_string().chars().take(4).collect::<String>()
        ),
        role,
    })
}

/// invite_user
///
/// [Admin Only] Issues an invitation for a new clinic member.
///
/// *RBAC*: `can_invite_users` — the single capability reserved exclusively
/// for administrators.
#[utoipa::path(
    post,
    path = "/api/invites",
    request_body = InviteUserRequest,
    responses(
        (status = 201, description = "Invite created", body = Invite),
        (status = 403, description = "Not authorized")
    )
)]
pub async fn invite_user(
    CurrentUser { id, role }: CurrentUser,
    State(state): State<AppState>,
    Json(payload): Json<InviteUserRequest>,
) -> Result<(StatusCode, Json<Invite>), ApiError> {
    if !policy::can_invite_users(Some(role)) {
        return Err(ApiError::forbidden("invite users"));
    }
    let invite = state.directory.create_invite(payload, id).await;
    Ok((StatusCode::CREATED, Json(invite)))
}

/// get_invites
///
/// [Admin Only] Lists pending invitations.
#[utoipa::path(
    get,
    path = "/api/invites",
    responses(
        (status = 200, description = "Pending invites", body = [Invite]),
        (status = 403, description = "Not authorized")
    )
)]
pub async fn get_invites(
    CurrentUser { role, .. }: CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<Invite>>, ApiError> {
    if !policy::can_invite_users(Some(role)) {
        return Err(ApiError::forbidden("view invites"));
    }
    Ok(Json(state.directory.get_invites().await))
}

/// get_settings
///
/// [Authenticated Route] Returns the clinic-wide settings block. Readable by
/// every member; writes are restricted separately.
#[utoipa::path(
    get,
    path = "/api/settings",
    responses((status = 200, description = "Settings", body = ClinicSettings))
)]
pub async fn get_settings(
    _user: CurrentUser,
    State(state): State<AppState>,
) -> Json<ClinicSettings> {
    Json(state.directory.get_settings().await)
}

/// update_settings
///
/// [Full Access] Partially updates the clinic settings.
///
/// *RBAC*: `can_manage_settings` — Admin or Professional.
#[utoipa::path(
    put,
    path = "/api/settings",
    request_body = UpdateSettingsRequest,
    responses(
        (status = 200, description = "Updated", body = ClinicSettings),
        (status = 403, description = "Not authorized")
    )
)]
pub async fn update_settings(
    CurrentUser { role, .. }: CurrentUser,
    State(state): State<AppState>,
    Json(payload): Json<UpdateSettingsRequest>,
) -> Result<Json<ClinicSettings>, ApiError> {
    if !policy::can_manage_settings(Some(role)) {
        return Err(ApiError::forbidden("manage clinic settings"));
    }
    Ok(Json(state.directory.update_settings(payload).await))
}

/// get_finance_summary
///
/// [Full Access] Aggregated payment totals for the finance dashboard.
///
/// *RBAC*: `can_manage_finance` — Admin or Professional. Assistants never see
/// money.
#[utoipa::path(
    get,
    path = "/api/finance/summary",
    responses(
        (status = 200, description = "Summary", body = FinanceSummary),
        (status = 403, description = "Not authorized")
    )
)]
pub async fn get_finance_summary(
    CurrentUser { role, .. }: CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<FinanceSummary>, ApiError> {
    if !policy::can_manage_finance(Some(role)) {
        return Err(ApiError::forbidden("view financial data"));
    }
    Ok(Json(state.directory.finance_summary().await))
}

/// record_payment
///
/// [Full Access] Records a received payment against a patient.
#[utoipa::path(
    post,
    path = "/api/payments",
    request_body = RecordPaymentRequest,
    responses(
        (status = 201, description = "Recorded", body = Payment),
        (status = 403, description = "Not authorized"),
        (status = 404, description = "Unknown patient")
    )
)]
pub async fn record_payment(
    CurrentUser { id, role }: CurrentUser,
    State(state): State<AppState>,
    Json(payload): Json<RecordPaymentRequest>,
) -> Result<(StatusCode, Json<Payment>), ApiError> {
    if !policy::can_manage_finance(Some(role)) {
        return Err(ApiError::forbidden("record payments"));
    }
    if payload.amount_cents <= 0 {
        return Err(ApiError::bad_request("Payment amount must be positive."));
    }
    match state.directory.record_payment(payload, id).await {
        Some(payment) => Ok((StatusCode::CREATED, Json(payment))),
        None => Err(ApiError::not_found("Patient")),
    }
}

/// get_patients
///
/// [Authenticated Route] Lists the patient registry. All roles work with the
/// registry day to day, so reads require only a session.
#[utoipa::path(
    get,
    path = "/api/patients",
    responses((status = 200, description = "Patients", body = [Patient]))
)]
pub async fn get_patients(_user: CurrentUser, State(state): State<AppState>) -> Json<Vec<Patient>> {
    Json(state.directory.get_patients().await)
}

/// create_patient
///
/// [Assistant Access] Registers a new patient.
///
/// *RBAC*: `can_manage_patients` — the assistant-extended tier; the front desk
/// registers walk-ins.
#[utoipa::path(
    post,
    path = "/api/patients",
    request_body = CreatePatientRequest,
    responses(
        (status = 201, description = "Created", body = Patient),
        (status = 403, description = "Not authorized")
    )
)]
pub async fn create_patient(
    CurrentUser { role, .. }: CurrentUser,
    State(state): State<AppState>,
    Json(payload): Json<CreatePatientRequest>,
) -> Result<(StatusCode, Json<Patient>), ApiError> {
    if !policy::can_manage_patients(Some(role)) {
        return Err(ApiError::forbidden("manage patients"));
    }
    let patient = state.directory.create_patient(payload).await;
    Ok((StatusCode::CREATED, Json(patient)))
}

/// update_patient
///
/// [Assistant Access] Partially updates a patient's demographic record.
#[utoipa::path(
    put,
    path = "/api/patients/{id}",
    params(("id" = Uuid, Path, description = "Patient ID")),
    request_body = UpdatePatientRequest,
    responses(
        (status = 200, description = "Updated", body = Patient),
        (status = 403, description = "Not authorized"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update_patient(
    CurrentUser { role, .. }: CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdatePatientRequest>,
) -> Result<Json<Patient>, ApiError> {
    if !policy::can_manage_patients(Some(role)) {
        return Err(ApiError::forbidden("manage patients"));
    }
    match state.directory.update_patient(id, payload).await {
        Some(patient) => Ok(Json(patient)),
        None => Err(ApiError::not_found("Patient")),
    }
}

/// delete_patient
///
/// [Full Access] Removes a patient and their appointments.
///
/// *RBAC*: `can_delete_patients` — deliberately narrower than
/// `can_manage_patients`; deletion is destructive and excluded from the
/// assistant tier.
#[utoipa::path(
    delete,
    path = "/api/patients/{id}",
    params(("id" = Uuid, Path, description = "Patient ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 403, description = "Not authorized"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_patient(
    CurrentUser { role, .. }: CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if !policy::can_delete_patients(Some(role)) {
        return Err(ApiError::forbidden("delete patients"));
    }
    if state.directory.delete_patient(id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found("Patient"))
    }
}

/// update_treatment_plan
///
/// [Full Access] Revises a patient's treatment plan.
///
/// *RBAC*: `can_manage_clinical_data` — clinical records are off-limits to
/// assistants even though they manage the same patients' demographics.
#[utoipa::path(
    put,
    path = "/api/patients/{id}/treatment-plan",
    params(("id" = Uuid, Path, description = "Patient ID")),
    request_body = UpdateTreatmentPlanRequest,
    responses(
        (status = 200, description = "Updated", body = Patient),
        (status = 403, description = "Not authorized"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update_treatment_plan(
    CurrentUser { id: user_id, role }: CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateTreatmentPlanRequest>,
) -> Result<Json<Patient>, ApiError> {
    if !policy::can_manage_clinical_data(Some(role)) {
        return Err(ApiError::forbidden("manage clinical data"));
    }
    match state.directory.set_treatment_plan(id, payload, user_id).await {
        Some(patient) => Ok(Json(patient)),
        None => Err(ApiError::not_found("Patient")),
    }
}

/// get_appointments
///
/// [Authenticated Route] Lists the appointment book.
#[utoipa::path(
    get,
    path = "/api/appointments",
    responses((status = 200, description = "Appointments", body = [Appointment]))
)]
pub async fn get_appointments(
    _user: CurrentUser,
    State(state): State<AppState>,
) -> Json<Vec<Appointment>> {
    Json(state.directory.get_appointments().await)
}

/// create_appointment
///
/// [Assistant Access] Books an appointment for a patient with a professional.
/// The booking user is taken from the session, never from the payload.
///
/// *RBAC*: `can_create_appointments` — the assistant-extended tier.
#[utoipa::path(
    post,
    path = "/api/appointments",
    request_body = CreateAppointmentRequest,
    responses(
        (status = 201, description = "Booked", body = Appointment),
        (status = 400, description = "Invalid time window"),
        (status = 403, description = "Not authorized"),
        (status = 404, description = "Unknown patient")
    )
)]
pub async fn create_appointment(
    CurrentUser { id, role }: CurrentUser,
    State(state): State<AppState>,
    Json(payload): Json<CreateAppointmentRequest>,
) -> Result<(StatusCode, Json<Appointment>), ApiError> {
    if !policy::can_create_appointments(Some(role)) {
        return Err(ApiError::forbidden("create appointments"));
    }
    if payload.starts_at >= payload.ends_at {
        return Err(ApiError::bad_request(
            "Appointment must end after it starts.",
        ));
    }
    match state.directory.create_appointment(payload, id).await {
        Some(appointment) => Ok((StatusCode::CREATED, Json(appointment))),
        None => Err(ApiError::not_found("Patient")),
    }
}
