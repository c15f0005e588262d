use clinic_portal::{
    AppConfig, AppState, create_router,
    directory::{DirectoryState, InMemoryDirectory},
    error::ErrorBody,
    models::{Appointment, ClinicSettings, FinanceSummary, Invite, Patient, Payment, UserProfile},
    policy::Role,
    session::{JwtSessionResolver, SessionState},
};
use chrono::{Duration, Utc};
use std::sync::Arc;
use tokio::net::TcpListener;
use uuid::Uuid;

#[derive(Debug)]
pub struct TestApp {
    pub address: String,
}

async fn spawn_app() -> TestApp {
    // AppConfig::default() runs Env::Local, enabling the x-user-id/x-user-role
    // dev bypass the tests below use to assert sessions per-request.
    let config = AppConfig::default();
    let directory = Arc::new(InMemoryDirectory::new()) as DirectoryState;
    let sessions = Arc::new(JwtSessionResolver::new(config.clone())) as SessionState;

    let state = AppState {
        directory,
        sessions,
        config,
    };
    let router = create_router(state);

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    TestApp { address }
}

/// Attach a dev-bypass session with the given role to a request.
fn with_role(req: reqwest::RequestBuilder, role: &str) -> reqwest::RequestBuilder {
    req.header("x-user-id", Uuid::new_v4().to_string())
        .header("x-user-role", role)
}

#[tokio::test]
async fn me_reflects_the_session_role() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    let response = with_role(client.get(format!("{}/api/me", app.address)), "PROFESSIONAL")
        .send()
        .await
        .expect("req fail");
    assert_eq!(response.status(), 200);

    let profile: UserProfile = response.json().await.unwrap();
    assert_eq!(profile.role, Role::Professional);
}

#[tokio::test]
async fn sessionless_api_request_gets_structured_401() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{}/api/patients", app.address))
        .send()
        .await
        .expect("req fail");

    assert_eq!(response.status(), 401);
    let body: ErrorBody = response.json().await.unwrap();
    assert_eq!(body.error, "unauthenticated");
}

#[tokio::test]
async fn invites_are_admin_only() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();
    let payload = serde_json::json!({ "email": "new.doc@clinic.example", "role": "PROFESSIONAL" });

    // Professional and Assistant are declined with the structured payload.
    for role in ["PROFESSIONAL", "ASSISTANT"] {
        let response = with_role(client.post(format!("{}/api/invites", app.address)), role)
            .json(&payload)
            .send()
            .await
            .expect("req fail");
        assert_eq!(response.status(), 403, "role {} must be declined", role);
        let body: ErrorBody = response.json().await.unwrap();
        assert_eq!(body.error, "not_authorized");
    }

    // Admin succeeds.
    let response = with_role(client.post(format!("{}/api/invites", app.address)), "ADMIN")
        .json(&payload)
        .send()
        .await
        .expect("req fail");
    assert_eq!(response.status(), 201);
    let invite: Invite = response.json().await.unwrap();
    assert_eq!(invite.email, "new.doc@clinic.example");
    assert_eq!(invite.role, Role::Professional);

    // And can list what was issued.
    let response = with_role(client.get(format!("{}/api/invites", app.address)), "ADMIN")
        .send()
        .await
        .expect("req fail");
    let invites: Vec<Invite> = response.json().await.unwrap();
    assert_eq!(invites.len(), 1);
}

#[tokio::test]
async fn patient_lifecycle_respects_the_two_tiers() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    // 1. The front desk registers a walk-in (assistant tier).
    let response = with_role(client.post(format!("{}/api/patients", app.address)), "ASSISTANT")
        .json(&serde_json::json!({ "name": "Maria Souza", "phone": "+55 11 98765-4321" }))
        .send()
        .await
        .expect("req fail");
    assert_eq!(response.status(), 201);
    let patient: Patient = response.json().await.unwrap();

    // 2. The assistant may correct demographics.
    let response = with_role(
        client.put(format!("{}/api/patients/{}", app.address, patient.id)),
        "ASSISTANT",
    )
    .json(&serde_json::json!({ "email": "maria@example.com" }))
    .send()
    .await
    .expect("req fail");
    assert_eq!(response.status(), 200);
    let updated: Patient = response.json().await.unwrap();
    assert_eq!(updated.email.as_deref(), Some("maria@example.com"));
    // Partial update: untouched fields survive.
    assert_eq!(updated.name, "Maria Souza");

    // 3. ...but not destroy the record.
    let response = with_role(
        client.delete(format!("{}/api/patients/{}", app.address, patient.id)),
        "ASSISTANT",
    )
    .send()
    .await
    .expect("req fail");
    assert_eq!(response.status(), 403);

    // 4. A professional can.
    let response = with_role(
        client.delete(format!("{}/api/patients/{}", app.address, patient.id)),
        "PROFESSIONAL",
    )
    .send()
    .await
    .expect("req fail");
    assert_eq!(response.status(), 204);

    // 5. The registry is empty again.
    let response = with_role(client.get(format!("{}/api/patients", app.address)), "ASSISTANT")
        .send()
        .await
        .expect("req fail");
    let patients: Vec<Patient> = response.json().await.unwrap();
    assert!(patients.is_empty());
}

#[tokio::test]
async fn treatment_plans_are_clinical_data() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    let response = with_role(client.post(format!("{}/api/patients", app.address)), "ASSISTANT")
        .json(&serde_json::json!({ "name": "João Lima" }))
        .send()
        .await
        .expect("req fail");
    let patient: Patient = response.json().await.unwrap();

    let plan_url = format!("{}/api/patients/{}/treatment-plan", app.address, patient.id);
    let payload = serde_json::json!({ "description": "Root canal, two sessions" });

    // The assistant who registered the patient cannot write clinical data.
    let response = with_role(client.put(&plan_url), "ASSISTANT")
        .json(&payload)
        .send()
        .await
        .expect("req fail");
    assert_eq!(response.status(), 403);

    // A professional can.
    let response = with_role(client.put(&plan_url), "PROFESSIONAL")
        .json(&payload)
        .send()
        .await
        .expect("req fail");
    assert_eq!(response.status(), 200);
    let updated: Patient = response.json().await.unwrap();
    assert_eq!(
        updated.treatment_plan.unwrap().description,
        "Root canal, two sessions"
    );
}

#[tokio::test]
async fn assistants_book_appointments() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    let response = with_role(client.post(format!("{}/api/patients", app.address)), "ASSISTANT")
        .json(&serde_json::json!({ "name": "Ana Alves" }))
        .send()
        .await
        .expect("req fail");
    let patient: Patient = response.json().await.unwrap();

    let starts_at = Utc::now() + Duration::hours(24);
    let ends_at = starts_at + Duration::minutes(30);
    let professional_id = Uuid::new_v4();

    let response = with_role(
        client.post(format!("{}/api/appointments", app.address)),
        "ASSISTANT",
    )
    .json(&serde_json::json!({
        "patient_id": patient.id,
        "professional_id": professional_id,
        "starts_at": starts_at,
        "ends_at": ends_at,
        "notes": "first visit"
    }))
    .send()
    .await
    .expect("req fail");
    assert_eq!(response.status(), 201);
    let appointment: Appointment = response.json().await.unwrap();
    assert_eq!(appointment.patient_id, patient.id);

    // The booking shows up in the shared book.
    let response = with_role(
        client.get(format!("{}/api/appointments", app.address)),
        "PROFESSIONAL",
    )
    .send()
    .await
    .expect("req fail");
    let book: Vec<Appointment> = response.json().await.unwrap();
    assert_eq!(book.len(), 1);
}

#[tokio::test]
async fn appointment_validation_rejects_bad_input() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    let response = with_role(client.post(format!("{}/api/patients", app.address)), "ASSISTANT")
        .json(&serde_json::json!({ "name": "Ana Alves" }))
        .send()
        .await
        .expect("req fail");
    let patient: Patient = response.json().await.unwrap();

    let starts_at = Utc::now() + Duration::hours(24);

    // Inverted time window.
    let response = with_role(
        client.post(format!("{}/api/appointments", app.address)),
        "ASSISTANT",
    )
    .json(&serde_json::json!({
        "patient_id": patient.id,
        "professional_id": Uuid::new_v4(),
        "starts_at": starts_at,
        "ends_at": starts_at - Duration::minutes(30),
    }))
    .send()
    .await
    .expect("req fail");
    assert_eq!(response.status(), 400);

    // Unknown patient.
    let response = with_role(
        client.post(format!("{}/api/appointments", app.address)),
        "ASSISTANT",
    )
    .json(&serde_json::json!({
        "patient_id": Uuid::new_v4(),
        "professional_id": Uuid::new_v4(),
        "starts_at": starts_at,
        "ends_at": starts_at + Duration::minutes(30),
    }))
    .send()
    .await
    .expect("req fail");
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn finance_is_hidden_from_assistants() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    let response = with_role(
        client.get(format!("{}/api/finance/summary", app.address)),
        "ASSISTANT",
    )
    .send()
    .await
    .expect("req fail");
    assert_eq!(response.status(), 403);
    let body: ErrorBody = response.json().await.unwrap();
    assert_eq!(body.error, "not_authorized");
}

#[tokio::test]
async fn payments_roll_up_into_the_summary() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    let response = with_role(client.post(format!("{}/api/patients", app.address)), "ASSISTANT")
        .json(&serde_json::json!({ "name": "Carlos Dias" }))
        .send()
        .await
        .expect("req fail");
    let patient: Patient = response.json().await.unwrap();

    for amount in [15_000, 7_500] {
        let response = with_role(client.post(format!("{}/api/payments", app.address)), "ADMIN")
            .json(&serde_json::json!({
                "patient_id": patient.id,
                "amount_cents": amount,
                "method": "card"
            }))
            .send()
            .await
            .expect("req fail");
        assert_eq!(response.status(), 201);
        let payment: Payment = response.json().await.unwrap();
        assert_eq!(payment.amount_cents, amount);
    }

    let response = with_role(
        client.get(format!("{}/api/finance/summary", app.address)),
        "PROFESSIONAL",
    )
    .send()
    .await
    .expect("req fail");
    assert_eq!(response.status(), 200);
    let summary: FinanceSummary = response.json().await.unwrap();
    assert_eq!(summary.total_received_cents, 22_500);
    assert_eq!(summary.payment_count, 2);
}

#[tokio::test]
async fn settings_are_readable_by_all_writable_by_full_tier() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    // Every member may read.
    let response = with_role(client.get(format!("{}/api/settings", app.address)), "ASSISTANT")
        .send()
        .await
        .expect("req fail");
    assert_eq!(response.status(), 200);

    // Assistants may not write.
    let response = with_role(client.put(format!("{}/api/settings", app.address)), "ASSISTANT")
        .json(&serde_json::json!({ "clinic_name": "Sneaky Rename" }))
        .send()
        .await
        .expect("req fail");
    assert_eq!(response.status(), 403);

    // The full tier may.
    let response = with_role(client.put(format!("{}/api/settings", app.address)), "ADMIN")
        .json(&serde_json::json!({ "clinic_name": "Sorriso Dental", "opening_hour": 9 }))
        .send()
        .await
        .expect("req fail");
    assert_eq!(response.status(), 200);
    let settings: ClinicSettings = response.json().await.unwrap();
    assert_eq!(settings.clinic_name, "Sorriso Dental");
    assert_eq!(settings.opening_hour, 9);
    // Partial update: unmentioned fields keep their defaults.
    assert_eq!(settings.closing_hour, 18);
}
