use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::policy::Role;

// --- Core Application Schemas ---

/// UserProfile
///
/// Output schema for the authenticated user's profile (GET /api/me).
/// The identity data comes from the resolved session, not from storage.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct UserProfile {
    pub id: Uuid,
    pub email: String,
    // The RBAC field driving every capability decision.
    pub role: Role,
}

/// Invite
///
/// A pending invitation for a new clinic member. Created exclusively by
/// administrators; the invited user completes sign-up through the external
/// auth collaborator.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct Invite {
    pub id: Uuid,
    pub email: String,
    /// The role the new member will hold once they accept.
    pub role: Role,
    // The administrator who issued the invite.
    pub invited_by: Uuid,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

/// Patient
///
/// A patient registry record. The optional treatment plan is clinical data
/// and is writable only by the full-access tier, while the demographic fields
/// are maintained by the assistant-extended tier.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct Patient {
    pub id: Uuid,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub treatment_plan: Option<TreatmentPlan>,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

/// TreatmentPlan
///
/// Clinical notes attached to a patient, tracked with authorship so the record
/// shows which professional last revised the plan.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct TreatmentPlan {
    pub description: String,
    pub updated_by: Uuid,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

/// Appointment
///
/// A scheduled visit binding a patient to a professional over a time window.
/// Created by the assistant-extended tier (front desk books on behalf of
/// professionals).
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct Appointment {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub professional_id: Uuid,
    #[ts(type = "string")]
    pub starts_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub ends_at: DateTime<Utc>,
    pub notes: Option<String>,
    // Who booked it (not necessarily the professional).
    pub created_by: Uuid,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

/// Payment
///
/// A received payment recorded against a patient. Amounts are integer cents;
/// no floating point in money paths.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct Payment {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub amount_cents: i64,
    /// Free-form method label ("cash", "card", "transfer").
    pub method: String,
    pub recorded_by: Uuid,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

/// ClinicSettings
///
/// The clinic-wide configuration block, writable by the full-access tier and
/// readable by every authenticated member.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct ClinicSettings {
    pub clinic_name: String,
    /// IANA timezone name used for schedule rendering.
    pub timezone: String,
    /// Opening hour, 0-23, in the clinic's timezone.
    pub opening_hour: u8,
    /// Closing hour, 0-23, in the clinic's timezone.
    pub closing_hour: u8,
}

impl Default for ClinicSettings {
    fn default() -> Self {
        Self {
            clinic_name: "Clinic".to_string(),
            timezone: "UTC".to_string(),
            opening_hour: 8,
            closing_hour: 18,
        }
    }
}

// --- Request Payloads (Input Schemas) ---

/// InviteUserRequest
///
/// Input payload for inviting a new member (POST /api/invites). Admin only.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct InviteUserRequest {
    pub email: String,
    pub role: Role,
}

/// CreatePatientRequest
///
/// Input payload for registering a new patient (POST /api/patients).
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct CreatePatientRequest {
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
}

/// UpdatePatientRequest
///
/// Partial update payload for modifying a patient (PUT /api/patients/{id}).
///
/// Uses `Option<T>` for all fields and `#[serde(skip_serializing_if = "Option::is_none")]`
/// to efficiently handle partial updates, ensuring only provided fields are included
/// in the JSON payload.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct UpdatePatientRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// UpdateTreatmentPlanRequest
///
/// Input payload for revising a patient's treatment plan
/// (PUT /api/patients/{id}/treatment-plan). Full-access tier only.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct UpdateTreatmentPlanRequest {
    pub description: String,
}

/// CreateAppointmentRequest
///
/// Input payload for booking an appointment (POST /api/appointments).
/// The booking user is taken from the session, never from the payload.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct CreateAppointmentRequest {
    pub patient_id: Uuid,
    pub professional_id: Uuid,
    #[ts(type = "string")]
    pub starts_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub ends_at: DateTime<Utc>,
    pub notes: Option<String>,
}

/// RecordPaymentRequest
///
/// Input payload for recording a received payment (POST /api/payments).
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct RecordPaymentRequest {
    pub patient_id: Uuid,
    pub amount_cents: i64,
    pub method: String,
}

/// UpdateSettingsRequest
///
/// Partial update payload for the clinic settings (PUT /api/settings).
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct UpdateSettingsRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clinic_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub opening_hour: Option<u8>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub closing_hour: Option<u8>,
}

// --- Output Schemas ---

/// FinanceSummary
///
/// Output schema for the finance dashboard (GET /api/finance/summary).
/// Visible only to the full-access tier.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct FinanceSummary {
    pub total_received_cents: i64,
    pub payment_count: i64,
}
