use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{
    Appointment, ClinicSettings, CreateAppointmentRequest, CreatePatientRequest, FinanceSummary,
    Invite, InviteUserRequest, Patient, Payment, RecordPaymentRequest, TreatmentPlan,
    UpdatePatientRequest, UpdateSettingsRequest, UpdateTreatmentPlanRequest,
};

/// Directory
///
/// Defines the abstract contract for the clinic's working data: invites,
/// patients, appointments, payments, and settings. Handlers interact with this
/// trait, not with a concrete store, so the access-control layer stays
/// independent of whatever persistence the deployment wires in.
///
/// **Send + Sync + async_trait** are required to make the trait object
/// (`Arc<dyn Directory>`) safely shareable and usable across Axum's
/// asynchronous task boundaries.
///
/// Note: authorization is NOT this layer's job. Every method assumes the
/// calling handler has already passed the relevant `policy` predicate.
#[async_trait]
pub trait Directory: Send + Sync {
    // --- Invites ---
    async fn create_invite(&self, req: InviteUserRequest, invited_by: Uuid) -> Invite;
    async fn get_invites(&self) -> Vec<Invite>;

    // --- Patients ---
    async fn create_patient(&self, req: CreatePatientRequest) -> Patient;
    // Partial update; returns None when the patient does not exist.
    async fn update_patient(&self, id: Uuid, req: UpdatePatientRequest) -> Option<Patient>;
    // Returns true if a patient was removed. Removes their appointments too.
    async fn delete_patient(&self, id: Uuid) -> bool;
    async fn get_patients(&self) -> Vec<Patient>;
    async fn set_treatment_plan(
        &self,
        patient_id: Uuid,
        req: UpdateTreatmentPlanRequest,
        updated_by: Uuid,
    ) -> Option<Patient>;

    // --- Appointments ---
    // Returns None when the referenced patient does not exist.
    async fn create_appointment(
        &self,
        req: CreateAppointmentRequest,
        created_by: Uuid,
    ) -> Option<Appointment>;
    async fn get_appointments(&self) -> Vec<Appointment>;

    // --- Settings ---
    async fn get_settings(&self) -> ClinicSettings;
    async fn update_settings(&self, req: UpdateSettingsRequest) -> ClinicSettings;

    // --- Finance ---
    // Returns None when the referenced patient does not exist.
    async fn record_payment(&self, req: RecordPaymentRequest, recorded_by: Uuid)
    -> Option<Payment>;
    async fn finance_summary(&self) -> FinanceSummary;
}

/// DirectoryState
///
/// The concrete type used to share the data layer access across the application state.
pub type DirectoryState = Arc<dyn Directory>;

/// All mutable clinic data behind a single lock. Contention is irrelevant at
/// the sizes this in-memory store is meant for (development and tests).
#[derive(Default)]
struct DirectoryInner {
    invites: Vec<Invite>,
    patients: HashMap<Uuid, Patient>,
    appointments: Vec<Appointment>,
    payments: Vec<Payment>,
    settings: ClinicSettings,
}

/// InMemoryDirectory
///
/// The in-process implementation of the `Directory` trait, backed by a
/// `tokio::sync::RwLock`. This is the store used by the dev server and the
/// integration tests; a persistent implementation would slot in behind the
/// same trait.
#[derive(Default)]
pub struct InMemoryDirectory {
    inner: RwLock<DirectoryInner>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Directory for InMemoryDirectory {
    async fn create_invite(&self, req: InviteUserRequest, invited_by: Uuid) -> Invite {
        let invite = Invite {
            id: Uuid::new_v4(),
            email: req.email,
            role: req.role,
            invited_by,
            created_at: Utc::now(),
        };
        self.inner.write().await.invites.push(invite.clone());
        invite
    }

    async fn get_invites(&self) -> Vec<Invite> {
        self.inner.read().await.invites.clone()
    }

    async fn create_patient(&self, req: CreatePatientRequest) -> Patient {
        let now = Utc::now();
        let patient = Patient {
            id: Uuid::new_v4(),
            name: req.name,
            phone: req.phone,
            email: req.email,
            treatment_plan: None,
            created_at: now,
            updated_at: now,
        };
        self.inner
            .write()
            .await
            .patients
            .insert(patient.id, patient.clone());
        patient
    }

    async fn update_patient(&self, id: Uuid, req: UpdatePatientRequest) -> Option<Patient> {
        let mut inner = self.inner.write().await;
        let patient = inner.patients.get_mut(&id)?;

        // COALESCE-style partial update: absent fields keep their value.
        if let Some(name) = req.name {
            patient.name = name;
        }
        if let Some(phone) = req.phone {
            patient.phone = Some(phone);
        }
        if let Some(email) = req.email {
            patient.email = Some(email);
        }
        patient.updated_at = Utc::now();

        Some(patient.clone())
    }

    async fn delete_patient(&self, id: Uuid) -> bool {
        let mut inner = self.inner.write().await;
        let removed = inner.patients.remove(&id).is_some();
        if removed {
            // Orphaned appointments make no sense without their patient.
            inner.appointments.retain(|a| a.patient_id != id);
        }
        removed
    }

    async fn get_patients(&self) -> Vec<Patient> {
        let mut patients: Vec<Patient> = self.inner.read().await.patients.values().cloned().collect();
        // HashMap iteration order is unstable; present a deterministic listing.
        patients.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        patients
    }

    async fn set_treatment_plan(
        &self,
        patient_id: Uuid,
        req: UpdateTreatmentPlanRequest,
        updated_by: Uuid,
    ) -> Option<Patient> {
        let mut inner = self.inner.write().await;
        let patient = inner.patients.get_mut(&patient_id)?;

        let now = Utc::now();
        patient.treatment_plan = Some(TreatmentPlan {
            description: req.description,
            updated_by,
            updated_at: now,
        });
        patient.updated_at = now;

        Some(patient.clone())
    }

    async fn create_appointment(
        &self,
        req: CreateAppointmentRequest,
        created_by: Uuid,
    ) -> Option<Appointment> {
        let mut inner = self.inner.write().await;

        // Referential check: no bookings for unknown patients.
        if !inner.patients.contains_key(&req.patient_id) {
            return None;
        }

        let appointment = Appointment {
            id: Uuid::new_v4(),
            patient_id: req.patient_id,
            professional_id: req.professional_id,
            starts_at: req.starts_at,
            ends_at: req.ends_at,
            notes: req.notes,
            created_by,
            created_at: Utc::now(),
        };
        inner.appointments.push(appointment.clone());
        Some(appointment)
    }

    async fn get_appointments(&self) -> Vec<Appointment> {
        self.inner.read().await.appointments.clone()
    }

    async fn get_settings(&self) -> ClinicSettings {
        self.inner.read().await.settings.clone()
    }

    async fn update_settings(&self, req: UpdateSettingsRequest) -> ClinicSettings {
        let mut inner = self.inner.write().await;

        if let Some(clinic_name) = req.clinic_name {
            inner.settings.clinic_name = clinic_name;
        }
        if let Some(timezone) = req.timezone {
            inner.settings.timezone = timezone;
        }
        if let Some(opening_hour) = req.opening_hour {
            inner.settings.opening_hour = opening_hour;
        }
        if let Some(closing_hour) = req.closing_hour {
            inner.settings.closing_hour = closing_hour;
        }

        inner.settings.clone()
    }

    async fn record_payment(
        &self,
        req: RecordPaymentRequest,
        recorded_by: Uuid,
    ) -> Option<Payment> {
        let mut inner = self.inner.write().await;

        if !inner.patients.contains_key(&req.patient_id) {
            return None;
        }

        let payment = Payment {
            id: Uuid::new_v4(),
            patient_id: req.patient_id,
            amount_cents: req.amount_cents,
            method: req.method,
            recorded_by,
            created_at: Utc::now(),
        };
        inner.payments.push(payment.clone());
        Some(payment)
    }

    async fn finance_summary(&self) -> FinanceSummary {
        let inner = self.inner.read().await;
        FinanceSummary {
            total_received_cents: inner.payments.iter().map(|p| p.amount_cents).sum(),
            payment_count: inner.payments.len() as i64,
        }
    }
}
