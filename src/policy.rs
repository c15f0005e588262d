use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utoipa::ToSchema;

/// Role
///
/// The closed set of identity tiers used for Role-Based Access Control (RBAC)
/// across the clinic. Every authenticated session carries exactly one role,
/// resolved by the session layer and passed **by value** into the capability
/// predicates below.
///
/// The set is closed on purpose: a token carrying a role string outside this
/// enum fails deserialization in the session layer, and the request is treated
/// as unauthenticated ("no access") rather than being mapped to a default tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export)]
pub enum Role {
    /// Clinic owner/administrator. The only tier allowed to invite new users.
    Admin,
    /// Licensed professional (doctor, dentist). Full operational access.
    Professional,
    /// Front-desk assistant. Scheduling and patient registry only.
    Assistant,
}

impl std::str::FromStr for Role {
    type Err = ();

    /// Parses the wire representation used in tokens and dev-bypass headers.
    /// Anything outside the closed set is an error; callers must treat that
    /// as "no access", never as a default tier.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ADMIN" => Ok(Role::Admin),
            "PROFESSIONAL" => Ok(Role::Professional),
            "ASSISTANT" => Ok(Role::Assistant),
            _ => Err(()),
        }
    }
}

// --- Base Tiers ---
//
// The capability table is composed from exactly two base predicates so that
// adding a capability can never introduce an inconsistent role list. Every
// predicate is a total, pure function of `Option<Role>`: `None` models an
// unauthenticated (or role-less) session and is denied everywhere.

/// has_full_access
///
/// The "full" tier: Admin and Professional. Grants settings, finance,
/// clinical data, and patient deletion.
pub fn has_full_access(role: Option<Role>) -> bool {
    matches!(role, Some(Role::Admin) | Some(Role::Professional))
}

/// has_assistant_access
///
/// The "assistant-extended" tier: everything in the full tier plus Assistant.
/// Grants appointment creation and patient create/update.
pub fn has_assistant_access(role: Option<Role>) -> bool {
    has_full_access(role) || matches!(role, Some(Role::Assistant))
}

// --- Capability Predicates ---
//
// One predicate per user-facing capability. Handlers call these with
// `Some(session.role)` and map a `false` to a structured 403; UI clients use
// the same decisions (mirrored via the exported TS types) to hide actions.

/// Only administrators may invite new members into the clinic.
pub fn can_invite_users(role: Option<Role>) -> bool {
    matches!(role, Some(Role::Admin))
}

/// Clinic configuration (name, hours, notification templates).
pub fn can_manage_settings(role: Option<Role>) -> bool {
    has_full_access(role)
}

/// Billing, payments, and financial summaries.
pub fn can_manage_finance(role: Option<Role>) -> bool {
    has_full_access(role)
}

/// Treatment plans, attendance records, and other clinical data.
pub fn can_manage_clinical_data(role: Option<Role>) -> bool {
    has_full_access(role)
}

/// Scheduling: assistants book appointments on behalf of professionals.
pub fn can_create_appointments(role: Option<Role>) -> bool {
    has_assistant_access(role)
}

/// Patient registry create/update. Deliberately wider than deletion.
pub fn can_manage_patients(role: Option<Role>) -> bool {
    has_assistant_access(role)
}

/// Patient deletion is destructive and excluded from the assistant tier.
pub fn can_delete_patients(role: Option<Role>) -> bool {
    has_full_access(role)
}
