use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserType {
    Patient,
    Doctor,
    Admin,
}

impl UserType {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserType::Patient => "patient",
            UserType::Doctor => "doctor",
            UserType::Admin => "admin",
        }
    }
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The authenticated account as returned by `GET /users/me/` and inside
/// the login/registration payloads. A non-authoritative copy; the backend
/// owns the real record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identity {
    pub id: i64,
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub profile_picture: Option<String>,
    pub user_type: UserType,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Opaque bearer tokens. The client never inspects these, it only attaches
/// the access token to requests and hands the refresh token back to the
/// server on logout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialPair {
    pub access: String,
    pub refresh: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Specialty {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
}

/// One weekly schedule row for a doctor. Times stay wire-format strings
/// ("HH:MM:SS"); the client only displays and round-trips them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schedule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub day_of_week: u8,
    pub start_time: String,
    pub end_time: String,
    #[serde(default)]
    pub is_available: bool,
    #[serde(default = "default_slot_duration")]
    pub slot_duration: u32,
}

fn default_slot_duration() -> u32 {
    30
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoctorProfile {
    pub id: i64,
    pub user: Identity,
    #[serde(default)]
    pub specialization: Vec<Specialty>,
    #[serde(default)]
    pub experience_years: i32,
    #[serde(default)]
    pub qualification: String,
    #[serde(default)]
    pub registration_number: String,
    // Decimal fields arrive as strings ("500.00"); the client never does
    // arithmetic on them.
    #[serde(default)]
    pub consultation_fee: String,
    #[serde(default)]
    pub clinic_address: String,
    #[serde(default)]
    pub clinic_city: String,
    #[serde(default)]
    pub clinic_state: String,
    #[serde(default)]
    pub clinic_pincode: String,
    #[serde(default)]
    pub online_consultation_available: bool,
    #[serde(default)]
    pub is_approved: bool,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub rating: String,
    #[serde(default)]
    pub total_reviews: i32,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl DoctorProfile {
    pub fn display_name(&self) -> String {
        if self.user.full_name.is_empty() {
            format!("{} {}", self.user.first_name, self.user.last_name)
                .trim()
                .to_string()
        } else {
            self.user.full_name.clone()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientProfile {
    pub id: i64,
    pub user: Identity,
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub blood_group: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub pincode: Option<String>,
    #[serde(default)]
    pub emergency_contact: Option<String>,
    #[serde(default)]
    pub medical_history: Option<String>,
}

/// Partial update for `PUT /patients/update_profile/`; `None` fields are
/// omitted.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PatientUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blood_group: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pincode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emergency_contact: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub medical_history: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
    NoShow,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Pending => "pending",
            AppointmentStatus::Confirmed => "confirmed",
            AppointmentStatus::Completed => "completed",
            AppointmentStatus::Cancelled => "cancelled",
            AppointmentStatus::NoShow => "no_show",
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentType {
    InPerson,
    Online,
}

impl fmt::Display for AppointmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AppointmentType::InPerson => "in_person",
            AppointmentType::Online => "online",
        })
    }
}

/// Appointment as the backend serializes it. `status` only ever moves by
/// server-side actions (approve/reject/cancel/update_status); the client
/// requests a transition and reflects whatever comes back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: i64,
    #[serde(default)]
    pub patient: Option<PatientProfile>,
    #[serde(default)]
    pub doctor: Option<DoctorProfile>,
    pub appointment_date: NaiveDate,
    pub appointment_time: String,
    pub appointment_type: AppointmentType,
    pub status: AppointmentStatus,
    #[serde(default)]
    pub symptoms: String,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub cancellation_reason: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub cancelled_at: Option<DateTime<Utc>>,
}

impl Appointment {
    pub fn patient_name(&self) -> &str {
        self.patient
            .as_ref()
            .map(|p| p.user.full_name.as_str())
            .unwrap_or("")
    }

    pub fn doctor_name(&self) -> &str {
        self.doctor
            .as_ref()
            .map(|d| d.user.full_name.as_str())
            .unwrap_or("")
    }
}

/// Write shape for `POST /appointments/`.
#[derive(Debug, Clone, Serialize)]
pub struct NewAppointment {
    pub doctor_id: i64,
    pub appointment_date: NaiveDate,
    pub appointment_time: String,
    pub appointment_type: AppointmentType,
    pub symptoms: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Partial update for `PATCH /doctors/{id}/`; `None` fields are omitted.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DoctorUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experience_years: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consultation_fee: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qualification: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registration_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clinic_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clinic_city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clinic_state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clinic_pincode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub online_consultation_available: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterForm {
    pub email: String,
    pub password: String,
    pub password_confirm: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Doctor self-registration: account fields plus the professional profile.
#[derive(Debug, Clone, Serialize)]
pub struct DoctorRegisterForm {
    pub email: String,
    pub password: String,
    pub password_confirm: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub experience_years: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qualification: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registration_number: Option<String>,
    pub consultation_fee: String,
    pub specialization_ids: Vec<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DashboardStats {
    #[serde(default)]
    pub total_patients: u64,
    #[serde(default)]
    pub total_doctors: u64,
    #[serde(default)]
    pub total_appointments: u64,
    #[serde(default)]
    pub today_appointments: u64,
    #[serde(default)]
    pub pending_doctors: u64,
}
