use chrono::NaiveDate;

use common::{Appointment, AppointmentStatus, DoctorProfile, DoctorUpdate, Schedule, Specialty};
use gateway::{ApiClient, ApiError};

/// One function per backend operation for the clinician's own resources.
#[derive(Clone)]
pub struct DoctorApi {
    api: ApiClient,
}

impl DoctorApi {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn profile(&self) -> Result<DoctorProfile, ApiError> {
        self.api.get("/doctors/profile/").await
    }

    pub async fn update_profile(&self, patch: &DoctorUpdate) -> Result<DoctorProfile, ApiError> {
        self.api.put("/doctors/update_profile/", patch).await
    }

    pub async fn schedule(&self) -> Result<Vec<Schedule>, ApiError> {
        self.api.get_list("/doctors/schedule/", &[]).await
    }

    /// Upserts one weekday row; the server keys on `day_of_week`.
    pub async fn set_schedule_day(&self, day: &Schedule) -> Result<Schedule, ApiError> {
        self.api.post("/doctors/schedule/", day).await
    }

    pub async fn appointments(
        &self,
        status: Option<AppointmentStatus>,
        date: Option<NaiveDate>,
    ) -> Result<Vec<Appointment>, ApiError> {
        let date = date.map(|d| d.to_string());
        let mut query: Vec<(&str, &str)> = Vec::new();
        if let Some(status) = status.as_ref() {
            query.push(("status", status.as_str()));
        }
        if let Some(date) = date.as_deref() {
            query.push(("date", date));
        }
        self.api.get_list("/doctors/appointments/", &query).await
    }

    pub async fn update_status(
        &self,
        id: i64,
        status: AppointmentStatus,
    ) -> Result<Appointment, ApiError> {
        self.api
            .patch(
                &format!("/appointments/{id}/update_status/"),
                &serde_json::json!({ "status": status }),
            )
            .await
    }

    pub async fn specialties(&self) -> Result<Vec<Specialty>, ApiError> {
        self.api.get_list("/doctors/specialties/", &[]).await
    }
}
