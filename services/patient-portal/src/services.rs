use chrono::NaiveDate;
use serde::Deserialize;

use common::{
    Appointment, DoctorProfile, NewAppointment, PatientProfile, PatientUpdate, Specialty,
};
use gateway::{ApiClient, ApiError};

/// One function per backend operation the patient portal consumes.
#[derive(Clone)]
pub struct PatientApi {
    api: ApiClient,
}

impl PatientApi {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn doctors(&self, query: &[(&str, &str)]) -> Result<Vec<DoctorProfile>, ApiError> {
        self.api.get_list("/doctors/", query).await
    }

    pub async fn doctor(&self, id: i64) -> Result<DoctorProfile, ApiError> {
        self.api.get(&format!("/doctors/{id}/")).await
    }

    pub async fn specialties(&self) -> Result<Vec<Specialty>, ApiError> {
        self.api.get_list("/doctors/specialties/", &[]).await
    }

    /// The server computes the free slots; the client only asks and shows.
    pub async fn available_slots(
        &self,
        doctor_id: i64,
        date: NaiveDate,
    ) -> Result<Vec<String>, ApiError> {
        #[derive(Deserialize)]
        struct SlotsPayload {
            #[serde(default)]
            available_slots: Vec<String>,
        }

        let date = date.to_string();
        let payload: SlotsPayload = self
            .api
            .get_query(
                &format!("/doctors/{doctor_id}/available_slots/"),
                &[("date", date.as_str())],
            )
            .await?;
        Ok(payload.available_slots)
    }

    pub async fn appointments(&self) -> Result<Vec<Appointment>, ApiError> {
        self.api.get_list("/appointments/", &[]).await
    }

    pub async fn appointment(&self, id: i64) -> Result<Appointment, ApiError> {
        self.api.get(&format!("/appointments/{id}/")).await
    }

    pub async fn book(&self, booking: &NewAppointment) -> Result<Appointment, ApiError> {
        self.api.post("/appointments/", booking).await
    }

    pub async fn cancel(&self, id: i64, reason: &str) -> Result<Appointment, ApiError> {
        self.api
            .post(
                &format!("/appointments/{id}/cancel/"),
                &serde_json::json!({ "reason": reason }),
            )
            .await
    }

    pub async fn upcoming(&self) -> Result<Vec<Appointment>, ApiError> {
        self.api.get_list("/appointments/upcoming/", &[]).await
    }

    pub async fn past(&self) -> Result<Vec<Appointment>, ApiError> {
        self.api.get_list("/appointments/past/", &[]).await
    }

    pub async fn profile(&self) -> Result<PatientProfile, ApiError> {
        self.api.get("/patients/profile/").await
    }

    pub async fn update_profile(&self, patch: &PatientUpdate) -> Result<PatientProfile, ApiError> {
        self.api.put("/patients/update_profile/", patch).await
    }
}
