use common::{Appointment, DashboardStats, DoctorProfile, DoctorUpdate, Identity};
use gateway::{ApiClient, ApiError};

/// One function per backend operation, nothing else. Failures are the raw
/// gateway errors, passed upward uninterpreted.
#[derive(Clone)]
pub struct AdminApi {
    api: ApiClient,
}

impl AdminApi {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn dashboard(&self) -> Result<DashboardStats, ApiError> {
        self.api.get("/admin/dashboard/").await
    }

    pub async fn users(&self) -> Result<Vec<Identity>, ApiError> {
        self.api.get_list("/users/", &[]).await
    }

    pub async fn doctors(&self) -> Result<Vec<DoctorProfile>, ApiError> {
        self.api.get_list("/doctors/", &[]).await
    }

    pub async fn pending_doctors(&self) -> Result<Vec<DoctorProfile>, ApiError> {
        self.api.get_list("/admin/doctors/pending/", &[]).await
    }

    pub async fn approve_doctor(&self, id: i64) -> Result<DoctorProfile, ApiError> {
        self.api
            .post_empty(&format!("/admin/doctors/{id}/approve/"))
            .await
    }

    pub async fn update_doctor(
        &self,
        id: i64,
        patch: &DoctorUpdate,
    ) -> Result<DoctorProfile, ApiError> {
        self.api.patch(&format!("/doctors/{id}/"), patch).await
    }

    pub async fn delete_doctor(&self, id: i64) -> Result<(), ApiError> {
        self.api.delete(&format!("/doctors/{id}/")).await
    }

    pub async fn appointments(&self) -> Result<Vec<Appointment>, ApiError> {
        self.api.get_list("/appointments/", &[]).await
    }

    pub async fn approve_appointment(&self, id: i64) -> Result<Appointment, ApiError> {
        self.api
            .post_empty(&format!("/appointments/{id}/approve/"))
            .await
    }

    pub async fn reject_appointment(&self, id: i64, reason: &str) -> Result<Appointment, ApiError> {
        self.api
            .post(
                &format!("/appointments/{id}/reject/"),
                &serde_json::json!({ "reason": reason }),
            )
            .await
    }
}
