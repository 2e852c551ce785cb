use common::{DoctorProfile, Notifier, Specialty};
use tracing::{debug, warn};

use crate::services::PatientApi;

/// Browse screen: server-side filters, results ordered by rating.
pub struct DoctorsScreen {
    pub doctors: Vec<DoctorProfile>,
    pub specialties: Vec<Specialty>,
    pub loading: bool,
    pub search: String,
    pub specialty: Option<i64>,
    pub city: String,
    pub online_only: bool,
}

impl DoctorsScreen {
    pub fn new() -> Self {
        Self {
            doctors: Vec::new(),
            specialties: Vec::new(),
            loading: true,
            search: String::new(),
            specialty: None,
            city: String::new(),
            online_only: false,
        }
    }

    /// Reference data for the filter dropdown; failure just leaves it
    /// empty, no notification.
    pub async fn load_specialties(&mut self, api: &PatientApi) {
        match api.specialties().await {
            Ok(specialties) => self.specialties = specialties,
            Err(err) => {
                debug!(%err, "specialty fetch failed");
                self.specialties.clear();
            }
        }
    }

    pub async fn load(&mut self, api: &PatientApi, notify: &dyn Notifier) {
        self.loading = true;
        let specialty = self.specialty.map(|id| id.to_string());
        let mut query: Vec<(&str, &str)> = Vec::new();
        if !self.search.is_empty() {
            query.push(("search", self.search.as_str()));
        }
        if let Some(specialty) = specialty.as_deref() {
            query.push(("specialization", specialty));
        }
        if !self.city.is_empty() {
            query.push(("clinic_city", self.city.as_str()));
        }
        if self.online_only {
            query.push(("online_consultation_available", "true"));
        }
        query.push(("ordering", "-rating"));

        match api.doctors(&query).await {
            Ok(doctors) => self.doctors = doctors,
            Err(err) => {
                warn!(%err, "doctor list fetch failed");
                self.doctors.clear();
                notify.error("Failed to load doctors");
            }
        }
        self.loading = false;
    }
}

impl Default for DoctorsScreen {
    fn default() -> Self {
        Self::new()
    }
}
