use common::{DoctorProfile, DoctorUpdate, Notifier};
use tracing::warn;

use crate::services::DoctorApi;

pub struct ProfileScreen {
    pub profile: Option<DoctorProfile>,
    pub loading: bool,
    pub saving: bool,
}

impl ProfileScreen {
    pub fn new() -> Self {
        Self {
            profile: None,
            loading: true,
            saving: false,
        }
    }

    pub async fn load(&mut self, api: &DoctorApi, notify: &dyn Notifier) {
        self.loading = true;
        match api.profile().await {
            Ok(profile) => self.profile = Some(profile),
            Err(err) => {
                warn!(%err, "profile fetch failed");
                self.profile = None;
                notify.error("Failed to load profile");
            }
        }
        self.loading = false;
    }

    pub async fn save(&mut self, patch: &DoctorUpdate, api: &DoctorApi, notify: &dyn Notifier) {
        self.saving = true;
        match api.update_profile(patch).await {
            Ok(profile) => {
                self.profile = Some(profile);
                notify.success("Profile updated successfully");
            }
            Err(err) => {
                warn!(%err, "profile update failed");
                notify.error(err.server_message().unwrap_or("Failed to update profile"));
            }
        }
        self.saving = false;
    }
}

impl Default for ProfileScreen {
    fn default() -> Self {
        Self::new()
    }
}
