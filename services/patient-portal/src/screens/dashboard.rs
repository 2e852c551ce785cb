use common::{Appointment, AppointmentStatus, Notifier};
use tracing::warn;

use crate::services::PatientApi;

/// Landing view: what's coming up plus lifetime counts.
pub struct DashboardScreen {
    pub upcoming: Vec<Appointment>,
    pub all: Vec<Appointment>,
    pub loading: bool,
}

impl DashboardScreen {
    pub fn new() -> Self {
        Self {
            upcoming: Vec::new(),
            all: Vec::new(),
            loading: true,
        }
    }

    pub async fn load(&mut self, api: &PatientApi, notify: &dyn Notifier) {
        self.loading = true;
        match tokio::try_join!(api.upcoming(), api.appointments()) {
            Ok((upcoming, all)) => {
                self.upcoming = upcoming;
                self.all = all;
            }
            Err(err) => {
                warn!(%err, "dashboard fetch failed");
                self.upcoming.clear();
                self.all.clear();
                notify.error("Failed to load dashboard");
            }
        }
        self.loading = false;
    }

    pub fn completed_count(&self) -> usize {
        self.all
            .iter()
            .filter(|a| a.status == AppointmentStatus::Completed)
            .count()
    }
}

impl Default for DashboardScreen {
    fn default() -> Self {
        Self::new()
    }
}
