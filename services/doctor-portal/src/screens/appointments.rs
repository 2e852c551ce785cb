use std::collections::HashSet;

use chrono::NaiveDate;
use common::{Appointment, AppointmentStatus, Notifier};
use tracing::warn;

use crate::services::DoctorApi;

/// The clinician's appointment list. Status moves only through
/// `update_status`; accept/reject are the two shortcuts the portal offers
/// on pending rows.
pub struct AppointmentsScreen {
    pub appointments: Vec<Appointment>,
    pub loading: bool,
    pub status_filter: Option<AppointmentStatus>,
    pub date_filter: Option<NaiveDate>,
    pub busy: HashSet<i64>,
}

impl AppointmentsScreen {
    pub fn new() -> Self {
        Self {
            appointments: Vec::new(),
            loading: true,
            status_filter: None,
            date_filter: None,
            busy: HashSet::new(),
        }
    }

    pub async fn load(&mut self, api: &DoctorApi, notify: &dyn Notifier) {
        self.loading = true;
        match api.appointments(self.status_filter, self.date_filter).await {
            Ok(appointments) => self.appointments = appointments,
            Err(err) => {
                warn!(%err, "appointment list fetch failed");
                self.appointments.clear();
                notify.error("Failed to load appointments");
            }
        }
        self.loading = false;
    }

    pub async fn accept(&mut self, id: i64, api: &DoctorApi, notify: &dyn Notifier) {
        self.update_status(id, AppointmentStatus::Confirmed, api, notify)
            .await;
    }

    pub async fn reject(&mut self, id: i64, api: &DoctorApi, notify: &dyn Notifier) {
        self.update_status(id, AppointmentStatus::Cancelled, api, notify)
            .await;
    }

    pub async fn update_status(
        &mut self,
        id: i64,
        status: AppointmentStatus,
        api: &DoctorApi,
        notify: &dyn Notifier,
    ) {
        self.busy.insert(id);
        match api.update_status(id, status).await {
            Ok(_) => {
                notify.success("Status updated");
                self.load(api, notify).await;
            }
            Err(err) => {
                warn!(%err, appointment = id, "status update failed");
                notify.error("Failed to update status");
            }
        }
        self.busy.remove(&id);
    }

    pub fn pending(&self) -> Vec<&Appointment> {
        self.appointments
            .iter()
            .filter(|a| a.status == AppointmentStatus::Pending)
            .collect()
    }
}

impl Default for AppointmentsScreen {
    fn default() -> Self {
        Self::new()
    }
}
