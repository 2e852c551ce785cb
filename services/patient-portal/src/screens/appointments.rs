use std::collections::HashSet;

use common::{Appointment, AppointmentStatus, Confirm, Notifier};
use tracing::warn;

use crate::services::PatientApi;

pub struct AppointmentsScreen {
    pub appointments: Vec<Appointment>,
    pub loading: bool,
    pub tab: Option<AppointmentStatus>,
    pub busy: HashSet<i64>,
}

impl AppointmentsScreen {
    pub fn new() -> Self {
        Self {
            appointments: Vec::new(),
            loading: true,
            tab: None,
            busy: HashSet::new(),
        }
    }

    pub async fn load(&mut self, api: &PatientApi, notify: &dyn Notifier) {
        self.loading = true;
        match api.appointments().await {
            Ok(appointments) => self.appointments = appointments,
            Err(err) => {
                warn!(%err, "appointment list fetch failed");
                self.appointments.clear();
                notify.error("Failed to load appointments");
            }
        }
        self.loading = false;
    }

    pub fn visible(&self) -> Vec<&Appointment> {
        self.appointments
            .iter()
            .filter(|a| self.tab.map(|t| a.status == t).unwrap_or(true))
            .collect()
    }

    pub fn count(&self, status: AppointmentStatus) -> usize {
        self.appointments
            .iter()
            .filter(|a| a.status == status)
            .count()
    }

    /// Cancel flow: yes/no confirm, then an optional reason. A dismissed
    /// reason prompt aborts; an empty reply is fine.
    pub async fn cancel(
        &mut self,
        id: i64,
        api: &PatientApi,
        confirm: &dyn Confirm,
        notify: &dyn Notifier,
    ) {
        if !confirm.confirm("Are you sure you want to cancel this appointment?") {
            return;
        }
        let Some(reason) =
            confirm.prompt("Please provide a reason for cancellation (optional):")
        else {
            return;
        };
        self.busy.insert(id);
        match api.cancel(id, &reason).await {
            Ok(_) => {
                notify.success("Appointment cancelled successfully");
                self.load(api, notify).await;
            }
            Err(err) => {
                warn!(%err, appointment = id, "cancellation failed");
                notify.error(
                    err.server_message()
                        .unwrap_or("Failed to cancel appointment"),
                );
            }
        }
        self.busy.remove(&id);
    }
}

impl Default for AppointmentsScreen {
    fn default() -> Self {
        Self::new()
    }
}
