use std::collections::HashSet;

use common::{Appointment, AppointmentStatus, Confirm, Notifier};
use tracing::warn;

use crate::services::AdminApi;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(AppointmentStatus),
}

pub struct AppointmentsScreen {
    pub appointments: Vec<Appointment>,
    pub loading: bool,
    pub search: String,
    pub filter: StatusFilter,
    pub busy: HashSet<i64>,
}

impl AppointmentsScreen {
    pub fn new() -> Self {
        Self {
            appointments: Vec::new(),
            loading: true,
            search: String::new(),
            filter: StatusFilter::All,
            busy: HashSet::new(),
        }
    }

    pub async fn load(&mut self, api: &AdminApi, notify: &dyn Notifier) {
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
        let needle = self.search.to_lowercase();
        self.appointments
            .iter()
            .filter(|a| {
                let matches_search = needle.is_empty()
                    || a.patient_name().to_lowercase().contains(&needle)
                    || a.doctor_name().to_lowercase().contains(&needle);
                let matches_status = match self.filter {
                    StatusFilter::All => true,
                    StatusFilter::Only(status) => a.status == status,
                };
                matches_search && matches_status
            })
            .collect()
    }

    pub async fn approve(
        &mut self,
        id: i64,
        api: &AdminApi,
        confirm: &dyn Confirm,
        notify: &dyn Notifier,
    ) {
        if !confirm.confirm("Are you sure you want to approve this appointment?") {
            return;
        }
        self.busy.insert(id);
        match api.approve_appointment(id).await {
            Ok(_) => {
                notify.success("Appointment approved successfully");
                self.load(api, notify).await;
            }
            Err(err) => {
                warn!(%err, appointment = id, "appointment approval failed");
                notify.error(
                    err.server_message()
                        .unwrap_or("Failed to approve appointment"),
                );
            }
        }
        self.busy.remove(&id);
    }

    /// A dismissed reason prompt aborts the whole action; an empty reply
    /// falls back to the stock reason.
    pub async fn reject(
        &mut self,
        id: i64,
        api: &AdminApi,
        confirm: &dyn Confirm,
        notify: &dyn Notifier,
    ) {
        let Some(reason) = confirm.prompt("Please provide a reason for rejection (optional):")
        else {
            return;
        };
        let reason = if reason.is_empty() {
            "Rejected by admin".to_string()
        } else {
            reason
        };
        self.busy.insert(id);
        match api.reject_appointment(id, &reason).await {
            Ok(_) => {
                notify.success("Appointment rejected");
                self.load(api, notify).await;
            }
            Err(err) => {
                warn!(%err, appointment = id, "appointment rejection failed");
                notify.error(
                    err.server_message()
                        .unwrap_or("Failed to reject appointment"),
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
