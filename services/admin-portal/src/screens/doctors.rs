use std::collections::HashSet;

use common::{Confirm, DoctorProfile, DoctorUpdate, Notifier};
use tracing::warn;

use crate::services::AdminApi;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DoctorTab {
    #[default]
    All,
    Pending,
    Approved,
    Inactive,
}

/// The edit-modal working copy; maps 1:1 onto the PATCH body on save.
#[derive(Debug, Clone)]
pub struct DoctorEditForm {
    pub id: i64,
    pub experience_years: i32,
    pub consultation_fee: String,
    pub qualification: String,
    pub registration_number: String,
    pub clinic_address: String,
    pub clinic_city: String,
    pub clinic_state: String,
    pub clinic_pincode: String,
}

impl DoctorEditForm {
    fn from_profile(doctor: &DoctorProfile) -> Self {
        Self {
            id: doctor.id,
            experience_years: doctor.experience_years,
            consultation_fee: doctor.consultation_fee.clone(),
            qualification: doctor.qualification.clone(),
            registration_number: doctor.registration_number.clone(),
            clinic_address: doctor.clinic_address.clone(),
            clinic_city: doctor.clinic_city.clone(),
            clinic_state: doctor.clinic_state.clone(),
            clinic_pincode: doctor.clinic_pincode.clone(),
        }
    }

    fn as_patch(&self) -> DoctorUpdate {
        DoctorUpdate {
            experience_years: Some(self.experience_years),
            consultation_fee: Some(self.consultation_fee.clone()),
            qualification: Some(self.qualification.clone()),
            registration_number: Some(self.registration_number.clone()),
            clinic_address: Some(self.clinic_address.clone()),
            clinic_city: Some(self.clinic_city.clone()),
            clinic_state: Some(self.clinic_state.clone()),
            clinic_pincode: Some(self.clinic_pincode.clone()),
            ..DoctorUpdate::default()
        }
    }
}

pub struct DoctorsScreen {
    pub doctors: Vec<DoctorProfile>,
    pub loading: bool,
    pub tab: DoctorTab,
    pub search: String,
    /// Rows with an action in flight; their buttons stay disabled.
    pub busy: HashSet<i64>,
    pub editing: Option<DoctorEditForm>,
}

impl DoctorsScreen {
    pub fn new() -> Self {
        Self {
            doctors: Vec::new(),
            loading: true,
            tab: DoctorTab::All,
            search: String::new(),
            busy: HashSet::new(),
            editing: None,
        }
    }

    pub async fn load(&mut self, api: &AdminApi, notify: &dyn Notifier) {
        self.loading = true;
        match api.doctors().await {
            Ok(doctors) => self.doctors = doctors,
            Err(err) => {
                warn!(%err, "doctor list fetch failed");
                self.doctors.clear();
                notify.error("Failed to load doctors");
            }
        }
        self.loading = false;
    }

    pub fn visible(&self) -> Vec<&DoctorProfile> {
        let needle = self.search.to_lowercase();
        self.doctors
            .iter()
            .filter(|d| {
                let matches_tab = match self.tab {
                    DoctorTab::All => true,
                    DoctorTab::Pending => !d.is_approved,
                    DoctorTab::Approved => d.is_approved,
                    DoctorTab::Inactive => !d.is_active,
                };
                let matches_search = needle.is_empty()
                    || d.display_name().to_lowercase().contains(&needle)
                    || d.user.email.to_lowercase().contains(&needle);
                matches_tab && matches_search
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
        if !confirm.confirm("Are you sure you want to approve this doctor?") {
            return;
        }
        self.busy.insert(id);
        match api.approve_doctor(id).await {
            Ok(_) => {
                notify.success("Doctor approved successfully");
                self.load(api, notify).await;
            }
            Err(err) => {
                warn!(%err, doctor = id, "doctor approval failed");
                notify.error("Failed to approve doctor");
            }
        }
        self.busy.remove(&id);
    }

    pub async fn toggle_active(
        &mut self,
        id: i64,
        api: &AdminApi,
        confirm: &dyn Confirm,
        notify: &dyn Notifier,
    ) {
        let Some(doctor) = self.doctors.iter().find(|d| d.id == id) else {
            return;
        };
        let action = if doctor.is_active { "disable" } else { "enable" };
        if !confirm.confirm(&format!("Are you sure you want to {action} this doctor?")) {
            return;
        }
        let patch = DoctorUpdate {
            is_active: Some(!doctor.is_active),
            ..DoctorUpdate::default()
        };
        self.busy.insert(id);
        match api.update_doctor(id, &patch).await {
            Ok(_) => {
                notify.success(&format!("Doctor {action}d successfully"));
                self.load(api, notify).await;
            }
            Err(err) => {
                warn!(%err, doctor = id, action, "doctor toggle failed");
                notify.error(&format!("Failed to {action} doctor"));
            }
        }
        self.busy.remove(&id);
    }

    /// Permanent removal: a yes/no confirm plus a typed "DELETE" as the
    /// second factor, same as the modal it replaces.
    pub async fn delete(
        &mut self,
        id: i64,
        api: &AdminApi,
        confirm: &dyn Confirm,
        notify: &dyn Notifier,
    ) {
        if !confirm.confirm(
            "WARNING: This will permanently delete the doctor and all associated data. \
             This action cannot be undone. Are you sure?",
        ) {
            return;
        }
        if confirm.prompt("Type \"DELETE\" to confirm:").as_deref() != Some("DELETE") {
            notify.error("Deletion cancelled");
            return;
        }
        self.busy.insert(id);
        match api.delete_doctor(id).await {
            Ok(()) => {
                notify.success("Doctor deleted successfully");
                self.load(api, notify).await;
            }
            Err(err) => {
                warn!(%err, doctor = id, "doctor deletion failed");
                notify.error("Failed to delete doctor");
            }
        }
        self.busy.remove(&id);
    }

    pub fn start_edit(&mut self, id: i64) -> bool {
        match self.doctors.iter().find(|d| d.id == id) {
            Some(doctor) => {
                self.editing = Some(DoctorEditForm::from_profile(doctor));
                true
            }
            None => false,
        }
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    pub async fn save_edit(&mut self, api: &AdminApi, notify: &dyn Notifier) {
        let Some(form) = self.editing.clone() else {
            return;
        };
        self.busy.insert(form.id);
        match api.update_doctor(form.id, &form.as_patch()).await {
            Ok(_) => {
                notify.success("Doctor updated successfully");
                self.editing = None;
                self.load(api, notify).await;
            }
            Err(err) => {
                warn!(%err, doctor = form.id, "doctor update failed");
                // modal stays open with the user's edits intact
                notify.error("Failed to update doctor");
            }
        }
        self.busy.remove(&form.id);
    }
}

impl Default for DoctorsScreen {
    fn default() -> Self {
        Self::new()
    }
}
