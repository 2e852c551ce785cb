use common::{Notifier, Schedule};
use tracing::warn;

use crate::services::DoctorApi;

pub const DAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Weekly availability, one row per weekday the doctor works.
pub struct ScheduleScreen {
    pub schedule: Vec<Schedule>,
    pub loading: bool,
}

impl ScheduleScreen {
    pub fn new() -> Self {
        Self {
            schedule: Vec::new(),
            loading: true,
        }
    }

    pub async fn load(&mut self, api: &DoctorApi, notify: &dyn Notifier) {
        self.loading = true;
        match api.schedule().await {
            Ok(schedule) => self.schedule = schedule,
            Err(err) => {
                warn!(%err, "schedule fetch failed");
                self.schedule.clear();
                notify.error("Failed to load schedule");
            }
        }
        self.loading = false;
    }

    pub fn day(&self, day_of_week: u8) -> Option<&Schedule> {
        self.schedule.iter().find(|s| s.day_of_week == day_of_week)
    }

    pub async fn save_day(&mut self, row: Schedule, api: &DoctorApi, notify: &dyn Notifier) {
        match api.set_schedule_day(&row).await {
            Ok(_) => {
                notify.success("Schedule updated");
                self.load(api, notify).await;
            }
            Err(err) => {
                warn!(%err, day = row.day_of_week, "schedule update failed");
                notify.error("Failed to update schedule");
            }
        }
    }
}

impl Default for ScheduleScreen {
    fn default() -> Self {
        Self::new()
    }
}
