use chrono::{Days, NaiveDate};

use common::{Appointment, AppointmentType, DoctorProfile, NewAppointment, Notifier};
use gateway::ApiError;
use tracing::warn;

use crate::services::PatientApi;

/// How far ahead a booking may be placed.
pub const BOOKING_WINDOW_DAYS: u64 = 30;

/// Earliest and latest bookable date, given today.
pub fn booking_window(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    (
        today,
        today
            .checked_add_days(Days::new(BOOKING_WINDOW_DAYS))
            .unwrap_or(today),
    )
}

/// The two-stage booking form. Time is only meaningful relative to the
/// selected date: picking a date fetches that date's free slots and always
/// clears any previously chosen time.
pub struct BookingScreen {
    pub doctor_id: i64,
    pub doctor: Option<DoctorProfile>,
    pub loading: bool,
    pub loading_slots: bool,
    pub slots: Vec<String>,
    pub submitting: bool,
    pub date: Option<NaiveDate>,
    pub time: Option<String>,
    pub appointment_type: AppointmentType,
    pub symptoms: String,
    pub notes: String,
}

impl BookingScreen {
    pub fn new(doctor_id: i64) -> Self {
        Self {
            doctor_id,
            doctor: None,
            loading: true,
            loading_slots: false,
            slots: Vec::new(),
            submitting: false,
            date: None,
            time: None,
            appointment_type: AppointmentType::InPerson,
            symptoms: String::new(),
            notes: String::new(),
        }
    }

    /// Returns false when the doctor could not be loaded; the caller
    /// navigates away, there is nothing to book against.
    pub async fn load(&mut self, api: &PatientApi, notify: &dyn Notifier) -> bool {
        self.loading = true;
        let ok = match api.doctor(self.doctor_id).await {
            Ok(doctor) => {
                self.doctor = Some(doctor);
                true
            }
            Err(err) => {
                warn!(%err, doctor = self.doctor_id, "doctor fetch failed");
                notify.error("Failed to load doctor details");
                false
            }
        };
        self.loading = false;
        ok
    }

    /// Stage one: date selection. Clears the chosen time and fetches the
    /// slots for the new date.
    pub async fn set_date(&mut self, date: NaiveDate, api: &PatientApi, notify: &dyn Notifier) {
        self.date = Some(date);
        self.time = None;
        self.loading_slots = true;
        match api.available_slots(self.doctor_id, date).await {
            Ok(slots) => {
                if slots.is_empty() {
                    notify.error("No slots available for this date");
                }
                self.slots = slots;
            }
            Err(err) => {
                warn!(%err, doctor = self.doctor_id, "slot fetch failed");
                self.slots.clear();
                notify.error("Failed to load available slots");
            }
        }
        self.loading_slots = false;
    }

    /// Stage two: only a slot the server actually offered can be chosen.
    pub fn select_time(&mut self, slot: &str) -> bool {
        if self.slots.iter().any(|s| s == slot) {
            self.time = Some(slot.to_string());
            true
        } else {
            false
        }
    }

    pub fn can_submit(&self) -> bool {
        self.time.is_some() && !self.submitting
    }

    /// Issues the create request, or refuses client-side when no time slot
    /// is chosen. All other validation is the server's business; its error
    /// strings are surfaced verbatim.
    pub async fn submit(
        &mut self,
        api: &PatientApi,
        notify: &dyn Notifier,
    ) -> Option<Appointment> {
        let (Some(date), Some(time)) = (self.date, self.time.clone()) else {
            notify.error("Please select a time slot");
            return None;
        };

        self.submitting = true;
        let booking = NewAppointment {
            doctor_id: self.doctor_id,
            appointment_date: date,
            appointment_time: time,
            appointment_type: self.appointment_type,
            symptoms: self.symptoms.clone(),
            notes: (!self.notes.is_empty()).then(|| self.notes.clone()),
        };
        let booked = match api.book(&booking).await {
            Ok(appointment) => {
                notify.success("Appointment booked successfully!");
                Some(appointment)
            }
            Err(err) => {
                warn!(%err, doctor = self.doctor_id, "booking failed");
                notify.error(&booking_error(&err));
                None
            }
        };
        self.submitting = false;
        booked
    }
}

// Server message, then the per-field validation errors the backend is known
// to send, then the generic fallback.
fn booking_error(err: &ApiError) -> String {
    err.server_message()
        .map(str::to_string)
        .or_else(|| err.field_error("doctor_id"))
        .or_else(|| err.field_error("appointment_time"))
        .unwrap_or_else(|| "Failed to book appointment".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn booking_window_spans_thirty_days() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let (min, max) = booking_window(today);
        assert_eq!(min, today);
        assert_eq!(max, NaiveDate::from_ymd_opt(2025, 3, 31).unwrap());
    }

    #[test]
    fn select_time_rejects_unoffered_slots() {
        let mut screen = BookingScreen::new(9);
        screen.slots = vec!["09:00".to_string(), "09:30".to_string()];
        assert!(!screen.select_time("10:00"));
        assert!(screen.time.is_none());
        assert!(screen.select_time("09:30"));
        assert_eq!(screen.time.as_deref(), Some("09:30"));
    }
}
