pub mod appointments;
pub mod profile;
pub mod schedule;

pub use appointments::AppointmentsScreen;
pub use profile::ProfileScreen;
pub use schedule::ScheduleScreen;
