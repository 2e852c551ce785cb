pub mod appointments;
pub mod booking;
pub mod dashboard;
pub mod doctors;
pub mod profile;

pub use appointments::AppointmentsScreen;
pub use booking::BookingScreen;
pub use dashboard::DashboardScreen;
pub use doctors::DoctorsScreen;
pub use profile::ProfileScreen;
