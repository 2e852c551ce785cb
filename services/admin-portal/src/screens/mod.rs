pub mod appointments;
pub mod dashboard;
pub mod doctors;
pub mod users;

pub use appointments::AppointmentsScreen;
pub use dashboard::DashboardScreen;
pub use doctors::{DoctorEditForm, DoctorTab, DoctorsScreen};
pub use users::UsersScreen;
