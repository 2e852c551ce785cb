pub mod guard;
pub mod service;

pub use guard::{Access, RouteGuard};
pub use service::{AuthError, AuthPayload, RoleGate, SessionService};
