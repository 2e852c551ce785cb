pub mod screens;
pub mod services;
pub mod settings;

/// Endpoints a 401 must pass through untouched: the auth endpoints, which
/// includes doctor self-registration under `/auth/register/doctor/`.
pub fn public_paths() -> Vec<String> {
    vec!["/auth/login/".to_string(), "/auth/register/".to_string()]
}
