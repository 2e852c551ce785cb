pub mod screens;
pub mod services;
pub mod settings;

/// Endpoints a 401 must pass through untouched: only the auth endpoints
/// themselves. Everything in this portal is admin-only.
pub fn public_paths() -> Vec<String> {
    vec!["/auth/login/".to_string(), "/auth/register/".to_string()]
}
