pub mod screens;
pub mod services;
pub mod settings;

/// Endpoints a 401 must pass through untouched, so anonymous browsing is
/// not disrupted. Matched by substring, which deliberately covers nested
/// doctor sub-resources such as `available_slots`.
pub fn public_paths() -> Vec<String> {
    vec![
        "/doctors/".to_string(),
        "/doctors/specialties/".to_string(),
        "/auth/login/".to_string(),
        "/auth/register/".to_string(),
    ]
}
