pub mod client;
pub mod error;
pub mod state;

pub use client::ApiClient;
pub use error::ApiError;
pub use state::AuthState;
