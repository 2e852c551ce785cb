pub mod models;
pub mod store;
pub mod ui;

pub use models::*;
pub use store::{FileTokenStore, MemoryTokenStore, StoreError, TokenStore};
pub use ui::{Confirm, Notifier};
