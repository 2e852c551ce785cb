use common::{Identity, Notifier, UserType};
use tracing::warn;

use crate::services::AdminApi;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TypeFilter {
    #[default]
    All,
    Only(UserType),
}

pub struct UsersScreen {
    pub users: Vec<Identity>,
    pub loading: bool,
    pub search: String,
    pub filter: TypeFilter,
}

impl UsersScreen {
    pub fn new() -> Self {
        Self {
            users: Vec::new(),
            loading: true,
            search: String::new(),
            filter: TypeFilter::All,
        }
    }

    pub async fn load(&mut self, api: &AdminApi, notify: &dyn Notifier) {
        self.loading = true;
        match api.users().await {
            Ok(users) => self.users = users,
            Err(err) => {
                warn!(%err, "user list fetch failed");
                self.users.clear();
                notify.error("Failed to load users");
            }
        }
        self.loading = false;
    }

    pub fn visible(&self) -> Vec<&Identity> {
        let needle = self.search.to_lowercase();
        self.users
            .iter()
            .filter(|user| {
                let matches_search = needle.is_empty()
                    || user.full_name.to_lowercase().contains(&needle)
                    || user.email.to_lowercase().contains(&needle);
                let matches_type = match self.filter {
                    TypeFilter::All => true,
                    TypeFilter::Only(t) => user.user_type == t,
                };
                matches_search && matches_type
            })
            .collect()
    }
}

impl Default for UsersScreen {
    fn default() -> Self {
        Self::new()
    }
}
