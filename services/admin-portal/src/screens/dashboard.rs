use common::{DashboardStats, Notifier};
use tracing::warn;

use crate::services::AdminApi;

pub struct DashboardScreen {
    pub stats: DashboardStats,
    pub loading: bool,
}

impl DashboardScreen {
    pub fn new() -> Self {
        Self {
            stats: DashboardStats::default(),
            loading: true,
        }
    }

    pub async fn load(&mut self, api: &AdminApi, notify: &dyn Notifier) {
        self.loading = true;
        match api.dashboard().await {
            Ok(stats) => self.stats = stats,
            Err(err) => {
                warn!(%err, "dashboard fetch failed");
                self.stats = DashboardStats::default();
                notify.error("Failed to load stats");
            }
        }
        self.loading = false;
    }
}

impl Default for DashboardScreen {
    fn default() -> Self {
        Self::new()
    }
}
