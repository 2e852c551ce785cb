use std::sync::Arc;

use common::Identity;

use crate::service::SessionService;

pub enum Access {
    Granted(Identity),
    LoginRequired,
}

/// Gates protected screens on the session's authentication state (and,
/// through the session's role gate, on the identity's role).
pub struct RouteGuard {
    session: Arc<SessionService>,
}

impl RouteGuard {
    pub fn new(session: Arc<SessionService>) -> Self {
        Self { session }
    }

    pub fn check(&self) -> Access {
        match self.session.current_user() {
            Some(user) if self.session.gate().allows(user.user_type) => Access::Granted(user),
            _ => Access::LoginRequired,
        }
    }
}
