use std::sync::Arc;

use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

use common::{
    CredentialPair, DoctorProfile, DoctorRegisterForm, Identity, RegisterForm, StoreError,
    TokenStore, UserType,
};
use gateway::{ApiClient, ApiError, AuthState};

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The server accepted the credentials but the account's role is not
    /// allowed into this portal. Nothing was persisted.
    #[error("access denied: this portal requires {required} credentials")]
    AccessDenied { required: UserType },

    /// The server rejected the attempt; the message is the server's own
    /// wording when it sent one.
    #[error("{0}")]
    Rejected(String),

    #[error("credential storage failed: {0}")]
    Storage(#[from] StoreError),

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Which `user_type` may hold a session in this portal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleGate {
    Any,
    Only(UserType),
}

impl RoleGate {
    pub fn allows(&self, user_type: UserType) -> bool {
        match self {
            RoleGate::Any => true,
            RoleGate::Only(required) => *required == user_type,
        }
    }
}

/// Login/registration response. `/auth/register/doctor/` additionally
/// carries the created profile and a human message; the other auth
/// endpoints omit them.
#[derive(Debug, Deserialize)]
pub struct AuthPayload {
    pub user: Identity,
    pub access: String,
    pub refresh: String,
    #[serde(default)]
    pub doctor: Option<DoctorProfile>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Single source of truth for "who is logged in". Explicitly constructed
/// per portal and handed to whatever needs it; never ambient global state.
pub struct SessionService {
    api: ApiClient,
    auth: Arc<AuthState>,
    store: Arc<dyn TokenStore>,
    gate: RoleGate,
}

impl SessionService {
    pub fn new(api: ApiClient, gate: RoleGate) -> Self {
        let auth = api.auth();
        let store = api.store();
        Self {
            api,
            auth,
            store,
            gate,
        }
    }

    pub fn gate(&self) -> RoleGate {
        self.gate
    }

    pub fn current_user(&self) -> Option<Identity> {
        self.auth.identity()
    }

    pub fn is_authenticated(&self) -> bool {
        self.current_user()
            .map(|user| self.gate.allows(user.user_type))
            .unwrap_or(false)
    }

    /// True once after the gateway dropped the session on a 401; the portal
    /// loop uses it to fall back to the login screen.
    pub fn take_expired(&self) -> bool {
        self.auth.take_expired()
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
        let body = json!({ "email": email, "password": password });
        let payload: AuthPayload = self
            .api
            .post("/auth/login/", &body)
            .await
            .map_err(auth_reject)?;
        self.establish(payload)
    }

    pub async fn register(&self, form: &RegisterForm) -> Result<Identity, AuthError> {
        let payload: AuthPayload = self
            .api
            .post("/auth/register/", form)
            .await
            .map_err(auth_reject)?;
        self.establish(payload)
    }

    pub async fn register_doctor(&self, form: &DoctorRegisterForm) -> Result<Identity, AuthError> {
        let payload: AuthPayload = self
            .api
            .post("/auth/register/doctor/", form)
            .await
            .map_err(auth_reject)?;
        self.establish(payload)
    }

    /// Best-effort server-side invalidation of the refresh token, then an
    /// unconditional local wipe. A failing server never blocks logout.
    pub async fn logout(&self) {
        let refresh = self
            .auth
            .credentials()
            .map(|c| c.refresh)
            .or_else(|| self.store.load().ok().flatten().map(|c| c.refresh));
        if let Some(refresh) = refresh {
            let body = json!({ "refresh": refresh });
            if let Err(err) = self
                .api
                .post::<_, serde_json::Value>("/auth/logout/", &body)
                .await
            {
                debug!(%err, "logout call failed, clearing local session anyway");
            }
        }
        self.drop_session();
    }

    /// Run once at startup: if a durable credential exists, try to fetch
    /// the identity it belongs to. Any failure clears everything - a stale
    /// identity is never left paired with an invalid credential.
    pub async fn restore(&self) -> Option<Identity> {
        let creds = match self.store.load() {
            Ok(Some(creds)) => creds,
            Ok(None) => return None,
            Err(err) => {
                warn!(%err, "could not read stored tokens");
                return None;
            }
        };
        self.auth.set_credentials(creds.clone());

        match self.api.get::<Identity>("/users/me/").await {
            Ok(user) if self.gate.allows(user.user_type) => {
                self.auth.set(user.clone(), creds);
                Some(user)
            }
            Ok(user) => {
                debug!(user_type = %user.user_type, "stored session fails the portal role gate");
                self.drop_session();
                None
            }
            Err(err) => {
                debug!(%err, "session restore failed");
                self.drop_session();
                None
            }
        }
    }

    fn establish(&self, payload: AuthPayload) -> Result<Identity, AuthError> {
        let AuthPayload {
            user,
            access,
            refresh,
            ..
        } = payload;

        if let RoleGate::Only(required) = self.gate {
            if user.user_type != required {
                debug!(user_type = %user.user_type, "rejecting login: role gate miss");
                return Err(AuthError::AccessDenied { required });
            }
        }

        let creds = CredentialPair { access, refresh };
        self.store.save(&creds)?;
        self.auth.set(user.clone(), creds);
        Ok(user)
    }

    fn drop_session(&self) {
        if let Err(err) = self.store.clear() {
            warn!(%err, "failed to clear stored tokens");
        }
        self.auth.clear();
        // swallow any expiry raised while tearing down
        let _ = self.auth.take_expired();
    }
}

// Server said no: surface its message. Anything transport-shaped stays an
// API error.
fn auth_reject(err: ApiError) -> AuthError {
    match err {
        ApiError::Status { message, .. } => {
            AuthError::Rejected(message.unwrap_or_else(|| "Login failed".to_string()))
        }
        other => AuthError::Api(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_gate() {
        assert!(RoleGate::Any.allows(UserType::Patient));
        assert!(RoleGate::Only(UserType::Admin).allows(UserType::Admin));
        assert!(!RoleGate::Only(UserType::Admin).allows(UserType::Doctor));
    }

    #[test]
    fn auth_payload_accepts_both_register_shapes() {
        let login: AuthPayload = serde_json::from_value(serde_json::json!({
            "user": {"id": 1, "email": "a@b.com", "user_type": "patient"},
            "access": "a",
            "refresh": "r",
            "token": "a"
        }))
        .unwrap();
        assert!(login.doctor.is_none());

        let doctor: AuthPayload = serde_json::from_value(serde_json::json!({
            "user": {"id": 2, "email": "d@b.com", "user_type": "doctor"},
            "access": "a",
            "refresh": "r",
            "doctor": {
                "id": 9,
                "user": {"id": 2, "email": "d@b.com", "user_type": "doctor"}
            },
            "message": "Doctor registration successful. Your account is pending admin approval."
        }))
        .unwrap();
        assert_eq!(doctor.doctor.unwrap().id, 9);
    }
}
