use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use common::{CredentialPair, Identity};

/// Shared in-memory authenticated state, one instance per portal, handed to
/// both the gateway client and the session store.
///
/// Invariant: a present identity implies present credentials. Identity is
/// only ever set together with credentials (`set`) and both are dropped
/// together (`clear`); `set_credentials` alone exists for the session
/// restore window where tokens are known but `/users/me/` has not answered
/// yet.
#[derive(Default)]
pub struct AuthState {
    inner: RwLock<Snapshot>,
    expired: AtomicBool,
}

#[derive(Default, Clone)]
struct Snapshot {
    identity: Option<Identity>,
    credentials: Option<CredentialPair>,
}

impl AuthState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, identity: Identity, credentials: CredentialPair) {
        let mut inner = self.inner.write().unwrap();
        inner.identity = Some(identity);
        inner.credentials = Some(credentials);
    }

    pub fn set_credentials(&self, credentials: CredentialPair) {
        self.inner.write().unwrap().credentials = Some(credentials);
    }

    pub fn clear(&self) {
        let mut inner = self.inner.write().unwrap();
        inner.identity = None;
        inner.credentials = None;
    }

    pub fn identity(&self) -> Option<Identity> {
        self.inner.read().unwrap().identity.clone()
    }

    pub fn credentials(&self) -> Option<CredentialPair> {
        self.inner.read().unwrap().credentials.clone()
    }

    pub fn access_token(&self) -> Option<String> {
        self.inner
            .read()
            .unwrap()
            .credentials
            .as_ref()
            .map(|c| c.access.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.read().unwrap().identity.is_some()
    }

    /// Raised by the gateway when a protected call came back 401; the
    /// portal loop observes it and falls back to the login screen.
    pub fn mark_expired(&self) {
        self.expired.store(true, Ordering::SeqCst);
    }

    pub fn take_expired(&self) -> bool {
        self.expired.swap(false, Ordering::SeqCst)
    }
}
