//! Signed-in identity as an explicit session service.
//!
//! Authentication itself is delegated to the hosted provider; this module
//! only tracks which verified identity is active and broadcasts changes so
//! every view observes sign-in/sign-out consistently. The profiles row for
//! an identity is created lazily on first sign-in.

use crate::error::LibraryError;
use crate::store::Store;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub id: String,
    pub email: String,
}

pub struct AuthSession {
    store: Store,
    tx: watch::Sender<Option<UserIdentity>>,
}

impl AuthSession {
    pub fn new(store: Store) -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { store, tx }
    }

    /// Records a provider-verified identity as the active user, creating
    /// its profile row if this is the first sign-in.
    pub fn sign_in(&self, user_id: &str, email: &str) -> Result<UserIdentity, LibraryError> {
        if self.store.get_profile(user_id)?.is_none() {
            let created_at = chrono::Utc::now().to_rfc3339();
            self.store.insert_profile(user_id, email, &created_at)?;
        }
        let identity = UserIdentity {
            id: user_id.to_string(),
            email: email.to_string(),
        };
        self.tx.send_replace(Some(identity.clone()));
        Ok(identity)
    }

    pub fn sign_out(&self) {
        self.tx.send_replace(None);
    }

    pub fn current_user(&self) -> Option<UserIdentity> {
        self.tx.borrow().clone()
    }

    /// Subscription over sign-in/sign-out changes. Dropping the receiver
    /// is the unsubscribe.
    pub fn subscribe(&self) -> watch::Receiver<Option<UserIdentity>> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::testutil::*;

    #[test]
    fn sign_in_creates_the_profile_once() {
        let (_dir, store) = temp_store();
        let session = AuthSession::new(store.clone());

        session.sign_in("user-1", "reader@example.com").unwrap();
        session.sign_in("user-1", "reader@example.com").unwrap();

        let profile = store.get_profile("user-1").unwrap().unwrap();
        assert_eq!(profile.email, "reader@example.com");

        let conn = store.connect().unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM profiles", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn current_user_tracks_sign_in_and_out() {
        let (_dir, store) = temp_store();
        let session = AuthSession::new(store);

        assert!(session.current_user().is_none());
        session.sign_in("user-1", "reader@example.com").unwrap();
        assert_eq!(session.current_user().unwrap().id, "user-1");
        session.sign_out();
        assert!(session.current_user().is_none());
    }

    #[tokio::test]
    async fn subscribers_observe_identity_changes() {
        let (_dir, store) = temp_store();
        let session = AuthSession::new(store);
        let mut rx = session.subscribe();

        session.sign_in("user-1", "reader@example.com").unwrap();
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().as_ref().unwrap().email, "reader@example.com");

        session.sign_out();
        rx.changed().await.unwrap();
        assert!(rx.borrow().is_none());
    }
}
