//! Volatile in-memory storage backend.
//!
//! Development and testing only: everything is lost on process restart.
//! Behavior matches [`PostgresStorage`](super::PostgresStorage) exactly,
//! including newest-first list ordering and not-found signaling.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use welcome_home_core::{
    NewQuoteRequest, NewUser, QuoteRequest, QuoteRequestId, QuoteStatus, User, UserId,
};

use super::{Storage, StorageError};

/// In-memory [`Storage`] implementation backed by `RwLock`ed maps.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    quote_requests: RwLock<HashMap<QuoteRequestId, QuoteRequest>>,
    users: RwLock<HashMap<UserId, User>>,
}

impl MemoryStorage {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn create_quote_request(
        &self,
        new: NewQuoteRequest,
    ) -> Result<QuoteRequest, StorageError> {
        let mut map = self.quote_requests.write().await;

        // v4 collisions are vanishingly rare, but the contract says
        // never overwrite, so regenerate instead of clobbering.
        let mut id = QuoteRequestId::generate();
        while map.contains_key(&id) {
            id = QuoteRequestId::generate();
        }

        let record = new.into_record(id, Utc::now());
        map.insert(id, record.clone());
        Ok(record)
    }

    async fn quote_requests(&self) -> Result<Vec<QuoteRequest>, StorageError> {
        let map = self.quote_requests.read().await;
        let mut records: Vec<QuoteRequest> = map.values().cloned().collect();
        // Newest-first; id tiebreak keeps repeated calls identical
        records.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(records)
    }

    async fn quote_request(
        &self,
        id: QuoteRequestId,
    ) -> Result<Option<QuoteRequest>, StorageError> {
        Ok(self.quote_requests.read().await.get(&id).cloned())
    }

    async fn update_quote_request_status(
        &self,
        id: QuoteRequestId,
        status: QuoteStatus,
    ) -> Result<Option<QuoteRequest>, StorageError> {
        let mut map = self.quote_requests.write().await;
        Ok(map.get_mut(&id).map(|record| {
            record.status = status;
            record.clone()
        }))
    }

    async fn delete_quote_request(
        &self,
        id: QuoteRequestId,
    ) -> Result<Option<QuoteRequest>, StorageError> {
        Ok(self.quote_requests.write().await.remove(&id))
    }

    async fn create_user(&self, new: NewUser) -> Result<User, StorageError> {
        let mut map = self.users.write().await;

        if map.values().any(|u| u.username == new.username) {
            return Err(StorageError::Conflict("username already exists".to_owned()));
        }

        let user = User {
            id: UserId::generate(),
            username: new.username,
            password: new.password,
        };
        map.insert(user.id, user.clone());
        Ok(user)
    }

    async fn user(&self, id: UserId) -> Result<Option<User>, StorageError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn user_by_username(&self, username: &str) -> Result<Option<User>, StorageError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn ping(&self) -> Result<(), StorageError> {
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use welcome_home_core::{QuoteRequestInput, QuoteStatus};

    fn payload(first_name: &str) -> NewQuoteRequest {
        NewQuoteRequest::validate(QuoteRequestInput {
            first_name: Some(first_name.to_owned()),
            last_name: Some("Doe".to_owned()),
            phone: Some("9725551234".to_owned()),
            email: Some("jane@x.com".to_owned()),
            address: Some("1 Elm St".to_owned()),
            services: vec!["lawn-mowing".to_owned(), "edging".to_owned()],
            ..QuoteRequestInput::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_create_assigns_unique_ids_and_defaults() {
        let store = MemoryStorage::new();
        let before = Utc::now();

        let a = store.create_quote_request(payload("Jane")).await.unwrap();
        let b = store.create_quote_request(payload("John")).await.unwrap();

        assert_ne!(a.id, b.id);
        assert_eq!(a.status, QuoteStatus::Pending);
        assert!(a.created_at >= before);
        assert_eq!(a.services, vec!["lawn-mowing", "edging"]);
    }

    #[tokio::test]
    async fn test_round_trip_returns_equal_record() {
        let store = MemoryStorage::new();
        let created = store.create_quote_request(payload("Jane")).await.unwrap();

        let fetched = store.quote_request(created.id).await.unwrap().unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn test_list_is_newest_first_and_idempotent() {
        let store = MemoryStorage::new();
        for name in ["First", "Second", "Third"] {
            store.create_quote_request(payload(name)).await.unwrap();
            // Distinct timestamps so ordering is by creation time, not tiebreak
            tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        }

        let first = store.quote_requests().await.unwrap();
        let second = store.quote_requests().await.unwrap();
        assert_eq!(first, second);

        assert_eq!(first.len(), 3);
        assert_eq!(first[0].first_name, "Third");
        assert_eq!(first[2].first_name, "First");
        assert!(first[0].created_at >= first[1].created_at);
    }

    #[tokio::test]
    async fn test_update_status_overwrites_only_status() {
        let store = MemoryStorage::new();
        let created = store.create_quote_request(payload("Jane")).await.unwrap();

        let updated = store
            .update_quote_request_status(created.id, QuoteStatus::Contacted)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.status, QuoteStatus::Contacted);
        assert_eq!(updated.created_at, created.created_at);
        assert_eq!(updated.first_name, created.first_name);

        let fetched = store.quote_request(created.id).await.unwrap().unwrap();
        assert_eq!(fetched.status, QuoteStatus::Contacted);
    }

    #[tokio::test]
    async fn test_update_status_unknown_id_is_none() {
        let store = MemoryStorage::new();
        let result = store
            .update_quote_request_status(QuoteRequestId::generate(), QuoteStatus::Contacted)
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_delete_removes_record() {
        let store = MemoryStorage::new();
        let created = store.create_quote_request(payload("Jane")).await.unwrap();

        let removed = store.delete_quote_request(created.id).await.unwrap();
        assert_eq!(removed.map(|r| r.id), Some(created.id));

        assert!(store.quote_request(created.id).await.unwrap().is_none());
        assert!(store.delete_quote_request(created.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_create_user_enforces_unique_username() {
        let store = MemoryStorage::new();
        let new = NewUser {
            username: "operator".to_owned(),
            password: "hunter2hunter2".to_owned(),
        };

        let user = store.create_user(new.clone()).await.unwrap();
        assert_eq!(
            store
                .user_by_username("operator")
                .await
                .unwrap()
                .map(|u| u.id),
            Some(user.id)
        );
        assert_eq!(store.user(user.id).await.unwrap().map(|u| u.id), Some(user.id));

        let err = store.create_user(new).await.unwrap_err();
        assert!(matches!(err, StorageError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_ping() {
        assert!(MemoryStorage::new().ping().await.is_ok());
    }
}
