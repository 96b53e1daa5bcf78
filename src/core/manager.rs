//! Generic resource lifecycle
//!
//! Every resource shares the same protocol: lookups report absence as
//! `NotFound`, updates require the path id and body id to agree, and a
//! conflicting replace is resolved by re-checking whether the row exists.

use crate::core::error::{BakeryError, BakeryResult, EntityError, StorageError};
use crate::core::service::{DataStore, ListingStore, Record};
use std::marker::PhantomData;
use std::sync::Arc;

/// CRUD manager for one record type
///
/// `S` is the store handle; it defaults to a [`ListingStore`] object and is
/// narrowed by resources that need a richer store.
pub struct ResourceManager<R: Record, S: ?Sized + DataStore<R> = dyn ListingStore<R>> {
    store: Arc<S>,
    _record: PhantomData<fn() -> R>,
}

impl<R: Record, S: ?Sized + DataStore<R>> Clone for ResourceManager<R, S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            _record: PhantomData,
        }
    }
}

impl<R: Record, S: ?Sized + DataStore<R>> ResourceManager<R, S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            _record: PhantomData,
        }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub async fn get(&self, id: i32) -> BakeryResult<R> {
        match self.store.get(id).await? {
            Some(record) => Ok(record),
            None => {
                tracing::warn!(entity = R::ENTITY_TYPE, id, "not found");
                Err(not_found::<R>(id))
            }
        }
    }

    pub async fn create(&self, draft: R::Draft) -> BakeryResult<R> {
        let record = self.store.insert(draft).await?;
        tracing::info!(entity = R::ENTITY_TYPE, id = record.id(), "created");
        Ok(record)
    }

    /// Replace a row and return it as stored
    pub async fn update(&self, id: i32, draft: R::Draft) -> BakeryResult<R> {
        let body_id = R::draft_id(&draft);
        if body_id != Some(id) {
            tracing::warn!(entity = R::ENTITY_TYPE, path_id = id, ?body_id, "identity mismatch");
            return Err(EntityError::IdentityMismatch {
                entity_type: R::ENTITY_TYPE.to_string(),
                path_id: id,
                body_id,
            }
            .into());
        }

        match self.store.replace(id, draft).await {
            Ok(()) => {}
            Err(StorageError::Conflict { message }) => {
                self.resolve_conflict(id, message).await?;
            }
            Err(StorageError::NotFound { .. }) => return Err(not_found::<R>(id)),
            Err(e) => return Err(e.into()),
        }

        tracing::info!(entity = R::ENTITY_TYPE, id, "updated");
        self.reread(id).await
    }

    pub async fn delete(&self, id: i32) -> BakeryResult<()> {
        if !self.store.exists(id).await? {
            tracing::warn!(entity = R::ENTITY_TYPE, id, "delete of missing row");
            return Err(not_found::<R>(id));
        }
        match self.store.delete(id).await {
            Ok(()) => {
                tracing::info!(entity = R::ENTITY_TYPE, id, "deleted");
                Ok(())
            }
            // Removed concurrently between the check and the delete.
            Err(StorageError::NotFound { .. }) => Err(not_found::<R>(id)),
            Err(e) => Err(e.into()),
        }
    }

    /// Fetch a row that was just written; vanishing in between is a not found
    pub(crate) async fn reread(&self, id: i32) -> BakeryResult<R> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| not_found::<R>(id))
    }

    /// A conflicting write becomes `NotFound` if the row is gone, else it is fatal
    async fn resolve_conflict(&self, id: i32, message: String) -> BakeryResult<()> {
        if self.store.exists(id).await? {
            tracing::error!(entity = R::ENTITY_TYPE, id, %message, "unresolved conflict");
            Err(EntityError::Conflict {
                entity_type: R::ENTITY_TYPE.to_string(),
                id,
                message,
            }
            .into())
        } else {
            tracing::warn!(entity = R::ENTITY_TYPE, id, "conflict on missing row");
            Err(not_found::<R>(id))
        }
    }
}

impl<R: Record, S: ?Sized + ListingStore<R>> ResourceManager<R, S> {
    /// All rows in display order
    pub async fn list(&self) -> BakeryResult<Vec<R>> {
        let mut records = self.store.list().await?;
        if records.is_empty() && R::EMPTY_LIST_IS_NOT_FOUND {
            tracing::warn!(entity = R::ENTITY_TYPE, "listing is empty");
            return Err(EntityError::NoneFound {
                entity_type: R::PLURAL.to_string(),
            }
            .into());
        }
        records.sort_by(|a, b| a.display_order(b));
        tracing::debug!(entity = R::ENTITY_TYPE, count = records.len(), "listed");
        Ok(records)
    }
}

pub(crate) fn not_found<R: Record>(id: i32) -> BakeryError {
    EntityError::NotFound {
        entity_type: R::ENTITY_TYPE.to_string(),
        id,
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::StorageResult;
    use crate::entities::product::{Product, ProductDraft};
    use crate::storage::InMemoryStore;
    use async_trait::async_trait;
    use axum::http::StatusCode;
    use rust_decimal::Decimal;
    use std::sync::atomic::{AtomicBool, Ordering};

    fn draft(name: &str) -> ProductDraft {
        ProductDraft {
            product_id: None,
            product_name: name.to_string(),
            category: "Viennoiserie".to_string(),
            price: Decimal::new(350, 2),
            cost: Decimal::new(120, 2),
            description: None,
            seasonal: false,
            active: true,
            introduced_date: crate::core::datetime::parse("2024-01-01").unwrap(),
            ingredients: None,
        }
    }

    fn manager() -> ResourceManager<Product> {
        let store: Arc<dyn ListingStore<Product>> = Arc::new(InMemoryStore::new());
        ResourceManager::new(store)
    }

    /// Store whose replace always conflicts; `present` controls `get`
    struct ConflictingStore {
        inner: InMemoryStore,
        present: AtomicBool,
    }

    #[async_trait]
    impl DataStore<Product> for ConflictingStore {
        async fn get(&self, id: i32) -> StorageResult<Option<Product>> {
            if self.present.load(Ordering::SeqCst) {
                DataStore::<Product>::get(&self.inner, id).await
            } else {
                Ok(None)
            }
        }
        async fn insert(&self, draft: ProductDraft) -> StorageResult<Product> {
            DataStore::<Product>::insert(&self.inner, draft).await
        }
        async fn replace(&self, _id: i32, _draft: ProductDraft) -> StorageResult<()> {
            Err(StorageError::Conflict {
                message: "row version changed".to_string(),
            })
        }
        async fn delete(&self, id: i32) -> StorageResult<()> {
            DataStore::<Product>::delete(&self.inner, id).await
        }
    }

    #[async_trait]
    impl ListingStore<Product> for ConflictingStore {
        async fn list(&self) -> StorageResult<Vec<Product>> {
            ListingStore::<Product>::list(&self.inner).await
        }
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let err = manager().get(9).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "Product with ID 9 not found.");
    }

    #[tokio::test]
    async fn test_empty_product_list_is_not_found() {
        let err = manager().list().await.unwrap_err();
        assert_eq!(err.to_string(), "No products found.");
    }

    #[tokio::test]
    async fn test_list_sorted_by_name() {
        let manager = manager();
        manager.create(draft("Pain au chocolat")).await.unwrap();
        manager.create(draft("Baguette")).await.unwrap();
        let names: Vec<String> = manager
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.product_name)
            .collect();
        assert_eq!(names, vec!["Baguette", "Pain au chocolat"]);
    }

    #[tokio::test]
    async fn test_update_identity_mismatch_is_bad_request() {
        let manager = manager();
        let created = manager.create(draft("Croissant")).await.unwrap();
        let mut body = draft("Croissant");
        body.product_id = Some(created.product_id + 1);
        let err = manager.update(created.product_id, body).await.unwrap_err();
        assert!(matches!(
            err,
            BakeryError::Entity(EntityError::IdentityMismatch { .. })
        ));
        assert_eq!(err.to_string(), "Product ID mismatch.");
    }

    #[tokio::test]
    async fn test_update_missing_body_id_is_mismatch() {
        let err = manager().update(1, draft("Croissant")).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_update_echoes_stored_record() {
        let manager = manager();
        let created = manager.create(draft("Croissant")).await.unwrap();
        let mut body = draft("Croissant aux amandes");
        body.product_id = Some(created.product_id);
        let updated = manager.update(created.product_id, body).await.unwrap();
        assert_eq!(updated.product_name, "Croissant aux amandes");
    }

    #[tokio::test]
    async fn test_update_missing_row_is_not_found() {
        let mut body = draft("Croissant");
        body.product_id = Some(42);
        let err = manager().update(42, body).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_conflict_on_vanished_row_is_not_found() {
        let store = ConflictingStore {
            inner: InMemoryStore::new(),
            present: AtomicBool::new(true),
        };
        let created = DataStore::<Product>::insert(&store.inner, draft("Brioche"))
            .await
            .unwrap();
        store.present.store(false, Ordering::SeqCst);
        let manager = ResourceManager::<Product>::new(Arc::new(store));

        let mut body = draft("Brioche");
        body.product_id = Some(created.product_id);
        let err = manager.update(created.product_id, body).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_conflict_on_existing_row_is_fatal() {
        let store = ConflictingStore {
            inner: InMemoryStore::new(),
            present: AtomicBool::new(true),
        };
        let created = DataStore::<Product>::insert(&store.inner, draft("Brioche"))
            .await
            .unwrap();
        let manager = ResourceManager::<Product>::new(Arc::new(store));

        let mut body = draft("Brioche");
        body.product_id = Some(created.product_id);
        let err = manager.update(created.product_id, body).await.unwrap_err();
        assert!(matches!(err, BakeryError::Entity(EntityError::Conflict { .. })));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_delete_then_get_is_not_found() {
        let manager = manager();
        let created = manager.create(draft("Éclair")).await.unwrap();
        manager.delete(created.product_id).await.unwrap();
        assert!(manager.get(created.product_id).await.is_err());
        let err = manager.delete(created.product_id).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }
}
