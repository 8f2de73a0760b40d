//! The seam between list views and the backing service.

use std::sync::Arc;

use andon_core::entity::{EntityInput, EntityKind, EntityRecord};
use andon_core::types::EntityId;
use async_trait::async_trait;

use crate::client::AndonApi;
use crate::error::ApiError;

/// CRUD operations a list view needs from the backend.
///
/// [`AndonApi`] is the production implementation.
#[async_trait]
pub trait EntityService: Send + Sync {
    async fn list(
        &self,
        kind: EntityKind,
        parent_id: Option<&str>,
    ) -> Result<Vec<EntityRecord>, ApiError>;

    async fn create(&self, kind: EntityKind, input: &EntityInput)
        -> Result<EntityRecord, ApiError>;

    async fn update(
        &self,
        kind: EntityKind,
        id: &str,
        input: &EntityInput,
    ) -> Result<EntityRecord, ApiError>;

    async fn delete(&self, kind: EntityKind, id: &str) -> Result<EntityId, ApiError>;
}

#[async_trait]
impl EntityService for AndonApi {
    async fn list(
        &self,
        kind: EntityKind,
        parent_id: Option<&str>,
    ) -> Result<Vec<EntityRecord>, ApiError> {
        AndonApi::list(self, kind, parent_id).await
    }

    async fn create(
        &self,
        kind: EntityKind,
        input: &EntityInput,
    ) -> Result<EntityRecord, ApiError> {
        AndonApi::create(self, kind, input).await
    }

    async fn update(
        &self,
        kind: EntityKind,
        id: &str,
        input: &EntityInput,
    ) -> Result<EntityRecord, ApiError> {
        AndonApi::update(self, kind, id, input).await
    }

    async fn delete(&self, kind: EntityKind, id: &str) -> Result<EntityId, ApiError> {
        AndonApi::delete(self, kind, id).await
    }
}

#[async_trait]
impl<T: EntityService + ?Sized> EntityService for Arc<T> {
    async fn list(
        &self,
        kind: EntityKind,
        parent_id: Option<&str>,
    ) -> Result<Vec<EntityRecord>, ApiError> {
        (**self).list(kind, parent_id).await
    }

    async fn create(
        &self,
        kind: EntityKind,
        input: &EntityInput,
    ) -> Result<EntityRecord, ApiError> {
        (**self).create(kind, input).await
    }

    async fn update(
        &self,
        kind: EntityKind,
        id: &str,
        input: &EntityInput,
    ) -> Result<EntityRecord, ApiError> {
        (**self).update(kind, id, input).await
    }

    async fn delete(&self, kind: EntityKind, id: &str) -> Result<EntityId, ApiError> {
        (**self).delete(kind, id).await
    }
}
