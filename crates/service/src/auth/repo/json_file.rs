use std::{path::PathBuf, sync::Arc};

use async_trait::async_trait;
use models::User;
use tracing::debug;
use uuid::Uuid;

use crate::auth::context::RequestContext;
use crate::auth::repository::{check_unique, UserRepo};
use crate::errors::StoreError;
use crate::storage::json_map_store::JsonMapStore;

/// File-backed user store. Users are kept as `id -> User` in one JSON document.
#[derive(Clone)]
pub struct JsonFileUserRepo {
    store: Arc<JsonMapStore<Uuid, User>>,
}

impl JsonFileUserRepo {
    /// Open the store at the given path. Creates the file if missing.
    pub async fn open<P: Into<PathBuf>>(path: P) -> Result<Self, StoreError> {
        let store = JsonMapStore::<Uuid, User>::open(path).await?;
        debug!(path = %store.path().display(), users = store.len().await, "user store opened");
        Ok(Self { store })
    }

    pub async fn count(&self) -> usize { self.store.len().await }
}

#[async_trait]
impl UserRepo for JsonFileUserRepo {
    async fn get_by_username(&self, _ctx: &RequestContext, username: &str) -> Result<User, StoreError> {
        self.store.find(|u| u.username == username).await.ok_or(StoreError::NotFound)
    }

    async fn get_by_email(&self, _ctx: &RequestContext, email: &str) -> Result<User, StoreError> {
        self.store.find(|u| u.email == email).await.ok_or(StoreError::NotFound)
    }

    async fn create(&self, ctx: &RequestContext, user: User) -> Result<User, StoreError> {
        let created = user.clone();
        self.store
            .update_map(move |users| {
                check_unique(users.values(), &user)?;
                users.insert(user.id, user);
                Ok(())
            })
            .await?;
        debug!(request_id = %ctx.request_id(), user_id = %created.id, "user persisted");
        Ok(created)
    }
}
