//! In-memory record store.
//!
//! Backs the integration tests (each test gets its own isolated, seedable
//! instance) and is handy for running the server without a database. Every
//! trait method takes the lock once, so each operation is atomic on its own,
//! matching the per-operation guarantee the SQL backend provides.

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{BlogPatch, BlogRecord, NewBlogRecord, RecordStore, StoreError, UserRecord};

#[derive(Default)]
struct Inner {
    /// Creation order is the vec order.
    blogs: Vec<BlogRecord>,
    users: Vec<UserRecord>,
}

#[derive(Default)]
pub struct MemoryRecordStore {
    inner: RwLock<Inner>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn list_blogs(&self) -> Result<Vec<BlogRecord>, StoreError> {
        Ok(self.inner.read().await.blogs.clone())
    }

    async fn find_blog(&self, id: &str) -> Result<Option<BlogRecord>, StoreError> {
        Ok(self
            .inner
            .read()
            .await
            .blogs
            .iter()
            .find(|b| b.id == id)
            .cloned())
    }

    async fn insert_blog(&self, blog: NewBlogRecord) -> Result<BlogRecord, StoreError> {
        let record = BlogRecord {
            id: Uuid::new_v4().to_string(),
            title: blog.title,
            author: blog.author,
            url: blog.url,
            likes: blog.likes,
            owner_id: blog.owner_id,
        };
        self.inner.write().await.blogs.push(record.clone());
        Ok(record)
    }

    async fn update_blog(
        &self,
        id: &str,
        patch: BlogPatch,
    ) -> Result<Option<BlogRecord>, StoreError> {
        let mut inner = self.inner.write().await;
        match inner.blogs.iter_mut().find(|b| b.id == id) {
            Some(blog) => {
                blog.apply(patch);
                Ok(Some(blog.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete_blog(&self, id: &str) -> Result<bool, StoreError> {
        let mut inner = self.inner.write().await;
        let before = inner.blogs.len();
        inner.blogs.retain(|b| b.id != id);
        Ok(inner.blogs.len() < before)
    }

    async fn find_user(&self, id: &str) -> Result<Option<UserRecord>, StoreError> {
        Ok(self
            .inner
            .read()
            .await
            .users
            .iter()
            .find(|u| u.id == id)
            .cloned())
    }

    async fn save_user(&self, user: UserRecord) -> Result<UserRecord, StoreError> {
        let mut inner = self.inner.write().await;
        match inner.users.iter_mut().find(|u| u.id == user.id) {
            Some(existing) => *existing = user.clone(),
            None => inner.users.push(user.clone()),
        }
        Ok(user)
    }
}
