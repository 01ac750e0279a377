//! The record store: the only shared mutable resource in the system.
//!
//! The access service talks to persistence exclusively through the
//! [`RecordStore`] trait. Each individual operation is atomic on its own;
//! sequences of operations (such as a blog insert followed by the owner-index
//! append) carry no combined atomicity guarantee.

mod memory;
mod postgres;

use async_trait::async_trait;

pub use memory::MemoryRecordStore;
pub use postgres::PgRecordStore;

/// A single catalog entry. `id` is opaque, assigned by the store at creation
/// and stable until deletion. `owner_id` is fixed at creation and never
/// reassigned.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlogRecord {
    pub id: String,
    pub title: String,
    pub author: Option<String>,
    pub url: String,
    pub likes: i64,
    pub owner_id: String,
}

/// Fields of a blog record before the store has assigned an id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewBlogRecord {
    pub title: String,
    pub author: Option<String>,
    pub url: String,
    pub likes: i64,
    pub owner_id: String,
}

/// Partial replacement of a blog record's mutable fields. `None` leaves the
/// stored value unchanged; `author` distinguishes "leave unchanged" from
/// "clear" with a nested option.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BlogPatch {
    pub title: Option<String>,
    pub author: Option<Option<String>>,
    pub url: Option<String>,
    pub likes: Option<i64>,
}

/// A user as the catalog sees it. `blog_ids` is ordered by creation; it is
/// appended to when the user creates a blog but deliberately NOT cleaned when
/// one of their blogs is deleted, so it may reference ids that no longer
/// resolve.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserRecord {
    pub id: String,
    pub username: String,
    pub name: String,
    pub blog_ids: Vec<String>,
}

/// Unclassified store failure, propagated unchanged to the caller.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store backend error: {0}")]
    Backend(String),
}

impl From<sea_orm::DbErr> for StoreError {
    fn from(err: sea_orm::DbErr) -> Self {
        StoreError::Backend(err.to_string())
    }
}

/// Persistence capability for blog and user records.
///
/// Identifiers are opaque strings; an id the backend cannot even parse simply
/// fails to resolve (`Ok(None)` / `Ok(false)`), it is never a hard error.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// All blog records, in creation order.
    async fn list_blogs(&self) -> Result<Vec<BlogRecord>, StoreError>;

    async fn find_blog(&self, id: &str) -> Result<Option<BlogRecord>, StoreError>;

    /// Persist a new record, assigning its id.
    async fn insert_blog(&self, blog: NewBlogRecord) -> Result<BlogRecord, StoreError>;

    /// Apply a partial update, returning the post-update record, or `None` if
    /// the id does not resolve.
    async fn update_blog(
        &self,
        id: &str,
        patch: BlogPatch,
    ) -> Result<Option<BlogRecord>, StoreError>;

    /// Remove a record permanently. Returns `false` if the id did not resolve
    /// (e.g. a concurrent delete got there first).
    async fn delete_blog(&self, id: &str) -> Result<bool, StoreError>;

    async fn find_user(&self, id: &str) -> Result<Option<UserRecord>, StoreError>;

    /// Insert the user, or replace it wholesale if the id already exists.
    async fn save_user(&self, user: UserRecord) -> Result<UserRecord, StoreError>;
}

impl BlogRecord {
    /// Apply a patch in place: present fields replace, absent fields stay.
    pub(crate) fn apply(&mut self, patch: BlogPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(author) = patch.author {
            self.author = author;
        }
        if let Some(url) = patch.url {
            self.url = url;
        }
        if let Some(likes) = patch.likes {
            self.likes = likes;
        }
    }
}
