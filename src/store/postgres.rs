//! SeaORM/PostgreSQL record store.

use async_trait::async_trait;
use sea_orm::*;
use uuid::Uuid;

use crate::entity::{blog, user};

use super::{BlogPatch, BlogRecord, NewBlogRecord, RecordStore, StoreError, UserRecord};

pub struct PgRecordStore {
    db: DatabaseConnection,
}

impl PgRecordStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// Opaque ids that are not valid UUIDs simply fail to resolve.
fn parse_id(id: &str) -> Option<Uuid> {
    Uuid::parse_str(id).ok()
}

fn blog_record(m: blog::Model) -> BlogRecord {
    BlogRecord {
        id: m.id.to_string(),
        title: m.title,
        author: m.author,
        url: m.url,
        likes: m.likes,
        owner_id: m.owner_id.to_string(),
    }
}

fn user_record(m: user::Model) -> UserRecord {
    UserRecord {
        id: m.id.to_string(),
        username: m.username,
        name: m.name,
        blog_ids: m.blog_ids,
    }
}

#[async_trait]
impl RecordStore for PgRecordStore {
    async fn list_blogs(&self) -> Result<Vec<BlogRecord>, StoreError> {
        let rows = blog::Entity::find()
            .order_by_asc(blog::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(blog_record).collect())
    }

    async fn find_blog(&self, id: &str) -> Result<Option<BlogRecord>, StoreError> {
        let Some(id) = parse_id(id) else {
            return Ok(None);
        };
        let row = blog::Entity::find_by_id(id).one(&self.db).await?;
        Ok(row.map(blog_record))
    }

    async fn insert_blog(&self, new: NewBlogRecord) -> Result<BlogRecord, StoreError> {
        let owner_id = parse_id(&new.owner_id)
            .ok_or_else(|| StoreError::Backend(format!("owner id '{}' is not a UUID", new.owner_id)))?;

        let model = blog::ActiveModel {
            id: Set(Uuid::new_v4()),
            title: Set(new.title),
            author: Set(new.author),
            url: Set(new.url),
            likes: Set(new.likes),
            owner_id: Set(owner_id),
            created_at: Set(chrono::Utc::now()),
            ..Default::default()
        };

        let row = model.insert(&self.db).await?;
        Ok(blog_record(row))
    }

    async fn update_blog(
        &self,
        id: &str,
        patch: BlogPatch,
    ) -> Result<Option<BlogRecord>, StoreError> {
        let Some(id) = parse_id(id) else {
            return Ok(None);
        };
        let Some(existing) = blog::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };

        let mut active: blog::ActiveModel = existing.into();
        if let Some(title) = patch.title {
            active.title = Set(title);
        }
        if let Some(author) = patch.author {
            active.author = Set(author);
        }
        if let Some(url) = patch.url {
            active.url = Set(url);
        }
        if let Some(likes) = patch.likes {
            active.likes = Set(likes);
        }

        let row = active.update(&self.db).await?;
        Ok(Some(blog_record(row)))
    }

    async fn delete_blog(&self, id: &str) -> Result<bool, StoreError> {
        let Some(id) = parse_id(id) else {
            return Ok(false);
        };
        let result = blog::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }

    async fn find_user(&self, id: &str) -> Result<Option<UserRecord>, StoreError> {
        let Some(id) = parse_id(id) else {
            return Ok(None);
        };
        let row = user::Entity::find_by_id(id).one(&self.db).await?;
        Ok(row.map(user_record))
    }

    async fn save_user(&self, record: UserRecord) -> Result<UserRecord, StoreError> {
        let id = parse_id(&record.id)
            .ok_or_else(|| StoreError::Backend(format!("user id '{}' is not a UUID", record.id)))?;

        match user::Entity::find_by_id(id).one(&self.db).await? {
            Some(existing) => {
                let mut active: user::ActiveModel = existing.into();
                active.username = Set(record.username.clone());
                active.name = Set(record.name.clone());
                active.blog_ids = Set(record.blog_ids.clone());
                active.update(&self.db).await?;
            }
            None => {
                let model = user::ActiveModel {
                    id: Set(id),
                    username: Set(record.username.clone()),
                    name: Set(record.name.clone()),
                    blog_ids: Set(record.blog_ids.clone()),
                    created_at: Set(chrono::Utc::now()),
                    ..Default::default()
                };
                model.insert(&self.db).await?;
            }
        }

        Ok(record)
    }
}
