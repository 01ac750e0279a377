//! Startup and test seeding.
//!
//! Seed data is an explicit value handed to [`apply`], never a process-wide
//! constant, so concurrent tests can each seed their own isolated store. The
//! server optionally loads one from a JSON file named in the configuration.

use std::fs::File;
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use crate::store::{BlogRecord, NewBlogRecord, RecordStore, StoreError, UserRecord};

#[derive(Debug, Clone, Deserialize)]
pub struct SeedUser {
    pub id: String,
    pub username: String,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedBlog {
    pub title: String,
    pub author: Option<String>,
    pub url: String,
    #[serde(default)]
    pub likes: i64,
    pub owner_id: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub users: Vec<SeedUser>,
    #[serde(default)]
    pub blogs: Vec<SeedBlog>,
}

impl SeedData {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let file = File::open(path)?;
        Ok(serde_json::from_reader(file)?)
    }
}

/// Apply a seed collection through the store interface.
///
/// Users are saved first (with empty blog lists), then each blog is inserted
/// and appended to its owner's list, the same two-step write the create
/// operation performs. Returns the created blog records in input order so
/// callers know the assigned ids.
pub async fn apply(
    store: &dyn RecordStore,
    data: &SeedData,
) -> Result<Vec<BlogRecord>, StoreError> {
    for user in &data.users {
        store
            .save_user(UserRecord {
                id: user.id.clone(),
                username: user.username.clone(),
                name: user.name.clone(),
                blog_ids: vec![],
            })
            .await?;
    }

    let mut created = Vec::with_capacity(data.blogs.len());
    for blog in &data.blogs {
        let record = store
            .insert_blog(NewBlogRecord {
                title: blog.title.clone(),
                author: blog.author.clone(),
                url: blog.url.clone(),
                likes: blog.likes,
                owner_id: blog.owner_id.clone(),
            })
            .await?;

        if let Some(mut owner) = store.find_user(&blog.owner_id).await? {
            owner.blog_ids.push(record.id.clone());
            store.save_user(owner).await?;
        }

        created.push(record);
    }

    if !data.users.is_empty() || !created.is_empty() {
        info!("Seeded {} users and {} blogs", data.users.len(), created.len());
    }

    Ok(created)
}
