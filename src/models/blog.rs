use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::store::{BlogPatch, BlogRecord, UserRecord};

use super::shared::double_option;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateBlogRequest {
    pub title: String,
    pub author: Option<String>,
    pub url: String,
    /// Defaults to 0 when omitted.
    pub likes: Option<i64>,
}

#[derive(Deserialize, Default, PartialEq, utoipa::ToSchema)]
pub struct UpdateBlogRequest {
    pub title: Option<String>,
    /// Omit to leave unchanged, null to clear, or provide a value.
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub author: Option<Option<String>>,
    pub url: Option<String>,
    pub likes: Option<i64>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct BlogResponse {
    pub id: String,
    pub title: String,
    pub author: Option<String>,
    pub url: String,
    pub likes: i64,
    pub owner_id: String,
}

/// The owner fields exposed on the list endpoint. Nothing beyond id,
/// username, and display name leaves the service.
#[derive(Serialize, utoipa::ToSchema)]
pub struct OwnerSummary {
    pub id: String,
    pub username: String,
    pub name: String,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct BlogWithOwner {
    pub id: String,
    pub title: String,
    pub author: Option<String>,
    pub url: String,
    pub likes: i64,
    /// `null` if the owning user record cannot currently be resolved.
    pub owner: Option<OwnerSummary>,
}

impl From<BlogRecord> for BlogResponse {
    fn from(r: BlogRecord) -> Self {
        Self {
            id: r.id,
            title: r.title,
            author: r.author,
            url: r.url,
            likes: r.likes,
            owner_id: r.owner_id,
        }
    }
}

impl From<UserRecord> for OwnerSummary {
    fn from(u: UserRecord) -> Self {
        Self {
            id: u.id,
            username: u.username,
            name: u.name,
        }
    }
}

impl BlogWithOwner {
    pub fn new(record: BlogRecord, owner: Option<UserRecord>) -> Self {
        Self {
            id: record.id,
            title: record.title,
            author: record.author,
            url: record.url,
            likes: record.likes,
            owner: owner.map(OwnerSummary::from),
        }
    }
}

impl From<UpdateBlogRequest> for BlogPatch {
    fn from(req: UpdateBlogRequest) -> Self {
        Self {
            title: req.title,
            author: req.author,
            url: req.url,
            likes: req.likes,
        }
    }
}

pub fn validate_create_blog(req: &CreateBlogRequest) -> Result<(), AppError> {
    if req.title.trim().is_empty() {
        return Err(AppError::Validation("Title must not be empty".into()));
    }
    if req.url.trim().is_empty() {
        return Err(AppError::Validation("URL must not be empty".into()));
    }
    validate_likes(req.likes)
}

/// Update is free-form field replacement; the only invariant re-checked here
/// is that the like count stays non-negative.
pub fn validate_update_blog(req: &UpdateBlogRequest) -> Result<(), AppError> {
    validate_likes(req.likes)
}

fn validate_likes(likes: Option<i64>) -> Result<(), AppError> {
    if let Some(likes) = likes
        && likes < 0
    {
        return Err(AppError::Validation("Likes must not be negative".into()));
    }
    Ok(())
}
