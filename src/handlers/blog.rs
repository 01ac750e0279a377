use std::collections::HashMap;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::{AuthUser, bearer_token};
use crate::extractors::json::AppJson;
use crate::models::blog::*;
use crate::state::AppState;
use crate::store::{NewBlogRecord, UserRecord};

#[utoipa::path(
    get,
    path = "/api/blogs",
    tag = "Blogs",
    operation_id = "listBlogs",
    summary = "List all blog records",
    description = "Returns every blog record, each augmented with a summary of its owner (id, username, name only). No authentication required.",
    responses(
        (status = 200, description = "List of blogs", body = Vec<BlogWithOwner>),
    ),
)]
#[instrument(skip(state))]
pub async fn list_blogs(State(state): State<AppState>) -> Result<Json<Vec<BlogWithOwner>>, AppError> {
    let blogs = state.store.list_blogs().await?;

    // Resolve each distinct owner once.
    let mut owners: HashMap<String, Option<UserRecord>> = HashMap::new();
    for blog in &blogs {
        if !owners.contains_key(&blog.owner_id) {
            let owner = state.store.find_user(&blog.owner_id).await?;
            owners.insert(blog.owner_id.clone(), owner);
        }
    }

    let items = blogs
        .into_iter()
        .map(|blog| {
            let owner = owners.get(&blog.owner_id).cloned().flatten();
            BlogWithOwner::new(blog, owner)
        })
        .collect();

    Ok(Json(items))
}

#[utoipa::path(
    get,
    path = "/api/blogs/{id}",
    tag = "Blogs",
    operation_id = "getBlog",
    summary = "Get a blog record by id",
    description = "Returns a single blog record. No authentication required.",
    params(("id" = String, Path, description = "Blog id")),
    responses(
        (status = 200, description = "Blog record", body = BlogResponse),
        (status = 404, description = "Blog not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id))]
pub async fn get_blog(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<BlogResponse>, AppError> {
    let blog = state
        .store
        .find_blog(&id)
        .await?
        .ok_or_else(|| AppError::NotFound("Blog not found".into()))?;

    Ok(Json(blog.into()))
}

#[utoipa::path(
    post,
    path = "/api/blogs",
    tag = "Blogs",
    operation_id = "createBlog",
    summary = "Create a new blog record",
    description = "Creates a blog record owned by the authenticated user. `likes` defaults to 0 when omitted. The new record's id is appended to the owner's blog list in a second, non-atomic write: the record counts as created even if that append fails.",
    request_body = CreateBlogRequest,
    responses(
        (status = 201, description = "Blog created", body = BlogResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(title = %payload.title))]
pub async fn create_blog(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateBlogRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_create_blog(&payload)?;

    let new_blog = NewBlogRecord {
        title: payload.title.trim().to_string(),
        author: payload.author,
        url: payload.url.trim().to_string(),
        likes: payload.likes.unwrap_or(0),
        owner_id: auth_user.user_id.clone(),
    };

    let blog = state.store.insert_blog(new_blog).await?;

    // Second write of the non-atomic pair. The record above already exists, so
    // a failure here leaves the owner index behind rather than undoing the
    // create; readers of `blog_ids` must tolerate that.
    match state.store.find_user(&auth_user.user_id).await {
        Ok(Some(mut user)) => {
            user.blog_ids.push(blog.id.clone());
            if let Err(e) = state.store.save_user(user).await {
                tracing::warn!("Owner index update failed for blog {}: {}", blog.id, e);
            }
        }
        Ok(None) => {
            tracing::warn!(
                "Blog {} created for unknown user {}",
                blog.id,
                auth_user.user_id
            );
        }
        Err(e) => {
            tracing::warn!("Owner lookup failed after creating blog {}: {}", blog.id, e);
        }
    }

    Ok((StatusCode::CREATED, Json(BlogResponse::from(blog))))
}

#[utoipa::path(
    put,
    path = "/api/blogs/{id}",
    tag = "Blogs",
    operation_id = "updateBlog",
    summary = "Update a blog record",
    description = "Replaces the fields present in the payload; absent fields are left unchanged. No authentication or ownership check is performed: any client that knows a blog's id may update it, including its like count. This mirrors the public like-button flow and is a known design weakness of the API contract.",
    params(("id" = String, Path, description = "Blog id")),
    request_body = UpdateBlogRequest,
    responses(
        (status = 200, description = "Blog updated", body = BlogResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Blog not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(id))]
pub async fn update_blog(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(payload): AppJson<UpdateBlogRequest>,
) -> Result<Json<BlogResponse>, AppError> {
    validate_update_blog(&payload)?;

    let updated = state
        .store
        .update_blog(&id, payload.into())
        .await?
        .ok_or_else(|| AppError::NotFound("Blog not found".into()))?;

    Ok(Json(updated.into()))
}

#[utoipa::path(
    delete,
    path = "/api/blogs/{id}",
    tag = "Blogs",
    operation_id = "deleteBlog",
    summary = "Delete a blog record",
    description = "Permanently deletes a blog record. Only the owner may delete it. Existence is checked before the credential, so an unknown id yields 404 even without a token. The owner's blog list is not cleaned up; it may keep referencing the deleted id.",
    params(("id" = String, Path, description = "Blog id")),
    responses(
        (status = 204, description = "Blog deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Blog not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, headers), fields(id))]
pub async fn delete_blog(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    // Existence first, credential second: an unknown id is 404 regardless of
    // who asks.
    let blog = state
        .store
        .find_blog(&id)
        .await?
        .ok_or_else(|| AppError::NotFound("Blog not found".into()))?;

    let token = bearer_token(&headers)?;
    let subject = state.verifier.verify(token)?;

    if subject != blog.owner_id {
        return Err(AppError::PermissionDenied);
    }

    // A concurrent delete may have won the race since the lookup above.
    let removed = state.store.delete_blog(&id).await?;
    if !removed {
        return Err(AppError::NotFound("Blog not found".into()));
    }

    Ok(StatusCode::NO_CONTENT)
}
