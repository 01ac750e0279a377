use axum::{Router, routing::get};

use crate::handlers;
use crate::state::AppState;

pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/blogs", blog_routes())
}

fn blog_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::blog::list_blogs).post(handlers::blog::create_blog),
        )
        .route(
            "/{id}",
            get(handlers::blog::get_blog)
                .put(handlers::blog::update_blog)
                .delete(handlers::blog::delete_blog),
        )
}
