use serde_json::json;

use blog_catalog::store::RecordStore;

use crate::common::{ALICE, BOB, TestApp, routes, sample_seed};

mod listing {
    use super::*;

    #[tokio::test]
    async fn all_seeded_blogs_are_returned() {
        let (app, created) = TestApp::spawn_seeded(&sample_seed()).await;

        let res = app.get(routes::BLOGS).await;

        assert_eq!(res.status, 200);
        let blogs = res.body.as_array().expect("expected a JSON array");
        assert_eq!(blogs.len(), created.len());
    }

    #[tokio::test]
    async fn each_blog_carries_an_owner_summary_and_nothing_more() {
        let (app, _) = TestApp::spawn_seeded(&sample_seed()).await;

        let res = app.get(routes::BLOGS).await;

        let owner = res.body[0]["owner"]
            .as_object()
            .expect("expected an owner object");
        assert_eq!(owner["id"], ALICE);
        assert_eq!(owner["username"], "alice");
        assert_eq!(owner["name"], "Alice Harper");
        // Only id, username, and name are exposed.
        assert_eq!(owner.len(), 3);
    }

    #[tokio::test]
    async fn an_empty_store_lists_as_an_empty_array() {
        let app = TestApp::spawn().await;

        let res = app.get(routes::BLOGS).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body.as_array().map(Vec::len), Some(0));
    }
}

mod fetching {
    use super::*;

    #[tokio::test]
    async fn an_existing_blog_is_returned_by_id() {
        let (app, created) = TestApp::spawn_seeded(&sample_seed()).await;
        let first = &created[0];

        let res = app.get(&routes::blog(&first.id)).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["id"], first.id);
        assert_eq!(res.body["title"], "React patterns");
        assert_eq!(res.body["owner_id"], ALICE);
    }

    #[tokio::test]
    async fn an_unknown_id_yields_not_found() {
        let (app, _) = TestApp::spawn_seeded(&sample_seed()).await;

        let res = app
            .get(&routes::blog("00000000-0000-0000-0000-000000000000"))
            .await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn a_malformed_id_also_yields_not_found() {
        // Ids are opaque; one the store cannot even parse simply fails to
        // resolve.
        let (app, _) = TestApp::spawn_seeded(&sample_seed()).await;

        let res = app.get(&routes::blog("definitely-not-an-id")).await;

        assert_eq!(res.status, 404);
    }
}

mod creation {
    use super::*;

    #[tokio::test]
    async fn a_valid_token_creates_a_blog_owned_by_the_subject() {
        let (app, created) = TestApp::spawn_seeded(&sample_seed()).await;
        let token = app.token_for(ALICE, "alice");

        let res = app
            .post_with_token(
                routes::BLOGS,
                &json!({
                    "title": "Understanding Ownership",
                    "author": "Alice Harper",
                    "url": "https://example.com/ownership",
                    "likes": 3,
                }),
                &token,
            )
            .await;

        assert_eq!(res.status, 201, "create failed: {}", res.text);
        assert!(res.body["id"].is_string());
        assert_eq!(res.body["owner_id"], ALICE);

        let list = app.get(routes::BLOGS).await;
        let blogs = list.body.as_array().unwrap();
        assert_eq!(blogs.len(), created.len() + 1);
        assert!(
            blogs
                .iter()
                .any(|b| b["title"] == "Understanding Ownership")
        );
    }

    #[tokio::test]
    async fn likes_defaults_to_zero_when_omitted() {
        let app = TestApp::spawn().await;
        let token = app.token_for(ALICE, "alice");

        let res = app
            .post_with_token(
                routes::BLOGS,
                &json!({"title": "T", "url": "https://example.com/t"}),
                &token,
            )
            .await;

        assert_eq!(res.status, 201);
        assert_eq!(res.body["likes"], 0);
    }

    #[tokio::test]
    async fn a_missing_title_is_rejected_and_nothing_is_persisted() {
        let (app, created) = TestApp::spawn_seeded(&sample_seed()).await;
        let token = app.token_for(ALICE, "alice");

        let res = app
            .post_with_token(
                routes::BLOGS,
                &json!({"url": "https://example.com/t", "likes": 1}),
                &token,
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");

        let list = app.get(routes::BLOGS).await;
        assert_eq!(list.body.as_array().map(Vec::len), Some(created.len()));
    }

    #[tokio::test]
    async fn a_blank_title_is_rejected() {
        let app = TestApp::spawn().await;
        let token = app.token_for(ALICE, "alice");

        let res = app
            .post_with_token(
                routes::BLOGS,
                &json!({"title": "   ", "url": "https://example.com/t"}),
                &token,
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn a_missing_url_is_rejected() {
        let app = TestApp::spawn().await;
        let token = app.token_for(ALICE, "alice");

        let res = app
            .post_with_token(routes::BLOGS, &json!({"title": "T"}), &token)
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn negative_likes_are_rejected() {
        let app = TestApp::spawn().await;
        let token = app.token_for(ALICE, "alice");

        let res = app
            .post_with_token(
                routes::BLOGS,
                &json!({"title": "T", "url": "https://example.com/t", "likes": -1}),
                &token,
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn a_missing_token_is_unauthorized_and_nothing_is_persisted() {
        let (app, created) = TestApp::spawn_seeded(&sample_seed()).await;

        let res = app
            .post_without_token(
                routes::BLOGS,
                &json!({"title": "T", "url": "https://example.com/t"}),
            )
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_MISSING");

        let list = app.get(routes::BLOGS).await;
        assert_eq!(list.body.as_array().map(Vec::len), Some(created.len()));
    }

    #[tokio::test]
    async fn an_invalid_token_is_unauthorized() {
        let app = TestApp::spawn().await;

        let res = app
            .post_with_token(
                routes::BLOGS,
                &json!({"title": "T", "url": "https://example.com/t"}),
                "garbage-token",
            )
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_INVALID");
    }

    #[tokio::test]
    async fn the_created_id_is_appended_to_the_owner_index() {
        let (app, _) = TestApp::spawn_seeded(&sample_seed()).await;
        let token = app.token_for(BOB, "bob");

        let res = app
            .post_with_token(
                routes::BLOGS,
                &json!({"title": "Indexed", "url": "https://example.com/i"}),
                &token,
            )
            .await;
        assert_eq!(res.status, 201);
        let new_id = res.body["id"].as_str().unwrap().to_string();

        let bob = app.store.find_user(BOB).await.unwrap().unwrap();
        assert_eq!(bob.blog_ids.last(), Some(&new_id));
    }
}

mod deletion {
    use super::*;

    #[tokio::test]
    async fn the_owner_can_delete_their_blog() {
        let (app, created) = TestApp::spawn_seeded(&sample_seed()).await;
        let token = app.token_for(ALICE, "alice");
        let target = &created[0];

        let res = app.delete_with_token(&routes::blog(&target.id), &token).await;

        assert_eq!(res.status, 204);
        assert!(res.text.is_empty());

        let list = app.get(routes::BLOGS).await;
        let blogs = list.body.as_array().unwrap();
        assert_eq!(blogs.len(), created.len() - 1);
        assert!(blogs.iter().all(|b| b["id"] != target.id.as_str()));
    }

    #[tokio::test]
    async fn a_non_owner_is_forbidden_and_the_blog_survives() {
        let (app, created) = TestApp::spawn_seeded(&sample_seed()).await;
        let token = app.token_for(BOB, "bob");
        // created[0] is owned by alice.
        let target = &created[0];

        let res = app.delete_with_token(&routes::blog(&target.id), &token).await;

        assert_eq!(res.status, 403);
        assert_eq!(res.body["code"], "PERMISSION_DENIED");

        let list = app.get(routes::BLOGS).await;
        assert_eq!(list.body.as_array().map(Vec::len), Some(created.len()));
    }

    #[tokio::test]
    async fn an_unknown_id_is_not_found_even_without_a_token() {
        // Existence is checked before the credential is resolved.
        let (app, _) = TestApp::spawn_seeded(&sample_seed()).await;

        let res = app
            .delete_without_token(&routes::blog("00000000-0000-0000-0000-000000000000"))
            .await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn a_missing_token_on_an_existing_blog_is_unauthorized() {
        let (app, created) = TestApp::spawn_seeded(&sample_seed()).await;

        let res = app.delete_without_token(&routes::blog(&created[0].id)).await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_MISSING");
    }

    #[tokio::test]
    async fn an_invalid_token_on_an_existing_blog_is_unauthorized() {
        let (app, created) = TestApp::spawn_seeded(&sample_seed()).await;

        let res = app
            .delete_with_token(&routes::blog(&created[0].id), "garbage-token")
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_INVALID");

        let list = app.get(routes::BLOGS).await;
        assert_eq!(list.body.as_array().map(Vec::len), Some(created.len()));
    }

    #[tokio::test]
    async fn the_owner_index_keeps_the_deleted_id() {
        // Deleting a blog removes the record but leaves the owner's blog list
        // untouched; the index may reference ids that no longer resolve.
        let (app, created) = TestApp::spawn_seeded(&sample_seed()).await;
        let token = app.token_for(ALICE, "alice");
        let target = &created[0];

        let before = app.store.find_user(ALICE).await.unwrap().unwrap();
        assert!(before.blog_ids.contains(&target.id));

        let res = app.delete_with_token(&routes::blog(&target.id), &token).await;
        assert_eq!(res.status, 204);

        let after = app.store.find_user(ALICE).await.unwrap().unwrap();
        assert!(after.blog_ids.contains(&target.id));
    }
}

mod updating {
    use super::*;

    #[tokio::test]
    async fn anyone_can_update_likes_without_a_token() {
        let (app, created) = TestApp::spawn_seeded(&sample_seed()).await;
        let target = &created[0];

        let res = app
            .put_without_token(&routes::blog(&target.id), &json!({"likes": 10000}))
            .await;

        assert_eq!(res.status, 200, "update failed: {}", res.text);
        assert_eq!(res.body["likes"], 10000);
        // Everything else is untouched.
        assert_eq!(res.body["title"], target.title.as_str());
        assert_eq!(res.body["url"], target.url.as_str());
        assert_eq!(res.body["author"], target.author.as_deref().unwrap());
        assert_eq!(res.body["owner_id"], target.owner_id.as_str());
    }

    #[tokio::test]
    async fn the_update_is_visible_in_a_subsequent_fetch() {
        let (app, created) = TestApp::spawn_seeded(&sample_seed()).await;
        let target = &created[1];

        app.put_without_token(&routes::blog(&target.id), &json!({"likes": 42}))
            .await;

        let res = app.get(&routes::blog(&target.id)).await;
        assert_eq!(res.body["likes"], 42);
    }

    #[tokio::test]
    async fn fields_absent_from_the_payload_are_left_unchanged() {
        let (app, created) = TestApp::spawn_seeded(&sample_seed()).await;
        let target = &created[2];

        let res = app
            .put_without_token(&routes::blog(&target.id), &json!({"title": "Renamed"}))
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["title"], "Renamed");
        assert_eq!(res.body["likes"], target.likes);
        assert_eq!(res.body["url"], target.url.as_str());
    }

    #[tokio::test]
    async fn an_explicit_null_clears_the_author() {
        let (app, created) = TestApp::spawn_seeded(&sample_seed()).await;
        let target = &created[0];

        let res = app
            .put_without_token(&routes::blog(&target.id), &json!({"author": null}))
            .await;

        assert_eq!(res.status, 200);
        assert!(res.body["author"].is_null());
    }

    #[tokio::test]
    async fn an_unknown_id_yields_not_found() {
        let app = TestApp::spawn().await;

        let res = app
            .put_without_token(
                &routes::blog("00000000-0000-0000-0000-000000000000"),
                &json!({"likes": 1}),
            )
            .await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn negative_likes_are_rejected() {
        let (app, created) = TestApp::spawn_seeded(&sample_seed()).await;

        let res = app
            .put_without_token(&routes::blog(&created[0].id), &json!({"likes": -10}))
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }
}

mod scenario {
    use super::*;

    #[tokio::test]
    async fn seed_create_and_delete_round_trip() {
        let (app, created) = TestApp::spawn_seeded(&sample_seed()).await;
        let n = created.len();

        let list = app.get(routes::BLOGS).await;
        assert_eq!(list.body.as_array().map(Vec::len), Some(n));

        let token = app.token_for(ALICE, "alice");
        let res = app
            .post_with_token(
                routes::BLOGS,
                &json!({
                    "title": "A fresh entry",
                    "url": "https://example.com/fresh",
                }),
                &token,
            )
            .await;
        assert_eq!(res.status, 201);

        let list = app.get(routes::BLOGS).await;
        let blogs = list.body.as_array().unwrap();
        assert_eq!(blogs.len(), n + 1);
        assert!(blogs.iter().any(|b| b["title"] == "A fresh entry"));

        // The first seeded record belongs to alice; she removes it.
        let res = app
            .delete_with_token(&routes::blog(&created[0].id), &token)
            .await;
        assert_eq!(res.status, 204);

        let list = app.get(routes::BLOGS).await;
        assert_eq!(list.body.as_array().map(Vec::len), Some(n));
    }
}
