use std::sync::atomic::Ordering;

use serde_json::json;

use crate::common::{TestApp, artist, routes, with_contact};

mod save_top {
    use super::*;

    #[tokio::test]
    async fn returns_user_and_artists_new_to_the_catalog() {
        let app = TestApp::spawn().await;
        app.seed_artists(&[artist("a1", "Alpha", 50)]).await;
        app.catalog
            .set_top_artists(vec![artist("a1", "Alpha", 55), artist("a2", "Beta", 40)]);

        let res = app
            .post(
                routes::TOP_ARTISTS,
                &with_contact(json!({"access_token": "user-token"})),
            )
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert!(res.body["user_id"].is_number());
        let new_artists = res.body["new_artists"].as_array().unwrap();
        assert_eq!(new_artists.len(), 1);
        assert_eq!(new_artists[0]["id"], "a2");
        assert_eq!(new_artists[0]["genres"], json!(["indie rock"]));
        assert_eq!(
            new_artists[0]["spotify_url"],
            "https://open.spotify.com/artist/a2"
        );

        let a1 = app
            .store()
            .find_artist_by_spotify_id("a1")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(a1.popularity, 55);
    }

    #[tokio::test]
    async fn resubmitting_keeps_one_user_per_external_account() {
        let app = TestApp::spawn().await;
        app.catalog.set_top_artists(vec![artist("a1", "Alpha", 50)]);
        let body = with_contact(json!({"access_token": "user-token"}));

        let first = app.post(routes::TOP_ARTISTS, &body).await;
        let second = app.post(routes::TOP_ARTISTS, &body).await;

        assert_eq!(first.status, 200);
        assert_eq!(second.status, 200);
        assert_eq!(first.body["user_id"], second.body["user_id"]);
        assert_eq!(second.body["new_artists"], json!([]));
        assert_eq!(app.user_count().await, 1);
    }

    #[tokio::test]
    async fn rejected_access_token_is_unauthorized() {
        let app = TestApp::spawn().await;
        app.catalog.reject_user_token.store(true, Ordering::SeqCst);

        let res = app
            .post(
                routes::TOP_ARTISTS,
                &with_contact(json!({"access_token": "stale"})),
            )
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_INVALID");
        assert_eq!(app.user_count().await, 0);
    }

    #[tokio::test]
    async fn blank_fields_are_rejected_before_any_work() {
        let app = TestApp::spawn().await;

        let res = app
            .post(
                routes::TOP_ARTISTS,
                &with_contact(json!({"access_token": "user-token", "email": ""})),
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
        assert_eq!(app.catalog.top_artist_calls.load(Ordering::SeqCst), 0);
    }
}

mod save_selected {
    use super::*;

    #[tokio::test]
    async fn returns_ranked_full_records() {
        let app = TestApp::spawn().await;
        app.seed_artists(&[artist("A", "Artist A", 10), artist("B", "Artist B", 20)])
            .await;

        let res = app
            .post(
                routes::SELECTED_ARTISTS,
                &with_contact(json!({"artist_ids": ["B", "A"]})),
            )
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        let artists = res.body["artists"].as_array().unwrap();
        assert_eq!(artists.len(), 2);
        assert_eq!(artists[0]["rank"], 1);
        assert_eq!(artists[0]["artist"]["id"], "B");
        assert_eq!(artists[0]["artist"]["popularity"], 20);
        assert_eq!(artists[1]["rank"], 2);
        assert_eq!(artists[1]["artist"]["id"], "A");
    }

    #[tokio::test]
    async fn unknown_artist_is_not_found() {
        let app = TestApp::spawn().await;
        app.seed_artists(&[artist("A", "Artist A", 10)]).await;

        let res = app
            .post(
                routes::SELECTED_ARTISTS,
                &with_contact(json!({"artist_ids": ["A", "nope"]})),
            )
            .await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
        assert_eq!(app.user_count().await, 0);
    }

    #[tokio::test]
    async fn empty_artist_list_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app
            .post(
                routes::SELECTED_ARTISTS,
                &with_contact(json!({"artist_ids": []})),
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }
}
