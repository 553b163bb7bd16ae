use server::catalog::{CatalogError, LinkingService, UserInfo};

use crate::common::{TestApp, artist};

fn user_info(first_name: &str) -> UserInfo {
    UserInfo {
        first_name: first_name.to_string(),
        last_name: "Lovelace".to_string(),
        email: "ada@example.com".to_string(),
        phone_number: "+1 555 0100".to_string(),
    }
}

mod top_artists {
    use super::*;

    #[tokio::test]
    async fn first_save_inserts_every_artist_and_ranks_them() {
        let app = TestApp::spawn().await;
        let artists = vec![artist("a1", "Alpha", 50), artist("a2", "Beta", 40)];

        let outcome = LinkingService::new(&app.db)
            .save_user_top_artists(&user_info("Ada"), "sp-1", &artists)
            .await
            .unwrap();

        assert_eq!(outcome.new_artists, artists);
        let ranks: Vec<_> = outcome.linked.iter().map(|l| l.rank).collect();
        assert_eq!(ranks, [1, 2]);

        let links = app.links_for_user(outcome.user_id).await;
        assert_eq!(links.len(), 2);
        assert_eq!(links[0].rank, 1);
        assert_eq!(links[1].rank, 2);
    }

    #[tokio::test]
    async fn resubmission_replaces_links_and_keeps_the_same_user() {
        let app = TestApp::spawn().await;
        let service = LinkingService::new(&app.db);

        let first = service
            .save_user_top_artists(
                &user_info("Ada"),
                "sp-1",
                &[artist("a1", "Alpha", 50), artist("a2", "Beta", 40)],
            )
            .await
            .unwrap();
        let second = service
            .save_user_top_artists(
                &user_info("Augusta"),
                "sp-1",
                &[artist("a3", "Gamma", 30)],
            )
            .await
            .unwrap();

        assert_eq!(first.user_id, second.user_id);
        assert_eq!(app.user_count().await, 1);

        let links = app.links_for_user(second.user_id).await;
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].rank, 1);

        let a3 = app
            .store()
            .find_artist_by_spotify_id("a3")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(links[0].artist_id, a3.id);
    }

    #[tokio::test]
    async fn artist_rows_stay_unique_and_take_the_latest_fields() {
        let app = TestApp::spawn().await;
        let service = LinkingService::new(&app.db);

        service
            .save_user_top_artists(&user_info("Ada"), "sp-1", &[artist("a1", "Alpha", 50)])
            .await
            .unwrap();

        let mut renamed = artist("a1", "Alpha (Remastered)", 77);
        renamed.genres = vec!["synthpop".to_string(), "new wave".to_string()];
        let outcome = service
            .save_user_top_artists(&user_info("Grace"), "sp-2", &[renamed.clone()])
            .await
            .unwrap();

        assert!(outcome.new_artists.is_empty());
        assert_eq!(app.store().existing_artist_ids().await.unwrap().len(), 1);

        let row = app
            .store()
            .find_artist_by_spotify_id("a1")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(row.artist_name, "Alpha (Remastered)");
        assert_eq!(row.popularity, 77);
        assert_eq!(common::Artist::try_from(row).unwrap(), renamed);
    }

    #[tokio::test]
    async fn failed_link_rolls_back_the_whole_save() {
        let app = TestApp::spawn().await;
        // The repeated artist violates the (user, artist) key on its second link.
        let artists = vec![
            artist("a1", "Alpha", 50),
            artist("a2", "Beta", 40),
            artist("a1", "Alpha", 50),
        ];

        let err = LinkingService::new(&app.db)
            .save_user_top_artists(&user_info("Ada"), "sp-1", &artists)
            .await
            .unwrap_err();

        assert!(
            matches!(err, CatalogError::LinkWrite { ref artist, .. } if artist == "a1"),
            "{err}"
        );
        assert_eq!(app.user_count().await, 0);
        assert!(app.store().existing_artist_ids().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn failed_resubmission_keeps_previous_links() {
        let app = TestApp::spawn().await;
        let service = LinkingService::new(&app.db);

        let first = service
            .save_user_top_artists(&user_info("Ada"), "sp-1", &[artist("a1", "Alpha", 50)])
            .await
            .unwrap();
        service
            .save_user_top_artists(
                &user_info("Ada"),
                "sp-1",
                &[artist("a2", "Beta", 40), artist("a2", "Beta", 40)],
            )
            .await
            .unwrap_err();

        let links = app.links_for_user(first.user_id).await;
        assert_eq!(links.len(), 1);
        assert!(
            app.store()
                .find_artist_by_spotify_id("a2")
                .await
                .unwrap()
                .is_none()
        );
    }
}

mod selected_artists {
    use super::*;

    #[tokio::test]
    async fn fresh_user_gets_ranked_links_and_no_new_artists() {
        let app = TestApp::spawn().await;
        app.seed_artists(&[artist("A", "Artist A", 10), artist("B", "Artist B", 20)])
            .await;

        let outcome = LinkingService::new(&app.db)
            .save_user_selected_artists(&user_info("Ada"), &["A".to_string(), "B".to_string()])
            .await
            .unwrap();

        assert!(outcome.new_artists.is_empty());
        assert_eq!(outcome.linked.len(), 2);
        assert_eq!(outcome.linked[0].rank, 1);
        assert_eq!(outcome.linked[0].artist, artist("A", "Artist A", 10));
        assert_eq!(outcome.linked[1].rank, 2);
        assert_eq!(outcome.linked[1].artist.id, "B");
        assert_eq!(app.user_count().await, 1);
    }

    #[tokio::test]
    async fn every_submission_creates_a_new_user() {
        let app = TestApp::spawn().await;
        app.seed_artists(&[artist("A", "Artist A", 10)]).await;
        let service = LinkingService::new(&app.db);
        let ids = ["A".to_string()];

        let first = service
            .save_user_selected_artists(&user_info("Ada"), &ids)
            .await
            .unwrap();
        let second = service
            .save_user_selected_artists(&user_info("Ada"), &ids)
            .await
            .unwrap();

        assert_ne!(first.user_id, second.user_id);
        assert_eq!(app.user_count().await, 2);
    }

    #[tokio::test]
    async fn unknown_artist_aborts_without_creating_the_user() {
        let app = TestApp::spawn().await;
        app.seed_artists(&[artist("A", "Artist A", 10)]).await;

        let err = LinkingService::new(&app.db)
            .save_user_selected_artists(
                &user_info("Ada"),
                &["A".to_string(), "missing".to_string()],
            )
            .await
            .unwrap_err();

        assert!(matches!(err, CatalogError::ArtistNotFound(ref id) if id == "missing"));
        assert_eq!(app.user_count().await, 0);
    }
}
