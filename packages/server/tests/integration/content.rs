use serde_json::json;

use crate::common::{TestApp, routes};

mod highlights {
    use super::*;

    async fn create(app: &TestApp, title: &str, content: &str) -> i32 {
        let res = app
            .post_without_token(
                routes::HIGHLIGHTS_CREATE,
                &json!({"title": title, "content": content, "created_by": "desk"}),
            )
            .await;
        assert_eq!(res.status, 200, "create highlight failed: {}", res.text);
        res.data_id()
    }

    #[tokio::test]
    async fn search_covers_content() {
        let app = TestApp::spawn().await;
        create(&app, "Science fair", "Volcano demo").await;
        create(&app, "Sports day", "Relay race").await;

        let res = app
            .get_without_token("/api/highlights?page=1&limit=10&search=volcano")
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["total"], 1);
        assert_eq!(res.body["data"][0]["title"], "Science fair");
    }

    #[tokio::test]
    async fn update_takes_id_from_the_body() {
        let app = TestApp::spawn().await;
        let id = create(&app, "Draft", "").await;

        let res = app
            .put_without_token(
                routes::HIGHLIGHTS_UPDATE,
                &json!({"id": id, "title": "Final", "content": "Body"}),
            )
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["data"]["title"], "Final");
        assert_eq!(res.body["data"]["content"], "Body");
    }

    #[tokio::test]
    async fn update_without_id_is_a_bad_request() {
        let app = TestApp::spawn().await;

        let res = app
            .put_without_token(routes::HIGHLIGHTS_UPDATE, &json!({"title": "Final"}))
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn home_feed_is_capped_at_four() {
        let app = TestApp::spawn().await;
        for i in 0..5 {
            create(&app, &format!("H{i}"), "").await;
        }

        let res = app.get_without_token(routes::HIGHLIGHTS_HOME).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["data"].as_array().unwrap().len(), 4);
    }
}

mod footers {
    use super::*;

    async fn create(app: &TestApp, name: &str, redirect: &str) -> i32 {
        let res = app
            .post_without_token(
                routes::FOOTERS_CREATE,
                &json!({"name": name, "image_url": "", "redirect": redirect}),
            )
            .await;
        assert_eq!(res.status, 200, "create footer failed: {}", res.text);
        res.data_id()
    }

    #[tokio::test]
    async fn search_matches_redirect() {
        let app = TestApp::spawn().await;
        create(&app, "Contact", "https://example.com/contact").await;
        create(&app, "Privacy", "https://example.com/privacy").await;

        let res = app
            .get_without_token("/api/footers?page=1&limit=10&search=PRIVACY")
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["total"], 1);
        assert_eq!(res.body["data"][0]["name"], "Privacy");
    }

    #[tokio::test]
    async fn update_get_and_delete_round() {
        let app = TestApp::spawn().await;
        let id = create(&app, "Contact", "https://example.com/contact").await;

        let res = app
            .put_without_token(
                routes::FOOTERS_UPDATE,
                &json!({"id": id, "name": "Contact us", "redirect": "/contact"}),
            )
            .await;
        assert_eq!(res.status, 200, "{}", res.text);

        let fetched = app
            .get_without_token(&routes::get_by_id(routes::FOOTERS, id))
            .await;
        assert_eq!(fetched.body["data"]["name"], "Contact us");
        assert_eq!(fetched.body["data"]["redirect"], "/contact");

        let deleted = app
            .delete_without_token(&routes::delete(routes::FOOTERS, id))
            .await;
        assert_eq!(deleted.status, 200);

        let gone = app
            .get_without_token(&routes::get_by_id(routes::FOOTERS, id))
            .await;
        assert_eq!(gone.status, 404);
    }

    #[tokio::test]
    async fn home_feed_returns_every_entry() {
        let app = TestApp::spawn().await;
        for i in 0..6 {
            create(&app, &format!("Link {i}"), "/").await;
        }

        let res = app.get_without_token(routes::FOOTERS_HOME).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["message"], "Success");
        assert_eq!(res.body["data"].as_array().unwrap().len(), 6);
    }
}

mod sponsors {
    use super::*;

    #[tokio::test]
    async fn create_list_and_home() {
        let app = TestApp::spawn().await;
        for name in ["Acme", "Globex", "Initech"] {
            let res = app
                .post_without_token(
                    routes::SPONSORS_CREATE,
                    &json!({"name": name, "image_url": format!("https://cdn/{name}.png"), "redirect": "https://example.com"}),
                )
                .await;
            assert_eq!(res.status, 200, "{}", res.text);
        }

        let page = app
            .get_without_token("/api/sponsors?page=1&limit=2&sortBy=name&order=asc")
            .await;
        assert_eq!(page.status, 200);
        assert_eq!(page.body["total"], 3);
        assert_eq!(page.body["totalPages"], 2);
        assert_eq!(page.body["data"][0]["name"], "Acme");

        let home = app.get_without_token(routes::SPONSORS_HOME).await;
        assert_eq!(home.body["data"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn overlong_image_url_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(
                routes::SPONSORS_CREATE,
                &json!({"name": "Acme", "image_url": "x".repeat(513)}),
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn update_of_absent_sponsor_is_not_found() {
        let app = TestApp::spawn().await;

        let res = app
            .put_without_token(routes::SPONSORS_UPDATE, &json!({"id": 404, "name": "Nobody"}))
            .await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }
}
