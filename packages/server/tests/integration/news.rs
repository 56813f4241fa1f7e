use serde_json::json;

use crate::common::{TestApp, routes};

mod listing {
    use super::*;

    async fn seed_five(app: &TestApp) {
        app.create_news("Rust 2024 edition ships", "Language news").await;
        app.create_news("Campus library reopens", "Facilities update").await;
        app.create_news("Robotics team wins", "Rust-powered robot").await;
        app.create_news("Exam schedule", "Spring term").await;
        app.create_news("Open day", "Visitors welcome").await;
    }

    #[tokio::test]
    async fn first_page_reports_totals() {
        let app = TestApp::spawn().await;
        seed_five(&app).await;

        let res = app.get_without_token(&routes::list(routes::NEWS, 1, 2)).await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["data"].as_array().unwrap().len(), 2);
        assert_eq!(res.body["total"], 5);
        assert_eq!(res.body["page"], 1);
        assert_eq!(res.body["limit"], 2);
        assert_eq!(res.body["totalPages"], 3);
    }

    #[tokio::test]
    async fn last_page_holds_the_remainder() {
        let app = TestApp::spawn().await;
        seed_five(&app).await;

        let res = app.get_without_token(&routes::list(routes::NEWS, 3, 2)).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["data"].as_array().unwrap().len(), 1);
        assert_eq!(res.body["total"], 5);
    }

    #[tokio::test]
    async fn page_and_limit_are_required() {
        let app = TestApp::spawn().await;

        let res = app.get_without_token(routes::NEWS).await;
        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
        assert!(res.body["message"].as_str().unwrap().contains("'page'"));

        let res = app.get_without_token("/api/news?page=1").await;
        assert_eq!(res.status, 400);
        assert!(res.body["message"].as_str().unwrap().contains("'limit'"));

        let res = app.get_without_token("/api/news?page=0&limit=10").await;
        assert_eq!(res.status, 400);
    }

    #[tokio::test]
    async fn search_is_case_insensitive_across_title_and_detail() {
        let app = TestApp::spawn().await;
        seed_five(&app).await;

        let res = app
            .get_without_token("/api/news?page=1&limit=10&search=RUST")
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["total"], 2);
        let titles: Vec<&str> = res.body["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|n| n["title"].as_str().unwrap())
            .collect();
        assert!(titles.contains(&"Rust 2024 edition ships"));
        assert!(titles.contains(&"Robotics team wins"));
    }

    #[tokio::test]
    async fn like_wildcards_in_search_are_literal() {
        let app = TestApp::spawn().await;
        seed_five(&app).await;

        let res = app
            .get_without_token("/api/news?page=1&limit=10&search=%25")
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["total"], 0);
    }

    #[tokio::test]
    async fn sort_by_title_ascending() {
        let app = TestApp::spawn().await;
        seed_five(&app).await;

        let res = app
            .get_without_token("/api/news?page=1&limit=5&sortBy=title&order=ASC")
            .await;

        assert_eq!(res.status, 200);
        let titles: Vec<&str> = res.body["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|n| n["title"].as_str().unwrap())
            .collect();
        let mut sorted = titles.clone();
        sorted.sort();
        assert_eq!(titles, sorted);
    }

    #[tokio::test]
    async fn unknown_sort_field_falls_back_to_created_at() {
        let app = TestApp::spawn().await;
        seed_five(&app).await;

        let res = app
            .get_without_token("/api/news?page=1&limit=5&sortBy=password")
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["data"][0]["title"], "Open day");
    }

    #[tokio::test]
    async fn oversized_limit_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app
            .get_without_token("/api/news?page=1&limit=9223372036854775808")
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }
}

mod crud {
    use super::*;

    #[tokio::test]
    async fn create_then_get_by_id() {
        let app = TestApp::spawn().await;
        let id = app.create_news("Hello", "World").await;

        let res = app.get_without_token(&routes::get_by_id(routes::NEWS, id)).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["message"], "Success");
        assert_eq!(res.body["data"]["title"], "Hello");
        assert_eq!(res.body["data"]["detail"], "World");
        assert_eq!(res.body["data"]["created_by"], "editorial");
    }

    #[tokio::test]
    async fn create_rejects_blank_title() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(routes::NEWS_CREATE, &json!({"title": "  "}))
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn get_by_id_distinguishes_missing_invalid_and_absent() {
        let app = TestApp::spawn().await;

        let missing = app.get_without_token("/api/news/getbyid").await;
        assert_eq!(missing.status, 400);

        let invalid = app.get_without_token("/api/news/getbyid?id=abc").await;
        assert_eq!(invalid.status, 400);

        let absent = app.get_without_token(&routes::get_by_id(routes::NEWS, 4242)).await;
        assert_eq!(absent.status, 404);
        assert_eq!(absent.body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn update_overwrites_every_field() {
        let app = TestApp::spawn().await;
        let id = app.create_news("Old title", "Old detail").await;

        let res = app
            .put_without_token(
                &routes::news_update(id),
                &json!({
                    "title": "New title",
                    "image": "https://cdn.example.com/new.jpg",
                    "detail": "New detail",
                    "content": "New content",
                    "created_by": "desk",
                }),
            )
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["data"]["id"], id);
        assert_eq!(res.body["data"]["title"], "New title");
        assert_eq!(res.body["data"]["created_by"], "desk");

        let fetched = app.get_without_token(&routes::get_by_id(routes::NEWS, id)).await;
        assert_eq!(fetched.body["data"]["content"], "New content");
    }

    #[tokio::test]
    async fn update_of_absent_article_is_not_found() {
        let app = TestApp::spawn().await;

        let res = app
            .put_without_token(&routes::news_update(777), &json!({"title": "Ghost"}))
            .await;

        assert_eq!(res.status, 404);
    }

    #[tokio::test]
    async fn delete_removes_and_second_delete_is_not_found() {
        let app = TestApp::spawn().await;
        let id = app.create_news("Short lived", "").await;

        let res = app.delete_without_token(&routes::delete(routes::NEWS, id)).await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body["message"], "News deleted successfully");

        let again = app.delete_without_token(&routes::delete(routes::NEWS, id)).await;
        assert_eq!(again.status, 404);
        assert_eq!(again.body["code"], "NOT_FOUND");
    }
}

mod home {
    use super::*;

    #[tokio::test]
    async fn home_feed_returns_the_four_newest() {
        let app = TestApp::spawn().await;
        for i in 1..=6 {
            app.create_news(&format!("Story {i}"), "").await;
        }

        let res = app.get_without_token(routes::NEWS_HOME).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["message"], "Success");
        let data = res.body["data"].as_array().unwrap();
        assert_eq!(data.len(), 4);
        assert_eq!(data[0]["title"], "Story 6");
    }
}
