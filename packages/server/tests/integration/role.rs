use serde_json::json;

use crate::common::{TestApp, TestResponse, routes};

mod crud {
    use super::*;

    #[tokio::test]
    async fn seeded_roles_are_listed_with_their_permissions() {
        let app = TestApp::spawn().await;

        let res = app
            .get_without_token("/api/roles?page=1&limit=10&sortBy=name&order=asc")
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["total"], 3);
        let names: Vec<&str> = res.body["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["admin", "owner", "user"]);
        assert_eq!(res.body["data"][0]["permissions"].as_array().unwrap().len(), 9);
        assert_eq!(res.body["data"][2]["permissions"], json!([]));
    }

    #[tokio::test]
    async fn create_with_permissions_then_get_by_id() {
        let app = TestApp::spawn().await;
        let a = app.create_permission("publish_news").await;
        let b = app.create_permission("edit_news").await;

        let id = app.create_role("editor", &[a, b]).await;

        let res = app.get_without_token(&routes::get_by_id(routes::ROLES, id)).await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body["data"]["name"], "editor");
        assert_eq!(
            TestResponse::permission_names(&res.body["data"]["permissions"]),
            vec!["edit_news", "publish_news"]
        );
    }

    #[tokio::test]
    async fn duplicate_role_name_is_a_conflict() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(routes::ROLES, &json!({"name": "admin"}))
            .await;

        assert_eq!(res.status, 409);
        assert_eq!(res.body["code"], "CONFLICT");
    }

    #[tokio::test]
    async fn create_with_unknown_permission_leaves_no_role_behind() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(routes::ROLES, &json!({"name": "ghost", "permissions": [99999]}))
            .await;
        assert_eq!(res.status, 400, "{}", res.text);

        let list = app
            .get_without_token("/api/roles?page=1&limit=10&search=ghost")
            .await;
        assert_eq!(list.body["total"], 0);
    }

    #[tokio::test]
    async fn update_with_empty_permissions_keeps_grants() {
        let app = TestApp::spawn().await;
        let p = app.create_permission("moderate").await;
        let id = app.create_role("mod", &[p]).await;

        let res = app
            .put_without_token(routes::ROLES, &json!({"id": id, "name": "moderator", "permissions": []}))
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["data"]["name"], "moderator");
        assert_eq!(
            TestResponse::permission_names(&res.body["data"]["permissions"]),
            vec!["moderate"]
        );
    }

    #[tokio::test]
    async fn soft_deleted_role_disappears() {
        let app = TestApp::spawn().await;
        let id = app.create_role("temp", &[]).await;

        let res = app.delete_without_token(&routes::role_by_query(id)).await;
        assert_eq!(res.status, 200);

        let fetched = app.get_without_token(&routes::get_by_id(routes::ROLES, id)).await;
        assert_eq!(fetched.status, 404);

        let again = app.delete_without_token(&routes::role_by_query(id)).await;
        assert_eq!(again.status, 404);
    }
}

mod assign {
    use super::*;

    #[tokio::test]
    async fn assign_replaces_the_whole_set() {
        let app = TestApp::spawn().await;
        let a = app.create_permission("a_perm").await;
        let b = app.create_permission("b_perm").await;
        let c = app.create_permission("c_perm").await;
        let role = app.create_role("swap", &[a, b]).await;

        let res = app
            .put_without_token(routes::ROLES_ASSIGN, &json!({"id": role, "permissions": [c]}))
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["data"]["role_id"], role);
        assert_eq!(res.body["data"]["permission_ids"], json!([c]));

        let after = app.get_without_token(&routes::role_permissions(role)).await;
        assert_eq!(after.body["status"], "success");
        assert_eq!(
            TestResponse::permission_names(&after.body["data"]["permissions"]),
            vec!["c_perm"]
        );
    }

    #[tokio::test]
    async fn unknown_permission_rolls_back_to_the_previous_set() {
        let app = TestApp::spawn().await;
        let a = app.create_permission("a_perm").await;
        let b = app.create_permission("b_perm").await;
        let role = app.create_role("atomic", &[a, b]).await;

        let res = app
            .put_without_token(
                routes::ROLES_ASSIGN,
                &json!({"id": role, "permissions": [a, 424242]}),
            )
            .await;

        assert_eq!(res.status, 400, "{}", res.text);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");

        let after = app.get_without_token(&routes::role_permissions(role)).await;
        assert_eq!(
            TestResponse::permission_names(&after.body["data"]["permissions"]),
            vec!["a_perm", "b_perm"]
        );
    }

    #[tokio::test]
    async fn empty_or_duplicate_lists_are_rejected() {
        let app = TestApp::spawn().await;
        let a = app.create_permission("a_perm").await;
        let role = app.create_role("picky", &[a]).await;

        let empty = app
            .put_without_token(routes::ROLES_ASSIGN, &json!({"id": role, "permissions": []}))
            .await;
        assert_eq!(empty.status, 400);

        let dup = app
            .put_without_token(routes::ROLES_ASSIGN, &json!({"id": role, "permissions": [a, a]}))
            .await;
        assert_eq!(dup.status, 400);

        let no_id = app
            .put_without_token(routes::ROLES_ASSIGN, &json!({"permissions": [a]}))
            .await;
        assert_eq!(no_id.status, 400);
    }

    #[tokio::test]
    async fn missing_role_is_not_found() {
        let app = TestApp::spawn().await;
        let a = app.create_permission("a_perm").await;

        let res = app
            .put_without_token(routes::ROLES_ASSIGN, &json!({"id": 9999, "permissions": [a]}))
            .await;

        assert_eq!(res.status, 404);
    }

    #[tokio::test]
    async fn role_permissions_without_id_lists_everything() {
        let app = TestApp::spawn().await;

        let res = app.get_without_token(routes::ROLES_PERMISSIONS).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["status"], "success");
        assert_eq!(res.body["data"].as_array().unwrap().len(), 9);
    }
}
