use serde_json::json;

use crate::common::{TestApp, TestResponse, routes};
use server::seed::DEFAULT_PERMISSIONS;

#[tokio::test]
async fn seeded_permissions_are_listed() {
    let app = TestApp::spawn().await;

    let res = app
        .get_without_token(&routes::list(routes::PERMISSIONS, 1, 50))
        .await;

    assert_eq!(res.status, 200);
    assert_eq!(res.body["total"], DEFAULT_PERMISSIONS.len());
}

#[tokio::test]
async fn paging_visits_every_seeded_permission_once() {
    let app = TestApp::spawn().await;
    let mut seen = Vec::new();

    for page in 1..=5 {
        let res = app
            .get_without_token(&routes::list(routes::PERMISSIONS, page, 2))
            .await;
        assert_eq!(res.status, 200);
        for item in res.body["data"].as_array().unwrap() {
            seen.push(item["id"].as_i64().unwrap());
        }
    }

    let mut unique = seen.clone();
    unique.sort_unstable();
    unique.dedup();
    assert_eq!(seen.len(), DEFAULT_PERMISSIONS.len());
    assert_eq!(unique.len(), seen.len(), "ids repeated across pages: {seen:?}");
}

#[tokio::test]
async fn duplicate_name_is_a_conflict() {
    let app = TestApp::spawn().await;

    let res = app
        .post_without_token(routes::PERMISSIONS_CREATE, &json!({"name": "view_users"}))
        .await;

    assert_eq!(res.status, 409);
    assert_eq!(res.body["code"], "CONFLICT");
}

#[tokio::test]
async fn rename_and_fetch() {
    let app = TestApp::spawn().await;
    let id = app.create_permission("view_reports").await;

    let res = app
        .put_without_token(
            routes::PERMISSIONS_UPDATE,
            &json!({"id": id, "name": "export_reports"}),
        )
        .await;
    assert_eq!(res.status, 200, "{}", res.text);

    let fetched = app
        .get_without_token(&routes::get_by_id(routes::PERMISSIONS, id))
        .await;
    assert_eq!(fetched.body["data"]["name"], "export_reports");
}

#[tokio::test]
async fn name_longer_than_64_is_rejected() {
    let app = TestApp::spawn().await;

    let res = app
        .post_without_token(
            routes::PERMISSIONS_CREATE,
            &json!({"name": "p".repeat(65)}),
        )
        .await;

    assert_eq!(res.status, 400);
}

#[tokio::test]
async fn delete_revokes_the_permission_from_roles() {
    let app = TestApp::spawn().await;
    let keep = app.create_permission("keep_me").await;
    let doomed = app.create_permission("drop_me").await;
    let role = app.create_role("auditor", &[keep, doomed]).await;

    let res = app
        .delete_without_token(&routes::delete(routes::PERMISSIONS, doomed))
        .await;
    assert_eq!(res.status, 200, "{}", res.text);

    let role_res = app.get_without_token(&routes::role_permissions(role)).await;
    assert_eq!(
        TestResponse::permission_names(&role_res.body["data"]["permissions"]),
        vec!["keep_me"]
    );

    let again = app
        .delete_without_token(&routes::delete(routes::PERMISSIONS, doomed))
        .await;
    assert_eq!(again.status, 404);
}

#[tokio::test]
async fn deleting_unknown_permission_leaves_grants_alone() {
    let app = TestApp::spawn().await;
    let kept = app.create_permission("publish_news").await;
    let role = app.create_role("publisher", &[kept]).await;

    let res = app
        .delete_without_token(&routes::delete(routes::PERMISSIONS, 99_999))
        .await;
    assert_eq!(res.status, 404);
    assert_eq!(res.body["code"], "NOT_FOUND");

    let role_res = app.get_without_token(&routes::role_permissions(role)).await;
    assert_eq!(
        TestResponse::permission_names(&role_res.body["data"]["permissions"]),
        vec!["publish_news"]
    );
}
