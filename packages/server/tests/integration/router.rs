use reqwest::Method;

use crate::common::{TestApp, routes};

#[tokio::test]
async fn unsupported_method_returns_json_405() {
    let app = TestApp::spawn().await;

    let res = app.send(Method::PATCH, routes::NEWS_CREATE, None, None).await;

    assert_eq!(res.status, 405);
    assert_eq!(res.body["code"], "METHOD_NOT_ALLOWED");
}

#[tokio::test]
async fn unknown_route_returns_json_404() {
    let app = TestApp::spawn().await;

    let res = app.get_without_token("/api/nope").await;

    assert_eq!(res.status, 404);
    assert_eq!(res.body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn openapi_document_lists_the_api() {
    let app = TestApp::spawn().await;

    let res = app.get_without_token("/api-docs/openapi.json").await;

    assert_eq!(res.status, 200);
    let paths = res.body["paths"].as_object().unwrap();
    assert!(paths.contains_key("/api/news"));
    assert!(paths.contains_key("/api/roles/assign"));
    assert!(paths.contains_key("/api/users"));
}

#[tokio::test]
async fn crawlers_are_served_normally_when_prerender_is_disabled() {
    let app = TestApp::spawn().await;

    let res = app
        .client
        .get(format!("http://{}/api/news_home", app.addr))
        .header("User-Agent", "Googlebot/2.1")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status().as_u16(), 200);
}
