use serde_json::json;

use crate::common::{OWNER_PASSWORD, OWNER_USERNAME, TestApp, TestResponse, auth_config, routes};
use server::seed::DEFAULT_PERMISSIONS;
use server::utils::jwt::{self, TokenKind};

mod registration {
    use super::*;

    #[tokio::test]
    async fn new_user_gets_the_default_role() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(
                routes::REGISTER,
                &json!({"username": "alice", "password": "securepass"}),
            )
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert!(res.body["id"].is_number());
        assert_eq!(res.body["username"], "alice");
        assert_eq!(res.body["role"], "user");
        assert!(res.body.get("password").is_none());
    }

    #[tokio::test]
    async fn cannot_register_with_an_already_taken_username() {
        let app = TestApp::spawn().await;
        let body = json!({"username": "alice", "password": "securepass"});

        let first = app.post_without_token(routes::REGISTER, &body).await;
        assert_eq!(first.status, 201, "First registration failed: {}", first.text);

        let res = app.post_without_token(routes::REGISTER, &body).await;

        assert_eq!(res.status, 409);
        assert_eq!(res.body["code"], "USERNAME_TAKEN");
    }

    #[tokio::test]
    async fn cannot_register_with_a_password_that_is_too_short() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(
                routes::REGISTER,
                &json!({"username": "alice", "password": "short"}),
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn cannot_register_with_an_invalid_username() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(
                routes::REGISTER,
                &json!({"username": "no spaces!", "password": "securepass"}),
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn malformed_json_is_a_validation_error() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(routes::REGISTER, &json!({"username": "alice"}))
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }
}

mod login {
    use super::*;

    #[tokio::test]
    async fn seeded_owner_receives_tokens_and_every_permission() {
        let app = TestApp::spawn().await;

        let res = app.login(OWNER_USERNAME, OWNER_PASSWORD).await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert!(res.body["access_token"].is_string());
        assert!(res.body["refresh_token"].is_string());
        assert_eq!(res.body["user"]["username"], OWNER_USERNAME);
        assert_eq!(res.body["user"]["role"], "owner");

        let granted: Vec<&str> = res.body["user"]["permissions"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|p| p.as_str())
            .collect();
        for name in DEFAULT_PERMISSIONS {
            assert!(granted.contains(name), "owner is missing {name}");
        }
    }

    #[tokio::test]
    async fn wrong_password_is_rejected_without_tokens() {
        let app = TestApp::spawn().await;

        let res = app.login(OWNER_USERNAME, "owner124").await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "INVALID_CREDENTIALS");
        assert!(res.body.get("access_token").is_none());
        assert!(res.body.get("refresh_token").is_none());
    }

    #[tokio::test]
    async fn unknown_user_gets_the_same_error_as_a_wrong_password() {
        let app = TestApp::spawn().await;

        let res = app.login("nobody", "whatever123").await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "INVALID_CREDENTIALS");
    }

    #[tokio::test]
    async fn registered_user_has_no_permissions() {
        let app = TestApp::spawn().await;
        app.create_authenticated_user("bob", "password123").await;

        let res = app.login("bob", "password123").await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["user"]["role"], "user");
        assert_eq!(res.body["user"]["permissions"], json!([]));
    }
}

mod refresh {
    use super::*;

    #[tokio::test]
    async fn refresh_token_yields_a_working_access_token() {
        let app = TestApp::spawn().await;
        let login = app.login(OWNER_USERNAME, OWNER_PASSWORD).await;
        let refresh_token = login.body["refresh_token"].as_str().unwrap();

        let res = app
            .post_without_token(routes::REFRESH, &json!({"refresh_token": refresh_token}))
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        let profile = app
            .get_with_token(routes::PROFILE, &res.access_token())
            .await;
        assert_eq!(profile.status, 200);
        assert_eq!(profile.body["username"], OWNER_USERNAME);
    }

    #[tokio::test]
    async fn missing_refresh_token_is_a_bad_request() {
        let app = TestApp::spawn().await;

        let res = app.post_without_token(routes::REFRESH, &json!({})).await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn access_token_is_not_accepted_as_refresh_token() {
        let app = TestApp::spawn().await;
        let access = app.owner_token().await;

        let res = app
            .post_without_token(routes::REFRESH, &json!({"refresh_token": access}))
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_INVALID");
    }

    #[tokio::test]
    async fn garbage_refresh_token_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(routes::REFRESH, &json!({"refresh_token": "not.a.jwt"}))
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_INVALID");
    }
}

mod profile {
    use super::*;

    #[tokio::test]
    async fn profile_requires_a_token() {
        let app = TestApp::spawn().await;

        let res = app.get_without_token(routes::PROFILE).await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_MISSING");
    }

    #[tokio::test]
    async fn profile_returns_role_and_permissions_but_no_password() {
        let app = TestApp::spawn().await;
        let token = app.owner_token().await;

        let res = app.get_with_token(routes::PROFILE, &token).await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["role"], "owner");
        assert_eq!(
            res.body["permissions"].as_array().unwrap().len(),
            DEFAULT_PERMISSIONS.len()
        );
        assert!(res.body.get("password").is_none());
    }

    #[tokio::test]
    async fn refresh_token_is_rejected_by_protected_routes() {
        let app = TestApp::spawn().await;
        let login = app.login(OWNER_USERNAME, OWNER_PASSWORD).await;
        let refresh_token = login.body["refresh_token"].as_str().unwrap();

        let res = app.get_with_token(routes::PROFILE, refresh_token).await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_INVALID");
    }

    #[tokio::test]
    async fn malformed_authorization_header_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app.get_with_token(routes::PROFILE, "").await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_INVALID");
    }

    #[tokio::test]
    async fn token_for_a_vanished_user_returns_not_found() {
        let app = TestApp::spawn().await;
        let token = jwt::sign(999_999, TokenKind::Access, &auth_config()).unwrap();

        let res: TestResponse = app.get_with_token(routes::PROFILE, &token).await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }
}
