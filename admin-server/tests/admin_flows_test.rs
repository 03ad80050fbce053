//! End-to-end flows: login, admin and role lifecycle rules, pages, activity log

mod common;

use std::time::Duration;

use common::{PASSWORD, TestApp};
use http::{Method, StatusCode};
use serde_json::{Value, json};
use shared::PermissionMatrix;
use shared::{Action, Module};

#[tokio::test]
async fn login_then_me() {
    let app = TestApp::new().await;
    let role = app
        .role(
            "Editor",
            false,
            PermissionMatrix::new().with(Module::Pages, Action::View, true),
        )
        .await;
    app.admin("editor@example.com", Some(&role.id)).await;

    let (status, body) = app
        .request(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": "Editor@Example.com", "password": PASSWORD })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let token = body["data"]["token"].as_str().unwrap().to_string();
    assert_eq!(body["data"]["admin"]["roleDetails"]["name"], "Editor");

    let (status, body) = app.get("/api/auth/me", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["email"], "editor@example.com");
    assert_eq!(
        body["data"]["roleDetails"]["permissions"]["pages"]["view"],
        true
    );
    assert!(body["data"]["lastLogin"].is_number());
    assert!(body["data"].get("passwordHash").is_none());
}

#[tokio::test]
async fn login_failures_share_one_message() {
    let app = TestApp::new().await;
    let (admin, _) = app.super_admin("root@example.com").await;

    for (email, password) in [
        (admin.email.as_str(), "wrong-password"),
        ("ghost@example.com", PASSWORD),
    ] {
        let (status, body) = app
            .request(
                Method::POST,
                "/api/auth/login",
                None,
                Some(json!({ "email": email, "password": password })),
            )
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Invalid credentials");
    }
}

#[tokio::test]
async fn last_super_admin_cannot_be_removed() {
    let app = TestApp::new().await;
    let (admin, token) = app.super_admin("root@example.com").await;
    let uri = format!("/api/admins/{}", admin.id);

    let (status, body) = app
        .request(Method::PUT, &uri, Some(&token), Some(json!({ "isActive": false })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    let (status, _) = app.request(Method::DELETE, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let stored = app.state.admins.find_by_id(&admin.id).await.unwrap().unwrap();
    assert!(stored.is_active);
}

#[tokio::test]
async fn second_super_admin_can_be_deactivated() {
    let app = TestApp::new().await;
    let (admin, token) = app.super_admin("root@example.com").await;
    let other = app.admin("deputy@example.com", admin.role_id.as_deref()).await;

    let (status, body) = app
        .request(
            Method::PUT,
            &format!("/api/admins/{}", other.id),
            Some(&token),
            Some(json!({ "isActive": false })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["isActive"], false);

    // Now `admin` is the only active one again
    let (status, _) = app
        .request(
            Method::DELETE,
            &format!("/api/admins/{}", admin.id),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn role_deletion_rules() {
    let app = TestApp::new().await;
    let (_, token) = app.super_admin("root@example.com").await;

    let busy = app.role("Support", false, PermissionMatrix::default_skeleton()).await;
    app.admin("agent@example.com", Some(&busy.id)).await;
    let (status, body) = app
        .request(Method::DELETE, &format!("/api/roles/{}", busy.id), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "Cannot delete role. 1 admin(s) are assigned to this role."
    );

    let (_, created) = app
        .request(
            Method::POST,
            "/api/roles",
            Some(&token),
            Some(json!({ "name": "Temp", "description": "short lived" })),
        )
        .await;
    let temp_id = created["data"]["id"].as_str().unwrap().to_string();
    // Omitted matrix: skeleton with everything denied
    assert_eq!(created["data"]["permissions"]["roles"]["delete"], false);

    let (status, _) = app
        .request(Method::DELETE, &format!("/api/roles/{temp_id}"), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(app.state.roles.find_by_id(&temp_id).await.unwrap().is_none());
}

#[tokio::test]
async fn role_names_are_unique_case_insensitively() {
    let app = TestApp::new().await;
    let (_, token) = app.super_admin("root@example.com").await;

    let create = |name: &'static str| {
        let token = token.clone();
        let app = &app;
        async move {
            app.request(
                Method::POST,
                "/api/roles",
                Some(&token),
                Some(json!({ "name": name })),
            )
            .await
            .0
        }
    };
    assert_eq!(create("Auditor").await, StatusCode::CREATED);
    assert_eq!(create("auditor").await, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn non_super_admin_cannot_mint_super_roles() {
    let app = TestApp::new().await;
    let token = app
        .login_as(
            "hr@example.com",
            PermissionMatrix::new().with(Module::Roles, Action::Create, true),
        )
        .await;

    let (status, _) = app
        .request(
            Method::POST,
            "/api/roles",
            Some(&token),
            Some(json!({ "name": "Backdoor", "isSuperAdmin": true })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn registration_cannot_pick_a_super_role() {
    let app = TestApp::new().await;
    let (root, root_token) = app.super_admin("root@example.com").await;
    let super_role = root.role_id.clone().unwrap();
    let editor = app
        .role(
            "Editor",
            false,
            PermissionMatrix::default_skeleton().with(Module::Pages, Action::View, true),
        )
        .await;

    let register = |email: &'static str, role_id: String| {
        let app = &app;
        async move {
            app.request(
                Method::POST,
                "/api/auth/register",
                None,
                Some(json!({
                    "name": "Walk In",
                    "email": email,
                    "password": PASSWORD,
                    "roleId": role_id,
                })),
            )
            .await
        }
    };

    let (status, body) = register("intruder@example.com", super_role).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body.get("data").is_none() || body["data"].is_null());
    assert!(
        app.state
            .admins
            .find_by_email("intruder@example.com")
            .await
            .unwrap()
            .is_none()
    );

    let (status, body) = register("writer@example.com", editor.id.clone()).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["admin"]["roleDetails"]["isSuperAdmin"], false);

    // Root is untouched
    let (status, _) = app
        .get(&format!("/api/admins/{}", root.id), Some(&root_token))
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn admin_managers_cannot_hand_out_super_roles() {
    let app = TestApp::new().await;
    let (root, _) = app.super_admin("root@example.com").await;
    let super_role = root.role_id.clone().unwrap();

    let manager_role = app
        .role(
            "Admin Manager",
            false,
            PermissionMatrix::new()
                .with(Module::Admins, Action::Create, true)
                .with(Module::Admins, Action::Edit, true),
        )
        .await;
    let manager = app.admin("manager@example.com", Some(&manager_role.id)).await;
    let token = app.token(&manager);

    let (status, body) = app
        .request(
            Method::PUT,
            &format!("/api/admins/{}", manager.id),
            Some(&token),
            Some(json!({ "roleId": super_role })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Only super admins can assign super admin roles");

    let stored = app.state.admins.find_by_id(&manager.id).await.unwrap().unwrap();
    assert_eq!(stored.role_id.as_deref(), Some(manager_role.id.as_str()));

    // The ungranted roles layer still refuses
    let (status, _) = app
        .request(Method::DELETE, "/api/roles/nonexistent", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .request(
            Method::POST,
            "/api/admins",
            Some(&token),
            Some(json!({
                "name": "Sleeper",
                "email": "sleeper@example.com",
                "password": PASSWORD,
                "roleId": super_role,
            })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(
        app.state
            .admins
            .find_by_email("sleeper@example.com")
            .await
            .unwrap()
            .is_none()
    );

    // Plain roles remain assignable
    let (status, _) = app
        .request(
            Method::POST,
            "/api/admins",
            Some(&token),
            Some(json!({
                "name": "Helper",
                "email": "helper@example.com",
                "password": PASSWORD,
                "roleId": manager_role.id,
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn pages_are_public_only_once_published() {
    let app = TestApp::new().await;
    let (_, token) = app.super_admin("root@example.com").await;

    let (status, body) = app
        .request(
            Method::POST,
            "/api/pages",
            Some(&token),
            Some(json!({ "title": "Hello World", "content": "<p>hi</p>" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["slug"], "hello-world");
    assert_eq!(body["data"]["status"], "draft");
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, _) = app.get("/api/pages/slug/hello-world", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = app
        .request(
            Method::PUT,
            &format!("/api/pages/{id}"),
            Some(&token),
            Some(json!({ "status": "published", "seo": { "metaTitle": "Hello" } })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["seo"]["metaTitle"], "Hello");
    assert_eq!(body["data"]["updatedBy"]["email"], "root@example.com");

    let (status, body) = app.get("/api/pages/slug/hello-world", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["title"], "Hello World");

    // Listing needs a token but no permission
    let (status, _) = app.get("/api/pages", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let plain = app.login_as("plain@example.com", PermissionMatrix::new()).await;
    let (status, body) = app.get("/api/pages", Some(&plain)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn duplicate_slug_is_rejected() {
    let app = TestApp::new().await;
    let (_, token) = app.super_admin("root@example.com").await;
    let page = json!({ "title": "About", "content": "x" });

    let (status, _) = app
        .request(Method::POST, "/api/pages", Some(&token), Some(page.clone()))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, body) = app
        .request(Method::POST, "/api/pages", Some(&token), Some(page))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

async fn wait_for_logs(app: &TestApp, token: &str, uri: &str, at_least: u64) -> Value {
    for _ in 0..50 {
        let (status, body) = app.get(uri, Some(token)).await;
        assert_eq!(status, StatusCode::OK);
        if body["meta"]["total"].as_u64().unwrap_or(0) >= at_least {
            return body;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("activity log never reached {at_least} entries for {uri}");
}

#[tokio::test]
async fn mutations_land_in_the_activity_log() {
    let app = TestApp::new().await;
    let (admin, token) = app.super_admin("root@example.com").await;

    app.request(
        Method::POST,
        "/api/pages",
        Some(&token),
        Some(json!({ "title": "Changelog", "content": "..." })),
    )
    .await;
    app.request(
        Method::POST,
        "/api/app-settings/toggle/maintenanceMode",
        Some(&token),
        None,
    )
    .await;

    let body = wait_for_logs(&app, &token, "/api/activity-logs?actionType=page", 1).await;
    let entry = &body["data"][0];
    assert_eq!(entry["actionType"], "page_create");
    assert_eq!(entry["admin"]["id"], admin.id.as_str());
    assert_eq!(body["meta"]["page"], 1);
    assert_eq!(body["meta"]["limit"], 10);

    let body = wait_for_logs(&app, &token, "/api/activity-logs?actionType=settings", 1).await;
    assert_eq!(body["data"][0]["actionType"], "settings_update");
}

#[tokio::test]
async fn managed_users_crud() {
    let app = TestApp::new().await;
    let (_, token) = app.super_admin("root@example.com").await;

    let (status, body) = app
        .request(
            Method::POST,
            "/api/users",
            Some(&token),
            Some(json!({ "name": "Sam", "email": "sam@example.com", "password": "secret1" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(body["data"].get("password").is_none());
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, _) = app
        .request(
            Method::POST,
            "/api/users",
            Some(&token),
            Some(json!({ "name": "Sam", "email": "sam@example.com", "password": "secret1" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .request(Method::DELETE, &format!("/api/users/{id}"), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app
        .request(Method::DELETE, &format!("/api/users/{id}"), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
