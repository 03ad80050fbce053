//! Authorization middleware behavior through the full router

mod common;

use admin_server::auth::{require_all_permissions, require_auth, require_super_admin};
use axum::routing::get;
use axum::{Router, middleware};
use common::TestApp;
use http::{Method, StatusCode};
use serde_json::json;
use shared::{Action, Module, Permission, PermissionMatrix};

#[tokio::test]
async fn missing_token_is_rejected_with_401() {
    let app = TestApp::new().await;
    let (status, body) = app.get("/api/products", None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Not authorized to access this route");
}

#[tokio::test]
async fn garbage_token_is_rejected_with_401() {
    let app = TestApp::new().await;
    let (status, body) = app.get("/api/products", Some("not-a-jwt")).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn granted_action_passes_and_denied_action_reports_requirement() {
    let app = TestApp::new().await;
    let token = app
        .login_as(
            "clerk@example.com",
            PermissionMatrix::new()
                .with(Module::Products, Action::View, true)
                .with(Module::Products, Action::Create, false),
        )
        .await;

    let (status, _) = app.get("/api/products", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .request(Method::POST, "/api/products", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["success"], false);
    assert_eq!(
        body["requiredPermission"],
        json!({ "module": "products", "action": "create" })
    );
}

#[tokio::test]
async fn absent_module_denies_every_action() {
    let app = TestApp::new().await;
    let token = app
        .login_as(
            "writer@example.com",
            PermissionMatrix::new().with(Module::Products, Action::View, true),
        )
        .await;

    for uri in ["/api/orders", "/api/activity-logs", "/api/users"] {
        let (status, body) = app.get(uri, Some(&token)).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{uri}");
        assert_eq!(body["requiredPermission"]["action"], "view");
    }

    let (_, body) = app.get("/api/orders", Some(&token)).await;
    assert_eq!(
        body["message"],
        "Access denied. You don't have permission to access orders"
    );
}

#[tokio::test]
async fn super_admin_bypasses_an_empty_matrix() {
    let app = TestApp::new().await;
    let (_, token) = app.super_admin("root@example.com").await;

    let (status, _) = app
        .request(Method::POST, "/api/products", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = app
        .request(Method::DELETE, "/api/orders/42", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.get("/api/activity-logs", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn deactivated_role_is_refused_even_for_super_admins() {
    let app = TestApp::new().await;
    let (admin, token) = app.super_admin("fallen@example.com").await;

    let mut role = app
        .state
        .roles
        .find_by_id(admin.role_id.as_deref().unwrap())
        .await
        .unwrap()
        .unwrap();
    role.is_active = false;
    app.state.roles.save(&role).await.unwrap();

    let (status, body) = app.get("/api/products", Some(&token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(
        body["message"],
        "Your role has been deactivated. Contact administrator."
    );
    assert_eq!(body["requiredPermission"]["module"], "products");
}

#[tokio::test]
async fn admin_without_role_is_refused() {
    let app = TestApp::new().await;
    let admin = app.admin("orphan@example.com", None).await;
    let token = app.token(&admin);

    let (status, body) = app.get("/api/products", Some(&token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "No role assigned. Contact administrator.");

    // Routes that only need authentication still work
    let (status, _) = app.get("/api/profile", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn deactivated_admin_is_rejected_at_authentication() {
    let app = TestApp::new().await;
    let (mut admin, token) = app.super_admin("gone@example.com").await;
    admin.is_active = false;
    app.state.admins.save(&admin).await.unwrap();

    let (status, body) = app.get("/api/products", Some(&token)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn any_permission_accepts_either_grant() {
    let app = TestApp::new().await;
    let analyst = app
        .login_as(
            "analyst@example.com",
            PermissionMatrix::new().with(Module::Analytics, Action::View, true),
        )
        .await;
    let (status, body) = app.get("/api/dashboard/summary", Some(&analyst)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["admins"].as_u64().unwrap() >= 1);

    let nobody = app
        .login_as("nobody@example.com", PermissionMatrix::default_skeleton())
        .await;
    let (status, body) = app.get("/api/dashboard/summary", Some(&nobody)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Insufficient permissions");
    assert_eq!(
        body["requiredPermissions"],
        json!([
            { "module": "dashboard", "action": "view" },
            { "module": "analytics", "action": "view" }
        ])
    );
}

#[tokio::test]
async fn all_permissions_needs_every_grant() {
    const BOTH: &[Permission] = &[
        Permission::new(Module::Users, Action::View),
        Permission::new(Module::Orders, Action::View),
    ];

    let app = TestApp::new().await;
    let state = app.state.clone();
    let router: Router = Router::new()
        .route("/api/report", get(|| async { "ok" }))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            require_all_permissions(BOTH),
        ))
        .layer(middleware::from_fn_with_state(state.clone(), require_auth))
        .with_state(state);

    let partial = app
        .login_as(
            "half@example.com",
            PermissionMatrix::new().with(Module::Users, Action::View, true),
        )
        .await;
    let full = app
        .login_as("both@example.com", PermissionMatrix::granting(BOTH))
        .await;

    let call = |token: String| {
        let router = router.clone();
        async move {
            use tower::ServiceExt;
            let request = http::Request::builder()
                .uri("/api/report")
                .header(http::header::AUTHORIZATION, format!("Bearer {token}"))
                .body(axum::body::Body::empty())
                .unwrap();
            router.oneshot(request).await.unwrap().status()
        }
    };

    assert_eq!(call(partial).await, StatusCode::FORBIDDEN);
    assert_eq!(call(full).await, StatusCode::OK);
}

#[tokio::test]
async fn super_admin_only_route_ignores_the_matrix() {
    let app = TestApp::new().await;
    let state = app.state.clone();
    let router: Router = Router::new()
        .route("/api/maintenance", get(|| async { "ok" }))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            require_super_admin,
        ))
        .layer(middleware::from_fn_with_state(state.clone(), require_auth))
        .with_state(state);

    let everything = app
        .login_as("full@example.com", PermissionMatrix::full())
        .await;
    let (_, root) = app.super_admin("root@example.com").await;

    let call = |token: String| {
        let router = router.clone();
        async move {
            use tower::ServiceExt;
            let request = http::Request::builder()
                .uri("/api/maintenance")
                .header(http::header::AUTHORIZATION, format!("Bearer {token}"))
                .body(axum::body::Body::empty())
                .unwrap();
            router.oneshot(request).await.unwrap().status()
        }
    };

    assert_eq!(call(everything).await, StatusCode::FORBIDDEN);
    assert_eq!(call(root).await, StatusCode::OK);
}

#[tokio::test]
async fn settings_read_depends_on_caller() {
    let app = TestApp::new().await;

    // Anonymous: public subset only
    let (status, body) = app.get("/api/app-settings", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["appName"], "Admin Panel");
    assert!(body["data"].get("maxLoginAttempts").is_none());
    assert!(body["meta"]["version"].is_string());

    // settings.view: full document
    let viewer = app
        .login_as(
            "viewer@example.com",
            PermissionMatrix::new().with(Module::Settings, Action::View, true),
        )
        .await;
    let (status, body) = app.get("/api/app-settings", Some(&viewer)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["maxLoginAttempts"].is_number());

    // Authenticated without settings.view: refused
    let clerk = app
        .login_as(
            "clerk@example.com",
            PermissionMatrix::new().with(Module::Products, Action::View, true),
        )
        .await;
    let (status, body) = app.get("/api/app-settings", Some(&clerk)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(
        body["requiredPermission"],
        json!({ "module": "settings", "action": "view" })
    );

    // Viewing does not allow editing
    let (status, _) = app
        .request(
            Method::PUT,
            "/api/app-settings",
            Some(&viewer),
            Some(json!({ "appName": "Nope" })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn public_setting_fields() {
    let app = TestApp::new().await;

    let (status, body) = app.get("/api/app-settings/field/appName", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!({ "field": "appName", "value": "Admin Panel" }));

    let (status, _) = app
        .get("/api/app-settings/field/maxLoginAttempts", None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
