//! Client against a live admin server on an ephemeral port

use admin_client::{ClientConfig, ClientError, HttpClient, Session};
use admin_server::auth::password::hash_password;
use admin_server::db::repository::NewAdmin;
use admin_server::db::repository::role::NewRole;
use admin_server::{ServerState, build_app};
use serde_json::Value;
use shared::{Action, Module, Permission, PermissionMatrix};

const PASSWORD: &str = "password123";

struct Server {
    state: ServerState,
    base_url: String,
    _dir: tempfile::TempDir,
}

async fn start() -> Server {
    let dir = tempfile::tempdir().unwrap();
    let state = ServerState::for_tests(dir.path().to_string_lossy())
        .await
        .unwrap();
    let app = build_app(&state).with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    Server {
        state,
        base_url: format!("http://{addr}"),
        _dir: dir,
    }
}

async fn seed_admin(state: &ServerState, email: &str, is_super_admin: bool, permissions: PermissionMatrix) {
    let role = state
        .roles
        .create(NewRole {
            name: format!("role-{email}"),
            description: String::new(),
            is_super_admin,
            is_default: false,
            is_active: true,
            permissions,
        })
        .await
        .unwrap();
    state
        .admins
        .create(NewAdmin {
            name: "Client Test".into(),
            email: email.into(),
            password_hash: hash_password(PASSWORD).unwrap(),
            role_id: Some(role.id),
            is_active: true,
            phone: None,
            department: None,
            bio: None,
        })
        .await
        .unwrap();
}

fn session(server: &Server) -> Session {
    Session::new(HttpClient::new(&ClientConfig::new(&server.base_url)).unwrap())
}

#[tokio::test]
async fn login_loads_permission_mirror() {
    let server = start().await;
    seed_admin(
        &server.state,
        "clerk@example.com",
        false,
        PermissionMatrix::new()
            .with(Module::Products, Action::View, true)
            .with(Module::Products, Action::Create, false),
    )
    .await;

    let mut session = session(&server);
    let admin = session.login("clerk@example.com", PASSWORD).await.unwrap();
    assert_eq!(admin.admin.email, "clerk@example.com");

    assert!(session.is_authenticated());
    assert!(session.can(Module::Products, Action::View));
    assert!(!session.can(Module::Products, Action::Create));
    assert!(!session.can(Module::Roles, Action::View));

    // The mirror agrees with the server
    let ok = session.http().get::<Value>("/api/products").await;
    assert!(ok.is_ok());
    let err = session
        .http()
        .post_empty::<Value>("/api/products")
        .await
        .unwrap_err();
    assert_eq!(
        err.required_permissions(),
        &[Permission::new(Module::Products, Action::Create)]
    );
}

#[tokio::test]
async fn super_admin_mirror_allows_everything() {
    let server = start().await;
    seed_admin(&server.state, "root@example.com", true, PermissionMatrix::new()).await;

    let mut session = session(&server);
    session.login("root@example.com", PASSWORD).await.unwrap();
    assert!(session.guard().is_super_admin());
    assert!(session.can_all(&[
        Permission::new(Module::Roles, Action::Delete),
        Permission::new(Module::Pages, Action::Edit),
    ]));

    session.refresh().await.unwrap();
    assert!(session.is_authenticated());

    session.logout().await.unwrap();
    assert!(!session.is_authenticated());
    assert!(!session.can(Module::Dashboard, Action::View));
}

#[tokio::test]
async fn bad_credentials_and_missing_token_are_unauthorized() {
    let server = start().await;
    seed_admin(&server.state, "root@example.com", true, PermissionMatrix::new()).await;

    let mut session = session(&server);
    let err = session.login("root@example.com", "nope-nope").await.unwrap_err();
    assert!(err.is_unauthorized());
    assert!(!session.is_authenticated());

    let err = session.refresh().await.unwrap_err();
    assert!(matches!(err, ClientError::Unauthorized(_)));
}

#[tokio::test]
async fn any_requirement_lists_alternatives() {
    let server = start().await;
    seed_admin(
        &server.state,
        "nobody@example.com",
        false,
        PermissionMatrix::default_skeleton(),
    )
    .await;

    let mut session = session(&server);
    session.login("nobody@example.com", PASSWORD).await.unwrap();
    assert!(!session.can_any(&[
        Permission::new(Module::Dashboard, Action::View),
        Permission::new(Module::Analytics, Action::View),
    ]));

    let err = session
        .http()
        .get::<Value>("/api/dashboard/summary")
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Forbidden { .. }));
    assert_eq!(err.required_permissions().len(), 2);
}
