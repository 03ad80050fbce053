//! Test harness: in-memory state, full middleware stack, oneshot requests

#![allow(dead_code)]

use admin_server::auth::password::hash_password;
use admin_server::db::repository::NewAdmin;
use admin_server::db::repository::role::NewRole;
use admin_server::{ServerState, build_app};
use axum::Router;
use axum::body::Body;
use http::{Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::Value;
use shared::PermissionMatrix;
use shared::models::{Admin, Role};
use tempfile::TempDir;
use tower::ServiceExt;

pub const PASSWORD: &str = "password123";

pub struct TestApp {
    pub state: ServerState,
    app: Router,
    _dir: TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let state = ServerState::for_tests(dir.path().to_string_lossy())
            .await
            .expect("test state");
        let app = build_app(&state).with_state(state.clone());
        Self {
            state,
            app,
            _dir: dir,
        }
    }

    pub async fn role(&self, name: &str, is_super_admin: bool, permissions: PermissionMatrix) -> Role {
        self.state
            .roles
            .create(NewRole {
                name: name.to_string(),
                description: String::new(),
                is_super_admin,
                is_default: false,
                is_active: true,
                permissions,
            })
            .await
            .expect("create role")
    }

    pub async fn admin(&self, email: &str, role_id: Option<&str>) -> Admin {
        self.state
            .admins
            .create(NewAdmin {
                name: "Test Admin".to_string(),
                email: email.to_string(),
                password_hash: hash_password(PASSWORD).expect("hash"),
                role_id: role_id.map(str::to_string),
                is_active: true,
                phone: None,
                department: None,
                bio: None,
            })
            .await
            .expect("create admin")
    }

    pub fn token(&self, admin: &Admin) -> String {
        self.state
            .jwt_service
            .generate_token(&admin.id, &admin.email)
            .expect("token")
    }

    /// Role with the given matrix plus an admin on it, returning the admin's token
    pub async fn login_as(&self, email: &str, permissions: PermissionMatrix) -> String {
        let role = self.role(&format!("role-{email}"), false, permissions).await;
        let admin = self.admin(email, Some(&role.id)).await;
        self.token(&admin)
    }

    pub async fn super_admin(&self, email: &str) -> (Admin, String) {
        let role = self.role(&format!("super-{email}"), true, PermissionMatrix::new()).await;
        let admin = self.admin(email, Some(&role.id)).await;
        let token = self.token(&admin);
        (admin, token)
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .app
            .clone()
            .oneshot(builder.body(body).expect("request"))
            .await
            .expect("infallible");
        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("body")
            .to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request(Method::GET, uri, token, None).await
    }
}
