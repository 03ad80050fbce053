//! Signed-in admin plus the client-side permission mirror

use shared::models::AdminView;
use shared::{Action, Module, Permission, PermissionGuard};

use crate::{ClientError, ClientResult, HttpClient};

/// Current signed-in session
///
/// `login` / `refresh` reload the [`PermissionGuard`] from `roleDetails`; a
/// 401 from the server clears the session. The guard only drives what the UI
/// shows, the server still checks every request.
#[derive(Debug, Clone)]
pub struct Session {
    http: HttpClient,
    admin: Option<AdminView>,
    guard: PermissionGuard,
}

impl Session {
    pub fn new(http: HttpClient) -> Self {
        Self {
            http,
            admin: None,
            guard: PermissionGuard::new(),
        }
    }

    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    pub fn admin(&self) -> Option<&AdminView> {
        self.admin.as_ref()
    }

    pub fn guard(&self) -> &PermissionGuard {
        &self.guard
    }

    pub fn is_authenticated(&self) -> bool {
        self.admin.is_some() && self.http.token().is_some()
    }

    pub async fn login(&mut self, email: &str, password: &str) -> ClientResult<&AdminView> {
        let auth = self.http.login(email, password).await?;
        tracing::info!(admin = %auth.admin.admin.email, "Signed in");
        Ok(self.store(auth.admin))
    }

    /// Re-fetch the profile (e.g. after a role change); 401 ends the session
    pub async fn refresh(&mut self) -> ClientResult<&AdminView> {
        match self.http.me().await {
            Ok(admin) => Ok(self.store(admin)),
            Err(err) => {
                if err.is_unauthorized() {
                    self.clear();
                }
                Err(err)
            }
        }
    }

    pub async fn logout(&mut self) -> ClientResult<()> {
        let result = self.http.logout().await;
        self.clear();
        match result {
            // Token already invalid: the session is gone either way
            Err(ClientError::Unauthorized(_)) => Ok(()),
            other => other,
        }
    }

    pub fn can(&self, module: Module, action: Action) -> bool {
        self.guard.has_permission(module, action)
    }

    pub fn can_any(&self, permissions: &[Permission]) -> bool {
        self.guard.has_any_permission(permissions)
    }

    pub fn can_all(&self, permissions: &[Permission]) -> bool {
        self.guard.has_all_permissions(permissions)
    }

    fn store(&mut self, admin: AdminView) -> &AdminView {
        self.guard.load(admin.role_details.as_ref());
        self.admin.insert(admin)
    }

    fn clear(&mut self) {
        self.admin = None;
        self.guard.clear();
        self.http.set_token(None);
    }
}
