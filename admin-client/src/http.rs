//! HTTP client for the admin REST API

use reqwest::{Client, Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use shared::Permission;
use shared::models::{AdminView, AuthResponse, LoginRequest};

use crate::{ApiResponse, ClientConfig, ClientError, ClientResult};

/// HTTP client for making network requests to the admin server
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpClient {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> ClientResult<ApiResponse<T>> {
        let mut request = self.client.request(method, self.url(path));
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await?;
        Self::handle_response(response).await
    }

    /// Map non-success statuses to typed errors, otherwise decode the envelope
    async fn handle_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> ClientResult<ApiResponse<T>> {
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let envelope = serde_json::from_str::<ApiResponse<Value>>(&text).ok();
            let message = envelope
                .as_ref()
                .map(|e| e.message.clone())
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| text.clone());
            tracing::debug!(status = status.as_u16(), %message, "Request failed");

            return Err(match status {
                StatusCode::UNAUTHORIZED => ClientError::Unauthorized(message),
                StatusCode::FORBIDDEN => ClientError::Forbidden {
                    required: envelope.as_ref().map(required_permissions).unwrap_or_default(),
                    message,
                },
                StatusCode::NOT_FOUND => ClientError::NotFound(message),
                StatusCode::BAD_REQUEST => ClientError::Validation {
                    errors: envelope.as_ref().and_then(|e| e.detail("errors").cloned()),
                    message,
                },
                other => ClientError::Server {
                    status: other.as_u16(),
                    message,
                },
            });
        }

        serde_json::from_str(&text).map_err(Into::into)
    }

    // ========== Generic verbs ==========

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<ApiResponse<T>> {
        self.send(Method::GET, path, None).await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<ApiResponse<T>> {
        self.send(Method::POST, path, Some(serde_json::to_value(body)?))
            .await
    }

    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> ClientResult<ApiResponse<T>> {
        self.send(Method::POST, path, None).await
    }

    pub async fn put<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<ApiResponse<T>> {
        self.send(Method::PUT, path, Some(serde_json::to_value(body)?))
            .await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> ClientResult<ApiResponse<T>> {
        self.send(Method::DELETE, path, None).await
    }

    // ========== Auth API ==========

    /// Sign in; the returned token is kept for subsequent requests
    pub async fn login(&mut self, email: &str, password: &str) -> ClientResult<AuthResponse> {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let auth = self
            .post::<AuthResponse, _>("/api/auth/login", &request)
            .await?
            .data
            .ok_or_else(|| ClientError::InvalidResponse("Missing login data".to_string()))?;
        self.token = Some(auth.token.clone());
        Ok(auth)
    }

    /// Current admin profile with role details
    pub async fn me(&self) -> ClientResult<AdminView> {
        self.get::<AdminView>("/api/auth/me")
            .await?
            .data
            .ok_or_else(|| ClientError::InvalidResponse("Missing admin data".to_string()))
    }

    /// Logout; the token is dropped even when the server call fails
    pub async fn logout(&mut self) -> ClientResult<()> {
        let result = self.post_empty::<Value>("/api/auth/logout").await;
        self.token = None;
        result.map(|_| ())
    }
}

/// `requiredPermission` / `requiredPermissions` of a 403 body
fn required_permissions(envelope: &ApiResponse<Value>) -> Vec<Permission> {
    if let Some(one) = envelope.detail("requiredPermission") {
        return serde_json::from_value::<Permission>(one.clone())
            .map(|p| vec![p])
            .unwrap_or_default();
    }
    envelope
        .detail("requiredPermissions")
        .and_then(|list| serde_json::from_value(list.clone()).ok())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use shared::{Action, Module};

    fn envelope(body: Value) -> ApiResponse<Value> {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn test_required_permission_single() {
        let e = envelope(json!({
            "success": false,
            "message": "Access denied",
            "requiredPermission": { "module": "products", "action": "create" }
        }));
        assert_eq!(
            required_permissions(&e),
            vec![Permission::new(Module::Products, Action::Create)]
        );
    }

    #[test]
    fn test_required_permissions_list() {
        let e = envelope(json!({
            "success": false,
            "message": "Insufficient permissions",
            "requiredPermissions": [
                { "module": "dashboard", "action": "view" },
                { "module": "analytics", "action": "view" }
            ]
        }));
        assert_eq!(required_permissions(&e).len(), 2);
    }

    #[test]
    fn test_url_joining() {
        let client = HttpClient::new(&ClientConfig::new("http://localhost:5000/")).unwrap();
        assert_eq!(client.url("/api/health"), "http://localhost:5000/api/health");
        assert_eq!(client.url("api/health"), "http://localhost:5000/api/health");
    }
}
