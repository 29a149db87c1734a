//! Admin authentication endpoints.

use reqwest::Method;
use serde::{Deserialize, Serialize};

use super::{ApiClient, ApiError};
use crate::types::Admin;

/// Payload of a successful `POST /auth/admin/login`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginData {
    pub token: String,
    pub user: Admin,
}

impl ApiClient {
    /// Exchange credentials for a session token. The token is returned, not
    /// stored; the caller decides whether to persist it.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginData, ApiError> {
        #[derive(Serialize)]
        struct Body<'a> {
            email: &'a str,
            password: &'a str,
        }

        let envelope = self
            .request::<LoginData>(
                Method::POST,
                "/auth/admin/login",
                Some(&Body { email, password }),
            )
            .await?;
        Ok(envelope.data)
    }

    /// Fetch the authenticated admin, verifying the stored token is valid.
    pub async fn me(&self) -> Result<Admin, ApiError> {
        #[derive(Deserialize)]
        struct Data {
            user: Admin,
        }

        let envelope = self.request_empty::<Data>(Method::GET, "/auth/me").await?;
        Ok(envelope.data.user)
    }

    pub async fn logout(&self) -> Result<(), ApiError> {
        self.request_ack_empty(Method::POST, "/auth/logout").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::token_store::TokenStore;
    use crate::api::RetryPolicy;
    use std::time::Duration;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn test_rejected_login_surfaces_server_message_and_stores_nothing() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            let body = r#"{"success": false, "message": "Invalid email or password"}"#;
            let response = format!(
                "HTTP/1.1 401 Unauthorized\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                body.len(),
                body
            );
            let _ = socket.write_all(response.as_bytes()).await;
        });

        let dir = tempfile::tempdir().unwrap();
        let client = ApiClient::with_parts(
            &format!("http://{}", addr),
            Duration::from_secs(5),
            RetryPolicy::default(),
            TokenStore::with_root(dir.path()),
        )
        .unwrap();

        let err = client.login("admin@flowdesk.io", "wrong").await.unwrap_err();
        match err {
            ApiError::Api { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "Invalid email or password");
            }
            other => panic!("expected ApiError::Api, got {other:?}"),
        }
        assert!(matches!(
            client.token_store().load(),
            Err(ApiError::NotAuthenticated)
        ));
    }
}
