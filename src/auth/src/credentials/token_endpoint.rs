// Copyright 2025 Lark OAPI Rust Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The shared token acquirer behind the tenant and app credential types.
//!
//! Both issuing endpoints accept the same `{app_id, app_secret}` request and
//! answer with the platform envelope carrying the token and a relative
//! `expire` seconds-to-live, which is converted to an absolute instant here,
//! at acquisition time.

use crate::Result;
use crate::constants::{APP_ACCESS_TOKEN_PATH, TENANT_ACCESS_TOKEN_PATH};
use crate::errors::{self, CredentialsError};
use crate::token::{Token, TokenProvider};
use http::header::{CONTENT_TYPE, HeaderValue};
use lark_oapi::error::status;
use reqwest::{Client, Method};
use std::time::Duration;
use tokio::time::Instant;

/// The credential kinds this acquirer can issue.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum IssuedTokenKind {
    Tenant,
    App,
}

impl IssuedTokenKind {
    fn path(&self) -> &'static str {
        match self {
            IssuedTokenKind::Tenant => TENANT_ACCESS_TOKEN_PATH,
            IssuedTokenKind::App => APP_ACCESS_TOKEN_PATH,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            IssuedTokenKind::Tenant => "tenant",
            IssuedTokenKind::App => "app",
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
struct TokenRequest {
    app_id: String,
    app_secret: String,
}

#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
struct TokenResponse {
    code: i64,
    #[serde(default)]
    msg: String,
    tenant_access_token: Option<String>,
    app_access_token: Option<String>,
    expire: Option<u64>,
}

#[derive(PartialEq)]
pub(crate) struct SelfBuiltTokenProvider {
    pub(crate) kind: IssuedTokenKind,
    pub(crate) app_id: String,
    pub(crate) app_secret: String,
    pub(crate) endpoint: String,
}

impl std::fmt::Debug for SelfBuiltTokenProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelfBuiltTokenProvider")
            .field("kind", &self.kind)
            .field("app_id", &self.app_id)
            .field("app_secret", &"[censored]")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

#[async_trait::async_trait]
impl TokenProvider for SelfBuiltTokenProvider {
    async fn token(&self) -> Result<Token> {
        let client = Client::new();

        // Make the request
        let req = TokenRequest {
            app_id: self.app_id.clone(),
            app_secret: self.app_secret.clone(),
        };
        let header = HeaderValue::from_static("application/json; charset=utf-8");
        let builder = client
            .request(Method::POST, format!("{}{}", self.endpoint, self.kind.path()))
            .header(CONTENT_TYPE, header)
            .json(&req);
        let resp = builder.send().await.map_err(errors::retryable)?;

        // Process the response
        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp
                .text()
                .await
                .map_err(|e| CredentialsError::new(errors::is_retryable(status), e))?;
            return Err(CredentialsError::from_str(
                errors::is_retryable(status),
                format!(
                    "failed to fetch the {} access token: {body}",
                    self.kind.name()
                ),
            ));
        }
        let response = resp.json::<TokenResponse>().await.map_err(|e| {
            let retryable = !e.is_decode();
            CredentialsError::new(retryable, e)
        })?;
        if response.code != status::code::OK {
            return Err(errors::non_retryable_from_str(format!(
                "the issuing endpoint rejected the {} access token request: [{}] {}",
                self.kind.name(),
                response.code,
                response.msg
            )));
        }
        let token = match self.kind {
            IssuedTokenKind::Tenant => response.tenant_access_token,
            IssuedTokenKind::App => response.app_access_token,
        }
        .ok_or_else(|| {
            errors::non_retryable_from_str(format!(
                "the issuing endpoint returned no {} access token",
                self.kind.name()
            ))
        })?;
        Ok(Token {
            token,
            token_type: "Bearer".to_string(),
            expires_at: response
                .expire
                .map(|d| Instant::now() + Duration::from_secs(d)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httptest::{Expectation, Server, matchers::*, responders::*};

    #[test]
    fn debug_censors_secret() {
        let provider = SelfBuiltTokenProvider {
            kind: IssuedTokenKind::Tenant,
            app_id: "cli_test_id".to_string(),
            app_secret: "test-secret".to_string(),
            endpoint: "https://open.feishu.cn".to_string(),
        };
        let got = format!("{provider:?}");
        assert!(got.contains("cli_test_id"), "{got}");
        assert!(!got.contains("test-secret"), "{got}");
        assert!(got.contains("https://open.feishu.cn"), "{got}");
    }

    #[tokio::test]
    async fn fetch_tenant_token() -> anyhow::Result<()> {
        let server = Server::run();
        server.expect(
            Expectation::matching(all_of![
                request::method_path("POST", "/open-apis/auth/v3/tenant_access_token/internal"),
                request::body(json_decoded(eq(serde_json::json!({
                    "app_id": "cli_test_id",
                    "app_secret": "test-secret",
                })))),
            ])
            .respond_with(json_encoded(serde_json::json!({
                "code": 0,
                "msg": "ok",
                "tenant_access_token": "t-123",
                "expire": 7200,
            }))),
        );

        let provider = SelfBuiltTokenProvider {
            kind: IssuedTokenKind::Tenant,
            app_id: "cli_test_id".to_string(),
            app_secret: "test-secret".to_string(),
            endpoint: format!("http://{}", server.addr()),
        };
        let before = Instant::now();
        let token = provider.token().await?;
        assert_eq!(token.token, "t-123");
        assert_eq!(token.token_type, "Bearer");
        // The relative `expire` became an absolute instant.
        let expires_at = token.expires_at.unwrap();
        assert!(expires_at > before + Duration::from_secs(7100), "{token:?}");
        assert!(expires_at <= Instant::now() + Duration::from_secs(7200), "{token:?}");
        Ok(())
    }

    #[tokio::test]
    async fn fetch_app_token() -> anyhow::Result<()> {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path(
                "POST",
                "/open-apis/auth/v3/app_access_token/internal",
            ))
            .respond_with(json_encoded(serde_json::json!({
                "code": 0,
                "msg": "ok",
                "app_access_token": "a-123",
                "expire": 7200,
            }))),
        );

        let provider = SelfBuiltTokenProvider {
            kind: IssuedTokenKind::App,
            app_id: "cli_test_id".to_string(),
            app_secret: "test-secret".to_string(),
            endpoint: format!("http://{}", server.addr()),
        };
        let token = provider.token().await?;
        assert_eq!(token.token, "a-123");
        Ok(())
    }

    #[tokio::test]
    async fn rejected_app_secret() {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path(
                "POST",
                "/open-apis/auth/v3/tenant_access_token/internal",
            ))
            .respond_with(json_encoded(serde_json::json!({
                "code": 10003,
                "msg": "invalid app_secret",
            }))),
        );

        let provider = SelfBuiltTokenProvider {
            kind: IssuedTokenKind::Tenant,
            app_id: "cli_test_id".to_string(),
            app_secret: "wrong".to_string(),
            endpoint: format!("http://{}", server.addr()),
        };
        let err = provider.token().await.unwrap_err();
        assert!(!err.is_retryable(), "{err}");
        let got = format!("{err}");
        assert!(got.contains("10003"), "{got}");
        assert!(got.contains("invalid app_secret"), "{got}");
    }

    #[tokio::test]
    async fn unreachable_issuing_endpoint_is_retryable() {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path(
                "POST",
                "/open-apis/auth/v3/tenant_access_token/internal",
            ))
            .respond_with(status_code(503)),
        );

        let provider = SelfBuiltTokenProvider {
            kind: IssuedTokenKind::Tenant,
            app_id: "cli_test_id".to_string(),
            app_secret: "test-secret".to_string(),
            endpoint: format!("http://{}", server.addr()),
        };
        let err = provider.token().await.unwrap_err();
        assert!(err.is_retryable(), "{err}");
    }

    #[tokio::test]
    async fn missing_token_field() {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path(
                "POST",
                "/open-apis/auth/v3/tenant_access_token/internal",
            ))
            .respond_with(json_encoded(serde_json::json!({
                "code": 0,
                "msg": "ok",
                "expire": 7200,
            }))),
        );

        let provider = SelfBuiltTokenProvider {
            kind: IssuedTokenKind::Tenant,
            app_id: "cli_test_id".to_string(),
            app_secret: "test-secret".to_string(),
            endpoint: format!("http://{}", server.addr()),
        };
        let err = provider.token().await.unwrap_err();
        assert!(!err.is_retryable(), "{err}");
        assert!(format!("{err}").contains("no tenant access token"), "{err}");
    }
}
