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

//! Tenant access token credentials.
//!
//! A tenant access token represents the application acting within a specific
//! tenant. It is acquired from the platform's issuing endpoint using the
//! application's id and secret, cached, and refreshed when it expires. Any
//! number of concurrent callers share a single in-flight refresh.
//!
//! Example usage:
//!
//! ```no_run
//! # use lark_oapi_auth::credentials::tenant::Builder;
//! # tokio_test::block_on(async {
//! let credentials = Builder::new("cli_a1234567", "secret")
//!     .with_endpoint("https://open.larksuite.com")
//!     .build()?;
//! let token = credentials.token().await?;
//! # Ok::<(), lark_oapi_auth::errors::CredentialsError>(())
//! # });
//! ```

use crate::Result;
use crate::constants::DEFAULT_ENDPOINT;
use crate::credentials::token_endpoint::{IssuedTokenKind, SelfBuiltTokenProvider};
use crate::credentials::{Credentials, CredentialsProvider};
use crate::errors;
use crate::headers_util::build_bearer_headers;
use crate::token::{Token, TokenProvider};
use crate::token_cache::TokenCache;
use http::header::{HeaderName, HeaderValue};
use std::sync::Arc;
use std::time::Duration;

/// A builder for tenant access token [Credentials].
///
/// # Example
/// ```
/// # use lark_oapi_auth::credentials::tenant::Builder;
/// let credentials = Builder::new("cli_a1234567", "secret").build();
/// ```
pub struct Builder {
    app_id: String,
    app_secret: String,
    endpoint: Option<String>,
    refresh_margin: Option<Duration>,
}

impl Builder {
    /// Creates a new builder using the application's id and secret.
    pub fn new<I: Into<String>, S: Into<String>>(app_id: I, app_secret: S) -> Self {
        Self {
            app_id: app_id.into(),
            app_secret: app_secret.into(),
            endpoint: None,
            refresh_margin: None,
        }
    }

    /// Sets the base endpoint used to issue tokens.
    ///
    /// Defaults to the Feishu deployment
    /// ([DEFAULT_ENDPOINT][crate::constants::DEFAULT_ENDPOINT]). Use the
    /// Lark deployment or a test server by overriding it here.
    pub fn with_endpoint<S: Into<String>>(mut self, endpoint: S) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Sets the refresh margin.
    ///
    /// A token due to expire within the margin is refreshed proactively
    /// instead of being served. Defaults to zero: tokens are served through
    /// their full platform-granted lifetime.
    pub fn with_refresh_margin(mut self, margin: Duration) -> Self {
        self.refresh_margin = Some(margin);
        self
    }

    /// Returns a [Credentials] instance with the configured settings.
    ///
    /// # Errors
    ///
    /// Returns a [CredentialsError][crate::errors::CredentialsError] if the
    /// application id or secret is empty. Acquisition problems are reported
    /// later, by the first call that needs a token.
    pub fn build(self) -> Result<Credentials> {
        if self.app_id.is_empty() || self.app_secret.is_empty() {
            return Err(errors::non_retryable_from_str(
                "an application id and secret are required to issue tenant access tokens",
            ));
        }
        let token_provider = SelfBuiltTokenProvider {
            kind: IssuedTokenKind::Tenant,
            app_id: self.app_id,
            app_secret: self.app_secret,
            endpoint: self.endpoint.unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
        };
        let cache = TokenCache::new(token_provider, self.refresh_margin.unwrap_or_default());
        Ok(Credentials {
            inner: Arc::new(TenantCredentials { cache }),
        })
    }
}

#[derive(Debug)]
struct TenantCredentials<T>
where
    T: TokenProvider,
{
    cache: TokenCache<T>,
}

#[async_trait::async_trait]
impl<T> CredentialsProvider for TenantCredentials<T>
where
    T: TokenProvider + 'static,
{
    async fn token(&self) -> Result<Token> {
        self.cache.token().await
    }

    async fn headers(&self) -> Result<Vec<(HeaderName, HeaderValue)>> {
        let token = self.token().await?;
        build_bearer_headers(&token)
    }

    async fn invalidate(&self) {
        self.cache.invalidate().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httptest::{Expectation, Server, matchers::*, responders::*};

    #[test]
    fn build_requires_id_and_secret() {
        let err = Builder::new("", "secret").build().unwrap_err();
        assert!(!err.is_retryable(), "{err}");
        let err = Builder::new("cli_a1234567", "").build().unwrap_err();
        assert!(!err.is_retryable(), "{err}");
    }

    #[tokio::test]
    async fn acquires_and_caches() -> anyhow::Result<()> {
        let server = Server::run();
        // The issuing endpoint must be called exactly once; the second
        // `token()` call is served from the cache.
        server.expect(
            Expectation::matching(request::method_path(
                "POST",
                "/open-apis/auth/v3/tenant_access_token/internal",
            ))
            .times(1)
            .respond_with(json_encoded(serde_json::json!({
                "code": 0,
                "msg": "ok",
                "tenant_access_token": "t-123",
                "expire": 7200,
            }))),
        );

        let credentials = Builder::new("cli_a1234567", "secret")
            .with_endpoint(format!("http://{}", server.addr()))
            .build()?;

        let token = credentials.token().await?;
        assert_eq!(token.token, "t-123");
        let token = credentials.token().await?;
        assert_eq!(token.token, "t-123");

        let headers = credentials.headers().await?;
        assert_eq!(headers[0].1.to_str()?, "Bearer t-123");
        Ok(())
    }

    #[tokio::test]
    async fn invalidate_discards_cached_token() -> anyhow::Result<()> {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path(
                "POST",
                "/open-apis/auth/v3/tenant_access_token/internal",
            ))
            .times(2)
            .respond_with(json_encoded(serde_json::json!({
                "code": 0,
                "msg": "ok",
                "tenant_access_token": "t-123",
                "expire": 7200,
            }))),
        );

        let credentials = Builder::new("cli_a1234567", "secret")
            .with_endpoint(format!("http://{}", server.addr()))
            .build()?;

        credentials.token().await?;
        credentials.invalidate().await;
        credentials.token().await?;
        Ok(())
    }

    #[tokio::test]
    async fn acquisition_failure_propagates() -> anyhow::Result<()> {
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

        let credentials = Builder::new("cli_a1234567", "wrong")
            .with_endpoint(format!("http://{}", server.addr()))
            .build()?;

        let err = credentials.token().await.unwrap_err();
        assert!(!err.is_retryable(), "{err}");
        assert!(format!("{err}").contains("invalid app_secret"), "{err}");
        Ok(())
    }
}
