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

//! Credential types and their builders.
//!
//! The platform issues a separate access token per credential kind. The
//! `tenant` and `app` kinds are acquired by this crate from the platform's
//! issuing endpoints and cached until they expire; each has its own builder
//! module. The `user` kind is supplied by the application per call and never
//! passes through this crate.

use crate::Result;
use crate::token::Token;
use http::header::{HeaderName, HeaderValue};
use std::sync::Arc;

/// Credentials for tenant access tokens.
pub mod tenant;

/// Credentials for app access tokens.
pub mod app;

mod token_endpoint;

/// An implementation of [CredentialsProvider].
///
/// Represents a credential used to obtain tokens to authenticate requests to
/// the Lark Open Platform. In most cases applications do not need to create
/// or even use this type directly: the clients create credentials from their
/// configuration. Create credentials explicitly to share one credential (and
/// its cached token) between clients.
///
/// # Example
/// ```no_run
/// # use lark_oapi_auth::credentials::tenant;
/// # tokio_test::block_on(async {
/// let credentials = tenant::Builder::new("cli_a1234567", "secret").build()?;
/// let headers = credentials.headers().await?;
/// # Ok::<(), lark_oapi_auth::errors::CredentialsError>(())
/// # });
/// ```
#[derive(Clone, Debug)]
pub struct Credentials {
    pub(crate) inner: Arc<dyn CredentialsProvider>,
}

impl Credentials {
    /// Returns a valid token, acquiring or refreshing it first if needed.
    pub async fn token(&self) -> Result<Token> {
        self.inner.token().await
    }

    /// Returns the headers carrying the token.
    pub async fn headers(&self) -> Result<Vec<(HeaderName, HeaderValue)>> {
        self.inner.headers().await
    }

    /// Discards any cached token so the next caller acquires a fresh one.
    ///
    /// The dispatch layer calls this when the platform reports the attached
    /// token as invalid even though its local expiry has not passed.
    pub async fn invalidate(&self) {
        self.inner.invalidate().await
    }
}

impl<T> From<T> for Credentials
where
    T: CredentialsProvider + 'static,
{
    fn from(value: T) -> Self {
        Self {
            inner: Arc::new(value),
        }
    }
}

/// The trait implemented by every credential kind.
///
/// Applications may implement this trait to mock credentials in tests, or to
/// source tokens from their own infrastructure.
#[async_trait::async_trait]
pub trait CredentialsProvider: std::fmt::Debug + Send + Sync {
    /// Returns a valid token, acquiring or refreshing it first if needed.
    async fn token(&self) -> Result<Token>;

    /// Returns the headers carrying the token.
    async fn headers(&self) -> Result<Vec<(HeaderName, HeaderValue)>>;

    /// Discards any cached token. The default implementation does nothing,
    /// which is correct for credentials that do not cache.
    async fn invalidate(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::CredentialsError;

    #[derive(Debug)]
    struct StaticProvider(String);

    #[async_trait::async_trait]
    impl CredentialsProvider for StaticProvider {
        async fn token(&self) -> Result<Token> {
            Ok(Token {
                token: self.0.clone(),
                token_type: "Bearer".to_string(),
                expires_at: None,
            })
        }

        async fn headers(&self) -> Result<Vec<(HeaderName, HeaderValue)>> {
            let token = self.token().await?;
            crate::headers_util::build_bearer_headers(&token)
        }
    }

    #[tokio::test]
    async fn custom_provider() -> anyhow::Result<()> {
        let credentials = Credentials::from(StaticProvider("t-static".to_string()));
        let token = credentials.token().await?;
        assert_eq!(token.token, "t-static");

        let headers = credentials.headers().await?;
        assert_eq!(headers[0].1.to_str()?, "Bearer t-static");

        // The default invalidate is a no-op; the token is still served.
        credentials.invalidate().await;
        let token = credentials.token().await?;
        assert_eq!(token.token, "t-static");
        Ok(())
    }

    #[derive(Debug)]
    struct FailingProvider;

    #[async_trait::async_trait]
    impl CredentialsProvider for FailingProvider {
        async fn token(&self) -> Result<Token> {
            Err(CredentialsError::from_str(false, "no way"))
        }

        async fn headers(&self) -> Result<Vec<(HeaderName, HeaderValue)>> {
            Err(CredentialsError::from_str(false, "no way"))
        }
    }

    #[tokio::test]
    async fn failing_provider() {
        let credentials = Credentials::from(FailingProvider);
        let err = credentials.token().await.unwrap_err();
        assert!(!err.is_retryable(), "{err}");
    }
}
