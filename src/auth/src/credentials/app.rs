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

//! App access token credentials.
//!
//! An app access token represents the application itself, independent of any
//! tenant. Acquisition, caching, and refresh behave exactly as for
//! [tenant][crate::credentials::tenant] credentials; only the issuing path
//! and the envelope field differ.

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

/// A builder for app access token [Credentials].
///
/// # Example
/// ```
/// # use lark_oapi_auth::credentials::app::Builder;
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
    pub fn with_endpoint<S: Into<String>>(mut self, endpoint: S) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Sets the refresh margin. See
    /// [tenant::Builder::with_refresh_margin][crate::credentials::tenant::Builder::with_refresh_margin].
    pub fn with_refresh_margin(mut self, margin: Duration) -> Self {
        self.refresh_margin = Some(margin);
        self
    }

    /// Returns a [Credentials] instance with the configured settings.
    pub fn build(self) -> Result<Credentials> {
        if self.app_id.is_empty() || self.app_secret.is_empty() {
            return Err(errors::non_retryable_from_str(
                "an application id and secret are required to issue app access tokens",
            ));
        }
        let token_provider = SelfBuiltTokenProvider {
            kind: IssuedTokenKind::App,
            app_id: self.app_id,
            app_secret: self.app_secret,
            endpoint: self.endpoint.unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
        };
        let cache = TokenCache::new(token_provider, self.refresh_margin.unwrap_or_default());
        Ok(Credentials {
            inner: Arc::new(AppCredentials { cache }),
        })
    }
}

#[derive(Debug)]
struct AppCredentials<T>
where
    T: TokenProvider,
{
    cache: TokenCache<T>,
}

#[async_trait::async_trait]
impl<T> CredentialsProvider for AppCredentials<T>
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
