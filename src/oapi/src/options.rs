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

//! Per request options.
//!
//! While the client library defaults are intended to work for most
//! applications, some calls need per-request configuration: a user access
//! token obtained through the application's own OAuth flow, a tighter
//! timeout, or a custom user-agent prefix. The `*Builder` returned by each
//! generated endpoint method forwards these options to the dispatch layer.

/// A user access token supplied by the application for a single call.
///
/// User tokens are obtained by the application through the platform's OAuth
/// flow; this layer consumes them but never caches or refreshes them. An
/// expired token is rejected before any network I/O, since only the
/// application can obtain a replacement.
///
/// # Example
/// ```
/// # use lark_oapi::options::UserAccessToken;
/// let token = UserAccessToken::new("u-5Nc9vqGzY4mzJ8kqlFpN3e");
/// assert!(!token.is_expired());
/// ```
#[derive(Clone, PartialEq)]
pub struct UserAccessToken {
    token: String,
    expires_at: Option<std::time::Instant>,
}

impl UserAccessToken {
    /// Creates a user access token without a known expiration.
    pub fn new<T: Into<String>>(token: T) -> Self {
        Self {
            token: token.into(),
            expires_at: None,
        }
    }

    /// Sets the instant at which the token expires, when known.
    pub fn set_expires_at(mut self, v: std::time::Instant) -> Self {
        self.expires_at = Some(v);
        self
    }

    /// The token string, as used in the `Authorization:` header.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// The instant at which the token expires, if known.
    pub fn expires_at(&self) -> Option<std::time::Instant> {
        self.expires_at
    }

    /// Returns true if the token is known to have expired.
    pub fn is_expired(&self) -> bool {
        self.expires_at
            .is_some_and(|e| e <= std::time::Instant::now())
    }
}

impl std::fmt::Debug for UserAccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserAccessToken")
            .field("token", &"[censored]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// A set of options configuring a single request.
///
/// Applications only use this type directly in mocks, where they may want to
/// verify their application has configured all the right request options.
/// All other code uses it indirectly, via the per-request builders.
#[derive(Clone, Debug, Default)]
pub struct RequestOptions {
    user_access_token: Option<UserAccessToken>,
    attempt_timeout: Option<std::time::Duration>,
    user_agent: Option<String>,
}

impl RequestOptions {
    /// Supplies the user access token for calls that require the user kind.
    pub fn set_user_access_token<T: Into<UserAccessToken>>(&mut self, v: T) {
        self.user_access_token = Some(v.into());
    }

    /// Gets the user access token, if any.
    pub fn user_access_token(&self) -> &Option<UserAccessToken> {
        &self.user_access_token
    }

    /// Sets the timeout for the HTTP attempt.
    pub fn set_attempt_timeout<T: Into<std::time::Duration>>(&mut self, v: T) {
        self.attempt_timeout = Some(v.into());
    }

    /// Gets the current attempt timeout.
    pub fn attempt_timeout(&self) -> &Option<std::time::Duration> {
        &self.attempt_timeout
    }

    /// Prepends this prefix to the user agent header value.
    pub fn set_user_agent<T: Into<String>>(&mut self, v: T) {
        self.user_agent = Some(v.into());
    }

    /// Gets the current user-agent prefix.
    pub fn user_agent(&self) -> &Option<String> {
        &self.user_agent
    }
}

impl From<&str> for UserAccessToken {
    fn from(v: &str) -> Self {
        UserAccessToken::new(v)
    }
}

impl From<String> for UserAccessToken {
    fn from(v: String) -> Self {
        UserAccessToken::new(v)
    }
}
