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

//! Authentication for the Lark Open Platform client libraries.
//!
//! The platform authenticates calls with short-lived access tokens. Tenant
//! and app tokens are acquired from the platform's issuing endpoints using
//! the application's id and secret; this crate acquires them lazily, caches
//! them until they expire, and shares a single in-flight refresh between any
//! number of concurrent callers. User tokens are obtained by the application
//! through an OAuth flow and are consumed by the dispatch layer without ever
//! passing through this crate's cache.
//!
//! Most applications never use this crate directly: the clients create the
//! credentials they need from their configuration. Create credentials
//! explicitly to share them between clients, or to override the token
//! endpoint in tests.
//!
//! # Example
//! ```no_run
//! # use lark_oapi_auth::credentials::tenant;
//! # tokio_test::block_on(async {
//! let credentials = tenant::Builder::new("cli_a1234567", "secret").build()?;
//! let token = credentials.token().await?;
//! println!("token expires at {:?}", token.expires_at);
//! # Ok::<(), lark_oapi_auth::errors::CredentialsError>(())
//! # });
//! ```

/// An alias of [std::result::Result] where the error is always
/// [CredentialsError][crate::errors::CredentialsError].
pub type Result<T> = std::result::Result<T, crate::errors::CredentialsError>;

/// Well-known endpoints and token paths.
pub mod constants;

/// Credential types and their builders.
pub mod credentials;

/// Error types for credential creation and use.
pub mod errors;

/// Types and functions to work with access tokens.
pub mod token;

mod headers_util;
mod token_cache;
