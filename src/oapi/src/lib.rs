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

//! Lark Open Platform helpers.
//!
//! This crate contains the types shared by every client in the Lark Open
//! Platform client libraries for Rust: the request descriptor consumed by the
//! dispatch layer, the response and error types returned by it, and the
//! per-request options.
//!
//! Generated endpoint methods are a mechanical mapping from the vendor's API
//! catalog to [request::ApiRequest] values; all of them delegate to the same
//! dispatch layer (`lark-oapi-internal`), which resolves credentials, builds
//! the final URL and payload, executes the call, and unwraps the vendor's
//! `{code, msg, data}` envelope.

/// An alias of [std::result::Result] where the error is always [crate::error::Error].
///
/// This is the result type used by all functions wrapping API calls.
pub type Result<T> = std::result::Result<T, crate::error::Error>;

/// The core error types used by generated clients.
pub mod error;

/// The per-request options accepted by every generated endpoint method.
pub mod options;

/// The request descriptor produced by generated endpoint methods.
pub mod request;

/// Response types.
pub mod response;
