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

mod core_error;
pub use core_error::*;
mod credentials;
pub use credentials::CredentialsError;

/// The application-level status embedded in the vendor's response envelope.
///
/// The client libraries distinguish between errors detected while trying to
/// send a request (e.g. cannot open a connection), errors reported by the
/// transport (e.g. a `502` from a load balancer), and errors reported by the
/// vendor's application layer. The vendor reports the latter through a
/// `{code, msg}` pair embedded in the response body, even when the HTTP
/// status is `200`.
///
/// # Examples
///
/// ```
/// # use lark_oapi::error;
/// use error::Error;
/// fn handle_error(e: Error) {
///     if let Some(status) = e.status() {
///         println!("the platform reported {status}")
///     }
/// }
/// ```
pub mod status;
