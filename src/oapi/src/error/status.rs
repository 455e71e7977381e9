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

/// The `{code, msg}` pair reported by the vendor's application layer.
///
/// Every non-binary response from the platform is wrapped in a JSON envelope
/// of the form `{"code": ..., "msg": ..., "data": ...}`. A `code` of zero is
/// the only application-level success signal; any other value means the
/// platform understood the call and rejected it. The code taxonomy is the
/// vendor's own and is carried verbatim, never reinterpreted or collapsed.
///
/// # Example
/// ```
/// # use lark_oapi::error::status::Status;
/// let status = Status::default()
///     .set_code(1061002)
///     .set_msg("forbidden");
/// assert!(!status.is_ok());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[non_exhaustive]
pub struct Status {
    /// The application-level result code. Zero means success.
    pub code: i64,

    /// The human-readable message accompanying the code.
    #[serde(default)]
    pub msg: String,
}

impl Status {
    /// Sets the application-level result code.
    pub fn set_code<T: Into<i64>>(mut self, v: T) -> Self {
        self.code = v.into();
        self
    }

    /// Sets the human-readable message.
    pub fn set_msg<T: Into<String>>(mut self, v: T) -> Self {
        self.msg = v.into();
        self
    }

    /// Returns true if the code indicates application-level success.
    pub fn is_ok(&self) -> bool {
        self.code == code::OK
    }

    /// Returns true if the code reports a rejected access token.
    ///
    /// The dispatch layer uses this signal to invalidate the matching cached
    /// credential, so the next call acquires a fresh one.
    pub fn is_token_invalid(&self) -> bool {
        matches!(
            self.code,
            code::TENANT_ACCESS_TOKEN_INVALID | code::APP_ACCESS_TOKEN_INVALID
        )
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.msg)
    }
}

/// Well-known application-level result codes.
pub mod code {
    /// Application-level success.
    pub const OK: i64 = 0;

    /// The tenant access token attached to the call is invalid or expired.
    pub const TENANT_ACCESS_TOKEN_INVALID: i64 = 99991663;

    /// The app access token attached to the call is invalid or expired.
    pub const APP_ACCESS_TOKEN_INVALID: i64 = 99991664;
}
