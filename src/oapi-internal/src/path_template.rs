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

//! Expansion of `:param` URL templates.
//!
//! The platform's paths embed resource ids as `:name` segments, e.g.
//! `/open-apis/im/v1/chats/:chat_id`. Parameters used to build the request
//! path are required: the generated code must fail the call locally, before
//! any network I/O, when one is missing. A small helper keeps the generated
//! code easy to read.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

// Everything outside RFC 3986 "unreserved" is escaped inside a path segment.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("missing required path parameter {0}")]
    MissingRequiredParameter(String),
}

pub fn missing(name: &str) -> oapi::error::Error {
    oapi::error::Error::binding(Error::MissingRequiredParameter(name.to_string()))
}

/// Replaces every `:name` segment of `template` with the matching parameter.
///
/// Values are percent-encoded as path segments. A parameter that is absent
/// or empty is a binding error; a parameter the template never mentions is
/// ignored.
///
/// # Example
/// ```
/// # use lark_oapi_internal::path_template::expand;
/// let path = expand(
///     "/open-apis/im/v1/chats/:chat_id",
///     &[("chat_id".to_string(), "oc_123".to_string())],
/// );
/// assert_eq!(path.unwrap(), "/open-apis/im/v1/chats/oc_123");
/// ```
pub fn expand(template: &str, params: &[(String, String)]) -> oapi::Result<String> {
    let mut out = String::with_capacity(template.len());
    for (i, segment) in template.split('/').enumerate() {
        if i > 0 {
            out.push('/');
        }
        match segment.strip_prefix(':') {
            None => out.push_str(segment),
            Some(name) => {
                let value = params
                    .iter()
                    .find_map(|(k, v)| (k == name).then_some(v.as_str()))
                    .filter(|v| !v.is_empty())
                    .ok_or_else(|| missing(name))?;
                out.extend(utf8_percent_encode(value, PATH_SEGMENT));
            }
        }
    }
    Ok(out)
}
