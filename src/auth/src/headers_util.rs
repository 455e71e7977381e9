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

use crate::Result;
use crate::errors;
use crate::token::Token;
use http::header::{AUTHORIZATION, HeaderName, HeaderValue};

/// A utility function to create bearer headers.
pub(crate) fn build_bearer_headers(token: &Token) -> Result<Vec<(HeaderName, HeaderValue)>> {
    let mut value = HeaderValue::from_str(&format!("{} {}", token.token_type, token.token))
        .map_err(errors::non_retryable)?;
    value.set_sensitive(true);
    Ok(vec![(AUTHORIZATION, value)])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer() {
        let token = Token {
            token: "t-123".to_string(),
            token_type: "Bearer".to_string(),
            expires_at: None,
        };
        let headers = build_bearer_headers(&token).unwrap();
        assert_eq!(headers.len(), 1);
        let (name, value) = &headers[0];
        assert_eq!(name, &AUTHORIZATION);
        assert_eq!(value.to_str().unwrap(), "Bearer t-123");
        assert!(value.is_sensitive());
    }

    #[test]
    fn invalid_header_value() {
        let token = Token {
            token: "bad\ntoken".to_string(),
            token_type: "Bearer".to_string(),
            expires_at: None,
        };
        let err = build_bearer_headers(&token).unwrap_err();
        assert!(!err.is_retryable(), "{err}");
    }
}
