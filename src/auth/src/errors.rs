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

use http::StatusCode;
use std::error::Error;

pub use lark_oapi::error::CredentialsError;

/// A helper to create a retryable error.
pub(crate) fn retryable<T: Error + Send + Sync + 'static>(source: T) -> CredentialsError {
    CredentialsError::new(true, source)
}

/// A helper to create a non-retryable error.
pub(crate) fn non_retryable<T: Error + Send + Sync + 'static>(source: T) -> CredentialsError {
    CredentialsError::new(false, source)
}

pub(crate) fn non_retryable_from_str<T: Into<String>>(message: T) -> CredentialsError {
    CredentialsError::from_str(false, message)
}

// Internal server errors do not indicate that there is anything wrong with
// our request, so we retry them.
pub(crate) fn is_retryable(c: StatusCode) -> bool {
    matches!(
        c,
        StatusCode::INTERNAL_SERVER_ERROR
            | StatusCode::SERVICE_UNAVAILABLE
            | StatusCode::REQUEST_TIMEOUT
            | StatusCode::TOO_MANY_REQUESTS
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(StatusCode::INTERNAL_SERVER_ERROR)]
    #[test_case(StatusCode::SERVICE_UNAVAILABLE)]
    #[test_case(StatusCode::REQUEST_TIMEOUT)]
    #[test_case(StatusCode::TOO_MANY_REQUESTS)]
    fn retryable_status(c: StatusCode) {
        assert!(is_retryable(c));
    }

    #[test_case(StatusCode::NOT_FOUND)]
    #[test_case(StatusCode::UNAUTHORIZED)]
    #[test_case(StatusCode::BAD_REQUEST)]
    #[test_case(StatusCode::BAD_GATEWAY)]
    #[test_case(StatusCode::PRECONDITION_FAILED)]
    fn non_retryable_status(c: StatusCode) {
        assert!(!is_retryable(c));
    }

    #[test]
    fn helpers() {
        let e = retryable(std::io::Error::other("try again"));
        assert!(e.is_retryable(), "{e}");
        let e = non_retryable(std::io::Error::other("give up"));
        assert!(!e.is_retryable(), "{e}");
        let e = non_retryable_from_str("give up");
        assert!(!e.is_retryable(), "{e}");
        assert!(format!("{e}").contains("give up"), "{e}");
    }
}
