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

//! Response types.
//!
//! This module contains types related to Lark Open Platform responses.
//! Notably it contains the [Response] type itself, pairing the decoded body
//! with the transport metadata ([Parts]) of the HTTP exchange that produced
//! it. The metadata is captured on every exchange, success or failure, so
//! applications can always inspect transport-level diagnostics such as the
//! request id.

/// Represents a response from the Lark Open Platform.
///
/// A response consists of a body (the `data` field of the platform's
/// envelope, or the raw bytes for downloads), and the transport metadata of
/// the HTTP exchange.
///
/// Typically you get a response as the result of making a request via some
/// client in the client libraries. You may also create responses directly
/// when mocking clients for your own tests.
///
/// # Example
/// ```
/// # use lark_oapi::response::Response;
/// #[derive(Clone, Default)]
/// pub struct Chat {
///   // ...
/// }
///
/// let response = Response::from(Chat::default());
/// assert!(response.parts().request_id.is_none());
/// ```
#[derive(Clone, Debug)]
pub struct Response<T> {
    parts: Parts,
    body: T,
}

impl<T> Response<T> {
    /// Creates a response from the body, with default metadata.
    ///
    /// # Example
    /// ```
    /// # use lark_oapi::response::Response;
    /// let response = Response::from("test".to_string());
    /// assert_eq!(response.body().as_str(), "test");
    /// ```
    pub fn from(body: T) -> Self {
        Self {
            body,
            parts: Parts::default(),
        }
    }

    /// Creates a response from the given parts.
    ///
    /// # Example
    /// ```
    /// # use lark_oapi::response::{Parts, Response};
    /// let parts = Parts::new().set_request_id(Some("req-123".to_string()));
    /// let response = Response::from_parts(parts, "test".to_string());
    /// assert_eq!(response.parts().request_id.as_deref(), Some("req-123"));
    /// ```
    pub fn from_parts(parts: Parts, body: T) -> Self {
        Self { parts, body }
    }

    /// Returns the transport metadata associated with this response.
    pub fn parts(&self) -> &Parts {
        &self.parts
    }

    /// Returns the headers associated with this response.
    ///
    /// # Example
    /// ```
    /// # use lark_oapi::response::Response;
    /// let response = Response::from(());
    /// assert!(response.headers().is_empty());
    /// ```
    pub fn headers(&self) -> &http::HeaderMap<http::HeaderValue> {
        &self.parts.headers
    }

    /// Returns the body associated with this response.
    pub fn body(&self) -> &T {
        &self.body
    }

    /// Consumes the response returning the metadata, and body.
    ///
    /// # Example
    /// ```
    /// # use lark_oapi::response::Response;
    /// let response = Response::from("test".to_string());
    /// let (parts, body) = response.into_parts();
    /// assert_eq!(body.as_str(), "test");
    /// assert_eq!(parts.status_code, 200);
    /// ```
    pub fn into_parts(self) -> (Parts, T) {
        (self.parts, self.body)
    }

    /// Consumes the response returning only its body.
    pub fn into_body(self) -> T {
        self.body
    }
}

/// Transport metadata of a response.
///
/// The metadata consists of the HTTP status code, the response headers, the
/// platform-assigned request id, and the content length when the platform
/// reported one. It is captured regardless of application-level success or
/// failure.
///
/// # Example
/// ```
/// # use lark_oapi::response::Parts;
/// let mut headers = http::HeaderMap::new();
/// headers.insert(http::header::CONTENT_TYPE, http::HeaderValue::from_static("application/json"));
/// let parts = Parts::new().set_status_code(200).set_headers(headers);
/// assert_eq!(parts.status_code, 200);
/// ```
#[derive(Clone, Debug)]
#[non_exhaustive]
pub struct Parts {
    /// The HTTP status code of the exchange.
    pub status_code: u16,
    /// The HTTP response headers.
    pub headers: http::HeaderMap<http::HeaderValue>,
    /// The platform-assigned request id, from the `x-request-id` header.
    pub request_id: Option<String>,
    /// The content length reported by the transport, if any.
    pub content_length: Option<u64>,
}

impl Default for Parts {
    fn default() -> Self {
        Self {
            status_code: 200,
            headers: http::HeaderMap::new(),
            request_id: None,
            content_length: None,
        }
    }
}

impl Parts {
    /// Create a new instance with default values.
    pub fn new() -> Self {
        Parts::default()
    }

    /// Sets the HTTP status code.
    pub fn set_status_code(mut self, v: u16) -> Self {
        self.status_code = v;
        self
    }

    /// Sets the headers.
    pub fn set_headers<V>(mut self, v: V) -> Self
    where
        V: Into<http::HeaderMap>,
    {
        self.headers = v.into();
        self
    }

    /// Sets the request id.
    pub fn set_request_id(mut self, v: Option<String>) -> Self {
        self.request_id = v;
        self
    }

    /// Sets the content length.
    pub fn set_content_length(mut self, v: Option<u64>) -> Self {
        self.content_length = v;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_from() {
        let response = Response::from("abc123".to_string());
        assert!(response.headers().is_empty());
        assert_eq!(response.body().as_str(), "abc123");
        assert_eq!(response.parts().status_code, 200);

        let body = response.into_body();
        assert_eq!(body.as_str(), "abc123");
    }

    #[test]
    fn response_from_parts() {
        let mut headers = http::HeaderMap::new();
        headers.insert(
            http::header::CONTENT_TYPE,
            http::HeaderValue::from_static("application/json"),
        );
        let parts = Parts::new()
            .set_status_code(200)
            .set_headers(headers.clone())
            .set_request_id(Some("req-abc".to_string()))
            .set_content_length(Some(42));

        let response = Response::from_parts(parts, "abc123".to_string());
        assert_eq!(response.body().as_str(), "abc123");
        assert_eq!(response.headers(), &headers);

        let (parts, body) = response.into_parts();
        assert_eq!(body.as_str(), "abc123");
        assert_eq!(parts.headers, headers);
        assert_eq!(parts.request_id.as_deref(), Some("req-abc"));
        assert_eq!(parts.content_length, Some(42));
    }

    #[test]
    fn parts_defaults() {
        let parts = Parts::new();
        assert_eq!(parts.status_code, 200);
        assert!(parts.headers.is_empty());
        assert!(parts.request_id.is_none());
        assert!(parts.content_length.is_none());
    }
}
