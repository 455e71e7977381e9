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

use super::CredentialsError;
use super::status::Status;
use http::HeaderMap;
use std::error::Error as StdError;

type BoxError = Box<dyn StdError + Send + Sync>;

/// The core error returned by all client libraries.
///
/// The client libraries report errors from multiple sources. The platform's
/// application layer may reject a request, the transport may be unable to
/// create the connection, the request may time out, or the library may be
/// unable to build the request due to missing application inputs.
///
/// Most applications just return or log the error. Applications that need to
/// react to specific failures can use the predicates to determine the error
/// kind, and the accessors to query the most common details. Three kinds
/// matter for recovery decisions:
///
/// - [authentication][Error::is_authentication] failures: the credential for
///   the call could not be created or refreshed; no request was sent.
/// - [transport][Error::is_transport] failures: the call never produced a
///   well-formed platform response; idempotent calls are safe to resend.
/// - service failures ([status][Error::status] is set): the platform
///   understood the call and rejected it; resending will not help.
///
/// # Example
/// ```
/// use lark_oapi::error::Error;
/// match example_function() {
///     Err(e) if matches!(e.status(), Some(_)) => {
///         println!("platform error {e}, debug using {:?}", e.status().unwrap());
///     },
///     Err(e) if e.is_timeout() => { println!("not enough time {e}"); },
///     Err(e) => { println!("some other error {e}"); },
///     Ok(_) => { println!("success"); },
/// }
///
/// fn example_function() -> Result<String, Error> {
///     // ... details omitted ...
///     # use lark_oapi::error::status::Status;
///     # Err(Error::service(Status::default().set_code(1061002).set_msg("forbidden")))
/// }
/// ```
#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    source: Option<BoxError>,
}

impl Error {
    /// Creates an error with the status reported by the platform's
    /// application layer.
    ///
    /// # Example
    /// ```
    /// use lark_oapi::error::Error;
    /// use lark_oapi::error::status::Status;
    /// let status = Status::default().set_code(1061002).set_msg("forbidden");
    /// let error = Error::service(status.clone());
    /// assert_eq!(error.status(), Some(&status));
    /// ```
    pub fn service(status: Status) -> Self {
        let details = ServiceDetails {
            status,
            status_code: None,
            headers: None,
            request_id: None,
        };
        Self {
            kind: ErrorKind::Service(Box::new(details)),
            source: None,
        }
    }

    /// Not part of the public API, subject to change without notice.
    ///
    /// Creates service errors including transport metadata.
    #[doc(hidden)]
    pub fn service_with_http_metadata(
        status: Status,
        status_code: Option<u16>,
        headers: Option<http::HeaderMap>,
        request_id: Option<String>,
    ) -> Self {
        let details = ServiceDetails {
            status,
            status_code,
            headers,
            request_id,
        };
        Self {
            kind: ErrorKind::Service(Box::new(details)),
            source: None,
        }
    }

    /// Creates an error representing a timeout.
    ///
    /// # Example
    /// ```
    /// use std::error::Error as _;
    /// use lark_oapi::error::Error;
    /// let error = Error::timeout("simulated timeout");
    /// assert!(error.is_timeout());
    /// assert!(error.source().is_some());
    /// ```
    pub fn timeout<T: Into<BoxError>>(source: T) -> Self {
        Self {
            kind: ErrorKind::Timeout,
            source: Some(source.into()),
        }
    }

    /// The request could not be completed before its deadline.
    ///
    /// This is always a client-side generated error. Note that the request
    /// may or may not have started, and it may or may not complete in the
    /// service.
    pub fn is_timeout(&self) -> bool {
        matches!(self.kind, ErrorKind::Timeout)
    }

    /// Not part of the public API, subject to change without notice.
    ///
    /// Creates an error representing a deserialization problem.
    #[doc(hidden)]
    pub fn deser<T: Into<BoxError>>(source: T) -> Self {
        Self {
            kind: ErrorKind::Deserialization,
            source: Some(source.into()),
        }
    }

    /// The response could not be deserialized.
    ///
    /// The platform returned a payload this library could not convert to the
    /// expected response type. The most common causes are bugs in the client
    /// library and (rarely) bugs in the service.
    pub fn is_deserialization(&self) -> bool {
        matches!(self.kind, ErrorKind::Deserialization)
    }

    /// Not part of the public API, subject to change without notice.
    ///
    /// Creates an error representing a serialization problem.
    #[doc(hidden)]
    pub fn ser<T: Into<BoxError>>(source: T) -> Self {
        Self {
            kind: ErrorKind::Serialization,
            source: Some(source.into()),
        }
    }

    /// The request could not be serialized.
    ///
    /// This is always a client-side generated error, produced before the
    /// request is sent. It is never transient: the same inputs will fail on
    /// future attempts too.
    pub fn is_serialization(&self) -> bool {
        matches!(self.kind, ErrorKind::Serialization)
    }

    /// Not part of the public API, subject to change without notice.
    ///
    /// The request is missing required path parameters, or the parameters do
    /// not have a valid format.
    #[doc(hidden)]
    pub fn binding<T: Into<BoxError>>(source: T) -> Self {
        Self {
            kind: ErrorKind::Binding,
            source: Some(source.into()),
        }
    }

    /// If true, the request was missing required path parameters.
    ///
    /// Typically this indicates a problem in the application: a required
    /// field in the request was not initialized. The request was failed
    /// locally, before any network I/O.
    pub fn is_binding(&self) -> bool {
        matches!(&self.kind, ErrorKind::Binding)
    }

    /// Not part of the public API, subject to change without notice.
    ///
    /// Cannot create the credentials needed by the request.
    #[doc(hidden)]
    pub fn authentication(source: CredentialsError) -> Self {
        Self {
            kind: ErrorKind::Authentication,
            source: Some(source.into()),
        }
    }

    /// Could not acquire an access token before sending the request.
    ///
    /// The token issuing endpoint was unreachable, rejected the application's
    /// id/secret, or the call required a user access token that was missing
    /// or expired. No HTTP request was made. The
    /// [source][std::error::Error::source] is a [CredentialsError] recording
    /// whether the failure is transient.
    pub fn is_authentication(&self) -> bool {
        matches!(self.kind, ErrorKind::Authentication)
    }

    /// Not part of the public API, subject to change without notice.
    ///
    /// A problem reported by the transport layer.
    #[doc(hidden)]
    pub fn http(status_code: u16, headers: HeaderMap, payload: bytes::Bytes) -> Self {
        let details = TransportDetails {
            status_code: Some(status_code),
            headers: Some(headers),
            payload: Some(payload),
        };
        Self {
            kind: ErrorKind::Transport(Box::new(details)),
            source: None,
        }
    }

    /// Not part of the public API, subject to change without notice.
    ///
    /// A problem in the transport layer without a full HTTP response.
    ///
    /// Examples include a broken connection after the request is sent, or
    /// any HTTP error that did not include a status code or headers.
    #[doc(hidden)]
    pub fn io<T: Into<BoxError>>(source: T) -> Self {
        let details = TransportDetails {
            status_code: None,
            headers: None,
            payload: None,
        };
        Self {
            kind: ErrorKind::Transport(Box::new(details)),
            source: Some(source.into()),
        }
    }

    /// A problem in the transport layer without a full HTTP response.
    ///
    /// Examples include read or write problems and broken connections. The
    /// request may or may not have reached the service.
    pub fn is_io(&self) -> bool {
        matches!(
        &self.kind,
        ErrorKind::Transport(d) if matches!(**d, TransportDetails {
            status_code: None,
            headers: None,
            payload: None,
            ..
        }))
    }

    /// A problem in the transport layer.
    ///
    /// This covers connection failures, and responses where the call never
    /// reached the platform's application layer, such as errors generated by
    /// a proxy or load balancer, or responses whose body does not parse as
    /// the platform's envelope. Contrast with [status][Error::status], which
    /// is only set when the application layer itself rejected the call.
    pub fn is_transport(&self) -> bool {
        matches!(&self.kind, ErrorKind::Transport { .. })
    }

    /// The application-level [Status] associated with this error.
    ///
    /// Set when the platform understood the call and rejected it with a
    /// non-zero `code`, even when the HTTP status was `200`. The code and
    /// message are the vendor's, carried verbatim.
    ///
    /// # Example
    /// ```
    /// use lark_oapi::error::Error;
    /// use lark_oapi::error::status::Status;
    /// let error = Error::service(Status::default().set_code(1061002).set_msg("forbidden"));
    /// if let Some(status) = error.status() {
    ///     if status.code == 1061002 {
    ///         println!("no permission for this resource: {}", status.msg);
    ///     }
    /// }
    /// ```
    pub fn status(&self) -> Option<&Status> {
        match &self.kind {
            ErrorKind::Service(d) => Some(&d.as_ref().status),
            _ => None,
        }
    }

    /// The HTTP status code, if any, associated with this error.
    ///
    /// Note that a service error may carry a `200` here: the platform wraps
    /// application-level rejections in successful HTTP responses.
    pub fn http_status_code(&self) -> Option<u16> {
        match &self.kind {
            ErrorKind::Transport(d) => d.as_ref().status_code,
            ErrorKind::Service(d) => d.as_ref().status_code,
            _ => None,
        }
    }

    /// The headers, if any, associated with this error.
    pub fn http_headers(&self) -> Option<&http::HeaderMap> {
        match &self.kind {
            ErrorKind::Transport(d) => d.as_ref().headers.as_ref(),
            ErrorKind::Service(d) => d.as_ref().headers.as_ref(),
            _ => None,
        }
    }

    /// The payload, if any, associated with this error.
    ///
    /// Only transport errors carry a raw payload: the body did not parse as
    /// the platform envelope, so it is preserved for troubleshooting.
    pub fn http_payload(&self) -> Option<&bytes::Bytes> {
        match &self.kind {
            ErrorKind::Transport(d) => d.payload.as_ref(),
            _ => None,
        }
    }

    /// The request id, if any, associated with this error.
    ///
    /// The platform attaches an `x-request-id` header to its responses. It
    /// is captured here for service errors so applications can reference a
    /// specific failed call in support escalations.
    pub fn request_id(&self) -> Option<&str> {
        match &self.kind {
            ErrorKind::Service(d) => d.request_id.as_deref(),
            _ => None,
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.kind, &self.source) {
            (ErrorKind::Binding, Some(e)) => {
                write!(f, "cannot bind the request to a valid path {e}")
            }
            (ErrorKind::Serialization, Some(e)) => write!(f, "cannot serialize the request {e}"),
            (ErrorKind::Deserialization, Some(e)) => {
                write!(f, "cannot deserialize the response {e}")
            }
            (ErrorKind::Authentication, Some(e)) => {
                write!(f, "cannot create the authentication headers {e}")
            }
            (ErrorKind::Timeout, Some(e)) => {
                write!(f, "the request exceeded the request deadline {e}")
            }
            (ErrorKind::Transport(details), _) => details.display(self.source(), f),
            (ErrorKind::Service(d), _) => {
                write!(
                    f,
                    "the platform reports an error with code {} described as: {}",
                    d.status.code, d.status.msg
                )
            }
            (_, None) => unreachable!("no constructor allows this"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error))
    }
}

/// The type of error held by an [Error] instance.
#[derive(Debug)]
enum ErrorKind {
    Binding,
    Serialization,
    Deserialization,
    Authentication,
    Timeout,
    Transport(Box<TransportDetails>),
    Service(Box<ServiceDetails>),
}

#[derive(Debug)]
struct TransportDetails {
    status_code: Option<u16>,
    headers: Option<HeaderMap>,
    payload: Option<bytes::Bytes>,
}

impl TransportDetails {
    fn display(
        &self,
        source: Option<&(dyn StdError + 'static)>,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        match (source, &self) {
            (
                _,
                TransportDetails {
                    status_code: Some(code),
                    payload: Some(p),
                    ..
                },
            ) => {
                if let Ok(message) = std::str::from_utf8(p.as_ref()) {
                    write!(f, "the HTTP transport reports a [{code}] error: {message}")
                } else {
                    write!(f, "the HTTP transport reports a [{code}] error")
                }
            }
            (Some(e), _) => write!(f, "the transport reports an error: {e}"),
            (None, _) => write!(f, "the transport reports an unspecified error"),
        }
    }
}

#[derive(Debug)]
struct ServiceDetails {
    status: Status,
    status_code: Option<u16>,
    headers: Option<HeaderMap>,
    request_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;

    #[test]
    fn service() {
        let status = Status::default().set_code(1061002).set_msg("forbidden");
        let error = Error::service(status.clone());
        assert_eq!(error.status(), Some(&status));
        assert_eq!(error.http_status_code(), None);
        assert_eq!(error.http_headers(), None);
        assert_eq!(error.http_payload(), None);
        assert_eq!(error.request_id(), None);
        let got = format!("{error}");
        assert!(got.contains("1061002"), "{got}");
        assert!(got.contains("forbidden"), "{got}");
    }

    #[test]
    fn service_with_http_metadata() {
        let status = Status::default().set_code(99991663).set_msg("token invalid");
        let mut headers = HeaderMap::new();
        headers.insert("content-type", HeaderValue::from_static("application/json"));
        let error = Error::service_with_http_metadata(
            status.clone(),
            Some(200),
            Some(headers.clone()),
            Some("req-123".to_string()),
        );
        assert_eq!(error.status(), Some(&status));
        assert_eq!(error.http_status_code(), Some(200));
        assert_eq!(error.http_headers(), Some(&headers));
        assert_eq!(error.request_id(), Some("req-123"));
    }

    #[test]
    fn transport_http() {
        let mut headers = HeaderMap::new();
        headers.insert("content-type", HeaderValue::from_static("text/html"));
        let error = Error::http(502, headers.clone(), bytes::Bytes::from_static(b"bad gateway"));
        assert!(error.is_transport(), "{error:?}");
        assert!(!error.is_io(), "{error:?}");
        assert_eq!(error.status(), None);
        assert_eq!(error.http_status_code(), Some(502));
        assert_eq!(error.http_headers(), Some(&headers));
        assert_eq!(
            error.http_payload(),
            Some(bytes::Bytes::from_static(b"bad gateway")).as_ref()
        );
        let got = format!("{error}");
        assert!(got.contains("[502]"), "{got}");
        assert!(got.contains("bad gateway"), "{got}");
    }

    #[test]
    fn transport_io() {
        let error = Error::io("simulated connection reset");
        assert!(error.is_transport(), "{error:?}");
        assert!(error.is_io(), "{error:?}");
        assert_eq!(error.http_status_code(), None);
        assert_eq!(error.http_payload(), None);
        let got = format!("{error}");
        assert!(got.contains("connection reset"), "{got}");
    }

    #[test]
    fn authentication() {
        let error = Error::authentication(CredentialsError::from_str(false, "bad app secret"));
        assert!(error.is_authentication(), "{error:?}");
        use std::error::Error as _;
        let source = error.source().and_then(|e| e.downcast_ref::<CredentialsError>());
        assert!(source.is_some(), "{error:?}");
        let got = format!("{error}");
        assert!(got.contains("bad app secret"), "{got}");
    }

    #[test]
    fn predicates() {
        assert!(Error::timeout("t").is_timeout());
        assert!(Error::ser("s").is_serialization());
        assert!(Error::deser("d").is_deserialization());
        assert!(Error::binding("b").is_binding());
        assert!(!Error::binding("b").is_transport());
        assert!(!Error::timeout("t").is_binding());
    }
}
