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

use auth::credentials::Credentials;
use http::header::{AUTHORIZATION, HeaderName, HeaderValue};
use oapi::Result;
use oapi::error::CredentialsError;
use oapi::error::Error;
use oapi::error::status::{self, Status};
use oapi::options::RequestOptions;
use oapi::request::{AccessTokenKind, AccessTokenTypes, ApiRequest, FilePayload, Payload};
use oapi::response::{Parts, Response};

const REQUEST_ID_HEADER: &str = "x-request-id";
const TENANT_TOKEN_HEADER: &str = "x-tenant-access-token";
const APP_TOKEN_HEADER: &str = "x-app-access-token";

/// The transport shared by every generated client.
///
/// One instance per client: it owns the HTTP connection pool and the cached
/// tenant/app credentials, both shared by all concurrent calls. Each call
/// resolves the credential kinds its descriptor flags, expands the URL
/// template, encodes the payload, executes the request, and unwraps the
/// platform's `{code, msg, data}` envelope.
#[derive(Clone, Debug)]
pub struct ReqwestClient {
    inner: reqwest::Client,
    tenant_cred: Credentials,
    app_cred: Credentials,
    endpoint: String,
    tracing: bool,
}

impl ReqwestClient {
    pub async fn new(config: crate::options::ClientConfig, default_endpoint: &str) -> Result<Self> {
        let tracing = crate::options::tracing_enabled(&config);
        let endpoint = config
            .endpoint
            .unwrap_or_else(|| default_endpoint.to_string());
        let app_id = config.app_id.unwrap_or_default();
        let app_secret = config.app_secret.unwrap_or_default();
        let tenant_cred = match config.tenant_credentials {
            Some(c) => c,
            None => auth::credentials::tenant::Builder::new(app_id.clone(), app_secret.clone())
                .with_endpoint(endpoint.clone())
                .build()
                .map_err(Error::authentication)?,
        };
        let app_cred = match config.app_credentials {
            Some(c) => c,
            None => auth::credentials::app::Builder::new(app_id, app_secret)
                .with_endpoint(endpoint.clone())
                .build()
                .map_err(Error::authentication)?,
        };
        let inner = reqwest::Client::new();
        Ok(Self {
            inner,
            tenant_cred,
            app_cred,
            endpoint,
            tracing,
        })
    }

    pub fn builder(&self, method: reqwest::Method, path: String) -> reqwest::RequestBuilder {
        self.inner
            .request(method, format!("{}{path}", &self.endpoint))
    }

    /// Executes an envelope call: the response body must be the platform's
    /// `{code, msg, data}` wrapper, and `data` deserializes into `O`.
    pub async fn execute<O: serde::de::DeserializeOwned + Default>(
        &self,
        req: ApiRequest,
        options: RequestOptions,
    ) -> Result<Response<O>> {
        let response = self.request_attempt(&req, &options).await?;
        let result = if response.status().is_success() {
            self::to_envelope_response(response).await
        } else {
            self::to_http_error(response).await
        };
        if let Err(e) = &result {
            self.maybe_invalidate(&req, e).await;
        }
        result
    }

    /// Executes a file-download call: the response body is an opaque byte
    /// stream, not wrapped in the envelope, and no `code` check is made.
    ///
    /// Error responses still arrive as envelopes and are normalized the same
    /// way as for [execute][Self::execute].
    pub async fn download(
        &self,
        req: ApiRequest,
        options: RequestOptions,
    ) -> Result<Response<bytes::Bytes>> {
        let response = self.request_attempt(&req, &options).await?;
        let result = if response.status().is_success() {
            self::to_bytes_response(response).await
        } else {
            self::to_http_error(response).await
        };
        if let Err(e) = &result {
            self.maybe_invalidate(&req, e).await;
        }
        result
    }

    async fn request_attempt(
        &self,
        req: &ApiRequest,
        options: &RequestOptions,
    ) -> Result<reqwest::Response> {
        let auth_headers = self.auth_headers(req.token_types(), options).await?;
        let path = crate::path_template::expand(req.path_template(), req.path())?;
        let mut builder = self.builder(req.method().clone(), path);
        for (name, value) in req.query() {
            builder = crate::query_parameter::QueryParameter::add(value.clone(), builder, name);
        }
        builder = match req.payload() {
            Payload::Empty => builder,
            Payload::Json(v) => builder.json(v),
            Payload::Multipart(f) => builder.multipart(self::to_form(f)),
        };
        if let Some(timeout) = options.attempt_timeout() {
            builder = builder.timeout(*timeout);
        }
        if let Some(user_agent) = options.user_agent() {
            builder = builder.header(
                reqwest::header::USER_AGENT,
                HeaderValue::from_str(user_agent).map_err(Error::ser)?,
            );
        }
        for (key, value) in auth_headers {
            builder = builder.header(key, value);
        }
        if self.tracing {
            tracing::debug!(
                method = %req.method(),
                template = req.path_template(),
                "sending request"
            );
        }
        builder.send().await.map_err(Self::map_send_error)
    }

    // Resolves every credential kind flagged on the descriptor. The most
    // specific token authenticates the call; a co-required tenant or app
    // token travels in its own header.
    async fn auth_headers(
        &self,
        types: AccessTokenTypes,
        options: &RequestOptions,
    ) -> Result<Vec<(HeaderName, HeaderValue)>> {
        let user = if types.user() {
            let token = options.user_access_token().as_ref().ok_or_else(|| {
                Error::authentication(CredentialsError::from_str(
                    false,
                    "this call requires a user access token and none was provided",
                ))
            })?;
            if token.is_expired() {
                return Err(Error::authentication(CredentialsError::from_str(
                    false,
                    "the provided user access token has expired and cannot be refreshed by this layer",
                )));
            }
            Some(self::bearer_value(token.token())?)
        } else {
            None
        };
        let tenant = if types.tenant() {
            let token = self
                .tenant_cred
                .token()
                .await
                .map_err(Error::authentication)?;
            Some(self::bearer_value(&token.token)?)
        } else {
            None
        };
        let app = if types.app() {
            let token = self.app_cred.token().await.map_err(Error::authentication)?;
            Some(self::bearer_value(&token.token)?)
        } else {
            None
        };

        let mut headers = Vec::new();
        match (user, tenant, app) {
            (Some(u), tenant, app) => {
                headers.push((AUTHORIZATION, u));
                if let Some(t) = tenant {
                    headers.push((HeaderName::from_static(TENANT_TOKEN_HEADER), t));
                }
                if let Some(a) = app {
                    headers.push((HeaderName::from_static(APP_TOKEN_HEADER), a));
                }
            }
            (None, Some(t), app) => {
                headers.push((AUTHORIZATION, t));
                if let Some(a) = app {
                    headers.push((HeaderName::from_static(APP_TOKEN_HEADER), a));
                }
            }
            (None, None, Some(a)) => {
                headers.push((AUTHORIZATION, a));
            }
            (None, None, None) => {}
        }
        Ok(headers)
    }

    // The platform invalidates cached tokens server-side, e.g. when the
    // tenant revokes the application's authorization. Discard the matching
    // cache entry so the next call refreshes instead of failing again.
    async fn maybe_invalidate(&self, req: &ApiRequest, err: &Error) {
        let Some(status) = err.status() else {
            return;
        };
        let types = req.token_types();
        match status.code {
            status::code::TENANT_ACCESS_TOKEN_INVALID if types.contains(AccessTokenKind::Tenant) => {
                if self.tracing {
                    tracing::debug!(code = status.code, "invalidating cached tenant token");
                }
                self.tenant_cred.invalidate().await;
            }
            status::code::APP_ACCESS_TOKEN_INVALID if types.contains(AccessTokenKind::App) => {
                if self.tracing {
                    tracing::debug!(code = status.code, "invalidating cached app token");
                }
                self.app_cred.invalidate().await;
            }
            _ => {}
        }
    }

    fn map_send_error(err: reqwest::Error) -> Error {
        match err {
            e if e.is_timeout() => Error::timeout(e),
            e => Error::io(e),
        }
    }
}

fn bearer_value(token: &str) -> Result<HeaderValue> {
    let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
        .map_err(|e| Error::authentication(CredentialsError::new(false, e)))?;
    value.set_sensitive(true);
    Ok(value)
}

fn to_form(payload: &FilePayload) -> reqwest::multipart::Form {
    let mut form = reqwest::multipart::Form::new();
    for (name, value) in payload.fields() {
        form = form.text(name.clone(), value.clone());
    }
    let part = reqwest::multipart::Part::bytes(payload.content().to_vec())
        .file_name(payload.file_name().to_string());
    form.part("file", part)
}

// The platform envelope. `data` stays a raw value here so each caller can
// pick its own response type.
#[derive(Debug, serde::Deserialize)]
struct Envelope {
    code: i64,
    #[serde(default)]
    msg: String,
    data: Option<serde_json::Value>,
}

fn request_id(headers: &http::HeaderMap) -> Option<String> {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

fn response_parts(response: &reqwest::Response) -> Parts {
    let headers = response.headers().clone();
    Parts::new()
        .set_status_code(response.status().as_u16())
        .set_request_id(self::request_id(&headers))
        .set_content_length(response.content_length())
        .set_headers(headers)
}

// Normalizes a non-2xx response. When the body still parses as the platform
// envelope the application-level `{code, msg}` is preserved; otherwise the
// raw payload is reported as a transport error.
async fn to_http_error<O>(response: reqwest::Response) -> Result<O> {
    let status_code = response.status().as_u16();
    let headers = response.headers().clone();
    let request_id = self::request_id(&headers);
    let body = response.bytes().await.map_err(Error::io)?;

    let error = match serde_json::from_slice::<Envelope>(&body) {
        Ok(envelope) if envelope.code != status::code::OK => Error::service_with_http_metadata(
            Status::default().set_code(envelope.code).set_msg(envelope.msg),
            Some(status_code),
            Some(headers),
            request_id,
        ),
        _ => Error::http(status_code, headers, body),
    };
    Err(error)
}

// Normalizes a 2xx envelope response. A non-zero `code` is a service error
// even though the HTTP exchange succeeded.
async fn to_envelope_response<O: serde::de::DeserializeOwned + Default>(
    response: reqwest::Response,
) -> Result<Response<O>> {
    let parts = self::response_parts(&response);
    let body = response.bytes().await.map_err(Error::io)?;
    let envelope = serde_json::from_slice::<Envelope>(&body).map_err(Error::deser)?;
    if envelope.code != status::code::OK {
        return Err(Error::service_with_http_metadata(
            Status::default().set_code(envelope.code).set_msg(envelope.msg),
            Some(parts.status_code),
            Some(parts.headers.clone()),
            parts.request_id.clone(),
        ));
    }
    let body = match envelope.data {
        None | Some(serde_json::Value::Null) => O::default(),
        Some(value) => serde_json::from_value::<O>(value).map_err(Error::deser)?,
    };
    Ok(Response::from_parts(parts, body))
}

async fn to_bytes_response(response: reqwest::Response) -> Result<Response<bytes::Bytes>> {
    let parts = self::response_parts(&response);
    let body = response.bytes().await.map_err(Error::io)?;
    Ok(Response::from_parts(parts, body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;
    type TestResult = std::result::Result<(), Box<dyn std::error::Error>>;

    fn resp_from_code_content(code: u16, content: &str) -> http::Result<reqwest::Response> {
        let http_resp = http::Response::builder()
            .header("Content-Type", "application/json")
            .header("x-request-id", "rid-test")
            .status(code)
            .body(content.to_string())?;

        let response: reqwest::Response = http_resp.into();
        Ok(response)
    }

    #[derive(Clone, Debug, Default, PartialEq, serde::Deserialize)]
    struct FakeData {
        name: String,
    }

    #[tokio::test]
    async fn envelope_success() -> TestResult {
        let body = r#"{"code":0,"msg":"success","data":{"name":"calendar-1"}}"#;
        let response = resp_from_code_content(200, body)?;
        let response = super::to_envelope_response::<FakeData>(response).await?;
        assert_eq!(response.body(), &FakeData { name: "calendar-1".into() });
        assert_eq!(response.parts().status_code, 200);
        assert_eq!(response.parts().request_id.as_deref(), Some("rid-test"));
        Ok(())
    }

    #[test_case(r#"{"code":0,"msg":"success"}"#; "data absent")]
    #[test_case(r#"{"code":0,"msg":"success","data":null}"#; "data null")]
    #[tokio::test]
    async fn envelope_success_without_data(body: &str) -> TestResult {
        let response = resp_from_code_content(200, body)?;
        let response = super::to_envelope_response::<FakeData>(response).await?;
        assert_eq!(response.body(), &FakeData::default());
        Ok(())
    }

    #[tokio::test]
    async fn envelope_app_error_under_http_200() -> TestResult {
        let body = r#"{"code":1061002,"msg":"forbidden","data":{}}"#;
        let response = resp_from_code_content(200, body)?;
        let err = super::to_envelope_response::<FakeData>(response)
            .await
            .unwrap_err();
        let status = err.status().expect("expected a service error");
        assert_eq!(status.code, 1061002);
        assert_eq!(status.msg, "forbidden");
        // Transport metadata is preserved alongside the service error.
        assert_eq!(err.http_status_code(), Some(200));
        assert_eq!(err.request_id(), Some("rid-test"));
        Ok(())
    }

    #[tokio::test]
    async fn envelope_unparsable_body() -> TestResult {
        let response = resp_from_code_content(200, "not json at all")?;
        let err = super::to_envelope_response::<FakeData>(response)
            .await
            .unwrap_err();
        assert!(err.is_deserialization(), "{err:?}");
        Ok(())
    }

    #[tokio::test]
    async fn http_error_with_envelope() -> TestResult {
        let body = r#"{"code":99991663,"msg":"tenant access token invalid"}"#;
        let response = resp_from_code_content(400, body)?;
        let err = super::to_http_error::<()>(response).await.unwrap_err();
        let status = err.status().expect("expected a service error");
        assert_eq!(status.code, 99991663);
        assert!(status.is_token_invalid());
        assert_eq!(err.http_status_code(), Some(400));
        Ok(())
    }

    #[tokio::test]
    async fn http_error_without_envelope() -> TestResult {
        let response = resp_from_code_content(502, "<html>bad gateway</html>")?;
        let err = super::to_http_error::<()>(response).await.unwrap_err();
        assert!(err.is_transport(), "{err:?}");
        assert_eq!(err.status(), None);
        assert_eq!(err.http_status_code(), Some(502));
        assert_eq!(
            err.http_payload(),
            Some(bytes::Bytes::from_static(b"<html>bad gateway</html>")).as_ref()
        );
        Ok(())
    }

    #[tokio::test]
    async fn bytes_response_skips_envelope() -> TestResult {
        // The payload is deliberately not JSON: downloads are opaque bytes.
        let response = resp_from_code_content(200, "raw-file-bytes-not-json")?;
        let response = super::to_bytes_response(response).await?;
        assert_eq!(response.body().as_ref(), b"raw-file-bytes-not-json");
        assert_eq!(response.parts().request_id.as_deref(), Some("rid-test"));
        Ok(())
    }

    // Normalization is a pure function of the response bytes: repeating it
    // on an identical exchange yields an identical result.
    #[tokio::test]
    async fn normalization_is_pure() -> TestResult {
        let body = r#"{"code":0,"msg":"success","data":{"name":"calendar-1"}}"#;
        let first = super::to_envelope_response::<FakeData>(resp_from_code_content(200, body)?)
            .await?;
        let second = super::to_envelope_response::<FakeData>(resp_from_code_content(200, body)?)
            .await?;
        assert_eq!(first.body(), second.body());
        assert_eq!(first.parts().status_code, second.parts().status_code);
        assert_eq!(first.parts().request_id, second.parts().request_id);
        Ok(())
    }

    #[test]
    fn form_layout() {
        let payload = FilePayload::new("report.pdf", bytes::Bytes::from_static(b"%PDF"))
            .set_field("parent_type", "explorer");
        let form = super::to_form(&payload);
        // The boundary is generated per form; its presence is all we can
        // check without sending the request.
        assert!(!form.boundary().is_empty());
    }

    #[test]
    fn bearer() {
        let value = super::bearer_value("t-123").unwrap();
        assert_eq!(value.to_str().unwrap(), "Bearer t-123");
        assert!(value.is_sensitive());

        let err = super::bearer_value("bad\ntoken").unwrap_err();
        assert!(err.is_authentication(), "{err:?}");
    }
}
