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

//! The request descriptor produced by generated endpoint methods.
//!
//! Each generated endpoint method is a mechanical mapping from the vendor's
//! API catalog to an [ApiRequest]: an HTTP method, a URL template with
//! `:param` placeholders, tagged path/query/payload records, and the
//! credential kinds the call requires. The descriptor is an immutable value
//! created per call and consumed once by the dispatch layer; which field
//! routes where is explicit in the record tags, never inferred.

/// The credential kinds issued by the platform.
///
/// The three kinds have different issuance rules and scopes: `tenant` and
/// `app` tokens are acquired from the platform's issuing endpoints with the
/// application's id/secret and cached by the dispatch layer; `user` tokens
/// are obtained by the application through an OAuth flow and supplied per
/// call, never cached or refreshed by this layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccessTokenKind {
    /// A tenant access token, representing the application acting within a
    /// specific tenant.
    Tenant,
    /// An app access token, representing the application itself.
    App,
    /// A user access token, representing an end user.
    User,
}

impl std::fmt::Display for AccessTokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccessTokenKind::Tenant => write!(f, "tenant"),
            AccessTokenKind::App => write!(f, "app"),
            AccessTokenKind::User => write!(f, "user"),
        }
    }
}

/// The credential kinds required by a call.
///
/// Generated endpoint methods declare one flag per kind. A call may require
/// more than one kind simultaneously; every flagged kind is resolved before
/// the HTTP request is sent, and a resolution failure for any of them fails
/// the call without network I/O.
///
/// # Example
/// ```
/// # use lark_oapi::request::AccessTokenTypes;
/// let types = AccessTokenTypes::new().set_tenant(true).set_user(true);
/// assert!(types.tenant() && types.user() && !types.app());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AccessTokenTypes {
    tenant: bool,
    app: bool,
    user: bool,
}

impl AccessTokenTypes {
    /// Creates an empty set; the call is unauthenticated.
    pub fn new() -> Self {
        Self::default()
    }

    /// Flags the tenant kind.
    pub fn set_tenant(mut self, v: bool) -> Self {
        self.tenant = v;
        self
    }

    /// Flags the app kind.
    pub fn set_app(mut self, v: bool) -> Self {
        self.app = v;
        self
    }

    /// Flags the user kind.
    pub fn set_user(mut self, v: bool) -> Self {
        self.user = v;
        self
    }

    /// Returns true if the tenant kind is required.
    pub fn tenant(&self) -> bool {
        self.tenant
    }

    /// Returns true if the app kind is required.
    pub fn app(&self) -> bool {
        self.app
    }

    /// Returns true if the user kind is required.
    pub fn user(&self) -> bool {
        self.user
    }

    /// Returns true if the given kind is required.
    pub fn contains(&self, kind: AccessTokenKind) -> bool {
        match kind {
            AccessTokenKind::Tenant => self.tenant,
            AccessTokenKind::App => self.app,
            AccessTokenKind::User => self.user,
        }
    }

    /// Returns true if the call requires no credentials.
    pub fn is_empty(&self) -> bool {
        !(self.tenant || self.app || self.user)
    }
}

/// The request body of a call.
///
/// Most endpoints take a JSON object; designated upload endpoints take a
/// multipart payload carrying raw bytes plus declared metadata fields. An
/// empty JSON object is a valid payload and is serialized as `{}`, not
/// omitted: several endpoints require an (empty) JSON body on POST/DELETE.
#[derive(Clone, Debug, Default)]
pub enum Payload {
    /// No request body.
    #[default]
    Empty,
    /// A JSON request body, including the empty object `{}`.
    Json(serde_json::Value),
    /// A multipart request body carrying a file.
    Multipart(FilePayload),
}

/// The file half of a multipart upload.
///
/// The raw bytes travel as the `file` part of the form; every declared
/// metadata field travels as its own text part.
///
/// # Example
/// ```
/// # use lark_oapi::request::FilePayload;
/// let payload = FilePayload::new("report.pdf", bytes::Bytes::from_static(b"%PDF-..."))
///     .set_field("parent_type", "explorer")
///     .set_field("size", "8");
/// assert_eq!(payload.file_name(), "report.pdf");
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FilePayload {
    file_name: String,
    content: bytes::Bytes,
    fields: Vec<(String, String)>,
}

impl FilePayload {
    /// Creates a payload from a file name and its contents.
    pub fn new<T: Into<String>, V: Into<bytes::Bytes>>(file_name: T, content: V) -> Self {
        Self {
            file_name: file_name.into(),
            content: content.into(),
            fields: Vec::new(),
        }
    }

    /// Adds a metadata field to the form.
    pub fn set_field<K: Into<String>, V: Into<String>>(mut self, name: K, value: V) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    /// The name the file is uploaded under.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// The raw file contents.
    pub fn content(&self) -> &bytes::Bytes {
        &self.content
    }

    /// The declared metadata fields, in insertion order.
    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }
}

/// The descriptor for one API invocation.
///
/// Produced by a generated endpoint method, consumed once by the dispatch
/// layer. The URL template contains `:param` placeholders resolved against
/// the path records; query records with non-null values are URL-encoded into
/// the query string; the payload becomes the request body. A value consumed
/// by the path never reappears in the query string or the payload.
///
/// # Example
/// ```
/// # use lark_oapi::request::{AccessTokenTypes, ApiRequest};
/// let request = ApiRequest::new(http::Method::GET, "/open-apis/im/v1/chats/:chat_id")
///     .set_path_param("chat_id", "oc_a0553eda9014c201e6969b478895c230")
///     .set_query_param("user_id_type", "open_id")
///     .set_token_types(AccessTokenTypes::new().set_tenant(true));
/// assert_eq!(request.path_template(), "/open-apis/im/v1/chats/:chat_id");
/// ```
#[derive(Clone, Debug)]
pub struct ApiRequest {
    method: http::Method,
    path_template: String,
    path: Vec<(String, String)>,
    query: Vec<(String, serde_json::Value)>,
    payload: Payload,
    token_types: AccessTokenTypes,
}

impl ApiRequest {
    /// Creates a descriptor for the given method and URL template.
    pub fn new<T: Into<String>>(method: http::Method, path_template: T) -> Self {
        Self {
            method,
            path_template: path_template.into(),
            path: Vec::new(),
            query: Vec::new(),
            payload: Payload::Empty,
            token_types: AccessTokenTypes::default(),
        }
    }

    /// Binds a value to a `:name` placeholder in the URL template.
    pub fn set_path_param<K: Into<String>, V: Into<String>>(mut self, name: K, value: V) -> Self {
        self.path.push((name.into(), value.into()));
        self
    }

    /// Binds a value to a query parameter.
    ///
    /// A `Null` value is omitted from the query string entirely, which is how
    /// the generated methods distinguish "absent" from "empty string".
    pub fn set_query_param<K: Into<String>, V: Into<serde_json::Value>>(
        mut self,
        name: K,
        value: V,
    ) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    /// Sets a JSON request body.
    pub fn set_payload(mut self, v: serde_json::Value) -> Self {
        self.payload = Payload::Json(v);
        self
    }

    /// Sets a multipart request body for upload endpoints.
    pub fn set_file_payload(mut self, v: FilePayload) -> Self {
        self.payload = Payload::Multipart(v);
        self
    }

    /// Declares the credential kinds this call requires.
    pub fn set_token_types(mut self, v: AccessTokenTypes) -> Self {
        self.token_types = v;
        self
    }

    /// The HTTP method of the call.
    pub fn method(&self) -> &http::Method {
        &self.method
    }

    /// The URL template, with `:param` placeholders unresolved.
    pub fn path_template(&self) -> &str {
        &self.path_template
    }

    /// The path records, in insertion order.
    pub fn path(&self) -> &[(String, String)] {
        &self.path
    }

    /// The query records, in insertion order.
    pub fn query(&self) -> &[(String, serde_json::Value)] {
        &self.query
    }

    /// The request body.
    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// The credential kinds this call requires.
    pub fn token_types(&self) -> AccessTokenTypes {
        self.token_types
    }
}
