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

//! Serialization of query parameters.
//!
//! Query parameters in the platform's APIs are mostly strings and integers,
//! but paginated listings take repeated values and a few endpoints take
//! nested options. The generated code treats all of them uniformly as
//! [serde_json::Value] records, and this helper encodes each value by shape.
//!
//! A `Null` value is omitted entirely, which is how a request field that was
//! never set differs from one set to the empty string.

/// [QueryParameter] is a trait representing types that can be used as a query
/// parameter.
pub trait QueryParameter {
    fn add(self, builder: reqwest::RequestBuilder, name: &str) -> reqwest::RequestBuilder;
}

impl QueryParameter for serde_json::Value {
    fn add(self, builder: reqwest::RequestBuilder, name: &str) -> reqwest::RequestBuilder {
        match self {
            Self::Object(object) => object.into_iter().fold(builder, |builder, (k, v)| {
                v.add(builder, format!("{name}.{k}").as_str())
            }),
            Self::Array(array) => array
                .into_iter()
                .fold(builder, |builder, v| v.add(builder, name)),
            Self::Null => builder,
            Self::String(s) => builder.query(&[(name, s)]),
            Self::Number(n) => builder.query(&[(name, format!("{n}"))]),
            Self::Bool(b) => builder.query(&[(name, b)]),
        }
    }
}
