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

/// The base endpoint for the Feishu deployment of the platform.
pub const FEISHU_ENDPOINT: &str = "https://open.feishu.cn";

/// The base endpoint for the Lark deployment of the platform.
pub const LARK_ENDPOINT: &str = "https://open.larksuite.com";

/// The default base endpoint used when none is configured.
pub const DEFAULT_ENDPOINT: &str = FEISHU_ENDPOINT;

/// The issuing path for tenant access tokens.
pub(crate) const TENANT_ACCESS_TOKEN_PATH: &str =
    "/open-apis/auth/v3/tenant_access_token/internal";

/// The issuing path for app access tokens.
pub(crate) const APP_ACCESS_TOKEN_PATH: &str = "/open-apis/auth/v3/app_access_token/internal";
