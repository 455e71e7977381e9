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

pub(crate) const LOGGING_VAR: &str = "LARK_OAPI_RUST_LOGGING";

/// The client configuration for [crate::http::ReqwestClient].
///
/// Generated clients create one of these from their builder and hand it to
/// the transport. The application id/secret is used to create the tenant and
/// app credentials lazily; tests and applications sharing credentials across
/// clients can inject pre-built [Credentials] instead.
#[derive(Clone, Default)]
pub struct ClientConfig {
    /// Overrides the default base endpoint.
    pub endpoint: Option<String>,
    /// The application's id, e.g. `cli_a1234567`.
    pub app_id: Option<String>,
    /// The application's secret.
    pub app_secret: Option<String>,
    /// Overrides the tenant credentials built from the app id/secret.
    pub tenant_credentials: Option<Credentials>,
    /// Overrides the app credentials built from the app id/secret.
    pub app_credentials: Option<Credentials>,
    /// Enables request logging for this client.
    pub tracing: bool,
}

impl ClientConfig {
    /// Creates a configuration from the application's id and secret.
    pub fn new<I: Into<String>, S: Into<String>>(app_id: I, app_secret: S) -> Self {
        Self {
            app_id: Some(app_id.into()),
            app_secret: Some(app_secret.into()),
            ..Self::default()
        }
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("endpoint", &self.endpoint)
            .field("app_id", &self.app_id)
            .field("app_secret", &self.app_secret.as_ref().map(|_| "[censored]"))
            .field("tenant_credentials", &self.tenant_credentials)
            .field("app_credentials", &self.app_credentials)
            .field("tracing", &self.tracing)
            .finish()
    }
}

// Returns true if the environment or client configuration enables tracing.
pub fn tracing_enabled(config: &ClientConfig) -> bool {
    if config.tracing {
        return true;
    }
    std::env::var(LOGGING_VAR)
        .map(|v| v == "true")
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use scoped_env::ScopedEnv;

    // This test must run serially because it manipulates the environment.
    #[test]
    #[serial_test::serial]
    fn config_tracing() {
        let _e = ScopedEnv::remove(LOGGING_VAR);
        let config = ClientConfig::default();
        assert!(!tracing_enabled(&config), "expected tracing to be disabled");
        let mut config = ClientConfig::default();
        config.tracing = true;
        let config = config;
        assert!(tracing_enabled(&config), "expected tracing to be enabled");

        let _e = ScopedEnv::set(LOGGING_VAR, "true");
        let config = ClientConfig::default();
        assert!(tracing_enabled(&config), "expected tracing to be enabled");

        let _e = ScopedEnv::set(LOGGING_VAR, "not-true");
        let config = ClientConfig::default();
        assert!(!tracing_enabled(&config), "expected tracing to be disabled");
    }

    #[test]
    fn debug_censors_secret() {
        let config = ClientConfig::new("cli_test_id", "super-secret");
        let got = format!("{config:?}");
        assert!(got.contains("cli_test_id"), "{got}");
        assert!(!got.contains("super-secret"), "{got}");
    }
}
