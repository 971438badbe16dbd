use std::collections::HashMap;
use std::time::Duration;

use graphql_ops::header::{HeaderMap, HeaderName, HeaderValue};
use graphql_ops::{ClientConfig, Operations, SecretString, Url};
use serde::{Deserialize, Deserializer};

use super::logging::Logging;

/// Configuration for the `graphql-ops` binary
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// The target GraphQL endpoint
    pub endpoint: Url,

    /// List of hard-coded headers to include in all GraphQL requests
    #[serde(deserialize_with = "header_map")]
    pub headers: HeaderMap,

    /// Timeout of each GraphQL request
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,

    /// Bearer token sent to the endpoint
    pub token: Option<SecretString>,

    /// Logging configuration
    pub logging: Logging,

    /// The named queries and mutations
    pub operations: Operations,
}

impl Default for Config {
    fn default() -> Self {
        let defaults = ClientConfig::new(default_endpoint());
        Self {
            endpoint: defaults.url,
            headers: defaults.headers,
            timeout: defaults.timeout,
            token: None,
            logging: Logging::default(),
            operations: Operations::default(),
        }
    }
}

impl Config {
    /// The configuration of the HTTP client talking to the endpoint
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            url: self.endpoint.clone(),
            headers: self.headers.clone(),
            timeout: self.timeout,
            token: self.token.clone(),
        }
    }
}

#[allow(clippy::unwrap_used)]
fn default_endpoint() -> Url {
    Url::parse("http://127.0.0.1:4000").unwrap()
}

fn header_map<'de, D>(deserializer: D) -> Result<HeaderMap, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    HashMap::<String, String>::deserialize(deserializer)?
        .into_iter()
        .map(|(name, value)| {
            Ok((
                HeaderName::try_from(name).map_err(D::Error::custom)?,
                HeaderValue::try_from(value).map_err(D::Error::custom)?,
            ))
        })
        .collect()
}

#[cfg(test)]
mod test {
    use std::time::Duration;

    use secrecy::ExposeSecret;

    use super::Config;

    #[test]
    fn it_parses_a_minimal_config() {
        let config = serde_json::from_str::<Config>("{}").unwrap();

        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.operations.queries.is_empty());
    }

    #[test]
    fn it_rejects_invalid_header_names() {
        let error = serde_json::from_str::<Config>(r#"{ "headers": { "bad header": "x" } }"#)
            .unwrap_err();

        assert!(error.to_string().contains("invalid HTTP header name"));
    }

    #[test]
    fn it_builds_the_client_config() {
        let config = serde_json::from_str::<Config>(
            r#"{
                "endpoint": "https://api.example.com/graphql",
                "headers": { "x-team": "core" },
                "timeout": "2s",
                "token": "secret"
            }"#,
        )
        .unwrap();

        let client_config = config.client_config();

        assert_eq!(client_config.url.as_str(), "https://api.example.com/graphql");
        assert_eq!(client_config.headers["x-team"], "core");
        assert_eq!(client_config.timeout, Duration::from_secs(2));
        assert_eq!(client_config.token.unwrap().expose_secret(), "secret");
    }
}
