//! Capability providers ("tools") and the machinery shared by all of them.
//!
//! A [`Tool`] knows how to talk to one external data provider. It does not
//! cache, retry or decide when to degrade: caching lives once in
//! [`CachedTool`], retry lives once in the [`Executor`](crate::executor::Executor).
//!
//! ```text
//! Executor ──▶ CachedTool ──▶ ResultCache (hit → source=cached)
//!                  │
//!                  └──────▶ Tool::fetch (miss → source=live, stored)
//!
//! retries exhausted ──▶ CachedTool::fallback (source=fallback, never stored)
//! ```

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::{error::ProviderError, models::Parameters};

pub mod cache;
pub mod cached;
pub mod github;
pub mod registry;
pub mod weather;

pub use cache::{Clock, Fingerprint, FingerprintFn, ManualClock, ResultCache, SystemClock};
pub use cached::CachedTool;
pub use github::GithubSearch;
pub use registry::ToolRegistry;
pub use weather::WeatherLookup;

/// Name of the repository search tool.
pub const GITHUB_SEARCH: &str = "github_search";

/// Name of the weather lookup tool.
pub const WEATHER_LOOKUP: &str = "weather_lookup";

/// One entry of a tool's parameter contract.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct ParameterSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub required: bool,
}

impl ParameterSpec {
    pub const fn required(name: &'static str, description: &'static str) -> Self {
        Self {
            name,
            description,
            required: true,
        }
    }

    pub const fn optional(name: &'static str, description: &'static str) -> Self {
        Self {
            name,
            description,
            required: false,
        }
    }
}

/// Public description of a registered tool.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ToolInfo {
    pub name: String,
    pub description: String,
    pub parameters: Vec<ParameterSpec>,
}

/// A named external data provider.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Identifier that plan steps refer to.
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    /// Required and optional parameter keys.
    fn parameters(&self) -> &[ParameterSpec];

    /// Checks that every required key is present. Values are not inspected.
    fn validate(&self, params: &Parameters) -> bool {
        self.parameters()
            .iter()
            .filter(|spec| spec.required)
            .all(|spec| params.contains_key(spec.name))
    }

    /// Performs one round trip to the provider.
    async fn fetch(&self, params: &Parameters) -> Result<Value, ProviderError>;

    /// Synthetic data derived from the parameters, used once retries are
    /// exhausted. Tools without a degraded mode return `None`.
    fn fallback(&self, _params: &Parameters) -> Option<Value> {
        None
    }

    fn info(&self) -> ToolInfo {
        ToolInfo {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self.parameters().to_vec(),
        }
    }
}

/// Reads a string parameter, accepting numbers and booleans as text.
pub(crate) fn string_param(params: &Parameters, key: &str) -> Option<String> {
    match params.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Reads a non-negative integer parameter, accepting numeric strings.
pub(crate) fn u64_param(params: &Parameters, key: &str) -> Option<u64> {
    match params.get(key)? {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Upper-cases the first letter of each space-separated word.
///
/// ```rust
/// use relay_core::tools::title_case;
///
/// assert_eq!(title_case("new york"), "New York");
/// assert_eq!(title_case("SAN francisco"), "San Francisco");
/// ```
pub fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    struct Echo;

    #[async_trait]
    impl Tool for Echo {
        fn name(&self) -> &str {
            "echo"
        }

        fn description(&self) -> &str {
            "Echoes its parameters"
        }

        fn parameters(&self) -> &[ParameterSpec] {
            const PARAMS: &[ParameterSpec] = &[
                ParameterSpec::required("text", "Text to echo"),
                ParameterSpec::optional("times", "Repetitions"),
            ];
            PARAMS
        }

        async fn fetch(&self, params: &Parameters) -> Result<Value, ProviderError> {
            Ok(Value::Object(params.clone()))
        }
    }

    #[test]
    fn test_validate_checks_required_keys_only() {
        let tool = Echo;
        let mut params = Parameters::new();
        assert!(!tool.validate(&params));

        params.insert("times".into(), json!(2));
        assert!(!tool.validate(&params));

        params.insert("text".into(), json!(null));
        assert!(tool.validate(&params));
    }

    #[test]
    fn test_default_fallback_is_absent() {
        assert!(Echo.fallback(&Parameters::new()).is_none());
    }

    #[test]
    fn test_info_lists_parameter_contract() {
        let info = Echo.info();
        assert_eq!(info.name, "echo");
        assert_eq!(info.parameters.len(), 2);
        assert!(info.parameters[0].required);
        assert!(!info.parameters[1].required);
    }

    #[test]
    fn test_param_readers() {
        let params = json!({"per_page": "7", "query": 42, "flag": true})
            .as_object()
            .cloned()
            .unwrap_or_default();
        assert_eq!(u64_param(&params, "per_page"), Some(7));
        assert_eq!(string_param(&params, "query").as_deref(), Some("42"));
        assert_eq!(string_param(&params, "flag").as_deref(), Some("true"));
        assert_eq!(string_param(&params, "missing"), None);
    }
}
